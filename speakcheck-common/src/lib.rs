//! # SpeakCheck Common Library
//!
//! Shared code for the SpeakCheck services:
//! - Error and result types
//! - Configuration resolution (CLI / environment / TOML / defaults)
//! - Database initialization and schema

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
