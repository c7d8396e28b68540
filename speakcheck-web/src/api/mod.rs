//! HTTP handlers for speakcheck-web

pub mod admin;
pub mod assessment;
pub mod auth;
pub mod health;

pub use admin::{admin_dashboard, admin_detail};
pub use assessment::{assessment_page, submit_assessment};
pub use auth::{index_page, login, logout};
pub use health::health_routes;
