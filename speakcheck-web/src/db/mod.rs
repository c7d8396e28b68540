//! Database access for speakcheck-web

pub mod assessments;

pub use assessments::{count_assessments, get_assessment, insert_assessment, list_assessments};
