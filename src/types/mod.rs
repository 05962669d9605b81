// src/types/mod.rs
pub mod listing;
pub mod response;

pub use listing::{CourseEntry, JobEntry, ProgramEntry, NOT_AVAILABLE};
pub use response::{
    CourseRecommendation, EducationRecommendation, JobRecommendation, ProfileInfo,
};

/// Plain text of an uploaded CV; produced once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvText(String);

impl CvText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
