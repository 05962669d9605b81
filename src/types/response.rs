// src/types/response.rs
use serde::{Deserialize, Serialize};

use super::listing::{CourseEntry, JobEntry, ProgramEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationRecommendation {
    pub recommended_theme: String,
    pub programs: Vec<ProgramEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub recommended_job: String,
    pub jobs: Vec<JobEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecommendation {
    pub recommended_topics: Vec<String>,
    pub courses: Vec<CourseEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub full_name: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub key_skills: Vec<String>,
}

impl ProfileInfo {
    /// Returned when the model's reply is not parseable JSON at all.
    pub fn unknown() -> Self {
        Self {
            full_name: "Unknown".to_string(),
            location: "Not specified".to_string(),
            email: "Not specified".to_string(),
            phone: "Not specified".to_string(),
            key_skills: vec!["Not specified".to_string()],
        }
    }
}
