// src/types/listing.rs
//! Records scraped from listing pages.
//!
//! Every string field is always populated: a field whose element could not be
//! found holds the sentinel (`NOT_AVAILABLE` for jobs and courses, empty for
//! programs). Enrichment provenance rides along but is never serialized.

use serde::{Deserialize, Serialize};

use crate::enrichment::EnrichmentResult;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub program_type: String,
    pub start_date: String,
    pub location: String,
    pub description: String,
    pub program_url: String,
    pub brochure_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEntry {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub posting_date: String,
    pub remote_status: String,
    pub job_url: String,
    #[serde(skip)]
    pub enrichment: EnrichmentResult,
}

impl JobEntry {
    pub fn detail_url(&self) -> Option<&str> {
        present(&self.job_url)
    }

    pub fn apply(&mut self, result: EnrichmentResult) {
        self.description = result.description.display().to_string();
        self.enrichment = result;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub title: String,
    pub provider: String,
    pub url: String,
    pub duration: String,
    pub description: String,
    pub recommended_experience: String,
    #[serde(skip)]
    pub enrichment: EnrichmentResult,
}

impl CourseEntry {
    pub fn detail_url(&self) -> Option<&str> {
        present(&self.url)
    }

    pub fn apply(&mut self, result: EnrichmentResult) {
        self.description = result.description.display().to_string();
        self.duration = result.duration.display().to_string();
        self.recommended_experience = result.experience.display().to_string();
        self.enrichment = result;
    }
}

fn present(url: &str) -> Option<&str> {
    if url.is_empty() || url == NOT_AVAILABLE {
        None
    } else {
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::FieldValue;

    fn course() -> CourseEntry {
        CourseEntry {
            title: "SQL for Data Science".to_string(),
            provider: "UC Davis".to_string(),
            url: NOT_AVAILABLE.to_string(),
            duration: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            recommended_experience: NOT_AVAILABLE.to_string(),
            enrichment: EnrichmentResult::default(),
        }
    }

    #[test]
    fn test_sentinel_url_is_not_a_detail_link() {
        assert_eq!(course().detail_url(), None);

        let mut linked = course();
        linked.url = "https://www.coursera.org/learn/sql".to_string();
        assert_eq!(linked.detail_url(), Some("https://www.coursera.org/learn/sql"));
    }

    #[test]
    fn test_provenance_is_kept_but_not_serialized() {
        let mut entry = course();
        entry.apply(EnrichmentResult {
            description: FieldValue::Real("Learn SQL...".to_string()),
            duration: FieldValue::Synthetic("Approx 20 hours".to_string()),
            experience: FieldValue::Unavailable,
        });

        assert_eq!(entry.duration, "Approx 20 hours");
        assert_eq!(entry.recommended_experience, NOT_AVAILABLE);
        assert!(entry.enrichment.duration.is_synthetic());

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("enrichment").is_none());
        assert_eq!(json["description"], "Learn SQL...");
    }

    #[test]
    fn test_program_type_serializes_as_type() {
        let json = serde_json::to_value(ProgramEntry::default()).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("program_type").is_none());
    }
}
