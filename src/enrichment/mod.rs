// src/enrichment/mod.rs
//! Per-entry detail enrichment.
//!
//! Nothing in here fails a request: a failed detail fetch or model call
//! degrades that entry's fields and processing moves on to the next entry.

use std::time::Duration;

use crate::types::NOT_AVAILABLE;

pub mod course_details;
pub mod job_details;

pub use course_details::CourseEnricher;
pub use job_details::JobEnricher;

/// A field value together with where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    /// Parsed from a page, or generated by the model from real page content.
    Real(String),
    /// Fabricated default; plausible but not authoritative.
    Synthetic(String),
    #[default]
    Unavailable,
}

impl FieldValue {
    pub fn display(&self) -> &str {
        match self {
            Self::Real(value) | Self::Synthetic(value) => value,
            Self::Unavailable => NOT_AVAILABLE,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    fn from_option(value: Option<String>) -> Self {
        value.map(Self::Real).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub description: FieldValue,
    pub duration: FieldValue,
    pub experience: FieldValue,
}

/// Locates one value in a detail page; strategies are tried in order.
pub type Extractor = fn(&scraper::Html) -> Option<String>;

/// First strategy that yields a value wins.
pub fn first_match(document: &scraper::Html, strategies: &[Extractor]) -> Option<String> {
    strategies.iter().find_map(|extract| extract(document))
}

/// Flat delay between successive detail fetches. Not adaptive.
pub struct Pacer {
    delay: Duration,
    primed: bool,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: false,
        }
    }

    /// Waits `delay` before every call except the first.
    pub async fn wait(&mut self) {
        if self.primed && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.primed = true;
    }
}
