// src/scraping/jobs.rs
use scraper::{ElementRef, Html};

use super::{absolute_url, select_all, select_first, text_or, ListingStrategy};
use crate::enrichment::EnrichmentResult;
use crate::types::{JobEntry, NOT_AVAILABLE};

const JOB_CARD: &str = "li.has-pointer-d";
const TITLE_LINK: &str = "a[data-js-aid='jobID']";
const COMPANY: &str = "span.t-default.t-small";
const LOCATION: &str = "div.t-mute.t-small";
const POSTING_DATE: &str = "span[data-automation-id='job-active-date']";
const ATTRIBUTES: &str = "dl.dlist";

pub const JOB_CAP: usize = 4;

/// Job board listing (one search-results page per job title).
#[derive(Debug, Clone)]
pub struct JobListing {
    base_url: String,
    country: String,
}

impl JobListing {
    pub fn new(base_url: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            country: country.into(),
        }
    }

    /// `Data Analyst` → `{base}/en/{country}/jobs/data-analyst-jobs/`
    pub fn search_url(&self, job_title: &str) -> String {
        format!(
            "{}/en/{}/jobs/{}-jobs/",
            self.base_url.trim_end_matches('/'),
            self.country,
            job_slug(job_title)
        )
    }

    fn parse_card(&self, card: ElementRef<'_>) -> JobEntry {
        let title_link = select_first(card, TITLE_LINK);

        let job_url = title_link
            .and_then(|link| link.value().attr("href"))
            .map(|href| absolute_url(&self.base_url, href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let remote_status = match select_first(card, ATTRIBUTES) {
            Some(attrs) if attrs.text().any(|t| t.contains("Remote")) => "Remote",
            _ => "Not specified",
        };

        JobEntry {
            title: text_or(title_link, NOT_AVAILABLE),
            company: text_or(select_first(card, COMPANY), NOT_AVAILABLE),
            location: text_or(select_first(card, LOCATION), NOT_AVAILABLE),
            description: NOT_AVAILABLE.to_string(),
            posting_date: text_or(select_first(card, POSTING_DATE), NOT_AVAILABLE),
            remote_status: remote_status.to_string(),
            job_url,
            enrichment: EnrichmentResult::default(),
        }
    }
}

impl ListingStrategy for JobListing {
    type Entry = JobEntry;

    fn cap(&self) -> Option<usize> {
        Some(JOB_CAP)
    }

    fn parse_listing(&self, html: &str) -> Vec<JobEntry> {
        let document = Html::parse_document(html);
        select_all(document.root_element(), JOB_CARD)
            .into_iter()
            .take(self.cap().unwrap_or(usize::MAX))
            .map(|card| self.parse_card(card))
            .collect()
    }
}

/// Lower-cased title with spaces replaced by hyphens.
pub fn job_slug(job_title: &str) -> String {
    job_title.replace(' ', "-").to_lowercase()
}
