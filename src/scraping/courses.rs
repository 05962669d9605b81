// src/scraping/courses.rs
use reqwest::Url;
use scraper::{ElementRef, Html};

use super::{absolute_url, select_all, select_first, text_or, ListingStrategy};
use crate::enrichment::EnrichmentResult;
use crate::types::{CourseEntry, NOT_AVAILABLE};

const COURSE_CARD: &str = "div.cds-ProductCard-content";
const TITLE: &str = "h3.cds-CommonCard-title";
const PROVIDER: &str = "p.cds-ProductCard-partnerNames";
const COURSE_LINK: &str = "a.cds-119";

pub const COURSE_CAP: usize = 3;

#[derive(Debug, Clone)]
pub struct CourseListing {
    base_url: String,
}

impl CourseListing {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn search_url(&self, topic: &str) -> String {
        let base = format!("{}/search", self.base_url.trim_end_matches('/'));
        match Url::parse_with_params(&base, &[("query", topic.trim())]) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}?query={}", base, topic.trim()),
        }
    }

    fn parse_card(&self, card: ElementRef<'_>) -> CourseEntry {
        let url = select_first(card, COURSE_LINK)
            .and_then(|link| link.value().attr("href"))
            .map(|href| absolute_url(&self.base_url, href))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        CourseEntry {
            title: text_or(select_first(card, TITLE), NOT_AVAILABLE),
            provider: text_or(select_first(card, PROVIDER), NOT_AVAILABLE),
            url,
            duration: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            recommended_experience: NOT_AVAILABLE.to_string(),
            enrichment: EnrichmentResult::default(),
        }
    }
}

impl ListingStrategy for CourseListing {
    type Entry = CourseEntry;

    fn cap(&self) -> Option<usize> {
        Some(COURSE_CAP)
    }

    fn parse_listing(&self, html: &str) -> Vec<CourseEntry> {
        let document = Html::parse_document(html);
        select_all(document.root_element(), COURSE_CARD)
            .into_iter()
            .take(self.cap().unwrap_or(usize::MAX))
            .map(|card| self.parse_card(card))
            .collect()
    }
}
