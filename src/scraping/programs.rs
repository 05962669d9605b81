// src/scraping/programs.rs
//! Executive-education program finder.
//!
//! Missing fields are empty strings here, not "N/A"; the page lists every
//! program for a topic, so there is no cap.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use super::{element_text, is_text_only, own_text, select_all, select_first, text_or, ListingStrategy};
use crate::types::ProgramEntry;

const CARD: &str = "div.relative.w-full.px-8.py-12.bg-gray-100.rounded-lg";
const NAME: &str = "h1";
const PROGRAM_TYPE: &str = "div[class*='-top-4']";
const DESCRIPTION: &str = "div.my-5";
const LOCATION: &str = "span.font-medium";
const PROGRAM_LINK: &str = "a[href*='/program/']";
const BROCHURE_LINK: &str = "a[href*='.pdf']";

const DATE_PLACEHOLDER: &str = "(TBD)";
const LOCATION_MARKER: &str = "UM6P";

#[derive(Debug, Default, Clone, Copy)]
pub struct ProgramListing;

impl ListingStrategy for ProgramListing {
    type Entry = ProgramEntry;

    fn cap(&self) -> Option<usize> {
        None
    }

    fn parse_listing(&self, html: &str) -> Vec<ProgramEntry> {
        let document = Html::parse_document(html);
        select_all(document.root_element(), CARD)
            .into_iter()
            .map(parse_card)
            .collect()
    }
}

fn parse_card(card: ElementRef<'_>) -> ProgramEntry {
    ProgramEntry {
        name: text_or(select_first(card, NAME), ""),
        program_type: text_or(select_first(card, PROGRAM_TYPE), ""),
        start_date: start_date_text(card)
            .map(|raw| normalize_start_date(&raw))
            .unwrap_or_default(),
        location: select_all(card, LOCATION)
            .into_iter()
            .find(|span| is_text_only(*span) && own_text(*span).contains(LOCATION_MARKER))
            .map(element_text)
            .unwrap_or_default(),
        description: text_or(select_first(card, DESCRIPTION), ""),
        program_url: href(card, PROGRAM_LINK),
        brochure_url: href(card, BROCHURE_LINK),
    }
}

/// First plain-text span that is neither blank nor the TBD placeholder.
fn start_date_text(card: ElementRef<'_>) -> Option<String> {
    select_all(card, "span")
        .into_iter()
        .filter(|span| is_text_only(*span))
        .map(own_text)
        .find(|text| !text.trim().is_empty() && text != DATE_PLACEHOLDER)
}

fn href(card: ElementRef<'_>, css: &str) -> String {
    select_first(card, css)
        .and_then(|link| link.value().attr("href"))
        .unwrap_or_default()
        .to_string()
}

/// `12 March 2025` → `2025-03-12`. Blank or placeholder text gives an empty
/// string; anything unparseable is kept as-is (trimmed).
pub fn normalize_start_date(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() || text == DATE_PLACEHOLDER {
        return String::new();
    }

    match NaiveDate::parse_from_str(text, "%d %B %Y") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => text.to_string(),
    }
}
