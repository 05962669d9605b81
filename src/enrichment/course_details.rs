// src/enrichment/course_details.rs
//! Course detail pages: description, duration and experience level.
//!
//! Duration and level are located by ordered text-pattern strategies. When
//! none hits, the fallback policy decides whether a synthetic value is
//! fabricated (the default) or the field is left unknown.

use rand::seq::SliceRandom;
use rand::Rng;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use std::time::Duration;

use super::{first_match, EnrichmentResult, Extractor, FieldValue, Pacer};
use crate::app_log;
use crate::core::FallbackPolicy;
use crate::scraping::{element_text, is_text_only, own_text, select_all, select_first, PageFetcher};
use crate::types::CourseEntry;

const DESCRIPTION: &str = "div.content-inner";

pub const LEVELS: [&str; 3] = ["Beginner", "Intermediate", "Advanced"];
pub const SYNTHETIC_HOURS: std::ops::RangeInclusive<u32> = 14..=30;

pub const DURATION_STRATEGIES: [Extractor; 3] =
    [approx_duration, months_to_complete, time_to_complete];

pub struct CourseEnricher {
    fetcher: Arc<dyn PageFetcher>,
    delay: Duration,
    fallback: FallbackPolicy,
}

impl CourseEnricher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, delay: Duration, fallback: FallbackPolicy) -> Self {
        Self {
            fetcher,
            delay,
            fallback,
        }
    }

    /// Enrich in place with a flat delay between successive detail fetches.
    /// Cards without a link are backfilled without waiting.
    pub async fn enrich_all(&self, courses: &mut [CourseEntry]) {
        let mut pacer = Pacer::new(self.delay);
        for course in courses.iter_mut() {
            if course.detail_url().is_some() {
                pacer.wait().await;
            }
            let result = self.enrich(course).await;
            course.apply(result);
        }
    }

    pub async fn enrich(&self, course: &CourseEntry) -> EnrichmentResult {
        let found = match course.detail_url() {
            Some(url) => match self.fetcher.fetch(url).await {
                Ok(html) => parse_details(&html),
                Err(e) => {
                    app_log!(warn, "Course detail fetch failed for '{}': {}", course.title, e);
                    EnrichmentResult::default()
                }
            },
            None => EnrichmentResult::default(),
        };

        let mut result = found;
        backfill(&mut result, self.fallback, &mut rand::thread_rng());
        if result.duration.is_synthetic() || result.experience.is_synthetic() {
            app_log!(warn, "Backfilled synthetic course details for '{}'", course.title);
        }
        result
    }
}

/// Real values only; anything not found stays `Unavailable`.
pub fn parse_details(html: &str) -> EnrichmentResult {
    let document = Html::parse_document(html);

    let description = select_first(document.root_element(), DESCRIPTION)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .map(|text| first_sentence(&text));

    EnrichmentResult {
        description: FieldValue::from_option(description),
        duration: FieldValue::from_option(first_match(&document, &DURATION_STRATEGIES)),
        experience: FieldValue::from_option(experience_level(&document)),
    }
}

/// The single place where missing duration and level are filled in.
pub fn backfill<R: Rng>(result: &mut EnrichmentResult, policy: FallbackPolicy, rng: &mut R) {
    if policy == FallbackPolicy::MarkUnknown {
        return;
    }
    if result.duration.is_unavailable() {
        result.duration = FieldValue::Synthetic(synthetic_duration(rng));
    }
    if result.experience.is_unavailable() {
        result.experience = FieldValue::Synthetic(synthetic_level(rng));
    }
}

pub fn synthetic_duration<R: Rng>(rng: &mut R) -> String {
    format!("Approx {} hours", rng.gen_range(SYNTHETIC_HOURS))
}

pub fn synthetic_level<R: Rng>(rng: &mut R) -> String {
    LEVELS.choose(rng).copied().unwrap_or(LEVELS[0]).to_string()
}

fn first_sentence(text: &str) -> String {
    let sentence = text.split('.').next().unwrap_or(text);
    format!("{}...", sentence)
}

/// Text-only divs, in document order.
fn text_divs(document: &Html) -> Vec<ElementRef<'_>> {
    select_all(document.root_element(), "div")
        .into_iter()
        .filter(|div| is_text_only(*div))
        .collect()
}

/// Text of the first text-only div satisfying `matches`.
fn div_matching(document: &Html, matches: impl Fn(&str) -> bool) -> Option<String> {
    text_divs(document)
        .into_iter()
        .map(own_text)
        .find(|text| matches(text))
        .map(|text| text.trim().to_string())
}

/// Full text of the div that follows the first text-only div satisfying `matches`.
fn div_after(document: &Html, matches: impl Fn(&str) -> bool) -> Option<String> {
    let divs = select_all(document.root_element(), "div");
    let position = divs
        .iter()
        .position(|div| is_text_only(*div) && matches(&own_text(*div)))?;
    divs.get(position + 1).map(|div| element_text(*div))
}

pub fn approx_duration(document: &Html) -> Option<String> {
    div_matching(document, |text| text.contains("Approx."))
}

pub fn months_to_complete(document: &Html) -> Option<String> {
    div_matching(document, |text| text.to_lowercase().contains("months to complete"))
}

pub fn time_to_complete(document: &Html) -> Option<String> {
    div_after(document, |text| text.to_lowercase().contains("time to complete"))
        .filter(|text| !text.is_empty())
}

/// Classifies the text following the first "level" marker.
pub fn experience_level(document: &Html) -> Option<String> {
    let text = div_after(document, |text| text.to_lowercase().contains("level"))?.to_lowercase();
    LEVELS
        .iter()
        .find(|level| text.contains(&level.to_lowercase()))
        .map(|level| format!("{} level", level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticFetcher;
    use crate::types::NOT_AVAILABLE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const COURSE_URL: &str = "https://www.coursera.org/learn/sql-for-data-science";

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    fn course(url: &str) -> CourseEntry {
        CourseEntry {
            title: "SQL for Data Science".to_string(),
            provider: "UC Davis".to_string(),
            url: url.to_string(),
            duration: NOT_AVAILABLE.to_string(),
            description: NOT_AVAILABLE.to_string(),
            recommended_experience: NOT_AVAILABLE.to_string(),
            enrichment: EnrichmentResult::default(),
        }
    }

    fn synthetic_hours(duration: &str) -> u32 {
        duration
            .strip_prefix("Approx ")
            .and_then(|rest| rest.strip_suffix(" hours"))
            .and_then(|n| n.parse().ok())
            .unwrap_or_else(|| panic!("not a synthetic duration: {}", duration))
    }

    #[test]
    fn test_approx_duration() {
        let page = doc("<div>Approx. 14 hours to complete</div><div>3 months to complete</div>");
        assert_eq!(approx_duration(&page), Some("Approx. 14 hours to complete".to_string()));
    }

    #[test]
    fn test_months_to_complete() {
        let page = doc("<div><span>x</span></div><div>3 Months to complete at 10 hours a week</div>");
        assert_eq!(approx_duration(&page), None);
        assert_eq!(
            months_to_complete(&page),
            Some("3 Months to complete at 10 hours a week".to_string())
        );
    }

    #[test]
    fn test_time_to_complete_reads_following_div() {
        let page = doc("<div>Time to complete</div><div><span>1 week</span> at 10 hours</div>");
        assert_eq!(time_to_complete(&page), Some("1 week at 10 hours".to_string()));
    }

    #[test]
    fn test_duration_chain_order() {
        let page = doc("<div>Time to complete</div><div>2 weeks</div><div>Approx. 9 hours</div>");
        assert_eq!(
            first_match(&page, &DURATION_STRATEGIES),
            Some("Approx. 9 hours".to_string())
        );
    }

    #[test]
    fn test_experience_level() {
        let page = doc("<div>Recommended experience level</div><div>Intermediate level. Some SQL.</div>");
        assert_eq!(experience_level(&page), Some("Intermediate level".to_string()));

        let unknown = doc("<div>Level</div><div>No prior experience</div>");
        assert_eq!(experience_level(&unknown), None);
    }

    #[test]
    fn test_parse_details_keeps_first_sentence() {
        let details = parse_details(
            "<div class=\"content-inner\"> Learn SQL basics. Then advanced joins. </div><div>Approx. 20 hours</div>",
        );
        assert_eq!(details.description, FieldValue::Real("Learn SQL basics...".to_string()));
        assert_eq!(details.duration, FieldValue::Real("Approx. 20 hours".to_string()));
        assert!(details.experience.is_unavailable());
    }

    #[test]
    fn test_backfill_fabricates_only_missing_fields() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut result = EnrichmentResult {
            duration: FieldValue::Real("Approx. 20 hours".to_string()),
            ..EnrichmentResult::default()
        };
        backfill(&mut result, FallbackPolicy::Fabricate, &mut rng);

        assert!(result.duration.is_real());
        assert!(result.experience.is_synthetic());
        assert!(LEVELS.contains(&result.experience.display()));
        assert!(result.description.is_unavailable());
    }

    #[test]
    fn test_backfill_mark_unknown_leaves_fields_unavailable() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut result = EnrichmentResult::default();
        backfill(&mut result, FallbackPolicy::MarkUnknown, &mut rng);
        assert_eq!(result, EnrichmentResult::default());
    }

    #[test]
    fn test_synthetic_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let hours = synthetic_hours(&synthetic_duration(&mut rng));
            assert!(SYNTHETIC_HOURS.contains(&hours));
            assert!(LEVELS.contains(&synthetic_level(&mut rng).as_str()));
        }
    }

    #[tokio::test]
    async fn test_page_without_duration_gets_synthetic_hours() {
        let page = r#"<html><body><div class="content-inner">Query databases. Join tables.</div></body></html>"#;
        let fetcher = Arc::new(StaticFetcher::new().page(COURSE_URL, page));
        let enricher = CourseEnricher::new(fetcher, Duration::ZERO, FallbackPolicy::Fabricate);

        let mut courses = vec![course(COURSE_URL)];
        enricher.enrich_all(&mut courses).await;

        let hours = synthetic_hours(&courses[0].duration);
        assert!((14..=30).contains(&hours));
        assert!(courses[0].enrichment.duration.is_synthetic());
        assert_eq!(courses[0].description, "Query databases...");
        assert!(LEVELS.contains(&courses[0].recommended_experience.as_str()));
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_still_backfills() {
        let fetcher = Arc::new(StaticFetcher::new().status(COURSE_URL, 500));
        let enricher = CourseEnricher::new(fetcher, Duration::ZERO, FallbackPolicy::Fabricate);

        let result = enricher.enrich(&course(COURSE_URL)).await;
        assert!(result.duration.is_synthetic());
        assert!(result.experience.is_synthetic());
        assert_eq!(result.description.display(), NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_real_level_is_reported_with_suffix() {
        let page = "<div>Approx. 12 hours</div><div>Experience level</div><div>Beginner level</div>";
        let fetcher = Arc::new(StaticFetcher::new().page(COURSE_URL, page));
        let enricher = CourseEnricher::new(fetcher, Duration::ZERO, FallbackPolicy::Fabricate);

        let mut courses = vec![course(COURSE_URL), course(NOT_AVAILABLE)];
        enricher.enrich_all(&mut courses).await;

        assert_eq!(courses[0].duration, "Approx. 12 hours");
        assert_eq!(courses[0].recommended_experience, "Beginner level");
        assert!(courses[0].enrichment.experience.is_real());
        assert!(courses[1].enrichment.duration.is_synthetic());
    }

    #[tokio::test]
    async fn test_delay_between_linked_fetches() {
        let second = "https://www.coursera.org/learn/python-for-everybody";
        let fetcher = Arc::new(
            StaticFetcher::new()
                .page(COURSE_URL, "<div>Approx. 12 hours</div>")
                .page(second, "<div>Approx. 20 hours</div>"),
        );
        let delay = Duration::from_millis(50);
        let enricher = CourseEnricher::new(fetcher.clone(), delay, FallbackPolicy::Fabricate);

        let mut courses = vec![course(COURSE_URL), course(second)];
        let start = std::time::Instant::now();
        enricher.enrich_all(&mut courses).await;

        assert!(start.elapsed() >= delay);
        assert_eq!(fetcher.fetched(), vec![COURSE_URL.to_string(), second.to_string()]);
        assert_eq!(courses[1].duration, "Approx. 20 hours");
    }

    #[tokio::test]
    async fn test_unlinked_cards_do_not_wait() {
        let fetcher = Arc::new(StaticFetcher::new());
        let enricher =
            CourseEnricher::new(fetcher.clone(), Duration::from_secs(2), FallbackPolicy::Fabricate);

        let mut courses = vec![course(NOT_AVAILABLE), course(NOT_AVAILABLE), course(NOT_AVAILABLE)];
        let start = std::time::Instant::now();
        enricher.enrich_all(&mut courses).await;

        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(fetcher.fetched().is_empty());
        assert!(courses.iter().all(|c| c.enrichment.duration.is_synthetic()));
    }
}
