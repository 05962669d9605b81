// src/advisor.rs
//! The classify-then-enrich pipeline.
//!
//! One request runs strictly in sequence: extract text, one classification,
//! one listing fetch, then per-entry enrichment in page order. The only shared
//! state is the immutable configuration.

use std::sync::Arc;

use crate::analysis::theme_mapper::{canonicalize, listing_url, ThemeMatch};
use crate::analysis::{ClassificationLabel, Classifier, TaskKind};
use crate::app_log;
use crate::core::{AdvisorConfig, ChatClient, ChatService, LlmError, PdfTextExtractor, TextExtractor};
use crate::enrichment::{CourseEnricher, JobEnricher};
use crate::error::{AdvisorError, Result};
use crate::scraping::{
    CourseListing, HttpFetcher, JobListing, ListingStrategy, PageFetcher, ProgramListing,
};
use crate::types::{
    CourseEntry, CourseRecommendation, CvText, EducationRecommendation, JobEntry,
    JobRecommendation, ProfileInfo, ProgramEntry,
};

/// External collaborators the pipeline talks to.
pub struct Services {
    pub extractor: Arc<dyn TextExtractor>,
    pub classification_chat: Arc<dyn ChatService>,
    pub summarization_chat: Arc<dyn ChatService>,
    pub profile_chat: Arc<dyn ChatService>,
    pub fetcher: Arc<dyn PageFetcher>,
}

pub struct CareerAdvisor {
    config: Arc<AdvisorConfig>,
    extractor: Arc<dyn TextExtractor>,
    classifier: Classifier,
    fetcher: Arc<dyn PageFetcher>,
    programs: ProgramListing,
    jobs: JobListing,
    courses: CourseListing,
    job_enricher: JobEnricher,
    course_enricher: CourseEnricher,
}

impl CareerAdvisor {
    /// Build the production advisor. Any missing credential fails here,
    /// before a single request is served.
    pub fn from_config(config: AdvisorConfig) -> Result<Self> {
        let llm = &config.llm;
        let chat = |capability: &'static str, key: &Option<String>| -> Result<Arc<dyn ChatService>> {
            let client = ChatClient::new(
                capability,
                key.as_deref(),
                &llm.base_url,
                &llm.model,
                llm.timeout(),
            )
            .map_err(startup_error)?;
            let client: Arc<dyn ChatService> = Arc::new(client);
            Ok(client)
        };

        let services = Services {
            extractor: Arc::new(PdfTextExtractor),
            classification_chat: chat("classification", &llm.credentials.classification)?,
            summarization_chat: chat("summarization", &llm.credentials.summarization)?,
            profile_chat: chat("profile", &llm.credentials.profile)?,
            fetcher: Arc::new(HttpFetcher::new(&config.sites.headers, &config.sites.job_base_url)?),
        };

        Ok(Self::with_services(config, services))
    }

    pub fn with_services(config: AdvisorConfig, services: Services) -> Self {
        let config = Arc::new(config);
        let sites = &config.sites;
        let enrichment = &config.enrichment;

        Self {
            extractor: services.extractor,
            classifier: Classifier::new(services.classification_chat, services.profile_chat),
            programs: ProgramListing,
            jobs: JobListing::new(&sites.job_base_url, &sites.job_country),
            courses: CourseListing::new(&sites.course_base_url),
            job_enricher: JobEnricher::new(
                services.fetcher.clone(),
                services.summarization_chat,
                enrichment.summary_post_process,
            ),
            course_enricher: CourseEnricher::new(
                services.fetcher.clone(),
                enrichment.course_delay(),
                enrichment.fallback,
            ),
            fetcher: services.fetcher,
            config,
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    async fn cv_text(&self, document: Vec<u8>) -> Result<CvText> {
        self.extractor.extract(document).await.map_err(|e| {
            app_log!(error, "Text extraction failed: {}", e);
            e
        })
    }

    pub async fn recommend_education(&self, document: Vec<u8>) -> Result<EducationRecommendation> {
        let cv = self.cv_text(document).await?;
        let label = self.classifier.classify(&cv, TaskKind::Theme).await?;

        let theme = canonicalize(&label.text);
        if let ThemeMatch::Unmapped(raw) = &theme {
            app_log!(warn, "Theme label matches no canonical theme: {}", raw);
        }
        let url = listing_url(&theme, &self.config.sites.theme_urls)?;

        let html = self.fetcher.fetch(url).await?;
        let programs = self.programs.parse_listing(&html);
        app_log!(info, "Found {} programs for theme {}", programs.len(), theme.as_str());

        Ok(assemble_education(theme, programs))
    }

    pub async fn recommend_jobs(&self, document: Vec<u8>) -> Result<JobRecommendation> {
        let cv = self.cv_text(document).await?;
        let label = self.classifier.classify(&cv, TaskKind::JobTitle).await?;

        let url = self.jobs.search_url(&label.text);
        let html = self.fetcher.fetch(&url).await?;

        let mut jobs = self.jobs.parse_listing(&html);
        app_log!(info, "Enriching {} jobs for '{}'", jobs.len(), label.text);
        self.job_enricher.enrich_all(&mut jobs).await;

        Ok(assemble_jobs(label, jobs))
    }

    /// A failed course search yields an empty list; only extraction and
    /// classification abort this flow.
    pub async fn recommend_courses(&self, document: Vec<u8>) -> Result<CourseRecommendation> {
        let cv = self.cv_text(document).await?;
        let topics = vec![self.classifier.classify(&cv, TaskKind::Topic).await?];

        let mut courses = Vec::new();
        for topic in &topics {
            courses.extend(self.search_courses(&topic.text).await);
        }

        Ok(assemble_courses(topics, courses))
    }

    async fn search_courses(&self, topic: &str) -> Vec<CourseEntry> {
        let url = self.courses.search_url(topic);
        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                app_log!(warn, "Failed to fetch courses for '{}': {}", topic, e);
                return Vec::new();
            }
        };

        let mut courses = self.courses.parse_listing(&html);
        app_log!(info, "Enriching {} courses for '{}'", courses.len(), topic);
        self.course_enricher.enrich_all(&mut courses).await;
        courses
    }

    pub async fn extract_profile(&self, document: Vec<u8>) -> Result<ProfileInfo> {
        let cv = self.cv_text(document).await?;
        self.classifier.extract_profile(&cv).await
    }
}

/// Building a model client happens once at startup, so every failure is a
/// configuration problem rather than a failed model call.
fn startup_error(err: LlmError) -> AdvisorError {
    AdvisorError::Config(err.to_string())
}

fn assemble_education(theme: ThemeMatch, programs: Vec<ProgramEntry>) -> EducationRecommendation {
    EducationRecommendation {
        recommended_theme: theme.as_str().to_string(),
        programs,
    }
}

fn assemble_jobs(label: ClassificationLabel, jobs: Vec<JobEntry>) -> JobRecommendation {
    JobRecommendation {
        recommended_job: label.text,
        jobs,
    }
}

fn assemble_courses(topics: Vec<ClassificationLabel>, courses: Vec<CourseEntry>) -> CourseRecommendation {
    CourseRecommendation {
        recommended_topics: topics.into_iter().map(|topic| topic.text).collect(),
        courses,
    }
}
