// src/enrichment/job_details.rs
use scraper::Html;
use std::sync::Arc;

use super::{EnrichmentResult, FieldValue};
use crate::app_log;
use crate::core::{ChatMessage, ChatRequest, ChatService, ReplyPostProcess};
use crate::scraping::{select_first, PageFetcher};
use crate::types::JobEntry;

const CONTENT_BLOCK: &str = "div.t-break";

const SUMMARY_INSTRUCTION: &str = "Analyze the following HTML code and extract a 5-line job description in one paragraph, focusing on the most important details of the job. Provide the description in a concise paragraph directly without any introductory sentence or additional text.";
const SUMMARY_MAX_TOKENS: u32 = 100;
const SUMMARY_TEMPERATURE: f32 = 0.9;

pub const SUMMARY_UNAVAILABLE: &str = "Unable to generate a summary.";

/// Follows each job's detail link and summarizes the posting with the model.
pub struct JobEnricher {
    fetcher: Arc<dyn PageFetcher>,
    chat: Arc<dyn ChatService>,
    post_process: ReplyPostProcess,
}

impl JobEnricher {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        chat: Arc<dyn ChatService>,
        post_process: ReplyPostProcess,
    ) -> Self {
        Self {
            fetcher,
            chat,
            post_process,
        }
    }

    /// Enrich in place, one entry after another, keeping order.
    pub async fn enrich_all(&self, jobs: &mut [JobEntry]) {
        for job in jobs.iter_mut() {
            let result = self.enrich(job).await;
            job.apply(result);
        }
    }

    pub async fn enrich(&self, job: &JobEntry) -> EnrichmentResult {
        let Some(url) = job.detail_url() else {
            return EnrichmentResult::default();
        };

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                app_log!(warn, "Job detail fetch failed for '{}': {}", job.title, e);
                return EnrichmentResult::default();
            }
        };

        let Some(content) = content_block(&html) else {
            app_log!(warn, "No description block on detail page for '{}'", job.title);
            return EnrichmentResult::default();
        };

        EnrichmentResult {
            description: self.summarize(content).await,
            ..EnrichmentResult::default()
        }
    }

    async fn summarize(&self, content_html: String) -> FieldValue {
        let request = ChatRequest {
            messages: vec![
                ChatMessage::system(SUMMARY_INSTRUCTION),
                ChatMessage::user(content_html),
            ],
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        match self.chat.complete(request).await {
            Ok(reply) => FieldValue::Real(post_process(&reply, self.post_process)),
            Err(e) => {
                app_log!(warn, "Job summary generation failed: {}", e);
                FieldValue::Synthetic(SUMMARY_UNAVAILABLE.to_string())
            }
        }
    }
}

/// Outer HTML of the posting's description block.
fn content_block(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    select_first(document.root_element(), CONTENT_BLOCK).map(|block| block.html())
}

pub fn post_process(reply: &str, mode: ReplyPostProcess) -> String {
    let reply = reply.trim();
    match mode {
        ReplyPostProcess::Verbatim => reply.to_string(),
        ReplyPostProcess::DropFirstLine => reply
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or(reply)
            .trim()
            .to_string(),
    }
}
