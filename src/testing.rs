// src/testing.rs
//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::core::{ChatRequest, ChatService, LlmError, TextExtractor};
use crate::error::{AdvisorError, Result};
use crate::scraping::PageFetcher;
use crate::types::CvText;

/// Replays queued replies in order; records every request it receives.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<std::result::Result<String, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<std::result::Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying<const N: usize>(replies: [&str; N]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for ScriptedChat {
    async fn complete(&self, request: ChatRequest) -> std::result::Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Communication("no scripted reply left".to_string())))
    }
}

/// Serves fixed pages by URL; unknown URLs answer 404.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, std::result::Result<String, u16>>,
    fetched: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(status)) => Err(AdvisorError::fetch(url, Some(*status), "HTTP error")),
            None => Err(AdvisorError::fetch(url, Some(404), "HTTP error")),
        }
    }
}

/// Ignores the document and returns fixed text, or fails when built with `failing`.
pub struct FixedExtractor(Option<String>);

impl FixedExtractor {
    pub fn text(text: &str) -> Arc<Self> {
        Arc::new(Self(Some(text.to_string())))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self(None))
    }
}

#[async_trait]
impl TextExtractor for FixedExtractor {
    async fn extract(&self, _document: Vec<u8>) -> Result<CvText> {
        self.0
            .clone()
            .map(CvText::new)
            .ok_or_else(|| AdvisorError::Extraction("unreadable document".to_string()))
    }
}
