// src/core/text_extractor.rs
use async_trait::async_trait;

use crate::app_log;
use crate::error::{AdvisorError, Result};
use crate::types::CvText;

/// Turns an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Vec<u8>) -> Result<CvText>;
}

pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Vec<u8>) -> Result<CvText> {
        if document.is_empty() {
            return Err(AdvisorError::Extraction("uploaded document is empty".to_string()));
        }

        let size = document.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&document))
            .await
            .map_err(|e| AdvisorError::Extraction(format!("extraction task failed: {}", e)))?
            .map_err(|e| AdvisorError::Extraction(format!("PDF extraction error: {}", e)))?;

        if text.trim().is_empty() {
            return Err(AdvisorError::Extraction(
                "document contains no readable text".to_string(),
            ));
        }

        app_log!(info, "Extracted {} characters from {} byte document", text.len(), size);
        Ok(CvText::new(text))
    }
}
