// src/core/mod.rs
//! Collaborator plumbing: configuration, the chat-completion client and document text extraction

pub mod chat_client;
pub mod config_manager;
pub mod text_extractor;

pub use chat_client::{ChatClient, ChatMessage, ChatRequest, ChatService, LlmError};
pub use config_manager::{AdvisorConfig, FallbackPolicy, ReplyPostProcess};
pub use text_extractor::{PdfTextExtractor, TextExtractor};
