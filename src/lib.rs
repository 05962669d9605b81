// src/lib.rs
//! CV career advisor: classify an uploaded CV with a chat model, then scrape
//! and enrich matching education programs, job offers or online courses.

pub mod advisor;
pub mod analysis;
pub mod cli;
pub mod core;
pub mod enrichment;
pub mod error;
pub mod scraping;
pub mod types;
pub mod web;

#[cfg(test)]
mod testing;

pub use advisor::{CareerAdvisor, Services};
pub use error::{AdvisorError, Result};
pub use web::start_web_server;

/// `app_log!(info, "Fetched {} entries", n)` forwards to the matching `tracing` macro.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// `app_span!("recommend_jobs", request_id = %id)` opens an info-level span.
#[macro_export]
macro_rules! app_span {
    ($name:expr $(, $($fields:tt)*)?) => {
        ::tracing::info_span!($name $(, $($fields)*)?)
    };
}
