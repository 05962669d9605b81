// src/core/config_manager.rs
//! Immutable advisor configuration, loaded once at startup.
//!
//! `config.yaml` (or the file named by `ADVISOR_CONFIG`) supplies everything but
//! credentials; API keys only ever come from the environment. Components get a
//! shared `AdvisorConfig` and never read process state themselves.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analysis::theme_mapper::{default_theme_urls, THEMES};
use crate::app_log;

const CONFIG_PATH_VAR: &str = "ADVISOR_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";
const SHARED_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub sites: SiteSettings,
    pub enrichment: EnrichmentSettings,
    pub logging: LoggingSettings,
    /// File the settings came from; `None` when built-in defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub upload_limit_mib: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
            upload_limit_mib: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    /// Per-call ceiling for model requests; unset leaves the transport default.
    pub timeout_secs: Option<u64>,
    /// Never read from the file; filled from the environment by `load`.
    #[serde(skip)]
    pub credentials: Credentials,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
            timeout_secs: None,
            credentials: Credentials::default(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// One API key per capability so each can be rotated or billed on its own.
#[derive(Clone, Default)]
pub struct Credentials {
    pub classification: Option<String>,
    pub summarization: Option<String>,
    pub profile: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| if key.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("classification", &mask(&self.classification))
            .field("summarization", &mask(&self.summarization))
            .field("profile", &mask(&self.profile))
            .finish()
    }
}

impl Credentials {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let shared = lookup(SHARED_KEY_VAR);
        let pick = |var: &str| lookup(var).or_else(|| shared.clone());
        Self {
            classification: pick("ADVISOR_CLASSIFICATION_API_KEY"),
            summarization: pick("ADVISOR_SUMMARIZATION_API_KEY"),
            profile: pick("ADVISOR_PROFILE_API_KEY"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Canonical theme -> program listing URL.
    pub theme_urls: BTreeMap<String, String>,
    pub job_base_url: String,
    pub job_country: String,
    pub course_base_url: String,
    pub headers: BTreeMap<String, String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        let headers = [
            ("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"),
            ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
            ("Accept-Language", "en-US,en;q=0.5"),
            ("Referer", "https://www.google.com/"),
            ("DNT", "1"),
            ("Upgrade-Insecure-Requests", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            theme_urls: default_theme_urls(),
            job_base_url: "https://www.bayt.com".to_string(),
            job_country: "morocco".to_string(),
            course_base_url: "https://www.coursera.org".to_string(),
            headers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyPostProcess {
    /// Drop the first line of a multi-line reply; models tend to open with a preamble.
    DropFirstLine,
    Verbatim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    Fabricate,
    MarkUnknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentSettings {
    pub course_delay_ms: u64,
    pub summary_post_process: ReplyPostProcess,
    pub fallback: FallbackPolicy,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            course_delay_ms: 1000,
            summary_post_process: ReplyPostProcess::DropFirstLine,
            fallback: FallbackPolicy::Fabricate,
        }
    }
}

impl EnrichmentSettings {
    pub fn course_delay(&self) -> Duration {
        Duration::from_millis(self.course_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub json_file: Option<PathBuf>,
}

impl AdvisorConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Like `load`, with an explicit file path. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let mut config = Self::from_file(path)?;
            config.source = Some(path.to_path_buf());
            config
        } else {
            Self::default()
        };

        if let Ok(port) = std::env::var("ROCKET_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }

        config.llm.credentials = Credentials::from_lookup(|var| std::env::var(var).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loading happens before the subscriber exists, so this is logged afterwards.
    pub fn log_summary(&self) {
        match &self.source {
            Some(path) => app_log!(info, "Loaded advisor configuration from {}", path.display()),
            None => app_log!(warn, "No configuration file found, using built-in defaults"),
        }
        app_log!(info, "Model credentials: {:?}", self.llm.credentials);
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Every canonical theme must keep a listing URL, whatever the file overrides.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = THEMES
            .iter()
            .copied()
            .filter(|theme| !self.sites.theme_urls.contains_key(*theme))
            .collect();

        if !missing.is_empty() {
            anyhow::bail!("theme_urls is missing entries for: {}", missing.join(", "));
        }
        Ok(())
    }
}
