// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::advisor::CareerAdvisor;
use crate::app_log;
use crate::core::config_manager::LoggingSettings;
use crate::core::AdvisorConfig;
use crate::web::start_web_server;

const DEFAULT_LOG_DIRECTIVE: &str = "career_advisor=info,rocket::server=off";

#[derive(Parser)]
#[command(name = "career-advisor")]
#[command(about = "Education, job and course recommendations from a CV")]
pub struct AdvisorCli {
    #[command(subcommand)]
    pub command: Option<AdvisorCommand>,

    /// Configuration file; defaults to $ADVISOR_CONFIG or config.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum AdvisorCommand {
    /// Run the HTTP API (the default)
    Serve,
    /// Run one pipeline against a local PDF and print the JSON response
    Recommend {
        kind: RecommendationKind,
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecommendationKind {
    Education,
    Jobs,
    Courses,
    Profile,
}

pub async fn handle_command(cli: AdvisorCli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AdvisorConfig::load_from(path)?,
        None => AdvisorConfig::load()?,
    };
    init_logging(&config.logging)?;
    config.log_summary();

    match cli.command.unwrap_or(AdvisorCommand::Serve) {
        AdvisorCommand::Serve => start_web_server(config).await,
        AdvisorCommand::Recommend { kind, file } => {
            let document = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let advisor = CareerAdvisor::from_config(config)?;

            app_log!(info, "Running {:?} recommendation for {}", kind, file.display());
            let output = match kind {
                RecommendationKind::Education => {
                    serde_json::to_string_pretty(&advisor.recommend_education(document).await?)?
                }
                RecommendationKind::Jobs => {
                    serde_json::to_string_pretty(&advisor.recommend_jobs(document).await?)?
                }
                RecommendationKind::Courses => {
                    serde_json::to_string_pretty(&advisor.recommend_courses(document).await?)?
                }
                RecommendationKind::Profile => {
                    serde_json::to_string_pretty(&advisor.extract_profile(document).await?)?
                }
            };

            println!("{}", output);
            Ok(())
        }
    }
}

/// JSON lines to `logging.json_file` when configured, console otherwise.
/// `RUST_LOG` overrides the default directive.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    match &settings.json_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(Mutex::new(file))
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
