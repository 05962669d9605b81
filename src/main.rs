use anyhow::Result;
use career_advisor::cli::{handle_command, AdvisorCli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    handle_command(AdvisorCli::parse()).await
}
