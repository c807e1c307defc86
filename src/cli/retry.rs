//! Retry subcommand implementation.
//!
//! Handles the `netcheck retry` command: loads a retry configuration,
//! validates it and optionally checks a URL with the resulting client.

use super::OutputFormat;
use crate::client::RetryClient;
use crate::config::RetryConfig;
use crate::error::CliResult;
use crate::output::{self, UrlCheck};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// Validate a retry configuration.
#[derive(Parser, Debug)]
pub struct RetryCommand {
    /// Configuration file (JSON or YAML); defaults to the user config directory
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the minimum wait in milliseconds
    #[arg(long, value_name = "MS")]
    pub wait_min_ms: Option<u64>,

    /// Override the maximum wait in milliseconds
    #[arg(long, value_name = "MS")]
    pub wait_max_ms: Option<u64>,

    /// Override the number of retries
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub max_attempts: Option<i64>,

    /// Override the backoff policy (default, exponential, jitter, const)
    #[arg(long, value_name = "NAME")]
    pub policy: Option<String>,

    /// Send a GET request to this URL using the validated policy
    #[arg(long, value_name = "URL")]
    pub check: Option<String>,
}

impl RetryCommand {
    /// Build the configuration from the file and command-line overrides.
    pub fn load_config(&self) -> CliResult<RetryConfig> {
        let mut config = match &self.config {
            Some(path) => RetryConfig::load_from(path)?,
            None => RetryConfig::load()?,
        };

        if let Some(ms) = self.wait_min_ms {
            config.wait_min_ms = ms;
        }
        if let Some(ms) = self.wait_max_ms {
            config.wait_max_ms = ms;
        }
        if let Some(n) = self.max_attempts {
            config.max_attempts = n;
        }
        if let Some(policy) = &self.policy {
            config.policy = policy.clone();
        }
        Ok(config)
    }

    /// Execute the retry command.
    pub async fn execute(&self, format: OutputFormat, quiet: bool) -> CliResult<()> {
        let config = self.load_config()?;
        debug!(?config, "loaded retry configuration");

        let policy = config.validate()?;

        let check = match &self.check {
            Some(url) => {
                let client = RetryClient::new(policy);
                let response = client.execute(client.get(url)).await?;
                Some(UrlCheck {
                    url: url.clone(),
                    status: response.status().as_u16(),
                })
            }
            None => None,
        };

        // Quiet only silences the plain report of a successful check.
        if quiet && check.is_some() && format == OutputFormat::Plain {
            return Ok(());
        }
        output::print_retry(&policy, check.as_ref(), format)?;
        Ok(())
    }
}
