//! Output formatting module.
//!
//! Provides formatters for plain text and JSON output of validation results.

mod json_format;
mod plain;

pub use plain::print_error;

use crate::cli::OutputFormat;
use crate::config::RetryPolicy;
use crate::types::{ParsedAddress, Port, PortTierRange};
use serde::Serialize;
use std::io;

/// Result of a GET request sent with a validated retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlCheck {
    pub url: String,
    pub status: u16,
}

/// Print a validated port.
pub fn print_port(port: Port, range: &PortTierRange, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_port(port, range),
        OutputFormat::Json => json_format::print_port(port, range),
    }
}

/// Print a parsed address.
pub fn print_address(
    parsed: &ParsedAddress,
    range: &PortTierRange,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_address(parsed, range),
        OutputFormat::Json => json_format::print_address(parsed, range),
    }
}

/// Print the port tier table.
pub fn print_tiers(format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_tiers(),
        OutputFormat::Json => json_format::print_tiers(),
    }
}

/// Print a validated retry policy and the optional URL check result.
pub fn print_retry(
    policy: &RetryPolicy,
    check: Option<&UrlCheck>,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_retry(policy, check),
        OutputFormat::Json => json_format::print_retry(policy, check),
    }
}
