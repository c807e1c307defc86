//! Address subcommand implementation.
//!
//! Handles the `netcheck address <addr>` command.

use super::{OutputFormat, RangeSelection};
use crate::error::CliResult;
use crate::output;
use crate::types::parse_address_for_tier_range;
use clap::Parser;
use tracing::debug;

/// Validate an IP address with an optional port.
#[derive(Parser, Debug)]
pub struct AddressCommand {
    /// Address to validate
    ///
    /// Examples:
    ///   192.0.2.1            IPv4 address
    ///   192.0.2.1:8080       IPv4 address and port
    ///   2001:db8::1          IPv6 address
    ///   [2001:db8::1]:443    IPv6 address and port (brackets required)
    #[arg(value_name = "ADDRESS", verbatim_doc_comment)]
    pub address: String,

    #[command(flatten)]
    pub range: RangeSelection,
}

impl AddressCommand {
    /// Execute the address command.
    pub fn execute(&self, format: OutputFormat) -> CliResult<()> {
        let range = self.range.tier_range();
        debug!(address = %self.address, %range, "validating address");

        let parsed = parse_address_for_tier_range(&self.address, &range)?;
        output::print_address(&parsed, &range, format)?;
        Ok(())
    }
}
