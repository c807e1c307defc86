//! Port subcommand implementation.
//!
//! Handles the `netcheck port <value>` command.

use super::{OutputFormat, RangeSelection};
use crate::error::CliResult;
use crate::output;
use crate::types::Port;
use clap::Parser;
use tracing::debug;

/// Validate a port number.
#[derive(Parser, Debug)]
pub struct PortCommand {
    /// Port number in base 10 (e.g., "80", "8080", "50000")
    #[arg(value_name = "PORT")]
    pub value: String,

    #[command(flatten)]
    pub range: RangeSelection,
}

impl PortCommand {
    /// Execute the port command.
    pub fn execute(&self, format: OutputFormat) -> CliResult<()> {
        let range = self.range.tier_range();
        debug!(value = %self.value, %range, "validating port");

        let port = Port::from_string(&self.value, &range)?;
        output::print_port(port, &range, format)?;
        Ok(())
    }
}
