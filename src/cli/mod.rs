//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `netcheck port <value>` - Validate a port number
//! - `netcheck address <addr>` - Validate an address with optional port
//! - `netcheck tiers` - Show the port tier table
//! - `netcheck retry` - Validate a retry configuration

mod address;
mod port;
mod retry;

pub use address::AddressCommand;
pub use port::PortCommand;
pub use retry::RetryCommand;

use crate::error::CliResult;
use crate::output;
use crate::types::{PortTier, PortTierRange};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// netcheck - Port tier and network address validation.
///
/// Validates port numbers against the system, registered and dynamic tiers,
/// parses IPv4/IPv6 addresses with optional ports, and checks retry/backoff
/// configurations for the HTTP client.
#[derive(Parser, Debug)]
#[command(name = "netcheck")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate ports, addresses and retry settings", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for results
    #[arg(short, long, global = true, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a port number
    #[command(alias = "p")]
    Port(PortCommand),

    /// Validate an IP address with an optional port
    #[command(alias = "a")]
    Address(AddressCommand),

    /// Show the port tier boundaries
    #[command(alias = "t")]
    Tiers,

    /// Validate a retry configuration and show its backoff schedule
    #[command(alias = "r")]
    Retry(RetryCommand),
}

impl Cli {
    /// Execute the selected subcommand.
    pub async fn run(&self) -> CliResult<()> {
        match &self.command {
            Commands::Port(cmd) => cmd.execute(self.output),
            Commands::Address(cmd) => cmd.execute(self.output),
            Commands::Tiers => Ok(output::print_tiers(self.output)?),
            Commands::Retry(cmd) => cmd.execute(self.output, self.quiet).await,
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Predefined tier ranges selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RangeArg {
    /// Every port (0-65535)
    #[default]
    All,
    /// Registered and dynamic ports (1024-65535)
    NonSystem,
    /// System and registered ports (0-49151)
    NonDynamic,
}

impl From<RangeArg> for PortTierRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::All => PortTierRange::ALL,
            RangeArg::NonSystem => PortTierRange::NON_SYSTEM,
            RangeArg::NonDynamic => PortTierRange::NON_DYNAMIC,
        }
    }
}

/// Port tier restriction shared by the `port` and `address` commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct RangeSelection {
    /// Accepted tier range
    #[arg(short, long, value_enum, default_value = "all")]
    pub range: RangeArg,

    /// Accept a single tier only
    #[arg(short, long, value_enum, conflicts_with = "range")]
    pub tier: Option<PortTier>,
}

impl RangeSelection {
    /// The tier range to validate against.
    pub fn tier_range(&self) -> PortTierRange {
        self.tier
            .map_or_else(|| self.range.into(), PortTierRange::single)
    }
}
