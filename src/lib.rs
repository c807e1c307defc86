//! # netcheck - Port Tier and Address Validation
//!
//! netcheck validates TCP/UDP port numbers against the IANA port tiers and
//! parses IP address strings with an optional port, without any network I/O.
//! It also validates the retry/backoff settings of a retrying HTTP client.
//!
//! ## Features
//!
//! - **Port Tiers**: System (0-1023), Registered (1024-49151) and Dynamic
//!   (49152-65535), with range checks over any span of adjacent tiers
//! - **Address Parsing**: IPv4, IPv6 and IPv4-mapped IPv6, bracketed or not,
//!   with an optional `:port`
//! - **Retry Configuration**: Exponential, jittered and constant backoff,
//!   validated once before a client can be built
//!
//! ## Example Usage
//!
//! ```rust
//! use netcheck::types::{parse_address, Port, PortTier, PortTierRange};
//!
//! let parsed = parse_address("[2001:db8::1]:443").unwrap();
//! assert_eq!(parsed.address, "2001:db8::1");
//! assert_eq!(parsed.port.map(|p| p.tier()), Some(PortTier::System));
//!
//! assert!(Port::from_string("80", &PortTierRange::NON_SYSTEM).is_err());
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - `Port`, port tiers and address parsing
//! - [`config`] - Retry configuration and its on-disk location
//! - [`client`] - Retrying HTTP client built from a validated policy
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod types;

// Re-export commonly used types
pub use client::RetryClient;
pub use config::{BackoffPolicy, RetryConfig, RetryPolicy};
pub use error::{CliError, ClientError, ConfigError};
pub use types::{
    parse_address, AddressError, ParsedAddress, Port, PortError, PortTier, PortTierRange,
};
