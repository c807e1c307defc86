//! Configuration management for netcheck.
//!
//! Holds the retry/backoff settings used to build the HTTP client and the
//! XDG-compliant paths they are loaded from.

mod retry;
mod settings;

pub use retry::{
    BackoffPolicy, RetryConfig, RetryPolicy, CONSTANT_POLICY, DEFAULT_POLICY, EMPTY_POLICY,
    EXPONENTIAL_POLICY, JITTER_POLICY, POLICY_NAMES,
};
pub use settings::Paths;
