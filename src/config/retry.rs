//! Retry and backoff configuration for the HTTP client.
//!
//! A [`RetryConfig`] is the raw, deserialisable record. Calling
//! [`RetryConfig::validate`] checks it once and yields a [`RetryPolicy`], the
//! only type a [`crate::client::RetryClient`] can be built from.

use crate::error::{ConfigError, ConfigResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Policy name selecting the default curve.
pub const EMPTY_POLICY: &str = "";
/// Explicit name of the default curve.
pub const DEFAULT_POLICY: &str = "default";
pub const EXPONENTIAL_POLICY: &str = "exponential";
pub const JITTER_POLICY: &str = "jitter";
pub const CONSTANT_POLICY: &str = "const";

/// Every accepted policy name, lowercase.
pub const POLICY_NAMES: [&str; 5] = [
    EMPTY_POLICY,
    DEFAULT_POLICY,
    EXPONENTIAL_POLICY,
    JITTER_POLICY,
    CONSTANT_POLICY,
];

/// Shape of the wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BackoffPolicy {
    /// `min * 2^attempt`, capped at `max`. Honours `Retry-After`.
    #[serde(rename = "exponential")]
    Exponential,
    /// `(min + random[0, max - min)) * (attempt + 1)`.
    #[serde(rename = "jitter")]
    LinearJitter,
    /// Always `min`.
    #[serde(rename = "const")]
    Constant,
}

impl BackoffPolicy {
    /// Look up a policy by name, ignoring ASCII case.
    ///
    /// The empty string selects the same curve as `"default"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            EMPTY_POLICY | DEFAULT_POLICY | EXPONENTIAL_POLICY => Some(Self::Exponential),
            JITTER_POLICY => Some(Self::LinearJitter),
            CONSTANT_POLICY => Some(Self::Constant),
            _ => None,
        }
    }

    /// Wait before retry number `attempt` (0-based).
    ///
    /// `retry_after` is the server-requested wait, only honoured by the
    /// exponential curve.
    pub fn delay(
        self,
        min: Duration,
        max: Duration,
        attempt: u32,
        retry_after: Option<Duration>,
    ) -> Duration {
        match self {
            Self::Exponential => retry_after.unwrap_or_else(|| exponential(min, max, attempt)),
            Self::LinearJitter => linear_jitter(min, max, attempt),
            Self::Constant => min,
        }
    }
}

impl fmt::Display for BackoffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exponential => write!(f, "exponential"),
            Self::LinearJitter => write!(f, "jitter"),
            Self::Constant => write!(f, "const"),
        }
    }
}

fn exponential(min: Duration, max: Duration, attempt: u32) -> Duration {
    2u32.checked_pow(attempt)
        .and_then(|factor| min.checked_mul(factor))
        .map_or(max, |wait| wait.min(max))
}

fn linear_jitter(min: Duration, max: Duration, attempt: u32) -> Duration {
    let factor = attempt.saturating_add(1);
    if max <= min {
        return min.saturating_mul(factor);
    }

    let span = u64::try_from((max - min).as_nanos()).unwrap_or(u64::MAX);
    let jitter = Duration::from_nanos(rand::thread_rng().gen_range(0..span));
    (min + jitter).saturating_mul(factor)
}

/// Raw retry settings as read from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Minimum wait between attempts in milliseconds.
    pub wait_min_ms: u64,
    /// Maximum wait between attempts in milliseconds.
    pub wait_max_ms: u64,
    /// Maximum number of retries after the first attempt.
    pub max_attempts: i64,
    /// Backoff policy name (see [`POLICY_NAMES`]).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            wait_min_ms: 1000,
            wait_max_ms: 30_000,
            max_attempts: 4,
            policy: String::new(),
        }
    }
}

impl RetryConfig {
    pub fn wait_min(&self) -> Duration {
        Duration::from_millis(self.wait_min_ms)
    }

    pub fn wait_max(&self) -> Duration {
        Duration::from_millis(self.wait_max_ms)
    }

    /// Validate the settings and resolve the backoff policy.
    ///
    /// Checks, in order: `wait_min > 0`, `wait_max >= wait_min`,
    /// `max_attempts > 0`, and that the policy name is known.
    pub fn validate(&self) -> ConfigResult<RetryPolicy> {
        let wait_min = self.wait_min();
        let wait_max = self.wait_max();

        valid_durations(Duration::ZERO, wait_min, false)?;
        valid_durations(wait_min, wait_max, true)?;
        valid_positive("max_attempts", self.max_attempts)?;

        let backoff = BackoffPolicy::from_name(&self.policy)
            .ok_or_else(|| ConfigError::InvalidPolicy(self.policy.clone()))?;

        let policy = RetryPolicy {
            wait_min,
            wait_max,
            max_attempts: u32::try_from(self.max_attempts).unwrap_or(u32::MAX),
            backoff,
        };
        debug!(?policy, "validated retry configuration");
        Ok(policy)
    }
}

fn valid_durations(lower: Duration, upper: Duration, equal_allowed: bool) -> ConfigResult<()> {
    let (ok, operator) = if equal_allowed {
        (upper >= lower, "<=")
    } else {
        (upper > lower, "<")
    };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidDurations {
            lower,
            upper,
            operator,
        })
    }
}

fn valid_positive(field: &'static str, value: i64) -> ConfigResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Validated retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    wait_min: Duration,
    wait_max: Duration,
    max_attempts: u32,
    backoff: BackoffPolicy,
}

impl RetryPolicy {
    pub fn wait_min(&self) -> Duration {
        self.wait_min
    }

    pub fn wait_max(&self) -> Duration {
        self.wait_max
    }

    /// Retries allowed after the first attempt.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Wait before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        self.backoff
            .delay(self.wait_min, self.wait_max, attempt, retry_after)
    }

    /// The waits preceding each retry, assuming no `Retry-After` hints.
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.max_attempts)
            .map(|attempt| self.delay_for(attempt, None))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min: u64, max: u64, attempts: i64, policy: &str) -> RetryConfig {
        RetryConfig {
            wait_min_ms: min,
            wait_max_ms: max,
            max_attempts: attempts,
            policy: policy.to_string(),
        }
    }

    #[test]
    fn test_policy_lookup_is_case_insensitive() {
        assert_eq!(BackoffPolicy::from_name("JITTER"), Some(BackoffPolicy::LinearJitter));
        assert_eq!(BackoffPolicy::from_name("Const"), Some(BackoffPolicy::Constant));
        assert_eq!(BackoffPolicy::from_name("Exponential"), Some(BackoffPolicy::Exponential));
        assert_eq!(BackoffPolicy::from_name("linear"), None);
    }

    #[test]
    fn test_empty_policy_matches_default() {
        assert_eq!(BackoffPolicy::from_name(""), BackoffPolicy::from_name("default"));
        assert_eq!(BackoffPolicy::from_name("DEFAULT"), Some(BackoffPolicy::Exponential));
        for name in POLICY_NAMES {
            assert!(BackoffPolicy::from_name(name).is_some());
        }
    }

    #[test]
    fn test_serialized_name_is_accepted_by_lookup() {
        for policy in [
            BackoffPolicy::Exponential,
            BackoffPolicy::LinearJitter,
            BackoffPolicy::Constant,
        ] {
            let value = serde_json::to_value(policy).unwrap();
            let name = value.as_str().unwrap();
            assert_eq!(name, policy.to_string());
            assert_eq!(BackoffPolicy::from_name(name), Some(policy));
        }
    }

    #[test]
    fn test_exponential_backoff() {
        let min = Duration::from_millis(100);
        let max = Duration::from_secs(1);
        let policy = BackoffPolicy::Exponential;
        assert_eq!(policy.delay(min, max, 0, None), Duration::from_millis(100));
        assert_eq!(policy.delay(min, max, 1, None), Duration::from_millis(200));
        assert_eq!(policy.delay(min, max, 3, None), Duration::from_millis(800));
        assert_eq!(policy.delay(min, max, 4, None), max);
        assert_eq!(policy.delay(min, max, 200, None), max);
    }

    #[test]
    fn test_exponential_honours_retry_after() {
        let wait = BackoffPolicy::Exponential.delay(
            Duration::from_millis(100),
            Duration::from_secs(1),
            0,
            Some(Duration::from_secs(7)),
        );
        assert_eq!(wait, Duration::from_secs(7));

        let wait = BackoffPolicy::Constant.delay(
            Duration::from_millis(100),
            Duration::from_secs(1),
            0,
            Some(Duration::from_secs(7)),
        );
        assert_eq!(wait, Duration::from_millis(100));
    }

    #[test]
    fn test_linear_jitter_backoff() {
        let min = Duration::from_millis(100);
        let max = Duration::from_millis(200);
        for attempt in 0..5 {
            let factor = attempt + 1;
            let wait = BackoffPolicy::LinearJitter.delay(min, max, attempt, None);
            assert!(wait >= min * factor);
            assert!(wait < max * factor);
        }
        assert_eq!(
            BackoffPolicy::LinearJitter.delay(min, min, 2, None),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn test_constant_backoff() {
        let min = Duration::from_millis(250);
        assert_eq!(
            BackoffPolicy::Constant.delay(min, Duration::from_secs(5), 9, None),
            min
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let policy = RetryConfig::default().validate().unwrap();
        assert_eq!(policy.wait_min(), Duration::from_secs(1));
        assert_eq!(policy.wait_max(), Duration::from_secs(30));
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.backoff(), BackoffPolicy::Exponential);
    }

    #[test]
    fn test_validate_durations() {
        assert!(matches!(
            config(0, 100, 3, "").validate(),
            Err(ConfigError::InvalidDurations { operator: "<", .. })
        ));
        assert!(matches!(
            config(200, 100, 3, "").validate(),
            Err(ConfigError::InvalidDurations { operator: "<=", .. })
        ));
        assert!(config(100, 100, 3, "").validate().is_ok());
    }

    #[test]
    fn test_validate_attempts() {
        assert!(matches!(
            config(10, 100, 0, "").validate(),
            Err(ConfigError::NotPositive { value: 0, .. })
        ));
        assert!(matches!(
            config(10, 100, -2, "").validate(),
            Err(ConfigError::NotPositive { value: -2, .. })
        ));
    }

    #[test]
    fn test_validate_policy() {
        let err = config(10, 100, 1, "fibonacci").validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid backoff policy fibonacci");

        let policy = config(10, 100, 1, "JiTtEr").validate().unwrap();
        assert_eq!(policy.backoff(), BackoffPolicy::LinearJitter);
    }

    #[test]
    fn test_schedule() {
        let policy = config(100, 1000, 5, "exponential").validate().unwrap();
        let millis: Vec<u128> = policy.schedule().iter().map(Duration::as_millis).collect();
        assert_eq!(millis, vec![100, 200, 400, 800, 1000]);
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let parsed: RetryConfig = serde_json::from_str(r#"{"max_attempts": 2}"#).unwrap();
        assert_eq!(parsed.max_attempts, 2);
        assert_eq!(parsed.wait_min_ms, 1000);
        assert!(parsed.policy.is_empty());
    }
}
