//! Port types with tier classification and validation.
//!
//! Port numbers are split into three contiguous tiers: system (well-known),
//! registered and dynamic (ephemeral). A `PortTierRange` selects a span of
//! adjacent tiers, and a `Port` can only be obtained for a value that lies
//! inside the requested span.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest system port.
pub const MIN_SYSTEM: u64 = 0;
/// Highest system port.
pub const MAX_SYSTEM: u64 = 1023;
/// Lowest registered port.
pub const MIN_REGISTERED: u64 = 1024;
/// Highest registered port.
pub const MAX_REGISTERED: u64 = 49151;
/// Lowest dynamic port.
pub const MIN_DYNAMIC: u64 = 49152;
/// Highest dynamic port, and the highest valid port overall.
pub const MAX_DYNAMIC: u64 = 65535;
/// One past the highest port. Any value at or above it is "not set".
pub const INVALID: u64 = 65536;

// Indexed by `PortTier as usize`.
const TIER_BOUNDS: [(u64, u64); 3] = [
    (MIN_SYSTEM, MAX_SYSTEM),
    (MIN_REGISTERED, MAX_REGISTERED),
    (MIN_DYNAMIC, MAX_DYNAMIC),
];

/// IANA port category.
///
/// The declaration order is significant: each tier owns the numeric interval
/// directly above the previous one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PortTier {
    /// System or well-known ports (0-1023)
    System = 0,
    /// Registered ports (1024-49151)
    Registered = 1,
    /// Dynamic, private or ephemeral ports (49152-65535)
    Dynamic = 2,
}

impl PortTier {
    /// All tiers in ascending order.
    pub const ALL: [PortTier; 3] = [Self::System, Self::Registered, Self::Dynamic];

    /// The inclusive numeric interval owned by this tier.
    #[inline]
    pub const fn bounds(self) -> (u64, u64) {
        TIER_BOUNDS[self as usize]
    }

    /// Lowest port number of this tier.
    #[inline]
    pub const fn first_port(self) -> u64 {
        self.bounds().0
    }

    /// Highest port number of this tier.
    #[inline]
    pub const fn last_port(self) -> u64 {
        self.bounds().1
    }

    /// Classify a raw number, returning `None` for values that are not ports.
    pub const fn of(n: u64) -> Option<Self> {
        match n {
            MIN_SYSTEM..=MAX_SYSTEM => Some(Self::System),
            MIN_REGISTERED..=MAX_REGISTERED => Some(Self::Registered),
            MIN_DYNAMIC..=MAX_DYNAMIC => Some(Self::Dynamic),
            _ => None,
        }
    }

    /// Lowercase name, as used in configuration and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Registered => "registered",
            Self::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for PortTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An inclusive span of adjacent tiers, `min <= max`.
///
/// Use the predefined [`PortTierRange::ALL`], [`PortTierRange::NON_SYSTEM`]
/// and [`PortTierRange::NON_DYNAMIC`], or build one with
/// [`PortTierRange::new`] / [`PortTierRange::single`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PortTierRange {
    min: PortTier,
    max: PortTier,
}

impl PortTierRange {
    /// Every port: system through dynamic.
    pub const ALL: Self = Self {
        min: PortTier::System,
        max: PortTier::Dynamic,
    };

    /// Registered and dynamic ports.
    pub const NON_SYSTEM: Self = Self {
        min: PortTier::Registered,
        max: PortTier::Dynamic,
    };

    /// System and registered ports.
    pub const NON_DYNAMIC: Self = Self {
        min: PortTier::System,
        max: PortTier::Registered,
    };

    /// Create a range spanning `min` through `max`.
    pub fn new(min: PortTier, max: PortTier) -> Result<Self, PortError> {
        if min > max {
            return Err(PortError::InvalidTierRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// A range covering exactly one tier.
    pub const fn single(tier: PortTier) -> Self {
        Self {
            min: tier,
            max: tier,
        }
    }

    /// Lowest tier of the range.
    pub const fn min_tier(&self) -> PortTier {
        self.min
    }

    /// Highest tier of the range.
    pub const fn max_tier(&self) -> PortTier {
        self.max
    }

    /// The contiguous numeric interval covered by the range.
    #[inline]
    pub const fn bounds(&self) -> (u64, u64) {
        (self.min.first_port(), self.max.last_port())
    }

    /// Check whether `n` lies inside the range.
    #[inline]
    pub const fn contains(&self, n: u64) -> bool {
        let (low, high) = self.bounds();
        n >= low && n <= high
    }
}

impl Default for PortTierRange {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for PortTierRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// True iff `n` is below the "not set" sentinel.
#[inline]
pub const fn is_set(n: u64) -> bool {
    n < INVALID
}

/// True iff `n` is a port number in any tier.
#[inline]
pub const fn is_valid(n: u64) -> bool {
    PortTierRange::ALL.contains(n)
}

/// True iff `n` lies within exactly `tier`.
#[inline]
pub const fn is_valid_for_tier(n: u64, tier: PortTier) -> bool {
    PortTierRange::single(tier).contains(n)
}

/// True iff a range is given and `n` lies within it.
#[inline]
pub fn is_valid_for_tier_range(n: u64, range: Option<&PortTierRange>) -> bool {
    range.is_some_and(|r| r.contains(n))
}

/// Raw input accepted by the `Port` constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortInput<'a> {
    /// A base-10 string such as `"8080"`.
    Text(&'a str),
    /// An already numeric value.
    Number(u64),
}

impl<'a> From<&'a str> for PortInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for PortInput<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s.as_str())
    }
}

impl From<u64> for PortInput<'_> {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<u16> for PortInput<'_> {
    fn from(n: u16) -> Self {
        Self::Number(u64::from(n))
    }
}

impl PortInput<'_> {
    fn to_number(self) -> Result<u64, PortError> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(s) => {
                // u64::from_str tolerates a leading '+', plain digits only here
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(PortError::InvalidFormat(s.to_string()));
                }
                s.parse()
                    .map_err(|_| PortError::InvalidFormat(s.to_string()))
            }
        }
    }
}

/// A validated TCP/UDP port number.
///
/// A `Port` only exists for values that passed validation against some tier
/// range, so it always lies in 0-65535. "No port" is `Option<Port>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Port(u64);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u64 = MIN_SYSTEM;
    /// Maximum valid port number.
    pub const MAX: u64 = MAX_DYNAMIC;

    /// Create a port from any tier.
    pub fn new<'a>(input: impl Into<PortInput<'a>>) -> Result<Self, PortError> {
        Self::new_for_tier_range(input, &PortTierRange::ALL)
    }

    /// Create a port that must belong to `tier`.
    pub fn new_for_tier<'a>(
        input: impl Into<PortInput<'a>>,
        tier: PortTier,
    ) -> Result<Self, PortError> {
        Self::new_for_tier_range(input, &PortTierRange::single(tier))
    }

    /// Create a port that must fall inside `range`.
    ///
    /// Strings must be plain base-10 digits that fit in 64 bits, anything
    /// else is [`PortError::InvalidFormat`]. A well-formed number outside the
    /// range is [`PortError::OutOfRange`].
    pub fn new_for_tier_range<'a>(
        input: impl Into<PortInput<'a>>,
        range: &PortTierRange,
    ) -> Result<Self, PortError> {
        let n = input.into().to_number()?;
        if range.contains(n) {
            Ok(Self(n))
        } else {
            Err(PortError::OutOfRange {
                port: n,
                range: *range,
            })
        }
    }

    /// Parse a base-10 string.
    pub fn from_string(s: &str, range: &PortTierRange) -> Result<Self, PortError> {
        Self::new_for_tier_range(s, range)
    }

    /// Validate an integer.
    pub fn from_integer(n: u64, range: &PortTierRange) -> Result<Self, PortError> {
        Self::new_for_tier_range(n, range)
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Get the port as a `u16`, lossless for every constructed port.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0 as u16
    }

    /// Always true for a constructed port.
    #[inline]
    pub const fn is_set(self) -> bool {
        is_set(self.0)
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        is_valid(self.0)
    }

    #[inline]
    pub const fn is_valid_for_tier(self, tier: PortTier) -> bool {
        is_valid_for_tier(self.0, tier)
    }

    #[inline]
    pub const fn is_valid_for_tier_range(self, range: &PortTierRange) -> bool {
        range.contains(self.0)
    }

    /// The tier this port belongs to.
    pub const fn tier(self) -> PortTier {
        match PortTier::of(self.0) {
            Some(tier) => tier,
            None => PortTier::Dynamic,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<u64> for Port {
    type Error = PortError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u64 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.as_u16()
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port number: {0}")]
    InvalidFormat(String),
    #[error("invalid port {port}")]
    OutOfRange { port: u64, range: PortTierRange },
    #[error("invalid port tier range: {min} > {max}")]
    InvalidTierRange { min: PortTier, max: PortTier },
}

impl PortError {
    /// True when the number is a real port that merely falls outside the
    /// requested tiers, as opposed to a number beyond 65535.
    pub fn is_tier_mismatch(&self) -> bool {
        matches!(self, Self::OutOfRange { port, .. } if is_valid(*port))
    }
}
