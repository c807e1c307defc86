//! Address and optional port parsing.
//!
//! Accepts an IP literal with an optional `:port` suffix:
//! - IPv4: "192.0.2.1", "192.0.2.1:8080"
//! - IPv6: "2001:db8::1", "[2001:db8::1]", "[2001:db8::1]:443"
//! - IPv4-mapped IPv6: "::ffff:192.0.2.1", "[::ffff:192.0.2.1]:80"
//!
//! A port is only recognised when the input has exactly one colon, or when
//! the address part is enclosed in square brackets. Unbracketed IPv6 is
//! always taken as a whole, even if it ends in something that looks like a
//! port number.

use super::port::{Port, PortError, PortTier, PortTierRange};
use serde::Serialize;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use tracing::trace;

/// An IP address with an optional validated port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedAddress {
    /// The address as written, without enclosing brackets.
    pub address: String,
    /// The parsed IP address.
    pub ip: IpAddr,
    /// The port, if the input had one.
    pub port: Option<Port>,
}

impl ParsedAddress {
    /// Check if a port was supplied.
    pub fn has_port(&self) -> bool {
        self.port.is_some()
    }

    /// Check if the address is IPv6 (including IPv4-mapped forms).
    pub fn is_ipv6(&self) -> bool {
        self.ip.is_ipv6()
    }

    /// Combine address and port into a socket address, when a port exists.
    pub fn to_socket_addr(&self) -> Option<SocketAddr> {
        self.port.map(|p| SocketAddr::new(self.ip, p.as_u16()))
    }
}

impl fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) if self.is_ipv6() => write!(f, "[{}]:{}", self.address, port),
            Some(port) => write!(f, "{}:{}", self.address, port),
            None => write!(f, "{}", self.address),
        }
    }
}

impl FromStr for ParsedAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

/// Error type for address parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("invalid IP address '{0}'")]
    InvalidAddress(String),
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Parse an address with an optional port from any tier.
pub fn parse_address(s: &str) -> Result<ParsedAddress, AddressError> {
    parse_address_for_tier_range(s, &PortTierRange::ALL)
}

/// Parse an address whose port, if present, must belong to `tier`.
pub fn parse_address_for_tier(s: &str, tier: PortTier) -> Result<ParsedAddress, AddressError> {
    parse_address_for_tier_range(s, &PortTierRange::single(tier))
}

/// Parse an address whose port, if present, must fall inside `range`.
///
/// The address is checked first, then the port. Nothing is returned unless
/// both are valid.
pub fn parse_address_for_tier_range(
    s: &str,
    range: &PortTierRange,
) -> Result<ParsedAddress, AddressError> {
    let (address, port) = split_address_port(s);

    let ip: IpAddr = address
        .parse()
        .map_err(|_| AddressError::InvalidAddress(address.to_string()))?;

    let port = port
        .map(|p| Port::new_for_tier_range(p, range))
        .transpose()?;

    Ok(ParsedAddress {
        address: address.to_string(),
        ip,
        port,
    })
}

/// Split `s` into its address part and its port segment, if any.
///
/// One leading `[` and one trailing `]` are removed from the address part
/// whether or not a port was found.
pub fn split_address_port(s: &str) -> (&str, Option<&str>) {
    let segments: Vec<&str> = s.split(':').collect();

    let (address, port) = match segments.as_slice() {
        [_] => (s, None),
        [_, _] => split_last_segment(s),
        [first, .., before_last, _] if first.starts_with('[') && before_last.ends_with(']') => {
            split_last_segment(s)
        }
        _ => (s, None),
    };
    trace!(input = s, address, ?port, "split address");

    let address = address.strip_prefix('[').unwrap_or(address);
    let address = address.strip_suffix(']').unwrap_or(address);
    (address, port)
}

fn split_last_segment(s: &str) -> (&str, Option<&str>) {
    match s.rsplit_once(':') {
        Some((address, port)) => (address, Some(port)),
        None => (s, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_split() {
        assert_eq!(split_address_port("192.0.2.1"), ("192.0.2.1", None));
        assert_eq!(split_address_port("192.0.2.1:80"), ("192.0.2.1", Some("80")));
        assert_eq!(split_address_port("[::1]:80"), ("::1", Some("80")));
        assert_eq!(split_address_port("[::1]"), ("::1", None));
        assert_eq!(split_address_port("2001:db8::1:80"), ("2001:db8::1:80", None));
        assert_eq!(split_address_port("host:"), ("host", Some("")));
    }

    #[test]
    fn test_ipv4_with_port() {
        let parsed = parse_address("192.0.2.1:8080").unwrap();
        assert_eq!(parsed.address, "192.0.2.1");
        assert_eq!(parsed.ip, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(parsed.port.map(Port::as_u64), Some(8080));
    }

    #[test]
    fn test_ipv4_without_port() {
        let parsed = parse_address("10.0.0.1").unwrap();
        assert_eq!(parsed.address, "10.0.0.1");
        assert!(!parsed.has_port());
        assert_eq!(parsed.to_socket_addr(), None);
    }

    #[test]
    fn test_bracketed_ipv6_with_port() {
        let parsed = parse_address("[2001:db8::1]:443").unwrap();
        assert_eq!(parsed.address, "2001:db8::1");
        assert!(parsed.is_ipv6());
        assert_eq!(parsed.port.map(Port::as_u64), Some(443));
        assert_eq!(
            parsed.to_socket_addr(),
            Some("[2001:db8::1]:443".parse().unwrap())
        );
    }

    #[test]
    fn test_bare_ipv6() {
        let parsed = parse_address("2001:db8::1").unwrap();
        assert_eq!(parsed.address, "2001:db8::1");
        assert!(parsed.port.is_none());

        let parsed = parse_address("::1").unwrap();
        assert_eq!(parsed.ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[test]
    fn test_bare_ipv6_trailing_number_is_not_a_port() {
        let parsed = parse_address("2001:db8::1:80").unwrap();
        assert_eq!(parsed.address, "2001:db8::1:80");
        assert!(parsed.port.is_none());
    }

    #[test]
    fn test_bracketed_ipv6_without_port() {
        let parsed = parse_address("[fe80::1]").unwrap();
        assert_eq!(parsed.address, "fe80::1");
        assert!(parsed.port.is_none());
    }

    #[test]
    fn test_bracketed_ipv4() {
        let parsed = parse_address("[192.0.2.1]:22").unwrap();
        assert_eq!(parsed.address, "192.0.2.1");
        assert_eq!(parsed.port.map(Port::as_u64), Some(22));
    }

    #[test]
    fn test_ipv4_mapped_ipv6() {
        let parsed = parse_address("::ffff:192.0.2.1").unwrap();
        assert!(parsed.is_ipv6());
        assert!(parsed.port.is_none());

        let parsed = parse_address("[::ffff:192.0.2.1]:8443").unwrap();
        assert_eq!(parsed.address, "::ffff:192.0.2.1");
        assert_eq!(parsed.port.map(Port::as_u64), Some(8443));
    }

    #[test]
    fn test_invalid_address() {
        let err = parse_address("999.999.999.999").unwrap_err();
        assert_eq!(err, AddressError::InvalidAddress("999.999.999.999".to_string()));
        assert_eq!(err.to_string(), "invalid IP address '999.999.999.999'");

        assert!(matches!(
            parse_address("example.com:80"),
            Err(AddressError::InvalidAddress(a)) if a == "example.com"
        ));
        assert!(matches!(parse_address(""), Err(AddressError::InvalidAddress(_))));
        // Too many colons without brackets: the whole string is the address
        assert!(matches!(
            parse_address("10.0.0.1:80:90"),
            Err(AddressError::InvalidAddress(a)) if a == "10.0.0.1:80:90"
        ));
    }

    #[test]
    fn test_port_out_of_range() {
        let err = parse_address("10.0.0.1:99999").unwrap_err();
        assert!(matches!(
            err,
            AddressError::Port(PortError::OutOfRange { port: 99999, .. })
        ));
        assert_eq!(err.to_string(), "invalid port 99999");
    }

    #[test]
    fn test_malformed_port() {
        assert!(matches!(
            parse_address("10.0.0.1:http"),
            Err(AddressError::Port(PortError::InvalidFormat(_)))
        ));
        assert!(matches!(
            parse_address("[::1]:"),
            Err(AddressError::Port(PortError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_address_checked_before_port() {
        assert!(matches!(
            parse_address("bad:99999"),
            Err(AddressError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_tier_restricted_port() {
        assert!(parse_address_for_tier_range("10.0.0.1:80", &PortTierRange::NON_DYNAMIC).is_ok());
        let err =
            parse_address_for_tier_range("10.0.0.1:80", &PortTierRange::NON_SYSTEM).unwrap_err();
        assert!(matches!(&err, AddressError::Port(e) if e.is_tier_mismatch()));

        assert!(parse_address_for_tier("[::1]:50000", PortTier::Dynamic).is_ok());
        assert!(parse_address_for_tier("[::1]:5000", PortTier::Dynamic).is_err());
        // No port means nothing to restrict
        assert!(parse_address_for_tier("::1", PortTier::Dynamic).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            parse_address("[2001:db8::1]:443").unwrap().to_string(),
            "[2001:db8::1]:443"
        );
        assert_eq!(parse_address("192.0.2.1:80").unwrap().to_string(), "192.0.2.1:80");
        assert_eq!(parse_address("[::1]").unwrap().to_string(), "::1");
    }

    #[test]
    fn test_from_str() {
        let parsed: ParsedAddress = "127.0.0.1:8080".parse().unwrap();
        assert_eq!(parsed.port, Some(Port::new(8080u64).unwrap()));
    }
}
