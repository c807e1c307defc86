//! JSON output formatting.

use super::UrlCheck;
use crate::config::RetryPolicy;
use crate::types::{ParsedAddress, Port, PortTier, PortTierRange};
use serde_json::{json, Value};
use std::io;

fn emit(value: &Value) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

pub(super) fn port_value(port: Port, range: &PortTierRange) -> Value {
    json!({
        "port": port,
        "tier": port.tier(),
        "range": range.to_string(),
    })
}

pub(super) fn address_value(parsed: &ParsedAddress, range: &PortTierRange) -> Value {
    json!({
        "address": parsed.address,
        "ip": parsed.ip,
        "ipv6": parsed.is_ipv6(),
        "port": parsed.port,
        "tier": parsed.port.map(Port::tier),
        "range": range.to_string(),
    })
}

pub(super) fn tiers_value() -> Value {
    let tiers: Vec<Value> = PortTier::ALL
        .iter()
        .map(|tier| {
            let (min, max) = tier.bounds();
            json!({ "tier": tier, "min": min, "max": max })
        })
        .collect();
    let ranges: Vec<Value> = [
        ("all", PortTierRange::ALL),
        ("non_system", PortTierRange::NON_SYSTEM),
        ("non_dynamic", PortTierRange::NON_DYNAMIC),
    ]
    .iter()
    .map(|(name, range)| {
        let (min, max) = range.bounds();
        json!({
            "name": name,
            "min_tier": range.min_tier(),
            "max_tier": range.max_tier(),
            "min": min,
            "max": max,
        })
    })
    .collect();
    json!({ "tiers": tiers, "ranges": ranges })
}

pub(super) fn retry_value(policy: &RetryPolicy, check: Option<&UrlCheck>) -> Value {
    let schedule: Vec<u128> = policy
        .schedule()
        .iter()
        .map(|wait| wait.as_millis())
        .collect();
    json!({
        "policy": policy.backoff(),
        "wait_min_ms": policy.wait_min().as_millis(),
        "wait_max_ms": policy.wait_max().as_millis(),
        "max_attempts": policy.max_attempts(),
        "schedule_ms": schedule,
        "check": check,
    })
}

/// Print a validated port in JSON format.
pub fn print_port(port: Port, range: &PortTierRange) -> io::Result<()> {
    emit(&port_value(port, range))
}

/// Print a parsed address in JSON format.
pub fn print_address(parsed: &ParsedAddress, range: &PortTierRange) -> io::Result<()> {
    emit(&address_value(parsed, range))
}

/// Print the tier table in JSON format.
pub fn print_tiers() -> io::Result<()> {
    emit(&tiers_value())
}

/// Print a retry policy, and the URL check if one ran, in JSON format.
pub fn print_retry(policy: &RetryPolicy, check: Option<&UrlCheck>) -> io::Result<()> {
    emit(&retry_value(policy, check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::types::parse_address;

    #[test]
    fn test_address_value() {
        let parsed = parse_address("[2001:db8::1]:443").unwrap();
        let value = address_value(&parsed, &PortTierRange::ALL);
        assert_eq!(value["address"], "2001:db8::1");
        assert_eq!(value["port"], 443);
        assert_eq!(value["tier"], "system");
        assert_eq!(value["ipv6"], true);
    }

    #[test]
    fn test_address_value_without_port() {
        let parsed = parse_address("10.0.0.1").unwrap();
        let value = address_value(&parsed, &PortTierRange::ALL);
        assert!(value["port"].is_null());
        assert!(value["tier"].is_null());
    }

    #[test]
    fn test_tiers_value() {
        let value = tiers_value();
        assert_eq!(value["tiers"][1]["tier"], "registered");
        assert_eq!(value["tiers"][1]["min"], 1024);
        assert_eq!(value["ranges"][1]["min"], 1024);
        assert_eq!(value["ranges"][2]["max"], 49151);
    }

    #[test]
    fn test_retry_value_carries_check_result() {
        let policy = RetryConfig::default().validate().unwrap();
        let check = UrlCheck {
            url: "http://localhost:8080/health".to_string(),
            status: 200,
        };

        let value = retry_value(&policy, Some(&check));
        assert_eq!(value["policy"], "exponential");
        assert_eq!(value["check"]["url"], "http://localhost:8080/health");
        assert_eq!(value["check"]["status"], 200);

        let value = retry_value(&policy, None);
        assert!(value["check"].is_null());
        assert_eq!(value["schedule_ms"].as_array().unwrap().len(), 4);
    }
}
