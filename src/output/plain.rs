//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::UrlCheck;
use crate::config::RetryPolicy;
use crate::types::{ParsedAddress, Port, PortTier, PortTierRange};
use console::style;
use std::io::{self, Write};
use std::time::Duration;

const RULE: &str = "═══════════════════════════════════════════════════════════════";

fn print_header(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                    {} {}",
        style("netcheck").cyan().bold(),
        title
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)
}

/// Print a validated port.
pub fn print_port(port: Port, range: &PortTierRange) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(
        out,
        "{} {} {} tier, allowed by {}",
        style("✓").green().bold(),
        style(port).white().bold(),
        style(port.tier()).yellow(),
        range
    )
}

/// Print a parsed address and its port, if any.
pub fn print_address(parsed: &ParsedAddress, range: &PortTierRange) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let family = if parsed.is_ipv6() { "IPv6" } else { "IPv4" };
    writeln!(
        out,
        "  {} {} ({})",
        style("Address:").bold(),
        style(&parsed.address).white().bold(),
        family
    )?;
    match parsed.port {
        Some(port) => writeln!(
            out,
            "  {} {} ({} tier, allowed by {})",
            style("Port:").bold(),
            style(port).white().bold(),
            style(port.tier()).yellow(),
            range
        ),
        None => writeln!(out, "  {} {}", style("Port:").bold(), style("none").dim()),
    }
}

/// Print the tier boundary table.
pub fn print_tiers() -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    print_header(&mut out, "Port Tiers")?;
    writeln!(
        out,
        "  {:<12} {:>7} {:>7}",
        style("TIER").bold(),
        style("MIN").bold(),
        style("MAX").bold()
    )?;
    for tier in PortTier::ALL {
        let (min, max) = tier.bounds();
        writeln!(out, "  {:<12} {:>7} {:>7}", style(tier).yellow(), min, max)?;
    }
    writeln!(out)?;

    for (name, range) in [
        ("all", PortTierRange::ALL),
        ("non-system", PortTierRange::NON_SYSTEM),
        ("non-dynamic", PortTierRange::NON_DYNAMIC),
    ] {
        let (min, max) = range.bounds();
        writeln!(
            out,
            "  {:<12} {:>7} {:>7}  {}",
            style(name).cyan(),
            min,
            max,
            style(range).dim()
        )?;
    }
    writeln!(out)
}

/// Print a validated retry policy, its backoff schedule and the URL check
/// result, if any.
pub fn print_retry(policy: &RetryPolicy, check: Option<&UrlCheck>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    print_header(&mut out, "Retry Policy")?;
    writeln!(
        out,
        "  {} {}",
        style("Policy:").bold(),
        style(policy.backoff()).yellow()
    )?;
    writeln!(
        out,
        "  {} {} - {}",
        style("Wait:").bold(),
        format_duration(policy.wait_min()),
        format_duration(policy.wait_max())
    )?;
    writeln!(
        out,
        "  {} {}",
        style("Retries:").bold(),
        policy.max_attempts()
    )?;
    writeln!(out)?;

    let mut total = Duration::ZERO;
    for (i, wait) in policy.schedule().into_iter().enumerate() {
        total += wait;
        writeln!(
            out,
            "  {} retry {:<3} after {:>10}  {}",
            style("•").dim(),
            i + 1,
            format_duration(wait),
            style(format!("(t+{})", format_duration(total))).dim()
        )?;
    }
    writeln!(out)?;

    if let Some(check) = check {
        writeln!(
            out,
            "{} {} responded {}",
            style("✓").green().bold(),
            check.url,
            check.status
        )?;
    }
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Render a duration with the largest sensible unit.
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}ms", d.as_millis())
    }
}
