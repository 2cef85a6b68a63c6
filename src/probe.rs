//! Name server census and reachability.

use std::path::Path;

use crate::config::RunParameters;
use crate::error::{CheckError, Result};
use crate::system::System;

/// Echo requests sent to each name server.
pub const PING_COUNT: u32 = 2;

/// Checks that the configured server count is within `params`.
///
/// Duplicate entries count once per occurrence.
///
/// # Errors
///
/// [`CheckError::TooFewNameservers`] or [`CheckError::TooManyNameservers`].
pub fn census(nameservers: &[String], params: &RunParameters, source: &Path) -> Result<()> {
    let count = nameservers.len();
    if count < params.min_nameservers() {
        return Err(CheckError::TooFewNameservers {
            count,
            min: params.min_nameservers(),
            path: source.to_path_buf(),
        });
    }
    if count > params.max_nameservers() {
        return Err(CheckError::TooManyNameservers {
            count,
            max: params.max_nameservers(),
            path: source.to_path_buf(),
        });
    }
    Ok(())
}

/// Pings every server once, stopping at the first that loses every packet.
///
/// # Errors
///
/// [`CheckError::Unreachable`] on total loss or when `ping` printed no
/// statistics (e.g. `connect: Network is unreachable`), and
/// [`CheckError::ToolFailed`] if `ping` cannot be run.
pub fn reachability(system: &dyn System, nameservers: &[String]) -> Result<()> {
    for server in nameservers {
        let output = system
            .ping(server, PING_COUNT)
            .map_err(|source| CheckError::ToolFailed {
                tool: "ping",
                source,
            })?;

        let Some(loss) = packet_loss(&output) else {
            tracing::warn!(server = %server, "Ping printed no statistics");
            return Err(CheckError::Unreachable {
                server: server.clone(),
                detail: no_statistics_detail(&output),
            });
        };

        tracing::debug!(server = %server, loss, "Pinged nameserver");
        if loss >= 100.0 {
            tracing::warn!(server = %server, "Nameserver unreachable");
            return Err(CheckError::Unreachable {
                server: server.clone(),
                detail: "100% packet loss".to_string(),
            });
        }
    }
    Ok(())
}

// First non-empty line ping printed, or a fixed phrase when it was silent.
fn no_statistics_detail(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map_or_else(|| "no statistics".to_string(), |line| format!("\"{line}\""))
}

/// Extracts the loss percentage from a ping summary line such as
/// `2 packets transmitted, 0 received, 100% packet loss, time 1001ms`.
#[must_use]
pub fn packet_loss(output: &str) -> Option<f64> {
    output
        .lines()
        .flat_map(|line| line.split(','))
        .find(|field| field.contains("packet loss"))
        .and_then(|field| field.split_whitespace().find(|word| word.ends_with('%')))
        .and_then(|word| word.trim_end_matches('%').parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("10.0.0.{i}")).collect()
    }

    #[test]
    fn census_passes_only_within_bounds() {
        let source = Path::new("/etc/resolv.conf");
        for min in 1..=3 {
            for max in min..=3 {
                let params = RunParameters::new(min, max).unwrap();
                for count in 0..=5 {
                    let result = census(&servers(count), &params, source);
                    #[allow(clippy::cast_possible_wrap)]
                    let within = (min..=max).contains(&(count as i64));
                    assert_eq!(result.is_ok(), within, "min={min} max={max} count={count}");
                }
            }
        }
    }

    #[test]
    fn census_messages() {
        let source = Path::new("/etc/resolv.conf");
        let err = census(&servers(1), &RunParameters::default(), source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Only 1 nameserver entries found in /etc/resolv.conf, it should contain at least 2."
        );

        let err = census(&servers(4), &RunParameters::default(), source).unwrap_err();
        assert!(err.to_string().contains("no more than 3"));
    }

    #[test]
    fn duplicates_are_counted() {
        let dup = vec!["10.0.0.1".to_string(), "10.0.0.1".to_string()];
        assert!(census(&dup, &RunParameters::default(), Path::new("r")).is_ok());
    }

    #[test]
    fn parses_linux_and_aix_summaries() {
        let linux = "PING 10.0.0.1 (10.0.0.1) 56(84) bytes of data.\n\n--- 10.0.0.1 ping statistics ---\n2 packets transmitted, 0 received, 100% packet loss, time 1017ms\n";
        assert_eq!(packet_loss(linux), Some(100.0));

        let aix = "----10.0.0.1 PING Statistics----\n2 packets transmitted, 1 packets received, 50% packet loss\n";
        assert_eq!(packet_loss(aix), Some(50.0));

        let busybox = "2 packets transmitted, 2 packets received, 0.0% packet loss\n";
        assert_eq!(packet_loss(busybox), Some(0.0));

        assert_eq!(packet_loss("ping: unknown host"), None);
    }

    #[test]
    fn ping_without_statistics_quotes_its_complaint() {
        assert_eq!(
            no_statistics_detail("\nping: connect: Network is unreachable\n"),
            "\"ping: connect: Network is unreachable\""
        );
        assert_eq!(no_statistics_detail(""), "no statistics");
    }
}
