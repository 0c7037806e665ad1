use std::str::FromStr;
use std::time::Duration;
use anyhow::{Result, Context};

pub fn parse_duration(duration_str: &str) -> Result<Duration> {
    humantime::Duration::from_str(duration_str.trim())
        .map(|d| d.into())
        .with_context(|| format!("Invalid duration format: {}", duration_str))
}

/// Human-readable rendering used in status log lines, e.g. `5m` or `1s 500ms`.
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration(" 500ms ").unwrap(), Duration::from_millis(500));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(300)), "5m");
    }
}
