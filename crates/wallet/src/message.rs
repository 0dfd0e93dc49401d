use std::time::Duration;

use animetoken_core::ApiError;

/// Freshness window for mint-job request signatures.
pub const MINT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// Freshness window for wallet-linking, burn and collection-delete signatures.
/// These are user-paced flows, so the window is generous.
pub const LINK_FRESHNESS: Duration = Duration::from_secs(60 * 60);

/// Tolerated forward clock skew between client and server, in milliseconds.
pub const CLOCK_SKEW_MS: i64 = 30_000;

const LINK_PREFIX: &str = "I am linking this wallet ";
const LINK_MIDDLE: &str = " to my ANIME.TOKEN account.\n\nTimestamp: ";

/// Build the canonical wallet-linking message.
pub fn link_message(address: &str, timestamp_ms: i64) -> String {
    format!("{LINK_PREFIX}{address}{LINK_MIDDLE}{timestamp_ms}")
}

/// Parse a wallet-linking message back into `(address, timestamp_ms)`.
///
/// Returns `None` on any drift from the canonical template.
pub fn parse_link_message(message: &str) -> Option<(&str, i64)> {
    let rest = message.strip_prefix(LINK_PREFIX)?;
    let (address, ts) = rest.split_once(LINK_MIDDLE)?;
    if address.is_empty() || address.contains(char::is_whitespace) {
        return None;
    }
    let timestamp_ms: i64 = ts.parse().ok()?;
    Some((address, timestamp_ms))
}

/// Extract the trailing `Timestamp: <epoch_ms>` line from a signed message.
pub fn extract_timestamp(message: &str) -> Result<i64, ApiError> {
    message
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix("Timestamp: "))
        .and_then(|ts| ts.trim().parse().ok())
        .ok_or_else(|| ApiError::Validation("message is missing a Timestamp line".into()))
}

/// Enforce the per-endpoint freshness window on a message timestamp.
///
/// Timestamps from the future beyond [`CLOCK_SKEW_MS`] are rejected the same
/// way as stale ones.
pub fn check_freshness(timestamp_ms: i64, now_ms: i64, window: Duration) -> Result<(), ApiError> {
    if timestamp_ms > now_ms + CLOCK_SKEW_MS {
        return Err(ApiError::ExpiredSignature);
    }
    let age_ms = now_ms.saturating_sub(timestamp_ms);
    if age_ms > window.as_millis() as i64 {
        return Err(ApiError::ExpiredSignature);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    #[test]
    fn link_message_round_trips() {
        let msg = link_message(ADDR, 1_700_000_000_000);
        let (address, ts) = parse_link_message(&msg).unwrap();
        assert_eq!(address, ADDR);
        assert_eq!(ts, 1_700_000_000_000);
    }

    #[test]
    fn link_message_rejects_template_drift() {
        assert!(parse_link_message("I am linking wallet x.\n\nTimestamp: 5").is_none());
        // Tampered address containing whitespace
        let msg = link_message("abc def", 5);
        assert!(parse_link_message(&msg).is_none());
        // Non-numeric timestamp
        assert!(parse_link_message(&format!("{LINK_PREFIX}{ADDR}{LINK_MIDDLE}soon")).is_none());
    }

    #[test]
    fn extracts_trailing_timestamp() {
        let msg = format!("Mint request for wallet {ADDR}\n\nTimestamp: 12345");
        assert_eq!(extract_timestamp(&msg).unwrap(), 12345);
    }

    #[test]
    fn missing_timestamp_is_validation_error() {
        let err = extract_timestamp("no timestamp here").unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn fresh_timestamp_passes() {
        let now = 1_700_000_000_000;
        assert!(check_freshness(now - 60_000, now, MINT_FRESHNESS).is_ok());
    }

    #[test]
    fn stale_timestamp_is_expired() {
        let now = 1_700_000_000_000;
        let err = check_freshness(now - 6 * 60 * 1000, now, MINT_FRESHNESS).unwrap_err();
        assert_eq!(err.code(), "expired_signature");
    }

    #[test]
    fn future_timestamp_beyond_skew_is_expired() {
        let now = 1_700_000_000_000;
        assert!(check_freshness(now + CLOCK_SKEW_MS - 1, now, MINT_FRESHNESS).is_ok());
        let err = check_freshness(now + CLOCK_SKEW_MS + 1, now, MINT_FRESHNESS).unwrap_err();
        assert_eq!(err.code(), "expired_signature");
    }

    #[test]
    fn link_window_is_wider_than_mint_window() {
        let now = 1_700_000_000_000;
        let ts = now - 30 * 60 * 1000;
        assert!(check_freshness(ts, now, MINT_FRESHNESS).is_err());
        assert!(check_freshness(ts, now, LINK_FRESHNESS).is_ok());
    }
}
