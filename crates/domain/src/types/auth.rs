//! OAuth access token model

use chrono::{DateTime, Duration, Utc};

/// Access token granted for a single authorization scope.
///
/// Tokens live in memory only; they are replaced each time the identity
/// provider issues a new one for the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Scope the token was requested for (e.g. `api_infotravailv1`)
    pub scope: String,

    /// Bearer value sent in the `Authorization` header
    pub value: String,

    /// Absolute expiration timestamp (UTC)
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token expiring `expires_in_secs` seconds after `issued_at`.
    ///
    /// Returns `None` when the expiry is not a representable timestamp.
    #[must_use]
    pub fn new(
        scope: impl Into<String>,
        value: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_in_secs: i64,
    ) -> Option<Self> {
        let expires_at = Duration::try_seconds(expires_in_secs)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))?;
        Some(Self { scope: scope.into(), value: value.into(), expires_at })
    }

    /// Whether the token is still usable for at least `margin` after `now`.
    ///
    /// Reuse requires `now + margin < expires_at`, strictly. A margin
    /// reaching past the end of time never validates.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now.checked_add_signed(margin).is_some_and(|limit| limit < self.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, 11, 0, 0, 0).unwrap()
    }

    #[test]
    fn token_is_valid_well_before_expiry() {
        let token = AccessToken::new("api_infotravailv1", "foobar", issued(), 500).unwrap();

        let now = issued() + Duration::seconds(40);
        assert!(token.is_valid_at(now, Duration::seconds(5)));
    }

    #[test]
    fn token_is_invalid_once_margin_reaches_expiry() {
        let token = AccessToken::new("api_infotravailv1", "foobar", issued(), 20).unwrap();

        // now + margin == expires_at is already too late
        let now = issued() + Duration::seconds(15);
        assert!(!token.is_valid_at(now, Duration::seconds(5)));

        let later = issued() + Duration::seconds(40);
        assert!(!token.is_valid_at(later, Duration::seconds(5)));
    }

    #[test]
    fn out_of_range_lifetime_is_rejected() {
        assert!(AccessToken::new("api_infotravailv1", "foobar", issued(), 9_000_000_000_000_000).is_none());
        assert!(AccessToken::new("api_infotravailv1", "foobar", issued(), i64::MAX).is_none());
    }

    #[test]
    fn oversized_margin_never_validates() {
        let token = AccessToken::new("api_infotravailv1", "foobar", issued(), 500).unwrap();

        assert!(!token.is_valid_at(issued(), Duration::MAX));
    }
}
