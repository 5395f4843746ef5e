use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim set carried by every identity token.
///
/// Access and refresh tokens share this shape; only the lifetime used to
/// compute `exp` differs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` issued at `issued_at`, expiring `lifetime` later.
    pub fn new(subject: impl ToString, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    /// Claims for `subject` issued now.
    pub fn for_subject(subject: impl ToString, lifetime: Duration) -> Self {
        Self::new(subject, Utc::now(), lifetime)
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid from the expiry second onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
