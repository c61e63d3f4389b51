use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Access tokens open the API; refresh tokens only mint new pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Registered JWT claims plus the token kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn issue(
        user_id: Uuid,
        kind: TokenKind,
        issued_at: OffsetDateTime,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: user_id,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + ttl).unix_timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            kind,
        }
    }

    pub fn is_access(&self) -> bool {
        self.kind == TokenKind::Access
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn issue_sets_expiry_from_ttl() {
        let at = datetime!(2024-03-10 12:00 UTC);
        let claims = Claims::issue(Uuid::nil(), TokenKind::Refresh, at, Duration::minutes(90), "iss", "aud");
        assert_eq!(claims.exp - claims.iat, 90 * 60);
        assert!(!claims.is_access());

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["kind"], "refresh");
    }
}
