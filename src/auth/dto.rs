use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::User;
use crate::nutrition::UserGoalProfile;

/// Body of both register and login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Emails are matched case-insensitively and without surrounding space.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub member_since: OffsetDateTime,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            member_since: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// `/me`: the account plus the goal the calendar evaluates against.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub goal: UserGoalProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn user() -> User {
        User {
            id: Uuid::nil(),
            email: "kim@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: datetime!(2024-01-15 09:00 UTC),
        }
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let creds = Credentials {
            email: "  Kim@Example.COM ".into(),
            password: "x".into(),
        };
        assert_eq!(creds.normalized_email(), "kim@example.com");
    }

    #[test]
    fn me_response_carries_the_goal_but_no_secrets() {
        let me = MeResponse {
            user: PublicUser::from(&user()),
            goal: UserGoalProfile::default(),
        };
        let json = serde_json::to_value(&me).unwrap();
        assert_eq!(json["email"], "kim@example.com");
        assert_eq!(json["member_since"], "2024-01-15T09:00:00Z");
        assert_eq!(json["goal"]["daily_calorie_goal"], 2000);
        assert_eq!(json["goal"]["goal_type"], "maintain");
        assert!(!json.to_string().contains("argon2"));
    }
}
