use anyhow::Context;
use serde::Deserialize;
use time::UtcOffset;

use crate::nutrition::GoalThresholds;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub vision: VisionConfig,
    /// Offset used for day boundaries when the client does not send one.
    pub default_utc_offset: UtcOffset,
    pub thresholds: GoalThresholds,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutrilog".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutrilog-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "meal-photos".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".into()),
            secret_key: std::env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".into()),
        };
        let vision = VisionConfig {
            api_key: std::env::var("VISION_API_KEY").context("VISION_API_KEY")?,
            api_url: std::env::var("VISION_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".into()),
            model: std::env::var("VISION_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
            max_tokens: env_parse("VISION_MAX_TOKENS", 1000),
        };
        let default_utc_offset = offset_from_minutes(env_parse("DEFAULT_UTC_OFFSET_MINUTES", 0))
            .context("DEFAULT_UTC_OFFSET_MINUTES")?;
        let thresholds = match std::env::var("GOAL_THRESHOLDS_JSON") {
            Ok(raw) => parse_thresholds(&raw).context("GOAL_THRESHOLDS_JSON")?,
            Err(_) => GoalThresholds::default(),
        };

        Ok(Self {
            database_url,
            jwt,
            storage,
            vision,
            default_utc_offset,
            thresholds,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub fn offset_from_minutes(minutes: i32) -> anyhow::Result<UtcOffset> {
    let seconds = minutes
        .checked_mul(60)
        .context("utc offset out of range")?;
    UtcOffset::from_whole_seconds(seconds).context("utc offset out of range")
}

pub fn parse_thresholds(raw: &str) -> anyhow::Result<GoalThresholds> {
    let thresholds: GoalThresholds = serde_json::from_str(raw)?;
    thresholds.validate()?;
    Ok(thresholds)
}
