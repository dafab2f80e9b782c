use crate::core::{RankingPolicy, RecommendationStrategy};
use crate::services::CacheTtls;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub user_profiles: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    /// Profiles carry presence fields, so they expire quickly
    pub profile_ttl_secs: Option<u64>,
    pub statistics_ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl CacheSettings {
    pub fn ttls(&self) -> CacheTtls {
        let defaults = CacheTtls::default();
        CacheTtls {
            profile: self
                .profile_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.profile),
            statistics: self
                .statistics_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.statistics),
        }
    }
}

/// Policy knobs for ranking and recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_pool_cap")]
    pub pool_cap: usize,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
    #[serde(default = "default_recommendation_age_window")]
    pub recommendation_age_window: u8,
    #[serde(default = "default_recommendation_top_interests")]
    pub recommendation_top_interests: usize,
    #[serde(default = "default_daily_suggestions")]
    pub daily_suggestions: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            pool_cap: default_pool_cap(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            recommendation_limit: default_recommendation_limit(),
            recommendation_age_window: default_recommendation_age_window(),
            recommendation_top_interests: default_recommendation_top_interests(),
            daily_suggestions: default_daily_suggestions(),
        }
    }
}

fn default_pool_cap() -> usize { 50 }
fn default_limit() -> usize { 20 }
fn default_max_limit() -> usize { 100 }
fn default_recommendation_limit() -> usize { 20 }
fn default_recommendation_age_window() -> u8 { 2 }
fn default_recommendation_top_interests() -> usize { 5 }
fn default_daily_suggestions() -> usize { 5 }

impl MatchingSettings {
    pub fn ranking_policy(&self) -> RankingPolicy {
        RankingPolicy {
            pool_cap: self.pool_cap,
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }

    pub fn recommendation_strategy(&self) -> RecommendationStrategy {
        RecommendationStrategy {
            age_window: self.recommendation_age_window,
            top_interest_count: self.recommendation_top_interests,
            limit: self.recommendation_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "full".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with HEARTBEAT_)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., HEARTBEAT__SERVER__PORT -> server.port
            .add_source(environment());

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("HEARTBEAT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching_policy() {
        let matching = MatchingSettings::default();
        let policy = matching.ranking_policy();
        assert_eq!(policy.pool_cap, 50);
        assert_eq!(policy.default_limit, 20);
        assert_eq!(policy.max_limit, 100);

        let strategy = matching.recommendation_strategy();
        assert_eq!(strategy, RecommendationStrategy::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "full");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("heartbeat-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [appwrite]
            endpoint = "https://appwrite.test/v1"
            api_key = "key"
            project_id = "project"
            database_id = "db"

            [collection]
            user_profiles = "profiles"

            [database]
            url = "postgres://localhost/heartbeat"

            [cache]
            redis_url = "redis://localhost"

            [matching]
            pool_cap = 80
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.matching.pool_cap, 80);
        assert_eq!(settings.matching.default_limit, 20);
        assert_eq!(settings.logging.format, "full");
        assert_eq!(settings.cache.ttls(), CacheTtls::default());
    }

    #[test]
    fn test_cache_ttls_per_kind() {
        let cache = CacheSettings {
            redis_url: "redis://localhost".to_string(),
            profile_ttl_secs: Some(15),
            statistics_ttl_secs: None,
            l1_cache_size: None,
        };

        let ttls = cache.ttls();
        assert_eq!(ttls.profile, Duration::from_secs(15));
        assert_eq!(ttls.statistics, CacheTtls::default().statistics);
    }
}
