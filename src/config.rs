use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Size bound of each registry's ordered top.
    pub max_sorted_users: usize,
    /// Budget charged for every matching iteration.
    pub iteration_cost: u64,
    /// Budget charged per registry heap move inside an iteration.
    pub step_cost: u64,
    /// Budget used by callers that do not pass their own.
    pub default_budget: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_sorted_users: 16,
            iteration_cost: 100,
            step_cost: 10,
            default_budget: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    COMPACT,
    JSON,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<LogLevel> for LevelFilter {
    fn from(val: LogLevel) -> Self {
        match val {
            LogLevel::TRACE => LevelFilter::TRACE,
            LogLevel::DEBUG => LevelFilter::DEBUG,
            LogLevel::INFO => LevelFilter::INFO,
            LogLevel::WARN => LevelFilter::WARN,
            LogLevel::ERROR => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            format: LogFormat::COMPACT,
        }
    }
}

/// Top-level application configuration.
///
/// Loaded with the following precedence (lowest to highest):
/// 1) Built-in defaults
/// 2) Optional config file (if present)
/// 3) Environment variables prefixed `P2P_MATCHER_`, nested keys separated
///    by `__` (e.g. `P2P_MATCHER_MATCHING__MAX_SORTED_USERS=32`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub logger: LogConfig,
}

impl AppConfig {
    pub fn load(config_path: &Path) -> Result<Self, figment::Error> {
        Self::figment(config_path).extract()
    }

    fn figment(config_path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if config_path.exists() {
            figment = figment.merge(Toml::file(config_path));
        }
        figment.merge(Env::prefixed("P2P_MATCHER_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = AppConfig::load(Path::new("does-not-exist.toml")).unwrap();

        assert_eq!(cfg.matching.max_sorted_users, 16);
        assert_eq!(cfg.matching.iteration_cost, 100);
        assert!(matches!(cfg.logger.format, LogFormat::COMPACT));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "matcher.toml",
                r#"
                [matching]
                max_sorted_users = 4
                step_cost = 0

                [logger]
                level = "DEBUG"
                format = "JSON"
                "#,
            )?;

            let cfg = AppConfig::load(Path::new("matcher.toml"))?;
            assert_eq!(cfg.matching.max_sorted_users, 4);
            assert_eq!(cfg.matching.step_cost, 0);
            // untouched keys keep their defaults
            assert_eq!(cfg.matching.iteration_cost, 100);
            assert!(matches!(cfg.logger.level, LogLevel::DEBUG));
            assert!(matches!(cfg.logger.format, LogFormat::JSON));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("matcher.toml", "[matching]\nmax_sorted_users = 4\n")?;
            jail.set_env("P2P_MATCHER_MATCHING__MAX_SORTED_USERS", "32");

            let cfg = AppConfig::load(Path::new("matcher.toml"))?;
            assert_eq!(cfg.matching.max_sorted_users, 32);
            Ok(())
        });
    }
}
