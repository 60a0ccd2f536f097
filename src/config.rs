use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Extraction pipeline configuration loaded from environment variables.
///
/// Every knob has a default, so a bare environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    // Fast path
    pub fetch_timeout: Duration,

    // Render fallback
    pub render_enabled: bool,
    pub render_nav_timeout: Duration,
    pub article_wait_timeout: Duration,
    pub chrome_path: Option<String>,
    pub viewport_width: u32,
    pub viewport_height: u32,

    // Article heuristics
    pub min_text_len: usize,
    pub max_album_photos: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            render_enabled: true,
            render_nav_timeout: Duration::from_secs(30),
            article_wait_timeout: Duration::from_secs(10),
            chrome_path: None,
            viewport_width: 1280,
            viewport_height: 800,
            min_text_len: 10,
            max_album_photos: 4,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a set environment variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            fetch_timeout: Duration::from_secs(parse_env_u64("FETCH_TIMEOUT_SECS", 30)?),
            render_enabled: parse_env_bool("RENDER_ENABLED", true)?,
            render_nav_timeout: Duration::from_secs(parse_env_u64("RENDER_NAV_TIMEOUT_SECS", 30)?),
            article_wait_timeout: Duration::from_secs(parse_env_u64(
                "ARTICLE_WAIT_TIMEOUT_SECS",
                10,
            )?),
            chrome_path: optional_env("CHROME_PATH"),
            viewport_width: parse_env_u32("VIEWPORT_WIDTH", 1280)?,
            viewport_height: parse_env_u32("VIEWPORT_HEIGHT", 800)?,
            min_text_len: parse_env_usize("MIN_TEXT_LEN", 10)?,
            max_album_photos: parse_env_usize("MAX_ALBUM_PHOTOS", 4)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "FETCH_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.render_nav_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "RENDER_NAV_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::InvalidValue {
                name: "VIEWPORT_WIDTH/VIEWPORT_HEIGHT".to_string(),
                message: "must be nonzero".to_string(),
            });
        }
        if self.max_album_photos == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_ALBUM_PHOTOS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration for tests: short timeouts, rendering disabled so no
    /// browser process is ever launched.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            render_enabled: false,
            render_nav_timeout: Duration::from_secs(5),
            article_wait_timeout: Duration::from_secs(1),
            ..Self::default()
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.max_album_photos, 4);
        assert!(config.render_enabled);
    }

    #[test]
    fn test_testing_config_disables_render() {
        let config = Config::for_testing();
        assert!(config.validate().is_ok());
        assert!(!config.render_enabled);
    }

    #[test]
    fn test_validate_rejects_zero_album_cap() {
        let config = Config {
            max_album_photos: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_viewport() {
        let config = Config {
            viewport_width: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_env_bool("NONEXISTENT_VAR", true).unwrap());
        assert!(!parse_env_bool("NONEXISTENT_VAR", false).unwrap());
    }
}
