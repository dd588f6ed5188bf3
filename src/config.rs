// src/config.rs
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_TRANSLATE_URL: &str = "https://libretranslate.com/translate";
pub const DEFAULT_GENERATION_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} is not set")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslateConfig {
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

impl GenerationConfig {
    /// Settings for the standalone key check. Unlike the server, a missing
    /// key is an error, and `OPENAI_API_KEY` is accepted as a fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            non_empty(lookup(key)).unwrap_or_else(|| default.to_string())
        };

        let api_key = non_empty(lookup("GENERATION_API_KEY"))
            .or_else(|| non_empty(lookup("OPENAI_API_KEY")))
            .ok_or(ConfigError::Missing {
                key: "GENERATION_API_KEY",
            })?;

        Ok(Self {
            url: get("GENERATION_API_URL", DEFAULT_GENERATION_URL),
            api_key,
            model: get("GENERATION_MODEL", DEFAULT_GENERATION_MODEL),
        })
    }
}

/// Runtime configuration, read from the environment (and `.env` via dotenvy
/// in `main`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub jokes_path: PathBuf,
    pub quotes_path: PathBuf,
    /// `None` when translation is switched off with an empty `TRANSLATE_API_URL`.
    pub translate: Option<TranslateConfig>,
    /// `None` when no `GENERATION_API_KEY` is set.
    pub generation: Option<GenerationConfig>,
    pub external_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_raw = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let timeout_raw = get("EXTERNAL_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());
        let timeout_secs = timeout_raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::Invalid {
                key: "EXTERNAL_TIMEOUT_SECS",
                value: timeout_raw.clone(),
                reason: e.to_string(),
            }
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "EXTERNAL_TIMEOUT_SECS",
                value: timeout_raw,
                reason: "must be at least 1".to_string(),
            });
        }

        let translate_url = get("TRANSLATE_API_URL", DEFAULT_TRANSLATE_URL);
        let translate = (!translate_url.trim().is_empty()).then(|| TranslateConfig {
            url: translate_url.trim().to_string(),
            api_key: non_empty(lookup("TRANSLATE_API_KEY")),
        });

        let generation = non_empty(lookup("GENERATION_API_KEY")).map(|api_key| GenerationConfig {
            url: get("GENERATION_API_URL", DEFAULT_GENERATION_URL),
            api_key,
            model: get("GENERATION_MODEL", DEFAULT_GENERATION_MODEL),
        });

        Ok(Self {
            bind_addr,
            static_dir: get("STATIC_DIR", "public").into(),
            jokes_path: get("JOKES_PATH", "data/jokes.txt").into(),
            quotes_path: get("QUOTES_PATH", "data/quotes.txt").into(),
            translate,
            generation,
            external_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.external_timeout, Duration::from_secs(10));
        assert_eq!(config.translate.unwrap().url, DEFAULT_TRANSLATE_URL);
        assert!(config.generation.is_none());
    }

    #[test]
    fn generation_enabled_by_api_key() {
        let config = config_from(&[
            ("GENERATION_API_KEY", "sk-test"),
            ("GENERATION_MODEL", "tiny"),
        ])
        .unwrap();
        let generation = config.generation.unwrap();
        assert_eq!(generation.api_key, "sk-test");
        assert_eq!(generation.model, "tiny");
        assert_eq!(generation.url, DEFAULT_GENERATION_URL);
    }

    #[test]
    fn empty_translate_url_disables_translation() {
        let config = config_from(&[("TRANSLATE_API_URL", "")]).unwrap();
        assert!(config.translate.is_none());
    }

    #[test]
    fn key_check_reads_model_from_environment() {
        let vars: HashMap<&str, &str> = [
            ("GENERATION_API_KEY", "sk-live"),
            ("GENERATION_MODEL", "gpt-4o-mini"),
        ]
        .into_iter()
        .collect();
        let generation =
            GenerationConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(generation.api_key, "sk-live");
        assert_eq!(generation.model, "gpt-4o-mini");
        assert_eq!(generation.url, DEFAULT_GENERATION_URL);
    }

    #[test]
    fn key_check_accepts_openai_key_and_defaults_model() {
        let generation = GenerationConfig::from_lookup(|key| {
            (key == "OPENAI_API_KEY").then(|| "sk-openai".to_string())
        })
        .unwrap();
        assert_eq!(generation.api_key, "sk-openai");
        assert_eq!(generation.model, DEFAULT_GENERATION_MODEL);
    }

    #[test]
    fn key_check_requires_a_key() {
        let err = GenerationConfig::from_lookup(|_| None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                key: "GENERATION_API_KEY"
            }
        );
        assert_eq!(err.to_string(), "GENERATION_API_KEY is not set");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid {
                key: "BIND_ADDR",
                ..
            })
        ));
        assert!(matches!(
            config_from(&[("EXTERNAL_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid {
                key: "EXTERNAL_TIMEOUT_SECS",
                ..
            })
        ));
    }
}
