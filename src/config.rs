//! Configuration read from the environment

use crate::intake::find_language;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_GREETING: &str = "Hello! I'm VitalAI. How can I help you today? You can describe your symptoms, request an appointment, or upload medical documents.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown classifier backend {0:?} (expected \"http\" or \"keyword\")")]
    UnknownBackend(String),
    #[error("Invalid boolean for {var}: {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("Unsupported language code {0:?} in VITALAI_LANGUAGE")]
    UnknownLanguage(String),
}

/// Which classifier implementation a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierBackend {
    #[default]
    Http,
    Keyword,
}

impl ClassifierBackend {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "keyword" | "fake" => Ok(Self::Keyword),
            _ => Err(ConfigError::UnknownBackend(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub backend: ClassifierBackend,
    /// Base URL of the prediction service; `/predict` is appended
    pub api_url: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::default(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Per-session behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bot message seeded on mount; `None` starts with an empty transcript
    pub greeting: Option<String>,
    /// Forward the selected language code with each classification request.
    /// Off by default: the prediction service never received it historically.
    pub send_language: bool,
    /// Language selected when the session mounts
    pub language: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: Some(DEFAULT_GREETING.to_string()),
            send_language: false,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatConfig {
    pub classifier: ClassifierConfig,
    pub session: SessionConfig,
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("VITALAI_CLASSIFIER") {
            Some(v) => ClassifierBackend::parse(&v)?,
            None => ClassifierBackend::default(),
        };

        let api_url = lookup("VITALAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let send_language = match lookup("VITALAI_SEND_LANGUAGE") {
            Some(v) => parse_bool("VITALAI_SEND_LANGUAGE", &v)?,
            None => false,
        };

        // Same table `/lang` checks against, normalized to its spelling
        let language = match lookup("VITALAI_LANGUAGE") {
            Some(v) => find_language(&v)
                .map_err(|_| ConfigError::UnknownLanguage(v.clone()))?
                .code
                .to_string(),
            None => DEFAULT_LANGUAGE.to_string(),
        };

        let greeting = match lookup("VITALAI_GREETING") {
            Some(v) if v.eq_ignore_ascii_case("off") || v.trim().is_empty() => None,
            Some(v) => Some(v),
            None => Some(DEFAULT_GREETING.to_string()),
        };

        Ok(Self {
            classifier: ClassifierConfig { backend, api_url },
            session: SessionConfig {
                greeting,
                send_language,
                language,
            },
        })
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
