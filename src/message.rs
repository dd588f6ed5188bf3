// src/message.rs
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

pub const DEFAULT_LANG: &str = "en";

pub const APOLOGY: &str = "Sorry, something went wrong on my side. Please try again.";

/// Body of `POST /chat`. Every field is optional; a missing, null or
/// non-string value falls back to an empty message and English without
/// affecting the other fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub input_lang: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub output_lang: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrAnything {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrAnything::deserialize(deserializer)? {
        StringOrAnything::Text(text) => Some(text),
        StringOrAnything::Other(_) => None,
    })
}

impl ChatRequest {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn input_lang(&self) -> String {
        normalize_lang(self.input_lang.as_deref())
    }

    pub fn output_lang(&self) -> String {
        normalize_lang(self.output_lang.as_deref())
    }
}

fn normalize_lang(code: Option<&str>) -> String {
    match code.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_lowercase(),
        _ => DEFAULT_LANG.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub success: bool,
}

impl ChatResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            success: true,
        }
    }

    pub fn failure() -> Self {
        Self {
            reply: APOLOGY.to_string(),
            success: false,
        }
    }
}

/// Body of `GET /model_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub quotes_loaded: bool,
    pub jokes_loaded: bool,
}
