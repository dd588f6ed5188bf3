// src/services/translator.rs
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ServiceError;

/// A black-box translation capability.
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError>;
}

/// Outcome of a translation attempt. `PassThrough` carries the original text.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    Translated(String),
    PassThrough(String),
}

impl Translation {
    pub fn text(&self) -> &str {
        match self {
            Translation::Translated(t) | Translation::PassThrough(t) => t,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Translation::Translated(t) | Translation::PassThrough(t) => t,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Translation::PassThrough(_))
    }
}

/// Wraps a [`TranslateBackend`] so that no failure ever escapes: errors,
/// timeouts and empty output all degrade to the original text.
#[derive(Clone)]
pub struct TranslationAdapter {
    backend: Option<Arc<dyn TranslateBackend>>,
    timeout: Duration,
}

impl std::fmt::Debug for TranslationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationAdapter")
            .field("enabled", &self.backend.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TranslationAdapter {
    pub fn new(backend: Arc<dyn TranslateBackend>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
        }
    }

    /// An adapter that always passes text through.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            timeout: Duration::ZERO,
        }
    }

    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Translation {
        let Some(backend) = &self.backend else {
            return Translation::PassThrough(text.to_string());
        };
        if source.eq_ignore_ascii_case(target) || text.trim().is_empty() {
            return Translation::PassThrough(text.to_string());
        }

        let call = backend.translate(text, source, target);
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Timeout(self.timeout)),
        };

        match result {
            Ok(translated) if !translated.trim().is_empty() => {
                debug!(source, target, "translated text");
                Translation::Translated(translated)
            }
            Ok(_) => {
                warn!(
                    source,
                    target,
                    error = %ServiceError::EmptyOutput,
                    "translation failed, passing text through"
                );
                Translation::PassThrough(text.to_string())
            }
            Err(e) => {
                warn!(source, target, error = %e, "translation failed, passing text through");
                Translation::PassThrough(text.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct LibreTranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct LibreTranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// Client for a LibreTranslate-compatible `/translate` endpoint.
#[derive(Debug, Clone)]
pub struct LibreTranslate {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl LibreTranslate {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl TranslateBackend for LibreTranslate {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError> {
        let payload = LibreTranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, detail });
        }

        let body: LibreTranslateResponse = response.json().await?;
        body.translated_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ServiceError::EmptyOutput)
    }
}
