// src/state.rs
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::ServiceError;
use crate::message::ModelStatus;
use crate::services::{
    chatbot::Resolver,
    completion::CompletionClient,
    content_store::ContentStore,
    generator::{CreativeGenerator, CreativeResponseBank},
    translator::{LibreTranslate, TranslationAdapter},
};

pub type SharedState = Arc<AppState>;

/// Everything a request needs, built once at startup and only read afterwards.
#[derive(Debug)]
pub struct AppState {
    pub resolver: Resolver,
    pub translator: TranslationAdapter,
}

impl AppState {
    pub fn new(
        content: ContentStore,
        translator: TranslationAdapter,
        generator: CreativeGenerator,
    ) -> Self {
        Self {
            resolver: Resolver::new(Arc::new(content), generator),
            translator,
        }
    }

    /// No translation and no generation model; replies come from the
    /// keyword cascade alone.
    pub fn offline(content: ContentStore) -> Self {
        let bank = CreativeResponseBank::with_jokes(content.jokes.items());
        Self::new(
            content,
            TranslationAdapter::disabled(),
            CreativeGenerator::unavailable(bank),
        )
    }

    pub async fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let content = ContentStore::load(&config.jokes_path, &config.quotes_path).await;
        let bank = CreativeResponseBank::with_jokes(content.jokes.items());

        let translator = match &config.translate {
            Some(t) => {
                info!(url = %t.url, "translation enabled");
                let backend =
                    LibreTranslate::new(&t.url, t.api_key.clone(), config.external_timeout)?;
                TranslationAdapter::new(Arc::new(backend), config.external_timeout)
            }
            None => {
                warn!("TRANSLATE_API_URL is empty; messages will not be translated");
                TranslationAdapter::disabled()
            }
        };

        let generator = match &config.generation {
            Some(g) => {
                info!(model = %g.model, "creative generation enabled");
                let client =
                    CompletionClient::new(&g.url, &g.api_key, &g.model, config.external_timeout)?;
                CreativeGenerator::new(Arc::new(client), bank, config.external_timeout)
            }
            None => {
                warn!("GENERATION_API_KEY not set; creative generation disabled");
                CreativeGenerator::unavailable(bank)
            }
        };

        Ok(Self::new(content, translator, generator))
    }

    pub fn model_status(&self) -> ModelStatus {
        let content = self.resolver.content();
        ModelStatus {
            model_loaded: self.resolver.generator().is_available(),
            quotes_loaded: content.quotes.is_loaded(),
            jokes_loaded: content.jokes.is_loaded(),
        }
    }
}
