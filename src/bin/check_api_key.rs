//! Sends a tiny chat completion to confirm an API key works.
//!
//! Reads `GENERATION_API_KEY` (or `OPENAI_API_KEY`), `GENERATION_MODEL` and
//! `GENERATION_API_URL` from the environment or `.env`.
use std::time::Duration;

use anyhow::Context;
use polyglot_chatbot::{
    config::GenerationConfig,
    services::completion::{CompletionClient, SamplingParams},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = GenerationConfig::from_env().context("failed to read configuration")?;
    let client = CompletionClient::new(
        config.url,
        config.api_key,
        config.model,
        Duration::from_secs(30),
    )
    .context("failed to build HTTP client")?;

    let params = SamplingParams {
        max_tokens: 5,
        temperature: 1.0,
    };
    let completion = client
        .complete("Hello", params)
        .await
        .with_context(|| format!("request to model {} failed", client.model()))?;

    println!("Model used: {}", completion.model);
    println!("API key is valid and has access to this model");
    Ok(())
}
