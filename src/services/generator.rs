// src/services/generator.rs
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use regex::Regex;
use tracing::{info, warn};

use super::completion::{CompletionClient, SamplingParams};
use crate::error::ServiceError;

pub const MIN_REPLY_CHARS: usize = 10;
pub const MAX_REPLY_CHARS: usize = 200;

pub const SAMPLING: SamplingParams = SamplingParams {
    max_tokens: 60,
    temperature: 0.8,
};

const TURN_MARKERS: &[&str] = &["User:", "Human:", "Q:", "Question:"];

const GENERIC_FILLER: &str =
    "I'm feeling creative, but the words escape me right now. Ask me again!";

static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[*#_~`<>\[\]{}|\\^"@=+]"#).expect("valid regex")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A black-box text generation model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Generation through an OpenAI-compatible chat completion endpoint.
#[async_trait]
impl TextGenerator for CompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let completion = self.complete(prompt, SAMPLING).await?;
        if completion.text.trim().is_empty() {
            return Err(ServiceError::EmptyOutput);
        }
        Ok(completion.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreativeIntent {
    Joke,
    Story,
    Poem,
}

impl CreativeIntent {
    /// Case-insensitive keyword classification; jokes are checked first.
    pub fn classify(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["joke", "funny"]) {
            Some(CreativeIntent::Joke)
        } else if has(&["story", "tale"]) {
            Some(CreativeIntent::Story)
        } else if has(&["poem", "poetry"]) {
            Some(CreativeIntent::Poem)
        } else {
            None
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            CreativeIntent::Joke => "Tell me a short, family-friendly joke.",
            CreativeIntent::Story => "Write a very short story in two sentences.",
            CreativeIntent::Poem => "Write a short, cheerful four-line poem.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CreativeIntent::Joke => "joke",
            CreativeIntent::Story => "story",
            CreativeIntent::Poem => "poem",
        }
    }
}

const STORIES: &[&str] = &[
    "Once upon a time, a curious robot learned to speak every language in the world. \
     Its favourite word turned out to be 'friend'.",
    "A lighthouse keeper found a message in a bottle written in a language nobody knew. \
     Years later, she wrote the reply herself.",
];

const POEMS: &[&str] = &[
    "Words may travel far and wide, with every language as their guide. \
     Though we speak in different ways, kindness brightens all our days.",
    "The moon hums softly to the sea, the stars keep time in harmony. \
     And every night, the world agrees: tomorrow brings new melodies.",
];

/// Result of a creative generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CreativeOutcome {
    /// The text asks for nothing the generator knows how to write.
    NotApplicable,
    /// No model, or the model failed.
    NoResponse,
    Reply(String),
}

/// Canned replies used when generated text is rejected.
#[derive(Debug, Clone, Default)]
pub struct CreativeResponseBank {
    pub jokes: Vec<String>,
    pub stories: Vec<String>,
    pub poems: Vec<String>,
}

impl CreativeResponseBank {
    /// Built-in stories and poems, with the given jokes.
    pub fn with_jokes(jokes: &[String]) -> Self {
        Self {
            jokes: jokes.to_vec(),
            stories: STORIES.iter().map(|s| s.to_string()).collect(),
            poems: POEMS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn entries(&self, intent: CreativeIntent) -> &[String] {
        match intent {
            CreativeIntent::Joke => &self.jokes,
            CreativeIntent::Story => &self.stories,
            CreativeIntent::Poem => &self.poems,
        }
    }

    pub fn pick(&self, intent: CreativeIntent) -> String {
        self.entries(intent)
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| GENERIC_FILLER.to_string())
    }
}

/// Classify, generate, clean, validate, fall back.
#[derive(Clone)]
pub struct CreativeGenerator {
    model: Option<Arc<dyn TextGenerator>>,
    bank: CreativeResponseBank,
    timeout: Duration,
}

impl std::fmt::Debug for CreativeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreativeGenerator")
            .field("available", &self.is_available())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CreativeGenerator {
    pub fn new(
        model: Arc<dyn TextGenerator>,
        bank: CreativeResponseBank,
        timeout: Duration,
    ) -> Self {
        Self {
            model: Some(model),
            bank,
            timeout,
        }
    }

    /// A generator with no model loaded; every call yields `NoResponse`.
    pub fn unavailable(bank: CreativeResponseBank) -> Self {
        Self {
            model: None,
            bank,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub async fn generate(&self, text: &str) -> CreativeOutcome {
        let Some(model) = &self.model else {
            return CreativeOutcome::NoResponse;
        };
        let Some(intent) = CreativeIntent::classify(text) else {
            return CreativeOutcome::NotApplicable;
        };

        let prompt = intent.prompt();
        let raw = match tokio::time::timeout(self.timeout, model.generate(prompt)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!(intent = intent.as_str(), error = %e, "generation failed");
                return CreativeOutcome::NoResponse;
            }
            Err(_) => {
                warn!(
                    intent = intent.as_str(),
                    error = %ServiceError::Timeout(self.timeout),
                    "generation failed"
                );
                return CreativeOutcome::NoResponse;
            }
        };

        let cleaned = clean_generated(&raw, prompt);
        if is_acceptable(&cleaned) {
            info!(
                intent = intent.as_str(),
                chars = cleaned.chars().count(),
                "generated creative reply"
            );
            CreativeOutcome::Reply(cleaned)
        } else {
            info!(intent = intent.as_str(), "generated text rejected, using canned reply");
            CreativeOutcome::Reply(self.bank.pick(intent))
        }
    }
}

/// Turns raw model output into a single tidy sentence-ish reply.
pub fn clean_generated(raw: &str, prompt: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(prompt) {
        text = rest;
    }
    if let Some(cut) = TURN_MARKERS.iter().filter_map(|m| text.find(m)).min() {
        text = &text[..cut];
    }

    let stripped = DISALLOWED.replace_all(text, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut chars = trimmed.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

pub fn is_acceptable(reply: &str) -> bool {
    let len = reply.chars().count();
    (MIN_REPLY_CHARS..=MAX_REPLY_CHARS).contains(&len) && reply.ends_with(['.', '!', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_keyword() {
        assert_eq!(
            CreativeIntent::classify("Tell me something FUNNY"),
            Some(CreativeIntent::Joke)
        );
        assert_eq!(
            CreativeIntent::classify("a bedtime tale please"),
            Some(CreativeIntent::Story)
        );
        assert_eq!(
            CreativeIntent::classify("some poetry"),
            Some(CreativeIntent::Poem)
        );
        assert_eq!(CreativeIntent::classify("imagine a dragon"), None);
    }

    #[test]
    fn joke_wins_over_story() {
        assert_eq!(
            CreativeIntent::classify("a story with a joke"),
            Some(CreativeIntent::Joke)
        );
    }

    #[test]
    fn clean_strips_prompt_markup_and_turns() {
        let prompt = CreativeIntent::Joke.prompt();
        let raw = format!("{prompt}  why did the **chicken**\n\n cross the road User: another one");
        assert_eq!(
            clean_generated(&raw, prompt),
            "Why did the chicken cross the road."
        );
    }

    #[test]
    fn clean_keeps_existing_terminal_punctuation() {
        assert_eq!(clean_generated("what a day!", "x"), "What a day!");
        assert_eq!(clean_generated("is it?  Q: next", "x"), "Is it?");
    }

    #[test]
    fn clean_of_only_markup_is_empty() {
        assert_eq!(clean_generated("### ***", "x"), "");
    }

    #[test]
    fn length_band_is_inclusive() {
        assert!(!is_acceptable("Too short"));
        assert!(is_acceptable("Ten chars."));
        assert!(is_acceptable(&format!("{}.", "a".repeat(199))));
        assert!(!is_acceptable(&format!("{}.", "a".repeat(200))));
    }

    #[test]
    fn empty_bank_uses_generic_filler() {
        let bank = CreativeResponseBank::default();
        assert_eq!(bank.pick(CreativeIntent::Joke), GENERIC_FILLER);
    }

    #[tokio::test]
    async fn unavailable_generator_gives_no_response() {
        let generator = CreativeGenerator::unavailable(CreativeResponseBank::default());
        assert_eq!(
            generator.generate("tell me a joke").await,
            CreativeOutcome::NoResponse
        );
    }
}
