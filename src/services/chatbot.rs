// src/services/chatbot.rs
use std::sync::Arc;

use rand::seq::IndexedRandom;
use tracing::debug;

use super::content_store::ContentStore;
use super::generator::{CreativeGenerator, CreativeOutcome};

pub const QUOTE_KEYWORDS: &[&str] = &["quote", "inspiration", "motivation", "wisdom"];
pub const CREATIVE_KEYWORDS: &[&str] = &["story", "poem", "joke", "creative", "imagine"];
pub const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey"];
pub const WELLBEING_PHRASES: &[&str] = &["how are you", "how do you do"];

pub const GREETINGS: [&str; 3] = [
    "Hello! How can I help you today?",
    "Hi there! What can I do for you?",
    "Hey! It's nice to hear from you.",
];

pub const WELLBEING_REPLY: &str = "I'm doing great, thanks for asking! How can I help you today?";

pub const DEFAULT_REPLIES: [&str; 3] = [
    "I'm not sure about that, but I'm learning every day!",
    "Interesting! Could you tell me a bit more?",
    "I didn't quite catch that. Could you rephrase it?",
];

pub const NO_QUOTES_REPLY: &str = "I'm sorry, I don't have any quotes to share right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationEntry {
    pub input_phrase: &'static str,
    pub response: &'static str,
}

const fn entry(input_phrase: &'static str, response: &'static str) -> ConversationEntry {
    ConversationEntry {
        input_phrase,
        response,
    }
}

/// Fixed phrase table, checked in order. Phrases are lower case.
pub const CONVERSATIONS: &[ConversationEntry] = &[
    entry(
        "what is your name",
        "I'm Polyglot, a chatbot that speaks many languages.",
    ),
    entry(
        "who are you",
        "I'm Polyglot, a friendly multilingual chatbot.",
    ),
    entry(
        "what can you do",
        "I can chat with you, share quotes and jokes, and translate our conversation.",
    ),
    entry(
        "tell me a joke",
        "Why don't scientists trust atoms? Because they make up everything!",
    ),
    entry("help", "Sure, tell me what you need help with."),
    entry(
        "translate",
        "I can translate messages between different languages for you.",
    ),
    entry(
        "language",
        "I can translate messages between different languages for you.",
    ),
    entry("thank you", "You're welcome!"),
    entry("thanks", "You're welcome!"),
    entry("goodbye", "Goodbye! Have a wonderful day."),
    entry("bye", "Goodbye! Have a wonderful day."),
];

/// The rules a reply can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Quote,
    Creative,
    Conversation,
    Greeting,
    Wellbeing,
    Fallback,
}

/// Guarded rules in priority order. `Rule::Fallback` answers when none match.
pub const CASCADE: [Rule; 5] = [
    Rule::Quote,
    Rule::Creative,
    Rule::Conversation,
    Rule::Greeting,
    Rule::Wellbeing,
];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn pick(options: &[&'static str]) -> &'static str {
    options
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(DEFAULT_REPLIES[0])
}

fn fallback_reply() -> String {
    pick(&DEFAULT_REPLIES).to_string()
}

pub fn format_quote(quote: &str) -> String {
    format!("Here's a quote for you: {quote}")
}

pub fn match_conversation(text: &str) -> Option<&'static ConversationEntry> {
    CONVERSATIONS.iter().find(|e| text.contains(e.input_phrase))
}

/// Picks a reply for an English message.
#[derive(Debug, Clone)]
pub struct Resolver {
    content: Arc<ContentStore>,
    generator: CreativeGenerator,
}

impl Resolver {
    pub fn new(content: Arc<ContentStore>, generator: CreativeGenerator) -> Self {
        Self { content, generator }
    }

    pub fn generator(&self) -> &CreativeGenerator {
        &self.generator
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub async fn resolve(&self, text: &str) -> String {
        self.resolve_with_rule(text).await.1
    }

    /// Walks the cascade and returns the first rule that produced a reply.
    pub async fn resolve_with_rule(&self, text: &str) -> (Rule, String) {
        let lower = text.to_lowercase();
        for rule in CASCADE {
            if let Some(reply) = self.apply(rule, &lower).await {
                debug!(?rule, "resolved reply");
                return (rule, reply);
            }
        }
        debug!(rule = ?Rule::Fallback, "resolved reply");
        (Rule::Fallback, fallback_reply())
    }

    async fn apply(&self, rule: Rule, text: &str) -> Option<String> {
        match rule {
            Rule::Quote => contains_any(text, QUOTE_KEYWORDS).then(|| {
                self.content
                    .quotes
                    .random()
                    .map(format_quote)
                    .unwrap_or_else(|| NO_QUOTES_REPLY.to_string())
            }),
            Rule::Creative => {
                if !self.generator.is_available() || !contains_any(text, CREATIVE_KEYWORDS) {
                    return None;
                }
                match self.generator.generate(text).await {
                    CreativeOutcome::Reply(reply) => Some(reply),
                    CreativeOutcome::NotApplicable | CreativeOutcome::NoResponse => None,
                }
            }
            Rule::Conversation => match_conversation(text).map(|e| e.response.to_string()),
            Rule::Greeting => contains_any(text, GREETING_KEYWORDS)
                .then(|| pick(&GREETINGS).to_string()),
            Rule::Wellbeing => contains_any(text, WELLBEING_PHRASES)
                .then(|| WELLBEING_REPLY.to_string()),
            Rule::Fallback => Some(fallback_reply()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::generator::CreativeResponseBank;

    fn resolver() -> Resolver {
        let content = Arc::new(ContentStore::defaults());
        let bank = CreativeResponseBank::with_jokes(content.jokes.items());
        Resolver::new(content, CreativeGenerator::unavailable(bank))
    }

    #[test]
    fn conversation_phrases_are_lower_case() {
        for e in CONVERSATIONS {
            assert_eq!(e.input_phrase, e.input_phrase.to_lowercase());
        }
    }

    #[test]
    fn first_conversation_entry_wins() {
        let e = match_conversation("thank you, bye").unwrap();
        assert_eq!(e.input_phrase, "thank you");
    }

    #[tokio::test]
    async fn wellbeing_phrase() {
        let (rule, reply) = resolver().resolve_with_rule("How do you do").await;
        assert_eq!(rule, Rule::Wellbeing);
        assert_eq!(reply, WELLBEING_REPLY);
    }

    #[test]
    fn fallback_is_not_a_guarded_rule() {
        assert!(!CASCADE.contains(&Rule::Fallback));
        assert_eq!(CASCADE[0], Rule::Quote);
    }

    #[tokio::test]
    async fn fallback_rule_always_answers() {
        let reply = resolver().apply(Rule::Fallback, "anything").await.unwrap();
        assert!(DEFAULT_REPLIES.contains(&reply.as_str()));
    }

    #[tokio::test]
    async fn unmatched_text_uses_fallback() {
        let (rule, reply) = resolver().resolve_with_rule("purple elephants").await;
        assert_eq!(rule, Rule::Fallback);
        assert!(DEFAULT_REPLIES.contains(&reply.as_str()));
    }
}
