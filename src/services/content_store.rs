// src/services/content_store.rs
use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use tracing::{info, warn};

pub const DEFAULT_JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "I told my computer I needed a break, and it said: no problem, I'll go to sleep.",
    "Why did the scarecrow win an award? Because he was outstanding in his field.",
];

pub const DEFAULT_QUOTES: &[&str] = &[
    "The only way to do great work is to love what you do. - Steve Jobs",
    "It always seems impossible until it's done. - Nelson Mandela",
    "Believe you can and you're halfway there. - Theodore Roosevelt",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ListSource {
    File(PathBuf),
    Defaults,
}

/// An immutable list of lines with uniform-random selection.
#[derive(Debug, Clone)]
pub struct StaticList {
    items: Vec<String>,
    source: ListSource,
}

impl StaticList {
    pub fn from_lines<I, S>(lines: I, source: ListSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self { items, source }
    }

    pub fn defaults(defaults: &[&str]) -> Self {
        Self::from_lines(defaults.iter().copied(), ListSource::Defaults)
    }

    /// Reads a line-delimited file, falling back to `defaults` when it
    /// cannot be read.
    pub async fn load(path: &Path, defaults: &[&str]) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let list = Self::from_lines(content.lines(), ListSource::File(path.to_path_buf()));
                info!(path = %path.display(), count = list.len(), "loaded static list");
                list
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read static list, using defaults"
                );
                Self::defaults(defaults)
            }
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn source(&self) -> &ListSource {
        &self.source
    }

    /// True when the list came from its file and has at least one line.
    pub fn is_loaded(&self) -> bool {
        matches!(self.source, ListSource::File(_)) && !self.is_empty()
    }

    pub fn random(&self) -> Option<&str> {
        self.items.choose(&mut rand::rng()).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    pub jokes: StaticList,
    pub quotes: StaticList,
}

impl ContentStore {
    pub fn new(jokes: StaticList, quotes: StaticList) -> Self {
        Self { jokes, quotes }
    }

    pub fn defaults() -> Self {
        Self::new(
            StaticList::defaults(DEFAULT_JOKES),
            StaticList::defaults(DEFAULT_QUOTES),
        )
    }

    pub async fn load(jokes_path: &Path, quotes_path: &Path) -> Self {
        Self::new(
            StaticList::load(jokes_path, DEFAULT_JOKES).await,
            StaticList::load(quotes_path, DEFAULT_QUOTES).await,
        )
    }
}
