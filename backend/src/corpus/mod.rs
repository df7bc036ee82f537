use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tokio::fs;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::EmojiToken;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read emoji corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("Emoji corpus is not a JSON list of strings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Emoji corpus contains no usable tokens")]
    Empty,
}

/// The ordered pool of candidate emoji, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct EmojiCorpus {
    tokens: Vec<EmojiToken>,
}

impl EmojiCorpus {
    /// Load the corpus from a JSON array of strings
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path).await?;
        let raw: Vec<String> = serde_json::from_str(&content)?;
        let corpus = Self::from_tokens(raw)?;

        tracing::info!("Loaded {} emoji into corpus", corpus.len());

        Ok(corpus)
    }

    /// Build a corpus from in-memory tokens.
    ///
    /// Blank entries and repeats are dropped (first occurrence wins). Entries
    /// that are not exactly one grapheme cluster are skipped with a warning.
    pub fn from_tokens<I, T>(tokens: I) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for token in tokens {
            let token: String = token.into();
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if token.graphemes(true).count() != 1 {
                tracing::warn!("Skipping corpus entry {:?}: not a single grapheme", token);
                continue;
            }
            if seen.insert(token.to_string()) {
                kept.push(token.to_string());
            }
        }

        let corpus = Self { tokens: kept };
        if corpus.is_empty() {
            return Err(CorpusError::Empty);
        }

        Ok(corpus)
    }

    pub fn tokens(&self) -> &[EmojiToken] {
        &self.tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
