//! Glyph-subset font generation for a day's emoji.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use thiserror::Error;
use tokio::fs;

use crate::models::EmojiToken;

#[cfg(test)]
pub mod fixture;

#[derive(Debug, Error)]
pub enum FontSubsetError {
    #[error("Failed to read source font: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed source font: {0}")]
    MalformedFont(String),

    #[error("Source font has no glyph for U+{code_point:04X}")]
    UnsupportedCodePoint { code_point: u32 },

    #[error("Glyph subsetting failed: {0}")]
    Subset(String),
}

/// A reduced font for exactly one puzzle's options
#[derive(Debug, Clone)]
pub struct FontAsset {
    pub data: Vec<u8>,
    pub code_points: BTreeSet<char>,
}

/// Every code point of every token, joiners and selectors included
pub fn code_points<T: AsRef<str>>(tokens: &[T]) -> BTreeSet<char> {
    tokens.iter().flat_map(|t| t.as_ref().chars()).collect()
}

/// Code points that render as nothing on their own, so a font may leave them
/// unmapped: ZWJ, variation selectors and emoji tag characters.
pub fn is_default_ignorable(c: char) -> bool {
    matches!(
        c,
        '\u{200D}' | '\u{FE00}'..='\u{FE0F}' | '\u{E0020}'..='\u{E007F}' | '\u{E0100}'..='\u{E01EF}'
    )
}

pub struct FontSubsetter {
    source: Vec<u8>,
}

impl FontSubsetter {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, FontSubsetError> {
        let source = fs::read(path).await?;
        Ok(Self::from_bytes(source))
    }

    pub fn from_bytes(source: Vec<u8>) -> Self {
        Self { source }
    }

    /// Map each code point to its glyph in the source font
    pub fn resolve_glyphs(
        &self,
        code_points: &BTreeSet<char>,
    ) -> Result<BTreeMap<char, u16>, FontSubsetError> {
        let face = ttf_parser::Face::parse(&self.source, 0)
            .map_err(|e| FontSubsetError::MalformedFont(e.to_string()))?;

        let mut glyphs = BTreeMap::new();
        for &c in code_points {
            match face.glyph_index(c) {
                Some(id) => {
                    glyphs.insert(c, id.0);
                }
                None if is_default_ignorable(c) => {
                    tracing::debug!("Source font has no glyph for U+{:04X}, skipping", u32::from(c));
                }
                None => {
                    return Err(FontSubsetError::UnsupportedCodePoint {
                        code_point: u32::from(c),
                    })
                }
            }
        }
        Ok(glyphs)
    }

    /// Produce a font keeping `.notdef`, the glyphs for `tokens` and whatever
    /// those glyphs pull in: colour layers, bitmaps and ligatures reachable
    /// through the layout tables. `OS/2`, `cmap` and the colour tables survive.
    ///
    /// CPU bound on large colour fonts, call it from a blocking task.
    pub fn subset(&self, tokens: &[EmojiToken]) -> Result<FontAsset, FontSubsetError> {
        let code_points = code_points(tokens);
        let glyphs = self.resolve_glyphs(&code_points)?;

        let data = hb_subset::subset(&self.source, code_points.iter().copied())
            .map_err(|e| FontSubsetError::Subset(format!("{:?}", e)))?;

        tracing::info!(
            "Subset font for {} code points ({} mapped glyphs, {} -> {} bytes)",
            code_points.len(),
            glyphs.len(),
            self.source.len(),
            data.len()
        );

        Ok(FontAsset { data, code_points })
    }
}
