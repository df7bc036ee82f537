use rand::{
    seq::{index, SliceRandom},
    Rng,
};
use thiserror::Error;

use crate::{corpus::EmojiCorpus, models::EmojiToken};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("Corpus has {available} emoji but {requested} options were requested")]
    InsufficientCorpus { requested: usize, available: usize },

    #[error("Invalid selection bounds: {0}")]
    InvalidBounds(String),
}

/// Options and answer drawn for one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub options: Vec<EmojiToken>,
    pub answer: Vec<EmojiToken>,
}

/// Draws a day's option pool and answer subset from the corpus
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    option_count: usize,
    min_answer: usize,
    max_answer: usize,
}

impl Selector {
    pub fn new(option_count: usize, min_answer: usize, max_answer: usize) -> Result<Self, SelectError> {
        if option_count == 0 {
            return Err(SelectError::InvalidBounds(
                "option count must be at least 1".to_string(),
            ));
        }
        if min_answer == 0 || min_answer > max_answer {
            return Err(SelectError::InvalidBounds(format!(
                "answer size range {}..={} is empty or starts at zero",
                min_answer, max_answer
            )));
        }
        if max_answer > option_count {
            return Err(SelectError::InvalidBounds(format!(
                "answer size {} exceeds option count {}",
                max_answer, option_count
            )));
        }

        Ok(Self {
            option_count,
            min_answer,
            max_answer,
        })
    }

    /// Sample `option_count` distinct tokens without replacement, shuffle them,
    /// then sample the answer from those options.
    ///
    /// Output depends only on the corpus and the state of `rng`.
    pub fn select<R: Rng>(
        &self,
        corpus: &EmojiCorpus,
        rng: &mut R,
    ) -> Result<Selection, SelectError> {
        if self.option_count > corpus.len() {
            return Err(SelectError::InsufficientCorpus {
                requested: self.option_count,
                available: corpus.len(),
            });
        }

        let pool = corpus.tokens();
        let mut options: Vec<EmojiToken> = index::sample(rng, pool.len(), self.option_count)
            .iter()
            .map(|i| pool[i].clone())
            .collect();
        options.shuffle(rng);

        let answer_count = rng.random_range(self.min_answer..=self.max_answer);
        let answer = index::sample(rng, options.len(), answer_count)
            .iter()
            .map(|i| options[i].clone())
            .collect();

        Ok(Selection { options, answer })
    }
}
