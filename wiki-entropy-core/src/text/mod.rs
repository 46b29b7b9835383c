//! Text processing stages shared by both analyses.
//!
//! - **Normalizer**: ordered cleaning rules over raw corpus text
//! - **Splitter**: lazy sentence segmentation on terminal punctuation
//! - **Tokenizer**: word runs and word counts

pub mod normalizer;
pub mod splitter;
pub mod tokenizer;

pub use normalizer::{normalize, Rule};
pub use splitter::{split_sentences, Sentences};
pub use tokenizer::{count_words, tokens};
