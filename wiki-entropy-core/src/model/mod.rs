//! Statistical models built from corpus text.
//!
//! - Raw `(word1, word2, count)` records parsed from the two bigram sources (`RawCountRecord`)
//! - Per-word transition state, as counts and as probabilities (`WordCounts`, `WordDistribution`)
//! - The bigram table and its builder (`BigramCounts`, `BigramModel`)
//! - The sentence-length table (`SentenceLengths`)

/// Parsing and pairing of the counts and pairs sources.
pub mod record;

/// Outgoing transitions of a single `word1`.
///
/// Not exposed directly; reached through the bigram types.
mod transitions;

/// Bigram aggregation, merging and normalization.
pub mod bigram_model;

/// Sentence-length collection and deduplication.
pub mod sentence_lengths;

pub use bigram_model::{build_bigram_model, BigramCounts, BigramModel, BuildOptions, ZeroTotalPolicy};
pub use record::RawCountRecord;
pub use sentence_lengths::{collect_lengths, sentence_lengths, SentenceLengthEntry, SentenceLengths};
pub use transitions::{WordCounts, WordDistribution};
