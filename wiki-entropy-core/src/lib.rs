//! Corpus statistics for entropy studies.
//!
//! This crate turns raw natural-language text into two simple models:
//! - A word bigram transition table (`word1 -> word2 -> probability`)
//! - A sentence-length table (`sentence -> number of words`)
//!
//! Both follow the same shape: raw text or raw counts are aggregated,
//! then converted into a distribution that is written out for later analysis.

/// Error type shared by every stage of the pipeline.
pub mod error;

/// Text cleaning, sentence splitting and word counting.
pub mod text;

/// Bigram aggregation and sentence-length collection.
pub mod model;

/// Serialization of the finished models (JSON, CSV, binary snapshot).
pub mod export;

/// File helpers (input loading, corpus chunk enumeration, path handling).
pub mod io;

pub use error::{Result, StatsError};
