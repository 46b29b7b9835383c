use thiserror::Error;

/// Errors raised while building or writing corpus statistics.
///
/// Every error is fatal for the run: no partial model is ever returned.
#[derive(Debug, Error)]
pub enum StatsError {
	/// The counts source and the pairs source do not have the same number of entries.
	#[error("input mismatch: {counts} counts for {pairs} bigram pairs")]
	InputMismatch { counts: usize, pairs: usize },

	/// A word accumulated a zero total, so its transitions cannot be normalized.
	#[error("degenerate distribution: '{word}' has a total count of 0")]
	DegenerateDistribution { word: String },

	/// A pair entry is not exactly two space-separated words.
	#[error("malformed bigram pair at index {index}: {entry:?}")]
	MalformedRecord { index: usize, entry: String },

	/// A count does not fit into an unsigned 64-bit integer.
	#[error("malformed count: {token:?}")]
	MalformedCount { token: String },

	/// The counts observed for a word add up to more than `u64::MAX`.
	#[error("count overflow: the counts of '{word}' do not fit in 64 bits")]
	CountOverflow { word: String },

	/// Two partial models could not be combined.
	#[error("merge failed: {0}")]
	Merge(String),

	/// The requested word has no entry in the model.
	#[error("unknown word: '{word}'")]
	UnknownWord { word: String },

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Csv(#[from] csv::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Binary(#[from] postcard::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
