use crate::error::{Result, StatsError};

/// One observed bigram: `word2` followed `word1` exactly `count` times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCountRecord {
	pub word1: String,
	pub word2: String,
	pub count: u64,
}

impl RawCountRecord {
	pub fn new(word1: &str, word2: &str, count: u64) -> Self {
		Self { word1: word1.to_owned(), word2: word2.to_owned(), count }
	}
}

/// Reads every count from the counts source.
///
/// Counts are separated by whitespace (spaces, tabs, newlines). Each token
/// must be made of ASCII digits only, so a stray sign or word cannot turn
/// into a count and shift the positional pairing with the bigram entries.
///
/// # Errors
/// `MalformedCount` for the first token that is not a non-negative integer
/// fitting into a `u64`.
pub fn parse_counts(text: &str) -> Result<Vec<u64>> {
	text.split_whitespace()
		.map(|token| {
			if !token.bytes().all(|b| b.is_ascii_digit()) {
				return Err(StatsError::MalformedCount { token: token.to_owned() });
			}
			token.parse::<u64>().map_err(|_| StatsError::MalformedCount { token: token.to_owned() })
		})
		.collect()
}

/// Splits the pairs source into its comma-separated `"word1 word2"` entries.
///
/// Whitespace around each entry (typically the trailing newline of the file)
/// is dropped. A blank source has no entries.
pub fn parse_pairs(text: &str) -> Vec<&str> {
	if text.trim().is_empty() {
		return Vec::new();
	}
	text.split(',').map(str::trim).collect()
}

/// Splits one pair entry into its two words.
///
/// The entry must be exactly two non-empty words separated by a single space.
fn split_pair(index: usize, entry: &str) -> Result<(&str, &str)> {
	let mut parts = entry.split(' ');
	match (parts.next(), parts.next(), parts.next()) {
		(Some(word1), Some(word2), None) if !word1.is_empty() && !word2.is_empty() => Ok((word1, word2)),
		_ => Err(StatsError::MalformedRecord { index, entry: entry.to_owned() }),
	}
}

/// Pairs counts and bigram entries by position.
///
/// # Errors
/// - `InputMismatch` if the two sources do not have the same length (checked first)
/// - `MalformedRecord` for the first entry that is not a valid pair
pub fn pair_records(counts: &[u64], pairs: &[&str]) -> Result<Vec<RawCountRecord>> {
	if counts.len() != pairs.len() {
		return Err(StatsError::InputMismatch { counts: counts.len(), pairs: pairs.len() });
	}

	counts
		.iter()
		.zip(pairs)
		.enumerate()
		.map(|(index, (count, entry))| {
			let (word1, word2) = split_pair(index, entry)?;
			Ok(RawCountRecord::new(word1, word2, *count))
		})
		.collect()
}

/// Parses both raw sources into records.
pub fn parse_records(counts_text: &str, pairs_text: &str) -> Result<Vec<RawCountRecord>> {
	let counts = parse_counts(counts_text)?;
	let pairs = parse_pairs(pairs_text);
	log::debug!("parsed {} counts and {} bigram pairs", counts.len(), pairs.len());
	pair_records(&counts, &pairs)
}
