use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// Raw outgoing counts of a single `word1`.
///
/// Conceptually a node of a Markov chain whose edges are weighted by how
/// many times each `word2` followed `word1`.
///
/// ## Responsibilities
/// - Accumulate transition counts during aggregation
/// - Merge with a partial count of the same word (parallel aggregation)
/// - Turn itself into a probability distribution once every count is in
///
/// ## Invariants
/// - All transitions belong to the same `word`
/// - `total` is the sum of every transition count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordCounts {
	/// The `word1` these transitions start from.
	word: String,
	/// Sum of all counts observed for `word`, tracked apart from the transitions.
	total: u64,
	/// `word2` -> number of observations.
	transitions: BTreeMap<String, u64>,
}

impl WordCounts {
	/// Creates an empty entry for `word`.
	pub fn new(word: &str) -> Self {
		Self { word: word.to_owned(), total: 0, transitions: BTreeMap::new() }
	}

	/// Records `count` more observations of `word -> next`.
	///
	/// The transition is created at 0 on first sight, so zero counts still
	/// register the pair.
	///
	/// # Errors
	/// `CountOverflow` if the total would no longer fit into a `u64`. The
	/// entry is left unchanged.
	pub fn add(&mut self, next: &str, count: u64) -> Result<()> {
		let total = self.checked_total(count)?;
		// A transition never exceeds the total
		*self.transitions.entry(next.to_owned()).or_insert(0) += count;
		self.total = total;
		Ok(())
	}

	fn checked_total(&self, count: u64) -> Result<u64> {
		self.total
			.checked_add(count)
			.ok_or_else(|| StatsError::CountOverflow { word: self.word.clone() })
	}

	pub fn total(&self) -> u64 {
		self.total
	}

	/// Observed count of `word -> next`, if the pair was seen.
	pub fn count(&self, next: &str) -> Option<u64> {
		self.transitions.get(next).copied()
	}

	/// Merges another partial count of the same word into this one.
	///
	/// # Errors
	/// - `Merge` if the two entries do not describe the same word
	/// - `CountOverflow` if the summed total would no longer fit into a `u64`
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.word != other.word {
			return Err(StatsError::Merge(format!("Word mismatch: '{}' and '{}'", self.word, other.word)));
		}

		let total = self.checked_total(other.total)?;
		for (next, count) in &other.transitions {
			*self.transitions.entry(next.clone()).or_insert(0) += *count;
		}
		self.total = total;

		Ok(())
	}

	/// Divides every transition by the total.
	///
	/// # Errors
	/// `DegenerateDistribution` if the total is 0: the counts carry no
	/// distribution and dividing would only produce NaN.
	pub fn normalize(&self) -> Result<WordDistribution> {
		if self.total == 0 {
			return Err(StatsError::DegenerateDistribution { word: self.word.clone() });
		}

		let total = self.total as f64;
		let transitions = self
			.transitions
			.iter()
			.map(|(next, count)| (next.clone(), *count as f64 / total))
			.collect();

		Ok(WordDistribution { total: self.total, transitions })
	}
}

/// Normalized outgoing transitions of a single `word1`.
///
/// # Invariants
/// - `transitions` values sum to 1.0 (within floating-point tolerance)
/// - `total` is the count the probabilities were derived from; it is never
///   stored among the transitions
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WordDistribution {
	total: u64,
	transitions: BTreeMap<String, f64>,
}

impl WordDistribution {
	pub fn total(&self) -> u64 {
		self.total
	}

	/// `word2` -> probability, in key order.
	pub fn transitions(&self) -> &BTreeMap<String, f64> {
		&self.transitions
	}

	pub fn probability(&self, next: &str) -> Option<f64> {
		self.transitions.get(next).copied()
	}

	/// Draws the next word according to the transition probabilities.
	///
	/// Transitions with probability 0 are never drawn.
	/// Returns `None` if there is nothing to draw from.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let mut r: f64 = rng.random_range(0.0..1.0);

		let mut fallback: Option<&str> = None;
		for (next, probability) in &self.transitions {
			if *probability <= 0.0 {
				continue;
			}
			if r < *probability {
				return Some(next.as_str());
			}
			r -= probability;
			fallback = Some(next.as_str());
		}

		// Rounding can leave a sliver past the last bucket
		fallback
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn total_tracks_every_count() {
		let mut counts = WordCounts::new("a");
		counts.add("b", 3).unwrap();
		counts.add("c", 1).unwrap();
		counts.add("b", 2).unwrap();
		assert_eq!(counts.total(), 6);
		assert_eq!(counts.count("b"), Some(5));
		assert_eq!(counts.count("z"), None);
	}

	#[test]
	fn total_is_not_a_transition() {
		let mut counts = WordCounts::new("a");
		counts.add("TOTAL", 2).unwrap();
		counts.add("b", 2).unwrap();
		let dist = counts.normalize().unwrap();
		assert_eq!(dist.total(), 4);
		assert_eq!(dist.probability("TOTAL"), Some(0.5));
		assert_eq!(dist.transitions().len(), 2);
	}

	#[test]
	fn merge_sums_counts() {
		let mut left = WordCounts::new("a");
		left.add("b", 1).unwrap();
		let mut right = WordCounts::new("a");
		right.add("b", 2).unwrap();
		right.add("c", 4).unwrap();
		left.merge(&right).unwrap();
		assert_eq!(left.total(), 7);
		assert_eq!(left.count("b"), Some(3));
		assert_eq!(left.count("c"), Some(4));
	}

	#[test]
	fn merge_rejects_other_words() {
		let mut left = WordCounts::new("a");
		assert!(matches!(left.merge(&WordCounts::new("b")), Err(StatsError::Merge(_))));
	}

	#[test]
	fn add_refuses_to_overflow_the_total() {
		let mut counts = WordCounts::new("a");
		counts.add("b", u64::MAX).unwrap();
		let err = counts.add("c", 1).unwrap_err();
		assert!(matches!(err, StatsError::CountOverflow { word } if word == "a"));
		assert_eq!(counts.total(), u64::MAX);
		assert_eq!(counts.count("c"), None);
	}

	#[test]
	fn merge_refuses_to_overflow_the_total() {
		let mut left = WordCounts::new("a");
		left.add("b", u64::MAX - 1).unwrap();
		let mut right = WordCounts::new("a");
		right.add("b", 2).unwrap();
		let err = left.merge(&right).unwrap_err();
		assert!(matches!(err, StatsError::CountOverflow { .. }));
		assert_eq!(left.count("b"), Some(u64::MAX - 1));
	}

	#[test]
	fn zero_total_is_degenerate() {
		let mut counts = WordCounts::new("a");
		counts.add("b", 0).unwrap();
		let err = counts.normalize().unwrap_err();
		assert!(matches!(err, StatsError::DegenerateDistribution { word } if word == "a"));
	}

	#[test]
	fn sample_never_draws_zero_probability() {
		let mut counts = WordCounts::new("a");
		counts.add("never", 0).unwrap();
		counts.add("always", 5).unwrap();
		let dist = counts.normalize().unwrap();
		let mut rng = rand::rng();
		for _ in 0..100 {
			assert_eq!(dist.sample(&mut rng), Some("always"));
		}
	}
}
