use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};

use super::record::{parse_records, RawCountRecord};
use super::transitions::{WordCounts, WordDistribution};
use crate::error::{Result, StatsError};

/// What to do with a `word1` whose counts add up to 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroTotalPolicy {
	/// Fail the whole run with `DegenerateDistribution`.
	#[default]
	Abort,
	/// Drop the entry from the model and keep going.
	Skip,
}

/// Settings for building a `BigramModel`.
///
/// # Invariants
/// - `chunk_factor` is always >= 1
#[derive(Clone, Debug)]
pub struct BuildOptions {
	/// Handling of words whose total is 0.
	pub zero_total: ZeroTotalPolicy,

	/// Number of records from which aggregation is spread over worker threads.
	pub parallel_threshold: usize,

	/// Number of chunks per CPU when aggregating in parallel.
	chunk_factor: usize,
}

impl Default for BuildOptions {
	fn default() -> Self {
		Self { zero_total: ZeroTotalPolicy::Abort, parallel_threshold: 100_000, chunk_factor: 8 }
	}
}

impl BuildOptions {
	pub fn chunk_factor(&self) -> usize {
		self.chunk_factor
	}

	/// Sets the number of chunks per CPU.
	///
	/// # Errors
	/// Returns an error if `factor` is 0.
	pub fn set_chunk_factor(&mut self, factor: usize) -> std::result::Result<(), String> {
		if factor == 0 {
			return Err("Chunk factor must be >= 1".to_owned());
		}
		self.chunk_factor = factor;
		Ok(())
	}
}

/// Raw bigram counts, before normalization.
///
/// # Responsibilities
/// - Accumulate `(word1, word2, count)` records
/// - Merge partial counts built on separate chunks of the input
/// - Normalize into a `BigramModel` once every count is in
///
/// # Invariants
/// - Each entry in `words` is keyed by its own `word1`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigramCounts {
	words: BTreeMap<String, WordCounts>,
}

impl BigramCounts {
	/// Adds one record: creates the `word1` entry and the transition on first
	/// sight, then adds the count to both.
	///
	/// # Errors
	/// `CountOverflow` if the total of `word1` would exceed `u64::MAX`.
	pub fn add(&mut self, record: &RawCountRecord) -> Result<()> {
		self.words
			.entry(record.word1.clone())
			.or_insert_with(|| WordCounts::new(&record.word1))
			.add(&record.word2, record.count)
	}

	/// Number of distinct `word1`.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn get(&self, word1: &str) -> Option<&WordCounts> {
		self.words.get(word1)
	}

	/// Aggregates records, in parallel when there are enough of them.
	///
	/// # Behavior
	/// - Below `options.parallel_threshold` records, a single pass on the calling thread.
	/// - Otherwise, records are split into `cpus * chunk_factor` chunks, each chunk is
	///   counted on its own thread and the partial counts are merged.
	///
	/// # Notes
	/// - Merging only sums counts; nothing is normalized until every partial is merged.
	pub fn from_records(records: &[RawCountRecord], options: &BuildOptions) -> Result<Self> {
		if records.len() < options.parallel_threshold.max(1) {
			let mut counts = Self::default();
			for record in records {
				counts.add(record)?;
			}
			return Ok(counts);
		}

		let chunks = num_cpus::get() * options.chunk_factor;
		let chunk_size = records.len().div_ceil(chunks).max(1);
		log::debug!("aggregating {} records in chunks of {}", records.len(), chunk_size);

		let partials: Vec<Self> = thread::scope(|scope| {
			let (tx, rx) = mpsc::channel();
			for chunk in records.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial = Self::default();
					let result = chunk.iter().try_for_each(|record| partial.add(record));
					// The receiver is gone only once an earlier chunk already failed
					let _ = tx.send(result.map(|()| partial));
				});
			}
			drop(tx);
			rx.iter().collect::<Result<Vec<Self>>>()
		})?;

		let mut counts = Self::default();
		for partial in &partials {
			counts.merge(partial)?;
		}
		Ok(counts)
	}

	/// Merges another set of counts into this one.
	///
	/// Totals and transition counts of matching words are summed; new words
	/// are cloned.
	///
	/// # Errors
	/// `CountOverflow` if a summed total would exceed `u64::MAX`.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		for (word, counts) in &other.words {
			if let Some(existing) = self.words.get_mut(word) {
				existing.merge(counts)?;
			} else {
				self.words.insert(word.clone(), counts.clone());
			}
		}
		Ok(())
	}

	/// Converts every count into a transition probability.
	///
	/// # Errors
	/// `DegenerateDistribution` for the first word with a zero total, unless
	/// `policy` is `Skip`, in which case that word is left out of the model.
	pub fn normalize(&self, policy: ZeroTotalPolicy) -> Result<BigramModel> {
		let mut words = BTreeMap::new();
		for (word, counts) in &self.words {
			match counts.normalize() {
				Ok(distribution) => {
					words.insert(word.clone(), distribution);
				}
				Err(StatsError::DegenerateDistribution { .. }) if policy == ZeroTotalPolicy::Skip => {
					log::warn!("skipping '{}': total count is 0", word);
				}
				Err(e) => return Err(e),
			}
		}
		Ok(BigramModel { words })
	}
}

/// Word bigram transition table.
///
/// Maps each `word1` to its total count and the conditional probability of
/// every `word2` that followed it.
///
/// Serialized as `{ word1: { "total": n, "transitions": { word2: p } } }`,
/// keys in lexicographic order.
///
/// # Invariants
/// - For every `word1`, the transition probabilities sum to 1.0
/// - Immutable once built
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct BigramModel {
	words: BTreeMap<String, WordDistribution>,
}

impl BigramModel {
	/// Builds the model from already-paired records.
	pub fn from_records(records: &[RawCountRecord], options: &BuildOptions) -> Result<Self> {
		let counts = BigramCounts::from_records(records, options)?;
		let model = counts.normalize(options.zero_total)?;
		log::info!(
			"bigram model: {} records, {} words, {} transitions",
			records.len(),
			model.len(),
			model.transition_count()
		);
		Ok(model)
	}

	/// Builds the model from the raw counts and pairs sources.
	///
	/// # Errors
	/// Any parsing error (`InputMismatch`, `MalformedRecord`, `MalformedCount`)
	/// or a degenerate word, see [`BigramCounts::normalize`].
	pub fn from_sources(counts_text: &str, pairs_text: &str, options: &BuildOptions) -> Result<Self> {
		let records = parse_records(counts_text, pairs_text)?;
		Self::from_records(&records, options)
	}

	/// Number of distinct `word1`.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Number of distinct `(word1, word2)` pairs.
	pub fn transition_count(&self) -> usize {
		self.words.values().map(|d| d.transitions().len()).sum()
	}

	/// All `word1`, in key order.
	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.words.keys().map(String::as_str)
	}

	pub fn get(&self, word1: &str) -> Option<&WordDistribution> {
		self.words.get(word1)
	}

	pub fn total(&self, word1: &str) -> Option<u64> {
		self.words.get(word1).map(WordDistribution::total)
	}

	pub fn transitions(&self, word1: &str) -> Option<&BTreeMap<String, f64>> {
		self.words.get(word1).map(WordDistribution::transitions)
	}

	/// Probability of `word2` following `word1`, if the pair was observed.
	pub fn probability(&self, word1: &str, word2: &str) -> Option<f64> {
		self.words.get(word1)?.probability(word2)
	}

	/// Draws a word following `word1`.
	///
	/// Returns `None` if `word1` is unknown.
	pub fn sample_next(&self, word1: &str) -> Option<&str> {
		self.words.get(word1)?.sample(&mut rand::rng())
	}

	/// Walks the chain from `start`, drawing at most `max_words` words after it.
	///
	/// The walk stops early on a word that never appears as a `word1`.
	///
	/// # Errors
	/// `UnknownWord` if `start` is not in the model.
	pub fn walk(&self, start: &str, max_words: usize) -> Result<Vec<String>> {
		if !self.words.contains_key(start) {
			return Err(StatsError::UnknownWord { word: start.to_owned() });
		}

		let mut rng = rand::rng();
		let mut chain = vec![start.to_owned()];
		let mut current = start;
		for _ in 0..max_words {
			let Some(next) = self.words.get(current).and_then(|d| d.sample(&mut rng)) else {
				break;
			};
			chain.push(next.to_owned());
			current = next;
		}
		Ok(chain)
	}
}

/// Builds a `BigramModel` with default options.
pub fn build_bigram_model(records: &[RawCountRecord]) -> Result<BigramModel> {
	BigramModel::from_records(records, &BuildOptions::default())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn records(items: &[(&str, &str, u64)]) -> Vec<RawCountRecord> {
		items.iter().map(|(a, b, c)| RawCountRecord::new(a, b, *c)).collect()
	}

	fn assert_close(left: f64, right: f64) {
		assert!((left - right).abs() < 1e-9, "{left} != {right}");
	}

	#[test]
	fn builds_conditional_probabilities() {
		let model = build_bigram_model(&records(&[("a", "b", 3), ("a", "c", 1), ("b", "a", 2)])).unwrap();
		assert_eq!(model.len(), 2);
		assert_close(model.probability("a", "b").unwrap(), 0.75);
		assert_close(model.probability("a", "c").unwrap(), 0.25);
		assert_close(model.probability("b", "a").unwrap(), 1.0);
		assert_eq!(model.total("a"), Some(4));
		assert_eq!(model.total("b"), Some(2));
		assert_eq!(model.probability("b", "c"), None);
	}

	#[test]
	fn repeated_pairs_accumulate() {
		let model = build_bigram_model(&records(&[("a", "b", 1), ("a", "c", 2), ("a", "b", 1)])).unwrap();
		assert_close(model.probability("a", "b").unwrap(), 0.5);
		assert_close(model.probability("a", "c").unwrap(), 0.5);
	}

	#[test]
	fn empty_input_gives_empty_model() {
		let model = build_bigram_model(&[]).unwrap();
		assert!(model.is_empty());
	}

	#[test]
	fn zero_total_aborts_by_default() {
		let err = build_bigram_model(&records(&[("a", "b", 1), ("z", "b", 0)])).unwrap_err();
		assert!(matches!(err, StatsError::DegenerateDistribution { word } if word == "z"));
	}

	#[test]
	fn zero_total_can_be_skipped() {
		let options = BuildOptions { zero_total: ZeroTotalPolicy::Skip, ..BuildOptions::default() };
		let model =
			BigramModel::from_records(&records(&[("a", "b", 1), ("z", "b", 0), ("z", "c", 0)]), &options).unwrap();
		assert_eq!(model.words().collect::<Vec<_>>(), vec!["a"]);
	}

	#[test]
	fn zero_count_pair_next_to_nonzero_has_zero_probability() {
		let model = build_bigram_model(&records(&[("a", "b", 0), ("a", "c", 2)])).unwrap();
		assert_eq!(model.probability("a", "b"), Some(0.0));
		assert_close(model.probability("a", "c").unwrap(), 1.0);
	}

	#[test]
	fn parallel_build_matches_sequential() {
		let words = ["the", "cat", "sat", "on", "mat", "a", "dog"];
		let mut input = Vec::new();
		for i in 0..5_000u64 {
			let w1 = words[(i % 7) as usize];
			let w2 = words[((i * 3 + 1) % 7) as usize];
			input.push(RawCountRecord::new(w1, w2, i % 5 + 1));
		}

		let sequential = build_bigram_model(&input).unwrap();
		let mut options = BuildOptions { parallel_threshold: 1, ..BuildOptions::default() };
		options.set_chunk_factor(3).unwrap();
		let parallel = BigramModel::from_records(&input, &options).unwrap();

		assert_eq!(sequential.len(), parallel.len());
		for word in sequential.words() {
			assert_eq!(sequential.total(word), parallel.total(word));
			for (next, p) in sequential.transitions(word).unwrap() {
				assert_close(*p, parallel.probability(word, next).unwrap());
			}
		}
	}

	#[test]
	fn counts_merge_before_normalizing() {
		let mut left = BigramCounts::default();
		left.add(&RawCountRecord::new("a", "b", 1)).unwrap();
		let mut right = BigramCounts::default();
		right.add(&RawCountRecord::new("a", "c", 3)).unwrap();
		right.add(&RawCountRecord::new("b", "a", 1)).unwrap();
		left.merge(&right).unwrap();

		assert_eq!(left.len(), 2);
		let model = left.normalize(ZeroTotalPolicy::Abort).unwrap();
		assert_close(model.probability("a", "b").unwrap(), 0.25);
		assert_close(model.probability("a", "c").unwrap(), 0.75);
	}

	#[test]
	fn totals_past_u64_max_are_rejected() {
		let err = BigramModel::from_sources("18446744073709551615 1", "a b,a c", &BuildOptions::default())
			.unwrap_err();
		assert!(matches!(err, StatsError::CountOverflow { word } if word == "a"));
	}

	#[test]
	fn totals_past_u64_max_are_rejected_in_parallel() {
		let input = records(&[("a", "b", u64::MAX), ("b", "a", 1), ("a", "c", 1), ("b", "b", 1)]);
		let mut options = BuildOptions { parallel_threshold: 1, ..BuildOptions::default() };
		options.set_chunk_factor(1).unwrap();
		let err = BigramModel::from_records(&input, &options).unwrap_err();
		assert!(matches!(err, StatsError::CountOverflow { word } if word == "a"));
	}

	#[test]
	fn chunk_factor_must_be_positive() {
		let mut options = BuildOptions::default();
		assert!(options.set_chunk_factor(0).is_err());
		assert_eq!(options.chunk_factor(), 8);
	}

	#[test]
	fn walk_follows_only_observed_transitions() {
		let model = build_bigram_model(&records(&[("a", "b", 1), ("b", "c", 1)])).unwrap();
		assert_eq!(model.walk("a", 10).unwrap(), vec!["a", "b", "c"]);
		assert_eq!(model.walk("a", 1).unwrap(), vec!["a", "b"]);
		assert!(matches!(model.walk("c", 3), Err(StatsError::UnknownWord { .. })));
		assert_eq!(model.sample_next("b"), Some("c"));
		assert_eq!(model.sample_next("zzz"), None);
	}
}
