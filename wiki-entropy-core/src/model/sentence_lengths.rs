use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::text::{count_words, normalize, split_sentences};

/// A retained sentence and its number of words (always > 0).
///
/// Written as the `gloss` and `length` columns of the output table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SentenceLengthEntry {
	#[serde(rename = "gloss")]
	pub sentence: String,
	pub length: usize,
}

/// Sentence lengths of a corpus snapshot, in source order.
///
/// Every occurrence is kept, duplicates included, so per-occurrence
/// statistics stay available. Use [`SentenceLengths::dedup`] for the table
/// of distinct sentences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentenceLengths {
	entries: Vec<SentenceLengthEntry>,
}

impl SentenceLengths {
	/// Every retained occurrence, in source order.
	pub fn entries(&self) -> &[SentenceLengthEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// One entry per distinct sentence text.
	///
	/// A sentence keeps the position of its first occurrence; later
	/// occurrences overwrite its length (identical text has identical length).
	pub fn dedup(&self) -> SentenceLengths {
		let mut positions: HashMap<&str, usize> = HashMap::new();
		let mut entries: Vec<SentenceLengthEntry> = Vec::new();

		for entry in &self.entries {
			match positions.get(entry.sentence.as_str()) {
				Some(&i) => entries[i].length = entry.length,
				None => {
					positions.insert(&entry.sentence, entries.len());
					entries.push(entry.clone());
				}
			}
		}

		SentenceLengths { entries }
	}

	/// Number of entries of each length, by increasing length.
	///
	/// Counts the entries as stored: call it on `dedup()` for distinct sentences.
	pub fn length_histogram(&self) -> BTreeMap<usize, usize> {
		let mut histogram = BTreeMap::new();
		for entry in &self.entries {
			*histogram.entry(entry.length).or_insert(0) += 1;
		}
		histogram
	}
}

/// Measures already-normalized sentences.
///
/// Sentences with no word are dropped.
pub fn collect_lengths<I, S>(sentences: I) -> SentenceLengths
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let entries = sentences
		.into_iter()
		.filter_map(|sentence| {
			let sentence = sentence.as_ref();
			match count_words(sentence) {
				0 => None,
				length => Some(SentenceLengthEntry { sentence: sentence.to_owned(), length }),
			}
		})
		.collect();

	SentenceLengths { entries }
}

/// Normalizes a corpus snapshot, splits it into sentences and measures them.
pub fn sentence_lengths(text: &str) -> SentenceLengths {
	let normalized = normalize(text);
	let lengths = collect_lengths(split_sentences(&normalized));
	log::info!("collected {} sentences from {} bytes of text", lengths.len(), text.len());
	lengths
}
