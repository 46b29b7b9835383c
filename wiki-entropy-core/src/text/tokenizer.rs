use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex is valid"));

/// Iterates over the maximal runs of word characters (letters, digits, `_`).
pub fn tokens(sentence: &str) -> impl Iterator<Item = &str> {
	WORD.find_iter(sentence).map(|m| m.as_str())
}

/// Counts the words of a sentence.
///
/// Punctuation and whitespace never count as words, so a sentence made only
/// of them has length 0.
pub fn count_words(sentence: &str) -> usize {
	WORD.find_iter(sentence).count()
}
