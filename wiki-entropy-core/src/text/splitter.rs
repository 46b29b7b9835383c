/// Characters that end a sentence. They are consumed by the split.
pub const SENTENCE_TERMINALS: [char; 3] = ['.', '!', '?'];

/// Lazy iterator over the sentences of a normalized text.
///
/// Created by [`split_sentences`]. Segments come out in source order, and
/// the iterator is `Clone`, so a sequence can be restarted from any point.
///
/// # Notes
/// - Consecutive terminals produce empty segments, as does a trailing one.
/// - Empty input yields a single empty segment.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
	rest: Option<&'a str>,
}

impl<'a> Iterator for Sentences<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<&'a str> {
		let rest = self.rest?;
		match rest.find(SENTENCE_TERMINALS) {
			Some(i) => {
				// Terminals are single-byte ASCII
				self.rest = Some(&rest[i + 1..]);
				Some(&rest[..i])
			}
			None => {
				self.rest = None;
				Some(rest)
			}
		}
	}
}

/// Splits normalized text on `.`, `!` and `?`.
pub fn split_sentences(normalized: &str) -> Sentences<'_> {
	Sentences { rest: Some(normalized) }
}
