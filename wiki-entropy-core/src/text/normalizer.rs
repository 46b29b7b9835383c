use once_cell::sync::Lazy;
use regex::Regex;

/// A single cleaning step: every match of `pattern` is replaced by `replacement`.
///
/// Rules never mutate their input; `apply` returns a fresh string so each
/// step of the cleaning policy can be checked on its own.
#[derive(Debug, Clone)]
pub struct Rule {
	/// Short identifier, used in logs and tests.
	pub name: &'static str,
	pattern: Regex,
	replacement: &'static str,
}

impl Rule {
	/// Compiles a new rule.
	///
	/// # Errors
	/// Returns the regex error if `pattern` is invalid.
	pub fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Result<Self, regex::Error> {
		Ok(Self { name, pattern: Regex::new(pattern)?, replacement })
	}

	/// Applies the rule to `input` and returns the rewritten text.
	pub fn apply(&self, input: &str) -> String {
		self.pattern.replace_all(input, self.replacement).into_owned()
	}
}

/// The cleaning policy, in application order.
///
/// 1. `markup`: `<doc ...>` / `</doc>` wrappers, `http:` URLs, the punctuation/dash/quote set,
///    digit runs and round/square brackets
/// 2. `double_quote`: `"` characters
/// 3. `newline`: each `\n` becomes a single space
///
/// Lower-casing runs after the last rule.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
	vec![
		Rule::new(
			"markup",
			r"<doc.+>|</doc>|http:\S+|[\-%,;:–'&*#/—“»]|\d+|\(|\)|\[|\]",
			"",
		)
		.expect("markup rule is a valid regex"),
		Rule::new("double_quote", "\"", "").expect("double quote rule is a valid regex"),
		Rule::new("newline", r"\n", " ").expect("newline rule is a valid regex"),
	]
});

/// Cleans raw corpus text.
///
/// Applies every rule of [`RULES`] in order, then lower-cases the result.
/// Empty or all-punctuation input yields an empty (or blank) string; the
/// word-count filter downstream takes care of it.
///
/// # Examples
///
/// ```
/// use wiki_entropy_core::text::normalize;
/// assert_eq!(normalize("Hello, World (2024)!"), "hello world !");
/// ```
pub fn normalize(raw: &str) -> String {
	let cleaned = RULES.iter().fold(raw.to_owned(), |text, rule| rule.apply(&text));
	cleaned.to_lowercase()
}
