//! Numeric identifiers embedded in resource URLs

use std::sync::LazyLock;

use regex::Regex;

/// Digits immediately preceding a trailing slash, e.g. `.../films/3/`
static TRAILING_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/(\d+)/$").ok());

/// The trailing numeric path segment of a resource URL, if it has one
pub fn trailing_number(reference: &str) -> Option<&str> {
    TRAILING_NUMBER
        .as_ref()?
        .captures(reference)
        .and_then(|captures| captures.get(1))
        .map(|number| number.as_str())
}

/// Extract the number of every referenced media entry and join them with `", "`
///
/// References without a trailing number contribute an empty segment, so the output
/// always has one segment per input.
pub fn extract_media_numbers<S: AsRef<str>>(references: &[S]) -> String {
    references
        .iter()
        .map(|reference| trailing_number(reference.as_ref()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}
