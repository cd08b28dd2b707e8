// crates/geolocator-core/src/text.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches country codes (`US`, `DEU`) and subdivision codes (`US-CA`,
/// `FR-IDF`, `AT-9`). Deliberately loose: subdivision suffixes vary from one
/// to three characters across countries.
static ISO_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z]{1,2}-)?[0-9A-Z]{1,3}$").expect("ISO code pattern is valid")
});

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Wien` stays, `München` -> `Munchen`)
/// 2\) Normalize to lowercase
///
/// ```rust
/// use geolocator_core::text::fold_key;
///
/// assert_eq!(fold_key("Île-de-France"), "ile-de-france");
/// assert_eq!(fold_key("MÜNCHEN"), "munchen");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two strings for equality after Unicode folding and normalization.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Drops every non-ASCII character (no transliteration).
///
/// `"Österreich"` becomes `"sterreich"`; the misspelling table is keyed the
/// same way so both sides agree.
pub fn strip_non_ascii(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}

/// `true` if the token looks like an ISO 3166 country or subdivision code.
pub fn is_iso_code(token: &str) -> bool {
    ISO_CODE.is_match(token)
}

/// Parses an optional numeric string, tolerating surrounding whitespace.
pub fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    s.and_then(|v| v.trim().parse::<f64>().ok())
}

/// Breaks raw location tokens into the parts searched by `locate_location`.
///
/// Each token is split on commas; every comma part is kept whole and also
/// split into words. With `verbose`, adjacent word pairs are added so that
/// two-word names ("Los Angeles") survive inside longer parts. The result is
/// trimmed, non-empty and free of duplicates, in first-seen order.
pub fn location_parts<S: AsRef<str>>(tokens: &[S], verbose: bool) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        let candidate = candidate.trim();
        if !candidate.is_empty() && !parts.iter().any(|p| p == candidate) {
            parts.push(candidate.to_string());
        }
    };

    for token in tokens {
        for comma_part in token.as_ref().split(',') {
            push(comma_part);
            let words: Vec<&str> = comma_part.split_whitespace().collect();
            for word in &words {
                push(word);
            }
            if verbose {
                for pair in words.windows(2) {
                    push(&pair.join(" "));
                }
            }
        }
    }
    parts
}
