//! Splitting pasted text into candidate addresses.
//!
//! Pasted text mixes separators freely: commas, semicolons, line breaks,
//! plain spaces, and `Display Name <address>` entries copied from a mail
//! client. Extraction runs in three passes:
//!
//! 1. bracketed addresses are captured and blanked out of the text, so the
//!    display names in front of them are never mistaken for addresses;
//! 2. the remaining separators are normalized to a single delimiter, and a
//!    delimiter is inserted before every space-separated `x@y` run;
//! 3. the text is split, trimmed, and anything without an `@` is dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::syntax::BRACKETED_RE;

const DELIMITER: char = '|';

static SEPARATORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]|[\r\n]+").expect("separator pattern is valid"));

static SPACED_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+([^\s|@]+@[^\s|@]+)").expect("spaced address pattern is valid")
});

/// Extracts candidate addresses from pasted text, in the order found.
///
/// Bracketed addresses come first, followed by the delimited ones. The
/// candidates are not validated; an empty result means the text holds
/// nothing address-like and should be treated as ordinary input.
#[must_use]
pub fn extract_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut remaining = text.to_string();

    if text.contains('<') && text.contains('>') {
        for captures in BRACKETED_RE.captures_iter(text) {
            candidates.push(captures[1].trim().to_string());
            remaining = remaining.replacen(&captures[0], " ", 1);
        }
    }

    let mut normalized = SEPARATORS_RE
        .replace_all(&remaining, DELIMITER.to_string().as_str())
        .into_owned();

    if normalized.contains(' ') && normalized.contains('@') {
        normalized = SPACED_ADDRESS_RE
            .replace_all(&normalized, format!("{DELIMITER}${{1}}").as_str())
            .into_owned();
    }

    candidates.extend(
        normalized
            .split(DELIMITER)
            .map(str::trim)
            .filter(|token| !token.is_empty() && token.contains('@'))
            .map(ToString::to_string),
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas_semicolons_and_newlines() {
        let candidates = extract_candidates("a@x.com, b@x.com;c@x.com\nd@x.com\r\ne@x.com");
        assert_eq!(
            candidates,
            ["a@x.com", "b@x.com", "c@x.com", "d@x.com", "e@x.com"]
        );
    }

    #[test]
    fn splits_space_separated_addresses() {
        let candidates = extract_candidates("a@x.com b@x.com   c@x.com");
        assert_eq!(candidates, ["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn extracts_bracketed_addresses_without_display_names() {
        let candidates =
            extract_candidates("Jane Doe <jane@example.com>, John Q. Public <john@example.com>");
        assert_eq!(candidates, ["jane@example.com", "john@example.com"]);
    }

    #[test]
    fn bracketed_addresses_precede_plain_ones() {
        let candidates = extract_candidates("plain@example.com; Named <named@example.com>");
        assert_eq!(candidates, ["named@example.com", "plain@example.com"]);
    }

    #[test]
    fn repeated_bracketed_address_is_captured_each_time() {
        let candidates = extract_candidates("<a@x.com> <a@x.com>");
        assert_eq!(candidates, ["a@x.com", "a@x.com"]);
    }

    #[test]
    fn keeps_malformed_tokens_that_contain_an_at_sign() {
        let candidates = extract_candidates("broken@, @nothing, fine@x.com");
        assert_eq!(candidates, ["broken@", "@nothing", "fine@x.com"]);
    }

    #[test]
    fn text_without_addresses_yields_nothing() {
        assert!(extract_candidates("just some words").is_empty());
        assert!(extract_candidates(" , ; \n").is_empty());
        assert!(extract_candidates("<no address here>").is_empty());
    }
}
