//! Search normalization. Song bodies are written with Romanian diacritics and
//! free punctuation, but operators type queries quickly and unaccented, so
//! both sides of a search are folded through the same normalizer and matched
//! by plain substring containment.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximal runs of word characters, optionally hyphen-joined, so hyphenated
/// compounds survive as single tokens while punctuation and whitespace are
/// dropped.
static WORD_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:-\w+)*").expect("word-run pattern is valid"));

/// Romanian diacritics folded to their base Latin letters. Both the comma and
/// the legacy cedilla forms appear in real song files, so both are mapped.
const DIACRITICS: &[(char, char)] = &[
    ('ă', 'a'),
    ('â', 'a'),
    ('î', 'i'),
    ('ș', 's'),
    ('ş', 's'),
    ('ț', 't'),
    ('ţ', 't'),
];

/// Produce the canonical search form of a string: Unicode lowercase, fold the
/// diacritics above, keep word tokens (hyphenated compounds included), join
/// with single spaces. Total over any input and idempotent.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|ch| {
            DIACRITICS
                .iter()
                .find(|(accented, _)| *accented == ch)
                .map(|(_, base)| *base)
                .unwrap_or(ch)
        })
        .collect();

    WORD_RUN
        .find_iter(&folded)
        .map(|token| token.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The cached search key for a library song: title and raw body normalized
/// together. Computed once when the record is loaded.
pub fn search_key(title: &str, body: &str) -> String {
    normalize(&format!("{title} {body}"))
}

/// Substring match of a user query against a cached search key. The query is
/// folded through the same normalizer, so the match is accent- and
/// punctuation-insensitive. An empty query matches everything.
pub fn matches(key: &str, query: &str) -> bool {
    key.contains(&normalize(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_romanian_diacritics() {
        assert_eq!(normalize("Șoșoacă-Mânăstire"), "sosoaca-manastire");
        assert_eq!(normalize("țară şi ţinut"), "tara si tinut");
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Hark! The Herald, Angels Sing."), "hark the herald angels sing");
    }

    #[test]
    fn keeps_hyphenated_compounds_together() {
        assert_eq!(normalize("two-line slide -- dashes"), "two-line slide dashes");
    }

    #[test]
    fn total_over_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ..."), "");
    }

    #[test]
    fn idempotent() {
        for input in ["Șoșoacă-Mânăstire", "Hark! The Herald", "", "a  b\tc"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn query_matching_is_accent_insensitive() {
        let key = search_key("Cântări de laudă", "Verse 1\nSlavă Ție\n---\nVerse 1");
        assert!(matches(&key, "cantari"));
        assert!(matches(&key, "Slavă"));
        assert!(matches(&key, "slava tie"));
        assert!(!matches(&key, "absent"));
        assert!(matches(&key, ""));
    }
}
