use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Digits, parentheses and slashes are not part of a searchable name.
static NON_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\\/0-9]+").expect("valid name filter regex"));

/// Split names into suggestion tokens.
///
/// Each name is cleaned (digits, parentheses and slashes removed, whitespace collapsed,
/// lowercased) and contributes the whole cleaned name followed by each of its words.
/// Empty tokens are dropped and repeated tokens keep their first position. Other
/// punctuation (apostrophes, commas, periods) is kept as part of the word.
///
/// `"John Smith 123"` yields `["john smith", "john", "smith"]`.
pub fn tokenize_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for name in names {
        let cleaned = NON_NAME_CHARS.replace_all(name.as_ref(), "").to_lowercase();
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        let candidates = std::iter::once(words.join(" ")).chain(words.iter().map(|w| w.to_string()));
        for token in candidates {
            if !token.is_empty() && seen.insert(token.clone()) {
                tokens.push(token);
            }
        }
    }

    tokens
}
