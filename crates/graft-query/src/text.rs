//! Text normalization shared by the analyzer and the curator.

use std::collections::HashSet;

/// Fold one character to its lowercase, diacritic-free form. Covers the
/// Latin-1 range; characters outside it pass through lowercased.
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Lowercase and strip Latin diacritics.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(|c| c.to_lowercase())
        .map(fold_char)
        .collect()
}

/// Split normalized text into alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Tokenize into a set for overlap computations.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

/// True when the text carries a balanced pair of double quotes (straight
/// or curly) around a non-empty span.
pub fn has_quoted_span(text: &str) -> bool {
    has_span_between(text, '"', '"') || has_span_between(text, '\u{201c}', '\u{201d}')
}

fn has_span_between(text: &str, open: char, close: char) -> bool {
    let Some(start) = text.find(open) else {
        return false;
    };
    let rest = &text[start + open.len_utf8()..];
    match rest.find(close) {
        Some(end) => !rest[..end].trim().is_empty(),
        None => false,
    }
}
