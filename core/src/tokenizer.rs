use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DASH_RUN: Regex = Regex::new(r"--+").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}_'-]+").expect("valid regex");
}

fn is_edge(c: char) -> bool {
    matches!(c, '\'' | '-' | '_')
}

/// Split text into lower-cased words, keeping order and duplicates.
///
/// Runs of two or more hyphens act as separators, single hyphens and
/// apostrophes stay inside words, and leading/trailing `'`, `-`, `_` are trimmed.
pub fn tokenize(text: &str) -> Vec<String> {
    let spaced = DASH_RUN.replace_all(text, " ");
    WORD.find_iter(&spaced)
        .filter_map(|m| {
            let word = m.as_str().trim_matches(is_edge);
            if word.is_empty() { None } else { Some(word.to_lowercase()) }
        })
        .collect()
}
