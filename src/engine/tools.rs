//! Filename filtering utilities

use std::path::Path;

/// Returns true when `path`'s file name matches `pattern`, or when there is
/// no pattern at all.
pub fn matches_pattern(path: &Path, pattern: Option<&str>) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    glob_match(pattern, name)
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    fn matches(pattern: &[char], text: &[char]) -> bool {
        match pattern.split_first() {
            None => text.is_empty(),
            Some((&'*', rest)) => (0..=text.len()).any(|i| matches(rest, &text[i..])),
            Some((&'?', rest)) => !text.is_empty() && matches(rest, &text[1..]),
            Some((&c, rest)) => text.first() == Some(&c) && matches(rest, &text[1..]),
        }
    }
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    matches(&pattern, &text)
}
