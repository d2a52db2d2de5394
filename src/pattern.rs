//! Stateless predicates over unit content.
//!
//! Every function treats absent content as "no matches". Rule modules keep
//! their patterns in `static LazyLock<Regex>` values, so a malformed pattern
//! panics the first time its rule runs rather than per unit.

use regex::Regex;

/// Whether `pattern` matches anywhere in `content`.
pub fn has_marker(content: Option<&str>, pattern: &Regex) -> bool {
    content.is_some_and(|c| pattern.is_match(c))
}

/// Plain substring presence.
pub fn has_literal(content: Option<&str>, needle: &str) -> bool {
    content.is_some_and(|c| c.contains(needle))
}

/// All non-overlapping matches of `pattern` in `content`.
pub fn extract_all<'r, 'c>(content: Option<&'c str>, pattern: &'r Regex) -> Extracted<'r, 'c> {
    Extracted { content, pattern }
}

/// Number of non-overlapping matches.
pub fn count_matches(content: Option<&str>, pattern: &Regex) -> usize {
    extract_all(content, pattern).iter().count()
}

/// Lazy, restartable view over the matches of one pattern in one piece of content.
///
/// Yields capture group 1 when the pattern has one and it participated,
/// otherwise the whole match.
#[derive(Debug, Clone, Copy)]
pub struct Extracted<'r, 'c> {
    content: Option<&'c str>,
    pattern: &'r Regex,
}

impl<'r, 'c> Extracted<'r, 'c> {
    pub fn iter(&self) -> impl Iterator<Item = &'c str> + use<'r, 'c> {
        let content = self.content.unwrap_or("");
        self.pattern.captures_iter(content).filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
