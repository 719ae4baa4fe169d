//! IS pattern parsing
//!
//! A pattern may carry one leading `*`, one trailing `*`, both, or neither.
//! Any `*` between them is rejected.

use crate::query::Pattern;

/// Parses an IS string into a [`Pattern`], or `None` if a wildcard is misplaced
pub fn parse_pattern(input: &str) -> Option<Pattern> {
    let (leading, rest) = match input.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let (trailing, inner) = match rest.strip_suffix('*') {
        Some(inner) => (true, inner),
        None => (false, rest),
    };

    if inner.contains('*') {
        return None;
    }

    let inner = inner.to_string();
    Some(match (leading, trailing) {
        (false, false) => Pattern::Exact(inner),
        (false, true) => Pattern::Prefix(inner),
        (true, false) => Pattern::Suffix(inner),
        (true, true) => Pattern::Contains(inner),
    })
}
