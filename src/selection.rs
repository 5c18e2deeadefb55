//! Parsing of the user's file selection.
//!
//! The duplicate listing numbers files from 1. A selection is a
//! whitespace-separated list of those numbers, written exactly as listed
//! (`"3"`, not `"03"` or `"+3"`). Repeated numbers collapse. The parsed set
//! holds 0-based [`AddressTable`](crate::duplicates::AddressTable) indices.

use std::collections::BTreeSet;

use thiserror::Error;

/// Reasons a selection line is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Nothing was entered.
    #[error("no file numbers entered")]
    Empty,

    /// A token is not a listed number.
    #[error("'{token}' is not a file number between 1 and {count}")]
    InvalidToken { token: String, count: usize },
}

/// Parse a selection line against a listing of `count` files.
///
/// # Errors
///
/// Returns [`SelectionError::Empty`] for blank input and
/// [`SelectionError::InvalidToken`] for the first token that does not name
/// a listed file.
///
/// # Example
///
/// ```
/// use dupfinder::selection::parse_selection;
///
/// let picked = parse_selection("3 1 3", 4).unwrap();
/// assert_eq!(picked.into_iter().collect::<Vec<_>>(), vec![0, 2]);
///
/// assert!(parse_selection("5", 4).is_err());
/// ```
pub fn parse_selection(input: &str, count: usize) -> Result<BTreeSet<usize>, SelectionError> {
    let mut selected = BTreeSet::new();
    for token in input.split_whitespace() {
        let index = parse_token(token, count).ok_or_else(|| SelectionError::InvalidToken {
            token: token.to_string(),
            count,
        })?;
        selected.insert(index);
    }

    if selected.is_empty() {
        return Err(SelectionError::Empty);
    }
    Ok(selected)
}

/// True when `input` would be accepted by [`parse_selection`].
#[must_use]
pub fn is_valid_index_set(input: &str, count: usize) -> bool {
    parse_selection(input, count).is_ok()
}

// Canonical decimal only, so the token must round-trip unchanged.
fn parse_token(token: &str, count: usize) -> Option<usize> {
    let number: usize = token.parse().ok()?;
    if number == 0 || number > count || number.to_string() != token {
        return None;
    }
    Some(number - 1)
}
