//! Nearest enclosing source map lookup.

use crate::token::{SourceMap, Token};

/// Find the source map of the token that structurally encloses `idx`.
///
/// Walks backward from `idx` (inclusive) to the start of `tokens`, summing
/// nesting deltas. The first token carrying a map while the running depth is
/// non-negative wins. Closed sibling subtrees drive the depth negative and are
/// skipped until their opening token brings it back.
///
/// Returns `None` when no such token exists or `idx` is out of range.
///
/// # Example
///
/// ```
/// use rw_token_renderer::{Nesting, SourceMap, Token, resolve_source_map};
///
/// let tokens = [
///     Token::new("paragraph_open", "p", Nesting::Open).with_map(0, 1),
///     Token::text("body"),
///     Token::new("paragraph_close", "p", Nesting::Close),
/// ];
///
/// assert_eq!(resolve_source_map(&tokens, 2), Some(SourceMap::new(0, 1)));
/// ```
#[must_use]
pub fn resolve_source_map(tokens: &[Token], idx: usize) -> Option<SourceMap> {
    let scanned = tokens.get(..=idx)?;
    let mut depth: i32 = 0;
    for token in scanned.iter().rev() {
        depth += i32::from(token.nesting.delta());
        if depth >= 0 && token.map.is_some() {
            return token.map;
        }
    }
    None
}
