//! Token model consumed by the renderer.
//!
//! Tokens are produced upstream by a markdown parser. The renderer only reads
//! `kind`, `nesting`, `map` and `children`; the remaining payload fields are
//! carried for rules and backends.

use crate::error::InvalidNesting;

/// Token type of the inline container whose children get their own pass.
pub const INLINE: &str = "inline";

/// Nesting direction of a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i8", into = "i8"))]
pub enum Nesting {
    /// Opening token (`+1`), e.g. `paragraph_open`.
    Open,
    /// Self-contained token (`0`), e.g. `text` or `inline`.
    #[default]
    SelfClosing,
    /// Closing token (`-1`), e.g. `paragraph_close`.
    Close,
}

impl Nesting {
    /// Depth delta contributed by this token.
    #[must_use]
    pub fn delta(self) -> i8 {
        match self {
            Self::Open => 1,
            Self::SelfClosing => 0,
            Self::Close => -1,
        }
    }
}

impl From<Nesting> for i8 {
    fn from(nesting: Nesting) -> Self {
        nesting.delta()
    }
}

impl TryFrom<i8> for Nesting {
    type Error = InvalidNesting;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Open),
            0 => Ok(Self::SelfClosing),
            -1 => Ok(Self::Close),
            other => Err(InvalidNesting(other)),
        }
    }
}

/// Source line range a token spans: `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "(usize, usize)", into = "(usize, usize)")
)]
pub struct SourceMap {
    /// First line (0-indexed).
    pub start: usize,
    /// Line after the last one.
    pub end: usize,
}

impl SourceMap {
    /// Create a new source map.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<(usize, usize)> for SourceMap {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<SourceMap> for (usize, usize) {
    fn from(map: SourceMap) -> Self {
        (map.start, map.end)
    }
}

/// A single token of a parsed document.
///
/// # Example
///
/// ```
/// use rw_token_renderer::{Nesting, Token};
///
/// let heading = [
///     Token::new("heading_open", "h1", Nesting::Open).with_map(0, 1),
///     Token::inline([Token::text("Hello")]),
///     Token::new("heading_close", "h1", Nesting::Close),
/// ];
///
/// assert!(heading[1].is_inline_container());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Token {
    /// Token type, e.g. `paragraph_open`.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    /// HTML tag name, e.g. `p`.
    pub tag: String,
    /// Nesting direction.
    pub nesting: Nesting,
    /// Attributes as ordered name/value pairs.
    pub attrs: Vec<(String, String)>,
    /// Source line range, if the parser recorded one.
    pub map: Option<SourceMap>,
    /// Child tokens (inline containers only).
    pub children: Option<Vec<Token>>,
    /// Text payload.
    pub content: String,
    /// Markup characters, e.g. `**` or the fence string.
    pub markup: String,
    /// Fence info string.
    pub info: String,
}

impl Token {
    /// Create a token with the given type, tag and nesting.
    #[must_use]
    pub fn new(kind: impl Into<String>, tag: impl Into<String>, nesting: Nesting) -> Self {
        Self {
            kind: kind.into(),
            tag: tag.into(),
            nesting,
            ..Self::default()
        }
    }

    /// Create a `text` token.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new("text", "", Nesting::SelfClosing).with_content(content)
    }

    /// Create an `inline` container holding `children`.
    #[must_use]
    pub fn inline(children: impl IntoIterator<Item = Token>) -> Self {
        Self::new(INLINE, "", Nesting::SelfClosing).with_children(children)
    }

    /// Set the source map.
    #[must_use]
    pub fn with_map(mut self, start: usize, end: usize) -> Self {
        self.map = Some(SourceMap::new(start, end));
        self
    }

    /// Set the children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Token>) -> Self {
        self.children = Some(children.into_iter().collect());
        self
    }

    /// Set the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the markup.
    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    /// Set the fence info string.
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    /// Append an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Look up the first attribute with the given name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Children to render in an inline pass.
    ///
    /// Returns `Some` only for `inline` tokens with at least one child.
    #[must_use]
    pub fn inline_children(&self) -> Option<&[Token]> {
        if self.kind != INLINE {
            return None;
        }
        self.children.as_deref().filter(|c| !c.is_empty())
    }

    /// Whether this token is rendered through the inline pass.
    #[must_use]
    pub fn is_inline_container(&self) -> bool {
        self.inline_children().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting_delta() {
        assert_eq!(Nesting::Open.delta(), 1);
        assert_eq!(Nesting::SelfClosing.delta(), 0);
        assert_eq!(Nesting::Close.delta(), -1);
    }

    #[test]
    fn test_nesting_try_from() {
        assert_eq!(Nesting::try_from(-1).unwrap(), Nesting::Close);
        assert_eq!(Nesting::try_from(1).unwrap(), Nesting::Open);
        assert_eq!(Nesting::try_from(2).unwrap_err(), InvalidNesting(2));
    }

    #[test]
    fn test_inline_children_requires_inline_type() {
        let token =
            Token::new("paragraph_open", "p", Nesting::Open).with_children([Token::text("x")]);
        assert!(token.inline_children().is_none());
    }

    #[test]
    fn test_inline_children_empty() {
        let token = Token::inline([]);
        assert!(!token.is_inline_container());

        let token = Token::new(INLINE, "", Nesting::SelfClosing);
        assert!(!token.is_inline_container());
    }

    #[test]
    fn test_inline_children_present() {
        let token = Token::inline([Token::text("a"), Token::text("b")]);
        let children = token.inline_children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].content, "b");
    }

    #[test]
    fn test_attr_lookup() {
        let token = Token::new("link_open", "a", Nesting::Open)
            .with_attr("href", "/guide")
            .with_attr("title", "Guide");
        assert_eq!(token.attr("href"), Some("/guide"));
        assert_eq!(token.attr("rel"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_token_json() {
        let json = r#"{"type":"heading_open","tag":"h2","nesting":1,"map":[3,4]}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.kind, "heading_open");
        assert_eq!(token.nesting, Nesting::Open);
        assert_eq!(token.map, Some(SourceMap::new(3, 4)));
        assert!(token.children.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_bad_nesting() {
        let json = r#"{"type":"text","nesting":5}"#;
        assert!(serde_json::from_str::<Token>(json).is_err());
    }
}
