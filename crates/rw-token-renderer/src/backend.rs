//! Fallback rendering backend.

use crate::token::Token;

/// Output-format backend supplying the default single-token rendering.
///
/// The renderer calls [`render_token`](Self::render_token) for any token whose
/// type has no registered rule. The backend also fixes the types of the two
/// pass-through contexts handed to every rule, handler and hook.
///
/// # Example
///
/// ```
/// use rw_token_renderer::{Nesting, RenderBackend, Renderer, Token};
///
/// struct TagBackend;
///
/// impl RenderBackend for TagBackend {
///     type Options = ();
///     type Env = ();
///
///     fn render_token(tokens: &[Token], idx: usize, _options: &(), _env: &()) -> String {
///         let token = &tokens[idx];
///         match token.nesting {
///             Nesting::Open => format!("<{}>", token.tag),
///             Nesting::Close => format!("</{}>", token.tag),
///             Nesting::SelfClosing => token.content.clone(),
///         }
///     }
/// }
///
/// let tokens = [
///     Token::new("paragraph_open", "p", Nesting::Open),
///     Token::text("hi"),
///     Token::new("paragraph_close", "p", Nesting::Close),
/// ];
///
/// let mut renderer = Renderer::<TagBackend>::new();
/// assert_eq!(renderer.render(&tokens, &(), &()).unwrap(), "<p>hi</p>");
/// ```
pub trait RenderBackend {
    /// Rendering options passed through to every callback.
    type Options;
    /// Per-render environment passed through to every callback.
    type Env;

    /// Render `tokens[idx]` without any registered rule.
    fn render_token(tokens: &[Token], idx: usize, options: &Self::Options, env: &Self::Env)
    -> String;
}
