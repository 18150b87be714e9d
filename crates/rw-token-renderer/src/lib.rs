//! Extensible token-stream renderer.
//!
//! This crate provides a [`Renderer`] that turns a markdown token stream
//! (produced by an upstream parser) into a string, and lets the host customize
//! the output without touching the parser.
//!
//! # Extension points
//!
//! - [`Rule`]: the single replacement of the backend rendering for a token
//!   type. Registering a rule again replaces it.
//! - [`Handler`]: additive contributors for a token type. They run before the
//!   rule (or backend) and never suppress it. Registering again appends.
//! - [`Hook`]: callbacks at the four [`Lifecycle`] points around the top-level
//!   pass and every inline pass. Registering again appends.
//!
//! The default rendering of a token comes from a [`RenderBackend`], which also
//! fixes the option and environment types passed through to every callback.
//! Callbacks receive the renderer itself and coordinate through its state.
//! Closures register most easily through the `*_fn` shorthands
//! ([`Renderer::handle_fn`], [`RendererBuilder::rule_fn`] and friends), which
//! fix the backend and state types before the closure is checked.
//!
//! # Inline tokens
//!
//! `inline` tokens with children are not rendered directly: their children go
//! through [`Renderer::render_inline`], framed by the inline hooks, which also
//! see the source map of the enclosing block (see [`resolve_source_map`]).
//!
//! # Example
//!
//! ```
//! use rw_token_renderer::{Nesting, RenderBackend, Renderer, Token};
//!
//! struct TagBackend;
//!
//! impl RenderBackend for TagBackend {
//!     type Options = ();
//!     type Env = ();
//!
//!     fn render_token(tokens: &[Token], idx: usize, _: &(), _: &()) -> String {
//!         let token = &tokens[idx];
//!         match token.nesting {
//!             Nesting::Open => format!("<{}>", token.tag),
//!             Nesting::Close => format!("</{}>", token.tag),
//!             Nesting::SelfClosing => token.content.clone(),
//!         }
//!     }
//! }
//!
//! let mut renderer = Renderer::<TagBackend>::new();
//! renderer.handle_fn("heading_open", |_r, _tokens, _idx, _o, _e| Ok("\n".to_owned()));
//!
//! let tokens = [
//!     Token::new("heading_open", "h2", Nesting::Open),
//!     Token::inline([Token::text("Usage")]),
//!     Token::new("heading_close", "h2", Nesting::Close),
//! ];
//!
//! assert_eq!(renderer.render(&tokens, &(), &()).unwrap(), "\n<h2>Usage</h2>");
//! ```

mod backend;
mod builder;
mod callback;
mod error;
mod host;
mod lifecycle;
mod renderer;
mod source_map;
mod token;

pub use backend::RenderBackend;
pub use builder::RendererBuilder;
pub use callback::{Handler, Hook, HookContext, Rule, TokenFn};
pub use error::{BoxError, Error, InvalidNesting, Result, UnknownLifecycle, UnknownMode};
pub use host::{RendererHost, TokenRender, install};
pub use lifecycle::{Lifecycle, Mode};
pub use renderer::Renderer;
pub use source_map::resolve_source_map;
pub use token::{INLINE, Nesting, SourceMap, Token};
