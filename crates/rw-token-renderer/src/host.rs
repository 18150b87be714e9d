//! Integration with a host parser.
//!
//! A host parser owns the active renderer behind the object-safe
//! [`TokenRender`] trait, so any [`Renderer`] regardless of its state type can
//! replace the host's default one.

use crate::backend::RenderBackend;
use crate::builder::RendererBuilder;
use crate::error::Result;
use crate::renderer::Renderer;
use crate::token::Token;

/// Object-safe render entry point.
pub trait TokenRender<O, E> {
    /// Render a token sequence to a string.
    fn render(&mut self, tokens: &[Token], options: &O, env: &E) -> Result<String>;
}

impl<B: RenderBackend, S> TokenRender<B::Options, B::Env> for Renderer<B, S> {
    fn render(&mut self, tokens: &[Token], options: &B::Options, env: &B::Env) -> Result<String> {
        Renderer::render(self, tokens, options, env)
    }
}

/// Parser object that renders through a replaceable renderer.
pub trait RendererHost {
    /// Options type the host passes to its renderer.
    type Options;
    /// Environment type the host passes to its renderer.
    type Env;

    /// Make `renderer` the active renderer.
    fn set_renderer(&mut self, renderer: Box<dyn TokenRender<Self::Options, Self::Env>>);
}

/// Build a renderer and install it as the active renderer of `host`.
///
/// # Example
///
/// ```
/// use rw_token_renderer::{
///     RenderBackend, Renderer, RendererHost, Token, TokenRender, install,
/// };
///
/// struct Plain;
///
/// impl RenderBackend for Plain {
///     type Options = ();
///     type Env = ();
///     fn render_token(tokens: &[Token], idx: usize, _: &(), _: &()) -> String {
///         tokens[idx].content.clone()
///     }
/// }
///
/// #[derive(Default)]
/// struct Parser {
///     renderer: Option<Box<dyn TokenRender<(), ()>>>,
/// }
///
/// impl RendererHost for Parser {
///     type Options = ();
///     type Env = ();
///     fn set_renderer(&mut self, renderer: Box<dyn TokenRender<(), ()>>) {
///         self.renderer = Some(renderer);
///     }
/// }
///
/// let mut parser = Parser::default();
/// let builder = Renderer::<Plain>::builder().rule_fn("text", |_r, _t, _i, _o, _e| Ok("*".to_owned()));
/// install(&mut parser, builder);
///
/// let output = parser
///     .renderer
///     .as_mut()
///     .map(|r| r.render(&[Token::text("x")], &(), &()))
///     .transpose()
///     .unwrap();
/// assert_eq!(output.as_deref(), Some("*"));
/// ```
pub fn install<H, B, S>(host: &mut H, builder: RendererBuilder<B, S>)
where
    H: RendererHost<Options = B::Options, Env = B::Env> + ?Sized,
    B: RenderBackend + 'static,
    S: 'static,
{
    let renderer = builder.build();
    tracing::debug!(mode = %renderer.mode(), "Installing token renderer");
    host.set_renderer(Box::new(renderer));
}
