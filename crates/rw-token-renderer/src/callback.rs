//! Registered callables: rules, handlers and hooks.
//!
//! Every callable receives the [`Renderer`] it is registered on as its first
//! argument. Through it a callback reads and writes the renderer state,
//! registers further extensions, or re-enters the pipeline (for example
//! [`Renderer::render_token`] on a neighbouring token).

use std::fmt;
use std::iter;
use std::rc::Rc;

use crate::backend::RenderBackend;
use crate::error::Result;
use crate::lifecycle::Lifecycle;
use crate::renderer::Renderer;
use crate::token::{SourceMap, Token};

type TokenCallable<B, S> = dyn Fn(
    &mut Renderer<B, S>,
    &[Token],
    usize,
    &<B as RenderBackend>::Options,
    &<B as RenderBackend>::Env,
) -> Result<String>;

type HookCallable<B, S> = dyn Fn(
    &mut Renderer<B, S>,
    &HookContext<'_>,
    &<B as RenderBackend>::Options,
    &<B as RenderBackend>::Env,
) -> Result<String>;

/// Callable rendering `tokens[idx]`.
///
/// Used both as a [`Rule`] (sole replacement of the backend for a token type)
/// and as a [`Handler`] (additive contribution before the rule or backend).
///
/// Closures that use the renderer argument are easiest to register through
/// [`Renderer::set_rule_fn`] or [`Renderer::handle_fn`] (and the builder
/// equivalents), which fix the backend and state types up front.
pub struct TokenFn<B: RenderBackend, S>(Rc<TokenCallable<B, S>>);

/// Single authoritative renderer for a token type.
pub type Rule<B, S> = TokenFn<B, S>;

/// Additive contributor for a token type.
pub type Handler<B, S> = TokenFn<B, S>;

impl<B: RenderBackend, S> TokenFn<B, S> {
    /// Wrap a closure.
    ///
    /// # Example
    ///
    /// ```
    /// use rw_token_renderer::{Rule, RenderBackend, Token};
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
    /// let upper: Rule<Plain, ()> =
    ///     Rule::new(|_r, tokens, idx, _o, _e| Ok(tokens[idx].content.to_uppercase()));
    /// ```
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Renderer<B, S>, &[Token], usize, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        Self(Rc::new(f))
    }

    pub(crate) fn call(
        &self,
        renderer: &mut Renderer<B, S>,
        tokens: &[Token],
        idx: usize,
        options: &B::Options,
        env: &B::Env,
    ) -> Result<String> {
        (self.0)(renderer, tokens, idx, options, env)
    }
}

impl<B: RenderBackend, S> Clone for TokenFn<B, S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<B: RenderBackend, S> fmt::Debug for TokenFn<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenFn(..)")
    }
}

/// A single callable registers like a one-element list.
impl<B: RenderBackend, S> IntoIterator for TokenFn<B, S> {
    type Item = Self;
    type IntoIter = iter::Once<Self>;

    fn into_iter(self) -> Self::IntoIter {
        iter::once(self)
    }
}

/// Input visible to a hook.
#[derive(Clone, Copy, Debug)]
pub struct HookContext<'a> {
    /// Lifecycle point being run.
    pub lifecycle: Lifecycle,
    /// Tokens of the pass: the full sequence for top-level hooks, the
    /// children of the `inline` token for inline hooks.
    pub tokens: &'a [Token],
    /// Source map resolved for the enclosing `inline` token.
    ///
    /// Always `None` for top-level hooks.
    pub map: Option<SourceMap>,
    /// Ordered output of the current inline pass so far.
    ///
    /// Inline hook results and rendered children share this one list. A
    /// [`Lifecycle::BeforeInlineRender`] hook sees the results of the hooks
    /// before it; a [`Lifecycle::AfterInlineRender`] hook also sees every
    /// rendered child. Always empty for top-level hooks.
    pub outputs: &'a [String],
}

/// Callback run at a [`Lifecycle`] point.
pub struct Hook<B: RenderBackend, S>(Rc<HookCallable<B, S>>);

impl<B: RenderBackend, S> Hook<B, S> {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Renderer<B, S>, &HookContext<'_>, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        Self(Rc::new(f))
    }

    pub(crate) fn call(
        &self,
        renderer: &mut Renderer<B, S>,
        ctx: &HookContext<'_>,
        options: &B::Options,
        env: &B::Env,
    ) -> Result<String> {
        (self.0)(renderer, ctx, options, env)
    }
}

impl<B: RenderBackend, S> Clone for Hook<B, S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<B: RenderBackend, S> fmt::Debug for Hook<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

impl<B: RenderBackend, S> IntoIterator for Hook<B, S> {
    type Item = Self;
    type IntoIter = iter::Once<Self>;

    fn into_iter(self) -> Self::IntoIter {
        iter::once(self)
    }
}
