//! Renderer construction.

use crate::backend::RenderBackend;
use crate::callback::{Handler, Hook, HookContext, Rule};
use crate::error::Result;
use crate::lifecycle::{Lifecycle, Mode};
use crate::renderer::{Renderer, report_ignored};
use crate::token::Token;

type InitState<S> = Box<dyn FnOnce() -> S>;

/// Builder for [`Renderer`].
///
/// Every setting is optional: mode defaults to [`Mode::Production`], the
/// extension tables start empty and state comes from `S::default()` unless an
/// initializer is given. The initializer runs exactly once, in
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rw_token_renderer::{Mode, RenderBackend, Renderer, RendererBuilder, Token};
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
/// struct Counter(usize);
///
/// let mut renderer: Renderer<Plain, Counter> =
///     RendererBuilder::<Plain, Counter>::with_init_state(|| Counter(10))
///         .mode(Mode::Development)
///         .handler_fn("text", |r, _t, _i, _o, _e| {
///             r.state_mut().0 += 1;
///             Ok(String::new())
///         })
///         .build();
///
/// assert_eq!(renderer.state().0, 10);
/// assert_eq!(renderer.mode(), Mode::Development);
///
/// renderer.render(&[Token::text("a"), Token::text("b")], &(), &()).unwrap();
/// assert_eq!(renderer.state().0, 12);
/// ```
pub struct RendererBuilder<B: RenderBackend, S> {
    mode: Mode,
    rules: Vec<(String, Rule<B, S>)>,
    handlers: Vec<(String, Handler<B, S>)>,
    hooks: Vec<(Lifecycle, Hook<B, S>)>,
    init_state: InitState<S>,
}

impl<B: RenderBackend, S: Default + 'static> RendererBuilder<B, S> {
    /// Create a builder whose state starts as `S::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_init_state(S::default)
    }
}

impl<B: RenderBackend, S: Default + 'static> Default for RendererBuilder<B, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RenderBackend, S> RendererBuilder<B, S> {
    /// Create a builder whose state is produced by `init`.
    #[must_use]
    pub fn with_init_state<F>(init: F) -> Self
    where
        F: FnOnce() -> S + 'static,
    {
        Self {
            mode: Mode::default(),
            rules: Vec::new(),
            handlers: Vec::new(),
            hooks: Vec::new(),
            init_state: Box::new(init),
        }
    }

    /// Replace the state initializer.
    #[must_use]
    pub fn init_state<F>(mut self, init: F) -> Self
    where
        F: FnOnce() -> S + 'static,
    {
        self.init_state = Box::new(init);
        self
    }

    /// Set the render mode.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a rule. A later rule for the same type replaces an earlier one.
    #[must_use]
    pub fn rule(mut self, kind: impl Into<String>, rule: Rule<B, S>) -> Self {
        self.rules.push((kind.into(), rule));
        self
    }

    /// Add a closure as the rule for a token type.
    #[must_use]
    pub fn rule_fn<F>(self, kind: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Renderer<B, S>, &[Token], usize, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        self.rule(kind, Rule::new(f))
    }

    /// Add several rules.
    #[must_use]
    pub fn rules<I, K>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (K, Rule<B, S>)>,
        K: Into<String>,
    {
        self.rules
            .extend(rules.into_iter().map(|(kind, rule)| (kind.into(), rule)));
        self
    }

    /// Add one handler or a list of handlers for a token type.
    #[must_use]
    pub fn handler<H>(mut self, kind: impl Into<String>, handlers: H) -> Self
    where
        H: IntoIterator<Item = Handler<B, S>>,
    {
        let kind = kind.into();
        self.handlers
            .extend(handlers.into_iter().map(|h| (kind.clone(), h)));
        self
    }

    /// Add a closure as a handler for a token type.
    #[must_use]
    pub fn handler_fn<F>(self, kind: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Renderer<B, S>, &[Token], usize, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        self.handler(kind, Handler::new(f))
    }

    /// Add handlers for several token types.
    #[must_use]
    pub fn handlers<I, K, H>(self, handlers: I) -> Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: Into<String>,
        H: IntoIterator<Item = Handler<B, S>>,
    {
        handlers
            .into_iter()
            .fold(self, |builder, (kind, list)| builder.handler(kind, list))
    }

    /// Add one hook or a list of hooks for a lifecycle point.
    #[must_use]
    pub fn hook<H>(mut self, lifecycle: Lifecycle, hooks: H) -> Self
    where
        H: IntoIterator<Item = Hook<B, S>>,
    {
        self.hooks.extend(hooks.into_iter().map(|h| (lifecycle, h)));
        self
    }

    /// Add a closure as a hook for a lifecycle point.
    #[must_use]
    pub fn hook_fn<F>(self, lifecycle: Lifecycle, f: F) -> Self
    where
        F: Fn(&mut Renderer<B, S>, &HookContext<'_>, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        self.hook(lifecycle, Hook::new(f))
    }

    /// Add hooks for several lifecycle points.
    #[must_use]
    pub fn hooks<I, H>(self, hooks: I) -> Self
    where
        I: IntoIterator<Item = (Lifecycle, H)>,
        H: IntoIterator<Item = Hook<B, S>>,
    {
        hooks
            .into_iter()
            .fold(self, |builder, (lifecycle, list)| builder.hook(lifecycle, list))
    }

    /// Add hooks keyed by lifecycle name, e.g. `beforeInlineRender`.
    ///
    /// Unknown names are ignored.
    #[must_use]
    pub fn hooks_named<I, K, H>(self, hooks: I) -> Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: IntoIterator<Item = Hook<B, S>>,
    {
        hooks.into_iter().fold(self, |builder, (name, list)| {
            match name.as_ref().parse::<Lifecycle>() {
                Ok(lifecycle) => builder.hook(lifecycle, list),
                Err(e) => {
                    report_ignored(builder.mode, "hook", &e.to_string());
                    builder
                }
            }
        })
    }

    /// Build the renderer, running the state initializer once.
    #[must_use]
    pub fn build(self) -> Renderer<B, S> {
        let state = (self.init_state)();
        let mut renderer = Renderer::with_state(self.mode, state);

        for (kind, handler) in self.handlers {
            renderer.handle(kind, handler);
        }
        for (lifecycle, hook) in self.hooks {
            renderer.hook(lifecycle, hook);
        }
        renderer.set_rules(self.rules);

        tracing::debug!(mode = %self.mode, "Renderer built");
        renderer
    }
}
