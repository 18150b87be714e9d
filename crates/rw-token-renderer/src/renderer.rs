//! Token renderer with rules, handlers and lifecycle hooks.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::backend::RenderBackend;
use crate::builder::RendererBuilder;
use crate::callback::{Handler, Hook, HookContext, Rule};
use crate::error::Result;
use crate::lifecycle::{Lifecycle, Mode};
use crate::source_map::resolve_source_map;
use crate::token::{SourceMap, Token};

/// Extensible token-stream renderer.
///
/// For every token the renderer runs, in order:
///
/// 1. all [`Handler`]s registered for the token type, in registration order;
/// 2. the [`Rule`] registered for the token type, or the backend's
///    [`render_token`](RenderBackend::render_token) when there is none.
///
/// Handlers never suppress the rule or the backend. `inline` tokens with
/// children are rendered through a separate inline pass with its own hooks.
///
/// `S` is caller-defined state shared by every callback for the lifetime of
/// the renderer. The renderer is single-threaded; create one per thread.
///
/// # Example
///
/// ```
/// use rw_token_renderer::{Hook, Lifecycle, Nesting, RenderBackend, Renderer, Rule, Token};
///
/// struct TagBackend;
///
/// impl RenderBackend for TagBackend {
///     type Options = ();
///     type Env = ();
///
///     fn render_token(tokens: &[Token], idx: usize, _: &(), _: &()) -> String {
///         let token = &tokens[idx];
///         match token.nesting {
///             Nesting::Open => format!("<{}>", token.tag),
///             Nesting::Close => format!("</{}>", token.tag),
///             Nesting::SelfClosing => token.content.clone(),
///         }
///     }
/// }
///
/// let mut renderer = Renderer::<TagBackend>::builder()
///     .rule("text", Rule::new(|_r, tokens, idx, _o, _e| Ok(tokens[idx].content.to_uppercase())))
///     .hook(Lifecycle::AfterRender, Hook::new(|_r, _ctx, _o, _e| Ok("\n".to_owned())))
///     .build();
///
/// let tokens = [
///     Token::new("heading_open", "h1", Nesting::Open),
///     Token::inline([Token::text("title")]),
///     Token::new("heading_close", "h1", Nesting::Close),
/// ];
///
/// assert_eq!(renderer.render(&tokens, &(), &()).unwrap(), "<h1>TITLE</h1>\n");
/// ```
pub struct Renderer<B: RenderBackend, S = ()> {
    mode: Mode,
    rules: HashMap<String, Rule<B, S>>,
    handlers: HashMap<String, Rc<[Handler<B, S>]>>,
    hooks: HashMap<Lifecycle, Rc<[Hook<B, S>]>>,
    state: S,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend, S: Default + 'static> Renderer<B, S> {
    /// Create a renderer with no extensions and default state.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start building a renderer.
    #[must_use]
    pub fn builder() -> RendererBuilder<B, S> {
        RendererBuilder::new()
    }
}

impl<B: RenderBackend, S: Default + 'static> Default for Renderer<B, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: RenderBackend, S> Renderer<B, S> {
    pub(crate) fn with_state(mode: Mode, state: S) -> Self {
        Self {
            mode,
            rules: HashMap::new(),
            handlers: HashMap::new(),
            hooks: HashMap::new(),
            state,
            _backend: PhantomData,
        }
    }

    /// Render mode the renderer was built with.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Shared renderer state.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Shared renderer state, mutably.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consume the renderer and return its state.
    pub fn into_state(self) -> S {
        self.state
    }

    /// Register `rule` as the only rule for `kind`, replacing any previous one.
    ///
    /// Empty type names are ignored.
    pub fn set_rule(&mut self, kind: impl Into<String>, rule: Rule<B, S>) -> &mut Self {
        let kind = kind.into();
        if kind.is_empty() {
            report_ignored(self.mode, "rule", "empty token type");
            return self;
        }
        if self.rules.insert(kind.clone(), rule).is_some() {
            tracing::debug!(kind = %kind, "Replaced render rule");
        }
        self
    }

    /// Register several rules; later entries for the same type win.
    pub fn set_rules<I, K>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Rule<B, S>)>,
        K: Into<String>,
    {
        for (kind, rule) in rules {
            self.set_rule(kind, rule);
        }
        self
    }

    /// Register a closure as the only rule for `kind`.
    ///
    /// Shorthand for [`set_rule`](Self::set_rule) with [`Rule::new`].
    pub fn set_rule_fn<F>(&mut self, kind: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut Renderer<B, S>, &[Token], usize, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        self.set_rule(kind, Rule::new(f))
    }

    /// Rule registered for `kind`.
    #[must_use]
    pub fn rule(&self, kind: &str) -> Option<&Rule<B, S>> {
        self.rules.get(kind)
    }

    /// Whether a rule is registered for `kind`.
    #[must_use]
    pub fn has_rule(&self, kind: &str) -> bool {
        self.rules.contains_key(kind)
    }

    /// Remove the rule for `kind`, restoring the backend fallback.
    pub fn remove_rule(&mut self, kind: &str) -> Option<Rule<B, S>> {
        self.rules.remove(kind)
    }

    /// Append handlers for `kind` after any already registered.
    ///
    /// Accepts a single [`Handler`] or any collection of them. Empty type
    /// names are ignored.
    pub fn handle<H>(&mut self, kind: impl Into<String>, handlers: H) -> &mut Self
    where
        H: IntoIterator<Item = Handler<B, S>>,
    {
        let kind = kind.into();
        if kind.is_empty() {
            report_ignored(self.mode, "handler", "empty token type");
            return self;
        }
        let mut added = handlers.into_iter().peekable();
        if added.peek().is_none() {
            return self;
        }
        let list = self
            .handlers
            .get(&kind)
            .into_iter()
            .flat_map(|list| list.iter().cloned())
            .chain(added)
            .collect();
        self.handlers.insert(kind, list);
        self
    }

    /// Append a closure as a handler for `kind`.
    ///
    /// Shorthand for [`handle`](Self::handle) with [`Handler::new`].
    pub fn handle_fn<F>(&mut self, kind: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut Renderer<B, S>, &[Token], usize, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        self.handle(kind, Handler::new(f))
    }

    /// Append handlers for several token types.
    pub fn set_handlers<I, K, H>(&mut self, handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: Into<String>,
        H: IntoIterator<Item = Handler<B, S>>,
    {
        for (kind, list) in handlers {
            self.handle(kind, list);
        }
        self
    }

    /// Handlers registered for `kind`, in run order.
    #[must_use]
    pub fn handlers(&self, kind: &str) -> &[Handler<B, S>] {
        self.handlers.get(kind).map(|list| &list[..]).unwrap_or_default()
    }

    /// Append hooks for `lifecycle` after any already registered.
    pub fn hook<H>(&mut self, lifecycle: Lifecycle, hooks: H) -> &mut Self
    where
        H: IntoIterator<Item = Hook<B, S>>,
    {
        let mut added = hooks.into_iter().peekable();
        if added.peek().is_none() {
            return self;
        }
        let list = self
            .hooks
            .get(&lifecycle)
            .into_iter()
            .flat_map(|list| list.iter().cloned())
            .chain(added)
            .collect();
        self.hooks.insert(lifecycle, list);
        self
    }

    /// Append a closure as a hook for `lifecycle`.
    ///
    /// Shorthand for [`hook`](Self::hook) with [`Hook::new`].
    pub fn hook_fn<F>(&mut self, lifecycle: Lifecycle, f: F) -> &mut Self
    where
        F: Fn(&mut Renderer<B, S>, &HookContext<'_>, &B::Options, &B::Env) -> Result<String>
            + 'static,
    {
        self.hook(lifecycle, Hook::new(f))
    }

    /// Append hooks for several lifecycle points.
    pub fn set_hooks<I, H>(&mut self, hooks: I) -> &mut Self
    where
        I: IntoIterator<Item = (Lifecycle, H)>,
        H: IntoIterator<Item = Hook<B, S>>,
    {
        for (lifecycle, list) in hooks {
            self.hook(lifecycle, list);
        }
        self
    }

    /// Append hooks for a lifecycle point given by name, e.g. `afterRender`.
    ///
    /// Unknown names are ignored.
    pub fn hook_named<H>(&mut self, name: &str, hooks: H) -> &mut Self
    where
        H: IntoIterator<Item = Hook<B, S>>,
    {
        match name.parse::<Lifecycle>() {
            Ok(lifecycle) => self.hook(lifecycle, hooks),
            Err(e) => {
                report_ignored(self.mode, "hook", &e.to_string());
                self
            }
        }
    }

    /// Append hooks for several lifecycle points given by name.
    pub fn set_hooks_named<I, K, H>(&mut self, hooks: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, H)>,
        K: AsRef<str>,
        H: IntoIterator<Item = Hook<B, S>>,
    {
        for (name, list) in hooks {
            self.hook_named(name.as_ref(), list);
        }
        self
    }

    /// Hooks registered for `lifecycle`, in run order.
    #[must_use]
    pub fn hooks(&self, lifecycle: Lifecycle) -> &[Hook<B, S>] {
        self.hooks.get(&lifecycle).map(|list| &list[..]).unwrap_or_default()
    }

    /// Render a token sequence.
    ///
    /// Output is the `BeforeRender` hook results, then every token in order,
    /// then the `AfterRender` hook results. The first error raised by a
    /// callback aborts the render and is returned as is.
    pub fn render(
        &mut self,
        tokens: &[Token],
        options: &B::Options,
        env: &B::Env,
    ) -> Result<String> {
        tracing::debug!(tokens = tokens.len(), "Rendering token stream");

        let mut output = self.run_hooks(Lifecycle::BeforeRender, tokens, options, env)?;

        for (idx, token) in tokens.iter().enumerate() {
            if let Some(children) = token.inline_children() {
                let map = resolve_source_map(tokens, idx);
                output.push_str(&self.render_inline(children, options, env, map)?);
            } else {
                output.push_str(&self.render_token(tokens, idx, options, env)?);
            }
        }

        output.push_str(&self.run_hooks(Lifecycle::AfterRender, tokens, options, env)?);

        tracing::debug!(bytes = output.len(), "Token stream rendered");
        Ok(output)
    }

    /// Render the children of an `inline` token.
    ///
    /// `map` is the source map resolved for the enclosing `inline` token; it is
    /// exposed to inline hooks through [`HookContext::map`]. Inline hook
    /// results and rendered children go into one ordered list that every
    /// inline hook can inspect through [`HookContext::outputs`]; the list is
    /// concatenated at the end.
    pub fn render_inline(
        &mut self,
        tokens: &[Token],
        options: &B::Options,
        env: &B::Env,
        map: Option<SourceMap>,
    ) -> Result<String> {
        tracing::trace!(children = tokens.len(), ?map, "Rendering inline tokens");

        let mut outputs = Vec::with_capacity(tokens.len());
        self.collect_hooks(
            Lifecycle::BeforeInlineRender,
            tokens,
            map,
            &mut outputs,
            options,
            env,
        )?;

        for idx in 0..tokens.len() {
            outputs.push(self.render_token(tokens, idx, options, env)?);
        }

        self.collect_hooks(
            Lifecycle::AfterInlineRender,
            tokens,
            map,
            &mut outputs,
            options,
            env,
        )?;

        Ok(outputs.concat())
    }

    /// Render `tokens[idx]` through its handlers and its rule or the backend.
    ///
    /// Handlers and the rule are looked up when the call starts; callbacks
    /// registered while it runs take effect from the next token.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn render_token(
        &mut self,
        tokens: &[Token],
        idx: usize,
        options: &B::Options,
        env: &B::Env,
    ) -> Result<String> {
        let kind = tokens[idx].kind.as_str();
        let handlers = self.handlers.get(kind).cloned();
        let rule = self.rules.get(kind).cloned();

        tracing::trace!(
            kind,
            idx,
            handlers = handlers.as_deref().map_or(0, <[_]>::len),
            rule = rule.is_some(),
            "Rendering token"
        );

        let mut output = String::new();
        for handler in handlers.iter().flat_map(|list| list.iter()) {
            output.push_str(&handler.call(self, tokens, idx, options, env)?);
        }

        match rule {
            Some(rule) => output.push_str(&rule.call(self, tokens, idx, options, env)?),
            None => output.push_str(&B::render_token(tokens, idx, options, env)),
        }

        Ok(output)
    }

    /// Run top-level hooks and concatenate their results.
    fn run_hooks(
        &mut self,
        lifecycle: Lifecycle,
        tokens: &[Token],
        options: &B::Options,
        env: &B::Env,
    ) -> Result<String> {
        let Some(hooks) = self.hooks.get(&lifecycle).cloned() else {
            return Ok(String::new());
        };
        let ctx = HookContext {
            lifecycle,
            tokens,
            map: None,
            outputs: &[],
        };

        let mut output = String::new();
        for hook in hooks.iter() {
            output.push_str(&hook.call(self, &ctx, options, env)?);
        }
        Ok(output)
    }

    /// Run inline hooks, pushing each result onto `outputs`.
    fn collect_hooks(
        &mut self,
        lifecycle: Lifecycle,
        tokens: &[Token],
        map: Option<SourceMap>,
        outputs: &mut Vec<String>,
        options: &B::Options,
        env: &B::Env,
    ) -> Result<()> {
        let Some(hooks) = self.hooks.get(&lifecycle).cloned() else {
            return Ok(());
        };
        for hook in hooks.iter() {
            let ctx = HookContext {
                lifecycle,
                tokens,
                map,
                outputs: outputs.as_slice(),
            };
            let output = hook.call(self, &ctx, options, env)?;
            outputs.push(output);
        }
        Ok(())
    }
}

/// Log a registration that was dropped. Louder in development mode.
pub(crate) fn report_ignored(mode: Mode, what: &str, reason: &str) {
    match mode {
        Mode::Development => tracing::warn!(what, reason, "Ignored registration"),
        Mode::Production => tracing::debug!(what, reason, "Ignored registration"),
    }
}
