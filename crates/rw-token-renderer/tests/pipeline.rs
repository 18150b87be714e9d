//! End-to-end rendering through the public API.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use rw_token_renderer::{
    Error, Handler, Hook, Lifecycle, Nesting, RenderBackend, Renderer, RendererBuilder, Rule,
    SourceMap, Token, resolve_source_map,
};

/// Minimal HTML backend standing in for the host's default renderer.
struct HtmlBackend;

#[derive(Default)]
struct Options {
    xhtml: bool,
}

#[derive(Default)]
struct Env {
    base_url: String,
}

impl RenderBackend for HtmlBackend {
    type Options = Options;
    type Env = Env;

    fn render_token(tokens: &[Token], idx: usize, options: &Options, _env: &Env) -> String {
        let token = &tokens[idx];
        match (token.kind.as_str(), token.nesting) {
            ("text", _) => token.content.clone(),
            ("hr", _) if options.xhtml => "<hr />".to_owned(),
            (_, Nesting::Open) => format!("<{}>", token.tag),
            (_, Nesting::Close) => format!("</{}>", token.tag),
            (_, Nesting::SelfClosing) => format!("<{}>", token.tag),
        }
    }
}

#[derive(Default)]
struct Footnotes {
    labels: Vec<String>,
}

fn heading(text: &str) -> Vec<Token> {
    vec![
        Token::new("heading_open", "h1", Nesting::Open).with_map(0, 1),
        Token::inline([Token::text(text)]).with_map(0, 1),
        Token::new("heading_close", "h1", Nesting::Close),
    ]
}

fn render<S>(renderer: &mut Renderer<HtmlBackend, S>, tokens: &[Token]) -> String {
    renderer
        .render(tokens, &Options::default(), &Env::default())
        .unwrap()
}

#[test]
fn test_heading_with_text_rule_and_top_level_hooks() {
    let mut renderer = Renderer::<HtmlBackend>::builder()
        .rule_fn("text", |_r, _t, _i, _o, _e| Ok("X".to_owned()))
        .hook_fn(Lifecycle::BeforeRender, |_r, _c, _o, _e| Ok("[".to_owned()))
        .hook_fn(Lifecycle::AfterRender, |_r, _c, _o, _e| Ok("]".to_owned()))
        .build();

    let tokens = [
        Token::new("heading_open", "h1", Nesting::Open),
        Token::inline([Token::text("ignored")]),
        Token::new("heading_close", "h1", Nesting::Close),
    ];
    assert_eq!(render(&mut renderer, &tokens), "[<h1>X</h1>]");
}

#[test]
fn test_without_inline_tokens_output_is_token_concatenation() {
    let mut renderer = Renderer::<HtmlBackend>::new();
    let tokens = [
        Token::new("paragraph_open", "p", Nesting::Open),
        Token::text("loose"),
        Token::new("paragraph_close", "p", Nesting::Close),
        Token::new("hr", "hr", Nesting::SelfClosing),
    ];

    let expected: String = (0..tokens.len())
        .map(|idx| {
            renderer
                .render_token(&tokens, idx, &Options::default(), &Env::default())
                .unwrap()
        })
        .collect();
    assert_eq!(render(&mut renderer, &tokens), expected);
    assert_eq!(expected, "<p>loose</p><hr>");
}

#[test]
fn test_options_and_env_pass_through() {
    let mut renderer = Renderer::<HtmlBackend>::new();
    renderer.set_rule_fn("link_open", |_r, tokens, idx, _o, env| {
        let href = tokens[idx].attr("href").unwrap_or_default();
        Ok(format!(r#"<a href="{}{href}">"#, env.base_url))
    });

    let tokens = [
        Token::new("hr", "hr", Nesting::SelfClosing),
        Token::inline([
            Token::new("link_open", "a", Nesting::Open).with_attr("href", "guide"),
            Token::text("Guide"),
            Token::new("link_close", "a", Nesting::Close),
        ]),
    ];
    let options = Options { xhtml: true };
    let env = Env {
        base_url: "/docs/".to_owned(),
    };

    assert_eq!(
        renderer.render(&tokens, &options, &env).unwrap(),
        r#"<hr /><a href="/docs/guide">Guide</a>"#
    );
}

#[test]
fn test_handlers_augment_rule_output() {
    let mut renderer = Renderer::<HtmlBackend>::new();
    renderer
        .handle(
            "heading_open",
            Handler::new(|_r, _t, _i, _o, _e| Ok("<!-- a -->".to_owned())),
        )
        .handle(
            "heading_open",
            Handler::new(|_r, _t, _i, _o, _e| Ok("<!-- b -->".to_owned())),
        );
    renderer.set_rule(
        "heading_open",
        Rule::new(|_r, tokens, idx, _o, _e| {
            Ok(format!(r#"<{} class="title">"#, tokens[idx].tag))
        }),
    );

    assert_eq!(
        render(&mut renderer, &heading("Intro")),
        r#"<!-- a --><!-- b --><h1 class="title">Intro</h1>"#
    );
}

#[test]
fn test_footnotes_collected_and_flushed() {
    let mut renderer = RendererBuilder::<HtmlBackend, Footnotes>::new()
        .rule_fn("footnote_ref", |r, tokens, idx, _o, _e| {
            let notes = &mut r.state_mut().labels;
            notes.push(tokens[idx].content.clone());
            Ok(format!("<sup>{}</sup>", notes.len()))
        })
        .hook_fn(Lifecycle::AfterRender, |r, _ctx, _o, _e| {
            let labels = std::mem::take(&mut r.state_mut().labels);
            if labels.is_empty() {
                return Ok(String::new());
            }
            let items: String = labels
                .iter()
                .map(|label| format!("<li>{label}</li>"))
                .collect();
            Ok(format!("<ol class=\"footnotes\">{items}</ol>"))
        })
        .build();

    let tokens = [
        Token::new("paragraph_open", "p", Nesting::Open).with_map(0, 1),
        Token::inline([
            Token::text("Claim"),
            Token::new("footnote_ref", "", Nesting::SelfClosing).with_content("src"),
        ]),
        Token::new("paragraph_close", "p", Nesting::Close),
    ];

    assert_eq!(
        render(&mut renderer, &tokens),
        r#"<p>Claim<sup>1</sup></p><ol class="footnotes"><li>src</li></ol>"#
    );
    // state was flushed, so a second render starts numbering again
    assert_eq!(
        render(&mut renderer, &tokens),
        r#"<p>Claim<sup>1</sup></p><ol class="footnotes"><li>src</li></ol>"#
    );
}

#[test]
fn test_inline_hooks_annotate_with_source_lines() {
    let mut renderer = Renderer::<HtmlBackend>::builder()
        .hooks_named([(
            "beforeInlineRender",
            Hook::new(|_r, ctx, _o, _e| {
                Ok(ctx
                    .map
                    .map(|m| format!("<span data-line=\"{}\"></span>", m.start))
                    .unwrap_or_default())
            }),
        )])
        .build();

    let tokens = [
        Token::new("blockquote_open", "blockquote", Nesting::Open).with_map(2, 6),
        Token::new("paragraph_open", "p", Nesting::Open).with_map(3, 4),
        Token::inline([Token::text("quoted")]),
        Token::new("paragraph_close", "p", Nesting::Close),
        Token::new("blockquote_close", "blockquote", Nesting::Close),
    ];

    assert_eq!(
        render(&mut renderer, &tokens),
        r#"<blockquote><p><span data-line="3"></span>quoted</p></blockquote>"#
    );
}

#[test]
fn test_inline_hook_sees_earlier_hook_output() {
    let mut renderer = Renderer::<HtmlBackend>::new();
    renderer.hook(
        Lifecycle::BeforeInlineRender,
        vec![
            Hook::new(|_r, _ctx, _o, _e| Ok("<b>".to_owned())),
            Hook::new(|_r, ctx, _o, _e| {
                Ok(if ctx.outputs.iter().any(|o| o == "<b>") {
                    "!".to_owned()
                } else {
                    String::new()
                })
            }),
        ],
    );
    renderer.hook(
        Lifecycle::AfterInlineRender,
        Hook::new(|_r, ctx, _o, _e| {
            assert_eq!(ctx.lifecycle, Lifecycle::AfterInlineRender);
            Ok("</b>".to_owned())
        }),
    );

    assert_eq!(render(&mut renderer, &heading("bold")), "<h1><b>!bold</b></h1>");
}

#[test]
fn test_unknown_lifecycle_does_not_change_output() {
    let tokens = heading("same");
    let mut plain = Renderer::<HtmlBackend>::new();
    let mut with_bogus_hook = Renderer::<HtmlBackend>::new();
    with_bogus_hook.hook_named(
        "onRender",
        Hook::new(|_r, _ctx, _o, _e| Ok("never".to_owned())),
    );

    assert_eq!(
        render(&mut with_bogus_hook, &tokens),
        render(&mut plain, &tokens)
    );
}

#[test]
fn test_source_map_resolution() {
    let tokens = [
        Token::new("a_open", "", Nesting::Open).with_map(0, 1),
        Token::new("b", "", Nesting::SelfClosing),
        Token::new("a_close", "", Nesting::Close),
    ];
    assert_eq!(resolve_source_map(&tokens, 2), Some(SourceMap::new(0, 1)));

    let unmapped = [
        Token::new("a_open", "", Nesting::Open),
        Token::new("a_close", "", Nesting::Close),
    ];
    assert_eq!(resolve_source_map(&unmapped, 1), None);
}

#[derive(Debug, thiserror::Error)]
#[error("unresolved reference: {0}")]
struct UnresolvedReference(String);

#[test]
fn test_handler_error_reaches_caller() {
    let mut renderer = Renderer::<HtmlBackend, BTreeMap<String, String>>::new();
    renderer.handle_fn("link_open", |r, tokens, idx, _o, _e| {
        let target = tokens[idx].attr("href").unwrap_or_default();
        r.state()
            .get(target)
            .cloned()
            .ok_or_else(|| Error::extension(UnresolvedReference(target.to_owned())))
    });

    let tokens = [Token::inline([
        Token::new("link_open", "a", Nesting::Open).with_attr("href", "missing"),
    ])];
    let err = renderer
        .render(&tokens, &Options::default(), &Env::default())
        .unwrap_err();

    let cause = err.downcast_ref::<UnresolvedReference>().unwrap();
    assert_eq!(cause.0, "missing");
}
