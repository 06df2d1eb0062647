//! Markdown rendering for entry bodies.
//!
//! # Invariants
//! - Output is CommonMark HTML; the same source always renders the same HTML.
//! - Under `RawHtml::Escape` no raw HTML from the source reaches the output.

use pulldown_cmark::{html, Event, Options, Parser};
use serde::{Deserialize, Serialize};

/// How raw HTML embedded in Markdown is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawHtml {
    /// Raw HTML blocks and inline tags are emitted as escaped text.
    #[default]
    Escape,
    /// Raw HTML is copied through verbatim. Only safe for trusted bodies.
    Passthrough,
}

/// Renders Markdown `source` to an HTML fragment.
pub fn render_markdown(source: &str, raw_html: RawHtml) -> String {
    let parser = Parser::new_ext(source, Options::empty());
    let mut output = String::with_capacity(source.len() + source.len() / 2);
    match raw_html {
        RawHtml::Passthrough => html::push_html(&mut output, parser),
        RawHtml::Escape => html::push_html(
            &mut output,
            parser.map(|event| match event {
                Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
                other => other,
            }),
        ),
    }
    output
}

/// Renders the live preview shown while composing a new entry.
///
/// Returns `None` for an empty body; the preview toggle is hidden until the
/// user has typed something.
pub fn render_preview(body: &str, raw_html: RawHtml) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    Some(render_markdown(body, raw_html))
}
