//! # gfmark
//!
//! A CommonMark 0.31.2 compliant Markdown parser with GFM and smart
//! typography extensions. Parsing produces a [`Document`] tree that can be
//! rendered to HTML or back to normalized Markdown.
//!
//! ## Usage
//!
//! ```
//! use gfmark::{parse, ParseOptions};
//!
//! // Plain CommonMark (all extensions off).
//! let doc = parse("# Hello, **world**!", &ParseOptions::default());
//! assert_eq!(doc.to_html(), "<h1>Hello, <strong>world</strong>!</h1>\n");
//!
//! // Enable specific extensions.
//! let opts = ParseOptions {
//!     tables: true,
//!     strikethrough: true,
//!     ..Default::default()
//! };
//! let doc = parse("~~gone~~", &opts);
//! assert_eq!(doc.to_html(), "<p><del>gone</del></p>\n");
//! ```
//!
//! ## Extensions
//!
//! All extensions are off by default:
//!
//! | Syntax | Effect | Option |
//! |---|---|---|
//! | `# h {#id}` | heading id attribute | `heading_ids` |
//! | `~~text~~` | `<del>` | `strikethrough` |
//! | `- [x] task` | checkbox | `task_lists` |
//! | bare URLs / emails | `<a>` | `autolink_text` |
//! | `\| table \|` | `<table>` | `tables` |
//! | `:name:` | emoji | `emoji` |
//! | `...` | `…` | `smart_dot` |
//! | `--` / `---` | `–` / `—` | `smart_dash` |
//! | `'` / `"` | curly quotes | `smart_quote` |
//! | `[^note]` | footnotes | `footnotes` |
//!
//! Parsing is total: every input string yields a document, and malformed
//! constructs degrade to literal text. Inputs whose rendering is known to
//! differ between major implementations set [`Document::corner`].

pub mod ast;
mod block;
mod emoji;
mod entities;
mod html;
mod inline;
mod lines;
mod markdown;
mod render;

pub use ast::{
    Align, AutoLink, Block, Document, Emoji, Footnote, Inline, LinkDef, LinkInline, List,
    Position, Span, Table, Text,
};
pub use block::parse;

use serde::{Deserialize, Serialize};

#[inline(always)]
pub(crate) fn is_ascii_punctuation(b: u8) -> bool {
    matches!(b, b'!'..=b'/' | b':'..=b'@' | b'['..=b'`' | b'{'..=b'~')
}

#[inline(always)]
pub(crate) fn utf8_char_len(first: u8) -> usize {
    if first < 0x80 {
        1
    } else if first < 0xE0 {
        2
    } else if first < 0xF0 {
        3
    } else {
        4
    }
}

/// Options for customizing Markdown parsing behavior.
///
/// Every flag defaults to `false` (plain CommonMark). The serialized form
/// uses the capitalized key names below, and any subset of keys is a valid
/// configuration, so `{"Table": true}` enables just the table extension.
///
/// A `ParseOptions` value is immutable during a parse and may be shared
/// between concurrent [`parse`] calls; all working state is per-call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Recognize a trailing `{#id}` attribute on ATX headings.
    #[serde(rename = "HeadingID")]
    pub heading_ids: bool,
    /// Recognize `~~text~~` as strikethrough.
    #[serde(rename = "Strikethrough")]
    pub strikethrough: bool,
    /// Recognize leading `[ ]` / `[x]` in list items as task checkboxes.
    #[serde(rename = "TaskList")]
    pub task_lists: bool,
    /// Recognize GFM extended autolinks (bare URLs and emails) in text.
    #[serde(rename = "AutoLinkText")]
    pub autolink_text: bool,
    /// Make `www.` autolinks use `http://` instead of `https://`.
    #[serde(rename = "AutoLinkAssumeHTTP")]
    pub autolink_assume_http: bool,
    /// Recognize GFM pipe tables.
    #[serde(rename = "Table")]
    pub tables: bool,
    /// Recognize `:name:` emoji sequences.
    #[serde(rename = "Emoji")]
    pub emoji: bool,
    /// Replace `...` with `…`.
    #[serde(rename = "SmartDot")]
    pub smart_dot: bool,
    /// Replace `--` and `---` with `–` and `—`.
    #[serde(rename = "SmartDash")]
    pub smart_dash: bool,
    /// Replace `'` and `"` with curly quotes.
    #[serde(rename = "SmartQuote")]
    pub smart_quote: bool,
    /// Recognize `[^label]` references and `[^label]:` definitions.
    #[serde(rename = "Footnote")]
    pub footnotes: bool,
}

impl Document {
    /// Render the document as HTML.
    pub fn to_html(&self) -> String {
        render::to_html(self)
    }

    /// Render the document as normalized Markdown.
    ///
    /// The output reparses to a tree with the same HTML rendering; link
    /// reference definitions are emitted at the end, sorted by label.
    pub fn to_markdown(&self) -> String {
        markdown::to_markdown(self)
    }
}
