//! HTML rendering.
//!
//! Block traversal is iterative (a work stack), so pathologically nested
//! input renders without recursing; inline trees are rendered recursively.

use crate::ast::{Align, Block, Document, Inline};
use crate::html::{encode_link_url_into, escape_html_into};
use rustc_hash::FxHashMap;
use std::fmt::Write;

pub(crate) fn to_html(doc: &Document) -> String {
    let mut out = String::with_capacity(256);
    let mut notes = FootnoteTracker::default();
    render_blocks(&doc.blocks, &mut notes, &mut out);
    render_footnote_section(doc, &mut notes, &mut out);
    out
}

/// Footnotes are numbered in first-encounter order; repeated references get
/// `N-2`, `N-3`, … anchors.
#[derive(Default)]
struct FootnoteTracker {
    printed: FxHashMap<usize, usize>,
    list: Vec<PrintedNote>,
}

struct PrintedNote {
    doc_index: usize,
    refs: Vec<String>,
}

impl FootnoteTracker {
    fn touch(&mut self, doc_index: usize) -> (usize, String) {
        let num = match self.printed.get(&doc_index) {
            Some(&n) => n,
            None => {
                self.list.push(PrintedNote {
                    doc_index,
                    refs: Vec::new(),
                });
                let n = self.list.len();
                self.printed.insert(doc_index, n);
                n
            }
        };
        let note = &mut self.list[num - 1];
        let r = if note.refs.is_empty() {
            num.to_string()
        } else {
            format!("{}-{}", num, note.refs.len() + 1)
        };
        note.refs.push(r.clone());
        (num, r)
    }
}

enum Work<'a> {
    Block(&'a Block),
    Str(&'static str),
}

fn render_blocks(blocks: &[Block], notes: &mut FootnoteTracker, out: &mut String) {
    let mut stack: Vec<Work<'_>> = blocks.iter().rev().map(Work::Block).collect();
    while let Some(work) = stack.pop() {
        match work {
            Work::Str(s) => out.push_str(s),
            Work::Block(b) => render_one(b, notes, out, &mut stack),
        }
    }
}

fn render_one<'a>(
    block: &'a Block,
    notes: &mut FootnoteTracker,
    out: &mut String,
    stack: &mut Vec<Work<'a>>,
) {
    match block {
        Block::Paragraph { text, .. } => {
            out.push_str("<p>");
            render_inlines(&text.inlines, notes, out);
            out.push_str("</p>\n");
        }
        Block::Text(text) => {
            render_inlines(&text.inlines, notes, out);
        }
        Block::Heading {
            level, text, id, ..
        } => {
            out.push_str("<h");
            out.push((b'0' + level) as char);
            if !id.is_empty() {
                out.push_str(" id=\"");
                escape_html_into(out, id);
                out.push('"');
            }
            out.push('>');
            render_inlines(&text.inlines, notes, out);
            out.push_str("</h");
            out.push((b'0' + level) as char);
            out.push_str(">\n");
        }
        Block::Quote { blocks, .. } => {
            out.push_str("<blockquote>\n");
            stack.push(Work::Str("</blockquote>\n"));
            for b in blocks.iter().rev() {
                stack.push(Work::Block(b));
            }
        }
        Block::List(list) => {
            if list.is_ordered() {
                if list.start == 1 {
                    out.push_str("<ol>\n");
                } else {
                    let _ = writeln!(out, "<ol start=\"{}\">", list.start);
                }
                stack.push(Work::Str("</ol>\n"));
            } else {
                out.push_str("<ul>\n");
                stack.push(Work::Str("</ul>\n"));
            }
            for item in list.items.iter().rev() {
                stack.push(Work::Block(item));
            }
        }
        Block::Item { blocks, .. } => {
            out.push_str("<li>");
            if blocks.is_empty() {
                out.push_str("</li>\n");
                return;
            }
            if !matches!(blocks[0], Block::Text(_)) {
                out.push('\n');
            }
            stack.push(Work::Str("</li>\n"));
            for (idx, b) in blocks.iter().enumerate().rev() {
                // A tight paragraph followed by more content needs its own
                // line ending.
                if matches!(b, Block::Text(_)) && idx + 1 < blocks.len() {
                    stack.push(Work::Str("\n"));
                }
                stack.push(Work::Block(b));
            }
        }
        Block::CodeBlock { info, text, .. } => {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("<pre><code");
            if !info.is_empty() {
                let lang = info.split([' ', '\t']).next().unwrap_or("");
                if !lang.is_empty() {
                    out.push_str(" class=\"language-");
                    escape_html_into(out, lang);
                    out.push('"');
                }
            }
            out.push('>');
            for line in text {
                escape_html_into(out, line);
                out.push('\n');
            }
            out.push_str("</code></pre>\n");
        }
        Block::HtmlBlock { text, .. } => {
            for line in text {
                out.push_str(line);
                out.push('\n');
            }
        }
        Block::ThematicBreak { .. } => out.push_str("<hr />\n"),
        Block::Table(table) => {
            out.push_str("<table>\n<thead>\n<tr>\n");
            for (i, cell) in table.header.iter().enumerate() {
                out.push_str("<th");
                push_align(out, table.align.get(i).copied().unwrap_or(Align::None));
                out.push('>');
                render_inlines(&cell.inlines, notes, out);
                out.push_str("</th>\n");
            }
            out.push_str("</tr>\n</thead>\n");
            if !table.rows.is_empty() {
                out.push_str("<tbody>\n");
                for row in &table.rows {
                    out.push_str("<tr>\n");
                    for (i, cell) in row.iter().enumerate() {
                        out.push_str("<td");
                        push_align(out, table.align.get(i).copied().unwrap_or(Align::None));
                        out.push('>');
                        render_inlines(&cell.inlines, notes, out);
                        out.push_str("</td>\n");
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n");
            }
            out.push_str("</table>\n");
        }
        Block::Empty { .. } => {}
    }
}

fn push_align(out: &mut String, align: Align) {
    match align {
        Align::None => {}
        Align::Left => out.push_str(" align=\"left\""),
        Align::Center => out.push_str(" align=\"center\""),
        Align::Right => out.push_str(" align=\"right\""),
    }
}

fn render_inlines(inlines: &[Inline], notes: &mut FootnoteTracker, out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Plain(s) | Inline::Escaped(s) => escape_html_into(out, s),
            Inline::Code(s) => {
                out.push_str("<code>");
                escape_html_into(out, s);
                out.push_str("</code>");
            }
            Inline::Strong(sp) => {
                out.push_str("<strong>");
                render_inlines(&sp.inner, notes, out);
                out.push_str("</strong>");
            }
            Inline::Emph(sp) => {
                out.push_str("<em>");
                render_inlines(&sp.inner, notes, out);
                out.push_str("</em>");
            }
            Inline::Del(sp) => {
                out.push_str("<del>");
                render_inlines(&sp.inner, notes, out);
                out.push_str("</del>");
            }
            Inline::Emoji(e) => escape_html_into(out, &e.text),
            Inline::Link(link) => {
                out.push_str("<a href=\"");
                encode_link_url_into(out, &link.url);
                out.push('"');
                if !link.title.is_empty() {
                    out.push_str(" title=\"");
                    escape_html_into(out, &link.title);
                    out.push('"');
                }
                out.push('>');
                render_inlines(&link.inner, notes, out);
                out.push_str("</a>");
            }
            Inline::Image(image) => {
                out.push_str("<img src=\"");
                encode_link_url_into(out, &image.url);
                out.push_str("\" alt=\"");
                render_alt_text(&image.inner, out);
                out.push('"');
                if !image.title.is_empty() {
                    out.push_str(" title=\"");
                    escape_html_into(out, &image.title);
                    out.push('"');
                }
                out.push_str(" />");
            }
            Inline::AutoLink(a) => {
                out.push_str("<a href=\"");
                encode_link_url_into(out, &a.url);
                out.push_str("\">");
                escape_html_into(out, &a.text);
                out.push_str("</a>");
            }
            Inline::HtmlTag(t) => out.push_str(t),
            Inline::HardBreak => out.push_str("<br />\n"),
            Inline::SoftBreak => out.push('\n'),
            Inline::Task { checked } => {
                if *checked {
                    out.push_str("<input checked=\"\" disabled=\"\" type=\"checkbox\"> ");
                } else {
                    out.push_str("<input disabled=\"\" type=\"checkbox\"> ");
                }
            }
            Inline::FootnoteLink { index, .. } => {
                let (num, r) = notes.touch(*index);
                let _ = write!(
                    out,
                    "<sup class=\"fn\"><a id=\"fnref-{r}\" href=\"#fn-{num}\">{num}</a></sup>"
                );
            }
        }
    }
}

/// Plain-text flattening for image alt text: tags drop out and line breaks
/// become spaces.
fn render_alt_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Plain(s) | Inline::Escaped(s) | Inline::Code(s) => escape_html_into(out, s),
            Inline::Emoji(e) => escape_html_into(out, &e.text),
            Inline::AutoLink(a) => escape_html_into(out, &a.text),
            Inline::Strong(sp) | Inline::Emph(sp) | Inline::Del(sp) => {
                render_alt_text(&sp.inner, out)
            }
            Inline::Link(l) | Inline::Image(l) => render_alt_text(&l.inner, out),
            Inline::HardBreak | Inline::SoftBreak => out.push(' '),
            Inline::HtmlTag(_) | Inline::Task { .. } => {}
            Inline::FootnoteLink { label, .. } => {
                escape_html_into(out, &format!("[^{label}]"));
            }
        }
    }
}

fn render_footnote_section(doc: &Document, notes: &mut FootnoteTracker, out: &mut String) {
    if notes.list.is_empty() {
        return;
    }
    out.push_str("<div class=\"footnotes\">Footnotes</div>\n<ol>\n");
    let mut i = 0;
    // The list can grow while definitions render (a footnote may reference
    // another), so this is not a plain iterator loop.
    while i < notes.list.len() {
        let num = i + 1;
        let doc_index = notes.list[i].doc_index;
        let _ = writeln!(out, "<li id=\"fn-{num}\">");
        render_blocks(&doc.footnotes[doc_index].blocks, notes, out);
        if out.ends_with("</p>\n") {
            out.truncate(out.len() - "</p>\n".len());
        } else {
            out.push_str("<p>\n");
        }
        let refs = notes.list[i].refs.clone();
        for r in &refs {
            let _ = write!(out, "\n<a class=\"fnref\" href=\"#fnref-{r}\">↩</a>");
        }
        out.push_str("</p>\n</li>\n");
        i += 1;
    }
    out.push_str("</ol>\n");
}
