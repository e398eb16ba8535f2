//! Markdown rendering: a normalized form that reparses to the same HTML.
//!
//! A prefix stack carries container continuation markers (`> ` for quotes,
//! indent for list items); every newline rewrites the current prefix.
//! Adjacent blocks are separated by a blank line except inside tight lists.
//! Link reference definitions come out at the end, sorted by label.

use crate::ast::{Align, Block, Document, Inline, List, Table, Text};

pub(crate) fn to_markdown(doc: &Document) -> String {
    let mut p = Printer::default();
    p.render_blocks(&doc.blocks, false);

    for footnote in &doc.footnotes {
        if !p.out.is_empty() {
            p.nl();
            p.nl();
        }
        p.push_str("[^");
        p.push_str(&footnote.label);
        p.push_str("]: ");
        let saved = p.push_prefix("    ");
        p.render_blocks(&footnote.blocks, false);
        p.pop_prefix(saved);
    }

    let mut labels: Vec<&String> = doc.links.keys().collect();
    labels.sort();
    for label in labels {
        if !p.out.is_empty() {
            p.nl();
            p.nl();
        }
        let def = &doc.links[label];
        p.push_str("[");
        p.push_str(label);
        p.push_str("]: ");
        p.write_link_url(&def.url);
        if !def.title.is_empty() {
            p.push_str(" ");
            p.write_title(&def.title, def.title_char);
        }
    }

    if p.out.is_empty() {
        return p.out;
    }
    p.nl();
    p.out
}

#[derive(Default)]
struct Printer {
    out: String,
    prefix: String,
}

impl Printer {
    fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// End the current line (trimming trailing spaces) and start the next
    /// one with the container prefix.
    fn nl(&mut self) {
        let line_start = self.out.rfind('\n').map_or(0, |i| i + 1);
        let keep = self.out[line_start..].trim_end_matches(' ').len();
        self.out.truncate(line_start + keep);
        self.out.push('\n');
        self.out.push_str(&self.prefix);
    }

    fn push_prefix(&mut self, s: &str) -> usize {
        let n = self.prefix.len();
        self.prefix.push_str(s);
        n
    }

    fn pop_prefix(&mut self, n: usize) {
        self.prefix.truncate(n);
    }

    fn render_blocks(&mut self, blocks: &[Block], tight: bool) {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                self.nl();
                if !tight {
                    self.nl();
                }
            }
            self.render_block(block);
        }
    }

    fn render_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { text, .. } | Block::Text(text) => self.render_inlines(&text.inlines),
            Block::Heading {
                level, text, id, ..
            } => {
                for _ in 0..*level {
                    self.out.push('#');
                }
                self.out.push(' ');
                let line = self.inline_string(&text.inlines).replace('\n', " ");
                self.push_str(&line);
                if !id.is_empty() {
                    self.push_str(" {#");
                    self.push_str(id);
                    self.push_str("}");
                }
            }
            Block::Quote { blocks, .. } => {
                self.push_str("> ");
                let saved = self.push_prefix("> ");
                self.render_blocks(blocks, false);
                self.pop_prefix(saved);
            }
            Block::List(list) => self.render_list(list),
            Block::Item { blocks, .. } => {
                // Items are rendered by their list; a bare item still prints.
                self.render_blocks(blocks, true);
            }
            Block::CodeBlock { fence, text, info, .. } => {
                if fence.is_empty() {
                    for (i, line) in text.iter().enumerate() {
                        if i > 0 {
                            self.nl();
                        }
                        self.push_str("    ");
                        self.push_str(line);
                    }
                } else {
                    self.push_str(fence);
                    self.push_str(info);
                    for line in text {
                        self.nl();
                        self.push_str(line);
                    }
                    self.nl();
                    self.push_str(fence);
                }
            }
            Block::HtmlBlock { text, .. } => {
                for (i, line) in text.iter().enumerate() {
                    if i > 0 {
                        self.nl();
                    }
                    self.push_str(line);
                }
            }
            Block::ThematicBreak { .. } => self.push_str("***"),
            Block::Table(table) => self.render_table(table),
            Block::Empty { .. } => {}
        }
    }

    fn render_list(&mut self, list: &List) {
        for (i, item) in list.items.iter().enumerate() {
            if i > 0 {
                self.nl();
                if list.loose {
                    self.nl();
                }
            }
            let marker = if list.is_ordered() {
                format!("{}{} ", list.start + i as u64, list.bullet as char)
            } else {
                format!("{} ", list.bullet as char)
            };
            self.push_str(&marker);
            let saved = self.push_prefix(&" ".repeat(marker.len()));
            if let Block::Item { blocks, .. } = item {
                self.render_blocks(blocks, !list.loose);
            }
            self.pop_prefix(saved);
        }
    }

    /// Tables are re-padded so each column is as wide as its widest cell by
    /// rune count (multi-rune graphemes may misalign).
    fn render_table(&mut self, table: &Table) {
        let cell_md = |cells: &[Text]| -> Vec<String> {
            cells
                .iter()
                .map(|c| self.inline_string(&c.inlines).replace('|', "\\|"))
                .collect()
        };
        let header: Vec<String> = cell_md(&table.header);
        let rows: Vec<Vec<String>> = table.rows.iter().map(|r| cell_md(r)).collect();

        let mut widths: Vec<usize> = header.iter().map(|c| c.chars().count().max(3)).collect();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        self.write_table_row(&header, &widths);
        self.nl();
        self.out.push('|');
        for (i, &w) in widths.iter().enumerate() {
            let align = table.align.get(i).copied().unwrap_or(Align::None);
            self.out.push(' ');
            match align {
                Align::None => self.push_str(&"-".repeat(w)),
                Align::Left => {
                    self.out.push(':');
                    self.push_str(&"-".repeat(w.saturating_sub(1).max(2)));
                }
                Align::Right => {
                    self.push_str(&"-".repeat(w.saturating_sub(1).max(2)));
                    self.out.push(':');
                }
                Align::Center => {
                    self.out.push(':');
                    self.push_str(&"-".repeat(w.saturating_sub(2).max(1)));
                    self.out.push(':');
                }
            }
            self.push_str(" |");
        }
        for row in &rows {
            self.nl();
            self.write_table_row(row, &widths);
        }
    }

    fn write_table_row(&mut self, cells: &[String], widths: &[usize]) {
        self.out.push('|');
        for (i, cell) in cells.iter().enumerate() {
            self.out.push(' ');
            self.push_str(cell);
            let w = widths.get(i).copied().unwrap_or(0);
            for _ in cell.chars().count()..w {
                self.out.push(' ');
            }
            self.push_str(" |");
        }
    }

    fn inline_string(&self, inlines: &[Inline]) -> String {
        let mut sub = Printer::default();
        sub.render_inlines(inlines);
        sub.out
    }

    fn render_inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            match inline {
                Inline::Plain(s) => self.push_str(s),
                Inline::Escaped(s) => {
                    self.out.push('\\');
                    self.push_str(s);
                }
                Inline::Code(s) => self.write_code_span(s),
                Inline::Strong(sp) => {
                    let m = sp.marker as char;
                    self.out.push(m);
                    self.out.push(m);
                    self.render_inlines(&sp.inner);
                    self.out.push(m);
                    self.out.push(m);
                }
                Inline::Emph(sp) => {
                    self.out.push(sp.marker as char);
                    self.render_inlines(&sp.inner);
                    self.out.push(sp.marker as char);
                }
                Inline::Del(sp) => {
                    self.push_str("~~");
                    self.render_inlines(&sp.inner);
                    self.push_str("~~");
                }
                Inline::Emoji(e) => self.push_str(&e.text),
                Inline::Link(link) => {
                    self.out.push('[');
                    self.render_inlines(&link.inner);
                    self.out.push(']');
                    self.write_link_tail(&link.url, &link.title, link.title_char);
                }
                Inline::Image(image) => {
                    self.push_str("![");
                    self.render_inlines(&image.inner);
                    self.out.push(']');
                    self.write_link_tail(&image.url, &image.title, image.title_char);
                }
                Inline::AutoLink(a) => {
                    self.out.push('<');
                    self.push_str(&a.text);
                    self.out.push('>');
                }
                Inline::HtmlTag(t) => self.push_str(t),
                Inline::HardBreak => {
                    self.out.push('\\');
                    self.nl();
                }
                Inline::SoftBreak => self.nl(),
                Inline::Task { checked } => {
                    self.push_str(if *checked { "[x] " } else { "[ ] " });
                }
                Inline::FootnoteLink { label, .. } => {
                    self.push_str("[^");
                    self.push_str(label);
                    self.out.push(']');
                }
            }
        }
    }

    /// Wrap the content in the smallest backtick run that does not occur
    /// inside it, padding with a space when the content touches a backtick.
    fn write_code_span(&mut self, text: &str) {
        let mut longest = 0;
        let mut run = 0;
        for b in text.bytes() {
            if b == b'`' {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        let fence = "`".repeat(longest + 1);
        let pad = text.starts_with('`') || text.ends_with('`');
        self.push_str(&fence);
        if pad {
            self.out.push(' ');
        }
        self.push_str(text);
        if pad {
            self.out.push(' ');
        }
        self.push_str(&fence);
    }

    fn write_link_tail(&mut self, url: &str, title: &str, title_char: u8) {
        self.out.push('(');
        self.write_link_url(url);
        if !title.is_empty() {
            self.out.push(' ');
            self.write_title(title, title_char);
        }
        self.out.push(')');
    }

    /// URLs that are empty or contain spaces go in angle brackets.
    fn write_link_url(&mut self, url: &str) {
        if url.is_empty() || url.contains(' ') || url.contains(char::is_control) {
            self.out.push('<');
            self.push_str(url);
            self.out.push('>');
        } else {
            self.push_str(url);
        }
    }

    fn write_title(&mut self, title: &str, title_char: u8) {
        let (open, close) = match title_char {
            b'\'' => ('\'', '\''),
            b')' => ('(', ')'),
            _ => ('"', '"'),
        };
        self.out.push(open);
        self.push_str(title);
        self.out.push(close);
    }
}
