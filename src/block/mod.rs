mod html_block;
mod leaf_blocks;
mod link_ref_def;
mod parser;
mod table;

use html_block::HtmlEnd;

use crate::ast::{Align, Block, Document, Footnote, LinkDef, List, Position, Text};
use crate::inline::InlineContext;
use crate::lines;
use crate::ParseOptions;
use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Parse a Markdown string into a [`Document`].
///
/// Parsing is total: every input yields a document, and malformed constructs
/// degrade to literal text.
///
/// # Examples
///
/// ```
/// use gfmark::{parse, ParseOptions};
///
/// let doc = parse("**bold** and *italic*", &ParseOptions::default());
/// assert!(doc.to_html().contains("<strong>bold</strong>"));
/// ```
pub fn parse(markdown: &str, options: &ParseOptions) -> Document {
    let mut corner = false;
    let raw_lines = lines::logical_lines(markdown, &mut corner);

    let mut p = BlockParser::new(options);
    for raw in &raw_lines {
        p.lineno += 1;
        p.process_line(Line::new(&raw.text));
    }
    while p.open.len() > 1 {
        p.close_top_block();
    }
    let root = p.open.pop().unwrap();
    let mut blocks = root.children;
    corner |= p.corner;

    let mut footnotes = p.footnotes;
    let footnote_labels = p.footnote_labels;
    let links = p.links;

    fix_lists(&mut blocks);
    strip_empty(&mut blocks);
    for fnote in &mut footnotes {
        fix_lists(&mut fnote.blocks);
        strip_empty(&mut fnote.blocks);
    }

    let cx = InlineContext {
        options,
        links: &links,
        footnote_labels: &footnote_labels,
    };
    apply_inlines(&mut blocks, &cx, &mut corner);
    for fnote in &mut footnotes {
        apply_inlines(&mut fnote.blocks, &cx, &mut corner);
    }

    Document {
        blocks,
        links,
        footnotes,
        corner,
    }
}

/// A view of one logical line that accounts for tab stops while consuming
/// indentation. `partial_spaces` holds the columns left over when a tab is
/// consumed only partway.
#[derive(Clone, Debug)]
pub(crate) struct Line<'a> {
    raw: &'a str,
    byte_offset: usize,
    col_offset: usize,
    partial_spaces: usize,
}

impl<'a> Line<'a> {
    fn new(raw: &'a str) -> Self {
        Line {
            raw,
            byte_offset: 0,
            col_offset: 0,
            partial_spaces: 0,
        }
    }

    fn remainder(&self) -> &'a str {
        if self.byte_offset >= self.raw.len() {
            ""
        } else {
            &self.raw[self.byte_offset..]
        }
    }

    /// Remainder starting at the first non-space byte.
    fn rest(&self) -> &'a str {
        let (_, off, _) = self.peek_nonspace();
        if off >= self.raw.len() {
            ""
        } else {
            &self.raw[off..]
        }
    }

    /// Column, byte offset, and byte value of the first non-space character;
    /// byte 0 when the rest of the line is blank.
    fn peek_nonspace(&self) -> (usize, usize, u8) {
        let bytes = self.raw.as_bytes();
        let mut col = self.col_offset + self.partial_spaces;
        let mut off = self.byte_offset;
        while off < bytes.len() {
            match bytes[off] {
                b' ' => {
                    col += 1;
                    off += 1;
                }
                b'\t' => {
                    col += 4 - (col % 4);
                    off += 1;
                }
                b => return (col, off, b),
            }
        }
        (col, off, 0)
    }

    fn is_blank(&self) -> bool {
        if self.partial_spaces > 0 {
            return false;
        }
        let (_, off, b) = self.peek_nonspace();
        b == 0 && off >= self.raw.len()
    }

    fn indent(&self) -> usize {
        self.peek_nonspace().0 - self.col_offset
    }

    /// Consume up to `max` columns of indentation, expanding tabs at
    /// 4-column stops. Returns the number of columns consumed.
    fn skip_indent(&mut self, max: usize) -> usize {
        let bytes = self.raw.as_bytes();
        let mut cols = 0;
        if self.partial_spaces > 0 {
            let take = self.partial_spaces.min(max);
            cols += take;
            self.col_offset += take;
            self.partial_spaces -= take;
            if cols >= max {
                return cols;
            }
        }
        while self.byte_offset < bytes.len() && cols < max {
            match bytes[self.byte_offset] {
                b' ' => {
                    cols += 1;
                    self.byte_offset += 1;
                    self.col_offset += 1;
                }
                b'\t' => {
                    let width = 4 - (self.col_offset % 4);
                    self.byte_offset += 1;
                    if cols + width > max {
                        let take = max - cols;
                        self.partial_spaces = width - take;
                        self.col_offset += take;
                        cols = max;
                        break;
                    }
                    cols += width;
                    self.col_offset += width;
                }
                _ => break,
            }
        }
        cols
    }

    /// Consume `n` columns, counting non-space bytes as one column each.
    /// Used to step over ASCII markers.
    fn advance_columns(&mut self, n: usize) {
        let bytes = self.raw.as_bytes();
        let mut cols = 0;
        while self.byte_offset < bytes.len() && cols < n {
            match bytes[self.byte_offset] {
                b' ' => {
                    cols += 1;
                    self.byte_offset += 1;
                    self.col_offset += 1;
                }
                b'\t' => {
                    cols += 4 - (self.col_offset % 4);
                    self.byte_offset += 1;
                    self.col_offset = self.col_offset + 4 - (self.col_offset % 4);
                }
                _ => {
                    cols += 1;
                    self.byte_offset += 1;
                    self.col_offset += 1;
                }
            }
        }
    }

    /// Step over `n` ASCII marker bytes.
    fn advance_bytes(&mut self, n: usize) {
        self.byte_offset += n;
        self.col_offset += n;
    }

    fn advance_to_nonspace(&mut self) {
        self.partial_spaces = 0;
        let (col, off, _) = self.peek_nonspace();
        self.col_offset = col;
        self.byte_offset = off;
    }

    /// Remainder including any partial tab columns rendered as spaces.
    fn remainder_with_partial(&self) -> Cow<'a, str> {
        if self.partial_spaces > 0 {
            static SPACES: &str = "    ";
            let rem = self.remainder();
            let mut s = String::with_capacity(self.partial_spaces + rem.len());
            s.push_str(&SPACES[..self.partial_spaces.min(4)]);
            s.push_str(rem);
            Cow::Owned(s)
        } else {
            Cow::Borrowed(self.remainder())
        }
    }
}

#[derive(Clone, Debug)]
struct FenceData {
    fence_char: u8,
    fence_len: usize,
    indent: usize,
    info: String,
    lines: Vec<String>,
}

#[derive(Clone, Debug)]
struct TableBuilder {
    hdr: String,
    align: Vec<Align>,
    rows: Vec<String>,
}

#[derive(Clone, Debug)]
enum Builder {
    Document,
    Quote,
    Item {
        bullet: u8,
        num: u64,
        width: usize,
        have_content: bool,
        checked: Option<bool>,
    },
    FootnoteDef {
        label: String,
    },
    Fence(Box<FenceData>),
    Pre {
        lines: Vec<String>,
    },
    Html {
        end: HtmlEnd,
        lines: Vec<String>,
    },
    Paragraph {
        lines: Vec<String>,
    },
    Table(Box<TableBuilder>),
}

#[derive(Clone, Debug)]
struct OpenBlock {
    builder: Builder,
    pos: Position,
    children: Vec<Block>,
}

impl OpenBlock {
    fn new(builder: Builder, lineno: usize) -> Self {
        OpenBlock {
            builder,
            pos: Position {
                start_line: lineno,
                end_line: lineno,
            },
            children: Vec::new(),
        }
    }
}

pub(crate) struct BlockParser<'a> {
    options: &'a ParseOptions,
    links: FxHashMap<String, LinkDef>,
    footnotes: Vec<Footnote>,
    footnote_labels: FxHashMap<String, usize>,
    open: Vec<OpenBlock>,
    lineno: usize,
    corner: bool,
}

impl<'a> BlockParser<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        let mut open = Vec::with_capacity(16);
        open.push(OpenBlock::new(Builder::Document, 0));
        BlockParser {
            options,
            links: FxHashMap::default(),
            footnotes: Vec::new(),
            footnote_labels: FxHashMap::default(),
            open,
            lineno: 0,
            corner: false,
        }
    }

    fn close_top_block(&mut self) {
        let ob = self.open.pop().unwrap();
        if let Some(block) = self.finalize(ob) {
            let parent = self.open.last_mut().unwrap();
            parent.children.push(block);
        }
    }

    fn finalize(&mut self, ob: OpenBlock) -> Option<Block> {
        let pos = ob.pos;
        match ob.builder {
            Builder::Document => unreachable!("document closed via parse"),
            Builder::Quote => Some(Block::Quote {
                pos,
                blocks: ob.children,
            }),
            Builder::Item {
                bullet,
                num,
                checked,
                ..
            } => {
                let mut blocks = ob.children;
                if let Some(c) = checked {
                    attach_task(&mut blocks, c);
                }
                let item = Block::Item { pos, blocks };
                let parent = self.open.last_mut().unwrap();
                if let Some(Block::List(list)) = parent.children.last_mut() {
                    if list.bullet == bullet {
                        list.pos.end_line = pos.end_line;
                        list.items.push(item);
                        return None;
                    }
                }
                Some(Block::List(Box::new(List {
                    pos,
                    bullet,
                    start: num,
                    loose: false,
                    items: vec![item],
                })))
            }
            Builder::FootnoteDef { label } => {
                let key = crate::inline::normalize_reference_label(&label).into_owned();
                let index = self.footnotes.len();
                self.footnotes.push(Footnote {
                    pos,
                    label,
                    blocks: ob.children,
                });
                self.footnote_labels.insert(key, index);
                Some(Block::Empty { pos })
            }
            Builder::Fence(data) => Some(Block::CodeBlock {
                pos,
                fence: String::from_utf8(vec![data.fence_char; data.fence_len]).unwrap(),
                info: data.info,
                text: data.lines,
            }),
            Builder::Pre { mut lines } => {
                while let Some(last) = lines.last() {
                    if last.trim_matches([' ', '\t']).is_empty() {
                        lines.pop();
                    } else {
                        break;
                    }
                }
                Some(Block::CodeBlock {
                    pos,
                    fence: String::new(),
                    info: String::new(),
                    text: lines,
                })
            }
            Builder::Html { lines, .. } => Some(Block::HtmlBlock { pos, text: lines }),
            Builder::Paragraph { lines } => {
                let joined = lines.join("\n");
                let remaining = self.extract_ref_defs(&joined);
                if remaining.is_empty() {
                    Some(Block::Empty { pos })
                } else {
                    Some(Block::Paragraph {
                        pos,
                        text: Text::new(pos, remaining),
                    })
                }
            }
            Builder::Table(b) => Some(Block::Table(Box::new(table::build(&b, pos)))),
        }
    }
}

/// Move a task checkbox onto the item's first text run.
fn attach_task(blocks: &mut [Block], checked: bool) {
    match blocks.first_mut() {
        Some(Block::Paragraph { text, .. }) | Some(Block::Text(text)) => {
            text.task = Some(checked);
        }
        _ => {}
    }
}

/// Decide loose vs. tight for every list and unwrap the paragraphs of tight
/// items. The decision is positional: a list is loose iff two adjacent items
/// have line ranges separated by more than one line, or two adjacent blocks
/// inside one item do.
///
/// Like the other tree passes this walks an explicit work stack: input can
/// nest tens of thousands of levels deep, so nothing here may recurse.
fn fix_lists(blocks: &mut [Block]) {
    let mut stack: Vec<&mut Block> = blocks.iter_mut().collect();
    while let Some(block) = stack.pop() {
        match block {
            Block::Quote { blocks, .. } | Block::Item { blocks, .. } => {
                stack.extend(blocks.iter_mut())
            }
            Block::List(list) => {
                let mut loose = false;
                'outer: for (i, item) in list.items.iter().enumerate() {
                    if i + 1 < list.items.len()
                        && list.items[i + 1].pos().start_line > item.pos().end_line + 1
                    {
                        loose = true;
                        break;
                    }
                    if let Block::Item { blocks, .. } = item {
                        for (j, b) in blocks.iter().enumerate() {
                            if j + 1 < blocks.len()
                                && blocks[j + 1].pos().start_line > b.pos().end_line + 1
                            {
                                loose = true;
                                break 'outer;
                            }
                        }
                    }
                }
                list.loose = loose;
                if !loose {
                    for item in &mut list.items {
                        if let Block::Item { blocks, .. } = item {
                            for b in blocks.iter_mut() {
                                if let Block::Paragraph { text, .. } = b {
                                    let text = std::mem::take(text);
                                    *b = Block::Text(text);
                                }
                            }
                        }
                    }
                }
                stack.extend(list.items.iter_mut());
            }
            _ => {}
        }
    }
}

fn strip_empty(blocks: &mut Vec<Block>) {
    let mut stack: Vec<&mut Vec<Block>> = vec![blocks];
    while let Some(blocks) = stack.pop() {
        blocks.retain(|b| !matches!(b, Block::Empty { .. }));
        for block in blocks.iter_mut() {
            match block {
                Block::Quote { blocks, .. } | Block::Item { blocks, .. } => stack.push(blocks),
                Block::List(list) => {
                    for item in &mut list.items {
                        if let Block::Item { blocks, .. } = item {
                            stack.push(blocks);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn apply_inlines(blocks: &mut [Block], cx: &InlineContext<'_>, corner: &mut bool) {
    let mut stack: Vec<&mut Block> = blocks.iter_mut().collect();
    while let Some(block) = stack.pop() {
        match block {
            Block::Paragraph { text, .. } | Block::Heading { text, .. } => {
                cx.parse_text(text, corner)
            }
            Block::Text(text) => cx.parse_text(text, corner),
            Block::Quote { blocks, .. } | Block::Item { blocks, .. } => {
                stack.extend(blocks.iter_mut())
            }
            Block::List(list) => stack.extend(list.items.iter_mut()),
            Block::Table(t) => {
                for cell in &mut t.header {
                    cx.parse_text(cell, corner);
                }
                for row in &mut t.rows {
                    for cell in row {
                        cx.parse_text(cell, corner);
                    }
                }
            }
            _ => {}
        }
    }
}
