use super::html_block::{html_block_ends, parse_html_block_start};
use super::leaf_blocks::*;
use super::link_ref_def::resolve_entities_and_escapes;
use super::table;
use super::*;
use crate::inline::normalize_reference_label;

/// Snapshot of an open block's extend behavior, taken to release the borrow
/// on the stack before mutating the line.
enum Ext {
    Quote,
    Item { width: usize, have_content: bool },
    Footnote,
    Leaf,
}

impl<'a> BlockParser<'a> {
    pub(super) fn process_line(&mut self, mut line: Line<'_>) {
        let lineno = self.lineno;
        let num_open = self.open.len();

        // Extend phase: ask each open container to consume its prefix.
        // The first failure fixes the line depth.
        let mut matched = 1;
        let mut all_matched = true;
        let mut i = 1;
        while i < num_open {
            let ext = match &self.open[i].builder {
                Builder::Quote => Ext::Quote,
                Builder::Item {
                    width,
                    have_content,
                    ..
                } => Ext::Item {
                    width: *width,
                    have_content: *have_content,
                },
                Builder::FootnoteDef { .. } => Ext::Footnote,
                _ => Ext::Leaf,
            };
            match ext {
                Ext::Quote => {
                    let (ns_col, _, ns_byte) = line.peek_nonspace();
                    if ns_col - line.col_offset <= 3 && ns_byte == b'>' {
                        consume_quote_marker(&mut line);
                        matched = i + 1;
                    } else {
                        all_matched = false;
                        break;
                    }
                }
                Ext::Item {
                    width,
                    have_content,
                } => {
                    let (ns_col, ns_off, ns_byte) = line.peek_nonspace();
                    let indent = ns_col - line.col_offset;
                    let blank = ns_byte == 0 && ns_off >= line.raw.len();
                    if blank {
                        if !have_content {
                            // An item that began with a blank marker line
                            // cannot take a second blank line.
                            all_matched = false;
                            break;
                        }
                        line.skip_indent(width);
                        matched = i + 1;
                    } else if indent >= width {
                        line.skip_indent(width);
                        if let Builder::Item { have_content, .. } = &mut self.open[i].builder {
                            *have_content = true;
                        }
                        matched = i + 1;
                    } else {
                        all_matched = false;
                        break;
                    }
                }
                Ext::Footnote => {
                    if line.is_blank() {
                        matched = i + 1;
                    } else if line.indent() >= 4 {
                        line.skip_indent(4);
                        matched = i + 1;
                    } else {
                        all_matched = false;
                        break;
                    }
                }
                Ext::Leaf => {
                    matched = i;
                    all_matched = false;
                    break;
                }
            }
            if !line.is_blank() {
                self.open[i].pos.end_line = lineno;
            }
            i += 1;
        }
        if all_matched {
            matched = num_open;
        }

        let tip_idx = num_open - 1;
        let tip_is_leaf = matches!(
            self.open[tip_idx].builder,
            Builder::Fence(_)
                | Builder::Pre { .. }
                | Builder::Html { .. }
                | Builder::Paragraph { .. }
                | Builder::Table(_)
        );

        // Leaf continuation: the tip absorbs the line, closes, or both.
        if tip_is_leaf && matched + 1 >= num_open {
            match &self.open[tip_idx].builder {
                Builder::Fence(data) => {
                    let (fc, fl, fi) = (data.fence_char, data.fence_len, data.indent);
                    if line.indent() <= 3 && is_closing_fence(line.remainder(), fc, fl) {
                        self.open[tip_idx].pos.end_line = lineno;
                        self.close_top_block();
                        return;
                    }
                    let content = if fi == 0 {
                        line.remainder().to_string()
                    } else {
                        let mut content_line = line.clone();
                        content_line.skip_indent(fi);
                        content_line.remainder_with_partial().into_owned()
                    };
                    self.open[tip_idx].pos.end_line = lineno;
                    if let Builder::Fence(data) = &mut self.open[tip_idx].builder {
                        data.lines.push(content);
                    }
                    return;
                }
                Builder::Pre { .. } => {
                    if line.is_blank() {
                        let mut bl = line.clone();
                        bl.skip_indent(4);
                        let content = bl.remainder_with_partial().into_owned();
                        if let Builder::Pre { lines } = &mut self.open[tip_idx].builder {
                            lines.push(content);
                        }
                        return;
                    }
                    if line.indent() >= 4 {
                        line.skip_indent(4);
                        let content = line.remainder_with_partial().into_owned();
                        self.open[tip_idx].pos.end_line = lineno;
                        if let Builder::Pre { lines } = &mut self.open[tip_idx].builder {
                            lines.push(content);
                        }
                        return;
                    }
                    self.close_top_block();
                    self.open_new_blocks(line);
                    return;
                }
                Builder::Html { end, .. } => {
                    let end = *end;
                    if end == HtmlEnd::Blank && line.is_blank() {
                        self.close_top_block();
                        return;
                    }
                    let content = line.remainder().to_string();
                    let done = html_block_ends(end, &content);
                    self.open[tip_idx].pos.end_line = lineno;
                    if let Builder::Html { lines, .. } = &mut self.open[tip_idx].builder {
                        lines.push(content);
                    }
                    if done {
                        self.close_top_block();
                    }
                    return;
                }
                Builder::Table(_) => {
                    self.extend_table(line);
                    return;
                }
                Builder::Paragraph { .. } => {
                    self.extend_paragraph(line);
                    return;
                }
                _ => unreachable!("leaf check"),
            }
        }

        // Lazy continuation: a paragraph keeps going even though its
        // containers did not all match, as long as the line could not start
        // anything new.
        if !all_matched && !line.is_blank() {
            let tip_idx = self.open.len() - 1;
            if matches!(self.open[tip_idx].builder, Builder::Paragraph { .. }) {
                let rest = line.rest();
                let indent = line.indent();
                let mut scratch = false;
                let can_start_new = indent <= 3
                    && (line.peek_nonspace().2 == b'>'
                        || is_thematic_break(rest)
                        || parse_atx_heading(rest).is_some()
                        || parse_fence_start(rest).is_some()
                        || parse_html_block_start(rest, true, &mut scratch).is_some());
                if !can_start_new {
                    let marker = if indent <= 3 {
                        parse_list_marker(rest)
                    } else {
                        None
                    };
                    let has_unmatched_item = (matched..num_open)
                        .any(|idx| matches!(self.open[idx].builder, Builder::Item { .. }));
                    let interrupts = marker.as_ref().map_or(false, can_interrupt_paragraph);
                    if !(has_unmatched_item && marker.is_some()) && !interrupts {
                        line.advance_to_nonspace();
                        let text = line.remainder().to_string();
                        if let Builder::Paragraph { lines } = &mut self.open[tip_idx].builder {
                            lines.push(text);
                        }
                        for ob in self.open.iter_mut().skip(1) {
                            ob.pos.end_line = lineno;
                        }
                        return;
                    }
                }
            }
        }

        // Close everything beyond the line depth, then try starters.
        while self.open.len() > matched {
            self.close_top_block();
        }
        self.open_new_blocks(line);
    }

    fn extend_table(&mut self, line: Line<'_>) {
        let lineno = self.lineno;
        if line.is_blank() {
            self.close_top_block();
            return;
        }
        let rest = line.rest();
        if table::trim_space(rest) == "|" {
            // A lone pipe is not a table line.
            self.corner = true;
            self.close_top_block();
            self.open_new_blocks(line);
            return;
        }
        let mut scratch = false;
        if line.indent() <= 3
            && (is_thematic_break(rest)
                || parse_atx_heading(rest).is_some()
                || parse_fence_start(rest).is_some()
                || rest.starts_with('>')
                || parse_html_block_start(rest, true, &mut scratch).is_some()
                || parse_list_marker(rest).map_or(false, |m| !m.is_empty_item))
        {
            self.close_top_block();
            self.open_new_blocks(line);
            return;
        }
        let tip = self.open.len() - 1;
        self.open[tip].pos.end_line = lineno;
        let row = table::trim_outer(rest).to_string();
        if let Builder::Table(b) = &mut self.open[tip].builder {
            b.rows.push(row);
        }
    }

    fn extend_paragraph(&mut self, mut line: Line<'_>) {
        let lineno = self.lineno;
        let tip_idx = self.open.len() - 1;
        let (ns_col, ns_off, ns_byte) = line.peek_nonspace();
        let indent = ns_col - line.col_offset;

        if ns_byte == 0 && ns_off >= line.raw.len() {
            self.close_top_block();
            return;
        }
        let rest = &line.raw[ns_off..];

        // Table start: the previous paragraph line becomes the header when
        // this line is a matching delimiter row.
        if self.options.tables {
            if let Some(align) = table::parse_separator(rest) {
                let hdr_ok = match &self.open[tip_idx].builder {
                    Builder::Paragraph { lines } => lines
                        .last()
                        .map_or(false, |hdr| table::table_count(hdr) == align.len()),
                    _ => false,
                };
                if hdr_ok {
                    let (hdr, para_empty) = match &mut self.open[tip_idx].builder {
                        Builder::Paragraph { lines } => {
                            let hdr = lines.pop().unwrap();
                            (hdr, lines.is_empty())
                        }
                        _ => unreachable!(),
                    };
                    if para_empty {
                        self.open.pop();
                    } else {
                        if let Some(ob) = self.open.get_mut(tip_idx) {
                            ob.pos.end_line = lineno.saturating_sub(1);
                        }
                        self.close_top_block();
                    }
                    let mut ob = OpenBlock::new(
                        Builder::Table(Box::new(TableBuilder {
                            hdr: table::trim_outer(&hdr).to_string(),
                            align,
                            rows: Vec::new(),
                        })),
                        lineno.saturating_sub(1),
                    );
                    ob.pos.end_line = lineno;
                    self.open.push(ob);
                    return;
                }
            }
        }

        // Fast path: a byte that cannot interrupt a paragraph extends it.
        if indent > 3
            || !matches!(
                ns_byte,
                b'=' | b'-'
                    | b'*'
                    | b'_'
                    | b'#'
                    | b'`'
                    | b'~'
                    | b'<'
                    | b'>'
                    | b'+'
                    | b'0'..=b'9'
            )
        {
            self.append_paragraph_line(tip_idx, &mut line);
            return;
        }

        // Setext underline.
        if let Some(level) = parse_setext_underline(rest) {
            let ob = self.open.pop().unwrap();
            let lines = match ob.builder {
                Builder::Paragraph { lines } => lines,
                _ => unreachable!(),
            };
            let joined = lines.join("\n");
            let remaining = self.extract_ref_defs(&joined);
            if remaining.is_empty() {
                let pos = ob.pos;
                let parent = self.open.last_mut().unwrap();
                parent.children.push(Block::Empty { pos });
                self.open_new_blocks(line);
                return;
            }
            let pos = Position {
                start_line: ob.pos.start_line,
                end_line: lineno,
            };
            let parent = self.open.last_mut().unwrap();
            parent.children.push(Block::Heading {
                pos,
                level,
                text: Text::new(pos, remaining),
                id: String::new(),
            });
            return;
        }

        if is_thematic_break(rest) {
            self.close_top_block();
            let pos = Position {
                start_line: lineno,
                end_line: lineno,
            };
            let parent = self.open.last_mut().unwrap();
            parent.children.push(Block::ThematicBreak { pos });
            return;
        }

        if let Some((level, content)) = parse_atx_heading(rest) {
            self.close_top_block();
            self.push_atx_heading(level, content);
            return;
        }

        if let Some((fence_char, fence_len, info)) = parse_fence_start(rest) {
            self.close_top_block();
            self.push_fence(fence_char, fence_len, indent, info);
            return;
        }

        {
            let mut corner = self.corner;
            if let Some(end) = parse_html_block_start(rest, true, &mut corner) {
                self.corner = corner;
                self.close_top_block();
                self.start_html_block(line, end);
                return;
            }
        }

        if ns_byte == b'>' {
            self.close_top_block();
            self.open_new_blocks(line);
            return;
        }

        if parse_list_marker(rest).map_or(false, |m| can_interrupt_paragraph(&m)) {
            self.close_top_block();
            self.open_new_blocks(line);
            return;
        }

        self.append_paragraph_line(tip_idx, &mut line);
    }

    fn append_paragraph_line(&mut self, tip_idx: usize, line: &mut Line<'_>) {
        line.advance_to_nonspace();
        let text = line.remainder().to_string();
        self.open[tip_idx].pos.end_line = self.lineno;
        if let Builder::Paragraph { lines } = &mut self.open[tip_idx].builder {
            lines.push(text);
        }
    }

    pub(super) fn open_new_blocks(&mut self, mut line: Line<'_>) {
        let lineno = self.lineno;
        loop {
            let (ns_col, ns_off, first_byte) = line.peek_nonspace();
            let indent = ns_col - line.col_offset;

            if first_byte == 0 && ns_off >= line.raw.len() {
                return; // blank line: nothing to open
            }

            if indent >= 4 {
                if !matches!(self.open.last().unwrap().builder, Builder::Paragraph { .. }) {
                    line.skip_indent(4);
                    let content = line.remainder_with_partial().into_owned();
                    self.open.push(OpenBlock::new(
                        Builder::Pre {
                            lines: vec![content],
                        },
                        lineno,
                    ));
                    return;
                }
            } else {
                let rest = &line.raw[ns_off..];

                if let Some((fence_char, fence_len, info)) = parse_fence_start(rest) {
                    self.push_fence(fence_char, fence_len, indent, info);
                    return;
                }

                if first_byte == b'>' {
                    consume_quote_marker(&mut line);
                    self.open.push(OpenBlock::new(Builder::Quote, lineno));
                    continue;
                }

                if let Some((level, content)) = parse_atx_heading(rest) {
                    self.push_atx_heading(level, content);
                    return;
                }

                if is_thematic_break(rest) {
                    let pos = Position {
                        start_line: lineno,
                        end_line: lineno,
                    };
                    let parent = self.open.last_mut().unwrap();
                    parent.children.push(Block::ThematicBreak { pos });
                    return;
                }

                if let Some(marker) = parse_list_marker(rest) {
                    line.advance_to_nonspace();
                    let rest_blank = self.start_list_item(&mut line, marker, indent);
                    if rest_blank {
                        return;
                    }
                    continue;
                }

                if let Some(end) = parse_html_block_start(rest, false, &mut self.corner) {
                    self.start_html_block(line, end);
                    return;
                }

                if self.options.footnotes && first_byte == b'[' {
                    if let Some((label, consumed)) = parse_footnote_start(rest) {
                        let key = normalize_reference_label(&label).into_owned();
                        if self.footnote_labels.contains_key(&key) {
                            // A second definition with the same label is not
                            // treated as a footnote.
                            self.corner = true;
                        } else {
                            line.advance_to_nonspace();
                            line.advance_bytes(consumed);
                            self.open
                                .push(OpenBlock::new(Builder::FootnoteDef { label }, lineno));
                            continue;
                        }
                    }
                }
            }

            line.advance_to_nonspace();
            self.open.push(OpenBlock::new(
                Builder::Paragraph {
                    lines: vec![line.remainder().to_string()],
                },
                lineno,
            ));
            return;
        }
    }

    fn push_atx_heading(&mut self, level: u8, content: &str) {
        let lineno = self.lineno;
        let (id, content) = if self.options.heading_ids {
            extract_heading_id(content)
        } else {
            (String::new(), content)
        };
        let pos = Position {
            start_line: lineno,
            end_line: lineno,
        };
        let parent = self.open.last_mut().unwrap();
        parent.children.push(Block::Heading {
            pos,
            level,
            text: Text::new(pos, content.to_string()),
            id,
        });
    }

    fn push_fence(&mut self, fence_char: u8, fence_len: usize, indent: usize, info: &str) {
        let info = resolve_entities_and_escapes(info);
        if let Some(tok) = info.split([' ', '\t']).next() {
            if tok.chars().any(|c| c.is_whitespace() && c != ' ' && c != '\t') {
                // GFM tokenizes the info string by ASCII space only.
                self.corner = true;
            }
        }
        self.open.push(OpenBlock::new(
            Builder::Fence(Box::new(FenceData {
                fence_char,
                fence_len,
                indent,
                info,
                lines: Vec::new(),
            })),
            self.lineno,
        ));
    }

    fn start_html_block(&mut self, line: Line<'_>, end: HtmlEnd) {
        let first = line.remainder().to_string();
        let done = html_block_ends(end, &first);
        self.open.push(OpenBlock::new(
            Builder::Html {
                end,
                lines: vec![first],
            },
            self.lineno,
        ));
        if done {
            self.close_top_block();
        }
    }

    /// Open a list item at the current position. Returns true when the rest
    /// of the line after the marker is blank (an empty item).
    fn start_list_item(
        &mut self,
        line: &mut Line<'_>,
        marker: ListMarkerInfo,
        marker_indent: usize,
    ) -> bool {
        line.advance_columns(marker.marker_len);
        let (ns_col, ns_off, ns_byte) = line.peek_nonspace();
        let rest_blank = ns_byte == 0 && ns_off >= line.raw.len();
        let spaces_after = if rest_blank {
            1
        } else {
            let total = ns_col - line.col_offset;
            if total >= 5 || total == 0 {
                1
            } else {
                total
            }
        };
        let width = marker_indent + marker.marker_len + spaces_after;
        if !rest_blank {
            line.skip_indent(spaces_after);
        }

        let mut checked = None;
        if !rest_blank && self.options.task_lists {
            let rem = line.remainder().as_bytes();
            if rem.len() >= 4
                && rem[0] == b'['
                && rem[2] == b']'
                && (rem[3] == b' ' || rem[3] == b'\t')
            {
                match rem[1] {
                    b' ' => checked = Some(false),
                    b'x' | b'X' => checked = Some(true),
                    _ => {}
                }
                if checked.is_some() {
                    line.advance_bytes(3);
                }
            }
        }

        self.open.push(OpenBlock::new(
            Builder::Item {
                bullet: marker.bullet,
                num: marker.start_num,
                width,
                have_content: !rest_blank,
                checked,
            },
            self.lineno,
        ));
        rest_blank
    }
}

/// Consume a `>` quote marker plus one optional following space, accounting
/// for tab stops.
fn consume_quote_marker(line: &mut Line<'_>) {
    line.advance_to_nonspace();
    line.byte_offset += 1;
    line.col_offset += 1;
    if line.byte_offset < line.raw.len() {
        match line.raw.as_bytes()[line.byte_offset] {
            b' ' => {
                line.byte_offset += 1;
                line.col_offset += 1;
            }
            b'\t' => {
                let width = 4 - (line.col_offset % 4);
                line.byte_offset += 1;
                line.col_offset += 1;
                if width > 1 {
                    line.partial_spaces = width - 1;
                }
            }
            _ => {}
        }
    }
}
