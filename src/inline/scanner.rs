//! Phase 1: byte-dispatch scan over one text run.

use super::*;
use crate::ast::Inline;
use crate::is_ascii_punctuation;

impl<'a, 'c> TextParser<'a, 'c> {
    pub(super) fn scan(&mut self) {
        let len = self.bytes.len();
        let mut i = 0;
        while i < len {
            let b = self.bytes[i];
            let next = match b {
                b'\\' => self.scan_escape(i),
                b'`' => Some(self.scan_code_span(i)),
                b'<' => self.scan_angle(i),
                b'[' => Some(self.scan_open_bracket(i)),
                b'!' => self.scan_image_open(i),
                b']' => self.scan_close_bracket(i),
                b'*' | b'_' => Some(self.scan_delim_run(i)),
                b'~' => self.scan_strikethrough(i),
                b'\'' | b'"' => self.scan_smart_quote(i),
                b'-' => self.scan_smart_dash(i),
                b'.' => self.scan_smart_dot(i),
                b':' => self.scan_emoji(i),
                b'&' => self.scan_entity(i),
                b'\n' => Some(self.scan_break(i)),
                _ => None,
            };
            i = match next {
                Some(n) => n,
                None => i + utf8_char_len(b),
            };
        }
        self.emit(len);
    }

    fn scan_escape(&mut self, i: usize) -> Option<usize> {
        let next = *self.bytes.get(i + 1)?;
        if is_ascii_punctuation(next) {
            self.emit(i);
            self.parts.push(Part::Done(Inline::Escaped(
                self.s[i + 1..i + 2].to_string(),
            )));
            self.skip(i + 2);
            return Some(i + 2);
        }
        if next == b'\n' {
            self.emit(i);
            let mut end = i + 2;
            while end < self.bytes.len() && matches!(self.bytes[end], b' ' | b'\t') {
                end += 1;
            }
            self.parts.push(Part::Done(Inline::HardBreak));
            self.skip(end);
            return Some(end);
        }
        None
    }

    /// Code span: count the opening run and look for a closing run of
    /// exactly the same length. A failed search is memoized per run length
    /// so adversarial backtick soup stays linear.
    fn scan_code_span(&mut self, i: usize) -> usize {
        let len = self.bytes.len();
        let mut n = 1;
        while i + n < len && self.bytes[i + n] == b'`' {
            n += 1;
        }
        if n > MAX_BACKTICK_RUN || self.backtick_fail[n.min(MAX_BACKTICK_RUN)] {
            return i + n; // literal backticks
        }

        let mut j = i + n;
        loop {
            while j < len && self.bytes[j] != b'`' {
                j += 1;
            }
            if j >= len {
                self.backtick_fail[n] = true;
                return i + n;
            }
            let close_start = j;
            while j < len && self.bytes[j] == b'`' {
                j += 1;
            }
            if j - close_start != n {
                continue;
            }

            let raw = &self.s[i + n..close_start];
            let text = if raw.contains('\n') {
                raw.replace('\n', " ")
            } else {
                raw.to_string()
            };
            // `` ` `` quotes a single backtick: strip one padding space from
            // each end when both are present and the content is not all
            // spaces.
            let stripped = if text.len() >= 2
                && text.starts_with(' ')
                && text.ends_with(' ')
                && !text.bytes().all(|b| b == b' ')
            {
                text[1..text.len() - 1].to_string()
            } else {
                text
            };
            self.emit(i);
            self.parts.push(Part::Done(Inline::Code(stripped)));
            self.skip(j);
            return j;
        }
    }

    fn scan_open_bracket(&mut self, i: usize) -> usize {
        if self.cx.options.footnotes && self.bytes.get(i + 1) == Some(&b'^') {
            if let Some(end) = self.scan_footnote_ref(i) {
                return end;
            }
        }
        self.emit(i);
        self.opens.push(self.parts.len());
        self.parts.push(Part::Open {
            image: false,
            after: i + 1,
        });
        self.skip(i + 1);
        i + 1
    }

    fn scan_image_open(&mut self, i: usize) -> Option<usize> {
        if self.bytes.get(i + 1) != Some(&b'[') {
            return None;
        }
        self.emit(i);
        self.opens.push(self.parts.len());
        self.parts.push(Part::Open {
            image: true,
            after: i + 2,
        });
        self.skip(i + 2);
        Some(i + 2)
    }

    fn scan_delim_run(&mut self, i: usize) -> usize {
        let marker = self.bytes[i];
        let len = self.bytes.len();
        let mut j = i + 1;
        while j < len && self.bytes[j] == marker {
            j += 1;
        }
        let (can_open, can_close) =
            flanking(marker, char_before(self.s, i), char_at(self.s, j));
        self.emit(i);
        self.parts.push(Part::Emph(EmphPart {
            marker,
            n: j - i,
            len: j - i,
            can_open,
            can_close,
        }));
        self.skip(j);
        j
    }

    /// GFM strikethrough: only a run of exactly two tildes is a delimiter.
    fn scan_strikethrough(&mut self, i: usize) -> Option<usize> {
        if !self.cx.options.strikethrough {
            return None;
        }
        let len = self.bytes.len();
        let mut j = i + 1;
        while j < len && self.bytes[j] == b'~' {
            j += 1;
        }
        if j - i != 2 {
            // Runs of any other length are literal text, whole.
            return Some(j);
        }
        let (can_open, can_close) = flanking(b'~', char_before(self.s, i), char_at(self.s, j));
        self.emit(i);
        self.parts.push(Part::Emph(EmphPart {
            marker: b'~',
            n: 2,
            len: 2,
            can_open,
            can_close,
        }));
        self.skip(j);
        Some(j)
    }

    fn scan_break(&mut self, i: usize) -> usize {
        let mut text_end = i;
        while text_end > self.emitted && matches!(self.bytes[text_end - 1], b' ' | b'\t') {
            text_end -= 1;
        }
        let hard = i >= 2 && self.bytes[i - 1] == b' ' && self.bytes[i - 2] == b' ';
        self.emit(text_end);
        let mut end = i + 1;
        while end < self.bytes.len() && matches!(self.bytes[end], b' ' | b'\t') {
            end += 1;
        }
        self.parts.push(Part::Done(if hard {
            Inline::HardBreak
        } else {
            Inline::SoftBreak
        }));
        self.skip(end);
        end
    }
}
