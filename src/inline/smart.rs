//! Smart typography (curly quotes, dashes, ellipses) and `:name:` emoji.

use super::*;
use crate::ast::{Emoji, Inline};
use crate::emoji;

impl<'a, 'c> TextParser<'a, 'c> {
    /// A single `'` or `"` becomes a pairing delimiter; phase 2 rewrites it
    /// to the curly form.
    pub(super) fn scan_smart_quote(&mut self, i: usize) -> Option<usize> {
        if !self.cx.options.smart_quote {
            return None;
        }
        let marker = self.bytes[i];
        let (can_open, can_close) =
            flanking(marker, char_before(self.s, i), char_at(self.s, i + 1));
        self.emit(i);
        self.parts.push(Part::Emph(EmphPart {
            marker,
            n: 1,
            len: 1,
            can_open,
            can_close,
        }));
        self.skip(i + 1);
        Some(i + 1)
    }

    /// Map a run of two or more hyphens onto em and en dashes following the
    /// cmark-gfm rules: all-em when divisible by three, all-en when
    /// divisible by two, otherwise em dashes with one or two en dashes at
    /// the end.
    pub(super) fn scan_smart_dash(&mut self, i: usize) -> Option<usize> {
        if !self.cx.options.smart_dash {
            return None;
        }
        let len = self.bytes.len();
        let mut j = i + 1;
        while j < len && self.bytes[j] == b'-' {
            j += 1;
        }
        let n = j - i;
        if n < 2 {
            return None;
        }
        let (em, en) = if n % 3 == 0 {
            (n / 3, 0)
        } else if n % 2 == 0 {
            (0, n / 2)
        } else if n % 3 == 2 {
            ((n - 2) / 3, 1)
        } else {
            ((n - 4) / 3, 2)
        };
        let mut text = String::with_capacity(3 * (em + en));
        for _ in 0..em {
            text.push('—');
        }
        for _ in 0..en {
            text.push('–');
        }
        self.emit(i);
        self.parts.push(Part::Done(Inline::Plain(text)));
        self.skip(j);
        Some(j)
    }

    pub(super) fn scan_smart_dot(&mut self, i: usize) -> Option<usize> {
        if !self.cx.options.smart_dot || !self.s[i..].starts_with("...") {
            return None;
        }
        self.emit(i);
        self.parts
            .push(Part::Done(Inline::Plain("…".to_string())));
        self.skip(i + 3);
        Some(i + 3)
    }

    pub(super) fn scan_emoji(&mut self, i: usize) -> Option<usize> {
        if !self.cx.options.emoji {
            return None;
        }
        let bytes = self.bytes;
        let mut j = i + 1;
        while j < bytes.len() && j - i <= 40 && emoji::is_name_byte(bytes[j]) {
            j += 1;
        }
        if j <= i + 1 || bytes.get(j) != Some(&b':') {
            return None;
        }
        let name = &self.s[i + 1..j];
        let text = emoji::lookup(name)?;
        self.emit(i);
        self.parts.push(Part::Done(Inline::Emoji(Emoji {
            name: name.to_string(),
            text: text.to_string(),
        })));
        self.skip(j + 1);
        Some(j + 1)
    }
}
