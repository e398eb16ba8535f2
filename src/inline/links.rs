//! Phase 1b: resolving a close bracket into a link or image, plus the other
//! `<`- and `&`-introduced leaf inlines.

use super::*;
use crate::ast::{AutoLink, LinkInline};
use crate::entities;
use crate::is_ascii_punctuation;

#[inline]
fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }
    i
}

/// A URL containing `%` not followed by two hex digits renders differently
/// across implementations.
fn has_percent_corner(url: &str) -> bool {
    let bytes = url.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'%'
            && !(i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit())
        {
            return true;
        }
    }
    false
}

impl<'a, 'c> TextParser<'a, 'c> {
    /// Handle `]` at position `i`. Returns the position after whatever the
    /// bracket resolved to, or None when the bracket is literal text.
    pub(super) fn scan_close_bracket(&mut self, i: usize) -> Option<usize> {
        let oi = self.opens.pop()?;
        let (image, after) = match self.parts[oi] {
            Part::Open { image, after } => (image, after),
            _ => unreachable!("opens entries always point at Part::Open"),
        };
        // No links inside links: a completed link bars earlier openers.
        if !image && self.last_link_open > after {
            return None;
        }

        let parsed = self.parse_inline_link(i + 1).or_else(|| {
            self.parse_ref_link(after, i)
        });
        let (url, title, title_char, end) = parsed?;

        if has_percent_corner(&url) {
            self.corner = true;
        }
        self.emit(i);
        let inner_parts = self.parts.split_off(oi + 1);
        let inner = emphasis::resolve(inner_parts);
        let node = Box::new(LinkInline {
            inner,
            url,
            title,
            title_char,
        });
        self.parts[oi] = Part::Done(if image {
            Inline::Image(node)
        } else {
            Inline::Link(node)
        });
        if !image {
            self.last_link_open = after;
        }
        self.skip(end);
        Some(end)
    }

    /// `](dest "title")` with optional title; dest may be angle-bracketed.
    fn parse_inline_link(&mut self, j: usize) -> Option<(String, String, u8, usize)> {
        let bytes = self.bytes;
        if bytes.get(j) != Some(&b'(') {
            return None;
        }
        let mut i = skip_ws(bytes, j + 1);
        let mut url = String::new();
        let mut title = String::new();
        let mut title_char = 0u8;
        if bytes.get(i) != Some(&b')') {
            let (dest, next) = self.parse_link_dest(i)?;
            url = dest;
            i = skip_ws(bytes, next);
            if bytes.get(i) != Some(&b')') {
                let (t, c, next) = self.parse_link_title(i)?;
                title = t;
                title_char = c;
                i = skip_ws(bytes, next);
            }
        }
        if bytes.get(i) != Some(&b')') {
            return None;
        }
        Some((url, title, title_char, i + 1))
    }

    fn parse_link_dest(&mut self, start: usize) -> Option<(String, usize)> {
        let bytes = self.bytes;
        if start >= bytes.len() {
            return None;
        }

        if bytes[start] == b'<' {
            let mut i = start + 1;
            let mut dest = String::new();
            while i < bytes.len() {
                match bytes[i] {
                    b'>' => return Some((dest, i + 1)),
                    b'<' | b'\n' => return None,
                    b'\\' if i + 1 < bytes.len() && is_ascii_punctuation(bytes[i + 1]) => {
                        dest.push(bytes[i + 1] as char);
                        i += 2;
                    }
                    b'&' => match self.resolve_entity_at(i, &mut dest) {
                        Some(next) => i = next,
                        None => {
                            dest.push('&');
                            i += 1;
                        }
                    },
                    b => {
                        let n = utf8_char_len(b);
                        dest.push_str(&self.s[i..i + n]);
                        i += n;
                    }
                }
            }
            return None;
        }

        let mut i = start;
        let mut depth = 0i32;
        let mut dest = String::new();
        while i < bytes.len() {
            match bytes[i] {
                b' ' | b'\t' | b'\n' => break,
                b'(' => {
                    depth += 1;
                    if depth > 32 {
                        return None;
                    }
                    dest.push('(');
                    i += 1;
                }
                b')' => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    dest.push(')');
                    i += 1;
                }
                b'\\' if i + 1 < bytes.len() && is_ascii_punctuation(bytes[i + 1]) => {
                    dest.push(bytes[i + 1] as char);
                    i += 2;
                }
                b'&' => match self.resolve_entity_at(i, &mut dest) {
                    Some(next) => i = next,
                    None => {
                        dest.push('&');
                        i += 1;
                    }
                },
                b => {
                    let n = utf8_char_len(b);
                    dest.push_str(&self.s[i..i + n]);
                    i += n;
                }
            }
        }
        if depth != 0 {
            return None;
        }
        Some((dest, i))
    }

    fn parse_link_title(&mut self, start: usize) -> Option<(String, u8, usize)> {
        let bytes = self.bytes;
        let open = *bytes.get(start)?;
        let close = match open {
            b'"' => b'"',
            b'\'' => b'\'',
            b'(' => b')',
            _ => return None,
        };
        let mut i = start + 1;
        let mut title = String::new();
        while i < bytes.len() {
            let b = bytes[i];
            if b == close {
                return Some((title, close, i + 1));
            }
            if b == b'(' && open == b'(' {
                return None;
            }
            if b == b'\\' && i + 1 < bytes.len() && is_ascii_punctuation(bytes[i + 1]) {
                title.push(bytes[i + 1] as char);
                i += 2;
            } else if b == b'&' {
                match self.resolve_entity_at(i, &mut title) {
                    Some(next) => i = next,
                    None => {
                        title.push('&');
                        i += 1;
                    }
                }
            } else {
                let n = utf8_char_len(b);
                title.push_str(&self.s[i..i + n]);
                i += n;
            }
        }
        None
    }

    /// `][label]`, `][]`, or a shortcut reference resolved from the bracket
    /// text itself.
    fn parse_ref_link(
        &mut self,
        inner_start: usize,
        close_pos: usize,
    ) -> Option<(String, String, u8, usize)> {
        let bytes = self.bytes;
        let i = close_pos + 1;

        // Full reference. An unknown-but-valid label does not fall back to
        // the bracket text.
        if bytes.get(i) == Some(&b'[') {
            if let Some((label, next)) = parse_ref_label(self.s, i) {
                let key = normalize_reference_label(label);
                return self
                    .cx
                    .links
                    .get(key.as_ref())
                    .map(|d| (d.url.clone(), d.title.clone(), d.title_char, next));
            }
        }

        // Collapsed or shortcut reference.
        let raw = &self.s[inner_start..close_pos];
        if raw.contains('[') || raw.contains(']') {
            return None;
        }
        if raw.len() > 999 {
            self.corner = true;
            return None;
        }
        let key = normalize_reference_label(raw);
        let def = self.cx.links.get(key.as_ref())?;
        let mut end = close_pos + 1;
        if self.s[end..].starts_with("[]") {
            end += 2;
        }
        Some((def.url.clone(), def.title.clone(), def.title_char, end))
    }

    pub(super) fn scan_footnote_ref(&mut self, i: usize) -> Option<usize> {
        let rest = &self.bytes[i..];
        let close = memchr::memchr(b']', rest)?;
        let label = &self.s[i + 2..i + close];
        let key = normalize_reference_label(label);
        let index = *self.cx.footnote_labels.get(key.as_ref())?;
        self.emit(i);
        self.parts.push(Part::Done(Inline::FootnoteLink {
            label: label.to_string(),
            index,
        }));
        self.skip(i + close + 1);
        Some(i + close + 1)
    }

    /// `<…>`: URI autolink, email autolink, or raw HTML tag.
    pub(super) fn scan_angle(&mut self, i: usize) -> Option<usize> {
        let (inline, end) = self
            .parse_autolink_uri(i)
            .or_else(|| self.parse_autolink_email(i))
            .or_else(|| self.parse_html_tag(i))?;
        self.emit(i);
        self.parts.push(Part::Done(inline));
        self.skip(end);
        Some(end)
    }

    fn parse_autolink_uri(&self, i: usize) -> Option<(Inline, usize)> {
        let bytes = self.bytes;
        let mut j = i + 1;
        if j >= bytes.len() || !bytes[j].is_ascii_alphabetic() {
            return None;
        }
        while j < bytes.len()
            && (bytes[j].is_ascii_alphanumeric() || matches!(bytes[j], b'+' | b'.' | b'-'))
            && j - (i + 1) <= 32
        {
            j += 1;
        }
        let scheme_len = j - (i + 1);
        if !(2..=32).contains(&scheme_len) || bytes.get(j) != Some(&b':') {
            return None;
        }
        j += 1;
        while j < bytes.len() && bytes[j] > b' ' && bytes[j] != b'<' && bytes[j] != b'>' {
            j += 1;
        }
        if bytes.get(j) != Some(&b'>') {
            return None;
        }
        let link = &self.s[i + 1..j];
        Some((
            Inline::AutoLink(AutoLink {
                text: link.to_string(),
                url: link.to_string(),
            }),
            j + 1,
        ))
    }

    fn parse_autolink_email(&self, i: usize) -> Option<(Inline, usize)> {
        let bytes = self.bytes;
        let mut j = i + 1;
        if j >= bytes.len() || !is_email_user_byte(bytes[j]) {
            return None;
        }
        while j < bytes.len() && is_email_user_byte(bytes[j]) {
            j += 1;
        }
        if bytes.get(j) != Some(&b'@') {
            return None;
        }
        loop {
            j += 1;
            let n = skip_domain_elem(&bytes[j..])?;
            j += n;
            match bytes.get(j) {
                Some(b'.') => continue,
                Some(b'>') => break,
                _ => return None,
            }
        }
        let email = &self.s[i + 1..j];
        Some((
            Inline::AutoLink(AutoLink {
                text: email.to_string(),
                url: format!("mailto:{email}"),
            }),
            j + 1,
        ))
    }

    fn parse_html_tag(&mut self, i: usize) -> Option<(Inline, usize)> {
        let rest = &self.s[i..];
        let bytes = rest.as_bytes();
        if bytes.len() < 3 {
            return None;
        }
        match bytes[1] {
            b'/' => self.parse_html_closing_tag(i),
            b'!' => match bytes[2] {
                b'-' => self.parse_html_comment(i),
                b'[' => self.parse_html_marker(i, "<![CDATA[", "]]>", Cache::Cdata),
                _ => self.parse_html_decl(i),
            },
            b'?' => self.parse_html_marker(i, "<?", "?>", Cache::ProcInst),
            _ => self.parse_html_open_tag(i),
        }
    }

    fn parse_html_comment(&mut self, i: usize) -> Option<(Inline, usize)> {
        let rest = &self.s[i..];
        for degenerate in ["<!-->", "<!--->"] {
            if rest.starts_with(degenerate) {
                let end = i + degenerate.len();
                return Some((Inline::HtmlTag(self.s[i..end].to_string()), end));
            }
        }
        self.parse_html_marker(i, "<!--", "-->", Cache::Comment)
    }

    fn parse_html_decl(&mut self, i: usize) -> Option<(Inline, usize)> {
        let bytes = self.bytes;
        if i + 2 >= bytes.len() || !bytes[i + 2].is_ascii_alphabetic() {
            return None;
        }
        self.parse_html_marker(i, "<", ">", Cache::Decl)
    }

    fn parse_html_marker(
        &mut self,
        i: usize,
        prefix: &str,
        suffix: &str,
        cache: Cache,
    ) -> Option<(Inline, usize)> {
        if !self.s[i..].starts_with(prefix) {
            return None;
        }
        if self.cache_failed(cache) {
            return None;
        }
        match self.s[i + prefix.len()..].find(suffix) {
            Some(off) => {
                let end = i + prefix.len() + off + suffix.len();
                Some((Inline::HtmlTag(self.s[i..end].to_string()), end))
            }
            None => {
                // No terminator anywhere to the right; remember that so the
                // next candidate on this text run fails in O(1).
                self.set_cache_failed(cache);
                None
            }
        }
    }

    fn cache_failed(&self, cache: Cache) -> bool {
        match cache {
            Cache::Comment => self.no_comment_end,
            Cache::ProcInst => self.no_proc_inst_end,
            Cache::Cdata => self.no_cdata_end,
            Cache::Decl => self.no_decl_end,
        }
    }

    fn set_cache_failed(&mut self, cache: Cache) {
        match cache {
            Cache::Comment => self.no_comment_end = true,
            Cache::ProcInst => self.no_proc_inst_end = true,
            Cache::Cdata => self.no_cdata_end = true,
            Cache::Decl => self.no_decl_end = true,
        }
    }

    fn parse_html_open_tag(&self, i: usize) -> Option<(Inline, usize)> {
        let bytes = self.bytes;
        let mut j = parse_tag_name(bytes, i + 1)?;
        loop {
            let had_space = {
                let before = j;
                while j < bytes.len() && matches!(bytes[j], b' ' | b'\t' | b'\n') {
                    j += 1;
                }
                j > before
            };
            if j >= bytes.len() {
                return None;
            }
            match bytes[j] {
                b'>' => {
                    j += 1;
                    break;
                }
                b'/' => {
                    if bytes.get(j + 1) != Some(&b'>') {
                        return None;
                    }
                    j += 2;
                    break;
                }
                _ => {
                    if !had_space {
                        return None;
                    }
                    j = parse_attr(bytes, j)?;
                }
            }
        }
        Some((Inline::HtmlTag(self.s[i..j].to_string()), j))
    }

    fn parse_html_closing_tag(&self, i: usize) -> Option<(Inline, usize)> {
        let bytes = self.bytes;
        let mut j = parse_tag_name(bytes, i + 2)?;
        while j < bytes.len() && matches!(bytes[j], b' ' | b'\t' | b'\n') {
            j += 1;
        }
        if bytes.get(j) != Some(&b'>') {
            return None;
        }
        Some((Inline::HtmlTag(self.s[i..j + 1].to_string()), j + 1))
    }

    /// `&name;`, `&#1234;`, or `&#xBEEF;` resolved to plain text.
    pub(super) fn scan_entity(&mut self, i: usize) -> Option<usize> {
        let mut out = String::new();
        let end = self.resolve_entity_at(i, &mut out)?;
        self.emit(i);
        self.parts.push(Part::Done(Inline::Plain(out)));
        self.skip(end);
        Some(end)
    }

    /// Resolve an entity reference starting at `&`; appends the expansion to
    /// `out` and returns the position after the `;`.
    fn resolve_entity_at(&self, start: usize, out: &mut String) -> Option<usize> {
        let bytes = self.bytes;
        let mut i = start + 1;
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b'#' {
            i += 1;
            let hex = matches!(bytes.get(i), Some(b'x') | Some(b'X'));
            if hex {
                i += 1;
            }
            let ns = i;
            let max = if hex { 6 } else { 7 };
            while i < bytes.len() && i - ns < max {
                let ok = if hex {
                    bytes[i].is_ascii_hexdigit()
                } else {
                    bytes[i].is_ascii_digit()
                };
                if !ok {
                    break;
                }
                i += 1;
            }
            if i == ns || bytes.get(i) != Some(&b';') {
                return None;
            }
            if entities::resolve_numeric_ref_into(&self.s[ns..i], hex, out) {
                Some(i + 1)
            } else {
                None
            }
        } else {
            let ns = i;
            while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                i += 1;
            }
            if i == ns || bytes.get(i) != Some(&b';') {
                return None;
            }
            if entities::lookup_entity_into(&self.s[ns..i], out) {
                Some(i + 1)
            } else {
                None
            }
        }
    }
}

#[derive(Copy, Clone)]
enum Cache {
    Comment,
    ProcInst,
    Cdata,
    Decl,
}

/// Parse a `[label]` used as a full reference. Rejects nested brackets and
/// labels over 999 characters.
fn parse_ref_label(s: &str, i: usize) -> Option<(&str, usize)> {
    let bytes = s.as_bytes();
    debug_assert_eq!(bytes[i], b'[');
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b']' => {
                if j - (i + 1) > 999 {
                    return None;
                }
                let label = s[i + 1..j].trim_matches([' ', '\t', '\n']);
                if label.is_empty() {
                    return None;
                }
                return Some((label, j + 1));
            }
            b'[' => return None,
            b'\\' if j + 1 < bytes.len() => j += 2,
            _ => j += 1,
        }
    }
    None
}

#[inline(always)]
fn is_email_user_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b)
}

/// One dot-separated domain element: letters/digits/hyphens up to 63 bytes
/// with letter-or-digit endpoints.
fn skip_domain_elem(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() || !bytes[0].is_ascii_alphanumeric() {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && i <= 63 && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i > 63 || !bytes[i - 1].is_ascii_alphanumeric() {
        return None;
    }
    Some(i)
}

fn parse_tag_name(bytes: &[u8], i: usize) -> Option<usize> {
    if i >= bytes.len() || !bytes[i].is_ascii_alphabetic() {
        return None;
    }
    let mut j = i + 1;
    while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-') {
        j += 1;
    }
    Some(j)
}

fn parse_attr(bytes: &[u8], mut i: usize) -> Option<usize> {
    if !(bytes[i].is_ascii_alphabetic() || bytes[i] == b'_' || bytes[i] == b':') {
        return None;
    }
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b':' | b'.' | b'-'))
    {
        i += 1;
    }
    let after_name = i;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'=' {
        i += 1;
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n') {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b'\'' || bytes[i] == b'"' {
            let quote = bytes[i];
            i += 1;
            while i < bytes.len() && bytes[i] != quote {
                i += 1;
            }
            if i >= bytes.len() {
                return None;
            }
            Some(i + 1)
        } else {
            if matches!(bytes[i], b'"' | b'\'' | b'=' | b'<' | b'>' | b'`') {
                return None;
            }
            while i < bytes.len()
                && !matches!(
                    bytes[i],
                    b' ' | b'\t' | b'\n' | b'"' | b'\'' | b'=' | b'<' | b'>' | b'`'
                )
            {
                i += 1;
            }
            Some(i)
        }
    } else {
        Some(after_name)
    }
}
