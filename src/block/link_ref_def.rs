//! Link reference definitions, extracted from paragraph prefixes when a
//! paragraph is finalized.

use super::BlockParser;
use crate::ast::LinkDef;
use crate::entities;
use crate::inline::normalize_reference_label;
use crate::{is_ascii_punctuation, utf8_char_len};

impl BlockParser<'_> {
    /// Strip any leading link reference definitions from finalized paragraph
    /// text, recording them in the document's link table (first definition
    /// wins). Returns the remaining paragraph text.
    pub(super) fn extract_ref_defs(&mut self, content: &str) -> String {
        let mut pos = 0;
        loop {
            let trimmed = content[pos..].trim_start_matches([' ', '\t', '\n']);
            if !trimmed.starts_with('[') {
                break;
            }
            match parse_link_ref_def(trimmed) {
                Some(def) => {
                    let key = normalize_reference_label(&def.label).into_owned();
                    self.links.entry(key).or_insert_with(|| LinkDef {
                        url: resolve_entities_and_escapes(&def.url),
                        title: def
                            .title
                            .as_deref()
                            .map(resolve_entities_and_escapes)
                            .unwrap_or_default(),
                        title_char: def.title_char,
                    });
                    let skipped = content.len() - pos - trimmed.len();
                    pos += skipped + def.consumed;
                }
                None => break,
            }
        }
        content[pos..].trim_matches([' ', '\t', '\n']).to_string()
    }
}

pub(super) struct RefDef {
    label: String,
    url: String,
    title: Option<String>,
    title_char: u8,
    consumed: usize,
}

/// Parse one link reference definition at the start of `input`.
fn parse_link_ref_def(input: &str) -> Option<RefDef> {
    let bytes = input.as_bytes();
    let (label, mut i) = parse_label(input)?;

    if bytes.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    i = skip_spaces_and_one_newline(bytes, i);

    let (url, after_dest) = parse_destination(input, i)?;
    i = after_dest;

    // A title, if present, must be separated from the destination by
    // whitespace and must end the line.
    let before_title = i;
    let title_start = skip_spaces_and_one_newline(bytes, i);
    if title_start > before_title && title_start < bytes.len() {
        if let Some((title, title_char, after_title)) = parse_title(input, title_start) {
            let after = skip_line_spaces(bytes, after_title);
            if after >= bytes.len() || bytes[after] == b'\n' {
                let consumed = if after < bytes.len() { after + 1 } else { after };
                return Some(RefDef {
                    label,
                    url,
                    title: Some(title),
                    title_char,
                    consumed,
                });
            }
        }
    }

    // No title: the rest of the destination's line must be blank.
    let after = skip_line_spaces(bytes, before_title);
    if after < bytes.len() && bytes[after] != b'\n' {
        return None;
    }
    let consumed = if after < bytes.len() { after + 1 } else { after };
    Some(RefDef {
        label,
        url,
        title: None,
        title_char: 0,
        consumed,
    })
}

/// Parse a `[label]` at the start of `input`. The label must be 1–999
/// characters, contain no unescaped brackets, and not be all whitespace.
fn parse_label(input: &str) -> Option<(String, usize)> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b']' => {
                if i - 1 > 999 {
                    return None;
                }
                let label = input[1..i].trim_matches([' ', '\t', '\n']);
                if label.is_empty() {
                    return None;
                }
                return Some((label.to_string(), i + 1));
            }
            b'[' => return None,
            b'\\' if i + 1 < bytes.len() => i += 1 + utf8_char_len(bytes[i + 1]),
            b => i += utf8_char_len(b),
        }
    }
    None
}

fn parse_destination(input: &str, start: usize) -> Option<(String, usize)> {
    let bytes = input.as_bytes();
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
                b => {
                    let n = utf8_char_len(b);
                    dest.push_str(&input[i..i + n]);
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
            b => {
                let n = utf8_char_len(b);
                dest.push_str(&input[i..i + n]);
                i += n;
            }
        }
    }
    if depth != 0 || dest.is_empty() {
        return None;
    }
    Some((dest, i))
}

fn parse_title(input: &str, start: usize) -> Option<(String, u8, usize)> {
    let bytes = input.as_bytes();
    let open = bytes[start];
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
        } else {
            let n = utf8_char_len(b);
            title.push_str(&input[i..i + n]);
            i += n;
        }
    }
    None
}

fn skip_spaces_and_one_newline(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'\n' {
        i += 1;
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
    }
    i
}

fn skip_line_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    i
}

/// Resolve backslash escapes and HTML entity references in destinations,
/// titles, and info strings.
pub(super) fn resolve_entities_and_escapes(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() && is_ascii_punctuation(bytes[i + 1]) {
            out.push(bytes[i + 1] as char);
            i += 2;
        } else if bytes[i] == b'&' {
            match resolve_entity(bytes, s, i, &mut out) {
                Some(next) => i = next,
                None => {
                    out.push('&');
                    i += 1;
                }
            }
        } else {
            let n = utf8_char_len(bytes[i]);
            out.push_str(&s[i..i + n]);
            i += n;
        }
    }
    out
}

fn resolve_entity(bytes: &[u8], s: &str, start: usize, out: &mut String) -> Option<usize> {
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
        if entities::resolve_numeric_ref_into(&s[ns..i], hex, out) {
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
        if entities::lookup_entity_into(&s[ns..i], out) {
            Some(i + 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_def() {
        let def = parse_link_ref_def("[foo]: /url \"title\"").unwrap();
        assert_eq!(def.label, "foo");
        assert_eq!(def.url, "/url");
        assert_eq!(def.title.as_deref(), Some("title"));
        assert_eq!(def.title_char, b'"');
    }

    #[test]
    fn def_without_title() {
        let def = parse_link_ref_def("[a]: <my url>\nrest").unwrap();
        assert_eq!(def.url, "my url");
        assert!(def.title.is_none());
        assert_eq!(&"[a]: <my url>\nrest"[def.consumed..], "rest");
    }

    #[test]
    fn title_must_end_line() {
        assert!(parse_link_ref_def("[a]: /url \"title\" x").is_none());
    }

    #[test]
    fn resolves_escapes_and_entities() {
        assert_eq!(resolve_entities_and_escapes(r"a\*b"), "a*b");
        assert_eq!(resolve_entities_and_escapes("x&amp;y"), "x&y");
        assert_eq!(resolve_entities_and_escapes("x&bogus;y"), "x&bogus;y");
        assert_eq!(resolve_entities_and_escapes("x&#228;y"), "xäy");
    }
}
