//! Phase 3: GFM extended autolinks over the resolved inline list.

use crate::ast::{AutoLink, Inline};
use crate::ParseOptions;

/// Rewrite plain text into autolinks, recursing through emphasis. Links and
/// images are left alone (no links inside links).
pub(super) fn apply(inlines: &mut Vec<Inline>, opts: &ParseOptions) {
    let items = std::mem::take(inlines);
    for item in items {
        match item {
            Inline::Plain(text) => expand_plain(&text, opts, inlines),
            Inline::Strong(mut sp) => {
                apply(&mut sp.inner, opts);
                inlines.push(Inline::Strong(sp));
            }
            Inline::Emph(mut sp) => {
                apply(&mut sp.inner, opts);
                inlines.push(Inline::Emph(sp));
            }
            Inline::Del(mut sp) => {
                apply(&mut sp.inner, opts);
                inlines.push(Inline::Del(sp));
            }
            other => inlines.push(other),
        }
    }
}

fn expand_plain(text: &str, opts: &ParseOptions, out: &mut Vec<Inline>) {
    let bytes = text.as_bytes();
    let mut last = 0;
    let mut i = 0;
    // No email local part can start before this offset; it advances past
    // every failed attempt so backscans never revisit a byte.
    let mut floor = 0;

    while i < bytes.len() {
        let found = match bytes[i] {
            b'h' | b'H' | b'w' | b'W' | b'm' | b'M' | b'x' | b'X' if boundary_ok(bytes, i) => {
                try_url(text, i, opts)
            }
            b'@' => {
                let attempt = try_email(text, i, last.max(floor));
                if attempt.is_none() {
                    floor = i + 1;
                }
                attempt
            }
            _ => None,
        };
        match found {
            Some((start, end, url)) => {
                if last < start {
                    out.push(Inline::Plain(text[last..start].to_string()));
                }
                out.push(Inline::AutoLink(AutoLink {
                    text: text[start..end].to_string(),
                    url,
                }));
                last = end;
                floor = end;
                i = end;
            }
            None => i += 1,
        }
    }
    if last < text.len() {
        out.push(Inline::Plain(text[last..].to_string()));
    }
}

/// An autolink may only begin where the preceding character is not an ASCII
/// letter.
fn boundary_ok(bytes: &[u8], i: usize) -> bool {
    i == 0 || !bytes[i - 1].is_ascii_alphabetic()
}

fn starts_with_ci(s: &str, i: usize, prefix: &str) -> bool {
    s.len() - i >= prefix.len() && s[i..i + prefix.len()].eq_ignore_ascii_case(prefix)
}

fn try_url(text: &str, i: usize, opts: &ParseOptions) -> Option<(usize, usize, String)> {
    for scheme in ["http://", "https://", "www."] {
        if starts_with_ci(text, i, scheme) {
            let body = i + scheme.len();
            // The `www.` prefix is itself part of the domain.
            let domain_start = if scheme == "www." { i } else { body };
            let end = scan_domain_and_path(text, domain_start)?;
            let end = trim_trailing(text, i, end);
            if end <= body {
                return None;
            }
            let linked = &text[i..end];
            let url = if scheme == "www." {
                let proto = if opts.autolink_assume_http {
                    "http://"
                } else {
                    "https://"
                };
                format!("{proto}{linked}")
            } else {
                linked.to_string()
            };
            return Some((i, end, url));
        }
    }
    for scheme in ["mailto:", "xmpp:"] {
        if starts_with_ci(text, i, scheme) {
            let body = i + scheme.len();
            let end = scan_mail_tail(text.as_bytes(), body)?;
            return Some((i, end, text[i..end].to_string()));
        }
    }
    None
}

/// Validate a domain at `start` and extend through the path. Returns the raw
/// end position (before trailing-punctuation trimming).
fn scan_domain_and_path(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b'_' | b'.')) {
        i += 1;
    }
    if !valid_domain(&text[start..i]) {
        return None;
    }
    while i < bytes.len() && bytes[i] > b' ' && bytes[i] != b'<' {
        i += 1;
    }
    Some(i)
}

/// GFM domain rule: dot-separated non-empty segments, at least one dot, and
/// no underscore in the last two segments.
fn valid_domain(domain: &str) -> bool {
    let segments: Vec<&str> = domain.split('.').collect();
    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        return false;
    }
    segments
        .iter()
        .rev()
        .take(2)
        .all(|s| !s.contains('_'))
}

/// Drop trailing punctuation, an unmatched `)`, or an entity-like `&name;`
/// suffix, repeatedly.
fn trim_trailing(text: &str, start: usize, mut end: usize) -> usize {
    let bytes = text.as_bytes();
    loop {
        if end <= start {
            return end;
        }
        match bytes[end - 1] {
            b'?' | b'!' | b'.' | b',' | b':' | b'@' | b'_' | b'~' => end -= 1,
            b')' => {
                let opens = bytes[start..end].iter().filter(|&&b| b == b'(').count();
                let closes = bytes[start..end].iter().filter(|&&b| b == b')').count();
                if closes > opens {
                    end -= 1;
                } else {
                    return end;
                }
            }
            b';' => {
                // Strip `&lt;`-style suffixes that are really entities.
                let mut j = end - 1;
                while j > start && bytes[j - 1].is_ascii_alphanumeric() {
                    j -= 1;
                }
                if j > start && bytes[j - 1] == b'&' && j < end - 1 {
                    end = j - 1;
                } else {
                    return end;
                }
            }
            _ => return end,
        }
    }
}

#[inline(always)]
fn is_email_local_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b'+')
}

fn try_email(text: &str, at: usize, floor: usize) -> Option<(usize, usize, String)> {
    let bytes = text.as_bytes();
    let mut start = at;
    while start > floor && is_email_local_byte(bytes[start - 1]) {
        start -= 1;
    }
    if start == at {
        return None;
    }
    if start > 0 && bytes[start - 1].is_ascii_alphanumeric() {
        return None;
    }

    let mut end = at + 1;
    while end < bytes.len()
        && (bytes[end].is_ascii_alphanumeric() || matches!(bytes[end], b'-' | b'_' | b'.'))
    {
        end += 1;
    }
    while end > at + 1 && bytes[end - 1] == b'.' {
        end -= 1;
    }
    if end == at + 1 || matches!(bytes[end - 1], b'-' | b'_') {
        return None;
    }
    if !valid_domain(&text[at + 1..end]) {
        return None;
    }
    let email = &text[start..end];
    Some((start, end, format!("mailto:{email}")))
}

/// The address part after a `mailto:` or `xmpp:` scheme, with an optional
/// `/resource` for xmpp.
fn scan_mail_tail(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() && is_email_user_byte_ext(bytes[i]) {
        i += 1;
    }
    if i == start || bytes.get(i) != Some(&b'@') {
        return None;
    }
    let domain_start = i + 1;
    i = domain_start;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b'_' | b'.'))
    {
        i += 1;
    }
    while i > domain_start && bytes[i - 1] == b'.' {
        i -= 1;
    }
    if i == domain_start || matches!(bytes[i - 1], b'-' | b'_') {
        return None;
    }
    if i < bytes.len() && bytes[i] == b'/' {
        i += 1;
        while i < bytes.len()
            && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'.' | b'-' | b'_' | b'@'))
        {
            i += 1;
        }
    }
    Some(i)
}

#[inline(always)]
fn is_email_user_byte_ext(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b)
}
