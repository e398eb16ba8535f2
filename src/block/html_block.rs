//! The seven HTML-block recognition modes of CommonMark 0.31.2.

/// How an open HTML block ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum HtmlEnd {
    /// Mode 1: `<pre`/`<script`/`<style`/`<textarea`; ends when any of the
    /// matching close tags appears.
    PreTag,
    /// Mode 2: `<!--` … `-->`.
    Comment,
    /// Mode 3: `<?` … `?>`.
    ProcInst,
    /// Mode 4: `<!` + letter … `>`.
    Decl,
    /// Mode 5: `<![CDATA[` … `]]>`.
    Cdata,
    /// Modes 6 and 7: ends at the first blank line.
    Blank,
}

static BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "section", "source",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

fn starts_with_tag_ci(bytes: &[u8], tag: &[u8]) -> bool {
    if bytes.len() < 1 + tag.len() || bytes[0] != b'<' {
        return false;
    }
    for (i, &t) in tag.iter().enumerate() {
        if bytes[1 + i].to_ascii_lowercase() != t {
            return false;
        }
    }
    matches!(
        bytes.get(1 + tag.len()),
        None | Some(b' ') | Some(b'\t') | Some(b'>')
    )
}

/// Try to recognize the start of an HTML block on `line` (container prefixes
/// already consumed, leading spaces trimmed). Mode 7 is excluded inside a
/// paragraph. A lowercase mode-4 declaration is tolerated but flagged.
pub(super) fn parse_html_block_start(
    line: &str,
    in_paragraph: bool,
    corner: &mut bool,
) -> Option<HtmlEnd> {
    let bytes = line.as_bytes();
    if bytes.is_empty() || bytes[0] != b'<' {
        return None;
    }

    for tag in [b"pre".as_slice(), b"script", b"style", b"textarea"] {
        if starts_with_tag_ci(bytes, tag) {
            return Some(HtmlEnd::PreTag);
        }
    }

    if line.starts_with("<!--") {
        return Some(HtmlEnd::Comment);
    }
    if line.starts_with("<?") {
        return Some(HtmlEnd::ProcInst);
    }
    if line.starts_with("<![CDATA[") {
        return Some(HtmlEnd::Cdata);
    }
    if bytes.len() > 2 && bytes[1] == b'!' && bytes[2].is_ascii_alphabetic() {
        if bytes[2].is_ascii_lowercase() {
            *corner = true;
        }
        return Some(HtmlEnd::Decl);
    }

    if is_block_level_tag(line) {
        return Some(HtmlEnd::Blank);
    }

    if !in_paragraph && is_complete_tag_line(line) {
        return Some(HtmlEnd::Blank);
    }

    None
}

/// Mode 6: `<` or `</` followed by a known block-level tag name terminated
/// by space, tab, `>`, or `/>`.
fn is_block_level_tag(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'<' {
        return false;
    }
    let start = if bytes[1] == b'/' { 2 } else { 1 };
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
        end += 1;
    }
    if end == start || end - start > 10 {
        return false;
    }
    if let Some(&next) = bytes.get(end) {
        if !matches!(next, b' ' | b'\t' | b'>' | b'/') {
            return false;
        }
        if next == b'/' && bytes.get(end + 1) != Some(&b'>') {
            return false;
        }
    }
    let mut buf = [0u8; 10];
    let tag_len = end - start;
    for i in 0..tag_len {
        buf[i] = bytes[start + i].to_ascii_lowercase();
    }
    BLOCK_TAGS
        .binary_search_by(|t| t.as_bytes().cmp(&buf[..tag_len]))
        .is_ok()
}

/// Mode 7: a complete open or closing tag, alone on its line.
fn is_complete_tag_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'<' {
        return false;
    }

    let is_close = bytes[1] == b'/';
    let start = if is_close { 2 } else { 1 };
    let mut i = start;
    if i >= bytes.len() || !bytes[i].is_ascii_alphabetic() {
        return false;
    }
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }

    if is_close {
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'>' {
            return false;
        }
        i += 1;
    } else {
        loop {
            let had_space = {
                let before = i;
                while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
                    i += 1;
                }
                i > before
            };
            if i >= bytes.len() {
                return false;
            }
            if bytes[i] == b'>' {
                i += 1;
                break;
            }
            if bytes[i] == b'/' {
                i += 1;
                if i >= bytes.len() || bytes[i] != b'>' {
                    return false;
                }
                i += 1;
                break;
            }
            if !had_space {
                return false;
            }
            // Attribute name.
            if !bytes[i].is_ascii_alphabetic() && bytes[i] != b'_' && bytes[i] != b':' {
                return false;
            }
            while i < bytes.len()
                && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b':' | b'.' | b'-'))
            {
                i += 1;
            }
            // Optional value.
            let after_name = i;
            while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'=' {
                i += 1;
                while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
                    i += 1;
                }
                if i >= bytes.len() {
                    return false;
                }
                if bytes[i] == b'\'' || bytes[i] == b'"' {
                    let quote = bytes[i];
                    i += 1;
                    while i < bytes.len() && bytes[i] != quote {
                        i += 1;
                    }
                    if i >= bytes.len() {
                        return false;
                    }
                    i += 1;
                } else {
                    if matches!(bytes[i], b' ' | b'\t' | b'"' | b'\'' | b'=' | b'<' | b'>' | b'`') {
                        return false;
                    }
                    while i < bytes.len()
                        && !matches!(
                            bytes[i],
                            b' ' | b'\t' | b'"' | b'\'' | b'=' | b'<' | b'>' | b'`'
                        )
                    {
                        i += 1;
                    }
                }
            } else {
                i = after_name;
            }
        }
    }

    bytes[i..].iter().all(|&b| b == b' ' || b == b'\t')
}

fn contains_ci(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.len() > haystack.len() {
        return false;
    }
    'outer: for i in 0..=haystack.len() - needle.len() {
        for (j, &n) in needle.iter().enumerate() {
            if haystack[i + j].to_ascii_lowercase() != n {
                continue 'outer;
            }
        }
        return true;
    }
    false
}

/// Whether a close tag for mode 1 appears anywhere on the line.
fn has_pre_end(line: &str) -> bool {
    let bytes = line.as_bytes();
    for tag in ["</pre>", "</script>", "</style>", "</textarea>"] {
        if contains_ci(bytes, tag.as_bytes()) {
            return true;
        }
    }
    false
}

pub(super) fn html_block_ends(end: HtmlEnd, line: &str) -> bool {
    match end {
        HtmlEnd::PreTag => has_pre_end(line),
        HtmlEnd::Comment => line.contains("-->"),
        HtmlEnd::ProcInst => line.contains("?>"),
        HtmlEnd::Decl => line.contains('>'),
        HtmlEnd::Cdata => line.contains("]]>"),
        HtmlEnd::Blank => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tag_table_is_sorted() {
        for w in BLOCK_TAGS.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn recognizes_the_seven_modes() {
        let mut c = false;
        assert_eq!(
            parse_html_block_start("<pre>", false, &mut c),
            Some(HtmlEnd::PreTag)
        );
        assert_eq!(
            parse_html_block_start("<!-- x", false, &mut c),
            Some(HtmlEnd::Comment)
        );
        assert_eq!(
            parse_html_block_start("<?php", false, &mut c),
            Some(HtmlEnd::ProcInst)
        );
        assert_eq!(
            parse_html_block_start("<![CDATA[", false, &mut c),
            Some(HtmlEnd::Cdata)
        );
        assert_eq!(
            parse_html_block_start("<!DOCTYPE html>", false, &mut c),
            Some(HtmlEnd::Decl)
        );
        assert!(!c);
        assert_eq!(
            parse_html_block_start("<div class=x>", true, &mut c),
            Some(HtmlEnd::Blank)
        );
        assert_eq!(
            parse_html_block_start("<a href=\"x\">", false, &mut c),
            Some(HtmlEnd::Blank)
        );
        assert_eq!(parse_html_block_start("<a href=\"x\">", true, &mut c), None);
    }

    #[test]
    fn lowercase_declaration_sets_corner() {
        let mut c = false;
        assert_eq!(
            parse_html_block_start("<!doctype html>", false, &mut c),
            Some(HtmlEnd::Decl)
        );
        assert!(c);
    }

    #[test]
    fn mode1_close_is_case_insensitive() {
        assert!(html_block_ends(HtmlEnd::PreTag, "x</PRE>y"));
        assert!(!html_block_ends(HtmlEnd::PreTag, "</prex>"));
    }
}
