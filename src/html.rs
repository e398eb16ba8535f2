//! HTML escaping helpers shared by the renderers.

/// Escape `&`, `<`, `>`, and `"` into `out`.
#[inline]
pub(crate) fn escape_html_into(out: &mut String, input: &str) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut last = 0;

    while last < len {
        match memchr::memchr3(b'&', b'<', b'>', &bytes[last..]) {
            Some(offset) => {
                let i = last + offset;
                if let Some(q_off) = memchr::memchr(b'"', &bytes[last..i]) {
                    let q = last + q_off;
                    out.push_str(&input[last..q]);
                    out.push_str("&quot;");
                    last = q + 1;
                    continue;
                }
                out.push_str(&input[last..i]);
                out.push_str(match bytes[i] {
                    b'&' => "&amp;",
                    b'<' => "&lt;",
                    _ => "&gt;",
                });
                last = i + 1;
            }
            None => match memchr::memchr(b'"', &bytes[last..]) {
                Some(q_off) => {
                    let q = last + q_off;
                    out.push_str(&input[last..q]);
                    out.push_str("&quot;");
                    last = q + 1;
                }
                None => {
                    out.push_str(&input[last..]);
                    return;
                }
            },
        }
    }
}

static HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Bytes that are percent-escaped in link destinations. Everything at or
/// above 0x80 is escaped as well, one byte at a time.
static URL_PERCENT: [bool; 128] = {
    let mut t = [false; 128];
    t[b' ' as usize] = true;
    t[b'"' as usize] = true;
    t[b'\\' as usize] = true;
    t[b'`' as usize] = true;
    t[b'[' as usize] = true;
    t[b']' as usize] = true;
    t
};

/// Write a link destination: percent-escape the unsafe byte set, then
/// entity-escape `&`, `<`, and `>` for attribute context. Existing percent
/// signs pass through untouched.
pub(crate) fn encode_link_url_into(out: &mut String, url: &str) {
    let bytes = url.as_bytes();
    let mut last = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let repl: &str = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ if b < 0x80 && !URL_PERCENT[b as usize] => continue,
            _ => "",
        };
        out.push_str(&url[last..i]);
        if repl.is_empty() {
            let enc: [u8; 3] = [
                b'%',
                HEX_CHARS[(b >> 4) as usize],
                HEX_CHARS[(b & 0xF) as usize],
            ];
            out.push_str(std::str::from_utf8(&enc).unwrap_or(""));
        } else {
            out.push_str(repl);
        }
        last = i + 1;
    }
    out.push_str(&url[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_html(s: &str) -> String {
        let mut out = String::new();
        escape_html_into(&mut out, s);
        out
    }

    fn encode_url(s: &str) -> String {
        let mut out = String::new();
        encode_link_url_into(&mut out, s);
        out
    }

    #[test]
    fn escapes_all_html_specials() {
        assert_eq!(escape_html("<>&\"'"), "&lt;&gt;&amp;&quot;'");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(escape_html("hello world"), "hello world");
    }

    #[test]
    fn url_percent_set() {
        assert_eq!(encode_url("a b"), "a%20b");
        assert_eq!(encode_url("a\"b`c"), "a%22b%60c");
        assert_eq!(encode_url("x[1]\\y"), "x%5B1%5D%5Cy");
        assert_eq!(encode_url("q?x=1&y=2"), "q?x=1&amp;y=2");
        // Tildes, parens, and existing escapes pass through.
        assert_eq!(encode_url("/~u/(v)%20w"), "/~u/(v)%20w");
    }

    #[test]
    fn url_high_bytes_escaped() {
        assert_eq!(encode_url("café"), "caf%C3%A9");
    }
}
