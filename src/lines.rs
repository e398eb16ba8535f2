//! Logical line scanning.
//!
//! The scanner splits the input into lines, remembering which end-of-line
//! marker terminated each one and replacing any embedded NUL with U+FFFD
//! before the block layer sees it. Tabs are kept verbatim; the block layer
//! expands them at 4-column stops while consuming indentation.

use std::borrow::Cow;

/// The end-of-line marker of a logical line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Eol {
    Lf,
    Cr,
    CrLf,
    /// Final line with no trailing newline.
    Eof,
}

#[derive(Clone, Debug)]
pub(crate) struct RawLine<'a> {
    pub text: Cow<'a, str>,
    #[allow(dead_code)] // recorded for renderers that care about EOL fidelity
    pub eol: Eol,
}

/// Split `input` into logical lines. `\n`, `\r`, and `\r\n` all terminate a
/// line. Sets `*corner` when a NUL had to be replaced.
pub(crate) fn logical_lines<'a>(input: &'a str, corner: &mut bool) -> Vec<RawLine<'a>> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        let (end, eol, next) = match memchr::memchr2(b'\n', b'\r', &bytes[start..]) {
            Some(off) => {
                let i = start + off;
                if bytes[i] == b'\r' {
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        (i, Eol::CrLf, i + 2)
                    } else {
                        (i, Eol::Cr, i + 1)
                    }
                } else {
                    (i, Eol::Lf, i + 1)
                }
            }
            None => (bytes.len(), Eol::Eof, bytes.len()),
        };
        out.push(RawLine {
            text: replace_nul(&input[start..end], corner),
            eol,
        });
        start = next;
    }
    out
}

fn replace_nul<'a>(text: &'a str, corner: &mut bool) -> Cow<'a, str> {
    if memchr::memchr(0, text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    *corner = true;
    Cow::Owned(text.replace('\0', "\u{FFFD}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        let mut corner = false;
        logical_lines(input, &mut corner)
            .into_iter()
            .map(|l| l.text.into_owned())
            .collect()
    }

    #[test]
    fn splits_mixed_line_endings() {
        assert_eq!(texts("a\nb\r\nc\rd"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn records_eol_markers() {
        let mut corner = false;
        let lines = logical_lines("a\nb", &mut corner);
        assert_eq!(lines[0].eol, Eol::Lf);
        assert_eq!(lines[1].eol, Eol::Eof);
    }

    #[test]
    fn replaces_nul_and_flags_corner() {
        let mut corner = false;
        let lines = logical_lines("a\0b\n", &mut corner);
        assert!(corner);
        assert_eq!(lines[0].text, "a\u{FFFD}b");
    }
}
