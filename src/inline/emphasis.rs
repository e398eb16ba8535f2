//! Phase 2: emphasis resolution over the phase-1 stack.
//!
//! Openers wait on sixteen logical stacks keyed by delimiter kind — `~` by
//! run parity, `'`, `"`, and `*`/`_` each split six ways by the opener's
//! `(can_close, n mod 3)` so a closer consults at most the topmost viable
//! opener per stack.

use super::{EmphPart, Part};
use crate::ast::{Inline, Span};

struct OpenerRef {
    idx: usize,
    // Fingerprint of the opener, so stale entries left behind by a
    // resolved pair are recognized and discarded.
    n: usize,
    can_close: bool,
}

fn stack_index(marker: u8, can_close: bool, n: usize) -> usize {
    match marker {
        b'~' => n % 2,
        b'\'' => 2,
        b'"' => 3,
        b'*' => 4 + 3 * usize::from(can_close) + n % 3,
        _ => 10 + 3 * usize::from(can_close) + n % 3,
    }
}

fn candidate_stacks(marker: u8) -> &'static [usize] {
    match marker {
        b'~' => &[0, 1],
        b'\'' => &[2],
        b'"' => &[3],
        b'*' => &[4, 5, 6, 7, 8, 9],
        _ => &[10, 11, 12, 13, 14, 15],
    }
}

/// Resolve delimiter runs into emphasis nodes, demote unused brackets and
/// delimiters to plain text, and merge adjacent plain nodes.
pub(super) fn resolve(src: Vec<Part>) -> Vec<Inline> {
    let mut dst: Vec<Part> = Vec::with_capacity(src.len());
    let mut stacks: [Vec<OpenerRef>; 16] = Default::default();

    for part in src {
        let mut e = match part {
            Part::Emph(e) => e,
            done => {
                dst.push(demote(done));
                continue;
            }
        };

        if e.can_close {
            while e.len > 0 {
                let Some(oi) = find_opener(&mut stacks, &dst, &e) else {
                    break;
                };
                match_pair(&mut dst, oi, &mut e);
            }
        }
        if e.len > 0 {
            if e.can_open {
                let si = stack_index(e.marker, e.can_close, e.n);
                stacks[si].push(OpenerRef {
                    idx: dst.len(),
                    n: e.n,
                    can_close: e.can_close,
                });
                dst.push(Part::Emph(e));
            } else {
                dst.push(Part::Done(leftover_inline(&e)));
            }
        }
    }

    finish(dst)
}

/// Topmost viable opener for `e` across its candidate stacks, pruning stale
/// entries along the way.
fn find_opener(stacks: &mut [Vec<OpenerRef>; 16], dst: &[Part], e: &EmphPart) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &si in candidate_stacks(e.marker) {
        loop {
            let Some(top) = stacks[si].last() else { break };
            let live = top.idx < dst.len()
                && matches!(
                    &dst[top.idx],
                    Part::Emph(o)
                        if o.len > 0
                            && o.marker == e.marker
                            && o.n == top.n
                            && o.can_close == top.can_close
                );
            if live {
                break;
            }
            stacks[si].pop();
        }
        let Some(top) = stacks[si].last() else { continue };
        if matches!(e.marker, b'*' | b'_') {
            // Rule of three: when either end could both open and close, the
            // combined length must not be a multiple of three unless both
            // lengths are.
            if (top.can_close || e.can_open)
                && (top.n + e.n) % 3 == 0
                && !(top.n % 3 == 0 && e.n % 3 == 0)
            {
                continue;
            }
        }
        if best.map_or(true, |b| top.idx > b) {
            best = Some(top.idx);
        }
    }
    best
}

fn match_pair(dst: &mut Vec<Part>, oi: usize, e: &mut EmphPart) {
    if matches!(e.marker, b'\'' | b'"') {
        // Smart quotes pair in place without wrapping their content.
        let (open, close) = if e.marker == b'\'' {
            ("‘", "’")
        } else {
            ("“", "”")
        };
        dst[oi] = Part::Done(Inline::Plain(open.to_string()));
        dst.push(Part::Done(Inline::Plain(close.to_string())));
        e.len = 0;
        return;
    }

    let d = {
        let Part::Emph(o) = &dst[oi] else {
            unreachable!("find_opener returns live openers")
        };
        if o.len >= 2 && e.len >= 2 {
            2
        } else {
            1
        }
    };
    let inner = finish(dst.split_off(oi + 1));
    let node = match e.marker {
        b'~' => Inline::Del(Span {
            marker: b'~',
            inner,
        }),
        m if d == 2 => Inline::Strong(Span { marker: m, inner }),
        m => Inline::Emph(Span { marker: m, inner }),
    };
    {
        let Part::Emph(o) = &mut dst[oi] else {
            unreachable!()
        };
        o.len -= d;
        if o.len == 0 {
            dst[oi] = Part::Done(Inline::Plain(String::new()));
        }
    }
    e.len -= d;
    dst.push(Part::Done(node));
}

fn demote(part: Part) -> Part {
    match part {
        Part::Open { image, .. } => Part::Done(Inline::Plain(
            if image { "![" } else { "[" }.to_string(),
        )),
        other => other,
    }
}

fn leftover_inline(e: &EmphPart) -> Inline {
    Inline::Plain(match e.marker {
        // Unmatched smart quotes come out right-curly.
        b'\'' => "’".to_string(),
        b'"' => "”".to_string(),
        m => String::from_utf8(vec![m; e.len]).unwrap(),
    })
}

fn finish(parts: Vec<Part>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(parts.len());
    for part in parts {
        let inline = match part {
            Part::Done(x) => x,
            Part::Open { image, .. } => {
                Inline::Plain(if image { "![" } else { "[" }.to_string())
            }
            Part::Emph(e) => leftover_inline(&e),
        };
        push_merged(&mut out, inline);
    }
    out
}

fn push_merged(out: &mut Vec<Inline>, inline: Inline) {
    match inline {
        Inline::Plain(s) => {
            if s.is_empty() {
                return;
            }
            if let Some(Inline::Plain(prev)) = out.last_mut() {
                prev.push_str(&s);
                return;
            }
            out.push(Inline::Plain(s));
        }
        other => out.push(other),
    }
}
