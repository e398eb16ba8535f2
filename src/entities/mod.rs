mod data;

use data::ENTITIES;

/// Look up a named character reference (without `&` and `;`).
/// Returns the one or two codepoints it expands to.
#[inline]
pub(crate) fn lookup_entity(name: &str) -> Option<(u32, u32)> {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return None;
    }

    // Fast path for the names that dominate real documents.
    match (bytes[0], bytes.len()) {
        (b'a', 3) if bytes == b"amp" => return Some((0x26, 0)),
        (b'l', 2) if bytes[1] == b't' => return Some((0x3C, 0)),
        (b'g', 2) if bytes[1] == b't' => return Some((0x3E, 0)),
        (b'q', 4) if bytes == b"quot" => return Some((0x22, 0)),
        (b'n', 4) if bytes == b"nbsp" => return Some((0xA0, 0)),
        (b'c', 4) if bytes == b"copy" => return Some((0xA9, 0)),
        _ => {}
    }

    match ENTITIES.binary_search_by(|(n, _, _)| n.cmp(&name)) {
        Ok(i) => Some((ENTITIES[i].1, ENTITIES[i].2)),
        Err(_) => None,
    }
}

/// Append the expansion of a named reference to `out`, reporting success.
#[inline]
pub(crate) fn lookup_entity_into(name: &str, out: &mut String) -> bool {
    match lookup_entity(name) {
        Some((cp1, cp2)) => {
            push_codepoints(out, cp1, cp2);
            true
        }
        None => false,
    }
}

#[inline]
fn push_codepoints(out: &mut String, cp1: u32, cp2: u32) {
    if let Some(c) = char::from_u32(cp1) {
        out.push(c);
    }
    if cp2 != 0 {
        if let Some(c) = char::from_u32(cp2) {
            out.push(c);
        }
    }
}

/// Append the expansion of a numeric reference (`value` is the digit string
/// after `#` or `#x`). NUL and out-of-range values become U+FFFD.
pub(crate) fn resolve_numeric_ref_into(value: &str, hex: bool, out: &mut String) -> bool {
    let cp = if hex {
        u32::from_str_radix(value, 16)
    } else {
        value.parse::<u32>()
    };
    let cp = match cp {
        Ok(v) => v,
        Err(_) => return false,
    };
    let cp = if cp == 0 { 0xFFFD } else { cp };
    out.push(char::from_u32(cp).unwrap_or('\u{FFFD}'));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        for w in ENTITIES.windows(2) {
            assert!(w[0].0 < w[1].0, "{} >= {}", w[0].0, w[1].0);
        }
    }

    #[test]
    fn known_entities_resolve() {
        assert_eq!(lookup_entity("amp"), Some((0x26, 0)));
        assert_eq!(lookup_entity("AMP"), Some((0x26, 0)));
        assert_eq!(lookup_entity("ouml"), Some((0xF6, 0)));
        assert_eq!(lookup_entity("hellip"), Some((0x2026, 0)));
        assert_eq!(lookup_entity("fjlig"), Some((0x66, 0x6A)));
        assert_eq!(lookup_entity("bogus"), None);
    }

    #[test]
    fn numeric_refs() {
        let mut out = String::new();
        assert!(resolve_numeric_ref_into("228", false, &mut out));
        assert_eq!(out, "ä");
        out.clear();
        assert!(resolve_numeric_ref_into("E4", true, &mut out));
        assert_eq!(out, "ä");
        out.clear();
        assert!(resolve_numeric_ref_into("0", false, &mut out));
        assert_eq!(out, "\u{FFFD}");
        out.clear();
        assert!(resolve_numeric_ref_into("110000", true, &mut out));
        assert_eq!(out, "\u{FFFD}");
    }
}
