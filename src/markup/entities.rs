//! Character references in markup text.
//!
//! Decoding is deliberately narrow: the handful of named entities a content
//! surface produces, plus well-formed numeric references. Anything else is
//! passed through untouched.

const NAMED: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
    ("&nbsp;", '\u{a0}'),
];

// 0x10FFFF and 1114111
const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

/// Decode character references in `s`.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        if let Some((decoded, consumed)) = decode_one(rest) {
            out.push(decoded);
            rest = &rest[consumed..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Decode a single reference at the start of `s`, returning the character
/// and the number of bytes it occupied.
fn decode_one(s: &str) -> Option<(char, usize)> {
    for (name, ch) in NAMED {
        if s.starts_with(name) {
            return Some((*ch, name.len()));
        }
    }

    let body = s.strip_prefix("&#")?;
    let (digits_start, radix, max_digits) = match body.as_bytes().first() {
        Some(b'x') | Some(b'X') => (1, 16, MAX_HEX_DIGITS),
        _ => (0, 10, MAX_DEC_DIGITS),
    };
    let digits = &body[digits_start..];
    let end = digits.find(';')?;
    if end == 0 || end > max_digits {
        return None;
    }
    let value = u32::from_str_radix(&digits[..end], radix).ok()?;
    let ch = char::from_u32(value)?;
    Some((ch, 2 + digits_start + end + 1))
}

/// Escape text content for serialization.
pub fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape a double-quoted attribute value for serialization.
pub fn escape_attribute(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
