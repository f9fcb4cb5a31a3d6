//! HTML escaping utilities.
//!
//! Fast-path optimized: scans for the first escapable character with a
//! lookup table, bulk-copying clean segments between escapes.

/// Characters escaped in rendered code block content.
///
/// Code leaves are never inline-parsed, so everything that could be read
/// as markup or break out of the `<pre>` wrapper is entity-encoded.
const CODE_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table[b'\'' as usize] = true;
    table[b'(' as usize] = true;
    table[b')' as usize] = true;
    table
};

/// Characters escaped in HTML attribute values (href, title).
const ATTR_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Minimal set for code span and autolink text (`< > &`). Plain text
/// outside these lets `&` through so user-written entities survive.
const SPAN_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table
};

#[inline]
fn entity_for(b: u8) -> &'static str {
    match b {
        b'<' => "&lt;",
        b'>' => "&gt;",
        b'&' => "&amp;",
        b'"' => "&quot;",
        b'\'' => "&apos;",
        b'(' => "&lpar;",
        b')' => "&rpar;",
        _ => "",
    }
}

#[inline]
fn escape_with_table(out: &mut String, input: &str, table: &[bool; 256]) {
    let bytes = input.as_bytes();
    let mut pos = 0;
    let mut start = 0;
    while pos < bytes.len() {
        if table[bytes[pos] as usize] {
            out.push_str(&input[start..pos]);
            out.push_str(entity_for(bytes[pos]));
            start = pos + 1;
        }
        pos += 1;
    }
    out.push_str(&input[start..]);
}

/// Escape rendered code block content (fixed set `< > & ' " ( )`).
pub fn escape_code_into(out: &mut String, input: &str) {
    escape_with_table(out, input, &CODE_ESCAPE_TABLE);
}

/// Escape an HTML attribute value.
pub fn escape_attr_into(out: &mut String, input: &str) {
    escape_with_table(out, input, &ATTR_ESCAPE_TABLE);
}

/// Escape code span content (`< > &` only).
pub fn escape_span_into(out: &mut String, input: &str) {
    escape_with_table(out, input, &SPAN_ESCAPE_TABLE);
}

/// Convenience wrapper returning a new string.
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    escape_attr_into(&mut out, input);
    out
}

/// The HTML-safe form of a backslash-escaped punctuation character.
///
/// Characters with entity forms come back encoded; any other recognized
/// punctuation comes back as itself (escaping just strips the backslash).
pub fn escaped_form(ch: char) -> Option<&'static str> {
    Some(match ch {
        '<' => "&lt;",
        '>' => "&gt;",
        '\'' => "&apos;",
        '"' => "&quot;",
        '(' => "&lpar;",
        ')' => "&rpar;",
        _ => return None,
    })
}

/// Punctuation recognized by backslash escapes and flanking checks.
pub const PUNCTUATION: &str = "<>;,.()[]{}!`~+-*&^%$#@\\/\"':?|_=";

#[inline]
pub fn is_punctuation(ch: char) -> bool {
    PUNCTUATION.contains(ch)
}
