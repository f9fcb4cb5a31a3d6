//! Inline raw-HTML recognition: tags, autolinks, comments.
//!
//! Tags are validated against a strict grammar (tag name, alternating
//! attribute names and optional quoted or bare values, `>` or `/>`),
//! so stray angle brackets fall back to entity escaping instead of
//! leaking markup into the output.

use crate::limits;

/// Scan a full open or closing tag starting at `chars[start] == '<'`.
/// Returns the index of the closing `>`. Tags whose name is on the
/// denylist are rejected.
pub fn scan_tag(chars: &[char], start: usize, dangerous_tags: &[String]) -> Option<usize> {
    let mut i = start + 1;
    let closing = chars.get(i) == Some(&'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    if !chars.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
        i += 1;
    }
    let name: String = chars[name_start..i].iter().collect::<String>().to_ascii_lowercase();
    if dangerous_tags.iter().any(|t| t.eq_ignore_ascii_case(&name)) {
        return None;
    }

    if closing {
        // Closing tags allow only trailing whitespace before `>`.
        while chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        return (chars.get(i) == Some(&'>')).then_some(i);
    }

    // Attribute list.
    loop {
        let had_ws = chars.get(i).is_some_and(|c| c.is_whitespace());
        while chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        match chars.get(i) {
            Some(&'>') => return Some(i),
            Some(&'/') => {
                return (chars.get(i + 1) == Some(&'>')).then_some(i + 1);
            }
            Some(&c) if had_ws && is_attr_name_char(c) => {
                while chars.get(i).is_some_and(|&c| is_attr_name_char(c)) {
                    i += 1;
                }
                // Optional value.
                let mut j = i;
                while chars.get(j).is_some_and(|c| c.is_whitespace()) {
                    j += 1;
                }
                if chars.get(j) == Some(&'=') {
                    j += 1;
                    while chars.get(j).is_some_and(|c| c.is_whitespace()) {
                        j += 1;
                    }
                    i = scan_attr_value(chars, j)?;
                }
            }
            _ => return None,
        }
    }
}

#[inline]
fn is_attr_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '"' | '\'' | '<' | '>' | '=' | '/' | '`')
}

/// Scan a quoted or bare attribute value; returns the index just past it.
fn scan_attr_value(chars: &[char], start: usize) -> Option<usize> {
    match chars.get(start)? {
        &quote @ ('"' | '\'') => {
            let mut i = start + 1;
            while i < chars.len() {
                if chars[i] == quote {
                    return (i > start + 1).then_some(i + 1);
                }
                i += 1;
            }
            None
        }
        _ => {
            let mut i = start;
            while chars
                .get(i)
                .is_some_and(|&c| !c.is_whitespace() && !matches!(c, '"' | '\'' | '<' | '>' | '=' | '`'))
            {
                i += 1;
            }
            (i > start).then_some(i)
        }
    }
}

/// `<scheme:target>` where scheme is an ASCII letter followed by up to
/// 32 letters, digits, `+`, `.`, or `-`. Returns the URL and the index
/// of the closing `>`.
pub fn scan_autolink(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start + 1;
    if !chars.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    let scheme_start = i;
    i += 1;
    while chars
        .get(i)
        .is_some_and(|&c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-' | '_'))
    {
        i += 1;
    }
    let scheme_len = i - scheme_start;
    if !(2..=limits::MAX_AUTOLINK_SCHEME_LEN).contains(&scheme_len) {
        return None;
    }
    if chars.get(i) != Some(&':') {
        return None;
    }
    i += 1;
    while chars
        .get(i)
        .is_some_and(|&c| !c.is_whitespace() && c != '<' && c != '>')
    {
        i += 1;
    }
    if chars.get(i) != Some(&'>') {
        return None;
    }
    let url: String = chars[start + 1..i].iter().collect();
    Some((url, i))
}

/// `<!--` ... `-->`, where the opener is not immediately followed by
/// `>` or `->`. Returns the index of the final `>`.
pub fn scan_comment(chars: &[char], start: usize) -> Option<usize> {
    let opener = ['<', '!', '-', '-'];
    if chars.len() < start + 4 || chars[start..start + 4] != opener {
        return None;
    }
    let body = start + 4;
    if chars.get(body) == Some(&'>') {
        return None;
    }
    if chars.get(body) == Some(&'-') && chars.get(body + 1) == Some(&'>') {
        return None;
    }
    let mut i = body;
    while i + 2 < chars.len() {
        if chars.get(i) == Some(&'-') && chars.get(i + 1) == Some(&'-') && chars.get(i + 2) == Some(&'>')
        {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}
