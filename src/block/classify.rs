//! Line classifier.
//!
//! Decides, from a line's leading marker, which block construct the line
//! signals. The classifier is context-free apart from the dangerous-tag
//! denylist; indentation-relative reclassification (the >3 column rule)
//! is applied by the builder.

use crate::block::html_block;
use crate::limits;

/// What a line's leading marker signals.
#[derive(Clone, Debug, PartialEq)]
pub enum Construct {
    Blockquote,
    Heading {
        level: u8,
    },
    FenceOpen {
        fence_char: u8,
        fence_len: usize,
        info: String,
    },
    ThematicBreak,
    HtmlOpen {
        kind: u8,
    },
    ListItem {
        ordered: bool,
        marker: u8,
        /// Literal numeral of an ordered marker, empty for bullets.
        start: String,
        /// Marker length plus following-space width (capped).
        width: usize,
    },
    Text,
}

/// A classified line: the construct and the column of its marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub construct: Construct,
    pub marker_col: usize,
}

/// Expand leading tabs to spaces, 4 columns per tab.
///
/// Interior tabs are expanded too; column arithmetic downstream assumes
/// space-only indentation.
pub fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + 8);
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = 4 - (col % 4);
            for _ in 0..pad {
                out.push(' ');
            }
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

#[inline]
pub fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

#[inline]
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

/// Classify one (tab-expanded) line. First match wins.
pub fn classify(line: &str, dangerous_tags: &[String]) -> Classification {
    let ws = leading_spaces(line);
    let rest = &line[ws..];

    if rest.starts_with('>') && ws <= 3 {
        return Classification {
            construct: Construct::Blockquote,
            marker_col: ws,
        };
    }
    if ws <= 3 {
        if let Some(level) = atx_heading_level(rest) {
            return Classification {
                construct: Construct::Heading { level },
                marker_col: ws,
            };
        }
        if let Some((fence_char, fence_len, info)) = fence_open(rest) {
            return Classification {
                construct: Construct::FenceOpen {
                    fence_char,
                    fence_len,
                    info,
                },
                marker_col: ws,
            };
        }
        if is_thematic_break(rest) {
            return Classification {
                construct: Construct::ThematicBreak,
                marker_col: ws,
            };
        }
        if rest.starts_with('<') {
            if let Some(kind) = html_block::opener_kind(rest, dangerous_tags) {
                return Classification {
                    construct: Construct::HtmlOpen { kind },
                    marker_col: ws,
                };
            }
        }
        if let Some((ordered, marker, start, width)) = list_marker(rest) {
            return Classification {
                construct: Construct::ListItem {
                    ordered,
                    marker,
                    start,
                    width,
                },
                marker_col: ws,
            };
        }
    }
    Classification {
        construct: Construct::Text,
        marker_col: ws,
    }
}

/// `#{1,6}` followed by whitespace or end of line. Seven or more `#`
/// degrade the line to plain text.
fn atx_heading_level(rest: &str) -> Option<u8> {
    let hashes = rest.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match rest.as_bytes().get(hashes) {
        None | Some(b' ') | Some(b'\t') => Some(hashes as u8),
        _ => None,
    }
}

/// Three or more backticks with no backtick in the trailing info string.
fn fence_open(rest: &str) -> Option<(u8, usize, String)> {
    let ticks = rest.bytes().take_while(|&b| b == b'`').count();
    if ticks < 3 {
        return None;
    }
    let info = rest[ticks..].trim();
    if info.contains('`') {
        return None;
    }
    Some((b'`', ticks, info.to_string()))
}

/// A line made solely of one of `* - _` (optionally space-separated),
/// with the marker character appearing at least three times.
pub fn is_thematic_break(rest: &str) -> bool {
    let mut marker = 0u8;
    let mut count = 0usize;
    for &b in rest.as_bytes() {
        match b {
            b' ' | b'\t' => continue,
            b'*' | b'-' | b'_' => {
                if marker == 0 {
                    marker = b;
                } else if b != marker {
                    return false;
                }
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}

/// `- + *` or `\d{1,9}[.)]` followed by whitespace or end of line.
///
/// Width is the marker length plus the following-space width; interior
/// spacing of 4 or more is truncated to a single space so the overflow
/// becomes ordinary indentation inside the item.
fn list_marker(rest: &str) -> Option<(bool, u8, String, usize)> {
    let bytes = rest.as_bytes();
    let (ordered, marker, start, marker_len) = if matches!(bytes.first(), Some(b'-' | b'+' | b'*'))
    {
        (false, bytes[0], String::new(), 1)
    } else {
        let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 || digits > limits::MAX_LIST_MARKER_DIGITS {
            return None;
        }
        let delim = *bytes.get(digits)?;
        if delim != b'.' && delim != b')' {
            return None;
        }
        (true, delim, rest[..digits].to_string(), digits + 1)
    };

    let spaces = bytes[marker_len..]
        .iter()
        .take_while(|&&b| b == b' ')
        .count();
    if spaces == 0 && marker_len < bytes.len() {
        return None; // marker must be followed by whitespace or end of line
    }
    let width = if spaces >= 4 || spaces == 0 {
        marker_len + 1
    } else {
        marker_len + spaces
    };
    Some((ordered, marker, start, width))
}
