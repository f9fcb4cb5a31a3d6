//! Raw HTML block recognition.
//!
//! Start and end conditions are numbered 1 through 7:
//!   1 `<!--` comment            ends when a line contains `-->`
//!   2 `<?` processing instr.    ends when a line contains `?>`
//!   3 `<![CDATA[` section       ends when a line contains `]]>`
//!   4 `<!` declaration          ends when a line contains `>`
//!   5 raw-text element          ends when a line contains the end tag
//!   6 known block-level tag     ends at the next blank line
//!   7 any other valid tag       ends at the next blank line
//!
//! Tags on the dangerous denylist never open a block here; the inline
//! scanner entity-escapes them instead.

use crate::inline::html;
use memchr::memmem;

/// Elements whose content is raw text (no nested markup). Their block
/// runs until the matching end tag rather than the next blank line.
const RAW_TEXT_TAGS: [&str; 3] = ["pre", "script", "style"];

/// Block-level tag names that open a type 6 block.
const BLOCK_TAGS: [&str; 40] = [
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
];

const MORE_BLOCK_TAGS: [&str; 4] = ["thead", "tr", "ul", "legend"];

/// Tag name starting at `rest` (which begins after `<` or `</`),
/// lowercased. Names are an ASCII letter followed by letters, digits, or
/// hyphens.
fn tag_name(rest: &str) -> Option<String> {
    let bytes = rest.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
        .count();
    Some(rest[..len].to_ascii_lowercase())
}

fn is_block_tag(name: &str) -> bool {
    BLOCK_TAGS.contains(&name) || MORE_BLOCK_TAGS.contains(&name)
}

fn is_raw_text_tag(name: &str) -> bool {
    RAW_TEXT_TAGS.contains(&name)
}

/// Whether the tag-name boundary in `rest` is valid: whitespace, `>`,
/// `/>`, or end of line.
fn valid_boundary(rest: &str) -> bool {
    match rest.as_bytes().first() {
        None => true,
        Some(b' ' | b'\t' | b'>') => true,
        Some(b'/') => rest.as_bytes().get(1) == Some(&b'>'),
        _ => false,
    }
}

/// Classify a line starting with `<` as an HTML block opener.
///
/// Returns the numbered block kind, or `None` when the line is not a
/// recognized opener (including openers suppressed by the denylist).
pub fn opener_kind(line: &str, dangerous_tags: &[String]) -> Option<u8> {
    debug_assert!(line.starts_with('<'));
    let after = &line[1..];

    if after.starts_with("!--") {
        return Some(1);
    }
    if after.starts_with('?') {
        return Some(2);
    }
    if after.starts_with("![CDATA[") {
        return Some(3);
    }
    if after.starts_with('!') && after.as_bytes().get(1).is_some_and(u8::is_ascii_alphabetic) {
        return Some(4);
    }

    let closing = after.starts_with('/');
    let name = tag_name(if closing { &after[1..] } else { after })?;
    if dangerous_tags.iter().any(|t| t.eq_ignore_ascii_case(&name)) {
        return None;
    }
    let rest = if closing {
        &after[1 + name.len()..]
    } else {
        &after[name.len()..]
    };
    if !valid_boundary(rest) {
        return None;
    }
    if !closing && is_raw_text_tag(&name) {
        return Some(5);
    }
    if is_block_tag(&name) {
        return Some(6);
    }
    // Any other tag opens a block only when a complete tag stands alone
    // on the line; trailing content keeps the line a paragraph.
    let chars: Vec<char> = line.chars().collect();
    let end = html::scan_tag(&chars, 0, dangerous_tags)?;
    chars[end + 1..]
        .iter()
        .all(|c| c.is_whitespace())
        .then_some(7)
}

/// Whether `line` satisfies the end condition of block kind 1-5.
///
/// Kind 5 matches any raw-text end tag rather than remembering the
/// opening tag name; mixed `<pre>`...`</script>` inputs are malformed
/// HTML either way. Kinds 6 and 7 end at blank lines, handled by the
/// caller.
pub fn ends_block(kind: u8, line: &str) -> bool {
    match kind {
        1 => memmem::find(line.as_bytes(), b"-->").is_some(),
        2 => memmem::find(line.as_bytes(), b"?>").is_some(),
        3 => memmem::find(line.as_bytes(), b"]]>").is_some(),
        4 => memchr::memchr(b'>', line.as_bytes()).is_some(),
        5 => {
            let lower = line.to_ascii_lowercase();
            RAW_TEXT_TAGS
                .iter()
                .any(|t| memmem::find(lower.as_bytes(), format!("</{t}>").as_bytes()).is_some())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(line: &str) -> Option<u8> {
        opener_kind(line, &[])
    }

    #[test]
    fn recognizes_special_openers() {
        assert_eq!(kind("<!-- note"), Some(1));
        assert_eq!(kind("<?php echo"), Some(2));
        assert_eq!(kind("<![CDATA[x"), Some(3));
        assert_eq!(kind("<!DOCTYPE html>"), Some(4));
    }

    #[test]
    fn recognizes_tag_openers() {
        assert_eq!(kind("<pre>"), Some(5));
        assert_eq!(kind("<div class=\"x\">"), Some(6));
        assert_eq!(kind("<table>"), Some(6));
        assert_eq!(kind("</div>"), Some(6));
        assert_eq!(kind("<custom-widget>"), Some(7));
        assert_eq!(kind("<span>"), Some(7));
    }

    #[test]
    fn rejects_invalid_openers() {
        assert_eq!(kind("<3 hearts"), None);
        assert_eq!(kind("<div~>"), None);
        assert_eq!(kind("<"), None);
    }

    #[test]
    fn plain_tag_must_stand_alone() {
        assert_eq!(kind("<span>hello</span> world"), None);
        assert_eq!(kind("<custom-widget> trailing"), None);
        assert_eq!(kind("<open"), None);
        assert_eq!(kind("<span class=\"x\">  "), Some(7));
        assert_eq!(kind("</custom-widget>"), Some(7));
    }

    #[test]
    fn denylist_suppresses_openers() {
        let deny = vec!["script".to_string(), "style".to_string()];
        assert_eq!(opener_kind("<script>", &deny), None);
        assert_eq!(opener_kind("<Style>", &deny), None);
        assert_eq!(opener_kind("<pre>", &deny), Some(5));
    }

    #[test]
    fn closing_raw_text_tag_is_not_kind_5() {
        // `</pre>` alone starts a plain tag block, not a raw-text one.
        assert_eq!(kind("</pre>"), Some(7));
    }

    #[test]
    fn end_conditions() {
        assert!(ends_block(1, "done --> trailing"));
        assert!(!ends_block(1, "still going"));
        assert!(ends_block(2, "x ?>"));
        assert!(ends_block(3, "]]>"));
        assert!(ends_block(4, ">"));
        assert!(ends_block(5, "text</PRE>"));
        assert!(!ends_block(5, "<pre>"));
        assert!(!ends_block(6, "anything"));
    }
}
