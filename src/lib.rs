//! treemark: Markdown to HTML through an explicit block tree.
//!
//! The pipeline builds a full tree of block nodes line by line, harvests
//! link reference definitions from finished paragraphs, then renders the
//! tree to indented HTML, running each textual leaf through the inline
//! pipeline (escapes and raw HTML, then links, then emphasis) exactly
//! once.
//!
//! # Design Principles
//! - Arena-backed trees and token lists: indices instead of pointer
//!   cycles, safe mutation mid-walk
//! - No regex: per-character scanners with explicit state
//! - Malformed input never errors: every invalid construct degrades to
//!   the next most permissive one
//! - Bounded resources: nesting and token caps keep pathological input
//!   linear

pub mod block;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod link_ref;
pub mod render;
pub mod table;

// Re-export primary types
pub use block::{BlockKind, BlockTree, NodeId, TreeBuilder};
pub use inline::{TokenKind, TokenList};
pub use link_ref::{LinkRefDef, LinkRefStore};

/// Parsing/rendering options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Tag names never recognized as block or inline HTML. Matched
    /// case-insensitively against both opening and closing tags.
    pub dangerous_html_tags: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dangerous_html_tags: [
                "script", "style", "title", "textarea", "iframe", "noembed", "noframes", "xmp",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Parse errors. Malformed Markdown is never an error; only inputs the
/// parser cannot read as text are.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input is not valid UTF-8")]
    MalformedInput(#[from] std::str::Utf8Error),
}

/// Convert Markdown to HTML.
///
/// This is the primary API for simple use cases.
///
/// # Example
/// ```
/// let html = treemark::to_html("# Hello\n\nWorld");
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains("<p>World</p>"));
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    let mut builder = TreeBuilder::new(options.dangerous_html_tags.clone());
    for line in input.lines() {
        builder.feed_line(line);
    }
    let mut tree = builder.finish();

    let mut refs = LinkRefStore::new();
    link_ref::collect(&mut tree, &mut refs);

    render::render(&tree, &refs, &options.dangerous_html_tags)
}

/// Convert raw bytes to HTML, validating UTF-8 first.
pub fn parse_bytes(input: &[u8], options: &Options) -> Result<String, Error> {
    let text = std::str::from_utf8(input)?;
    Ok(to_html_with_options(text, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(to_html("# h1"), "<h1>h1</h1>\n");
        assert_eq!(
            to_html("####### not a heading"),
            "<p>####### not a heading</p>\n"
        );
    }

    #[test]
    fn emphasis_family() {
        assert_eq!(
            to_html("*a* **b** ***c***"),
            "<p><em>a</em> <strong>b</strong> <em><strong>c</strong></em></p>\n"
        );
    }

    #[test]
    fn code_spans() {
        assert_eq!(to_html("`code`"), "<p><code>code</code></p>\n");
        assert_eq!(
            to_html("``code with `backtick` inside``"),
            "<p><code>code with `backtick` inside</code></p>\n"
        );
    }

    #[test]
    fn reference_link_and_consumed_definition() {
        assert_eq!(
            to_html("[foo]\n\n[foo]: /url \"t\""),
            "<p><a href=\"/url\" title=\"t\">foo</a></p>\n"
        );
    }

    #[test]
    fn thematic_break_interrupts_paragraph() {
        assert_eq!(to_html("para\n***"), "<p>para</p>\n<hr/>\n");
    }

    #[test]
    fn lazy_continuation_does_not_interrupt() {
        assert_eq!(to_html("> quote\nlazy"), "<blockquote>\n  <p>quote\nlazy</p>\n</blockquote>\n");
    }

    #[test]
    fn tight_and_loose_lists() {
        assert_eq!(
            to_html("- a\n- b"),
            "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n"
        );
        assert_eq!(
            to_html("- a\n\n- b"),
            "<ul>\n  <li>\n    <p>a</p>\n  </li>\n  <li>\n    <p>b</p>\n  </li>\n</ul>\n"
        );
    }

    #[test]
    fn dangerous_tags_are_escaped() {
        let html = to_html("hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script"));
    }

    #[test]
    fn denylist_is_configurable() {
        let options = Options {
            dangerous_html_tags: vec!["marquee".to_string()],
        };
        let html = to_html_with_options("a <marquee>b</marquee>", &options);
        assert!(!html.contains("<marquee>"));
        let html = to_html_with_options("a <script>b</script>", &options);
        assert!(html.contains("<script>"));
    }

    #[test]
    fn parse_bytes_rejects_invalid_utf8() {
        assert!(matches!(
            parse_bytes(&[0xff, 0xfe], &Options::default()),
            Err(Error::MalformedInput(_))
        ));
        assert_eq!(
            parse_bytes(b"# ok", &Options::default()).unwrap(),
            "<h1>ok</h1>\n"
        );
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = "# t\n\n- a\n- *b*\n\n> q\n";
        assert_eq!(to_html(input), to_html(input));
    }
}
