//! Inline parsing: text spans to HTML fragments.
//!
//! A leaf's text runs through three passes over one token list: the
//! scanner resolves everything self-contained (escapes, code spans, raw
//! HTML, autolinks, entities for `<` and `>`), the link pass pairs
//! bracket markers, and the emphasis pass pairs delimiter runs. The
//! surviving tokens concatenate into the final fragment.

pub mod emphasis;
pub mod html;
pub mod links;
pub mod tokens;

use crate::link_ref::LinkRefStore;

pub use tokens::{Token, TokenKind, TokenList};

/// Render one leaf's text to an HTML fragment.
pub fn parse_inline(text: &str, refs: &LinkRefStore, dangerous_tags: &[String]) -> String {
    let mut list = tokens::tokenize(text, dangerous_tags);
    links::resolve_links(&mut list, refs);
    emphasis::resolve_emphasis(&mut list);
    list.to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        parse_inline(text, &LinkRefStore::new(), &[])
    }

    #[test]
    fn passes_compose() {
        assert_eq!(
            render("a *[b](u)* `c`"),
            "a <em><a href=\"u\">b</a></em> <code>c</code>"
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(render("just words"), "just words");
    }

    #[test]
    fn ampersand_passes_through() {
        assert_eq!(render("a & b"), "a & b");
    }
}
