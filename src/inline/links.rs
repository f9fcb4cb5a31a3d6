//! Link resolution over the token stream.
//!
//! Bracket markers were emitted as dedicated tokens by the scanner.
//! Each `]` tries, in order, the inline form `(dest "title")` spelled
//! out in the following tokens, then the reference forms: explicit
//! `[label]`, collapsed `[]`, and shortcut (the enclosed text is the
//! label). A formed link consumes its attribute tokens and closes every
//! other pending opener so links never nest; a failed `]` becomes
//! literal text while earlier openers stay usable.

use smallvec::SmallVec;

use crate::escape;
use crate::inline::tokens::{TokenKind, TokenList};
use crate::limits;
use crate::link_ref::LinkRefStore;

pub fn resolve_links(list: &mut TokenList, refs: &LinkRefStore) {
    let mut openers: SmallVec<[u32; 8]> = SmallVec::new();
    let mut cur = list.head();
    while let Some(id) = cur {
        match list.get(id).kind {
            TokenKind::LinkStart if !list.get(id).closed => openers.push(id),
            TokenKind::LinkEnd if !list.get(id).closed => {
                if let Some(&opener) = openers.last() {
                    let attrs = take_inline_attributes(list, id)
                        .or_else(|| take_reference_attributes(list, opener, id, refs));
                    match attrs {
                        Some((dest, title)) => {
                            form_link(list, opener, id, &dest, title.as_deref());
                            openers.pop();
                            for &o in openers.iter() {
                                list.get_mut(o).closed = true;
                            }
                            openers.clear();
                        }
                        None => {
                            let end = list.get_mut(id);
                            end.kind = TokenKind::Text;
                            end.closed = true;
                        }
                    }
                } else {
                    let end = list.get_mut(id);
                    end.kind = TokenKind::Text;
                    end.closed = true;
                }
            }
            _ => {}
        }
        cur = list.next(id);
    }

    // Leftover bracket markers are literal.
    let mut cur = list.head();
    while let Some(id) = cur {
        if matches!(
            list.get(id).kind,
            TokenKind::LinkStart | TokenKind::LinkEnd
        ) {
            list.get_mut(id).kind = TokenKind::Text;
        }
        cur = list.next(id);
    }
}

/// Rewrite the marker pair into anchor tags and neutralize any bracket
/// markers between them.
fn form_link(list: &mut TokenList, opener: u32, end: u32, dest: &str, title: Option<&str>) {
    let mut anchor = String::with_capacity(dest.len() + 16);
    anchor.push_str("<a href=\"");
    escape::escape_attr_into(&mut anchor, dest);
    anchor.push('"');
    if let Some(title) = title {
        anchor.push_str(" title=\"");
        escape::escape_attr_into(&mut anchor, title);
        anchor.push('"');
    }
    anchor.push('>');

    let op = list.get_mut(opener);
    op.kind = TokenKind::RawHtml;
    op.content = anchor;
    op.closed = true;

    let e = list.get_mut(end);
    e.kind = TokenKind::RawHtml;
    e.content = "</a>".to_string();
    e.closed = true;

    let mut cur = list.next(opener);
    while let Some(id) = cur {
        if id == end {
            break;
        }
        if matches!(
            list.get(id).kind,
            TokenKind::LinkStart | TokenKind::LinkEnd
        ) {
            list.get_mut(id).closed = true;
        }
        cur = list.next(id);
    }
}

/// Inline attributes spelled in the tokens after `end`. On success the
/// consumed tokens are removed (the last one possibly trimmed) and the
/// destination/title are returned.
fn take_inline_attributes(list: &mut TokenList, end: u32) -> Option<(String, Option<String>)> {
    // Gather the contiguous non-raw-html text after the end marker.
    let mut ids: SmallVec<[u32; 8]> = SmallVec::new();
    let mut text = String::new();
    let mut cur = list.next(end);
    while let Some(id) = cur {
        if matches!(list.get(id).kind, TokenKind::RawHtml) {
            break;
        }
        ids.push(id);
        text.push_str(&list.get(id).content);
        cur = list.next(id);
    }

    let (dest, title, consumed) = parse_inline_attributes(&text)?;

    // Remove exactly the consumed bytes from the gathered tokens.
    let mut remaining = consumed;
    for &id in ids.iter() {
        if remaining == 0 {
            break;
        }
        let len = list.get(id).content.len();
        if len <= remaining {
            list.unlink(id);
            remaining -= len;
        } else {
            let t = list.get_mut(id);
            t.content = t.content[remaining..].to_string();
            remaining = 0;
        }
    }
    Some((dest, title))
}

/// Parse `(dest)`, `(<dest>)`, `(dest "title")` and friends from the
/// start of `s`. Returns destination, optional title, and the number of
/// bytes consumed including the final `)`.
fn parse_inline_attributes(s: &str) -> Option<(String, Option<String>, usize)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'(') {
        return None;
    }
    let mut i = 1;
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }

    let dest = if bytes.get(i) == Some(&b'<') {
        let start = i + 1;
        let close = s[start..].find('>')?;
        if s[start..start + close].contains('\n') {
            return None;
        }
        i = start + close + 1;
        s[start..start + close].to_string()
    } else {
        let start = i;
        let mut depth = 0usize;
        loop {
            match bytes.get(i) {
                None => return None,
                Some(b'(') => {
                    depth += 1;
                    if depth > limits::MAX_LINK_PAREN_DEPTH {
                        return None;
                    }
                    i += 1;
                }
                Some(b')') if depth > 0 => {
                    depth -= 1;
                    i += 1;
                }
                Some(b')') => break,
                Some(b) if b.is_ascii_whitespace() => {
                    if depth > 0 {
                        return None;
                    }
                    break;
                }
                Some(_) => i += 1,
            }
        }
        s[start..i].to_string()
    };

    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }

    let title = match bytes.get(i) {
        Some(&open @ (b'"' | b'\'' | b'(')) => {
            let close = if open == b'(' { b')' } else { open };
            let start = i + 1;
            let mut j = start;
            while bytes.get(j).is_some_and(|&b| b != close) {
                j += 1;
            }
            bytes.get(j)?;
            i = j + 1;
            while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
                i += 1;
            }
            Some(s[start..j].to_string())
        }
        _ => None,
    };

    if bytes.get(i) != Some(&b')') {
        return None;
    }
    Some((dest, title, i + 1))
}

/// Reference-style attributes: explicit `[label]`, collapsed `[]`, or
/// shortcut (the enclosed text itself). Explicit and collapsed forms
/// consume their marker tokens.
fn take_reference_attributes(
    list: &mut TokenList,
    opener: u32,
    end: u32,
    refs: &LinkRefStore,
) -> Option<(String, Option<String>)> {
    if let Some(n1) = list.next(end) {
        if matches!(list.get(n1).kind, TokenKind::LinkStart) {
            if let Some(n2) = list.next(n1) {
                match list.get(n2).kind {
                    TokenKind::LinkEnd => {
                        // collapsed: the enclosed text is the label
                        let label = enclosed_text(list, opener, end)?;
                        let def = refs.get(&label)?;
                        let attrs = (def.destination.clone(), def.title.clone());
                        list.unlink(n1);
                        list.unlink(n2);
                        return Some(attrs);
                    }
                    TokenKind::Text => {
                        if let Some(n3) = list.next(n2) {
                            if matches!(list.get(n3).kind, TokenKind::LinkEnd) {
                                let label = list.get(n2).content.clone();
                                if let Some(def) = refs.get(&label) {
                                    let attrs = (def.destination.clone(), def.title.clone());
                                    list.unlink(n1);
                                    list.unlink(n2);
                                    list.unlink(n3);
                                    return Some(attrs);
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    let label = enclosed_text(list, opener, end)?;
    let def = refs.get(&label)?;
    Some((def.destination.clone(), def.title.clone()))
}

/// Text between the marker pair, used as a shortcut label. Raw HTML
/// (code spans, breaks) inside disqualifies the label.
fn enclosed_text(list: &TokenList, opener: u32, end: u32) -> Option<String> {
    let mut out = String::new();
    let mut cur = list.next(opener);
    while let Some(id) = cur {
        if id == end {
            return (!out.trim().is_empty()).then_some(out);
        }
        if matches!(list.get(id).kind, TokenKind::RawHtml) {
            return None;
        }
        out.push_str(&list.get(id).content);
        cur = list.next(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::tokens::tokenize;
    use crate::link_ref::LinkRefDef;

    fn render(text: &str, refs: &LinkRefStore) -> String {
        let mut list = tokenize(text, &[]);
        resolve_links(&mut list, refs);
        list.to_html()
    }

    fn refs_with(label: &str, dest: &str, title: Option<&str>) -> LinkRefStore {
        let mut store = LinkRefStore::new();
        store.insert(
            label,
            LinkRefDef {
                destination: dest.to_string(),
                title: title.map(str::to_string),
            },
        );
        store
    }

    #[test]
    fn inline_link() {
        let out = render("[text](https://x.y)", &LinkRefStore::new());
        assert_eq!(out, "<a href=\"https://x.y\">text</a>");
    }

    #[test]
    fn inline_link_with_title() {
        let out = render("[t](u \"the title\")", &LinkRefStore::new());
        assert_eq!(out, "<a href=\"u\" title=\"the title\">t</a>");
    }

    #[test]
    fn angle_destination_allows_spaces() {
        let out = render("[t](</a b>)", &LinkRefStore::new());
        assert_eq!(out, "<a href=\"/a b\">t</a>");
    }

    #[test]
    fn balanced_parens_in_destination() {
        let out = render("[t](u(v)w)", &LinkRefStore::new());
        assert_eq!(out, "<a href=\"u(v)w\">t</a>");
    }

    #[test]
    fn unmatched_end_is_literal() {
        let out = render("no ] link", &LinkRefStore::new());
        assert_eq!(out, "no ] link");
    }

    #[test]
    fn missing_attributes_fall_back_to_text() {
        let out = render("[t] (u)", &LinkRefStore::new());
        // Whitespace between `]` and `(` breaks the inline form.
        assert_eq!(out, "[t] (u)");
    }

    #[test]
    fn shortcut_reference() {
        let refs = refs_with("label", "/dest", None);
        assert_eq!(render("[label]", &refs), "<a href=\"/dest\">label</a>");
    }

    #[test]
    fn collapsed_reference() {
        let refs = refs_with("label", "/dest", Some("t"));
        assert_eq!(
            render("[label][]", &refs),
            "<a href=\"/dest\" title=\"t\">label</a>"
        );
    }

    #[test]
    fn explicit_reference() {
        let refs = refs_with("ref", "/r", None);
        assert_eq!(render("[shown][ref]", &refs), "<a href=\"/r\">shown</a>");
    }

    #[test]
    fn reference_labels_are_case_insensitive() {
        let refs = refs_with("Label", "/d", None);
        assert_eq!(render("[LABEL]", &refs), "<a href=\"/d\">LABEL</a>");
    }

    #[test]
    fn unknown_reference_stays_literal() {
        let out = render("[nope]", &LinkRefStore::new());
        assert_eq!(out, "[nope]");
    }

    #[test]
    fn href_is_attribute_escaped() {
        let out = render("[t](u\"v)", &LinkRefStore::new());
        assert_eq!(out, "<a href=\"u&quot;v\">t</a>");
    }

    #[test]
    fn links_do_not_nest() {
        let refs = LinkRefStore::new();
        let out = render("[a [b](/inner) c](/outer)", &refs);
        // The inner link forms; the outer opener is closed and its `]`
        // cannot pair with it anymore.
        assert_eq!(out, "[a <a href=\"/inner\">b</a> c](/outer)");
    }
}
