//! Emphasis and strong emphasis.
//!
//! Delimiter runs survive the scanner as whole tokens with their
//! flanking classification precomputed. This pass walks left to right,
//! treats each closing-capable run as a closer, searches backwards for
//! the nearest compatible opener, and peels `<strong>`/`<em>` pairs off
//! the two runs until one is exhausted. Anchor tags formed by the link
//! pass are opaque: a closer never pairs with an opener on the other
//! side of an `<a>`/`</a>` boundary.

use crate::inline::tokens::{TokenKind, TokenList};
use crate::limits;

pub fn resolve_emphasis(list: &mut TokenList) {
    let mut cur = list.head();
    while let Some(id) = cur {
        if can_close(list, id) {
            match find_opener(list, id) {
                Some(opener) => transform(list, opener, id),
                None => {
                    let t = list.get_mut(id);
                    t.kind = TokenKind::Text;
                    t.closed = true;
                }
            }
        }
        cur = list.next(id);
    }

    // Runs that never paired render literally.
    let mut cur = list.head();
    while let Some(id) = cur {
        if matches!(list.get(id).kind, TokenKind::Delimiter { .. }) {
            list.get_mut(id).kind = TokenKind::Text;
        }
        cur = list.next(id);
    }
}

fn can_close(list: &TokenList, id: u32) -> bool {
    let token = list.get(id);
    let TokenKind::Delimiter {
        ch,
        can_left,
        can_right,
    } = token.kind
    else {
        return false;
    };
    if token.closed || !can_right {
        return false;
    }
    if ch == b'*' {
        return true;
    }
    // `_` that could also open only closes at a word boundary.
    !can_left || boundary_after(list, id)
}

fn can_open(list: &TokenList, id: u32) -> bool {
    let token = list.get(id);
    let TokenKind::Delimiter {
        ch,
        can_left,
        can_right,
    } = token.kind
    else {
        return false;
    };
    if token.closed || !can_left {
        return false;
    }
    if ch == b'*' {
        return true;
    }
    !can_right || boundary_before(list, id)
}

fn boundary_after(list: &TokenList, id: u32) -> bool {
    match list.next(id) {
        None => true,
        Some(next) => match list.get(next).content.chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || crate::escape::is_punctuation(c),
        },
    }
}

fn boundary_before(list: &TokenList, id: u32) -> bool {
    match list.prev(id) {
        None => true,
        Some(prev) => match list.get(prev).content.chars().last() {
            None => true,
            Some(c) => c.is_whitespace() || crate::escape::is_punctuation(c),
        },
    }
}

/// Nearest compatible opener to the left of `closer`, without crossing
/// an anchor boundary. Same-character runs that cannot open are marked
/// inert as they are skipped; runs blocked only by the multiple-of-3
/// rule stay live for other closers.
fn find_opener(list: &mut TokenList, closer: u32) -> Option<u32> {
    let (closer_ch, closer_bf, closer_len) = {
        let t = list.get(closer);
        let TokenKind::Delimiter {
            ch,
            can_left,
            can_right,
        } = t.kind
        else {
            return None;
        };
        (ch, can_left && can_right, t.content.len())
    };

    let mut anchor_depth = 0i32;
    let mut cur = list.prev(closer);
    while let Some(id) = cur {
        let candidate = {
            let token = list.get(id);
            match token.kind {
                TokenKind::RawHtml => {
                    let c = token.content.as_str();
                    let opens = c.starts_with("<a ") || c == "<a>";
                    let closes = c.ends_with("</a>");
                    // Autolinks carry a balanced anchor in one token.
                    if closes && !opens {
                        anchor_depth += 1;
                    } else if opens && !closes {
                        anchor_depth -= 1;
                        if anchor_depth < 0 {
                            break;
                        }
                    }
                    None
                }
                TokenKind::Delimiter {
                    ch,
                    can_left,
                    can_right,
                } if ch == closer_ch && anchor_depth == 0 => {
                    Some((token.content.len(), can_left && can_right))
                }
                _ => None,
            }
        };

        if let Some((opener_len, opener_bf)) = candidate {
            let multiple_of_three = (opener_len + closer_len) % 3 == 0
                && !(opener_len % 3 == 0 && closer_len % 3 == 0);
            if can_open(list, id) {
                if !(opener_bf && closer_bf && multiple_of_three) {
                    return Some(id);
                }
            } else {
                let t = list.get_mut(id);
                t.kind = TokenKind::Text;
                t.closed = true;
            }
        }
        cur = list.prev(id);
    }
    None
}

/// Peel `<strong>`/`<em>` pairs off the opener and closer runs until
/// one run is used up.
fn transform(list: &mut TokenList, opener: u32, closer: u32) {
    for _ in 0..limits::MAX_EMPHASIS_PEELS {
        let opener_len = list.get(opener).content.len();
        let closer_len = list.get(closer).content.len();
        let take = if opener_len >= 2 && closer_len >= 2 { 2 } else { 1 };
        let (open_tag, close_tag) = if take == 2 {
            ("<strong>", "</strong>")
        } else {
            ("<em>", "</em>")
        };

        let opener_done = opener_len == take;
        if opener_done {
            let t = list.get_mut(opener);
            t.kind = TokenKind::RawHtml;
            t.content = open_tag.to_string();
            t.closed = true;
        } else {
            let t = list.get_mut(opener);
            t.content.truncate(opener_len - take);
            list.insert_after(opener, TokenKind::RawHtml, open_tag.to_string());
        }

        let closer_done = closer_len == take;
        if closer_done {
            let t = list.get_mut(closer);
            t.kind = TokenKind::RawHtml;
            t.content = close_tag.to_string();
            t.closed = true;
        } else {
            let t = list.get_mut(closer);
            t.content = t.content[take..].to_string();
            list.insert_before(closer, TokenKind::RawHtml, close_tag.to_string());
        }

        if opener_done || closer_done {
            break;
        }
    }
}
