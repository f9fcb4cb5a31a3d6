//! Inline token stream.
//!
//! The scanner turns leaf text into a doubly linked list of tokens;
//! later passes (links, emphasis) rewrite tokens in place, splitting
//! and unlinking as they go. Links are plain indices into one arena
//! `Vec`, so splices never move other tokens.

use crate::escape;
use crate::inline::html;
use crate::limits;

pub const NIL: u32 = u32::MAX;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Text,
    /// A run of `*` or `_`, with its flanking capabilities.
    Delimiter {
        ch: u8,
        can_left: bool,
        can_right: bool,
    },
    LinkStart,
    LinkEnd,
    /// Finished HTML passed through verbatim (tags, code spans, breaks).
    RawHtml,
}

#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub closed: bool,
    pub prev: u32,
    pub next: u32,
}

#[derive(Debug, Default)]
pub struct TokenList {
    arena: Vec<Token>,
    head: u32,
    tail: u32,
}

impl TokenList {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    #[inline]
    pub fn get(&self, id: u32) -> &Token {
        &self.arena[id as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: u32) -> &mut Token {
        &mut self.arena[id as usize]
    }

    pub fn head(&self) -> Option<u32> {
        (self.head != NIL).then_some(self.head)
    }

    pub fn next(&self, id: u32) -> Option<u32> {
        let n = self.get(id).next;
        (n != NIL).then_some(n)
    }

    pub fn prev(&self, id: u32) -> Option<u32> {
        let p = self.get(id).prev;
        (p != NIL).then_some(p)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head == NIL
    }

    pub fn push_back(&mut self, kind: TokenKind, content: String, closed: bool) -> u32 {
        let id = self.arena.len() as u32;
        self.arena.push(Token {
            kind,
            content,
            closed,
            prev: self.tail,
            next: NIL,
        });
        if self.tail != NIL {
            self.arena[self.tail as usize].next = id;
        } else {
            self.head = id;
        }
        self.tail = id;
        id
    }

    /// Append text, coalescing with a trailing text token.
    pub fn push_text(&mut self, s: &str) {
        if self.tail != NIL {
            let tail = &mut self.arena[self.tail as usize];
            if tail.kind == TokenKind::Text {
                tail.content.push_str(s);
                return;
            }
        }
        self.push_back(TokenKind::Text, s.to_string(), true);
    }

    pub fn insert_after(&mut self, at: u32, kind: TokenKind, content: String) -> u32 {
        let id = self.arena.len() as u32;
        let old_next = self.get(at).next;
        self.arena.push(Token {
            kind,
            content,
            closed: true,
            prev: at,
            next: old_next,
        });
        self.arena[at as usize].next = id;
        if old_next != NIL {
            self.arena[old_next as usize].prev = id;
        } else {
            self.tail = id;
        }
        id
    }

    pub fn insert_before(&mut self, at: u32, kind: TokenKind, content: String) -> u32 {
        let id = self.arena.len() as u32;
        let old_prev = self.get(at).prev;
        self.arena.push(Token {
            kind,
            content,
            closed: true,
            prev: old_prev,
            next: at,
        });
        self.arena[at as usize].prev = id;
        if old_prev != NIL {
            self.arena[old_prev as usize].next = id;
        } else {
            self.head = id;
        }
        id
    }

    /// Remove a token from the chain. Its arena slot stays allocated.
    pub fn unlink(&mut self, id: u32) {
        let (prev, next) = {
            let t = self.get(id);
            (t.prev, t.next)
        };
        if prev != NIL {
            self.arena[prev as usize].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.arena[next as usize].prev = prev;
        } else {
            self.tail = prev;
        }
        let t = self.get_mut(id);
        t.prev = NIL;
        t.next = NIL;
    }

    /// Concatenate token contents in chain order.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut cur = self.head;
        while cur != NIL {
            out.push_str(&self.get(cur).content);
            cur = self.get(cur).next;
        }
        out
    }
}

/// Whether a character counts as whitespace-or-absent for flanking.
#[inline]
fn boundary_ws(ch: Option<char>) -> bool {
    ch.is_none_or(|c| c.is_whitespace())
}

#[inline]
fn boundary_punct(ch: Option<char>) -> bool {
    ch.is_some_and(escape::is_punctuation)
}

/// Flanking test for a delimiter run given its surrounding characters.
///
/// Left-flanking: the run can open emphasis; right-flanking: it can
/// close. A run that is neither is inert text.
pub fn flanking(prev: Option<char>, next: Option<char>) -> (bool, bool) {
    let can_left = (!boundary_ws(next) && !boundary_punct(next))
        || (boundary_punct(next) && (boundary_punct(prev) || boundary_ws(prev)));
    let can_right = (!boundary_ws(prev) && !boundary_punct(prev))
        || (boundary_punct(prev) && (boundary_punct(next) || boundary_ws(next)));
    (can_left, can_right)
}

/// Scan leaf text into a token stream.
pub fn tokenize(text: &str, dangerous_tags: &[String]) -> TokenList {
    let mut list = TokenList::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    let mut trailing_spaces = 0usize;

    while i < chars.len() {
        if list.len() >= limits::MAX_INLINE_TOKENS {
            let rest: String = chars[i..].iter().collect();
            list.push_text(&rest);
            break;
        }
        let ch = chars[i];
        match ch {
            '\\' => {
                match chars.get(i + 1) {
                    Some(&'\n') if i + 2 < chars.len() => {
                        // escaped newline is a hard break
                        list.push_back(TokenKind::RawHtml, "<br/>\n".to_string(), true);
                        i += 2;
                    }
                    Some(&next) if escape::is_punctuation(next) => {
                        match escape::escaped_form(next) {
                            Some(entity) => list.push_text(entity),
                            None => {
                                let mut buf = [0u8; 4];
                                list.push_text(next.encode_utf8(&mut buf));
                            }
                        }
                        i += 2;
                    }
                    _ => {
                        list.push_text("\\");
                        i += 1;
                    }
                }
                trailing_spaces = 0;
            }
            '\n' => {
                if trailing_spaces >= 2 && i + 1 < chars.len() {
                    trim_trailing_spaces(&mut list, trailing_spaces);
                    list.push_back(TokenKind::RawHtml, "<br/>\n".to_string(), true);
                } else {
                    list.push_text("\n");
                }
                trailing_spaces = 0;
                i += 1;
            }
            '<' => {
                i = scan_angle_bracket(&mut list, &chars, i, dangerous_tags);
                trailing_spaces = 0;
            }
            '`' => {
                i = scan_code_span(&mut list, &chars, i);
                trailing_spaces = 0;
            }
            '>' => {
                list.push_text("&gt;");
                trailing_spaces = 0;
                i += 1;
            }
            '[' => {
                list.push_back(TokenKind::LinkStart, "[".to_string(), false);
                trailing_spaces = 0;
                i += 1;
            }
            ']' => {
                list.push_back(TokenKind::LinkEnd, "]".to_string(), false);
                trailing_spaces = 0;
                i += 1;
            }
            '*' | '_' => {
                let run_len = chars[i..].iter().take_while(|&&c| c == ch).count();
                let prev = i.checked_sub(1).map(|p| chars[p]);
                let next = chars.get(i + run_len).copied();
                let (can_left, can_right) = flanking(prev, next);
                let run: String = std::iter::repeat_n(ch, run_len).collect();
                if can_left || can_right {
                    list.push_back(
                        TokenKind::Delimiter {
                            ch: ch as u8,
                            can_left,
                            can_right,
                        },
                        run,
                        false,
                    );
                } else {
                    list.push_text(&run);
                }
                trailing_spaces = 0;
                i += run_len;
            }
            _ => {
                let mut buf = [0u8; 4];
                list.push_text(ch.encode_utf8(&mut buf));
                if ch == ' ' {
                    trailing_spaces += 1;
                } else {
                    trailing_spaces = 0;
                }
                i += 1;
            }
        }
    }
    list
}

/// Drop the spaces preceding a hard break from the trailing text token.
fn trim_trailing_spaces(list: &mut TokenList, count: usize) {
    if list.tail == NIL {
        return;
    }
    let tail = list.get_mut(list.tail);
    if tail.kind == TokenKind::Text {
        let keep = tail.content.len().saturating_sub(count);
        tail.content.truncate(keep);
    }
}

/// Dispatch a `<`: inline tag, autolink, then comment; all misses
/// degrade to an escaped angle bracket. Returns the next scan index.
fn scan_angle_bracket(
    list: &mut TokenList,
    chars: &[char],
    i: usize,
    dangerous_tags: &[String],
) -> usize {
    if let Some(end) = html::scan_tag(chars, i, dangerous_tags) {
        let tag: String = chars[i..=end].iter().collect();
        list.push_back(TokenKind::RawHtml, tag, true);
        return end + 1;
    }
    if let Some((url, end)) = html::scan_autolink(chars, i) {
        let mut anchor = String::with_capacity(url.len() * 2 + 24);
        anchor.push_str("<a href=\"");
        escape::escape_attr_into(&mut anchor, &url);
        anchor.push_str("\">");
        escape::escape_span_into(&mut anchor, &url);
        anchor.push_str("</a>");
        list.push_back(TokenKind::RawHtml, anchor, true);
        return end + 1;
    }
    if let Some(end) = html::scan_comment(chars, i) {
        let comment: String = chars[i..=end].iter().collect();
        list.push_back(TokenKind::RawHtml, comment, true);
        return end + 1;
    }
    list.push_text("&lt;");
    i + 1
}

/// Backtick code span. On a matched closer the span becomes one raw
/// `<code>` token; otherwise the opening run is literal text.
fn scan_code_span(list: &mut TokenList, chars: &[char], start: usize) -> usize {
    let open_len = chars[start..].iter().take_while(|&&c| c == '`').count();
    if open_len > limits::MAX_CODE_SPAN_BACKTICKS {
        let run: String = chars[start..start + open_len].iter().collect();
        list.push_text(&run);
        return start + open_len;
    }

    let mut i = start + open_len;
    while i < chars.len() {
        if chars[i] == '`' {
            let run = chars[i..].iter().take_while(|&&c| c == '`').count();
            if run == open_len {
                let content: String = chars[start + open_len..i].iter().collect();
                let mut content = content.replace('\n', " ");
                if content.contains(|c: char| c != ' ')
                    && content.starts_with(' ')
                    && content.ends_with(' ')
                {
                    content = content[1..content.len() - 1].to_string();
                }
                let mut html = String::with_capacity(content.len() + 13);
                html.push_str("<code>");
                escape::escape_span_into(&mut html, &content);
                html.push_str("</code>");
                list.push_back(TokenKind::RawHtml, html, true);
                return i + run;
            }
            i += run;
        } else {
            i += 1;
        }
    }
    // no closer
    let run: String = chars[start..start + open_len].iter().collect();
    list.push_text(&run);
    start + open_len
}
