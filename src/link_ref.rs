//! Link reference definitions.
//!
//! Definitions are harvested from finished paragraphs after tree
//! construction and before rendering. A paragraph is only consumed when
//! its entire text is one or more well-formed definitions; anything
//! trailing rejects the whole paragraph back to ordinary text.

use rustc_hash::FxHashMap;

use crate::block::{BlockKind, BlockTree, ROOT};
use crate::limits;

/// A link reference definition (destination + optional title).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRefDef {
    pub destination: String,
    pub title: Option<String>,
}

/// Store of definitions, keyed by normalized label.
#[derive(Debug, Default)]
pub struct LinkRefStore {
    by_label: FxHashMap<String, LinkRefDef>,
}

impl LinkRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition if the label is new. First definition wins.
    pub fn insert(&mut self, label: &str, def: LinkRefDef) {
        self.by_label.entry(normalize_label(label)).or_insert(def);
    }

    pub fn get(&self, label: &str) -> Option<&LinkRefDef> {
        self.by_label.get(&normalize_label(label))
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Normalize a link label: decode entities, process backslash escapes,
/// collapse internal whitespace to single spaces, trim, and case-fold.
pub fn normalize_label(label: &str) -> String {
    let decoded = html_escape::decode_html_entities(label);
    let bytes = decoded.as_bytes();

    let mut unescaped = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() && is_label_escapable(bytes[i + 1]) {
            i += 1;
        }
        unescaped.push(bytes[i]);
        i += 1;
    }

    let unescaped = String::from_utf8_lossy(&unescaped).into_owned();
    let mut out = String::with_capacity(unescaped.len());
    let mut last_was_space = true;
    for ch in unescaped.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }
        last_was_space = false;
        for lc in ch.to_lowercase() {
            out.push(lc);
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

#[inline]
fn is_label_escapable(b: u8) -> bool {
    matches!(b, b'[' | b']' | b'\\')
}

/// Walk finished paragraphs, move their definitions into `store`, and
/// blank out fully consumed paragraphs so they render as nothing.
pub fn collect(tree: &mut BlockTree, store: &mut LinkRefStore) {
    let mut stack = vec![ROOT];
    while let Some(id) = stack.pop() {
        match &tree.node(id).kind {
            BlockKind::Document
            | BlockKind::Blockquote
            | BlockKind::List { .. }
            | BlockKind::ListItem => {
                stack.extend(tree.node(id).children.iter().copied());
            }
            BlockKind::Paragraph | BlockKind::PlainText => {
                let text = tree.node(id).text.clone();
                if parse_definitions(text.trim(), store) {
                    tree.node_mut(id).text.clear();
                }
            }
            _ => {}
        }
    }
}

/// Parse one or more definitions covering the entire input. On success
/// all definitions are added to `store` and `true` is returned; any
/// malformed or trailing content leaves the store untouched.
pub fn parse_definitions(text: &str, store: &mut LinkRefStore) -> bool {
    let mut defs = Vec::new();
    let mut rest = text.trim_start();
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let Some((label, def, remainder)) = parse_one(rest) else {
            return false;
        };
        defs.push((label, def));
        rest = remainder.trim_start();
    }
    for (label, def) in defs {
        store.insert(&label, def);
    }
    true
}

fn parse_one(input: &str) -> Option<(String, LinkRefDef, &str)> {
    let rest = input.strip_prefix('[')?;
    let label_end = scan_label(rest)?;
    let label = &rest[..label_end];
    if label.len() > limits::MAX_LABEL_LEN || label.trim().is_empty() {
        return None;
    }
    let rest = rest[label_end + 1..].strip_prefix(':')?;
    let rest = rest.trim_start();

    let (destination, rest) = scan_destination(rest)?;

    // Optional title, separated from the destination by whitespace.
    let (title, rest) = {
        let trimmed = rest.trim_start();
        let had_ws = trimmed.len() != rest.len();
        match trimmed.chars().next() {
            Some(open @ ('"' | '\'' | '(')) if had_ws => scan_title(trimmed, open)?,
            _ => (None, rest),
        }
    };

    // The definition ends at a line end (or end of input).
    let mut tail = rest;
    while let Some(stripped) = tail.strip_prefix(' ') {
        tail = stripped;
    }
    if !tail.is_empty() && !tail.starts_with('\n') {
        return None;
    }
    Some((
        label.to_string(),
        LinkRefDef {
            destination,
            title,
        },
        tail,
    ))
}

/// Index of the closing `]`, honoring `\]` escapes. Newlines are allowed
/// inside labels; blank lines are not (the block stage already split those).
fn scan_label(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b']' => return Some(i),
            b'[' => return None,
            _ => i += 1,
        }
    }
    None
}

fn scan_destination(s: &str) -> Option<(String, &str)> {
    if let Some(rest) = s.strip_prefix('<') {
        let end = rest.find('>')?;
        if rest[..end].contains('\n') {
            return None;
        }
        return Some((rest[..end].to_string(), &rest[end + 1..]));
    }
    let end = s
        .find(char::is_whitespace)
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((s[..end].to_string(), &s[end..]))
}

fn scan_title(s: &str, open: char) -> Option<(Option<String>, &str)> {
    let close = match open {
        '(' => ')',
        c => c,
    };
    let body = &s[1..];
    let end = body.find(close)?;
    let title = &body[..end];
    if title.contains("\n\n") {
        return None;
    }
    Some((Some(title.to_string()), &body[end + 1..]))
}
