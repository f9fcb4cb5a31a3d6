//! Line-by-line block tree construction.
//!
//! The builder keeps a persistent cursor, the last-opened container, and
//! feeds each line through blank-line closing and marker dispatch.
//! Verbatim leaves (fenced code and html blocks) swallow lines until
//! their own end condition; that check runs after container markers are
//! consumed, so a fence opened inside a blockquote sees the marker
//! remainder rather than the raw line. Container markers (`>`, list
//! bullets) recurse on the line remainder with the new container as
//! local root, so arbitrary nesting falls out of the per-marker logic.
//!
//! All columns are absolute within the tab-expanded line; a list item's
//! baseline is set to its content column before recursing so same-line
//! and continuation content share the same indent arithmetic.

use crate::block::classify::{self, Classification, Construct};
use crate::block::html_block;
use crate::block::tree::{BlockKind, BlockTree, NodeId, ROOT, Tightness};
use crate::limits;

pub struct TreeBuilder {
    tree: BlockTree,
    /// Last-opened container: the root or a list item.
    cursor: NodeId,
    dangerous_tags: Vec<String>,
    /// List whose looseness awaits confirmation by the next non-blank
    /// line landing inside it.
    pending_loose: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new(dangerous_tags: Vec<String>) -> Self {
        Self {
            tree: BlockTree::new(),
            cursor: ROOT,
            dangerous_tags,
            pending_loose: None,
        }
    }

    pub fn feed_line(&mut self, raw: &str) {
        let line = classify::expand_tabs(raw);

        if classify::is_blank(&line) {
            // Open verbatim leaves apply their own blank-line rules.
            match self.verbatim_leaf(ROOT) {
                Some((leaf, _)) => self.continue_verbatim(leaf, &line, 0),
                None => self.handle_blank(),
            }
            return;
        }

        let first_new = NodeId(self.tree.len() as u32);
        self.cursor = self.process(ROOT, &line, 0, 0);

        if let Some(list) = self.pending_loose.take() {
            if (first_new.index()) < self.tree.len() && self.tree.is_descendant(first_new, list) {
                self.set_tightness(list, Tightness::Loose);
            }
        }
    }

    /// Close remaining open blocks and resolve list tightness.
    pub fn finish(mut self) -> BlockTree {
        for i in 0..self.tree.len() {
            let id = NodeId(i as u32);
            if let BlockKind::List { tightness, .. } = &mut self.tree.node_mut(id).kind {
                if *tightness == Tightness::Maybe {
                    *tightness = Tightness::Tight;
                }
            }
            self.tree.node_mut(id).closed = true;
        }
        promote_loose_items(&mut self.tree);
        self.tree
    }

    /// Append one line of leaf content, newline-terminated.
    fn append_line(&mut self, id: NodeId, s: &str) {
        let text = &mut self.tree.node_mut(id).text;
        text.push_str(s);
        text.push('\n');
    }

    fn set_tightness(&mut self, list: NodeId, t: Tightness) {
        if let BlockKind::List { tightness, .. } = &mut self.tree.node_mut(list).kind {
            if !(*tightness == Tightness::Loose && t != Tightness::Loose) {
                *tightness = t;
            }
        }
    }

    fn continue_fenced(
        &mut self,
        leaf: NodeId,
        line: &str,
        fence_char: u8,
        fence_len: usize,
        base_col: usize,
    ) {
        let ws = classify::leading_spaces(line);
        let rest = line[ws..].trim_end();
        let run = rest.bytes().take_while(|&b| b == fence_char).count();
        if run >= fence_len && run == rest.len() {
            self.tree.node_mut(leaf).closed = true;
            return;
        }
        let strip = ws.min(self.tree.node(leaf).indent.saturating_sub(base_col));
        let content = line[strip..].to_string();
        self.append_line(leaf, &content);
    }

    /// Innermost open verbatim leaf reached by following open last
    /// children from `node`, plus whether an open blockquote sits on the
    /// path down to it.
    fn verbatim_leaf(&self, node: NodeId) -> Option<(NodeId, bool)> {
        let mut through_quote = false;
        let mut cur = node;
        loop {
            let n = self.tree.node(cur);
            if !n.closed
                && matches!(
                    n.kind,
                    BlockKind::FencedCode { .. } | BlockKind::HtmlBlock { .. }
                )
            {
                return Some((cur, through_quote));
            }
            let child = self.tree.last_child(cur)?;
            if self.tree.node(child).closed {
                return None;
            }
            if matches!(self.tree.node(child).kind, BlockKind::Blockquote) {
                through_quote = true;
            }
            cur = child;
        }
    }

    /// Feed one line (or marker remainder) to an open verbatim leaf.
    fn continue_verbatim(&mut self, leaf: NodeId, line: &str, base_col: usize) {
        match self.tree.node(leaf).kind.clone() {
            BlockKind::FencedCode {
                fence_char,
                fence_len,
                ..
            } => self.continue_fenced(leaf, line, fence_char, fence_len, base_col),
            BlockKind::HtmlBlock { kind } if kind <= 5 => {
                self.append_line(leaf, line);
                if html_block::ends_block(kind, line) {
                    self.tree.node_mut(leaf).closed = true;
                }
            }
            BlockKind::HtmlBlock { .. } => {
                if classify::is_blank(line) {
                    self.tree.node_mut(leaf).closed = true;
                } else {
                    self.append_line(leaf, line);
                }
            }
            other => unreachable!("not a verbatim leaf: {other:?}"),
        }
    }

    fn handle_blank(&mut self) {
        let mut deep = ROOT;
        while let Some(child) = self.tree.last_child(deep) {
            if self.tree.node(child).closed {
                break;
            }
            deep = child;
        }

        // Interior blank lines of indented code are content.
        if matches!(self.tree.node(deep).kind, BlockKind::IndentedCode) {
            self.append_line(deep, "");
            return;
        }

        // A blank directly after a bare list marker belongs to the list,
        // not inside the empty item.
        let c = self.cursor;
        if matches!(self.tree.node(c).kind, BlockKind::ListItem)
            && self.tree.node(c).children.is_empty()
        {
            self.tree.node_mut(c).closed = true;
            if let Some(list) = self.tree.node(c).parent {
                self.mark_maybe_loose(list);
                if let Some(grandparent) = self.tree.node(list).parent {
                    self.cursor = grandparent;
                }
            }
            return;
        }

        self.tree.close_for_blank(self.cursor);
        if let Some(list) = self.tree.enclosing_open_list(deep) {
            self.mark_maybe_loose(list);
        }
    }

    fn mark_maybe_loose(&mut self, list: NodeId) {
        if let BlockKind::List { tightness, .. } = &self.tree.node(list).kind {
            if *tightness == Tightness::Tight {
                self.set_tightness(list, Tightness::Maybe);
            }
        }
        self.pending_loose = Some(list);
    }

    /// Dispatch one line (or marker remainder) within the container
    /// `ctx`. `line` starts at absolute column `base_col`; `depth`
    /// counts markers already consumed from this physical line.
    fn process(&mut self, ctx: NodeId, line: &str, base_col: usize, depth: usize) -> NodeId {
        let mut cursor = if depth == 0 { self.cursor } else { ctx };

        // Verbatim leaves swallow their lines before reinterpretation. A
        // `>` marker aimed at an open blockquote on the way down is
        // consumed first, so the leaf receives the marker remainder.
        if let Some((leaf, through_quote)) = self.verbatim_leaf(cursor) {
            if !(through_quote && is_quote_marker(line)) {
                self.continue_verbatim(leaf, line, base_col);
                return cursor;
            }
        }

        if classify::is_blank(line) {
            self.tree.close_for_blank(cursor);
            return cursor;
        }

        let mut cls = classify::classify(line, &self.dangerous_tags);
        if depth >= limits::MAX_LINE_MARKERS
            || (matches!(cls.construct, Construct::Blockquote | Construct::ListItem { .. })
                && self.tree.depth(cursor) + 2 > limits::MAX_BLOCK_NESTING)
        {
            cls = Classification {
                construct: Construct::Text,
                marker_col: classify::leading_spaces(line),
            };
        }
        let col = base_col + cls.marker_col;

        // Does this line still belong to the current list item?
        if matches!(self.tree.node(cursor).kind, BlockKind::ListItem) {
            let innermost = self.tree.innermost_open(cursor);
            let continues_paragraph = matches!(cls.construct, Construct::Text)
                && self.tree.node(innermost).kind.is_paragraph_like()
                && !self.tree.node(innermost).closed;
            if !continues_paragraph {
                cursor = self.tree.valid_open_ancestor(cursor, col, ctx);
            }
        }

        match &cls.construct {
            Construct::Blockquote => {
                let quote = match self.reusable_blockquote(cursor) {
                    Some(q) => q,
                    None => {
                        self.close_open_paragraph(cursor);
                        self.tree.push_child(cursor, BlockKind::Blockquote, false)
                    }
                };
                // The marker plus one optional space.
                let mut eat = cls.marker_col + 1;
                if line.as_bytes().get(eat) == Some(&b' ') {
                    eat += 1;
                }
                self.tree.node_mut(quote).indent = base_col + eat;
                self.process(quote, &line[eat..], base_col + eat, depth + 1);
                cursor
            }
            Construct::ListItem {
                ordered,
                marker,
                start,
                width,
            } => {
                let (ordered, marker, start, width) = (*ordered, *marker, start.clone(), *width);
                self.add_list_item(
                    cursor, line, cls.marker_col, col, base_col, depth, ordered, marker, start,
                    width,
                )
            }
            _ => {
                self.continue_leaf(cursor, line, &cls, col);
                cursor
            }
        }
    }

    /// An open blockquote as the trailing child of `node`. One `>` marker
    /// re-enters one quote level; deeper reuse happens in the recursion.
    fn reusable_blockquote(&self, node: NodeId) -> Option<NodeId> {
        let last = self.tree.last_child(node)?;
        let n = self.tree.node(last);
        (!n.closed && matches!(n.kind, BlockKind::Blockquote)).then_some(last)
    }

    /// Close the innermost open paragraph-like leaf under `cursor`, if any.
    fn close_open_paragraph(&mut self, cursor: NodeId) {
        let innermost = self.tree.innermost_open(cursor);
        if self.tree.node(innermost).kind.is_paragraph_like() && !self.tree.node(innermost).closed {
            self.tree.node_mut(innermost).closed = true;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_list_item(
        &mut self,
        cursor: NodeId,
        line: &str,
        marker_col: usize,
        col: usize,
        base_col: usize,
        depth: usize,
        ordered: bool,
        marker: u8,
        start: String,
        width: usize,
    ) -> NodeId {
        self.close_open_paragraph(cursor);

        // Reuse the trailing list when marker kind matches, even if a
        // blank line closed it; otherwise a new list begins.
        let list = match self.tree.last_child(cursor) {
            Some(last)
                if matches!(
                    &self.tree.node(last).kind,
                    BlockKind::List { ordered: o, marker: m, .. } if *o == ordered && *m == marker
                ) =>
            {
                last
            }
            _ => self.tree.push_child(
                cursor,
                BlockKind::List {
                    ordered,
                    marker,
                    start,
                    tightness: Tightness::Tight,
                },
                false,
            ),
        };
        let item = self.tree.push_child(list, BlockKind::ListItem, false);
        self.tree.node_mut(item).indent = col + width;

        let eat = (marker_col + width).min(line.len());
        self.process(item, &line[eat..], base_col + eat, depth + 1)
    }

    fn continue_leaf(&mut self, cursor: NodeId, line: &str, cls: &Classification, col: usize) {
        let baseline = self.tree.node(cursor).indent;
        let innermost = self.tree.innermost_open(cursor);
        let innermost_open = !self.tree.node(innermost).closed;
        let rel = col.saturating_sub(baseline);

        // Over-indented text merges into (or opens) an indented code
        // block, unless a paragraph is open, which continuation text
        // always wins.
        if rel >= 4 && matches!(cls.construct, Construct::Text) {
            if self.tree.node(innermost).kind.is_paragraph_like() && innermost_open {
                // Trailing spaces stay; they may be a hard break.
                let content = line[cls.marker_col..].to_string();
                self.append_line(innermost, &content);
                return;
            }
            let strip = (baseline + 4).saturating_sub(col - cls.marker_col);
            if matches!(self.tree.node(innermost).kind, BlockKind::IndentedCode) && innermost_open {
                let content = line[strip..].to_string();
                self.append_line(innermost, &content);
                return;
            }
            let code = self.tree.push_child(cursor, BlockKind::IndentedCode, false);
            self.tree.node_mut(code).indent = baseline;
            let content = line[strip..].to_string();
            self.append_line(code, &content);
            return;
        }

        // A line back at normal indentation ends an open indented code
        // block.
        let mut innermost = innermost;
        if matches!(self.tree.node(innermost).kind, BlockKind::IndentedCode) && innermost_open {
            self.tree.node_mut(innermost).closed = true;
            innermost = self.tree.innermost_open(cursor);
        }

        let in_paragraph =
            self.tree.node(innermost).kind.is_paragraph_like() && !self.tree.node(innermost).closed;

        if matches!(cls.construct, Construct::Text) {
            if in_paragraph {
                let content = line[cls.marker_col..].to_string();
                self.append_line(innermost, &content);
            } else {
                let kind = if matches!(self.tree.node(cursor).kind, BlockKind::ListItem) {
                    BlockKind::PlainText
                } else {
                    BlockKind::Paragraph
                };
                let leaf = self.tree.push_child(cursor, kind, false);
                let content = line[cls.marker_col..].to_string();
                self.append_line(leaf, &content);
            }
            return;
        }

        // Any other construct interrupts an open paragraph; the new leaf
        // lands beside it.
        let parent = if in_paragraph {
            self.tree.node_mut(innermost).closed = true;
            self.tree.node(innermost).parent.unwrap_or(cursor)
        } else {
            cursor
        };

        match &cls.construct {
            Construct::Heading { level } => {
                let level = *level;
                let after = &line[cls.marker_col + level as usize..];
                let heading = self.tree.push_child(parent, BlockKind::Heading { level }, true);
                self.tree.node_mut(heading).text = after.trim().to_string();
            }
            Construct::ThematicBreak => {
                self.tree.push_child(parent, BlockKind::ThematicBreak, true);
            }
            Construct::FenceOpen {
                fence_char,
                fence_len,
                info,
            } => {
                let kind = BlockKind::FencedCode {
                    fence_char: *fence_char,
                    fence_len: *fence_len,
                    info: info.clone(),
                };
                let fence = self.tree.push_child(parent, kind, false);
                self.tree.node_mut(fence).indent = col;
            }
            Construct::HtmlOpen { kind } => {
                let kind = *kind;
                let block = self
                    .tree
                    .push_child(parent, BlockKind::HtmlBlock { kind }, false);
                let content = line[cls.marker_col..].to_string();
                self.append_line(block, &content);
                if kind <= 5 && html_block::ends_block(kind, line) {
                    self.tree.node_mut(block).closed = true;
                }
            }
            Construct::Blockquote | Construct::ListItem { .. } | Construct::Text => unreachable!(),
        }
    }
}

/// Whether a line carries a blockquote marker at most three columns in.
fn is_quote_marker(line: &str) -> bool {
    let ws = classify::leading_spaces(line);
    ws <= 3 && line.as_bytes().get(ws) == Some(&b'>')
}

/// Rewrite bare text lines of loose-list items as real paragraphs.
pub fn promote_loose_items(tree: &mut BlockTree) {
    for i in 0..tree.len() {
        let id = NodeId(i as u32);
        let loose = matches!(
            tree.node(id).kind,
            BlockKind::List {
                tightness: Tightness::Loose,
                ..
            }
        );
        if !loose {
            continue;
        }
        for item_idx in 0..tree.node(id).children.len() {
            let item = tree.node(id).children[item_idx];
            for child_idx in 0..tree.node(item).children.len() {
                let child = tree.node(item).children[child_idx];
                if matches!(tree.node(child).kind, BlockKind::PlainText) {
                    tree.node_mut(child).kind = BlockKind::Paragraph;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> BlockTree {
        let mut builder = TreeBuilder::new(Vec::new());
        for line in input.lines() {
            builder.feed_line(line);
        }
        builder.finish()
    }

    fn kinds_under(tree: &BlockTree, id: NodeId) -> Vec<BlockKind> {
        tree.node(id)
            .children
            .iter()
            .map(|&c| tree.node(c).kind.clone())
            .collect()
    }

    #[test]
    fn paragraph_lines_merge() {
        let tree = parse("one\ntwo");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(children.len(), 1);
        assert_eq!(tree.node(children[0]).text, "one\ntwo\n");
    }

    #[test]
    fn blank_line_splits_paragraphs() {
        let tree = parse("one\n\ntwo");
        assert_eq!(tree.node(ROOT).children.len(), 2);
    }

    #[test]
    fn heading_is_closed_immediately() {
        let tree = parse("## title\nbody");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(tree.node(children[0]).kind, BlockKind::Heading { level: 2 });
        assert_eq!(tree.node(children[0]).text, "title");
        // The following line starts a fresh paragraph.
        assert_eq!(tree.node(children[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn heading_interrupts_paragraph() {
        let tree = parse("text\n# head");
        let kinds = kinds_under(&tree, ROOT);
        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds[1], BlockKind::Heading { level: 1 });
    }

    #[test]
    fn blockquote_continuation_and_lazy_line() {
        let tree = parse("> one\n> two\nthree");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(children.len(), 1);
        let quote = children[0];
        assert_eq!(tree.node(quote).kind, BlockKind::Blockquote);
        let para = tree.node(quote).children[0];
        assert_eq!(tree.node(para).text, "one\ntwo\nthree\n");
    }

    #[test]
    fn nested_blockquotes_reuse_open_quote() {
        let tree = parse("> > deep\n> > more");
        let outer = tree.node(ROOT).children[0];
        let inner = tree.node(outer).children[0];
        assert_eq!(tree.node(inner).kind, BlockKind::Blockquote);
        let para = tree.node(inner).children[0];
        assert_eq!(tree.node(para).text, "deep\nmore\n");
    }

    #[test]
    fn fenced_code_swallows_markers() {
        let tree = parse("```rust\n> not a quote\n# not a heading\n```\nafter");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(children.len(), 2);
        match &tree.node(children[0]).kind {
            BlockKind::FencedCode { info, .. } => assert_eq!(info, "rust"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(tree.node(children[0]).text, "> not a quote\n# not a heading\n");
    }

    #[test]
    fn short_closing_fence_is_content() {
        let tree = parse("````\n```\n````");
        let fence = tree.node(ROOT).children[0];
        assert_eq!(tree.node(fence).text, "```\n");
        assert!(tree.node(fence).closed);
    }

    #[test]
    fn list_items_collect_under_one_list() {
        let tree = parse("- a\n- b");
        let list = tree.node(ROOT).children[0];
        match &tree.node(list).kind {
            BlockKind::List {
                ordered, tightness, ..
            } => {
                assert!(!ordered);
                assert_eq!(*tightness, Tightness::Tight);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(tree.node(list).children.len(), 2);
        let item = tree.node(list).children[0];
        let text = tree.node(item).children[0];
        assert_eq!(tree.node(text).kind, BlockKind::PlainText);
    }

    #[test]
    fn changed_marker_starts_new_list() {
        let tree = parse("- a\n+ b");
        let kinds = kinds_under(&tree, ROOT);
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[1], BlockKind::List { marker: b'+', .. }));
    }

    #[test]
    fn blank_between_items_makes_list_loose() {
        let tree = parse("- a\n\n- b");
        let list = tree.node(ROOT).children[0];
        match &tree.node(list).kind {
            BlockKind::List { tightness, .. } => assert_eq!(*tightness, Tightness::Loose),
            other => panic!("unexpected {other:?}"),
        }
        // Loose lists carry real paragraphs.
        let item = tree.node(list).children[0];
        let para = tree.node(item).children[0];
        assert_eq!(tree.node(para).kind, BlockKind::Paragraph);
    }

    #[test]
    fn trailing_blank_keeps_list_tight() {
        let tree = parse("- a\n- b\n\npara");
        let list = tree.node(ROOT).children[0];
        match &tree.node(list).kind {
            BlockKind::List { tightness, .. } => assert_eq!(*tightness, Tightness::Tight),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nested_list_from_indent() {
        let tree = parse("- a\n  - b");
        let list = tree.node(ROOT).children[0];
        let item = tree.node(list).children[0];
        let kinds = kinds_under(&tree, item);
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[1], BlockKind::List { .. }));
    }

    #[test]
    fn dedented_line_leaves_item() {
        let tree = parse("- a\n# h");
        let kinds = kinds_under(&tree, ROOT);
        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds[1], BlockKind::Heading { level: 1 });
    }

    #[test]
    fn paragraph_continuation_stays_in_item() {
        let tree = parse("- item\ncontinued");
        let list = tree.node(ROOT).children[0];
        let item = tree.node(list).children[0];
        let text = tree.node(item).children[0];
        assert_eq!(tree.node(text).text, "item\ncontinued\n");
    }

    #[test]
    fn ordered_list_keeps_start_numeral() {
        let tree = parse("3) x\n4) y");
        let list = tree.node(ROOT).children[0];
        match &tree.node(list).kind {
            BlockKind::List { ordered, start, .. } => {
                assert!(ordered);
                assert_eq!(start, "3");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn indented_code_collects_and_strips() {
        let tree = parse("    let x = 1;\n      indented more\nback");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(children.len(), 2);
        assert_eq!(tree.node(children[0]).kind, BlockKind::IndentedCode);
        assert_eq!(tree.node(children[0]).text, "let x = 1;\n  indented more\n");
        assert_eq!(tree.node(children[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn indented_code_keeps_interior_blank() {
        let tree = parse("    a\n\n    b");
        let code = tree.node(ROOT).children[0];
        assert_eq!(tree.node(code).text, "a\n\nb\n");
    }

    #[test]
    fn paragraph_wins_over_indented_code() {
        let tree = parse("text\n    still the paragraph");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(children.len(), 1);
        assert_eq!(tree.node(children[0]).text, "text\nstill the paragraph\n");
    }

    #[test]
    fn html_comment_block_closes_on_terminator() {
        let tree = parse("<!-- a\nb -->\nafter");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(children.len(), 2);
        assert_eq!(tree.node(children[0]).kind, BlockKind::HtmlBlock { kind: 1 });
        assert_eq!(tree.node(children[0]).text, "<!-- a\nb -->\n");
    }

    #[test]
    fn html_block_tag_runs_to_blank_line() {
        let tree = parse("<div>\ncontent\n\nafter");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(tree.node(children[0]).kind, BlockKind::HtmlBlock { kind: 6 });
        assert_eq!(tree.node(children[0]).text, "<div>\ncontent\n");
        assert_eq!(tree.node(children[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn marker_flood_degrades_to_text() {
        let mut line = String::new();
        for _ in 0..(limits::MAX_LINE_MARKERS + 8) {
            line.push_str("> ");
        }
        line.push('x');
        // Must not overflow the stack or the tree depth limit.
        let tree = parse(&line);
        assert!(tree.len() > 1);
    }

    #[test]
    fn fence_inside_blockquote_closes() {
        let tree = parse("> ```\n> code\n> ```\n\nafter");
        let children = tree.node(ROOT).children.clone();
        assert_eq!(children.len(), 2);
        let quote = children[0];
        let fence = tree.node(quote).children[0];
        assert!(matches!(tree.node(fence).kind, BlockKind::FencedCode { .. }));
        // Quote markers are consumed, not captured as content.
        assert_eq!(tree.node(fence).text, "code\n");
        assert!(tree.node(fence).closed);
        assert_eq!(tree.node(children[1]).kind, BlockKind::Paragraph);
    }

    #[test]
    fn html_comment_inside_blockquote_closes() {
        let tree = parse("> <!-- a\n> b -->\n> tail");
        let quote = tree.node(ROOT).children[0];
        let kinds = kinds_under(&tree, quote);
        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds[0], BlockKind::HtmlBlock { kind: 1 });
        let block = tree.node(quote).children[0];
        assert_eq!(tree.node(block).text, "<!-- a\nb -->\n");
        assert_eq!(kinds[1], BlockKind::Paragraph);
    }

    #[test]
    fn fence_inside_nested_blockquote() {
        let tree = parse("> > ```\n> > x\n> > ```");
        let outer = tree.node(ROOT).children[0];
        let inner = tree.node(outer).children[0];
        let fence = tree.node(inner).children[0];
        assert_eq!(tree.node(fence).text, "x\n");
        assert!(tree.node(fence).closed);
    }

    #[test]
    fn blockquote_inside_list_item() {
        let tree = parse("- a\n  > quoted");
        let list = tree.node(ROOT).children[0];
        let item = tree.node(list).children[0];
        let kinds = kinds_under(&tree, item);
        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds[1], BlockKind::Blockquote);
    }
}
