//! Block tree to HTML serialization.
//!
//! Recursive descent, two spaces of indentation per nesting level, one
//! newline per emitted element. Leaf text goes through the inline
//! pipeline exactly once, here. Code leaves are entity-escaped instead.
//! Recursion depth is bounded because the builder caps container
//! nesting.

use crate::block::{BlockKind, BlockTree, NodeId, ROOT};
use crate::escape;
use crate::inline;
use crate::link_ref::LinkRefStore;
use crate::table::{self, Table};

pub fn render(tree: &BlockTree, refs: &LinkRefStore, dangerous_tags: &[String]) -> String {
    let mut r = Renderer {
        tree,
        refs,
        dangerous_tags,
        out: String::new(),
    };
    for &child in &tree.node(ROOT).children {
        r.render_node(child, 0);
    }
    r.out
}

struct Renderer<'a> {
    tree: &'a BlockTree,
    refs: &'a LinkRefStore,
    dangerous_tags: &'a [String],
    out: String,
}

impl Renderer<'_> {
    fn render_node(&mut self, id: NodeId, depth: usize) {
        let node = self.tree.node(id);
        match &node.kind {
            BlockKind::Document => {
                for &child in &node.children {
                    self.render_node(child, depth);
                }
            }
            BlockKind::Heading { level } => {
                let content = self.inline(node.text.trim());
                self.indent(depth);
                self.out.push_str(&format!("<h{level}>{content}</h{level}>\n"));
            }
            BlockKind::Paragraph => self.render_paragraph(id, depth),
            BlockKind::PlainText => {
                let text = node.text.trim();
                if text.is_empty() {
                    return;
                }
                let content = self.inline(text);
                self.indent(depth);
                self.out.push_str(&content);
                self.out.push('\n');
            }
            BlockKind::ThematicBreak => {
                self.indent(depth);
                self.out.push_str("<hr/>\n");
            }
            BlockKind::IndentedCode => {
                // Interior blank lines stay; trailing ones do not.
                let text = node.text.trim_end_matches('\n');
                self.indent(depth);
                self.out.push_str("<pre><code>");
                escape::escape_code_into(&mut self.out, text);
                if !text.is_empty() {
                    self.out.push('\n');
                }
                self.out.push_str("</code></pre>\n");
            }
            BlockKind::FencedCode { info, .. } => {
                self.indent(depth);
                match info.split_whitespace().next() {
                    Some(lang) => {
                        self.out.push_str("<pre><code class=\"language-");
                        escape::escape_attr_into(&mut self.out, lang);
                        self.out.push_str("\">");
                    }
                    None => self.out.push_str("<pre><code>"),
                }
                escape::escape_code_into(&mut self.out, &node.text);
                self.out.push_str("</code></pre>\n");
            }
            BlockKind::HtmlBlock { .. } => {
                self.out.push_str(&node.text);
            }
            BlockKind::Blockquote => {
                self.indent(depth);
                self.out.push_str("<blockquote>\n");
                for &child in &node.children {
                    self.render_node(child, depth + 1);
                }
                self.indent(depth);
                self.out.push_str("</blockquote>\n");
            }
            BlockKind::List { ordered, start, .. } => {
                self.indent(depth);
                if *ordered {
                    self.out.push_str(&format!("<ol start=\"{start}\">\n"));
                } else {
                    self.out.push_str("<ul>\n");
                }
                for &child in &node.children {
                    self.render_node(child, depth + 1);
                }
                self.indent(depth);
                if *ordered {
                    self.out.push_str("</ol>\n");
                } else {
                    self.out.push_str("</ul>\n");
                }
            }
            BlockKind::ListItem => self.render_list_item(id, depth),
        }
    }

    fn render_paragraph(&mut self, id: NodeId, depth: usize) {
        let node = self.tree.node(id);
        let text = node.text.trim();
        // Consumed entirely by link reference extraction.
        if text.is_empty() {
            return;
        }
        if let Some(t) = table::try_parse(&node.text) {
            self.render_table(&t, depth);
            return;
        }
        let content = self.inline(text);
        self.indent(depth);
        self.out.push_str("<p>");
        self.out.push_str(&content);
        self.out.push_str("</p>\n");
    }

    fn render_list_item(&mut self, id: NodeId, depth: usize) {
        let node = self.tree.node(id);

        // A single short text line renders on one line with its tags.
        if let [only] = node.children.as_slice() {
            let child = self.tree.node(*only);
            if matches!(child.kind, BlockKind::PlainText) && !child.text.trim().contains('\n') {
                let content = self.inline(child.text.trim());
                self.indent(depth);
                self.out.push_str("<li>");
                self.out.push_str(&content);
                self.out.push_str("</li>\n");
                return;
            }
        }

        self.indent(depth);
        self.out.push_str("<li>\n");
        for &child in &node.children {
            self.render_node(child, depth + 1);
        }
        self.indent(depth);
        self.out.push_str("</li>\n");
    }

    fn render_table(&mut self, t: &Table, depth: usize) {
        self.indent(depth);
        self.out.push_str("<table>\n");
        self.indent(depth + 1);
        self.out.push_str("<thead>\n");
        self.render_table_row(&t.header, &t.alignments, "th", depth + 2);
        self.indent(depth + 1);
        self.out.push_str("</thead>\n");
        if !t.rows.is_empty() {
            self.indent(depth + 1);
            self.out.push_str("<tbody>\n");
            for row in &t.rows {
                self.render_table_row(row, &t.alignments, "td", depth + 2);
            }
            self.indent(depth + 1);
            self.out.push_str("</tbody>\n");
        }
        self.indent(depth);
        self.out.push_str("</table>\n");
    }

    fn render_table_row(
        &mut self,
        cells: &[String],
        alignments: &[crate::table::Alignment],
        tag: &str,
        depth: usize,
    ) {
        self.indent(depth);
        self.out.push_str("<tr>\n");
        for (cell, align) in cells.iter().zip(alignments) {
            let content = self.inline(cell);
            self.indent(depth + 1);
            match align.attr() {
                Some(a) => self
                    .out
                    .push_str(&format!("<{tag} align=\"{a}\">{content}</{tag}>\n")),
                None => self.out.push_str(&format!("<{tag}>{content}</{tag}>\n")),
            }
        }
        self.indent(depth);
        self.out.push_str("</tr>\n");
    }

    fn inline(&self, text: &str) -> String {
        inline::parse_inline(text, self.refs, self.dangerous_tags)
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }
}
