//! Arena-backed block tree.
//!
//! Parent/child links are plain indices into one `Vec`, sidestepping
//! ownership cycles: the parent back-reference is navigational only, and
//! mutation during tree walks never invalidates other node handles.

/// Handle to a node in a [`BlockTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tight/loose status of a list, resolved at list close.
///
/// `Maybe` means a blank line was seen inside the list but no further
/// content has confirmed looseness yet; it finalizes to `Tight` at end of
/// input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tightness {
    Tight,
    Loose,
    Maybe,
}

/// Block-level construct kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    Document,
    Heading {
        level: u8,
    },
    Paragraph,
    /// A text line directly inside a tight list item (no `<p>` wrapper).
    /// Promoted to `Paragraph` when the enclosing list turns out loose.
    PlainText,
    ThematicBreak,
    IndentedCode,
    FencedCode {
        fence_char: u8,
        fence_len: usize,
        info: String,
    },
    /// Raw HTML block; `kind` is the numbered start/end condition:
    /// 1 comment, 2 processing instruction, 3 CDATA, 4 declaration,
    /// 5 raw-text element, 6 known block-level tag, 7 any other tag.
    HtmlBlock {
        kind: u8,
    },
    Blockquote,
    List {
        ordered: bool,
        marker: u8,
        start: String,
        tightness: Tightness,
    },
    ListItem,
}

impl BlockKind {
    /// Leaf kinds that accumulate text across multiple lines.
    pub fn is_multiline_leaf(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::PlainText
                | BlockKind::HtmlBlock { .. }
                | BlockKind::FencedCode { .. }
                | BlockKind::IndentedCode
        )
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockKind::Document
                | BlockKind::Blockquote
                | BlockKind::List { .. }
                | BlockKind::ListItem
        )
    }

    pub fn is_paragraph_like(&self) -> bool {
        matches!(self, BlockKind::Paragraph | BlockKind::PlainText)
    }
}

/// One node of the block tree.
#[derive(Debug)]
pub struct BlockNode {
    pub kind: BlockKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Accumulated raw text (leaf nodes only).
    pub text: String,
    /// Permanent once set.
    pub closed: bool,
    /// Indentation baseline: the column nested content must align to.
    pub indent: usize,
}

/// The document tree. Node 0 is always the document root.
#[derive(Debug)]
pub struct BlockTree {
    nodes: Vec<BlockNode>,
}

pub const ROOT: NodeId = NodeId(0);

impl BlockTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![BlockNode {
                kind: BlockKind::Document,
                parent: None,
                children: Vec::new(),
                text: String::new(),
                closed: false,
                indent: 0,
            }],
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &BlockNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut BlockNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the root always exists
    }

    /// Append a new child node under `parent`.
    pub fn push_child(&mut self, parent: NodeId, kind: BlockKind, closed: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(BlockNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            text: String::new(),
            closed,
            indent: 0,
        });
        self.node_mut(parent).children.push(id);
        id
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    /// Nesting depth of `id` below the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = id;
        while let Some(parent) = self.node(cur).parent {
            depth += 1;
            cur = parent;
        }
        depth
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if node == ancestor {
                return true;
            }
            cur = self.node(node).parent;
        }
        false
    }

    /// Walk parent links from `node`, closing every node left behind,
    /// until reaching `root` or a list item whose baseline admits `col`.
    pub fn valid_open_ancestor(&mut self, node: NodeId, col: usize, root: NodeId) -> NodeId {
        let mut cur = node;
        loop {
            if cur == root {
                return cur;
            }
            let n = self.node(cur);
            if matches!(n.kind, BlockKind::ListItem) && !n.closed && n.indent <= col {
                return cur;
            }
            let parent = n.parent.unwrap_or(root);
            self.node_mut(cur).closed = true;
            cur = parent;
        }
    }

    /// Descend the open last-child chain from `node`.
    ///
    /// Returns the deepest open multi-line leaf if the chain ends in one,
    /// otherwise `node` itself. Continuation content is appended to the
    /// returned leaf; anything else is created under `node`.
    pub fn innermost_open(&self, node: NodeId) -> NodeId {
        let mut cur = node;
        loop {
            let Some(last) = self.last_child(cur) else {
                return node;
            };
            let n = self.node(last);
            if n.closed {
                return node;
            }
            if n.kind.is_multiline_leaf() {
                return last;
            }
            if n.kind.is_container() {
                cur = last;
                continue;
            }
            return node;
        }
    }

    /// Blank-line close: find the deepest open node under `node` and close
    /// the first closeable paragraph, html block, or blockquote there.
    ///
    /// Closing a blockquote transitively closes everything nested inside
    /// it (its children are never independently reopened). Indented code
    /// is left open so later indented lines can merge; fenced code and
    /// html block types 1-5 have their own end conditions and are handled
    /// by the builder before this is called.
    pub fn close_for_blank(&mut self, node: NodeId) {
        let mut cur = node;
        // Deepest open node on the last-child chain.
        loop {
            let Some(last) = self.last_child(cur) else {
                break;
            };
            let n = self.node(last);
            if n.closed {
                break;
            }
            cur = last;
        }
        loop {
            let closeable = match &self.node(cur).kind {
                BlockKind::Paragraph | BlockKind::PlainText | BlockKind::Blockquote => true,
                BlockKind::HtmlBlock { kind } => *kind >= 6,
                _ => false,
            };
            if closeable {
                self.node_mut(cur).closed = true;
                return;
            }
            if cur == node {
                return;
            }
            match self.node(cur).parent {
                Some(parent) => cur = parent,
                None => return,
            }
        }
    }

    /// Nearest open `List` ancestor of `id`, if any.
    pub fn enclosing_open_list(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(node) = cur {
            let n = self.node(node);
            if matches!(n.kind, BlockKind::List { .. }) && !n.closed {
                return Some(node);
            }
            cur = n.parent;
        }
        None
    }
}

impl Default for BlockTree {
    fn default() -> Self {
        Self::new()
    }
}
