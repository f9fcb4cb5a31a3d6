//! Block-structure stage: line classification and tree construction.

pub mod builder;
pub mod classify;
pub mod html_block;
pub mod tree;

pub use builder::TreeBuilder;
pub use tree::{BlockKind, BlockNode, BlockTree, NodeId, ROOT, Tightness};
