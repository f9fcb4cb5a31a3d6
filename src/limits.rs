//! DoS prevention constants.
//!
//! These limits keep pathological inputs (thousands of nested `>` markers,
//! kilometer-long backtick runs) from overflowing the stack or causing
//! quadratic time. Inputs past a limit degrade to plain text.

/// Maximum nesting depth for block containers (lists, blockquotes).
///
/// The builder refuses to open containers past this depth, so the render
/// and link-reference walks recurse at most this deep.
pub const MAX_BLOCK_NESTING: usize = 64;

/// Maximum container markers consumed from a single line.
pub const MAX_LINE_MARKERS: usize = 64;

/// Maximum number of inline tokens per leaf.
pub const MAX_INLINE_TOKENS: usize = 16384;

/// Maximum backtick run length recognized as a code span delimiter.
/// Longer runs are treated as literal text.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum parentheses nesting in inline link destinations.
pub const MAX_LINK_PAREN_DEPTH: usize = 32;

/// Maximum autolink scheme length, counting the leading letter.
pub const MAX_AUTOLINK_SCHEME_LEN: usize = 33;

/// Maximum link reference label length (CommonMark: 999).
pub const MAX_LABEL_LEN: usize = 999;

/// Maximum digits in an ordered list marker.
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum emphasis peel iterations for one opener/closer pair.
pub const MAX_EMPHASIS_PEELS: usize = 128;
