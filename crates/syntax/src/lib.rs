//! Generic ESTree-shaped syntax trees.
//!
//! The analysis core does not parse JavaScript itself. An external parser
//! hands over a tree in the generic ESTree shape: every node has a `type`
//! tag, a byte range, an optional pre-computed `loc`, and type-specific
//! child fields. Which fields of a node are children is described by a
//! [`VisitorKeys`] table supplied alongside the tree, which is what lets a
//! single traversal work over any node kind without a per-kind `match`.
//!
//! [`SourceFile`] ties a tree to its original source text and line index;
//! all locations reported by rules resolve against that index, never
//! against a derived tree.

mod keys;
mod node;
mod source;
mod walk;

pub use keys::VisitorKeys;
pub use node::{AstNode, FieldValue, OffsetRange, Position, SourceLocation};
pub use source::{LineIndex, SourceFile, SyntaxError};
pub use walk::{walk, WalkEvent};
