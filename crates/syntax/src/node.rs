use crate::keys::VisitorKeys;
use crate::source::LineIndex;
use serde::{Deserialize, Serialize};

/// Byte offset range in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl std::fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl OffsetRange {
    /// Create a new offset range
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at an offset
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `other` lies entirely within this range
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A position in a source file.
///
/// Lines are 1-based, columns are 0-based byte offsets within the line,
/// matching the convention of the upstream parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Start and end positions of a node in the original source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A location that has not been resolved yet. Line numbers are 1-based,
    /// so line 0 can never be produced by a line index.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.start.line == 0
    }
}

/// One named slot of an AST node: either a scalar attribute or a child
/// node (list). Selector attribute predicates match against the scalar
/// variants; traversal descends into the node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Node(Box<AstNode>),
    List(Vec<AstNode>),
}

impl FieldValue {
    /// Whether this slot holds child node(s)
    #[must_use]
    pub const fn is_node_valued(&self) -> bool {
        matches!(self, Self::Node(_) | Self::List(_))
    }
}

/// An immutable tree node with a discriminated `kind` tag, a byte range,
/// a resolved source location, and ordered named fields.
///
/// Nodes are owned by the [`crate::SourceFile`] they were parsed into and
/// are never mutated after load; rules only ever see `&AstNode`.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    kind: String,
    range: OffsetRange,
    loc: SourceLocation,
    fields: Vec<(String, FieldValue)>,
}

impl AstNode {
    #[must_use]
    pub fn new(kind: impl Into<String>, range: OffsetRange) -> Self {
        Self {
            kind: kind.into(),
            range,
            loc: SourceLocation::default(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_loc(mut self, loc: SourceLocation) -> Self {
        self.loc = loc;
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn with_child(self, name: impl Into<String>, child: Self) -> Self {
        self.with_field(name, FieldValue::Node(Box::new(child)))
    }

    #[must_use]
    pub fn with_list(self, name: impl Into<String>, children: Vec<Self>) -> Self {
        self.with_field(name, FieldValue::List(children))
    }

    #[must_use]
    pub fn with_str(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_field(name, FieldValue::Str(value.into()))
    }

    #[must_use]
    pub fn with_num(self, name: impl Into<String>, value: f64) -> Self {
        self.with_field(name, FieldValue::Number(value))
    }

    #[must_use]
    pub fn with_bool(self, name: impl Into<String>, value: bool) -> Self {
        self.with_field(name, FieldValue::Bool(value))
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub const fn range(&self) -> OffsetRange {
        self.range
    }

    #[must_use]
    pub const fn loc(&self) -> SourceLocation {
        self.loc
    }

    /// All fields in declared order
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        match self.get(name) {
            Some(FieldValue::Node(node)) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[Self]> {
        match self.get(name) {
            Some(FieldValue::List(nodes)) => Some(nodes),
            _ => None,
        }
    }

    #[must_use]
    pub fn str_value(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn num_value(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn bool_value(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(FieldValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Child nodes in traversal order.
    ///
    /// When the visitor-keys table knows this kind, children come from the
    /// listed fields in listed order; unknown kinds fall back to every
    /// node-valued field in declared order, so traversal stays total even
    /// for dialect-specific nodes.
    #[must_use]
    pub fn child_nodes<'a>(&'a self, keys: &VisitorKeys) -> Vec<&'a Self> {
        let mut children = Vec::new();
        if let Some(names) = keys.keys_for(&self.kind) {
            for name in names {
                self.push_children_of(name, &mut children);
            }
        } else {
            for (name, value) in &self.fields {
                if value.is_node_valued() {
                    self.push_children_of(name, &mut children);
                }
            }
        }
        children
    }

    fn push_children_of<'a>(&'a self, name: &str, out: &mut Vec<&'a Self>) {
        match self.get(name) {
            Some(FieldValue::Node(node)) => out.push(node),
            Some(FieldValue::List(nodes)) => out.extend(nodes.iter()),
            _ => {}
        }
    }

    /// Fill in locations from byte ranges for every node that did not get
    /// a pre-computed `loc` from the parser.
    pub(crate) fn normalize_locations(&mut self, index: &LineIndex) {
        if self.loc.is_unset() {
            self.loc = SourceLocation::new(
                index.position(self.range.start),
                index.position(self.range.end),
            );
        }
        for (_, value) in &mut self.fields {
            match value {
                FieldValue::Node(node) => node.normalize_locations(index),
                FieldValue::List(nodes) => {
                    for node in nodes {
                        node.normalize_locations(index);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_range_contains() {
        let outer = OffsetRange::new(0, 10);
        assert!(outer.contains(OffsetRange::new(2, 5)));
        assert!(!outer.contains(OffsetRange::new(5, 11)));
        assert_eq!(OffsetRange::at(3).len(), 0);
    }

    #[test]
    fn field_access() {
        let node = AstNode::new("UnaryExpression", OffsetRange::new(0, 6))
            .with_str("operator", "void")
            .with_bool("prefix", true)
            .with_child("argument", AstNode::new("Identifier", OffsetRange::new(5, 6)));

        assert_eq!(node.kind(), "UnaryExpression");
        assert_eq!(node.str_value("operator"), Some("void"));
        assert_eq!(node.bool_value("prefix"), Some(true));
        assert_eq!(node.child("argument").map(AstNode::kind), Some("Identifier"));
        assert!(node.get("missing").is_none());
    }

    #[test]
    fn child_nodes_follow_visitor_keys_order() {
        // Declare fields out of traversal order on purpose.
        let node = AstNode::new("IfStatement", OffsetRange::new(0, 10))
            .with_child("consequent", AstNode::new("BlockStatement", OffsetRange::new(7, 9)))
            .with_child("test", AstNode::new("Identifier", OffsetRange::new(4, 5)));

        let keys = VisitorKeys::estree();
        let children = node.child_nodes(&keys);
        let kinds: Vec<_> = children.iter().map(|child| child.kind()).collect();
        assert_eq!(kinds, vec!["Identifier", "BlockStatement"]);
    }

    #[test]
    fn child_nodes_fall_back_to_declared_order_for_unknown_kinds() {
        let node = AstNode::new("SomeDialectNode", OffsetRange::new(0, 4))
            .with_child("b", AstNode::new("Identifier", OffsetRange::new(0, 1)))
            .with_str("name", "x")
            .with_list("a", vec![AstNode::new("Literal", OffsetRange::new(2, 3))]);

        let keys = VisitorKeys::estree();
        let kinds: Vec<_> = node
            .child_nodes(&keys)
            .iter()
            .map(|child| child.kind())
            .collect();
        assert_eq!(kinds, vec!["Identifier", "Literal"]);
    }
}
