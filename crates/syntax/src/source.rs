use crate::keys::VisitorKeys;
use crate::node::{AstNode, FieldValue, OffsetRange, Position, SourceLocation};
use serde_json::Value;
use thiserror::Error;

/// Errors at the parser boundary
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("invalid parser output JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parser output: {0}")]
    Malformed(String),
}

/// Line-start offset table for a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// Resolve a byte offset into a 1-based line and 0-based column
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        // First index whose line start is past the offset; the offset's own
        // line is the one before, and line_starts[0] == 0 so this is >= 1.
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let column = offset - self.line_starts[line - 1];
        Position::new(line as u32, column as u32)
    }

    #[must_use]
    pub fn location(&self, range: OffsetRange) -> SourceLocation {
        SourceLocation::new(self.position(range.start), self.position(range.end))
    }
}

/// One analyzed file: original text, its line index, the visitor-keys
/// table the parser shipped, and the parsed tree when parsing succeeded.
///
/// A file without a tree is a legitimate state (the upstream parse
/// failed); the execution driver performs zero traversal over it and
/// emits zero issues rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    path: String,
    text: String,
    line_index: LineIndex,
    visitor_keys: VisitorKeys,
    ast: Option<AstNode>,
}

impl SourceFile {
    /// Wrap an already-built tree. Nodes missing a pre-computed `loc` get
    /// one resolved from their byte range against the line index.
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        text: impl Into<String>,
        ast: AstNode,
        visitor_keys: VisitorKeys,
    ) -> Self {
        Self::build(path, text, Some(ast), visitor_keys)
    }

    /// A file whose upstream parse failed
    #[must_use]
    pub fn without_ast(
        path: impl Into<String>,
        text: impl Into<String>,
        visitor_keys: VisitorKeys,
    ) -> Self {
        Self::build(path, text, None, visitor_keys)
    }

    /// Load the tree from the external parser's ESTree JSON output.
    pub fn from_parser_output(
        path: impl Into<String>,
        text: impl Into<String>,
        ast_json: &str,
        visitor_keys: VisitorKeys,
    ) -> Result<Self, SyntaxError> {
        let value: Value = serde_json::from_str(ast_json)?;
        let root = node_from_value(&value)?;
        Ok(Self::new(path, text, root, visitor_keys))
    }

    fn build(
        path: impl Into<String>,
        text: impl Into<String>,
        mut ast: Option<AstNode>,
        visitor_keys: VisitorKeys,
    ) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        if let Some(root) = &mut ast {
            root.normalize_locations(&line_index);
        }
        Self {
            path: path.into(),
            text,
            line_index,
            visitor_keys,
            ast,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn ast(&self) -> Option<&AstNode> {
        self.ast.as_ref()
    }

    #[must_use]
    pub const fn visitor_keys(&self) -> &VisitorKeys {
        &self.visitor_keys
    }

    #[must_use]
    pub const fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        self.line_index.position(offset)
    }

    /// The source text slice a range covers, if it is in bounds on a
    /// character boundary
    #[must_use]
    pub fn snippet(&self, range: OffsetRange) -> Option<&str> {
        self.text.get(range.start..range.end)
    }
}

// Fields every ESTree node carries that are not analysis content.
const RESERVED_FIELDS: &[&str] = &["type", "range", "start", "end", "loc", "parent"];

fn node_from_value(value: &Value) -> Result<AstNode, SyntaxError> {
    let object = value
        .as_object()
        .ok_or_else(|| SyntaxError::Malformed("AST node is not a JSON object".to_owned()))?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| SyntaxError::Malformed("AST node has no `type` tag".to_owned()))?;

    let range = range_from_object(object);
    let mut node = AstNode::new(kind, range);
    if let Some(loc) = object.get("loc").and_then(loc_from_value) {
        node = node.with_loc(loc);
    }

    for (name, field) in object {
        if RESERVED_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if let Some(value) = field_from_value(field)? {
            node = node.with_field(name.clone(), value);
        }
    }
    Ok(node)
}

fn field_from_value(value: &Value) -> Result<Option<FieldValue>, SyntaxError> {
    match value {
        Value::Null => Ok(Some(FieldValue::Null)),
        Value::Bool(flag) => Ok(Some(FieldValue::Bool(*flag))),
        Value::Number(number) => Ok(number.as_f64().map(FieldValue::Number)),
        Value::String(text) => Ok(Some(FieldValue::Str(text.clone()))),
        Value::Object(object) => {
            if object.contains_key("type") {
                Ok(Some(FieldValue::Node(Box::new(node_from_value(value)?))))
            } else {
                // Parser-specific extras (regex descriptors and the like)
                // carry no tree structure; they are not fields.
                Ok(None)
            }
        }
        Value::Array(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for item in items {
                // Array holes (sparse array literals) appear as nulls.
                if !item.is_null() {
                    nodes.push(node_from_value(item)?);
                }
            }
            Ok(Some(FieldValue::List(nodes)))
        }
    }
}

fn range_from_object(object: &serde_json::Map<String, Value>) -> OffsetRange {
    if let Some(items) = object.get("range").and_then(Value::as_array) {
        if let (Some(start), Some(end)) = (
            items.first().and_then(Value::as_u64),
            items.get(1).and_then(Value::as_u64),
        ) {
            return OffsetRange::new(start as usize, end as usize);
        }
    }
    if let (Some(start), Some(end)) = (
        object.get("start").and_then(Value::as_u64),
        object.get("end").and_then(Value::as_u64),
    ) {
        return OffsetRange::new(start as usize, end as usize);
    }
    OffsetRange::default()
}

fn loc_from_value(value: &Value) -> Option<SourceLocation> {
    let position = |value: &Value| -> Option<Position> {
        let line = value.get("line")?.as_u64()?;
        let column = value.get("column")?.as_u64()?;
        Some(Position::new(line as u32, column as u32))
    };
    Some(SourceLocation::new(
        position(value.get("start")?)?,
        position(value.get("end")?)?,
    ))
}
