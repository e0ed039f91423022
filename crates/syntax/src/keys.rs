use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-kind child field names, in traversal order.
///
/// The table mirrors the `visitorKeys` map the external parser ships with
/// its AST: it tells the generic traversal which fields of a node are
/// children without a hand-written switch per node kind. Kinds missing
/// from the table fall back to every node-valued field in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorKeys {
    keys: HashMap<String, Vec<String>>,
}

impl VisitorKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_map(keys: HashMap<String, Vec<String>>) -> Self {
        Self { keys }
    }

    pub fn insert(&mut self, kind: impl Into<String>, fields: Vec<String>) {
        self.keys.insert(kind.into(), fields);
    }

    #[must_use]
    pub fn keys_for(&self, kind: &str) -> Option<&[String]> {
        self.keys.get(kind).map(Vec::as_slice)
    }

    /// The ESTree defaults for the node kinds the core and the built-in
    /// rules traverse. Parsers with a richer dialect are expected to send
    /// their own table; this one keeps tests and plain-JS analysis going.
    #[must_use]
    pub fn estree() -> Self {
        let table: &[(&str, &[&str])] = &[
            ("Program", &["body"]),
            ("ExpressionStatement", &["expression"]),
            ("BlockStatement", &["body"]),
            ("EmptyStatement", &[]),
            ("IfStatement", &["test", "consequent", "alternate"]),
            ("LabeledStatement", &["label", "body"]),
            ("BreakStatement", &["label"]),
            ("ContinueStatement", &["label"]),
            ("WithStatement", &["object", "body"]),
            ("SwitchStatement", &["discriminant", "cases"]),
            ("SwitchCase", &["test", "consequent"]),
            ("ReturnStatement", &["argument"]),
            ("ThrowStatement", &["argument"]),
            ("TryStatement", &["block", "handler", "finalizer"]),
            ("CatchClause", &["param", "body"]),
            ("WhileStatement", &["test", "body"]),
            ("DoWhileStatement", &["body", "test"]),
            ("ForStatement", &["init", "test", "update", "body"]),
            ("ForInStatement", &["left", "right", "body"]),
            ("ForOfStatement", &["left", "right", "body"]),
            ("FunctionDeclaration", &["id", "params", "body"]),
            ("FunctionExpression", &["id", "params", "body"]),
            ("ArrowFunctionExpression", &["params", "body"]),
            ("VariableDeclaration", &["declarations"]),
            ("VariableDeclarator", &["id", "init"]),
            ("Identifier", &[]),
            ("PrivateIdentifier", &[]),
            ("Literal", &[]),
            ("TemplateLiteral", &["quasis", "expressions"]),
            ("TemplateElement", &[]),
            ("TaggedTemplateExpression", &["tag", "quasi"]),
            ("ThisExpression", &[]),
            ("ArrayExpression", &["elements"]),
            ("ObjectExpression", &["properties"]),
            ("Property", &["key", "value"]),
            ("SpreadElement", &["argument"]),
            ("UnaryExpression", &["argument"]),
            ("UpdateExpression", &["argument"]),
            ("BinaryExpression", &["left", "right"]),
            ("LogicalExpression", &["left", "right"]),
            ("AssignmentExpression", &["left", "right"]),
            ("ConditionalExpression", &["test", "consequent", "alternate"]),
            ("CallExpression", &["callee", "arguments"]),
            ("NewExpression", &["callee", "arguments"]),
            ("MemberExpression", &["object", "property"]),
            ("SequenceExpression", &["expressions"]),
            ("AwaitExpression", &["argument"]),
            ("YieldExpression", &["argument"]),
            ("ChainExpression", &["expression"]),
            ("ClassDeclaration", &["id", "superClass", "body"]),
            ("ClassExpression", &["id", "superClass", "body"]),
            ("ClassBody", &["body"]),
            ("MethodDefinition", &["key", "value"]),
            ("PropertyDefinition", &["key", "value"]),
            ("StaticBlock", &["body"]),
            ("RestElement", &["argument"]),
            ("AssignmentPattern", &["left", "right"]),
            ("ArrayPattern", &["elements"]),
            ("ObjectPattern", &["properties"]),
            ("ImportDeclaration", &["specifiers", "source"]),
            ("ImportSpecifier", &["imported", "local"]),
            ("ImportDefaultSpecifier", &["local"]),
            ("ImportNamespaceSpecifier", &["local"]),
            ("ExportNamedDeclaration", &["declaration", "specifiers", "source"]),
            ("ExportDefaultDeclaration", &["declaration"]),
            ("ExportAllDeclaration", &["source"]),
            ("ExportSpecifier", &["local", "exported"]),
        ];

        let mut keys = HashMap::with_capacity(table.len());
        for (kind, fields) in table {
            keys.insert(
                (*kind).to_owned(),
                fields.iter().map(|field| (*field).to_owned()).collect(),
            );
        }
        Self { keys }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estree_keys_cover_core_kinds() {
        let keys = VisitorKeys::estree();
        assert_eq!(
            keys.keys_for("IfStatement"),
            Some(["test".to_owned(), "consequent".to_owned(), "alternate".to_owned()].as_slice())
        );
        assert!(keys.keys_for("Identifier").is_some_and(<[String]>::is_empty));
        assert!(keys.keys_for("NotANode").is_none());
    }

    #[test]
    fn deserializes_from_parser_map() {
        let json = r#"{"IfStatement":["test","consequent","alternate"],"Identifier":[]}"#;
        let keys: VisitorKeys = serde_json::from_str(json).unwrap();
        assert_eq!(keys.keys_for("IfStatement").map(<[String]>::len), Some(3));
    }
}
