//! Complexity metrics computed over the generic traversal.
//!
//! Cyclomatic complexity counts nodes in a fixed classification set,
//! once per matching node, regardless of nesting depth: function nodes,
//! conditionals (`if`, ternary, non-default `case`), loops, and
//! short-circuit logical operators.

use jsts_syntax::{walk, AstNode, FieldValue, VisitorKeys, WalkEvent};

pub const FUNCTION_KINDS: [&str; 3] = [
    "FunctionDeclaration",
    "FunctionExpression",
    "ArrowFunctionExpression",
];

const LOOP_KINDS: [&str; 5] = [
    "ForStatement",
    "ForInStatement",
    "ForOfStatement",
    "WhileStatement",
    "DoWhileStatement",
];

#[must_use]
pub fn is_function(node: &AstNode) -> bool {
    FUNCTION_KINDS.contains(&node.kind())
}

/// Whether a node contributes one point of cyclomatic complexity
#[must_use]
pub fn increases_complexity(node: &AstNode) -> bool {
    match node.kind() {
        "IfStatement" | "ConditionalExpression" => true,
        // A `default:` clause has no test and adds no branch.
        "SwitchCase" => !matches!(node.get("test"), None | Some(FieldValue::Null)),
        "LogicalExpression" => {
            matches!(node.str_value("operator"), Some("&&" | "||"))
        }
        kind => FUNCTION_KINDS.contains(&kind) || LOOP_KINDS.contains(&kind),
    }
}

/// All complexity-contributing nodes in a subtree, in traversal order
#[must_use]
pub fn complexity_nodes<'a>(root: &'a AstNode, keys: &VisitorKeys) -> Vec<&'a AstNode> {
    let mut nodes = Vec::new();
    walk(root, keys, &mut |event| {
        if let WalkEvent::Enter(node) = event {
            if increases_complexity(node) {
                nodes.push(node);
            }
        }
    });
    nodes
}

/// Cyclomatic complexity of a whole subtree
#[must_use]
pub fn cyclomatic_complexity(root: &AstNode, keys: &VisitorKeys) -> u32 {
    u32::try_from(complexity_nodes(root, keys).len()).unwrap_or(u32::MAX)
}

/// The complexity-contributing nodes belonging to one function: the
/// function node itself plus contributors in its body, excluding
/// anything inside nested functions (those are measured on their own).
#[must_use]
pub fn function_complexity_nodes<'a>(
    function: &'a AstNode,
    keys: &VisitorKeys,
) -> Vec<&'a AstNode> {
    let mut nodes = Vec::new();
    let mut nested = 0usize;
    walk(function, keys, &mut |event| match event {
        WalkEvent::Enter(node) => {
            let inner_function = is_function(node) && !std::ptr::eq(node, function);
            if nested == 0 && !inner_function && increases_complexity(node) {
                nodes.push(node);
            }
            if inner_function {
                nested += 1;
            }
        }
        WalkEvent::Leave(node) => {
            if is_function(node) && !std::ptr::eq(node, function) {
                nested = nested.saturating_sub(1);
            }
        }
    });
    nodes
}

#[must_use]
pub fn function_complexity(function: &AstNode, keys: &VisitorKeys) -> u32 {
    u32::try_from(function_complexity_nodes(function, keys).len()).unwrap_or(u32::MAX)
}

/// Size and structure metrics for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileMetrics {
    pub cyclomatic_complexity: u32,
    pub functions: u32,
    pub statements: u32,
}

#[must_use]
pub fn file_metrics(root: &AstNode, keys: &VisitorKeys) -> FileMetrics {
    let mut metrics = FileMetrics::default();
    walk(root, keys, &mut |event| {
        if let WalkEvent::Enter(node) = event {
            if increases_complexity(node) {
                metrics.cyclomatic_complexity += 1;
            }
            if is_function(node) {
                metrics.functions += 1;
            }
            if node.kind().ends_with("Statement") && node.kind() != "BlockStatement" {
                metrics.statements += 1;
            }
        }
    });
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsts_syntax::OffsetRange;

    fn node(kind: &str) -> AstNode {
        AstNode::new(kind, OffsetRange::new(0, 0))
    }

    // function f() { if (a && b) { while (c) {} } }
    fn sample_function() -> AstNode {
        let condition = node("LogicalExpression")
            .with_str("operator", "&&")
            .with_child("left", node("Identifier"))
            .with_child("right", node("Identifier"));
        let loop_body = node("WhileStatement")
            .with_child("test", node("Identifier"))
            .with_child("body", node("BlockStatement"));
        let if_statement = node("IfStatement")
            .with_child("test", condition)
            .with_child(
                "consequent",
                node("BlockStatement").with_list("body", vec![loop_body]),
            );
        node("FunctionDeclaration")
            .with_child("id", node("Identifier"))
            .with_child(
                "body",
                node("BlockStatement").with_list("body", vec![if_statement]),
            )
    }

    #[test]
    fn counts_each_classified_node_once() {
        let keys = VisitorKeys::estree();
        let function = sample_function();
        // function (+1), if (+1), && (+1), while (+1)
        assert_eq!(function_complexity(&function, &keys), 4);
    }

    #[test]
    fn default_case_does_not_count() {
        let with_test = node("SwitchCase").with_child("test", node("Literal"));
        let default_case = node("SwitchCase");
        assert!(increases_complexity(&with_test));
        assert!(!increases_complexity(&default_case));
    }

    #[test]
    fn nullish_coalescing_does_not_count() {
        let coalesce = node("LogicalExpression").with_str("operator", "??");
        assert!(!increases_complexity(&coalesce));
        let or = node("LogicalExpression").with_str("operator", "||");
        assert!(increases_complexity(&or));
    }

    #[test]
    fn nested_functions_are_excluded_from_the_outer_function() {
        let keys = VisitorKeys::estree();
        let inner = node("FunctionExpression").with_child(
            "body",
            node("BlockStatement").with_list(
                "body",
                vec![node("IfStatement")
                    .with_child("test", node("Identifier"))
                    .with_child("consequent", node("BlockStatement"))],
            ),
        );
        let outer = node("FunctionDeclaration").with_child(
            "body",
            node("BlockStatement").with_list(
                "body",
                vec![node("ExpressionStatement").with_child("expression", inner)],
            ),
        );

        // Outer sees only itself; the nested if belongs to the inner one.
        assert_eq!(function_complexity(&outer, &keys), 1);
        // Whole-subtree complexity still sees everything.
        assert_eq!(cyclomatic_complexity(&outer, &keys), 3);
    }

    #[test]
    fn file_metrics_counts_statements_and_functions() {
        let keys = VisitorKeys::estree();
        let program = node("Program").with_list("body", vec![sample_function()]);
        let metrics = file_metrics(&program, &keys);
        assert_eq!(metrics.cyclomatic_complexity, 4);
        assert_eq!(metrics.functions, 1);
        // IfStatement and WhileStatement; blocks are not counted.
        assert_eq!(metrics.statements, 2);
    }
}
