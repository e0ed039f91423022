use serde_json::Value as JsonValue;

use crate::issue::QuickFix;
use crate::listener::ListenerMap;
use crate::rule::{ReportDescriptor, RuleError, RuleMeta, RuleModule};

/// Lint rule that flags uses of the `void` operator
///
/// `void` obscures intent: it evaluates its operand and produces
/// `undefined`, which is almost never what a reader expects. The idiom
/// `void 0` is tolerated as a conventional spelling of `undefined`.
pub struct NoVoid;

impl RuleModule for NoVoid {
    fn meta(&self) -> RuleMeta {
        RuleMeta::new("no-void", "\"void\" should not be used")
            .with_message("removeVoid", "Remove this use of the \"void\" operator.")
            .fixable()
    }

    fn create(&self, _options: &JsonValue) -> Result<ListenerMap, RuleError> {
        Ok(
            ListenerMap::new().on("UnaryExpression[operator='void']", |node, ctx| {
                let argument = node.child("argument");
                let is_void_zero = argument
                    .is_some_and(|arg| arg.kind() == "Literal" && arg.num_value("value") == Some(0.0));
                if is_void_zero {
                    return Ok(());
                }

                let mut descriptor = ReportDescriptor::on_node(node).message_id("removeVoid");
                if let Some(argument) = argument {
                    descriptor = descriptor.fix(QuickFix::delete(
                        "Remove the \"void\" operator",
                        node.range().start,
                        argument.range().start,
                    ));
                }
                ctx.report(descriptor)
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::run_rule;
    use jsts_syntax::{AstNode, OffsetRange, SourceFile, VisitorKeys};
    use std::sync::Arc;

    fn void_expression(text: &str, argument: AstNode) -> SourceFile {
        let end = text.len();
        let expression = AstNode::new("UnaryExpression", OffsetRange::new(0, end - 1))
            .with_str("operator", "void")
            .with_bool("prefix", true)
            .with_child("argument", argument);
        let statement = AstNode::new("ExpressionStatement", OffsetRange::new(0, end))
            .with_child("expression", expression);
        let program =
            AstNode::new("Program", OffsetRange::new(0, end)).with_list("body", vec![statement]);
        SourceFile::new("void.js", text, program, VisitorKeys::estree())
    }

    #[test]
    fn reports_void_with_a_deleting_fix() {
        // void doWork();
        let file = void_expression(
            "void doWork();",
            AstNode::new("CallExpression", OffsetRange::new(5, 13))
                .with_child("callee", AstNode::new("Identifier", OffsetRange::new(5, 11))),
        );
        let result = run_rule(Arc::new(NoVoid), &file);
        assert_eq!(result.issues.len(), 1);

        let issue = &result.issues[0];
        assert_eq!(issue.message, "Remove this use of the \"void\" operator.");
        assert_eq!(issue.quick_fixes.len(), 1);
        let edit = &issue.quick_fixes[0].edits[0];
        assert_eq!(edit.offset_range, OffsetRange::new(0, 5));
        assert!(edit.new_text.is_empty());
    }

    #[test]
    fn tolerates_void_zero() {
        // void 0;
        let file = void_expression(
            "void 0;",
            AstNode::new("Literal", OffsetRange::new(5, 6)).with_num("value", 0.0),
        );
        let result = run_rule(Arc::new(NoVoid), &file);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn other_unary_operators_never_match() {
        let text = "typeof x;";
        let expression = AstNode::new("UnaryExpression", OffsetRange::new(0, 8))
            .with_str("operator", "typeof")
            .with_child("argument", AstNode::new("Identifier", OffsetRange::new(7, 8)));
        let statement = AstNode::new("ExpressionStatement", OffsetRange::new(0, 9))
            .with_child("expression", expression);
        let program =
            AstNode::new("Program", OffsetRange::new(0, 9)).with_list("body", vec![statement]);
        let file = SourceFile::new("typeof.js", text, program, VisitorKeys::estree());

        let result = run_rule(Arc::new(NoVoid), &file);
        assert!(result.issues.is_empty());
    }
}
