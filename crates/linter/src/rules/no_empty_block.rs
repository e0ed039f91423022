use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::decorate::DecoratedRule;
use crate::listener::ListenerMap;
use crate::metrics::is_function;
use crate::rule::{ReportDescriptor, RuleError, RuleMeta, RuleModule};

/// Lint rule that flags empty blocks and empty switch statements
///
/// Function bodies are exempt: an intentionally empty function is a
/// separate concern. The registered variant of this rule is decorated
/// to also exempt blocks that contain a comment, since a comment is an
/// accepted way of saying "empty on purpose".
///
/// Example:
/// ```js
/// // Bad
/// if (ready) {}
///
/// // Good
/// if (ready) { /* nothing to do yet */ }
/// ```
pub struct NoEmptyBlock;

impl RuleModule for NoEmptyBlock {
    fn meta(&self) -> RuleMeta {
        RuleMeta::new(
            "no-empty-block",
            "Nested blocks of code should not be left empty",
        )
        .with_message("emptyBlock", "Either remove or fill this block of code.")
    }

    fn create(&self, _options: &JsonValue) -> Result<ListenerMap, RuleError> {
        Ok(ListenerMap::new()
            .on("BlockStatement", |node, ctx| {
                let empty = node.list("body").is_none_or(<[_]>::is_empty);
                if !empty {
                    return Ok(());
                }
                if ctx.parent().is_some_and(is_function) {
                    return Ok(());
                }
                ctx.report(ReportDescriptor::on_node(node).message_id("emptyBlock"))
            })
            .on("SwitchStatement", |node, ctx| {
                let empty = node.list("cases").is_none_or(<[_]>::is_empty);
                if !empty {
                    return Ok(());
                }
                ctx.report(ReportDescriptor::on_node(node).message_id("emptyBlock"))
            }))
    }
}

/// The registered rule: [`NoEmptyBlock`] with comment-bearing blocks
/// exempted through decoration
#[must_use]
pub fn no_empty_block() -> DecoratedRule {
    DecoratedRule::new(Arc::new(NoEmptyBlock)).suppress_when(|ctx, descriptor| {
        let Some(range) = descriptor.range else {
            return false;
        };
        ctx.source_file()
            .snippet(range)
            .is_some_and(|text| text.contains("//") || text.contains("/*"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::run_rule;
    use jsts_syntax::{AstNode, OffsetRange, SourceFile, VisitorKeys};

    // if (a) {}
    fn empty_if_file() -> SourceFile {
        let text = "if (a) {}";
        let program = AstNode::new("Program", OffsetRange::new(0, 9)).with_list(
            "body",
            vec![AstNode::new("IfStatement", OffsetRange::new(0, 9))
                .with_child("test", AstNode::new("Identifier", OffsetRange::new(4, 5)))
                .with_child(
                    "consequent",
                    AstNode::new("BlockStatement", OffsetRange::new(7, 9)),
                )],
        );
        SourceFile::new("empty.js", text, program, VisitorKeys::estree())
    }

    // if (a) { /* later */ }
    fn commented_if_file() -> SourceFile {
        let text = "if (a) { /* later */ }";
        let program = AstNode::new("Program", OffsetRange::new(0, 22)).with_list(
            "body",
            vec![AstNode::new("IfStatement", OffsetRange::new(0, 22))
                .with_child("test", AstNode::new("Identifier", OffsetRange::new(4, 5)))
                .with_child(
                    "consequent",
                    AstNode::new("BlockStatement", OffsetRange::new(7, 22)),
                )],
        );
        SourceFile::new("commented.js", text, program, VisitorKeys::estree())
    }

    // if (a) {} else { /* todo */ }
    fn mixed_blocks_file() -> SourceFile {
        let text = "if (a) {} else { /* todo */ }";
        let program = AstNode::new("Program", OffsetRange::new(0, 29)).with_list(
            "body",
            vec![AstNode::new("IfStatement", OffsetRange::new(0, 29))
                .with_child("test", AstNode::new("Identifier", OffsetRange::new(4, 5)))
                .with_child(
                    "consequent",
                    AstNode::new("BlockStatement", OffsetRange::new(7, 9)),
                )
                .with_child(
                    "alternate",
                    AstNode::new("BlockStatement", OffsetRange::new(15, 29)),
                )],
        );
        SourceFile::new("mixed.js", text, program, VisitorKeys::estree())
    }

    // function f() {}
    fn empty_function_file() -> SourceFile {
        let text = "function f() {}";
        let program = AstNode::new("Program", OffsetRange::new(0, 15)).with_list(
            "body",
            vec![AstNode::new("FunctionDeclaration", OffsetRange::new(0, 15))
                .with_child("id", AstNode::new("Identifier", OffsetRange::new(9, 10)))
                .with_child(
                    "body",
                    AstNode::new("BlockStatement", OffsetRange::new(13, 15)),
                )],
        );
        SourceFile::new("function.js", text, program, VisitorKeys::estree())
    }

    // switch (a) {}
    fn empty_switch_file() -> SourceFile {
        let text = "switch (a) {}";
        let program = AstNode::new("Program", OffsetRange::new(0, 13)).with_list(
            "body",
            vec![AstNode::new("SwitchStatement", OffsetRange::new(0, 13))
                .with_child(
                    "discriminant",
                    AstNode::new("Identifier", OffsetRange::new(8, 9)),
                )
                .with_list("cases", vec![])],
        );
        SourceFile::new("switch.js", text, program, VisitorKeys::estree())
    }

    #[test]
    fn reports_empty_block() {
        let result = run_rule(Arc::new(NoEmptyBlock), &empty_if_file());
        assert_eq!(result.issues.len(), 1);
        assert_eq!(
            result.issues[0].message,
            "Either remove or fill this block of code."
        );
        assert_eq!(result.issues[0].location.column, 7);
    }

    #[test]
    fn reports_empty_switch() {
        let result = run_rule(Arc::new(NoEmptyBlock), &empty_switch_file());
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].location.column, 0);
    }

    #[test]
    fn ignores_function_bodies() {
        let result = run_rule(Arc::new(NoEmptyBlock), &empty_function_file());
        assert!(result.issues.is_empty());
    }

    #[test]
    fn undecorated_rule_reports_commented_blocks() {
        let result = run_rule(Arc::new(NoEmptyBlock), &commented_if_file());
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn decorated_rule_exempts_commented_blocks() {
        let result = run_rule(Arc::new(no_empty_block()), &commented_if_file());
        assert!(result.issues.is_empty());

        // Truly empty blocks are still reported.
        let result = run_rule(Arc::new(no_empty_block()), &empty_if_file());
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn decoration_exempts_only_the_commented_block() {
        let result = run_rule(Arc::new(no_empty_block()), &mixed_blocks_file());
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].location.column, 7);
    }
}
