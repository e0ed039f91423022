use serde_json::Value as JsonValue;

use crate::listener::ListenerMap;
use crate::rule::{ReportDescriptor, RuleError, RuleMeta, RuleModule};

/// Lint rule that requires `if ... else if` chains to end with `else`
///
/// A chain that handles some conditions explicitly but has no final
/// `else` silently ignores every remaining case.
///
/// Example:
/// ```js
/// // Bad
/// if (a) { doA(); } else if (b) { doB(); }
///
/// // Good
/// if (a) { doA(); } else if (b) { doB(); } else { handleRest(); }
/// ```
pub struct ElseifWithoutElse;

impl RuleModule for ElseifWithoutElse {
    fn meta(&self) -> RuleMeta {
        RuleMeta::new(
            "elseif-without-else",
            "\"if ... else if\" constructs should end with \"else\" clauses",
        )
        .with_message("addMissingElse", "Add the missing \"else\" clause.")
    }

    fn create(&self, _options: &JsonValue) -> Result<ListenerMap, RuleError> {
        Ok(ListenerMap::new().on("IfStatement", |node, ctx| {
            if node.child("alternate").is_some() {
                return Ok(());
            }
            // Only the tail of a chain counts: this if must itself be
            // the alternate of another if.
            let is_else_if = ctx.parent().is_some_and(|parent| {
                parent.kind() == "IfStatement"
                    && parent
                        .child("alternate")
                        .is_some_and(|alternate| std::ptr::eq(alternate, node))
            });
            if !is_else_if {
                return Ok(());
            }
            ctx.report(ReportDescriptor::on_node(node).message_id("addMissingElse"))
        }))
    }
}
