use serde_json::Value as JsonValue;

use crate::listener::ListenerMap;
use crate::rule::{ReportDescriptor, RuleError, RuleMeta, RuleModule};

/// Lint rule that flags `switch` statements nested inside another
/// `switch`, at any depth
///
/// Nested switches are hard to follow; the inner one usually wants to
/// be its own function.
pub struct NoNestedSwitch;

impl RuleModule for NoNestedSwitch {
    fn meta(&self) -> RuleMeta {
        RuleMeta::new(
            "no-nested-switch",
            "\"switch\" statements should not be nested",
        )
        .with_message(
            "removeNestedSwitch",
            "Refactor the code to eliminate this nested \"switch\".",
        )
    }

    fn create(&self, _options: &JsonValue) -> Result<ListenerMap, RuleError> {
        Ok(
            ListenerMap::new().on("SwitchStatement SwitchStatement", |node, ctx| {
                ctx.report(ReportDescriptor::on_node(node).message_id("removeNestedSwitch"))
            }),
        )
    }
}
