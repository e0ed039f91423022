use serde_json::Value as JsonValue;

use crate::issue::{encode_message, Location, LocRef};
use crate::listener::ListenerMap;
use crate::metrics::{function_complexity_nodes, FUNCTION_KINDS};
use crate::rule::{ReportDescriptor, RuleError, RuleMeta, RuleModule};

const DEFAULT_THRESHOLD: u32 = 10;

/// Lint rule that caps the cyclomatic complexity of a function
///
/// Every function is measured independently; contributors inside nested
/// functions count against the nested function only. Each contributor
/// is attached to the issue as a "+1" secondary location, and the cost
/// is how far the function is over the threshold, so the report shows
/// exactly what to simplify and by how much.
pub struct CyclomaticComplexity;

impl RuleModule for CyclomaticComplexity {
    fn meta(&self) -> RuleMeta {
        RuleMeta::new(
            "cyclomatic-complexity",
            "Functions should not be too complex",
        )
        .with_encoded_messages()
    }

    fn create(&self, options: &JsonValue) -> Result<ListenerMap, RuleError> {
        let threshold = threshold_from(options)?;
        let selector = FUNCTION_KINDS.join(", ");
        Ok(ListenerMap::new().on(&selector, move |node, ctx| {
            let contributors = function_complexity_nodes(node, ctx.source_file().visitor_keys());
            let complexity = u32::try_from(contributors.len()).unwrap_or(u32::MAX);
            if complexity <= threshold {
                return Ok(());
            }

            let refs: Vec<LocRef<'_>> = contributors.iter().copied().map(LocRef::from).collect();
            let markers = vec![Some("+1"); refs.len()];
            let message = format!(
                "Function has a complexity of {complexity} which is greater than {threshold} authorized."
            );
            let encoded = encode_message(
                &message,
                &refs,
                &markers,
                Some(f64::from(complexity - threshold)),
            )?;
            ctx.report(ReportDescriptor::at(primary_location(node)).message(encoded))
        }))
    }
}

/// The function header: from the function's start to its body's start
fn primary_location(function: &jsts_syntax::AstNode) -> Location {
    let start = function.loc().start;
    let end = function
        .child("body")
        .map_or(function.loc().end, |body| body.loc().start);
    Location::new(start.line, start.column, end.line, end.column)
}

fn threshold_from(options: &JsonValue) -> Result<u32, RuleError> {
    let raw = match options {
        JsonValue::Null => return Ok(DEFAULT_THRESHOLD),
        JsonValue::Number(number) => Some(number),
        JsonValue::Object(map) => match map.get("threshold") {
            None => return Ok(DEFAULT_THRESHOLD),
            Some(JsonValue::Number(number)) => Some(number),
            Some(_) => None,
        },
        _ => None,
    };
    raw.and_then(serde_json::Number::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .ok_or_else(|| {
            RuleError::bad_options(
                "cyclomatic-complexity",
                "'threshold' must be a non-negative integer",
            )
        })
}
