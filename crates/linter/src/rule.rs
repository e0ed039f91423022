//! Rule metadata, the rule trait and the per-file reporting context.
//!
//! A rule is a stateless module: its [`RuleMeta`] describes it, and
//! [`RuleModule::create`] builds a fresh set of node listeners for each
//! analyzed file. All reporting flows through [`RuleContext::report`],
//! where registered transforms may rewrite or suppress the report before
//! it becomes an [`Issue`].

use std::collections::HashMap;
use std::sync::Arc;

use jsts_syntax::{AstNode, OffsetRange, SourceFile};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::trace;

use crate::issue::{EncodeError, Issue, Location, QuickFix, SecondaryLocation, Severity};
use crate::listener::ListenerMap;
use crate::selector::SelectorError;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid options for rule '{rule}': {reason}")]
    BadOptions { rule: String, reason: String },

    #[error("unknown message id '{id}' for rule '{rule}'")]
    UnknownMessageId { rule: String, id: String },

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] crate::issue::DecodeError),

    #[error("rule '{rule}' failed: {reason}")]
    Execution { rule: String, reason: String },
}

impl RuleError {
    pub fn bad_options(rule: &str, reason: impl Into<String>) -> Self {
        Self::BadOptions {
            rule: rule.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn execution(rule: &str, reason: impl Into<String>) -> Self {
        Self::Execution {
            rule: rule.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Static description of a rule
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMeta {
    pub id: String,
    pub description: String,
    pub default_severity: Severity,
    /// Named message templates, interpolated with `{{placeholder}}` data
    pub messages: HashMap<String, String>,
    pub fixable: bool,
    pub has_suggestions: bool,
    /// Whether this rule packs secondary locations into its message string
    pub encoded_messages: bool,
}

impl RuleMeta {
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            default_severity: Severity::Warning,
            messages: HashMap::new(),
            fixable: false,
            has_suggestions: false,
            encoded_messages: false,
        }
    }

    #[must_use]
    pub fn with_default_severity(mut self, severity: Severity) -> Self {
        self.default_severity = severity;
        self
    }

    #[must_use]
    pub fn with_message(mut self, id: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(id.into(), template.into());
        self
    }

    #[must_use]
    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }

    #[must_use]
    pub fn with_suggestions(mut self) -> Self {
        self.has_suggestions = true;
        self
    }

    #[must_use]
    pub fn with_encoded_messages(mut self) -> Self {
        self.encoded_messages = true;
        self
    }
}

/// How a report names its message: inline text or a template from
/// [`RuleMeta::messages`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportMessage {
    Text(String),
    Id(String),
}

/// Everything a rule hands to [`RuleContext::report`]. Fully owned so
/// transforms can rewrite it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDescriptor {
    pub location: Location,
    /// Byte range of the reported node, when the report came from one
    pub range: Option<OffsetRange>,
    pub message: ReportMessage,
    pub data: Vec<(String, String)>,
    pub cost: Option<f64>,
    pub secondary_locations: Vec<SecondaryLocation>,
    pub quick_fixes: Vec<QuickFix>,
    pub suggestions: Vec<QuickFix>,
}

impl ReportDescriptor {
    /// Report at a node's resolved source location
    #[must_use]
    pub fn on_node(node: &AstNode) -> Self {
        let mut descriptor = Self::at(node.loc().into());
        descriptor.range = Some(node.range());
        descriptor
    }

    #[must_use]
    pub fn at(location: Location) -> Self {
        Self {
            location,
            range: None,
            message: ReportMessage::Text(String::new()),
            data: Vec::new(),
            cost: None,
            secondary_locations: Vec::new(),
            quick_fixes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.message = ReportMessage::Text(text.into());
        self
    }

    #[must_use]
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message = ReportMessage::Id(id.into());
        self
    }

    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    #[must_use]
    pub fn secondary(mut self, location: SecondaryLocation) -> Self {
        self.secondary_locations.push(location);
        self
    }

    #[must_use]
    pub fn fix(mut self, fix: QuickFix) -> Self {
        self.quick_fixes.push(fix);
        self
    }

    #[must_use]
    pub fn suggestion(mut self, suggestion: QuickFix) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

/// A report interceptor: may rewrite the descriptor, suppress it
/// (`Ok(None)`), or fail the rule for the file
pub type ReportTransform = Arc<
    dyn Fn(&RuleContext<'_>, ReportDescriptor) -> Result<Option<ReportDescriptor>, RuleError>
        + Send
        + Sync,
>;

/// A lint rule. Implementations are stateless; per-file state lives in
/// the closures returned by [`create`](Self::create).
pub trait RuleModule: Send + Sync {
    fn meta(&self) -> RuleMeta;

    /// Build the node listeners for one file. `options` is the
    /// rule-specific configuration payload, `null` when unconfigured.
    fn create(&self, options: &JsonValue) -> Result<ListenerMap, RuleError>;

    /// Report interceptors applied, in order, to every report of this
    /// rule. Decorators override this.
    fn report_transforms(&self) -> Vec<ReportTransform> {
        Vec::new()
    }
}

/// Per-file, per-rule reporting context handed to every listener
pub struct RuleContext<'a> {
    meta: RuleMeta,
    file: &'a SourceFile,
    severity: Severity,
    options: JsonValue,
    transforms: Vec<ReportTransform>,
    ancestors: Vec<&'a AstNode>,
    issues: Vec<Issue>,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub fn new(meta: RuleMeta, file: &'a SourceFile, severity: Severity, options: JsonValue) -> Self {
        Self {
            meta,
            file,
            severity,
            options,
            transforms: Vec::new(),
            ancestors: Vec::new(),
            issues: Vec::new(),
        }
    }

    #[must_use]
    pub fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    #[must_use]
    pub fn source_file(&self) -> &'a SourceFile {
        self.file
    }

    #[must_use]
    pub fn options(&self) -> &JsonValue {
        &self.options
    }

    pub fn set_transforms(&mut self, transforms: Vec<ReportTransform>) {
        self.transforms = transforms;
    }

    /// Ancestor chain of the node currently being visited, outermost
    /// first, innermost (the direct parent) last
    #[must_use]
    pub fn ancestors(&self) -> &[&'a AstNode] {
        &self.ancestors
    }

    #[must_use]
    pub fn parent(&self) -> Option<&'a AstNode> {
        self.ancestors.last().copied()
    }

    pub(crate) fn set_ancestors(&mut self, ancestors: Vec<&'a AstNode>) {
        self.ancestors = ancestors;
    }

    /// File a report. All registered transforms run first, in order; a
    /// transform returning `Ok(None)` suppresses the report entirely.
    pub fn report(&mut self, descriptor: ReportDescriptor) -> Result<(), RuleError> {
        let transforms = std::mem::take(&mut self.transforms);
        let mut current = Some(descriptor);
        let mut failure = None;
        for transform in &transforms {
            let Some(descriptor) = current.take() else {
                break;
            };
            match transform(&*self, descriptor) {
                Ok(next) => current = next,
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }
        self.transforms = transforms;
        if let Some(error) = failure {
            return Err(error);
        }

        let Some(descriptor) = current else {
            trace!(rule = %self.meta.id, "report suppressed by transform");
            return Ok(());
        };
        let issue = self.build_issue(descriptor)?;
        self.issues.push(issue);
        Ok(())
    }

    pub(crate) fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    fn build_issue(&self, descriptor: ReportDescriptor) -> Result<Issue, RuleError> {
        let message = match descriptor.message {
            ReportMessage::Text(text) => interpolate(&text, &descriptor.data),
            ReportMessage::Id(id) => {
                let template =
                    self.meta
                        .messages
                        .get(&id)
                        .ok_or_else(|| RuleError::UnknownMessageId {
                            rule: self.meta.id.clone(),
                            id: id.clone(),
                        })?;
                interpolate(template, &descriptor.data)
            }
        };
        Ok(Issue {
            rule_id: self.meta.id.clone(),
            location: descriptor.location,
            message,
            severity: self.severity,
            cost: descriptor.cost,
            secondary_locations: descriptor.secondary_locations,
            quick_fixes: descriptor.quick_fixes,
            suggestions: descriptor.suggestions,
        })
    }
}

fn interpolate(template: &str, data: &[(String, String)]) -> String {
    let mut message = template.to_owned();
    for (key, value) in data {
        message = message.replace(&format!("{{{{{key}}}}}"), value);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsts_syntax::{OffsetRange, VisitorKeys};

    fn file() -> SourceFile {
        let ast = AstNode::new("Program", OffsetRange::new(0, 8));
        SourceFile::new("test.js", "void x;\n", ast, VisitorKeys::estree())
    }

    fn meta() -> RuleMeta {
        RuleMeta::new("demo-rule", "a demo rule")
            .with_message("short", "Remove {{what}}.")
    }

    #[test]
    fn report_resolves_message_templates() {
        let file = file();
        let mut ctx = RuleContext::new(meta(), &file, Severity::Error, JsonValue::Null);
        ctx.report(
            ReportDescriptor::at(Location::new(1, 0, 1, 6))
                .message_id("short")
                .data("what", "this"),
        )
        .unwrap();

        let issues = ctx.take_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Remove this.");
        assert_eq!(issues[0].rule_id, "demo-rule");
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn report_rejects_unknown_message_id() {
        let file = file();
        let mut ctx = RuleContext::new(meta(), &file, Severity::Error, JsonValue::Null);
        let error = ctx
            .report(ReportDescriptor::at(Location::new(1, 0, 1, 1)).message_id("missing"))
            .unwrap_err();
        assert!(matches!(error, RuleError::UnknownMessageId { .. }));
        assert!(ctx.take_issues().is_empty());
    }

    #[test]
    fn transforms_run_in_order_and_may_suppress() {
        let file = file();
        let mut ctx = RuleContext::new(meta(), &file, Severity::Warning, JsonValue::Null);

        let mark: ReportTransform = Arc::new(
            |_ctx: &RuleContext<'_>,
             descriptor: ReportDescriptor|
             -> Result<Option<ReportDescriptor>, RuleError> {
                Ok(Some(descriptor.data("what", "marked")))
            },
        );
        let drop_marked: ReportTransform = Arc::new(
            |_ctx: &RuleContext<'_>,
             descriptor: ReportDescriptor|
             -> Result<Option<ReportDescriptor>, RuleError> {
                if descriptor.data.iter().any(|(_, value)| value == "marked") {
                    Ok(None)
                } else {
                    Ok(Some(descriptor))
                }
            },
        );
        ctx.set_transforms(vec![mark, drop_marked]);

        ctx.report(ReportDescriptor::at(Location::new(1, 0, 1, 1)).message_id("short"))
            .unwrap();
        assert!(ctx.take_issues().is_empty());
    }

    #[test]
    fn transform_errors_fail_the_report() {
        let file = file();
        let mut ctx = RuleContext::new(meta(), &file, Severity::Warning, JsonValue::Null);
        let failing: ReportTransform = Arc::new(
            |ctx: &RuleContext<'_>,
             _descriptor: ReportDescriptor|
             -> Result<Option<ReportDescriptor>, RuleError> {
                Err(RuleError::execution(&ctx.meta().id, "boom"))
            },
        );
        ctx.set_transforms(vec![failing]);

        let error = ctx
            .report(ReportDescriptor::at(Location::new(1, 0, 1, 1)).message("m"))
            .unwrap_err();
        assert!(matches!(error, RuleError::Execution { .. }));
        assert!(ctx.take_issues().is_empty());
    }
}
