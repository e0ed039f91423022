//! Rule decoration: wrapping an existing rule to adjust its metadata or
//! intercept its reports without touching the rule itself.
//!
//! A [`DecoratedRule`] is itself a [`RuleModule`], so decorations stack
//! and a decorated rule registers like any other. Transforms added here
//! run after the inner rule's own transforms, in decoration order.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::listener::ListenerMap;
use crate::rule::{ReportDescriptor, ReportTransform, RuleContext, RuleError, RuleMeta, RuleModule};

pub struct DecoratedRule {
    inner: Arc<dyn RuleModule>,
    meta: RuleMeta,
    transforms: Vec<ReportTransform>,
}

impl DecoratedRule {
    #[must_use]
    pub fn new(inner: Arc<dyn RuleModule>) -> Self {
        let meta = inner.meta();
        Self {
            inner,
            meta,
            transforms: Vec::new(),
        }
    }

    /// Add a raw report interceptor
    #[must_use]
    pub fn intercept_report(mut self, transform: ReportTransform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Replace parts of the wrapped rule's metadata
    #[must_use]
    pub fn with_meta(mut self, adjust: impl FnOnce(RuleMeta) -> RuleMeta) -> Self {
        self.meta = adjust(self.meta);
        self
    }

    /// Drop reports matching a predicate
    #[must_use]
    pub fn suppress_when(
        self,
        predicate: impl Fn(&RuleContext<'_>, &ReportDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.intercept_report(Arc::new(
            move |ctx: &RuleContext<'_>,
                  descriptor: ReportDescriptor|
                  -> Result<Option<ReportDescriptor>, RuleError> {
                if predicate(ctx, &descriptor) {
                    Ok(None)
                } else {
                    Ok(Some(descriptor))
                }
            },
        ))
    }

    /// Rewrite every report in place
    #[must_use]
    pub fn rewrite_report(
        self,
        rewrite: impl Fn(&RuleContext<'_>, ReportDescriptor) -> ReportDescriptor
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.intercept_report(Arc::new(
            move |ctx: &RuleContext<'_>,
                  descriptor: ReportDescriptor|
                  -> Result<Option<ReportDescriptor>, RuleError> {
                Ok(Some(rewrite(ctx, descriptor)))
            },
        ))
    }

    /// Attach extra secondary locations to every report
    #[must_use]
    pub fn add_secondaries(
        self,
        secondaries: impl Fn(&RuleContext<'_>, &ReportDescriptor) -> Vec<crate::issue::SecondaryLocation>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.rewrite_report(move |ctx, mut descriptor| {
            let extra = secondaries(ctx, &descriptor);
            descriptor.secondary_locations.extend(extra);
            descriptor
        })
    }

    /// Demote the wrapped rule's automatic fixes to suggestions
    #[must_use]
    pub fn fixes_as_suggestions(self) -> Self {
        self.with_meta(|meta| {
            let mut meta = meta;
            meta.fixable = false;
            meta.has_suggestions = true;
            meta
        })
        .rewrite_report(|_ctx, mut descriptor| {
            let fixes = std::mem::take(&mut descriptor.quick_fixes);
            descriptor.suggestions.extend(fixes);
            descriptor
        })
    }
}

impl RuleModule for DecoratedRule {
    fn meta(&self) -> RuleMeta {
        self.meta.clone()
    }

    fn create(&self, options: &JsonValue) -> Result<ListenerMap, RuleError> {
        self.inner.create(options)
    }

    fn report_transforms(&self) -> Vec<ReportTransform> {
        let mut transforms = self.inner.report_transforms();
        transforms.extend(self.transforms.iter().cloned());
        transforms
    }
}

/// Wrap `rule` with a single report interceptor
#[must_use]
pub fn intercept_report(rule: Arc<dyn RuleModule>, transform: ReportTransform) -> DecoratedRule {
    DecoratedRule::new(rule).intercept_report(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Location, QuickFix, Severity};
    use crate::rule::ReportMessage;
    use jsts_syntax::{AstNode, OffsetRange, SourceFile, VisitorKeys};

    struct AlwaysReport;

    impl RuleModule for AlwaysReport {
        fn meta(&self) -> RuleMeta {
            RuleMeta::new("always-report", "reports on every program").fixable()
        }

        fn create(&self, _options: &JsonValue) -> Result<ListenerMap, RuleError> {
            Ok(ListenerMap::new().on("Program", |_node, ctx| {
                ctx.report(
                    ReportDescriptor::at(Location::new(1, 0, 1, 1))
                        .message("original")
                        .fix(QuickFix::delete("remove it", 0, 1)),
                )
            }))
        }
    }

    fn run(rule: &dyn RuleModule) -> Vec<crate::issue::Issue> {
        let ast = AstNode::new("Program", OffsetRange::new(0, 1));
        let file = SourceFile::new("test.js", ";", ast, VisitorKeys::estree());
        let mut ctx = RuleContext::new(rule.meta(), &file, Severity::Warning, JsonValue::Null);
        ctx.set_transforms(rule.report_transforms());

        let node = AstNode::new("Program", OffsetRange::new(0, 1));
        let map = rule.create(&JsonValue::Null).unwrap();
        let mut entries = map.into_entries();
        for (_, callback) in &mut entries {
            callback(&node, &mut ctx).unwrap();
        }
        ctx.take_issues()
    }

    #[test]
    fn with_meta_overrides_only_the_metadata() {
        let decorated = DecoratedRule::new(Arc::new(AlwaysReport))
            .with_meta(|meta| meta.with_default_severity(Severity::Info));
        assert_eq!(decorated.meta().default_severity, Severity::Info);
        assert_eq!(decorated.meta().id, "always-report");
        assert_eq!(run(&decorated).len(), 1);
    }

    #[test]
    fn suppress_when_drops_matching_reports() {
        let decorated = DecoratedRule::new(Arc::new(AlwaysReport))
            .suppress_when(|_ctx, descriptor| {
                matches!(&descriptor.message, ReportMessage::Text(text) if text == "original")
            });
        assert!(run(&decorated).is_empty());
    }

    #[test]
    fn rewrite_report_changes_the_message() {
        let decorated = DecoratedRule::new(Arc::new(AlwaysReport))
            .rewrite_report(|_ctx, descriptor| descriptor.message("rewritten"));
        let issues = run(&decorated);
        assert_eq!(issues[0].message, "rewritten");
    }

    #[test]
    fn fixes_as_suggestions_demotes_fixes() {
        let decorated = DecoratedRule::new(Arc::new(AlwaysReport)).fixes_as_suggestions();
        assert!(!decorated.meta().fixable);
        assert!(decorated.meta().has_suggestions);

        let issues = run(&decorated);
        assert!(issues[0].quick_fixes.is_empty());
        assert_eq!(issues[0].suggestions.len(), 1);
        assert_eq!(issues[0].suggestions[0].description, "remove it");
    }

    #[test]
    fn add_secondaries_extends_the_report() {
        let decorated = DecoratedRule::new(Arc::new(AlwaysReport)).add_secondaries(|_ctx, _d| {
            vec![crate::issue::SecondaryLocation::new(
                Location::new(2, 4, 2, 9),
                Some("related"),
            )]
        });
        let issues = run(&decorated);
        assert_eq!(issues[0].secondary_locations.len(), 1);
        assert_eq!(
            issues[0].secondary_locations[0].message.as_deref(),
            Some("related")
        );
    }

    #[test]
    fn decorations_stack_in_order() {
        let decorated = DecoratedRule::new(Arc::new(AlwaysReport))
            .rewrite_report(|_ctx, descriptor| descriptor.message("first"))
            .suppress_when(|_ctx, descriptor| {
                matches!(&descriptor.message, ReportMessage::Text(text) if text == "first")
            });
        assert!(run(&decorated).is_empty());
    }
}
