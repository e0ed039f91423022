//! The rule execution driver.
//!
//! For one parsed file the driver activates every enabled rule,
//! compiles all selector registrations into a dispatch table keyed by
//! node kind, and performs a single traversal firing every matching
//! hook. Rule failures are contained: a failing rule is disabled for
//! the rest of the file, its issues are discarded, and every other rule
//! keeps running.

use std::collections::HashMap;
use std::sync::Arc;

use jsts_syntax::{walk, AstNode, SourceFile, WalkEvent};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument, warn};

use crate::config::{LintConfig, RuleLevel};
use crate::issue::{decode_issue, Issue};
use crate::listener::NodeCallback;
use crate::metrics::{file_metrics, FileMetrics};
use crate::registry;
use crate::rule::{RuleContext, RuleError, RuleModule};
use crate::selector::{Phase, Selector, SelectorBranch};

/// A rule that could not complete on one file
#[derive(Debug)]
pub struct RuleFailure {
    pub rule_id: String,
    pub error: RuleError,
}

/// Everything one file's analysis produced
#[derive(Debug, Default)]
pub struct FileResult {
    pub issues: Vec<Issue>,
    pub failures: Vec<RuleFailure>,
    pub metrics: FileMetrics,
}

struct Hook {
    instance: usize,
    callback: usize,
    branch: SelectorBranch,
}

#[derive(Default)]
struct DispatchTable {
    enter: HashMap<String, Vec<Hook>>,
    exit: HashMap<String, Vec<Hook>>,
}

impl DispatchTable {
    fn add(&mut self, branch: &SelectorBranch, instance: usize, callback: usize) {
        let bucket = match branch.phase {
            Phase::Enter => &mut self.enter,
            Phase::Exit => &mut self.exit,
        };
        bucket.entry(branch.kind.clone()).or_default().push(Hook {
            instance,
            callback,
            branch: branch.clone(),
        });
    }
}

struct Instance<'a> {
    ctx: RuleContext<'a>,
    callbacks: Vec<NodeCallback>,
    failure: Option<RuleError>,
}

/// Drives all active rules over parsed files
pub struct Linter {
    config: LintConfig,
    rules: Vec<Arc<dyn RuleModule>>,
}

impl Linter {
    #[must_use]
    pub fn new(config: LintConfig) -> Self {
        Self::with_rules(config, registry::all_rules().to_vec())
    }

    #[must_use]
    pub fn recommended() -> Self {
        Self::new(LintConfig::recommended())
    }

    /// A linter over an explicit rule set instead of the registry
    #[must_use]
    pub fn with_rules(config: LintConfig, rules: Vec<Arc<dyn RuleModule>>) -> Self {
        Self { config, rules }
    }

    #[must_use]
    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Analyze one parsed file with every enabled rule
    #[instrument(skip_all, fields(path = %file.path()))]
    pub fn lint_file(&self, file: &SourceFile) -> FileResult {
        let mut result = FileResult::default();
        let Some(root) = file.ast() else {
            debug!("no syntax tree, skipping lint");
            return result;
        };
        result.metrics = file_metrics(root, file.visitor_keys());

        let mut instances: Vec<Instance<'_>> = Vec::new();
        let mut table = DispatchTable::default();
        for rule in &self.rules {
            let meta = rule.meta();
            let Some(severity) = self
                .config
                .level(&meta.id)
                .and_then(RuleLevel::severity)
            else {
                continue;
            };
            let options = self
                .config
                .options(&meta.id)
                .cloned()
                .unwrap_or(JsonValue::Null);

            let map = match rule.create(&options) {
                Ok(map) => map,
                Err(error) => {
                    warn!(rule = %meta.id, %error, "rule activation failed");
                    result.failures.push(RuleFailure {
                        rule_id: meta.id,
                        error,
                    });
                    continue;
                }
            };

            let mut callbacks = Vec::new();
            let mut selectors = Vec::new();
            let mut activation_error = None;
            for (selector, callback) in map.into_entries() {
                match Selector::parse(&selector) {
                    Ok(parsed) => {
                        selectors.push(parsed);
                        callbacks.push(callback);
                    }
                    Err(error) => {
                        activation_error = Some(RuleError::from(error));
                        break;
                    }
                }
            }
            if let Some(error) = activation_error {
                warn!(rule = %meta.id, %error, "rule activation failed");
                result.failures.push(RuleFailure {
                    rule_id: meta.id,
                    error,
                });
                continue;
            }

            let instance_index = instances.len();
            for (callback_index, selector) in selectors.iter().enumerate() {
                for branch in selector.branches() {
                    table.add(branch, instance_index, callback_index);
                }
            }

            let mut ctx = RuleContext::new(meta, file, severity, options);
            ctx.set_transforms(rule.report_transforms());
            instances.push(Instance {
                ctx,
                callbacks,
                failure: None,
            });
        }
        debug!(active_rules = instances.len(), "starting traversal");

        let mut ancestors: Vec<&AstNode> = Vec::new();
        walk(root, file.visitor_keys(), &mut |event| match event {
            WalkEvent::Enter(node) => {
                fire(&table.enter, node, &ancestors, &mut instances);
                ancestors.push(node);
            }
            WalkEvent::Leave(node) => {
                ancestors.pop();
                fire(&table.exit, node, &ancestors, &mut instances);
            }
        });

        for mut instance in instances {
            let meta = instance.ctx.meta().clone();
            if let Some(error) = instance.failure.take() {
                warn!(rule = %meta.id, %error, "rule failed, discarding its issues for this file");
                result.failures.push(RuleFailure {
                    rule_id: meta.id,
                    error,
                });
                continue;
            }
            let mut decoded = Vec::new();
            let mut decode_failure = None;
            for issue in instance.ctx.take_issues() {
                match decode_issue(&meta, issue) {
                    Ok(issue) => decoded.push(issue),
                    Err(error) => {
                        decode_failure = Some(RuleError::from(error));
                        break;
                    }
                }
            }
            match decode_failure {
                Some(error) => {
                    warn!(rule = %meta.id, %error, "discarding undecodable issues");
                    result.failures.push(RuleFailure {
                        rule_id: meta.id,
                        error,
                    });
                }
                None => result.issues.extend(decoded),
            }
        }

        debug!(
            issues = result.issues.len(),
            failures = result.failures.len(),
            "lint finished"
        );
        result
    }
}

/// Fire every hook registered for this node kind, in activation order.
/// A rule that has already failed is skipped for the rest of the file.
fn fire<'a>(
    hooks: &HashMap<String, Vec<Hook>>,
    node: &'a AstNode,
    ancestors: &[&'a AstNode],
    instances: &mut [Instance<'a>],
) {
    let Some(bucket) = hooks.get(node.kind()) else {
        return;
    };
    // A comma list matches once per node even when several of its
    // branches do.
    let mut fired: Vec<(usize, usize)> = Vec::new();
    for hook in bucket {
        let instance = &mut instances[hook.instance];
        if instance.failure.is_some() {
            continue;
        }
        if fired.contains(&(hook.instance, hook.callback)) {
            continue;
        }
        if !hook.branch.matches(node, ancestors) {
            continue;
        }
        fired.push((hook.instance, hook.callback));
        let Instance {
            ctx,
            callbacks,
            failure,
        } = instance;
        ctx.set_ancestors(ancestors.to_vec());
        if let Err(error) = (callbacks[hook.callback])(node, ctx) {
            *failure = Some(error);
        }
    }
}
