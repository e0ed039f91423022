//! Rule engine for JavaScript and TypeScript analysis.
//!
//! The engine runs selector-registered rule listeners over the generic
//! syntax trees of [`jsts_syntax`] in a single traversal per file,
//! collects the issues each rule reports through its (possibly
//! decorated) context, and hands back one [`FileResult`] per file.

mod config;
mod decorate;
mod driver;
mod issue;
mod listener;
mod metrics;
mod registry;
mod rule;
mod rules;
mod selector;

pub use config::{LintConfig, RuleLevel, RuleSetting};
pub use decorate::{intercept_report, DecoratedRule};
pub use driver::{FileResult, Linter, RuleFailure};
pub use issue::{
    decode_issue, encode_message, DecodeError, EncodeError, Issue, LocRef, Location, QuickFix,
    SecondaryLocation, Severity, TextEdit,
};
pub use listener::{merge_listeners, merge_rules, ListenerMap, NodeCallback};
pub use metrics::{
    complexity_nodes, cyclomatic_complexity, file_metrics, function_complexity,
    function_complexity_nodes, increases_complexity, is_function, FileMetrics, FUNCTION_KINDS,
};
pub use registry::{all_rule_names, all_rules, find_rule};
pub use rule::{
    ReportDescriptor, ReportMessage, ReportTransform, RuleContext, RuleError, RuleMeta, RuleModule,
};
pub use rules::{no_empty_block, CyclomaticComplexity, ElseifWithoutElse, NoEmptyBlock,
    NoNestedSwitch, NoVoid};
pub use selector::{AttrPredicate, AttrValue, Phase, Selector, SelectorBranch, SelectorError};
