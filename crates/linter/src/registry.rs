//! Registry of all available lint rules.
//!
//! Rules are constructed once and shared; decorated variants are
//! registered instead of their base rule where decoration is part of
//! the shipped behavior.

use crate::rule::RuleModule;
use crate::rules::{
    no_empty_block, CyclomaticComplexity, ElseifWithoutElse, NoNestedSwitch, NoVoid,
};
use std::sync::{Arc, LazyLock};

static ALL_RULES: LazyLock<Vec<Arc<dyn RuleModule>>> = LazyLock::new(|| {
    vec![
        Arc::new(CyclomaticComplexity),
        Arc::new(ElseifWithoutElse),
        Arc::new(no_empty_block()),
        Arc::new(NoNestedSwitch),
        Arc::new(NoVoid),
    ]
});

#[must_use]
pub fn all_rules() -> &'static [Arc<dyn RuleModule>] {
    &ALL_RULES
}

#[must_use]
pub fn find_rule(id: &str) -> Option<Arc<dyn RuleModule>> {
    all_rules().iter().find(|rule| rule.meta().id == id).cloned()
}

#[must_use]
pub fn all_rule_names() -> Vec<String> {
    let mut names: Vec<String> = all_rules().iter().map(|rule| rule.meta().id).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_ids_are_unique_and_sorted_names_are_complete() {
        let names = all_rule_names();
        assert_eq!(names.len(), all_rules().len());
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
    }

    #[test]
    fn find_rule_matches_by_id() {
        assert!(find_rule("no-void").is_some());
        assert!(find_rule("no-such-rule").is_none());
    }

    #[test]
    fn the_registered_empty_block_rule_is_decorated() {
        let rule = find_rule("no-empty-block").unwrap();
        assert!(!rule.report_transforms().is_empty());
    }
}
