//! Listener maps and listener merging.
//!
//! A [`ListenerMap`] is what [`RuleModule::create`] returns: an ordered
//! list of `(selector, callback)` registrations for one file. Selector
//! strings are kept raw here and compiled once at activation time.
//!
//! [`merge_listeners`] folds several maps into one, for rules composed of
//! independent checks. Merged siblings are isolated: a failing callback
//! never prevents the remaining callbacks on the same selector from
//! running, and the first error surfaces only after all of them ran.

use std::collections::HashMap;

use jsts_syntax::AstNode;

use crate::rule::{RuleContext, RuleError, RuleModule};

/// A node listener. `FnMut` so per-file state can live in the closure.
pub type NodeCallback =
    Box<dyn FnMut(&AstNode, &mut RuleContext<'_>) -> Result<(), RuleError>>;

/// Ordered selector-to-callback registrations for one file
#[derive(Default)]
pub struct ListenerMap {
    entries: Vec<(String, NodeCallback)>,
}

impl ListenerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for a selector string. Registration order is
    /// preserved and selectors may repeat.
    #[must_use]
    pub fn on<F>(mut self, selector: &str, callback: F) -> Self
    where
        F: FnMut(&AstNode, &mut RuleContext<'_>) -> Result<(), RuleError> + 'static,
    {
        self.entries.push((selector.to_owned(), Box::new(callback)));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(selector, _)| selector.as_str())
    }

    pub(crate) fn into_entries(self) -> Vec<(String, NodeCallback)> {
        self.entries
    }
}

impl std::fmt::Debug for ListenerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerMap")
            .field("selectors", &self.selectors().collect::<Vec<_>>())
            .finish()
    }
}

/// Merge several listener maps into one, grouping callbacks that share a
/// selector string under a single combined callback.
#[must_use]
pub fn merge_listeners(maps: Vec<ListenerMap>) -> ListenerMap {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<NodeCallback>> = HashMap::new();
    for map in maps {
        for (selector, callback) in map.into_entries() {
            let callbacks = grouped.entry(selector.clone()).or_default();
            if callbacks.is_empty() {
                order.push(selector);
            }
            callbacks.push(callback);
        }
    }

    let mut merged = ListenerMap::new();
    for selector in order {
        let Some(mut callbacks) = grouped.remove(&selector) else {
            continue;
        };
        if callbacks.len() == 1 {
            merged.entries.push((selector, callbacks.remove(0)));
        } else {
            merged = merged.on(&selector, move |node, ctx| {
                let mut first_error = None;
                for callback in &mut callbacks {
                    if let Err(error) = callback(node, ctx) {
                        first_error.get_or_insert(error);
                    }
                }
                first_error.map_or(Ok(()), Err)
            });
        }
    }
    merged
}

/// Build the merged listener map of several sub-rules, as one rule's
/// `create` output
pub fn merge_rules(
    rules: &[&dyn RuleModule],
    options: &serde_json::Value,
) -> Result<ListenerMap, RuleError> {
    let mut maps = Vec::with_capacity(rules.len());
    for rule in rules {
        maps.push(rule.create(options)?);
    }
    Ok(merge_listeners(maps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Location, Severity};
    use crate::rule::{ReportDescriptor, RuleMeta};
    use jsts_syntax::{OffsetRange, SourceFile, VisitorKeys};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn file() -> SourceFile {
        let ast = AstNode::new("Program", OffsetRange::new(0, 1));
        SourceFile::new("test.js", ";", ast, VisitorKeys::estree())
    }

    fn ctx(file: &SourceFile) -> RuleContext<'_> {
        RuleContext::new(
            RuleMeta::new("merge-test", "merge test"),
            file,
            Severity::Warning,
            serde_json::Value::Null,
        )
    }

    fn fire(map: &mut ListenerMap, ctx: &mut RuleContext<'_>) -> Vec<Result<(), RuleError>> {
        let node = AstNode::new("Program", OffsetRange::new(0, 1));
        map.entries
            .iter_mut()
            .map(|(_, callback)| callback(&node, ctx))
            .collect()
    }

    #[test]
    fn merge_preserves_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (a, b, c) = (seen.clone(), seen.clone(), seen.clone());
        let first = ListenerMap::new()
            .on("Program", move |_, _| {
                a.borrow_mut().push("first");
                Ok(())
            })
            .on("IfStatement", move |_, _| {
                b.borrow_mut().push("if");
                Ok(())
            });
        let second = ListenerMap::new().on("Program", move |_, _| {
            c.borrow_mut().push("second");
            Ok(())
        });

        let mut merged = merge_listeners(vec![first, second]);
        assert_eq!(
            merged.selectors().collect::<Vec<_>>(),
            vec!["Program", "IfStatement"]
        );

        let file = file();
        let mut ctx = ctx(&file);
        let results = fire(&mut merged, &mut ctx);
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(*seen.borrow(), vec!["first", "second", "if"]);
    }

    #[test]
    fn merged_siblings_run_even_after_an_error() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (seen.clone(), seen.clone());
        let failing = ListenerMap::new().on("Program", move |_, _| {
            a.borrow_mut().push("failing");
            Err(RuleError::execution("merge-test", "first sibling failed"))
        });
        let surviving = ListenerMap::new().on("Program", move |_, _| {
            b.borrow_mut().push("surviving");
            Ok(())
        });

        let mut merged = merge_listeners(vec![failing, surviving]);
        let file = file();
        let mut ctx = ctx(&file);
        let results = fire(&mut merged, &mut ctx);

        // Both siblings ran; the first error is what surfaces.
        assert_eq!(*seen.borrow(), vec!["failing", "surviving"]);
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(RuleError::Execution { .. })));
    }

    #[test]
    fn merged_callbacks_share_the_context() {
        let first = ListenerMap::new().on("Program", |node, ctx| {
            ctx.report(ReportDescriptor::on_node(node).message("from first"))
        });
        let second = ListenerMap::new().on("Program", |_, ctx| {
            ctx.report(ReportDescriptor::at(Location::new(1, 0, 1, 1)).message("from second"))
        });

        let mut merged = merge_listeners(vec![first, second]);
        let file = file();
        let mut ctx = ctx(&file);
        let results = fire(&mut merged, &mut ctx);
        assert!(results.iter().all(Result::is_ok));

        let messages: Vec<_> = ctx.take_issues().into_iter().map(|i| i.message).collect();
        assert_eq!(messages, vec!["from first", "from second"]);
    }
}
