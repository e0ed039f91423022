//! Node selector strings and their compiled form.
//!
//! A listener registers against a selector string: a bare node kind
//! (`"IfStatement"`), a kind plus phase (`"IfStatement:exit"`), a kind
//! plus attribute predicate (`"UnaryExpression[operator='void']"`), a
//! descendant combinator (`"SwitchStatement SwitchStatement"`), or a
//! comma-separated list of any of those. Selectors are parsed exactly
//! once, at rule activation; traversal then dispatches on the node kind
//! without any per-node string matching.

use jsts_syntax::{AstNode, FieldValue};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("invalid selector `{selector}`: {reason}")]
    Invalid { selector: String, reason: String },
}

impl SelectorError {
    fn invalid(selector: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            selector: selector.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Whether a hook fires before or after a node's children are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Enter,
    Exit,
}

/// Literal value an attribute predicate compares against
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Number(f64),
    Bool(bool),
}

/// `[field]` (presence) or `[field=literal]` (equality on a scalar field)
#[derive(Debug, Clone, PartialEq)]
pub struct AttrPredicate {
    pub field: String,
    pub value: Option<AttrValue>,
}

impl AttrPredicate {
    #[must_use]
    pub fn matches(&self, node: &AstNode) -> bool {
        let Some(actual) = node.get(&self.field) else {
            return false;
        };
        match &self.value {
            None => !matches!(actual, FieldValue::Null),
            Some(AttrValue::Str(expected)) => {
                matches!(actual, FieldValue::Str(value) if value == expected)
            }
            Some(AttrValue::Number(expected)) => {
                matches!(actual, FieldValue::Number(value) if (value - expected).abs() < f64::EPSILON)
            }
            Some(AttrValue::Bool(expected)) => {
                matches!(actual, FieldValue::Bool(value) if value == expected)
            }
        }
    }
}

/// One alternative of a selector, fully resolved
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorBranch {
    pub kind: String,
    pub phase: Phase,
    pub predicate: Option<AttrPredicate>,
    /// Required ancestor kind for the descendant combinator
    pub ancestor: Option<String>,
}

impl SelectorBranch {
    /// Whether this branch matches `node` given the current ancestor
    /// chain (innermost last, not including `node` itself)
    #[must_use]
    pub fn matches(&self, node: &AstNode, ancestors: &[&AstNode]) -> bool {
        if node.kind() != self.kind {
            return false;
        }
        if let Some(predicate) = &self.predicate {
            if !predicate.matches(node) {
                return false;
            }
        }
        if let Some(ancestor) = &self.ancestor {
            if !ancestors.iter().any(|parent| parent.kind() == ancestor) {
                return false;
            }
        }
        true
    }
}

/// A parsed selector: one or more branches (comma alternation)
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    raw: String,
    branches: Vec<SelectorBranch>,
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        if raw.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut branches = Vec::new();
        for part in split_alternatives(raw) {
            let part = part.trim();
            if part.is_empty() {
                return Err(SelectorError::invalid(raw, "empty alternative"));
            }
            branches.push(parse_branch(raw, part)?);
        }
        Ok(Self {
            raw: raw.to_owned(),
            branches,
        })
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn branches(&self) -> &[SelectorBranch] {
        &self.branches
    }
}

/// Split on top-level commas, leaving quoted attribute values intact
fn split_alternatives(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (offset, ch) in raw.char_indices() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&raw[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}

fn parse_branch(raw: &str, part: &str) -> Result<SelectorBranch, SelectorError> {
    // At most one descendant combinator: "Ancestor Descendant".
    let segments: Vec<&str> = part.split_whitespace().collect();
    let (ancestor, last) = match segments.as_slice() {
        [last] => (None, *last),
        [ancestor, last] => {
            if !is_kind_name(ancestor) {
                return Err(SelectorError::invalid(
                    raw,
                    format!("`{ancestor}` is not a plain node kind"),
                ));
            }
            (Some((*ancestor).to_owned()), *last)
        }
        _ => {
            return Err(SelectorError::invalid(
                raw,
                "at most one descendant combinator is supported",
            ))
        }
    };

    let (rest, phase) = match last.strip_suffix(":exit") {
        Some(rest) => (rest, Phase::Exit),
        None => (last, Phase::Enter),
    };

    let (kind, predicate) = match rest.find('[') {
        Some(open) => {
            let Some(inner) = rest[open..].strip_prefix('[').and_then(|s| s.strip_suffix(']'))
            else {
                return Err(SelectorError::invalid(raw, "unterminated attribute predicate"));
            };
            (&rest[..open], Some(parse_predicate(raw, inner)?))
        }
        None => (rest, None),
    };

    if !is_kind_name(kind) {
        return Err(SelectorError::invalid(
            raw,
            format!("`{kind}` is not a valid node kind"),
        ));
    }

    Ok(SelectorBranch {
        kind: kind.to_owned(),
        phase,
        predicate,
        ancestor,
    })
}

fn parse_predicate(raw: &str, inner: &str) -> Result<AttrPredicate, SelectorError> {
    let Some((field, literal)) = inner.split_once('=') else {
        let field = inner.trim();
        if field.is_empty() {
            return Err(SelectorError::invalid(raw, "empty attribute predicate"));
        }
        return Ok(AttrPredicate {
            field: field.to_owned(),
            value: None,
        });
    };

    let field = field.trim();
    if field.is_empty() {
        return Err(SelectorError::invalid(raw, "empty attribute name"));
    }
    let literal = literal.trim();
    let value = if let Some(text) = strip_quotes(literal) {
        AttrValue::Str(text.to_owned())
    } else if literal == "true" || literal == "false" {
        AttrValue::Bool(literal == "true")
    } else if let Ok(number) = literal.parse::<f64>() {
        AttrValue::Number(number)
    } else {
        return Err(SelectorError::invalid(
            raw,
            format!("`{literal}` is not a supported attribute literal"),
        ));
    };

    Ok(AttrPredicate {
        field: field.to_owned(),
        value: Some(value),
    })
}

fn strip_quotes(literal: &str) -> Option<&str> {
    for quote in ['\'', '"'] {
        if let Some(rest) = literal.strip_prefix(quote) {
            return rest.strip_suffix(quote);
        }
    }
    None
}

fn is_kind_name(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}
