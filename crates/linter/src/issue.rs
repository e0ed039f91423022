//! The canonical issue record and its wire representations.
//!
//! An [`Issue`] is what one rule report becomes: a primary location in the
//! original source, a message, and optional cost, secondary locations and
//! quick fixes. The whole record serializes to plain JSON for the external
//! orchestrator, with no node references and no functions.
//!
//! Some reporting channels only carry a single string per report. For
//! those, [`encode_message`] packs `{message, cost?, secondaryLocations}`
//! into a JSON string at report time and [`decode_issue`] unpacks it at
//! collection time, for rules whose metadata opts into the convention.

use crate::rule::RuleMeta;
use jsts_syntax::{AstNode, OffsetRange, SourceLocation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Issue severity, after any configuration override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A resolved source position span: 1-based lines, 0-based columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    #[must_use]
    pub const fn new(line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }
}

impl From<SourceLocation> for Location {
    fn from(loc: SourceLocation) -> Self {
        Self {
            line: loc.start.line,
            column: loc.start.column,
            end_line: loc.end.line,
            end_column: loc.end.column,
        }
    }
}

/// An auxiliary location attached to an issue, with an optional
/// per-location message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub location: Location,
}

impl SecondaryLocation {
    #[must_use]
    pub fn new(location: Location, message: Option<&str>) -> Self {
        Self {
            message: message.map(str::to_owned),
            location,
        }
    }

    #[must_use]
    pub fn from_node(node: &AstNode, message: Option<&str>) -> Self {
        Self::new(node.loc().into(), message)
    }
}

/// A text edit replacing a byte range of the original source (empty
/// replacement text means deletion)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub offset_range: OffsetRange,
    pub new_text: String,
}

impl TextEdit {
    #[must_use]
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            offset_range: OffsetRange::new(start, end),
            new_text: new_text.into(),
        }
    }

    /// Create a deletion edit (replace range with empty string)
    #[must_use]
    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            offset_range: OffsetRange::new(start, end),
            new_text: String::new(),
        }
    }

    /// Create an insertion edit (insert text at position)
    #[must_use]
    pub fn insert(position: usize, text: impl Into<String>) -> Self {
        Self {
            offset_range: OffsetRange::at(position),
            new_text: text.into(),
        }
    }
}

/// A quick fix: a description plus an ordered list of non-overlapping
/// text edits against the original source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickFix {
    pub description: String,
    pub edits: Vec<TextEdit>,
}

impl QuickFix {
    #[must_use]
    pub fn new(description: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            description: description.into(),
            edits,
        }
    }

    /// Create a simple deletion fix
    #[must_use]
    pub fn delete(description: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            description: description.into(),
            edits: vec![TextEdit::delete(start, end)],
        }
    }
}

/// The canonical issue record emitted for one rule report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub rule_id: String,
    #[serde(flatten)]
    pub location: Location,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_locations: Vec<SecondaryLocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quick_fixes: Vec<QuickFix>,
    /// Fixes demoted to suggestions: same shape, but never auto-applied
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<QuickFix>,
}

/// A location-bearing reference used when encoding secondary locations
#[derive(Debug, Clone, Copy)]
pub enum LocRef<'a> {
    Node(&'a AstNode),
    Loc(SourceLocation),
}

impl LocRef<'_> {
    fn resolve(&self) -> Option<SourceLocation> {
        let loc = match self {
            Self::Node(node) => node.loc(),
            Self::Loc(loc) => *loc,
        };
        (!loc.is_unset()).then_some(loc)
    }
}

impl<'a> From<&'a AstNode> for LocRef<'a> {
    fn from(node: &'a AstNode) -> Self {
        Self::Node(node)
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("secondary location reference #{index} has no resolvable location")]
    MissingLocation { index: usize },

    #[error("failed to serialize encoded message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Decoding an encoded message failed. This is always loud: callers must
/// not mistake a malformed payload for "no secondary locations".
#[derive(Debug, Error)]
#[error("failed to decode issue message for rule '{rule}': {source}")]
pub struct DecodeError {
    pub rule: String,
    #[source]
    pub source: serde_json::Error,
}

/// The single-string payload shape used by the encoded-message convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedMessage {
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost: Option<f64>,
    #[serde(default)]
    secondary_locations: Vec<SecondaryLocation>,
}

/// Pack a message, secondary location references and an optional cost
/// into the single-string JSON payload.
///
/// `messages` is parallel to `refs`; a shorter list leaves the remaining
/// locations without a message. Fails if any reference has no resolvable
/// location.
pub fn encode_message(
    message: &str,
    refs: &[LocRef<'_>],
    messages: &[Option<&str>],
    cost: Option<f64>,
) -> Result<String, EncodeError> {
    let mut secondary_locations = Vec::with_capacity(refs.len());
    for (index, loc_ref) in refs.iter().enumerate() {
        let loc = loc_ref
            .resolve()
            .ok_or(EncodeError::MissingLocation { index })?;
        let message = messages.get(index).copied().flatten();
        secondary_locations.push(SecondaryLocation::new(loc.into(), message));
    }
    let payload = EncodedMessage {
        message: message.to_owned(),
        cost,
        secondary_locations,
    };
    Ok(serde_json::to_string(&payload)?)
}

/// Unpack an encoded message back into structured issue fields.
///
/// Rules that do not opt into the convention get their issue back
/// unchanged, even if the message happens to be valid JSON.
pub fn decode_issue(meta: &RuleMeta, issue: Issue) -> Result<Issue, DecodeError> {
    if !meta.encoded_messages {
        return Ok(issue);
    }
    let decoded: EncodedMessage =
        serde_json::from_str(&issue.message).map_err(|source| DecodeError {
            rule: meta.id.clone(),
            source,
        })?;
    Ok(Issue {
        message: decoded.message,
        cost: decoded.cost,
        secondary_locations: decoded.secondary_locations,
        ..issue
    })
}
