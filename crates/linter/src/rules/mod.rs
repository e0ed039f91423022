//! Built-in lint rules.
//!
//! Each rule is a standalone [`RuleModule`](crate::rule::RuleModule);
//! the registry decides which of them ship decorated.

mod cyclomatic_complexity;
mod elseif_without_else;
mod no_empty_block;
mod no_nested_switch;
mod no_void;

pub use cyclomatic_complexity::CyclomaticComplexity;
pub use elseif_without_else::ElseifWithoutElse;
pub use no_empty_block::{no_empty_block, NoEmptyBlock};
pub use no_nested_switch::NoNestedSwitch;
pub use no_void::NoVoid;
