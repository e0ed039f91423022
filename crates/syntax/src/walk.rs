use crate::keys::VisitorKeys;
use crate::node::AstNode;

/// One step of a depth-first traversal: a node is entered before any of
/// its children are visited and left after all of them have been.
#[derive(Debug, Clone, Copy)]
pub enum WalkEvent<'a> {
    Enter(&'a AstNode),
    Leave(&'a AstNode),
}

impl<'a> WalkEvent<'a> {
    #[must_use]
    pub const fn node(&self) -> &'a AstNode {
        match self {
            Self::Enter(node) | Self::Leave(node) => node,
        }
    }
}

/// Depth-first walk over the tree, emitting exactly one `Enter` and one
/// `Leave` event per reachable node. Children are resolved through the
/// visitor-keys table, so the walk is total and deterministic for any
/// node kind.
pub fn walk<'a>(root: &'a AstNode, keys: &VisitorKeys, on_event: &mut dyn FnMut(WalkEvent<'a>)) {
    on_event(WalkEvent::Enter(root));
    for child in root.child_nodes(keys) {
        walk(child, keys, on_event);
    }
    on_event(WalkEvent::Leave(root));
}
