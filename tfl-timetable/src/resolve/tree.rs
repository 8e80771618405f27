//! Walking the hub → child stop point tree.

use tracing::warn;

use crate::tfl::StopPoint;

/// Identifier prefix of hub (station complex) stop points.
pub const HUB_PREFIX: &str = "HUB";

/// Identifier prefix of Underground platform-level stop points.
pub const PLATFORM_PREFIX: &str = "940G";

/// Deepest level of the tree that will be visited. Hubs are rarely more
/// than three levels deep; anything past this is treated as bad data.
pub const MAX_TREE_DEPTH: usize = 32;

/// Whether an identifier names a hub.
pub fn is_hub(id: &str) -> bool {
    id.starts_with(HUB_PREFIX)
}

/// Whether an identifier names a servable platform.
pub fn is_platform(id: &str) -> bool {
    id.starts_with(PLATFORM_PREFIX)
}

/// Collect every platform identifier below `children`, in pre-order.
///
/// Hubs and other non-platform nodes are descended into but never
/// reported.
pub fn platform_descendants(children: &[StopPoint]) -> Vec<String> {
    let mut ids = Vec::new();
    walk(children, |node| {
        if is_platform(&node.id) {
            ids.push(node.id.clone());
        }
        true
    });
    ids
}

/// The first platform identifier below `children`, in pre-order.
pub fn first_platform_descendant(children: &[StopPoint]) -> Option<String> {
    let mut found = None;
    walk(children, |node| {
        if is_platform(&node.id) {
            found = Some(node.id.clone());
            return false;
        }
        true
    });
    found
}

/// Pre-order traversal with an explicit stack.
///
/// `visit` returns `false` to stop the walk early.
fn walk<'a>(children: &'a [StopPoint], mut visit: impl FnMut(&'a StopPoint) -> bool) {
    let mut stack: Vec<(&StopPoint, usize)> = children.iter().rev().map(|c| (c, 1)).collect();

    while let Some((node, depth)) = stack.pop() {
        if depth > MAX_TREE_DEPTH {
            warn!(id = %node.id, depth, "stop point tree deeper than limit; skipping subtree");
            continue;
        }

        if !visit(node) {
            return;
        }

        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
}
