//! Role-scoped projection of the navigation tree

use super::tree::{NavItem, NavSection};
use crate::auth::user::Role;

/// Filters the tree down to what `role` may see.
///
/// Pure projection: the input is untouched, order is preserved, the same
/// inputs always produce the same output. Role gating is checked per node
/// independently; a child with no role requirement survives whenever its
/// section does, regardless of how sibling entries are gated.
pub fn resolve(tree: &[NavSection], role: Role) -> Vec<NavSection> {
    tree.iter()
        .filter(|section| role.permits(section.role))
        .map(|section| NavSection {
            section: section.section.clone(),
            role: section.role,
            items: resolve_items(&section.items, role),
        })
        .collect()
}

fn resolve_items(items: &[NavItem], role: Role) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| role.permits(item.role))
        .map(|item| NavItem {
            children: item
                .children
                .iter()
                .filter(|c| role.permits(c.role))
                .cloned()
                .collect(),
            ..item.clone()
        })
        .collect()
}
