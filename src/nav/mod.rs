//! Navigation descriptor tree and role-scoped resolution

pub mod resolver;
pub mod tree;

pub use resolver::resolve;
pub use tree::{default_tree, load_tree, NavChild, NavItem, NavSection};
