//! Red-black index: node type, algorithms and the owning arena.

pub mod print;
pub mod tree;
pub mod types;
pub mod util;

pub use print::print;
pub use tree::RbTree;
pub use types::RbNode;
pub use util::{assert_red_black_tree, drain, find_by_identity, insert, remove};
