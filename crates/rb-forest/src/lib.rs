//! Arena-based red-black tree engine.
//!
//! The tree indexes opaque element handles (`E`) that are ordered only by a
//! caller-supplied three-way comparator and told apart by `==`. Several
//! handles may compare equal; they are kept in insertion order and can each
//! be located again by identity.
//!
//! Instead of raw pointers, all links are `Option<u32>` indices into a
//! `Vec`-backed arena, so parent back-links never alias anything.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`], [`RbColor`] and [`RbNodeLike`] traits |
//! | [`util`] | `first`, `last`, `next`, `prev`, `size`, `height` |
//! | [`red_black`] | insert / remove / identity search / drain / checker, [`RbTree`] |

pub mod error;
pub mod red_black;
pub mod types;
pub mod util;

pub use error::ForestError;
pub use red_black::{RbNode, RbTree};
pub use types::{Node, RbColor, RbNodeLike};
pub use util::{first, last, next, prev, size};
