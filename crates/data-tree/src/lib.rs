//! YANG-style data tree with sorted sibling indexes.
//!
//! Instances of system-ordered lists and leaf-lists are kept in sorted order
//! among their siblings. Groups of two or more members carry a red-black
//! index ([`rb_forest::RbTree`]) so that insertion and removal cost
//! O(log n) instead of a linear scan of the sibling chain.
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | `context`   | Loaded modules, schema and options                     |
//! | `schema`    | Containers, leaves, leaf-lists and keyed lists         |
//! | `value`     | Typed terminal values and their orders                 |
//! | `tree`      | Element arena, sibling chains, metadata                |
//! | `sorted`    | Sorted sibling groups: anchors, indexes, hand-off      |
//! | `json`      | JSON print and parse                                   |

pub mod context;
pub mod error;
pub mod json;
pub mod schema;
pub mod sorted;
pub mod tree;
pub mod value;

pub use context::{Context, ContextOptions, YANG_MODULE};
pub use error::TreeError;
pub use schema::{OrderedBy, SchemaId, SchemaKind, SchemaNode, SchemaTree};
pub use sorted::{AnchorState, SortKind, ANCHOR_NAME};
pub use tree::{DataTree, Meta, NodeId};
pub use value::{Value, ValueType};
