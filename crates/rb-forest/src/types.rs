//! Node trait definitions.
//!
//! Every "pointer" is an `Option<u32>` index into a [`Vec`]-backed arena.
//! All tree-manipulation functions take the arena as a slice and work with
//! indices, so a tree never holds references into its own storage.

/// Binary-tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Node color bit. Rotations and color fixups only need this and the links.
pub trait RbColor: Node {
    fn is_black(&self) -> bool;
    fn set_black(&mut self, black: bool);
}

/// Red-black node carrying an element handle.
///
/// `E` is the handle of the element the node indexes. Handles are compared
/// by identity (`==`) and ordered only through a caller-supplied comparator.
pub trait RbNodeLike<E>: RbColor {
    fn elem(&self) -> &E;
}
