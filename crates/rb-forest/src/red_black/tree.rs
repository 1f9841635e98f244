use crate::error::ForestError;
use crate::util::{first, last, next, prev};

use super::types::RbNode;
use super::util;

/// Red-black tree that owns its node arena.
///
/// Node slots released by [`RbTree::remove`] are recycled by later
/// insertions. Arena growth goes through `Vec::try_reserve`, so running out
/// of memory surfaces as [`ForestError::OutOfMemory`] instead of aborting.
#[derive(Clone, Debug)]
pub struct RbTree<E> {
    arena: Vec<RbNode<E>>,
    free: Vec<u32>,
    root: Option<u32>,
    len: usize,
    node_limit: Option<usize>,
}

impl<E> Default for RbTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> RbTree<E> {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            node_limit: None,
        }
    }

    /// Tree that refuses to hold more than `limit` live nodes; any insertion
    /// beyond that fails with [`ForestError::OutOfMemory`].
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            node_limit: Some(limit),
            ..Self::new()
        }
    }

    pub fn root(&self) -> Option<u32> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn arena(&self) -> &[RbNode<E>] {
        &self.arena
    }

    pub fn first(&self) -> Option<u32> {
        first(&self.arena, self.root)
    }

    pub fn last(&self) -> Option<u32> {
        last(&self.arena, self.root)
    }

    pub fn next(&self, node: u32) -> Option<u32> {
        next(&self.arena, node)
    }

    pub fn prev(&self, node: u32) -> Option<u32> {
        prev(&self.arena, node)
    }

    pub fn elem(&self, node: u32) -> &E {
        &self.arena[node as usize].e
    }

    fn alloc(&mut self, e: E) -> Result<u32, ForestError> {
        if self.node_limit.is_some_and(|limit| self.len >= limit) {
            return Err(ForestError::OutOfMemory);
        }
        if let Some(idx) = self.free.pop() {
            self.arena[idx as usize].reset(e);
            return Ok(idx);
        }
        let idx = u32::try_from(self.arena.len()).map_err(|_| ForestError::OutOfMemory)?;
        self.arena
            .try_reserve(1)
            .map_err(|_| ForestError::OutOfMemory)?;
        self.arena.push(RbNode::new(e));
        Ok(idx)
    }

    /// Wraps `e` in a new node and inserts it after every node comparing
    /// equal to it. Returns the node index.
    pub fn insert<C>(&mut self, e: E, comparator: &C) -> Result<u32, ForestError>
    where
        C: Fn(&E, &E) -> i32,
    {
        let n = self.alloc(e)?;
        self.root = util::insert(&mut self.arena, self.root, n, comparator);
        self.len += 1;
        Ok(n)
    }

    /// Removes node `node` and recycles its slot.
    pub fn remove(&mut self, node: u32) {
        self.root = util::remove(&mut self.arena, self.root, node);
        self.len -= 1;
        self.free.push(node);
    }

    /// Locates the node wrapping exactly `target`.
    pub fn find<C>(&self, target: &E, comparator: &C) -> Option<u32>
    where
        E: PartialEq,
        C: Fn(&E, &E) -> i32,
    {
        util::find_by_identity(&self.arena, self.root, target, comparator)
    }

    /// Elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        let mut curr = self.first();
        std::iter::from_fn(move || {
            let i = curr?;
            curr = self.next(i);
            Some(&self.arena[i as usize].e)
        })
    }

    /// Tears the whole tree down without rebalancing, handing every element
    /// to `visit` (leaves first, not in order). Returns the number of nodes
    /// released.
    pub fn drain_all<F: FnMut(&E)>(&mut self, mut visit: F) -> usize {
        let mut released = 0;
        util::drain(&mut self.arena, self.root.take(), |_, node| {
            released += 1;
            visit(&node.e);
        });
        self.arena.clear();
        self.free.clear();
        self.len = 0;
        released
    }

    /// Indented dump of the tree shape, for diagnostics.
    pub fn dump(&self) -> String
    where
        E: std::fmt::Debug,
    {
        super::print::<E, RbNode<E>>(&self.arena, self.root, "")
    }

    /// Validates the red-black invariants and in-order monotonicity; returns
    /// the black height.
    pub fn check<C>(&self, comparator: &C) -> Result<usize, String>
    where
        C: Fn(&E, &E) -> i32,
    {
        let bh = util::assert_red_black_tree(&self.arena, self.root, comparator)?;
        let counted = crate::util::size(&self.arena, self.root);
        if counted != self.len {
            return Err(format!("Tree holds {counted} nodes, expected {}", self.len));
        }
        Ok(bh)
    }
}
