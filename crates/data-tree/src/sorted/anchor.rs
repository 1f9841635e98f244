use rb_forest::{ForestError, RbTree};

use super::compare::{compare_kind, SortKind};
use crate::tree::{DataTree, NodeId};

/// Lifecycle of a sibling group's index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorState {
    /// The element carries no anchor.
    Absent,
    /// Anchor exists, index not built.
    Singleton,
    /// Anchor holds an index over `len` members.
    Materialized { len: usize },
}

/// Per-group cell carried by the leader, holding the index once built.
#[derive(Debug, Default)]
pub struct Anchor {
    pub(crate) index: Option<SortedIndex>,
}

impl Anchor {
    pub fn index(&self) -> Option<&SortedIndex> {
        self.index.as_ref()
    }

    pub fn state(&self) -> AnchorState {
        match &self.index {
            None => AnchorState::Singleton,
            Some(index) => AnchorState::Materialized { len: index.len() },
        }
    }
}

/// Red-black index over a sorted sibling group.
#[derive(Debug)]
pub struct SortedIndex {
    kind: SortKind,
    tree: RbTree<NodeId>,
}

impl SortedIndex {
    fn empty(kind: SortKind, node_limit: Option<usize>) -> Self {
        let tree = match node_limit {
            Some(limit) => RbTree::with_node_limit(limit),
            None => RbTree::new(),
        };
        Self { kind, tree }
    }

    /// Builds the index from the run of same-schema siblings starting at
    /// `leader`. On failure the partial index is dropped.
    pub(crate) fn materialize(
        data: &DataTree,
        leader: NodeId,
        kind: SortKind,
    ) -> Result<Self, ForestError> {
        let limit = data.context().options().index_node_limit;
        let mut index = Self::empty(kind, limit);
        let schema = data.schema_of(leader);
        let mut curr = Some(leader);
        while let Some(member) = curr {
            if data.schema_of(member) != schema {
                break;
            }
            index.insert(data, member)?;
            curr = data.next_sibling(member);
        }
        Ok(index)
    }

    pub fn kind(&self) -> SortKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Members in index order.
    pub fn members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree.iter().copied()
    }

    pub(crate) fn insert(&mut self, data: &DataTree, e: NodeId) -> Result<u32, ForestError> {
        let kind = self.kind;
        self.tree
            .insert(e, &|a: &NodeId, b: &NodeId| compare_kind(data, kind, *a, *b))
    }

    /// Element ordered right before index node `node`.
    pub(crate) fn predecessor(&self, node: u32) -> Option<NodeId> {
        self.tree.prev(node).map(|p| *self.tree.elem(p))
    }

    /// Removes `e`.
    ///
    /// # Panics
    ///
    /// If `e` is not in the index.
    pub(crate) fn remove(&mut self, data: &DataTree, e: NodeId) {
        let kind = self.kind;
        let found = self
            .tree
            .find(&e, &|a: &NodeId, b: &NodeId| compare_kind(data, kind, *a, *b));
        let Some(node) = found else {
            panic!("{e:?} is a group member but missing from its sorted index");
        };
        self.tree.remove(node);
    }

    /// Checks the red-black invariants and that index order equals the
    /// sibling order starting at `leader`. Returns the black height.
    pub fn check(&self, data: &DataTree, leader: NodeId) -> Result<usize, String> {
        let kind = self.kind;
        let bh = self
            .tree
            .check(&|a: &NodeId, b: &NodeId| compare_kind(data, kind, *a, *b))?;
        let schema = data.schema_of(leader);
        let mut sibling = Some(leader);
        for member in self.members() {
            match sibling {
                Some(s) if s == member => sibling = data.next_sibling(s),
                _ => {
                    return Err(format!(
                        "index member {member:?} out of sibling order\n{}",
                        self.tree.dump()
                    ))
                }
            }
        }
        if let Some(s) = sibling {
            if data.schema_of(s) == schema {
                return Err(format!("sibling {s:?} missing from the index"));
            }
        }
        Ok(bh)
    }

    /// Releases every index node without rebalancing.
    pub(crate) fn drain(mut self) -> usize {
        self.tree.drain_all(|_| {})
    }
}
