//! Sorted sibling groups.
//!
//! Instances of a system-ordered list or leaf-list form a contiguous run of
//! siblings. Once a run holds two or more members, a red-black index over it
//! is kept by the first member (the leader) in its [`Anchor`]. The index and
//! the sibling chain always list the members in the same order.
//!
//! | State          | Members | Leader's anchor           |
//! |----------------|---------|---------------------------|
//! | Absent         | 0       | none                      |
//! | Singleton      | 1       | present, no index         |
//! | Materialized   | 2+      | present, index of members |

mod anchor;
mod compare;

pub use anchor::{Anchor, AnchorState, SortedIndex};
pub use compare::SortKind;

use tracing::{debug, trace};

use crate::context::YANG_MODULE;
use crate::error::TreeError;
use crate::schema::SchemaId;
use crate::tree::{DataTree, NodeId};

/// Name of the reserved metadata slot holding the index, in [`YANG_MODULE`].
pub const ANCHOR_NAME: &str = "lyds_tree";

/// Whether instances like `e` are kept sorted by the data tree.
pub fn is_orderable(tree: &DataTree, e: NodeId) -> bool {
    SortKind::of(tree.schema_node(e)).is_some()
}

/// Orders two instances of the same orderable schema node.
///
/// # Panics
///
/// If the schema nodes differ or are not orderable.
pub fn compare(tree: &DataTree, e1: NodeId, e2: NodeId) -> i32 {
    assert_eq!(
        tree.schema_of(e1),
        tree.schema_of(e2),
        "compared instances of different schema nodes"
    );
    let Some(kind) = SortKind::of(tree.schema_node(e1)) else {
        panic!(
            "instances of \"{}\" are not ordered by the system",
            tree.schema_node(e1).name
        );
    };
    compare::compare_kind(tree, kind, e1, e2)
}

/// First instance of `schema` among the children of `parent`.
pub fn group_leader(tree: &DataTree, parent: Option<NodeId>, schema: SchemaId) -> Option<NodeId> {
    tree.first_instance(parent, schema)
}

/// Members of the group led by `leader`, in sibling order.
pub fn group_members(tree: &DataTree, leader: NodeId) -> Vec<NodeId> {
    let schema = tree.schema_of(leader);
    let mut members = vec![];
    let mut curr = Some(leader);
    while let Some(m) = curr {
        if tree.schema_of(m) != schema {
            break;
        }
        members.push(m);
        curr = tree.next_sibling(m);
    }
    members
}

pub fn group_len(tree: &DataTree, leader: NodeId) -> usize {
    group_members(tree, leader).len()
}

pub fn anchor_state(tree: &DataTree, e: NodeId) -> AnchorState {
    match &tree.node(e).anchor {
        None => AnchorState::Absent,
        Some(anchor) => anchor.state(),
    }
}

/// Index kept by `leader`, if built.
pub fn index<'a>(tree: &'a DataTree, leader: NodeId) -> Option<&'a SortedIndex> {
    tree.node(leader).anchor.as_ref().and_then(Anchor::index)
}

/// Makes sure `leader` carries an anchor.
pub fn create_anchor(tree: &mut DataTree, leader: NodeId) -> Result<(), TreeError> {
    if tree.node(leader).anchor.is_some() {
        return Ok(());
    }
    debug_assert!(
        tree.prev_sibling(leader)
            .map_or(true, |p| tree.schema_of(p) != tree.schema_of(leader)),
        "anchor requested on a non-leading instance"
    );
    if tree.context().module(YANG_MODULE).is_none() {
        return Err(TreeError::ConfigurationMissing {
            module: YANG_MODULE,
        });
    }
    tree.node_mut(leader).anchor = Some(Anchor::default());
    trace!(?leader, "anchor created");
    Ok(())
}

fn take_index(tree: &mut DataTree, leader: NodeId) -> Option<SortedIndex> {
    tree.node_mut(leader)
        .anchor
        .as_mut()
        .and_then(|a| a.index.take())
}

fn put_index(tree: &mut DataTree, leader: NodeId, index: Option<SortedIndex>) {
    if let Some(anchor) = tree.node_mut(leader).anchor.as_mut() {
        anchor.index = index;
    }
}

fn move_anchor(tree: &mut DataTree, from: NodeId, to: NodeId) {
    let anchor = tree.node_mut(from).anchor.take();
    tree.node_mut(to).anchor = anchor;
    trace!(?from, ?to, "leader hand-off");
}

/// Links unattached `e` into the group led by `*leader` at its sorted
/// position. `*leader` is updated if `e` becomes the first member.
///
/// On error nothing is linked and the group is left as it was.
pub fn insert(tree: &mut DataTree, leader: &mut NodeId, e: NodeId) -> Result<(), TreeError> {
    assert!(!tree.is_linked(e), "{e:?} is already linked");
    assert_eq!(
        tree.schema_of(*leader),
        tree.schema_of(e),
        "inserted instance does not belong to the group"
    );
    let Some(kind) = SortKind::of(tree.schema_node(e)) else {
        panic!(
            "instances of \"{}\" are not ordered by the system",
            tree.schema_node(e).name
        );
    };

    // Leftover from an earlier unlink; at most a singleton.
    if let Some(stale) = tree.node_mut(e).anchor.take() {
        debug_assert!(stale.index.as_ref().map_or(true, |i| i.len() <= 1));
        drop_anchor(stale);
    }

    create_anchor(tree, *leader)?;
    let (mut index, fresh) = match take_index(tree, *leader) {
        Some(index) => (index, false),
        None => {
            let index = SortedIndex::materialize(tree, *leader, kind)?;
            debug!(leader = ?*leader, members = index.len(), "sorted index materialized");
            (index, true)
        }
    };

    let node = match index.insert(tree, e) {
        Ok(node) => node,
        Err(err) => {
            if !fresh {
                put_index(tree, *leader, Some(index));
            }
            return Err(err.into());
        }
    };

    match index.predecessor(node) {
        Some(prev) => tree.link_after(prev, e),
        None => {
            tree.link_before(*leader, e);
            move_anchor(tree, *leader, e);
            *leader = e;
        }
    }
    put_index(tree, *leader, Some(index));
    Ok(())
}

/// Removes `e` from the index of the group led by `*leader`. The caller
/// unlinks `e` from the sibling chain afterwards.
///
/// Nothing happens if the group has no anchor or `e` is its only member.
/// If `e` leads, the anchor passes to the next member and `*leader` is
/// updated.
///
/// # Panics
///
/// If the group is indexed but `e` is not found in the index.
pub fn unlink(tree: &mut DataTree, leader: &mut NodeId, e: NodeId) {
    if tree.node(*leader).anchor.is_none() {
        return;
    }
    let schema = tree.schema_of(*leader);
    let Some(second) = tree
        .next_sibling(*leader)
        .filter(|&n| tree.schema_of(n) == schema)
    else {
        return;
    };

    let index = take_index(tree, *leader);
    if *leader == e {
        move_anchor(tree, e, second);
        *leader = second;
    }
    let Some(mut index) = index else {
        return;
    };

    index.remove(tree, e);
    if index.len() <= 1 {
        let released = index.drain();
        debug!(leader = ?*leader, released, "sorted index reverted to singleton");
        put_index(tree, *leader, None);
    } else {
        put_index(tree, *leader, Some(index));
    }
}

/// Drops the anchor of `e`, and its index, if it carries one.
pub fn free_anchor(tree: &mut DataTree, e: NodeId) {
    if let Some(anchor) = tree.node_mut(e).anchor.take() {
        drop_anchor(anchor);
    }
}

pub(crate) fn drop_anchor(anchor: Anchor) {
    if let Some(index) = anchor.index {
        drop_group(index);
    }
}

/// Tears a whole index down without rebalancing. Returns the number of
/// index nodes released.
pub fn drop_group(index: SortedIndex) -> usize {
    let released = index.drain();
    debug!(released, "sorted group torn down");
    released
}
