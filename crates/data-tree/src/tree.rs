//! Data tree: an arena of elements linked into sibling chains.
//!
//! Every parent (and the top level) owns a doubly linked chain of children.
//! Instances of one schema node always form a contiguous run in that chain;
//! system-ordered runs are additionally kept sorted through [`crate::sorted`].

use std::collections::HashMap;

use tracing::warn;

use crate::context::{Context, YANG_MODULE};
use crate::error::TreeError;
use crate::schema::{SchemaId, SchemaKind, SchemaNode};
use crate::sorted::{self, Anchor, ANCHOR_NAME};
use crate::value::Value;

/// Handle of an element. Handles of freed elements are recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

/// Metadata attribute attached to an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Meta {
    pub name: String,
    pub value: String,
}

/// First and last instance of one schema node among a parent's children.
#[derive(Clone, Copy, Debug)]
struct Run {
    first: NodeId,
    last: NodeId,
}

/// Child chain of a parent, or of the top level.
#[derive(Debug, Default)]
pub(crate) struct Children {
    first: Option<NodeId>,
    last: Option<NodeId>,
    runs: HashMap<SchemaId, Run>,
}

#[derive(Debug)]
pub(crate) enum Content {
    Term(Value),
    Inner(Children),
}

#[derive(Debug)]
pub(crate) struct Element {
    pub(crate) schema: SchemaId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) linked: bool,
    pub(crate) content: Content,
    pub(crate) meta: Vec<Meta>,
    /// Sorted-index anchor; only ever set on the leader of a group.
    pub(crate) anchor: Option<Anchor>,
}

fn is_reserved(name: &str) -> bool {
    let local = name
        .strip_prefix(YANG_MODULE)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(name);
    local == ANCHOR_NAME
}

fn slot_for(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(slot) => slot,
        Err(_) => panic!("data tree cannot hold more than {} elements", u32::MAX),
    }
}

#[derive(Debug)]
pub struct DataTree<'ctx> {
    ctx: &'ctx Context,
    nodes: Vec<Option<Element>>,
    free: Vec<u32>,
    top: Children,
}

impl<'ctx> DataTree<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        Self {
            ctx,
            nodes: Vec::new(),
            free: Vec::new(),
            top: Children::default(),
        }
    }

    pub fn context(&self) -> &'ctx Context {
        self.ctx
    }

    pub(crate) fn node(&self, id: NodeId) -> &Element {
        match self.nodes.get(id.0 as usize) {
            Some(Some(elem)) => elem,
            _ => panic!("{id:?} does not refer to a live element"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Element {
        match self.nodes.get_mut(id.0 as usize) {
            Some(Some(elem)) => elem,
            _ => panic!("{id:?} does not refer to a live element"),
        }
    }

    fn alloc(&mut self, schema: SchemaId, content: Content) -> NodeId {
        let elem = Element {
            schema,
            parent: None,
            next: None,
            prev: None,
            linked: false,
            content,
            meta: Vec::new(),
            anchor: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot as usize] = Some(elem);
                NodeId(slot)
            }
            None => {
                let slot = slot_for(self.nodes.len());
                self.nodes.push(Some(elem));
                NodeId(slot)
            }
        }
    }

    /// Number of live elements, linked or not.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---------------------------------------------------------------- creation

    pub fn new_term(&mut self, schema: SchemaId, value: Value) -> Result<NodeId, TreeError> {
        let ctx = self.ctx;
        let snode = ctx.schema().get(schema);
        match snode.value_type() {
            Some(ty) if ty == value.value_type() => {}
            Some(ty) => {
                return Err(TreeError::InvalidValue(format!(
                    "\"{}\" expects {ty:?}, got {:?}",
                    snode.name,
                    value.value_type()
                )))
            }
            None => {
                return Err(TreeError::SchemaMismatch(format!(
                    "\"{}\" is not a leaf or leaf-list",
                    snode.name
                )))
            }
        }
        Ok(self.alloc(schema, Content::Term(value)))
    }

    pub fn new_container(&mut self, schema: SchemaId) -> Result<NodeId, TreeError> {
        let ctx = self.ctx;
        let snode = ctx.schema().get(schema);
        if snode.kind != SchemaKind::Container {
            return Err(TreeError::SchemaMismatch(format!(
                "\"{}\" is not a container",
                snode.name
            )));
        }
        Ok(self.alloc(schema, Content::Inner(Children::default())))
    }

    /// Creates a list instance with its key leaves, `keys` in declared key
    /// order.
    pub fn new_list(&mut self, schema: SchemaId, keys: Vec<Value>) -> Result<NodeId, TreeError> {
        let ctx = self.ctx;
        let snode = ctx.schema().get(schema);
        let SchemaKind::List { keys: key_schemas } = &snode.kind else {
            return Err(TreeError::SchemaMismatch(format!(
                "\"{}\" is not a list",
                snode.name
            )));
        };
        if key_schemas.len() != keys.len() {
            return Err(TreeError::InvalidValue(format!(
                "\"{}\" has {} keys, got {}",
                snode.name,
                key_schemas.len(),
                keys.len()
            )));
        }
        for (&ks, value) in key_schemas.iter().zip(&keys) {
            let key = ctx.schema().get(ks);
            if key.value_type() != Some(value.value_type()) {
                return Err(TreeError::InvalidValue(format!(
                    "key \"{}\" expects {:?}, got {:?}",
                    key.name,
                    key.value_type(),
                    value.value_type()
                )));
            }
        }

        let list = self.alloc(schema, Content::Inner(Children::default()));
        for (&ks, value) in key_schemas.iter().zip(keys) {
            let key = self.alloc(ks, Content::Term(value));
            self.link_last(Some(list), key);
        }
        Ok(list)
    }

    // --------------------------------------------------------------- traversal

    pub fn schema_of(&self, n: NodeId) -> SchemaId {
        self.node(n).schema
    }

    pub fn schema_node(&self, n: NodeId) -> &'ctx SchemaNode {
        let ctx: &'ctx Context = self.ctx;
        ctx.schema().get(self.node(n).schema)
    }

    pub fn value(&self, n: NodeId) -> Option<&Value> {
        match &self.node(n).content {
            Content::Term(value) => Some(value),
            Content::Inner(_) => None,
        }
    }

    pub fn parent(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).parent
    }

    pub fn next_sibling(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).next
    }

    pub fn prev_sibling(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).prev
    }

    pub fn is_linked(&self, n: NodeId) -> bool {
        self.node(n).linked
    }

    fn children_of(&self, parent: Option<NodeId>) -> Option<&Children> {
        match parent {
            None => Some(&self.top),
            Some(p) => match &self.node(p).content {
                Content::Inner(children) => Some(children),
                Content::Term(_) => None,
            },
        }
    }

    fn children_mut(&mut self, parent: Option<NodeId>) -> &mut Children {
        match parent {
            None => &mut self.top,
            Some(p) => match &mut self.node_mut(p).content {
                Content::Inner(children) => children,
                Content::Term(_) => panic!("{p:?} is a terminal node and cannot have children"),
            },
        }
    }

    /// First child of `parent`, or the first top-level element for `None`.
    pub fn first_child(&self, parent: Option<NodeId>) -> Option<NodeId> {
        self.children_of(parent).and_then(|c| c.first)
    }

    pub fn last_child(&self, parent: Option<NodeId>) -> Option<NodeId> {
        self.children_of(parent).and_then(|c| c.last)
    }

    /// First instance of `schema` among the children of `parent`.
    pub fn first_instance(&self, parent: Option<NodeId>, schema: SchemaId) -> Option<NodeId> {
        self.children_of(parent)?.runs.get(&schema).map(|r| r.first)
    }

    /// Last instance of `schema` among the children of `parent`.
    pub fn last_instance(&self, parent: Option<NodeId>, schema: SchemaId) -> Option<NodeId> {
        self.children_of(parent)?.runs.get(&schema).map(|r| r.last)
    }

    pub fn children(&self, parent: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        let mut curr = self.first_child(parent);
        std::iter::from_fn(move || {
            let id = curr?;
            curr = self.node(id).next;
            Some(id)
        })
    }

    /// Key values of a list instance in declared key order.
    pub fn key_values(&self, n: NodeId) -> impl Iterator<Item = &Value> + '_ {
        self.schema_node(n)
            .keys()
            .iter()
            .filter_map(move |&ks| self.first_instance(Some(n), ks))
            .filter_map(move |c| self.value(c))
    }

    // ------------------------------------------------------------ chain links

    /// Records linked `n` in the run bookkeeping of its parent.
    fn note_linked(&mut self, n: NodeId) {
        let (schema, parent, prev, next) = {
            let e = self.node(n);
            (e.schema, e.parent, e.prev, e.next)
        };
        let starts = prev.map_or(true, |p| self.node(p).schema != schema);
        let ends = next.map_or(true, |x| self.node(x).schema != schema);
        let children = self.children_mut(parent);
        if prev.is_none() {
            children.first = Some(n);
        }
        if next.is_none() {
            children.last = Some(n);
        }
        let run = children.runs.entry(schema).or_insert(Run { first: n, last: n });
        if starts {
            run.first = n;
        }
        if ends {
            run.last = n;
        }
    }

    /// Links unattached `n` right after `pivot`.
    pub(crate) fn link_after(&mut self, pivot: NodeId, n: NodeId) {
        let (parent, next) = {
            let p = self.node(pivot);
            (p.parent, p.next)
        };
        if let Some(next) = next {
            self.node_mut(next).prev = Some(n);
        }
        self.node_mut(pivot).next = Some(n);
        let elem = self.node_mut(n);
        elem.parent = parent;
        elem.prev = Some(pivot);
        elem.next = next;
        elem.linked = true;
        self.note_linked(n);
    }

    /// Links unattached `n` right before `pivot`.
    pub(crate) fn link_before(&mut self, pivot: NodeId, n: NodeId) {
        let (parent, prev) = {
            let p = self.node(pivot);
            (p.parent, p.prev)
        };
        if let Some(prev) = prev {
            self.node_mut(prev).next = Some(n);
        }
        self.node_mut(pivot).prev = Some(n);
        let elem = self.node_mut(n);
        elem.parent = parent;
        elem.prev = prev;
        elem.next = Some(pivot);
        elem.linked = true;
        self.note_linked(n);
    }

    fn link_last(&mut self, parent: Option<NodeId>, n: NodeId) {
        match self.last_child(parent) {
            Some(last) => self.link_after(last, n),
            None => {
                let elem = self.node_mut(n);
                elem.parent = parent;
                elem.linked = true;
                self.note_linked(n);
            }
        }
    }

    fn unlink_raw(&mut self, n: NodeId) {
        let (schema, parent, prev, next) = {
            let e = self.node(n);
            (e.schema, e.parent, e.prev, e.next)
        };
        if let Some(prev) = prev {
            self.node_mut(prev).next = next;
        }
        if let Some(next) = next {
            self.node_mut(next).prev = prev;
        }
        let children = self.children_mut(parent);
        if prev.is_none() {
            children.first = next;
        }
        if next.is_none() {
            children.last = prev;
        }
        if let Some(run) = children.runs.get(&schema).copied() {
            // Runs are contiguous, so a shrinking end moves to the neighbor.
            match (run.first == n, run.last == n) {
                (true, true) => {
                    children.runs.remove(&schema);
                }
                (starts, ends) => {
                    let run = Run {
                        first: if starts { next.unwrap_or(n) } else { run.first },
                        last: if ends { prev.unwrap_or(n) } else { run.last },
                    };
                    children.runs.insert(schema, run);
                }
            }
        }
        let elem = self.node_mut(n);
        elem.parent = None;
        elem.prev = None;
        elem.next = None;
        elem.linked = false;
    }

    // ------------------------------------------------------------- validation

    fn check_unlinked(&self, n: NodeId) -> Result<(), TreeError> {
        if self.node(n).linked {
            return Err(TreeError::AlreadyLinked);
        }
        Ok(())
    }

    fn check_parent(&self, parent: Option<NodeId>, n: NodeId) -> Result<(), TreeError> {
        let expected = parent.map(|p| self.node(p).schema);
        let snode = self.schema_node(n);
        if snode.parent != expected {
            return Err(TreeError::SchemaMismatch(format!(
                "\"{}\" cannot be placed under {}",
                snode.name,
                match expected {
                    Some(s) => format!("\"{}\"", self.ctx.schema().get(s).name),
                    None => "the top level".to_string(),
                }
            )));
        }
        Ok(())
    }

    /// Explicit placement of `n` between `prev` and `next` must keep every
    /// schema group contiguous.
    fn check_placement(
        &self,
        prev: Option<NodeId>,
        next: Option<NodeId>,
        n: NodeId,
    ) -> Result<(), TreeError> {
        let snode = self.schema_node(n);
        if sorted::SortKind::of(snode).is_some() {
            return Err(TreeError::SchemaMismatch(format!(
                "\"{}\" is ordered by the system and cannot be placed explicitly",
                snode.name
            )));
        }
        if snode.is_key {
            return Err(TreeError::SchemaMismatch(format!(
                "key \"{}\" is created with its list instance",
                snode.name
            )));
        }
        if let Some(key) = next.filter(|&x| self.schema_node(x).is_key) {
            return Err(TreeError::SchemaMismatch(format!(
                "\"{}\" cannot be placed before key \"{}\"",
                snode.name,
                self.schema_node(key).name
            )));
        }
        let schema = self.node(n).schema;
        let prev_schema = prev.map(|p| self.node(p).schema);
        let next_schema = next.map(|x| self.node(x).schema);
        if prev_schema.is_some() && prev_schema == next_schema && prev_schema != Some(schema) {
            return Err(TreeError::SchemaMismatch(format!(
                "\"{}\" would split a run of other instances",
                snode.name
            )));
        }
        let parent = prev.or(next).and_then(|s| self.node(s).parent);
        if sorted::group_leader(self, parent, schema).is_some()
            && prev_schema != Some(schema)
            && next_schema != Some(schema)
        {
            return Err(TreeError::SchemaMismatch(format!(
                "\"{}\" must be placed next to its other instances",
                snode.name
            )));
        }
        Ok(())
    }

    // -------------------------------------------------------------- insertion

    /// Links `n` right before `pivot`. Only for instances ordered by the user.
    pub fn insert_before(&mut self, pivot: NodeId, n: NodeId) -> Result<(), TreeError> {
        self.check_unlinked(n)?;
        if !self.node(pivot).linked {
            return Err(TreeError::NotAttached);
        }
        self.check_parent(self.node(pivot).parent, n)?;
        self.check_placement(self.node(pivot).prev, Some(pivot), n)?;
        self.link_before(pivot, n);
        Ok(())
    }

    /// Links `n` right after `pivot`. Only for instances ordered by the user.
    pub fn insert_after(&mut self, pivot: NodeId, n: NodeId) -> Result<(), TreeError> {
        self.check_unlinked(n)?;
        if !self.node(pivot).linked {
            return Err(TreeError::NotAttached);
        }
        self.check_parent(self.node(pivot).parent, n)?;
        self.check_placement(Some(pivot), self.node(pivot).next, n)?;
        self.link_after(pivot, n);
        Ok(())
    }

    /// Inserts `n` among the siblings of `sibling`.
    pub fn append_sibling(&mut self, sibling: NodeId, n: NodeId) -> Result<(), TreeError> {
        if !self.node(sibling).linked {
            return Err(TreeError::NotAttached);
        }
        self.insert_child(self.node(sibling).parent, n)
    }

    /// Inserts `n` as a child of `parent` (top level for `None`).
    ///
    /// System-ordered instances land at their sorted position; other
    /// instances are appended after the last instance of their schema node,
    /// or at the end of the children.
    pub fn insert_child(&mut self, parent: Option<NodeId>, n: NodeId) -> Result<(), TreeError> {
        self.check_unlinked(n)?;
        self.check_parent(parent, n)?;
        let snode = self.schema_node(n);
        if snode.is_key {
            return Err(TreeError::SchemaMismatch(format!(
                "key \"{}\" is created with its list instance",
                snode.name
            )));
        }
        let schema = self.node(n).schema;
        let leader = sorted::group_leader(self, parent, schema);

        if !sorted::is_orderable(self, n) {
            match self.last_instance(parent, schema) {
                Some(last) => self.link_after(last, n),
                None => self.link_last(parent, n),
            }
            return Ok(());
        }

        match leader {
            None => {
                self.link_last(parent, n);
                if let Err(err) = sorted::create_anchor(self, n) {
                    warn!(%err, "sorted index unavailable, falling back to linear ordering");
                }
            }
            Some(mut leader) => match sorted::insert(self, &mut leader, n) {
                Ok(()) => {}
                Err(err @ TreeError::ConfigurationMissing { .. }) => {
                    warn!(%err, "sorted index unavailable, falling back to linear ordering");
                    self.insert_linear(leader, n);
                }
                Err(err) => return Err(err),
            },
        }
        Ok(())
    }

    fn insert_linear(&mut self, leader: NodeId, n: NodeId) {
        let schema = self.node(leader).schema;
        let mut last = leader;
        let mut curr = Some(leader);
        while let Some(m) = curr {
            if self.node(m).schema != schema {
                break;
            }
            if sorted::compare(self, m, n) > 0 {
                self.link_before(m, n);
                return;
            }
            last = m;
            curr = self.node(m).next;
        }
        self.link_after(last, n);
    }

    // ---------------------------------------------------------------- removal

    /// Unlinks `n` from its siblings; `n` and its subtree stay allocated.
    pub fn unlink(&mut self, n: NodeId) -> Result<(), TreeError> {
        let elem = self.node(n);
        if !elem.linked {
            return Err(TreeError::NotAttached);
        }
        let snode = self.schema_node(n);
        if snode.is_key && elem.parent.is_some() {
            return Err(TreeError::SchemaMismatch(format!(
                "key \"{}\" cannot be removed from its list instance",
                snode.name
            )));
        }

        if sorted::is_orderable(self, n) {
            let parent = self.node(n).parent;
            if let Some(mut leader) = sorted::group_leader(self, parent, self.node(n).schema) {
                sorted::unlink(self, &mut leader, n);
            }
        }
        // A sole member keeps its anchor through the sorted unlink.
        sorted::free_anchor(self, n);
        self.unlink_raw(n);
        Ok(())
    }

    /// Unlinks `n` if needed and releases it with its whole subtree.
    pub fn free(&mut self, n: NodeId) -> Result<(), TreeError> {
        if self.node(n).linked {
            self.unlink(n)?;
        }
        self.release(n);
        Ok(())
    }

    fn release(&mut self, n: NodeId) {
        let Some(elem) = self.nodes[n.0 as usize].take() else {
            panic!("{n:?} does not refer to a live element");
        };
        self.free.push(n.0);
        if let Some(anchor) = elem.anchor {
            sorted::drop_anchor(anchor);
        }
        if let Content::Inner(children) = elem.content {
            let mut curr = children.first;
            while let Some(child) = curr {
                curr = self.node(child).next;
                self.release(child);
            }
        }
    }

    // --------------------------------------------------------------- metadata

    pub fn add_meta(&mut self, n: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        if is_reserved(name) {
            return Err(TreeError::ReservedName(name.to_string()));
        }
        self.node_mut(n).meta.push(Meta {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// User metadata of `n`; the sorted-index anchor is never listed.
    pub fn meta(&self, n: NodeId) -> &[Meta] {
        &self.node(n).meta
    }

    pub fn remove_meta(&mut self, n: NodeId, name: &str) -> Option<Meta> {
        let meta = &mut self.node_mut(n).meta;
        let pos = meta.iter().position(|m| m.name == name)?;
        Some(meta.remove(pos))
    }
}
