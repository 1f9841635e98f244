//! Minimal compiled schema: containers, leaves, leaf-lists and lists.

use crate::value::ValueType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaId(pub(crate) u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderedBy {
    /// Instance order is maintained by the data tree.
    #[default]
    System,
    /// Instance order is chosen by the user.
    User,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    Container,
    Leaf { ty: ValueType },
    LeafList { ty: ValueType },
    /// Key leaves in declared order; empty for a keyless list.
    List { keys: Vec<SchemaId> },
}

#[derive(Clone, Debug)]
pub struct SchemaNode {
    pub name: String,
    pub kind: SchemaKind,
    pub parent: Option<SchemaId>,
    pub ordered_by: OrderedBy,
    pub is_key: bool,
    pub children: Vec<SchemaId>,
}

impl SchemaNode {
    pub fn is_leaf_list(&self) -> bool {
        matches!(self.kind, SchemaKind::LeafList { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, SchemaKind::List { .. })
    }

    pub fn is_keyless(&self) -> bool {
        matches!(&self.kind, SchemaKind::List { keys } if keys.is_empty())
    }

    /// Value type of a leaf or leaf-list.
    pub fn value_type(&self) -> Option<ValueType> {
        match self.kind {
            SchemaKind::Leaf { ty } | SchemaKind::LeafList { ty } => Some(ty),
            _ => None,
        }
    }

    pub fn keys(&self) -> &[SchemaId] {
        match &self.kind {
            SchemaKind::List { keys } => keys,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SchemaTree {
    nodes: Vec<SchemaNode>,
    roots: Vec<SchemaId>,
}

impl SchemaTree {
    pub fn get(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.0 as usize]
    }

    pub fn children(&self, parent: Option<SchemaId>) -> &[SchemaId] {
        match parent {
            Some(p) => &self.get(p).children,
            None => &self.roots,
        }
    }

    pub fn child(&self, parent: Option<SchemaId>, name: &str) -> Option<SchemaId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).name == name)
    }

    fn push(&mut self, parent: Option<SchemaId>, node: SchemaNode) -> SchemaId {
        if let Some(p) = parent {
            assert!(
                matches!(
                    self.get(p).kind,
                    SchemaKind::Container | SchemaKind::List { .. }
                ),
                "schema node \"{}\" cannot have children",
                self.get(p).name
            );
        }
        assert!(
            self.child(parent, &node.name).is_none(),
            "duplicate schema node \"{}\"",
            node.name
        );
        let id = SchemaId(self.nodes.len() as u32);
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0 as usize].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn node(
        name: &str,
        kind: SchemaKind,
        parent: Option<SchemaId>,
        ordered_by: OrderedBy,
    ) -> SchemaNode {
        SchemaNode {
            name: name.to_string(),
            kind,
            parent,
            ordered_by,
            is_key: false,
            children: Vec::new(),
        }
    }

    pub fn add_container(&mut self, parent: Option<SchemaId>, name: &str) -> SchemaId {
        let node = Self::node(name, SchemaKind::Container, parent, OrderedBy::System);
        self.push(parent, node)
    }

    pub fn add_leaf(&mut self, parent: Option<SchemaId>, name: &str, ty: ValueType) -> SchemaId {
        let node = Self::node(name, SchemaKind::Leaf { ty }, parent, OrderedBy::System);
        self.push(parent, node)
    }

    pub fn add_leaf_list(
        &mut self,
        parent: Option<SchemaId>,
        name: &str,
        ty: ValueType,
        ordered_by: OrderedBy,
    ) -> SchemaId {
        let node = Self::node(name, SchemaKind::LeafList { ty }, parent, ordered_by);
        self.push(parent, node)
    }

    /// Adds a list whose key leaves are created as its first children, in
    /// the given order.
    pub fn add_list(
        &mut self,
        parent: Option<SchemaId>,
        name: &str,
        keys: &[(&str, ValueType)],
        ordered_by: OrderedBy,
    ) -> SchemaId {
        let node = Self::node(name, SchemaKind::List { keys: vec![] }, parent, ordered_by);
        let list = self.push(parent, node);
        let mut key_ids = Vec::with_capacity(keys.len());
        for &(key, ty) in keys {
            let id = self.add_leaf(Some(list), key, ty);
            self.nodes[id.0 as usize].is_key = true;
            key_ids.push(id);
        }
        self.nodes[list.0 as usize].kind = SchemaKind::List { keys: key_ids };
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_keys_become_first_children() {
        let mut schema = SchemaTree::default();
        let top = schema.add_container(None, "top");
        let list = schema.add_list(
            Some(top),
            "entry",
            &[("a", ValueType::Int), ("b", ValueType::String)],
            OrderedBy::System,
        );
        let extra = schema.add_leaf(Some(list), "note", ValueType::String);

        let node = schema.get(list);
        assert_eq!(node.keys().len(), 2);
        assert_eq!(&node.children[..2], node.keys());
        assert_eq!(node.children[2], extra);
        assert!(schema.get(node.keys()[0]).is_key);
        assert!(!schema.get(extra).is_key);
        assert_eq!(schema.child(Some(top), "entry"), Some(list));
        assert_eq!(schema.child(None, "entry"), None);
    }

    #[test]
    fn keyless_list() {
        let mut schema = SchemaTree::default();
        let list = schema.add_list(None, "log", &[], OrderedBy::System);
        assert!(schema.get(list).is_keyless());
    }

    #[test]
    #[should_panic(expected = "cannot have children")]
    fn leaf_cannot_be_a_parent() {
        let mut schema = SchemaTree::default();
        let leaf = schema.add_leaf(None, "x", ValueType::Int);
        schema.add_leaf(Some(leaf), "y", ValueType::Int);
    }
}
