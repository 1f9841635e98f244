use crate::schema::{OrderedBy, SchemaKind, SchemaNode};
use crate::tree::{DataTree, NodeId};

/// Ordering rule of a sorted sibling group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKind {
    /// Instances compare by their value.
    LeafList,
    /// Instances compare by their key values in declared key order.
    List,
}

impl SortKind {
    /// Rule for instances of `schema`, or `None` if they are not kept sorted.
    pub fn of(schema: &SchemaNode) -> Option<SortKind> {
        if schema.ordered_by != OrderedBy::System {
            return None;
        }
        match &schema.kind {
            SchemaKind::LeafList { .. } => Some(SortKind::LeafList),
            SchemaKind::List { keys } if !keys.is_empty() => Some(SortKind::List),
            _ => None,
        }
    }
}

pub(crate) fn compare_kind(tree: &DataTree, kind: SortKind, a: NodeId, b: NodeId) -> i32 {
    match kind {
        SortKind::LeafList => match (tree.value(a), tree.value(b)) {
            (Some(x), Some(y)) => x.compare(y),
            _ => panic!("leaf-list instance without a value"),
        },
        SortKind::List => {
            let count = tree.schema_node(a).keys().len();
            let mut ka = tree.key_values(a);
            let mut kb = tree.key_values(b);
            for _ in 0..count {
                let (Some(x), Some(y)) = (ka.next(), kb.next()) else {
                    panic!("list instance is missing key values");
                };
                let c = x.compare(y);
                if c != 0 {
                    return c;
                }
            }
            0
        }
    }
}
