//! JSON printing and parsing of data trees.
//!
//! Leaf-lists print as arrays of values and lists as arrays of objects.
//! Sorted-index anchors are runtime state and never appear in the output;
//! parsing rebuilds them through [`DataTree::insert_child`].

use serde_json::{Map, Value as Json};

use crate::error::TreeError;
use crate::schema::{SchemaId, SchemaKind};
use crate::tree::{DataTree, NodeId};
use crate::value::Value;

/// Prints the children of `parent` (top level for `None`) as an object.
pub fn to_json(tree: &DataTree, parent: Option<NodeId>) -> Json {
    let mut out = Map::new();
    for child in tree.children(parent) {
        let snode = tree.schema_node(child);
        let item = match &snode.kind {
            SchemaKind::Leaf { .. } | SchemaKind::LeafList { .. } => tree
                .value(child)
                .map(Value::to_json)
                .unwrap_or(Json::Null),
            SchemaKind::Container | SchemaKind::List { .. } => to_json(tree, Some(child)),
        };
        match &snode.kind {
            SchemaKind::LeafList { .. } | SchemaKind::List { .. } => {
                let slot = out
                    .entry(snode.name.clone())
                    .or_insert_with(|| Json::Array(vec![]));
                if let Json::Array(items) = slot {
                    items.push(item);
                }
            }
            _ => {
                out.insert(snode.name.clone(), item);
            }
        }
    }
    Json::Object(out)
}

/// Parses `json` into new children of `parent`. Returns the created
/// top-most elements in input order.
pub fn from_json(
    tree: &mut DataTree,
    parent: Option<NodeId>,
    json: &Json,
) -> Result<Vec<NodeId>, TreeError> {
    let Json::Object(members) = json else {
        return Err(TreeError::InvalidValue(format!("expected an object, got {json}")));
    };
    let schema_parent = parent.map(|p| tree.schema_of(p));
    let mut created = vec![];
    for (name, value) in members {
        let Some(schema) = tree.context().schema().child(schema_parent, name) else {
            return Err(TreeError::SchemaMismatch(format!("unknown member \"{name}\"")));
        };
        parse_member(tree, parent, schema, value, &mut created)?;
    }
    Ok(created)
}

fn parse_member(
    tree: &mut DataTree,
    parent: Option<NodeId>,
    schema: SchemaId,
    json: &Json,
    created: &mut Vec<NodeId>,
) -> Result<(), TreeError> {
    let ctx = tree.context();
    let snode = ctx.schema().get(schema);
    match &snode.kind {
        SchemaKind::Leaf { ty } => {
            if snode.is_key && parent.is_some() {
                // Key leaves are created together with their list instance.
                return Ok(());
            }
            let n = tree.new_term(schema, Value::from_json(*ty, json)?)?;
            attach(tree, parent, n, created)
        }
        SchemaKind::LeafList { ty } => {
            for item in as_array(&snode.name, json)? {
                let n = tree.new_term(schema, Value::from_json(*ty, item)?)?;
                attach(tree, parent, n, created)?;
            }
            Ok(())
        }
        SchemaKind::Container => {
            let n = tree.new_container(schema)?;
            attach(tree, parent, n, created)?;
            from_json(tree, Some(n), json)?;
            Ok(())
        }
        SchemaKind::List { keys } => {
            for item in as_array(&snode.name, json)? {
                let Json::Object(fields) = item else {
                    return Err(TreeError::InvalidValue(format!(
                        "\"{}\" instance must be an object",
                        snode.name
                    )));
                };
                let mut key_values = Vec::with_capacity(keys.len());
                for &key in keys {
                    let key_node = ctx.schema().get(key);
                    let Some(raw) = fields.get(&key_node.name) else {
                        return Err(TreeError::InvalidValue(format!(
                            "\"{}\" instance lacks key \"{}\"",
                            snode.name, key_node.name
                        )));
                    };
                    let Some(ty) = key_node.value_type() else {
                        return Err(TreeError::SchemaMismatch(format!(
                            "key \"{}\" is not a leaf",
                            key_node.name
                        )));
                    };
                    key_values.push(Value::from_json(ty, raw)?);
                }
                let n = tree.new_list(schema, key_values)?;
                attach(tree, parent, n, created)?;
                from_json(tree, Some(n), item)?;
            }
            Ok(())
        }
    }
}

fn attach(
    tree: &mut DataTree,
    parent: Option<NodeId>,
    n: NodeId,
    created: &mut Vec<NodeId>,
) -> Result<(), TreeError> {
    if let Err(err) = tree.insert_child(parent, n) {
        tree.free(n)?;
        return Err(err);
    }
    created.push(n);
    Ok(())
}

fn as_array<'a>(name: &str, json: &'a Json) -> Result<&'a Vec<Json>, TreeError> {
    match json {
        Json::Array(items) => Ok(items),
        _ => Err(TreeError::InvalidValue(format!(
            "\"{name}\" expects an array, got {json}"
        ))),
    }
}
