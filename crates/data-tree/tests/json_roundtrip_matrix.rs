use serde_json::json;
use yang_data_tree::json::{from_json, to_json};
use yang_data_tree::sorted::{self, AnchorState};
use yang_data_tree::{Context, DataTree, OrderedBy, TreeError, ValueType};

fn ctx() -> Context {
    let mut ctx = Context::new();
    let schema = ctx.schema_mut();
    let top = schema.add_container(None, "top");
    schema.add_leaf(Some(top), "name", ValueType::String);
    schema.add_leaf_list(Some(top), "ports", ValueType::Uint, OrderedBy::System);
    schema.add_leaf_list(Some(top), "path", ValueType::String, OrderedBy::User);
    let iface = schema.add_list(
        Some(top),
        "iface",
        &[("name", ValueType::String), ("unit", ValueType::Int)],
        OrderedBy::System,
    );
    schema.add_leaf(
        Some(iface),
        "mtu",
        ValueType::Decimal64 { fraction_digits: 1 },
    );
    schema.add_leaf(Some(iface), "enabled", ValueType::Empty);
    ctx
}

#[test]
fn json_parse_sorts_and_print_omits_anchor_matrix() {
    let ctx = ctx();
    let mut tree = DataTree::new(&ctx);
    let input = json!({
        "top": {
            "name": "r1",
            "ports": [443, 22, 8080, 22],
            "path": ["z", "a"],
            "iface": [
                {"name": "eth1", "unit": 0, "mtu": "1500.0"},
                {"name": "eth0", "unit": 2, "enabled": [null]},
                {"name": "eth0", "unit": 1}
            ]
        }
    });
    let created = from_json(&mut tree, None, &input).unwrap();
    assert_eq!(created.len(), 1);

    let printed = to_json(&tree, None);
    assert_eq!(
        printed,
        json!({
            "top": {
                "name": "r1",
                "ports": [22, 22, 443, 8080],
                "path": ["z", "a"],
                "iface": [
                    {"name": "eth0", "unit": 1},
                    {"name": "eth0", "unit": 2, "enabled": [null]},
                    {"name": "eth1", "unit": 0, "mtu": "1500.0"}
                ]
            }
        })
    );
    assert!(!printed.to_string().contains(yang_data_tree::ANCHOR_NAME));

    // Parsing the printed form again rebuilds the same tree and indexes.
    let mut again = DataTree::new(&ctx);
    from_json(&mut again, None, &printed).unwrap();
    assert_eq!(to_json(&again, None), printed);

    let top = again.first_child(None).unwrap();
    let top_schema = again.schema_of(top);
    let ports = ctx.schema().child(Some(top_schema), "ports").unwrap();
    let leader = sorted::group_leader(&again, Some(top), ports).unwrap();
    assert_eq!(
        sorted::anchor_state(&again, leader),
        AnchorState::Materialized { len: 4 }
    );
    sorted::index(&again, leader)
        .unwrap()
        .check(&again, leader)
        .unwrap();
}

#[test]
fn json_parse_rejects_bad_input_matrix() {
    let ctx = ctx();
    let mut tree = DataTree::new(&ctx);
    let cases = [
        json!({"nope": 1}),
        json!({"top": {"ports": 5}}),
        json!({"top": {"ports": ["x"]}}),
        json!({"top": {"iface": [{"name": "eth0"}]}}),
        json!({"top": {"iface": [{"name": "eth0", "unit": 1, "mtu": 1500}]}}),
        json!([1, 2]),
    ];
    for case in cases {
        let result = from_json(&mut tree, None, &case);
        assert!(
            matches!(
                result,
                Err(TreeError::InvalidValue(_)) | Err(TreeError::SchemaMismatch(_))
            ),
            "{case} -> {result:?}"
        );
    }
}
