use rb_forest::{ForestError, RbTree};

/// Element handle for tests: `(key, id)`. Only `key` takes part in ordering,
/// `id` makes every handle distinct.
type Elem = (i32, u32);

fn by_key(a: &Elem, b: &Elem) -> i32 {
    a.0.cmp(&b.0) as i32
}

fn keys(tree: &RbTree<Elem>) -> Vec<i32> {
    tree.iter().map(|e| e.0).collect()
}

#[test]
fn rb_tree_insert_and_iterate_matrix() {
    let mut tree = RbTree::new();
    for (id, key) in [5, 3, 9, 1, 7, 3, 5].into_iter().enumerate() {
        tree.insert((key, id as u32), &by_key).unwrap();
        tree.check(&by_key).unwrap();
    }
    assert_eq!(tree.len(), 7);
    assert_eq!(keys(&tree), vec![1, 3, 3, 5, 5, 7, 9]);

    let ids: Vec<u32> = tree.iter().map(|e| e.1).collect();
    assert_eq!(ids, vec![3, 1, 5, 0, 6, 4, 2]);
}

#[test]
fn rb_tree_prev_next_follow_sibling_order_matrix() {
    let mut tree = RbTree::new();
    let mut nodes = vec![];
    for (id, key) in [40, 10, 30, 20].into_iter().enumerate() {
        nodes.push(tree.insert((key, id as u32), &by_key).unwrap());
    }
    let n10 = nodes[1];
    let n20 = nodes[3];
    let n40 = nodes[0];
    assert_eq!(tree.prev(n10), None);
    assert_eq!(tree.next(n10), Some(n20));
    assert_eq!(tree.next(n40), None);
    assert_eq!(tree.first(), Some(n10));
    assert_eq!(tree.last(), Some(n40));
    assert_eq!(tree.elem(n20), &(20, 3));
}

#[test]
fn rb_tree_remove_by_identity_among_duplicates_matrix() {
    let mut tree = RbTree::new();
    for id in 0..20 {
        tree.insert((7, id), &by_key).unwrap();
    }
    for id in [13, 0, 19, 6, 7, 8] {
        let node = tree.find(&(7, id), &by_key).expect("duplicate must be found");
        assert_eq!(tree.elem(node), &(7, id));
        tree.remove(node);
        tree.check(&by_key).unwrap();
        assert_eq!(tree.find(&(7, id), &by_key), None);
    }
    assert_eq!(tree.len(), 14);
    let ids: Vec<u32> = tree.iter().map(|e| e.1).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 9, 10, 11, 12, 14, 15, 16, 17, 18]);
}

#[test]
fn rb_tree_find_misses_absent_element_matrix() {
    let mut tree = RbTree::new();
    assert_eq!(tree.find(&(1, 1), &by_key), None);
    tree.insert((1, 1), &by_key).unwrap();
    tree.insert((2, 2), &by_key).unwrap();
    assert_eq!(tree.find(&(1, 9), &by_key), None);
    assert_eq!(tree.find(&(3, 1), &by_key), None);
}

#[test]
fn rb_tree_recycles_released_slots_matrix() {
    let mut tree = RbTree::new();
    let a = tree.insert((1, 0), &by_key).unwrap();
    tree.insert((2, 1), &by_key).unwrap();
    tree.remove(a);
    let c = tree.insert((0, 2), &by_key).unwrap();
    assert_eq!(c, a);
    assert_eq!(tree.arena().len(), 2);
    assert_eq!(keys(&tree), vec![0, 2]);
}

#[test]
fn rb_tree_drain_all_releases_everything_matrix() {
    let mut tree = RbTree::new();
    for i in 0..100u32 {
        tree.insert(((i as i32 * 7919) % 101, i), &by_key).unwrap();
    }
    let mut ids = vec![];
    let released = tree.drain_all(|e| ids.push(e.1));
    assert_eq!(released, 100);
    ids.sort_unstable();
    assert_eq!(ids, (0..100).collect::<Vec<_>>());
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
    assert!(tree.arena().is_empty());
}

#[test]
fn rb_tree_node_limit_reports_out_of_memory_matrix() {
    let mut tree = RbTree::with_node_limit(2);
    tree.insert((1, 0), &by_key).unwrap();
    let b = tree.insert((2, 1), &by_key).unwrap();
    assert_eq!(tree.insert((3, 2), &by_key), Err(ForestError::OutOfMemory));
    assert_eq!(tree.len(), 2);
    tree.check(&by_key).unwrap();

    tree.remove(b);
    tree.insert((3, 2), &by_key).unwrap();
    assert_eq!(keys(&tree), vec![1, 3]);
}

#[test]
fn rb_tree_dump_shows_shape_matrix() {
    let mut tree = RbTree::new();
    assert_eq!(tree.dump(), "∅");
    for (id, key) in [2, 1, 3].into_iter().enumerate() {
        tree.insert((key, id as u32), &by_key).unwrap();
    }
    let dump = tree.dump();
    assert!(dump.starts_with("Node[0] black { (2, 0) }"), "{dump}");
    assert!(dump.contains("L=Node[1] red { (1, 1) }"), "{dump}");
    assert!(dump.contains("R=Node[2] red { (3, 2) }"), "{dump}");
}
