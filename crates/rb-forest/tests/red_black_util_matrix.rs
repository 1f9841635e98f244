use rb_forest::red_black::{assert_red_black_tree, drain, find_by_identity, insert, remove, RbNode};
use rb_forest::util::{first, next, size};

fn rb_cmp(a: &i32, b: &i32) -> i32 {
    a.cmp(b) as i32
}

fn insert_value(arena: &mut Vec<RbNode<i32>>, root: Option<u32>, value: i32) -> Option<u32> {
    arena.push(RbNode::new(value));
    let idx = (arena.len() - 1) as u32;
    let root = insert(arena, root, idx, &rb_cmp);
    if let Err(err) = assert_red_black_tree(arena, root, &rb_cmp) {
        panic!("invalid red-black tree after insert({value}): {err}");
    }
    root
}

fn delete_value(arena: &mut [RbNode<i32>], root: Option<u32>, value: i32) -> Option<u32> {
    let Some(idx) = find_by_identity(arena, root, &value, &rb_cmp) else {
        return root;
    };
    let root = remove(arena, root, idx);
    if let Err(err) = assert_red_black_tree(arena, root, &rb_cmp) {
        panic!("invalid red-black tree after delete({value}): {err}");
    }
    let removed = &arena[idx as usize];
    assert!(removed.p.is_none() && removed.l.is_none() && removed.r.is_none());
    root
}

fn in_order(arena: &[RbNode<i32>], root: Option<u32>) -> Vec<i32> {
    let mut out = vec![];
    let mut curr = first(arena, root);
    while let Some(i) = curr {
        out.push(arena[i as usize].e);
        curr = next(arena, i);
    }
    out
}

#[test]
fn rb_util_insert_delete_various_numbers_matrix() {
    let mut arena = Vec::<RbNode<i32>>::new();
    let mut root = None;

    for value in [10, 11, 12, 50, 60, 25, 100, 88, 33, 22, 55, 59, 51] {
        root = insert_value(&mut arena, root, value);
    }
    assert_eq!(size(&arena, root), 13);
    assert_eq!(
        in_order(&arena, root),
        vec![10, 11, 12, 22, 25, 33, 50, 51, 55, 59, 60, 88, 100]
    );

    root = delete_value(&mut arena, root, 100);
    assert_eq!(size(&arena, root), 12);

    root = delete_value(&mut arena, root, 33);
    root = delete_value(&mut arena, root, 33);
    assert_eq!(size(&arena, root), 11);

    root = delete_value(&mut arena, root, 10);
    assert_eq!(size(&arena, root), 10);

    root = delete_value(&mut arena, root, 60);
    assert_eq!(size(&arena, root), 9);

    root = delete_value(&mut arena, root, 22);
    assert_eq!(size(&arena, root), 8);
    assert_eq!(in_order(&arena, root), vec![11, 12, 25, 50, 51, 55, 59, 88]);
}

#[test]
fn rb_util_numbers_from_0_to_100_matrix() {
    let mut arena = Vec::<RbNode<i32>>::new();
    let mut root = None;

    for i in 0..=100 {
        root = insert_value(&mut arena, root, i);
        assert_eq!(size(&arena, root), (i + 1) as usize);
    }
    for i in 0..=100 {
        root = delete_value(&mut arena, root, i);
        assert_eq!(size(&arena, root), (100 - i) as usize);
    }
    assert_eq!(root, None);
}

#[test]
fn rb_util_numbers_from_100_to_11_matrix() {
    let mut arena = Vec::<RbNode<i32>>::new();
    let mut root = None;

    for i in (11..=100).rev() {
        root = insert_value(&mut arena, root, i);
    }
    for i in (11..=100).rev() {
        root = delete_value(&mut arena, root, i);
    }
    assert_eq!(root, None);
}

#[test]
fn rb_util_numbers_both_directions_from_50_matrix() {
    let mut arena = Vec::<RbNode<i32>>::new();
    let mut root = None;

    for i in 0..=100 {
        root = insert_value(&mut arena, root, 50 + i);
        root = insert_value(&mut arena, root, 50 - i);
        assert_eq!(size(&arena, root), (i * 2 + 2) as usize);
    }
    for i in 0..=100 {
        root = delete_value(&mut arena, root, 50 - i);
        root = delete_value(&mut arena, root, 50 + i);
    }
    assert_eq!(root, None);
}

#[test]
fn rb_util_delete_root_with_two_children_matrix() {
    let mut arena = Vec::<RbNode<i32>>::new();
    let mut root = None;
    for value in [20, 10, 30, 5, 15, 25, 35, 27] {
        root = insert_value(&mut arena, root, value);
    }
    while let Some(r) = root {
        let value = arena[r as usize].e;
        root = delete_value(&mut arena, root, value);
    }
    assert_eq!(root, None);
}

#[test]
fn rb_util_equal_keys_are_found_by_identity_matrix() {
    // Key lives in the high bits, identity in the low bits.
    let key = |v: &i32| v >> 8;
    let cmp = |a: &i32, b: &i32| key(a).cmp(&key(b)) as i32;

    let mut arena = Vec::<RbNode<i32>>::new();
    let mut root = None;
    let values: Vec<i32> = (0..40).map(|i| ((i % 3) << 8) | i).collect();
    for &v in &values {
        arena.push(RbNode::new(v));
        let idx = (arena.len() - 1) as u32;
        root = insert(&mut arena, root, idx, &cmp);
        assert_red_black_tree(&arena, root, &cmp).unwrap();
    }

    // Equal keys keep insertion order.
    let order = in_order(&arena, root);
    let mut expected = values.clone();
    expected.sort_by_key(|v| key(v));
    assert_eq!(order, expected);

    for &v in values.iter().rev() {
        let idx = find_by_identity(&arena, root, &v, &cmp).expect("member must be found");
        assert_eq!(arena[idx as usize].e, v);
        root = remove(&mut arena, root, idx);
        assert_red_black_tree(&arena, root, &cmp).unwrap();
        assert_eq!(find_by_identity(&arena, root, &v, &cmp), None);
    }
    assert_eq!(root, None);
}

#[test]
fn rb_util_drain_visits_every_node_once_matrix() {
    let mut arena = Vec::<RbNode<i32>>::new();
    let mut root = None;
    for i in 0..64 {
        root = insert_value(&mut arena, root, (i * 37) % 64);
    }
    let mut seen = vec![];
    drain(&mut arena, root, |idx, node| {
        assert!(node.l.is_none() && node.r.is_none() && node.p.is_none());
        seen.push((idx, node.e));
    });
    assert_eq!(seen.len(), 64);
    let mut values: Vec<i32> = seen.iter().map(|(_, v)| *v).collect();
    values.sort_unstable();
    assert_eq!(values, (0..64).collect::<Vec<_>>());
    assert!(arena.iter().all(|n| n.l.is_none() && n.r.is_none() && n.p.is_none()));
}
