//! Red-black tree algorithms over an index arena.
//!
//! Every mutating function takes the current root and returns the new one.
//! Insertion and removal use the classic bottom-up color fixups: parent
//! links make the upward walk possible without any auxiliary stack.

use crate::types::{RbColor, RbNodeLike};
use crate::util::{first, get_l, get_p, get_r, next, prev, set_l, set_p, set_r, size};

#[inline]
fn is_black<N: RbColor>(arena: &[N], i: u32) -> bool {
    arena[i as usize].is_black()
}

/// Absent children count as black leaves.
#[inline]
fn is_red<N: RbColor>(arena: &[N], i: Option<u32>) -> bool {
    i.is_some_and(|i| !arena[i as usize].is_black())
}

#[inline]
fn set_black<N: RbColor>(arena: &mut [N], i: u32, v: bool) {
    arena[i as usize].set_black(v);
}

/// Points `parent`'s link to `old` at `new` instead, or makes `new` the root.
fn replace_child<N: RbColor>(
    arena: &mut [N],
    root: &mut Option<u32>,
    parent: Option<u32>,
    old: u32,
    new: Option<u32>,
) {
    match parent {
        Some(p) if get_l(arena, p) == Some(old) => set_l(arena, p, new),
        Some(p) => set_r(arena, p, new),
        None => *root = new,
    }
}

fn l_rotate<N: RbColor>(arena: &mut [N], root: &mut Option<u32>, n: u32) {
    let tmp = get_r(arena, n).expect("left rotation needs a right child");
    let tmp_l = get_l(arena, tmp);
    set_r(arena, n, tmp_l);
    if let Some(tl) = tmp_l {
        set_p(arena, tl, Some(n));
    }

    let parent = get_p(arena, n);
    set_p(arena, tmp, parent);
    replace_child(arena, root, parent, n, Some(tmp));

    set_l(arena, tmp, Some(n));
    set_p(arena, n, Some(tmp));
}

fn r_rotate<N: RbColor>(arena: &mut [N], root: &mut Option<u32>, n: u32) {
    let tmp = get_l(arena, n).expect("right rotation needs a left child");
    let tmp_r = get_r(arena, tmp);
    set_l(arena, n, tmp_r);
    if let Some(tr) = tmp_r {
        set_p(arena, tr, Some(n));
    }

    let parent = get_p(arena, n);
    set_p(arena, tmp, parent);
    replace_child(arena, root, parent, n, Some(tmp));

    set_r(arena, tmp, Some(n));
    set_p(arena, n, Some(tmp));
}

fn insert_color<N: RbColor>(arena: &mut [N], root: &mut Option<u32>, mut n: u32) {
    loop {
        let Some(mut parent) = get_p(arena, n) else {
            break;
        };
        if is_black(arena, parent) {
            break;
        }
        // A red node is never the root, so the grandparent exists.
        let gparent = get_p(arena, parent).expect("red parent has a parent");

        if get_l(arena, gparent) == Some(parent) {
            match get_r(arena, gparent) {
                Some(u) if !is_black(arena, u) => {
                    set_black(arena, u, true);
                    set_black(arena, parent, true);
                    set_black(arena, gparent, false);
                    n = gparent;
                    continue;
                }
                _ => {}
            }
            if get_r(arena, parent) == Some(n) {
                l_rotate(arena, root, parent);
                std::mem::swap(&mut parent, &mut n);
            }
            set_black(arena, parent, true);
            set_black(arena, gparent, false);
            r_rotate(arena, root, gparent);
        } else {
            match get_l(arena, gparent) {
                Some(u) if !is_black(arena, u) => {
                    set_black(arena, u, true);
                    set_black(arena, parent, true);
                    set_black(arena, gparent, false);
                    n = gparent;
                    continue;
                }
                _ => {}
            }
            if get_l(arena, parent) == Some(n) {
                r_rotate(arena, root, parent);
                std::mem::swap(&mut parent, &mut n);
            }
            set_black(arena, parent, true);
            set_black(arena, gparent, false);
            l_rotate(arena, root, gparent);
        }
    }

    if let Some(r) = *root {
        set_black(arena, r, true);
    }
}

/// Inserts detached node `n` and rebalances.
///
/// Descends with `comparator(curr, n)`: positive goes left, everything else
/// goes right, so a node equal to existing ones lands after all of them.
/// Returns the new root.
pub fn insert<E, N, C>(arena: &mut [N], root: Option<u32>, n: u32, comparator: &C) -> Option<u32>
where
    N: RbNodeLike<E>,
    C: Fn(&E, &E) -> i32,
{
    let mut root = root;
    let mut parent = None;
    let mut cmp = 0;
    let mut curr = root;
    while let Some(c) = curr {
        parent = Some(c);
        cmp = comparator(arena[c as usize].elem(), arena[n as usize].elem());
        curr = if cmp > 0 {
            get_l(arena, c)
        } else {
            get_r(arena, c)
        };
    }

    set_p(arena, n, parent);
    set_l(arena, n, None);
    set_r(arena, n, None);
    set_black(arena, n, false);

    match parent {
        Some(p) if cmp > 0 => set_l(arena, p, Some(n)),
        Some(p) => set_r(arena, p, Some(n)),
        None => root = Some(n),
    }

    insert_color(arena, &mut root, n);
    root
}

fn remove_color<N: RbColor>(
    arena: &mut [N],
    root: &mut Option<u32>,
    mut parent: Option<u32>,
    mut n: Option<u32>,
) {
    while !is_red(arena, n) && n != *root {
        let Some(p) = parent else {
            break;
        };
        // The deficient side has black height >= 1 on the other side, so the
        // sibling always exists.
        if get_l(arena, p) == n {
            let mut s = get_r(arena, p).expect("sibling of a black deficit");
            if !is_black(arena, s) {
                set_black(arena, s, true);
                set_black(arena, p, false);
                l_rotate(arena, root, p);
                s = get_r(arena, p).expect("sibling of a black deficit");
            }
            if !is_red(arena, get_l(arena, s)) && !is_red(arena, get_r(arena, s)) {
                set_black(arena, s, false);
                n = Some(p);
                parent = get_p(arena, p);
            } else {
                if !is_red(arena, get_r(arena, s)) {
                    if let Some(sl) = get_l(arena, s) {
                        set_black(arena, sl, true);
                    }
                    set_black(arena, s, false);
                    r_rotate(arena, root, s);
                    s = get_r(arena, p).expect("sibling of a black deficit");
                }
                let p_black = is_black(arena, p);
                set_black(arena, s, p_black);
                set_black(arena, p, true);
                if let Some(sr) = get_r(arena, s) {
                    set_black(arena, sr, true);
                }
                l_rotate(arena, root, p);
                n = *root;
                break;
            }
        } else {
            let mut s = get_l(arena, p).expect("sibling of a black deficit");
            if !is_black(arena, s) {
                set_black(arena, s, true);
                set_black(arena, p, false);
                r_rotate(arena, root, p);
                s = get_l(arena, p).expect("sibling of a black deficit");
            }
            if !is_red(arena, get_l(arena, s)) && !is_red(arena, get_r(arena, s)) {
                set_black(arena, s, false);
                n = Some(p);
                parent = get_p(arena, p);
            } else {
                if !is_red(arena, get_l(arena, s)) {
                    if let Some(sr) = get_r(arena, s) {
                        set_black(arena, sr, true);
                    }
                    set_black(arena, s, false);
                    l_rotate(arena, root, s);
                    s = get_l(arena, p).expect("sibling of a black deficit");
                }
                let p_black = is_black(arena, p);
                set_black(arena, s, p_black);
                set_black(arena, p, true);
                if let Some(sl) = get_l(arena, s) {
                    set_black(arena, sl, true);
                }
                r_rotate(arena, root, p);
                n = *root;
                break;
            }
        }
    }

    if let Some(n) = n {
        set_black(arena, n, true);
    }
}

/// Removes node `n` and rebalances. Returns the new root.
///
/// A node with two children is replaced by its in-order successor: the
/// successor takes over the links and color of `n`, and the fixup starts
/// where the successor used to be. `n` comes back fully detached so its slot
/// can be reused.
pub fn remove<N: RbColor>(arena: &mut [N], root: Option<u32>, n: u32) -> Option<u32> {
    let mut root = root;
    let l = get_l(arena, n);
    let r = get_r(arena, n);

    let (child, parent, removed_black) = match (l, r) {
        (Some(l), Some(r)) => {
            let mut succ = r;
            while let Some(sl) = get_l(arena, succ) {
                succ = sl;
            }

            let child = get_r(arena, succ);
            let mut parent = get_p(arena, succ);
            let removed_black = is_black(arena, succ);
            if let Some(c) = child {
                set_p(arena, c, parent);
            }
            replace_child(arena, &mut root, parent, succ, child);
            if parent == Some(n) {
                parent = Some(succ);
            }

            let n_p = get_p(arena, n);
            let n_r = get_r(arena, n);
            let n_black = is_black(arena, n);
            set_p(arena, succ, n_p);
            set_l(arena, succ, Some(l));
            set_r(arena, succ, n_r);
            set_black(arena, succ, n_black);
            replace_child(arena, &mut root, n_p, n, Some(succ));

            set_p(arena, l, Some(succ));
            if let Some(nr) = n_r {
                set_p(arena, nr, Some(succ));
            }

            (child, parent, removed_black)
        }
        _ => {
            let child = l.or(r);
            let parent = get_p(arena, n);
            if let Some(c) = child {
                set_p(arena, c, parent);
            }
            replace_child(arena, &mut root, parent, n, child);
            (child, parent, is_black(arena, n))
        }
    };

    if removed_black {
        remove_color(arena, &mut root, parent, child);
    }

    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);
    root
}

/// Finds the node wrapping exactly `target`.
///
/// Several nodes may compare equal to `target`; once the descent reaches one
/// of them, the run of equal nodes is scanned backwards and then forwards
/// until the identical handle shows up or the comparison turns non-zero.
pub fn find_by_identity<E, N, C>(
    arena: &[N],
    root: Option<u32>,
    target: &E,
    comparator: &C,
) -> Option<u32>
where
    E: PartialEq,
    N: RbNodeLike<E>,
    C: Fn(&E, &E) -> i32,
{
    let mut curr = root?;
    if arena[curr as usize].elem() == target {
        return Some(curr);
    }

    loop {
        let cmp = comparator(arena[curr as usize].elem(), target);
        if cmp > 0 {
            curr = get_l(arena, curr)?;
        } else if cmp < 0 {
            curr = get_r(arena, curr)?;
        } else if arena[curr as usize].elem() == target {
            return Some(curr);
        } else {
            let pivot = curr;

            let mut iter = prev(arena, pivot);
            while let Some(i) = iter {
                if comparator(arena[i as usize].elem(), target) != 0 {
                    break;
                }
                if arena[i as usize].elem() == target {
                    return Some(i);
                }
                iter = prev(arena, i);
            }

            let mut iter = next(arena, pivot);
            while let Some(i) = iter {
                if comparator(arena[i as usize].elem(), target) != 0 {
                    break;
                }
                if arena[i as usize].elem() == target {
                    return Some(i);
                }
                iter = next(arena, i);
            }

            return None;
        }
    }
}

/// Consumes every node under `root` without rebalancing.
///
/// Nodes are handed to `visit` leaves first; each one is cut from its parent
/// before the visit, so the walk needs no stack and `visit` may recycle the
/// slot immediately. Visiting order is not the in-order sequence.
pub fn drain<N: RbColor, F: FnMut(u32, &N)>(arena: &mut [N], root: Option<u32>, mut visit: F) {
    let mut state = root;
    while let Some(mut iter) = state {
        loop {
            if let Some(l) = get_l(arena, iter) {
                iter = l;
            } else if let Some(r) = get_r(arena, iter) {
                iter = r;
            } else {
                break;
            }
        }

        let parent = get_p(arena, iter);
        if let Some(p) = parent {
            if get_l(arena, p) == Some(iter) {
                set_l(arena, p, None);
            } else {
                set_r(arena, p, None);
            }
        }
        set_p(arena, iter, None);
        state = parent;
        visit(iter, &arena[iter as usize]);
    }
}

/// Checks every red-black invariant and in-order monotonicity.
///
/// Returns the black height of the tree.
pub fn assert_red_black_tree<E, N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<usize, String>
where
    N: RbNodeLike<E>,
    C: Fn(&E, &E) -> i32,
{
    let Some(root) = root else {
        return Ok(0);
    };

    if arena[root as usize].p().is_some() {
        return Err("Root has parent".to_string());
    }
    if !arena[root as usize].is_black() {
        return Err("Root is not black".to_string());
    }

    fn black_height<N: RbColor>(arena: &[N], node: Option<u32>) -> Result<usize, String> {
        let Some(node) = node else {
            return Ok(0);
        };

        let l = arena[node as usize].l();
        let r = arena[node as usize].r();

        if let Some(li) = l {
            if arena[li as usize].p() != Some(node) {
                return Err(format!("Broken parent link on left child of {node}"));
            }
        }
        if let Some(ri) = r {
            if arena[ri as usize].p() != Some(node) {
                return Err(format!("Broken parent link on right child of {node}"));
            }
        }

        if !arena[node as usize].is_black() && (is_red(arena, l) || is_red(arena, r)) {
            return Err(format!("Red node {node} has a red child"));
        }

        let lh = black_height(arena, l)?;
        let rh = black_height(arena, r)?;
        if lh != rh {
            return Err(format!("Black height mismatch under {node}: {lh} != {rh}"));
        }

        Ok(lh + usize::from(arena[node as usize].is_black()))
    }

    let bh = black_height(arena, Some(root))?;

    let count = size(arena, Some(root));
    let limit = 2.0 * ((count + 1) as f64).log2();
    let height = crate::util::height(arena, Some(root));
    if height as f64 > limit {
        return Err(format!("Height {height} exceeds 2*log2({count}+1)"));
    }

    let mut curr = first(arena, Some(root));
    let mut prev_node: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev_node {
            if comparator(arena[prev as usize].elem(), arena[i as usize].elem()) > 0 {
                return Err(format!("Node order violated between {prev} and {i}"));
            }
        }
        prev_node = Some(i);
        curr = next(arena, i);
    }

    Ok(bh)
}
