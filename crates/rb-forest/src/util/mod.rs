//! In-order traversal helpers shared by the red-black engine.
//!
//! All of them walk parent links, so none needs a stack or any storage
//! outside the arena.

use crate::types::Node;

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Leftmost node in the tree.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node in the tree.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        let mut curr = r;
        while let Some(l) = get_l(arena, curr) {
            curr = l;
        }
        return Some(curr);
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, node) {
        let mut curr = l;
        while let Some(r) = get_r(arena, curr) {
            curr = r;
        }
        return Some(curr);
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: u32) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

/// Length of the longest root-to-leaf path.
pub fn height<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    match root {
        None => 0,
        Some(i) => 1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct N {
        p: Option<u32>,
        l: Option<u32>,
        r: Option<u32>,
    }

    impl Node for N {
        fn p(&self) -> Option<u32> {
            self.p
        }
        fn l(&self) -> Option<u32> {
            self.l
        }
        fn r(&self) -> Option<u32> {
            self.r
        }
        fn set_p(&mut self, v: Option<u32>) {
            self.p = v;
        }
        fn set_l(&mut self, v: Option<u32>) {
            self.l = v;
        }
        fn set_r(&mut self, v: Option<u32>) {
            self.r = v;
        }
    }

    /// ```text
    ///        3
    ///      /   \
    ///     1     5
    ///    / \   /
    ///   0   2 4
    /// ```
    fn sample() -> Vec<N> {
        let mut arena = vec![N::default(); 6];
        let link = |arena: &mut Vec<N>, p: u32, c: u32, left: bool| {
            if left {
                arena[p as usize].l = Some(c);
            } else {
                arena[p as usize].r = Some(c);
            }
            arena[c as usize].p = Some(p);
        };
        link(&mut arena, 3, 1, true);
        link(&mut arena, 3, 5, false);
        link(&mut arena, 1, 0, true);
        link(&mut arena, 1, 2, false);
        link(&mut arena, 5, 4, true);
        arena
    }

    #[test]
    fn walks_forward_and_backward() {
        let arena = sample();
        let mut fwd = vec![];
        let mut curr = first(&arena, Some(3));
        while let Some(i) = curr {
            fwd.push(i);
            curr = next(&arena, i);
        }
        assert_eq!(fwd, vec![0, 1, 2, 3, 4, 5]);

        let mut bwd = vec![];
        let mut curr = last(&arena, Some(3));
        while let Some(i) = curr {
            bwd.push(i);
            curr = prev(&arena, i);
        }
        assert_eq!(bwd, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn size_and_height() {
        let arena = sample();
        assert_eq!(size(&arena, Some(3)), 6);
        assert_eq!(size(&arena, None), 0);
        assert_eq!(height(&arena, Some(3)), 3);
    }
}
