use crate::types::{Node, RbColor, RbNodeLike};

/// Red-black index node.
///
/// Wraps exactly one element handle `e`; the element itself is owned by
/// whoever hands out the handles.
#[derive(Clone, Debug)]
pub struct RbNode<E> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub e: E,
    /// Node color: `true` = black, `false` = red.
    pub b: bool,
}

impl<E> RbNode<E> {
    pub fn new(e: E) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            e,
            b: false,
        }
    }

    /// Detached red leaf wrapping `e`, as freshly inserted nodes start out.
    pub(crate) fn reset(&mut self, e: E) {
        self.p = None;
        self.l = None;
        self.r = None;
        self.e = e;
        self.b = false;
    }
}

impl<E> Node for RbNode<E> {
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

impl<E> RbNodeLike<E> for RbNode<E> {
    fn elem(&self) -> &E {
        &self.e
    }
}

impl<E> RbColor for RbNode<E> {
    fn is_black(&self) -> bool {
        self.b
    }

    fn set_black(&mut self, black: bool) {
        self.b = black;
    }
}
