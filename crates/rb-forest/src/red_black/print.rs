use std::fmt::Debug;

use crate::types::RbNodeLike;

/// Debug printer for red-black trees.
pub fn print<E, N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    E: Debug,
    N: RbNodeLike<E>,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let color = if n.is_black() { "black" } else { "red" };
            let left = print::<E, N>(arena, n.l(), &format!("{tab}  "));
            let right = print::<E, N>(arena, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] {color} {{ {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.elem()
            )
        }
    }
}
