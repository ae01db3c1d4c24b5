//! Forest-to-tree wrapping shared by the tree-shaped layouts.
//!
//! A forest with more than one root gets a temporary super-root adopting every root; the caller
//! runs its passes on the wrapped tree and then removes the super-root again, discarding its
//! position. Slot-indexed scratch built before the removal stays valid because the removal is
//! the last mutation.

use crate::{Error, Result};
use canopy_graph::{Graph, NodeId};

pub(crate) struct SuperRoot(pub NodeId);

/// Verifies the forest precondition and returns the layout root, wrapping multi-root forests.
pub(crate) fn single_root<N: Default, E: Default>(
    g: &mut Graph<N, E>,
) -> Result<(NodeId, Option<SuperRoot>)> {
    if !g.is_forest() {
        return Err(Error::PreconditionViolated(
            "tree layouts require a forest (acyclic, at most one parent per node)",
        ));
    }
    let roots = g.roots();
    match roots.len() {
        0 => Err(Error::PreconditionViolated("graph has no root")),
        1 => Ok((roots[0], None)),
        _ => {
            let super_root = g.create_node();
            for root in roots {
                g.create_edge(super_root, root);
            }
            Ok((super_root, Some(SuperRoot(super_root))))
        }
    }
}

pub(crate) fn remove_super_root<N: Default, E: Default>(
    g: &mut Graph<N, E>,
    guard: Option<SuperRoot>,
) -> Result<()> {
    if let Some(SuperRoot(node)) = guard {
        g.delete_node(node)?;
    }
    Ok(())
}

/// Children of `v` as a fresh list; the tree passes mutate positions while walking, so they
/// cannot hold the lazy iterator across recursion.
pub(crate) fn child_list<N: Default, E: Default>(
    g: &Graph<N, E>,
    v: NodeId,
) -> Result<Vec<NodeId>> {
    Ok(g.children(v)?.collect())
}
