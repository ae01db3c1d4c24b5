//! Tidy tree layout (Reingold–Tilford with Walker's per-node modifiers).
//!
//! Three passes over the rooted tree: `initialize` finds each node's depth and "left brother"
//! (the previously visited node at the same depth, tracked with one rightmost-contour pointer
//! per depth); `first_walk` (post-order) computes a preliminary x and a subtree-shifting
//! modifier; `second_walk` (pre-order) accumulates modifiers down the tree into final
//! coordinates with y = −depth × spacing.

use crate::tree::{self, child_list};
use crate::{NodeSizes, Result, TreeLayout};
use canopy_graph::{Graph, NodeId, Position};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TilfordParams {
    /// Distance between consecutive tree levels.
    pub spacing: f64,
}

impl Default for TilfordParams {
    fn default() -> Self {
        Self { spacing: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct WalkState {
    depth: usize,
    left_brother: Option<usize>,
    prelim: f64,
    modifier: f64,
}

pub fn run<N: Default, E: Default>(
    g: &mut Graph<N, E>,
    params: &TilfordParams,
    sizes: &NodeSizes,
) -> Result<()> {
    if g.node_count() == 0 {
        return Ok(());
    }
    let (root, guard) = tree::single_root(g)?;

    let mut state = vec![WalkState::default(); g.node_count()];
    let mut contour: Vec<Option<usize>> = Vec::new();
    initialize(g, root, 0, &mut state, &mut contour)?;
    first_walk(g, root, sizes, &mut state)?;
    second_walk(g, root, 0.0, params.spacing, &state)?;

    tree::remove_super_root(g, guard)?;
    Ok(())
}

/// Pre-order: records depth and links each node to the node most recently seen at its depth.
fn initialize<N: Default, E: Default>(
    g: &Graph<N, E>,
    v: NodeId,
    depth: usize,
    state: &mut [WalkState],
    contour: &mut Vec<Option<usize>>,
) -> Result<()> {
    let slot = g.node_slot(v)?;
    if depth >= contour.len() {
        contour.resize(depth + 1, None);
    }
    state[slot].depth = depth;
    state[slot].left_brother = contour[depth];
    contour[depth] = Some(slot);
    for c in child_list(g, v)? {
        initialize(g, c, depth + 1, state, contour)?;
    }
    Ok(())
}

/// Post-order: leaves line up right of their left brother; an internal node wants the midpoint
/// of its first and last child and records how far it had to shift past its left brother as the
/// modifier applied to its whole subtree.
fn first_walk<N: Default, E: Default>(
    g: &Graph<N, E>,
    v: NodeId,
    sizes: &NodeSizes,
    state: &mut [WalkState],
) -> Result<()> {
    let slot = g.node_slot(v)?;
    let children = child_list(g, v)?;
    for &c in &children {
        first_walk(g, c, sizes, state)?;
    }

    let separation = 1.5 * sizes.get(slot);
    if children.is_empty() {
        state[slot].prelim = match state[slot].left_brother {
            Some(lb) => state[lb].prelim + separation,
            None => 0.0,
        };
        state[slot].modifier = 0.0;
    } else {
        let first = g.node_slot(children[0])?;
        let last = g.node_slot(children[children.len() - 1])?;
        let midpoint = (state[first].prelim + state[last].prelim) / 2.0;
        match state[slot].left_brother {
            Some(lb) => {
                state[slot].prelim = state[lb].prelim + separation;
                state[slot].modifier = state[slot].prelim - midpoint;
            }
            None => {
                state[slot].prelim = midpoint;
                state[slot].modifier = 0.0;
            }
        }
    }
    Ok(())
}

/// Pre-order: final x = prelim + the sum of modifiers on the ancestor path.
fn second_walk<N: Default, E: Default>(
    g: &mut Graph<N, E>,
    v: NodeId,
    modsum: f64,
    spacing: f64,
    state: &[WalkState],
) -> Result<()> {
    let slot = g.node_slot(v)?;
    let x = state[slot].prelim + modsum;
    let y = -(state[slot].depth as f64) * spacing;
    g.set_position(v, Position::new(x, y, 0.0))?;
    for c in child_list(g, v)? {
        second_walk(g, c, modsum + state[slot].modifier, spacing, state)?;
    }
    Ok(())
}

/// Strategy wrapper so the span layout can plug the tidy-tree pass in as its tree stage.
#[derive(Debug, Clone, Default)]
pub struct ReingoldTilford {
    pub params: TilfordParams,
}

impl TreeLayout for ReingoldTilford {
    fn layout_tree(&self, g: &mut Graph<(), ()>, sizes: &NodeSizes) -> Result<()> {
        run(g, &self.params, sizes)
    }
}
