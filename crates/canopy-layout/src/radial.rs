//! Radial tree layout (Eades).
//!
//! `set_width` (post-order) gives every leaf width 1 and every internal node the sum of its
//! children's widths; `set_placement` (pre-order) puts each node on a ring at the bisector of
//! its angular wedge and subdivides the wedge among children proportionally to width. An
//! optional convexity correction narrows a wedge to `tau = 2·acos(ro/(ro+Δ))` so child
//! subtrees stay visually convex.

use crate::tree::{self, child_list};
use crate::{NodeSizes, Result, TreeLayout};
use canopy_graph::{Graph, NodeId, Position};
use serde::Serialize;
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RadialParams {
    /// Radius increment between consecutive layers.
    pub delta: f64,
    /// Extra radius per layer index; 0 keeps rings equidistant.
    pub layer_increase: f64,
    /// Apply the convexity wedge correction.
    pub convexity: bool,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            delta: 1.0,
            layer_increase: 0.0,
            convexity: true,
        }
    }
}

pub fn run<N: Default, E: Default>(g: &mut Graph<N, E>, params: &RadialParams) -> Result<()> {
    if g.node_count() == 0 {
        return Ok(());
    }
    let (root, guard) = tree::single_root(g)?;

    let mut width = vec![0.0; g.node_count()];
    set_width(g, root, &mut width)?;
    set_placement(g, root, 0, 0.0, 0.0, TAU, params, &width)?;

    tree::remove_super_root(g, guard)?;
    Ok(())
}

/// Post-order: leaf width 1, internal width = sum of children's widths.
fn set_width<N: Default, E: Default>(
    g: &Graph<N, E>,
    v: NodeId,
    width: &mut [f64],
) -> Result<f64> {
    let slot = g.node_slot(v)?;
    let children = child_list(g, v)?;
    let w = if children.is_empty() {
        1.0
    } else {
        let mut sum = 0.0;
        for c in children {
            sum += set_width(g, c, width)?;
        }
        sum
    };
    width[slot] = w;
    Ok(w)
}

/// Pre-order: place `v` on its ring at the wedge bisector, then hand each child a sub-wedge
/// proportional to its width.
#[allow(clippy::too_many_arguments)]
fn set_placement<N: Default, E: Default>(
    g: &mut Graph<N, E>,
    v: NodeId,
    depth: usize,
    radius: f64,
    alpha: f64,
    beta: f64,
    params: &RadialParams,
    width: &[f64],
) -> Result<()> {
    let slot = g.node_slot(v)?;
    let theta = (alpha + beta) / 2.0;
    g.set_position(
        v,
        Position::new(radius * theta.cos(), radius * theta.sin(), 0.0),
    )?;

    let children = child_list(g, v)?;
    if children.is_empty() {
        return Ok(());
    }

    let next_radius = radius + params.delta + params.layer_increase * depth as f64;
    let (mut lo, hi) = (alpha, beta);
    let mut span = hi - lo;
    if params.convexity && radius > 0.0 {
        // Keep the subtree inside the tangent cone of this ring position.
        let tau = 2.0 * (radius / next_radius).acos();
        if tau < span {
            lo = theta - tau / 2.0;
            span = tau;
        }
    }

    let per_unit = span / width[slot];
    let mut a = lo;
    for c in children {
        let child_span = per_unit * width[g.node_slot(c)?];
        set_placement(g, c, depth + 1, next_radius, a, a + child_span, params, width)?;
        a += child_span;
    }
    Ok(())
}

/// Strategy wrapper so the span layout can plug the radial pass in as its tree stage. The size
/// column is ignored; radial widths are purely structural.
#[derive(Debug, Clone, Default)]
pub struct RadialLayout {
    pub params: RadialParams,
}

impl TreeLayout for RadialLayout {
    fn layout_tree(&self, g: &mut Graph<(), ()>, _sizes: &NodeSizes) -> Result<()> {
        run(g, &self.params)
    }
}
