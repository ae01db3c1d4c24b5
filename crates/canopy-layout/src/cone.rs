//! Cone tree layout (Carrière–Kazman style).
//!
//! Two recursive passes: `local_placement` (post-order) sizes each subtree as a disc and
//! arranges child discs on a ring, tightening with an incrementally grown minimal enclosing
//! circle; `global_placement` (pre-order) converts parent-relative offsets into absolute
//! coordinates and drops each level by a compression-dependent gap along z.

use crate::tree::{self, child_list};
use crate::{NodeSizes, Result, TreeLayout};
use canopy_graph::{Graph, NodeId, Position};
use serde::Serialize;
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConeParams {
    /// Base distance between consecutive tree levels.
    pub spacing: f64,
    /// Tuning constant for the level gap; empirically 0.75.
    pub compactness: f64,
    /// Constant level gap when set; proportional to the widest subtree otherwise.
    pub compression: bool,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            compactness: 0.75,
            compression: false,
        }
    }
}

/// Running diagnostics over the per-subtree radii produced by the local pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ConeStats {
    pub min_radius: f64,
    pub max_radius: f64,
    pub radius_sum: f64,
    pub subtrees: usize,
}

impl ConeStats {
    fn observe(&mut self, radius: f64) {
        if self.subtrees == 0 {
            self.min_radius = radius;
            self.max_radius = radius;
        } else {
            self.min_radius = self.min_radius.min(radius);
            self.max_radius = self.max_radius.max(radius);
        }
        self.radius_sum += radius;
        self.subtrees += 1;
    }
}

pub fn run<N: Default, E: Default>(
    g: &mut Graph<N, E>,
    params: &ConeParams,
    sizes: &NodeSizes,
) -> Result<ConeStats> {
    if g.node_count() == 0 {
        return Ok(ConeStats::default());
    }
    let (root, guard) = tree::single_root(g)?;

    let n = g.node_count();
    let mut rel = vec![(0.0, 0.0); n];
    let mut stats = ConeStats::default();
    local_placement(g, root, sizes, &mut rel, &mut stats)?;

    let scale = if params.compression {
        params.compactness
    } else {
        params.compactness * stats.max_radius
    };
    let gap = params.spacing * scale.max(f64::EPSILON);
    global_placement(g, root, 0.0, 0.0, 0, gap, &rel)?;

    tree::remove_super_root(g, guard)?;
    tracing::debug!(
        nodes = n,
        max_radius = stats.max_radius,
        min_radius = stats.min_radius,
        "cone tree layout done"
    );
    Ok(stats)
}

/// Post-order: computes each subtree's disc radius and the children's parent-relative offsets.
fn local_placement<N: Default, E: Default>(
    g: &Graph<N, E>,
    v: NodeId,
    sizes: &NodeSizes,
    rel: &mut Vec<(f64, f64)>,
    stats: &mut ConeStats,
) -> Result<f64> {
    let slot = g.node_slot(v)?;
    let children = child_list(g, v)?;

    let radius = if children.is_empty() {
        sizes.get(slot)
    } else if children.len() == 1 {
        let r = local_placement(g, children[0], sizes, rel, stats)?;
        set_rel(rel, g.node_slot(children[0])?, (0.0, 0.0));
        r
    } else {
        let mut radii = Vec::with_capacity(children.len());
        for &c in &children {
            radii.push(local_placement(g, c, sizes, rel, stats)?);
        }

        // Ring circumference = sum of child diameters; each child gets an arc proportional
        // to its diameter and sits at the arc midpoint.
        let circumference: f64 = radii.iter().map(|r| 2.0 * r).sum();
        let ring = circumference / TAU;
        let mut angle = 0.0;
        let mut enclosing: Option<(f64, f64, f64)> = None;
        for (&c, &r) in children.iter().zip(&radii) {
            let arc = if circumference > 0.0 {
                2.0 * r / circumference * TAU
            } else {
                TAU / children.len() as f64
            };
            let theta = angle + arc / 2.0;
            angle += arc;
            let p = (ring * theta.cos(), ring * theta.sin());
            set_rel(rel, g.node_slot(c)?, p);
            enclosing = Some(match enclosing {
                None => (p.0, p.1, r),
                Some(circle) => merge_circle(circle, (p.0, p.1, r)),
            });
        }

        // Re-center the children on the enclosing circle so the parent sits at its middle.
        let (cx, cy, cr) = enclosing.unwrap_or((0.0, 0.0, 0.0));
        for &c in &children {
            let slot = g.node_slot(c)?;
            rel[slot].0 -= cx;
            rel[slot].1 -= cy;
        }
        cr.max(sizes.get(slot))
    };

    stats.observe(radius);
    Ok(radius)
}

/// Pre-order: absolute position = parent absolute + relative; z drops one `gap` per level.
fn global_placement<N: Default, E: Default>(
    g: &mut Graph<N, E>,
    v: NodeId,
    parent_x: f64,
    parent_y: f64,
    depth: usize,
    gap: f64,
    rel: &[(f64, f64)],
) -> Result<()> {
    let slot = g.node_slot(v)?;
    let (rx, ry) = rel.get(slot).copied().unwrap_or((0.0, 0.0));
    let (ax, ay) = (parent_x + rx, parent_y + ry);
    g.set_position(v, Position::new(ax, ay, -(depth as f64) * gap))?;
    for c in child_list(g, v)? {
        global_placement(g, c, ax, ay, depth + 1, gap, rel)?;
    }
    Ok(())
}

fn set_rel(rel: &mut Vec<(f64, f64)>, slot: usize, p: (f64, f64)) {
    if slot >= rel.len() {
        rel.resize(slot + 1, (0.0, 0.0));
    }
    rel[slot] = p;
}

/// Smallest circle containing both arguments, grown incrementally child by child.
fn merge_circle(a: (f64, f64, f64), b: (f64, f64, f64)) -> (f64, f64, f64) {
    let (ax, ay, ar) = a;
    let (bx, by, br) = b;
    let d = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
    if d + br <= ar {
        return a;
    }
    if d + ar <= br {
        return b;
    }
    let nr = (ar + d + br) / 2.0;
    let t = (nr - ar) / d;
    (ax + (bx - ax) * t, ay + (by - ay) * t, nr)
}

/// Strategy wrapper so the span layout can plug the cone pass in as its tree stage.
#[derive(Debug, Clone, Default)]
pub struct ConeTreeLayout {
    pub params: ConeParams,
}

impl TreeLayout for ConeTreeLayout {
    fn layout_tree(&self, g: &mut Graph<(), ()>, sizes: &NodeSizes) -> Result<()> {
        run(g, &self.params, sizes).map(|_| ())
    }
}
