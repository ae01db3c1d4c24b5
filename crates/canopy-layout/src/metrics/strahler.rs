//! Strahler numbers for trees and their general-graph generalization.

use crate::{Error, Result};
use canopy_graph::{Graph, NodeId};

/// Tree/forest Strahler metric, slot-indexed. Leaves are 0; an internal node with k children is
/// max(children) + k − 1 when every child value is equal and max(children) + k − 2 otherwise.
/// Cyclic input is rejected.
pub fn strahler<N: Default, E: Default>(g: &Graph<N, E>) -> Result<Vec<u32>> {
    if !g.is_acyclic() {
        return Err(Error::GraphIsCyclic);
    }

    fn visit<N: Default, E: Default>(
        g: &Graph<N, E>,
        v: NodeId,
        memo: &mut [Option<u32>],
    ) -> Result<u32> {
        let slot = g.node_slot(v)?;
        if let Some(value) = memo[slot] {
            return Ok(value);
        }
        let children: Vec<NodeId> = g.children(v)?.collect();
        let mut values = Vec::with_capacity(children.len());
        for c in children {
            values.push(visit(g, c, memo)?);
        }
        let value = combine(&values);
        memo[slot] = Some(value);
        Ok(value)
    }

    let n = g.node_count();
    let mut memo: Vec<Option<u32>> = vec![None; n];
    for slot in 0..n {
        visit(g, g.node_at(slot), &mut memo)?;
    }
    Ok(memo.into_iter().map(|v| v.unwrap_or(0)).collect())
}

fn combine(values: &[u32]) -> u32 {
    let Some(&max) = values.iter().max() else {
        return 0;
    };
    let k = values.len() as u32;
    if values.iter().all(|&v| v == max) {
        max + k - 1
    } else {
        max + k - 2
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStrahler {
    /// Strahler value over all out-neighbors.
    pub value: u32,
    /// Outgoing back/cross edges whose results must be parked while evaluating this node.
    pub stack: u32,
}

/// General-graph Strahler metric, slot-indexed. The value recurrence runs over every
/// out-neighbor and is iterated to a fixed point: one pass leaves values provisional wherever
/// a cross edge points at a node that is finalized later (or never, on a cycle). The stack
/// count is the number of outgoing non-tree edges under a DFS classification.
pub fn graph_strahler<N: Default, E: Default>(g: &Graph<N, E>) -> Vec<GraphStrahler> {
    let n = g.node_count();
    let mut values: Vec<u32> = vec![0; n];

    // Jacobi iteration; values are bounded by the node count, so n + 1 rounds suffice even
    // when a cycle keeps the recurrence from settling earlier.
    for _ in 0..=n {
        let mut next = values.clone();
        let mut changed = false;
        for slot in 0..n {
            let v = g.node_at(slot);
            let Ok(children) = g.children(v) else {
                continue;
            };
            let child_values: Vec<u32> = children
                .filter_map(|c| g.node_slot(c).ok())
                .map(|s| values[s])
                .collect();
            let value = combine(&child_values);
            if next[slot] != value {
                next[slot] = value;
                changed = true;
            }
        }
        values = next;
        if !changed {
            break;
        }
    }

    let stacks = non_tree_out_edges(g);
    values
        .into_iter()
        .zip(stacks)
        .map(|(value, stack)| GraphStrahler { value, stack })
        .collect()
}

/// Per-node count of outgoing edges that a DFS does not classify as tree edges.
fn non_tree_out_edges<N: Default, E: Default>(g: &Graph<N, E>) -> Vec<u32> {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    fn dfs<N: Default, E: Default>(
        g: &Graph<N, E>,
        v: NodeId,
        color: &mut [u8],
        extra: &mut [u32],
    ) {
        let Ok(v_slot) = g.node_slot(v) else {
            return;
        };
        color[v_slot] = GRAY;
        let Ok(outgoing) = g.outgoing_edges(v) else {
            return;
        };
        for &e in outgoing {
            let Ok(w) = g.target(e) else {
                continue;
            };
            let Ok(w_slot) = g.node_slot(w) else {
                continue;
            };
            if color[w_slot] == WHITE {
                dfs(g, w, color, extra);
            } else {
                extra[v_slot] += 1;
            }
        }
        color[v_slot] = BLACK;
    }

    let n = g.node_count();
    let mut color = vec![WHITE; n];
    let mut extra = vec![0u32; n];
    for slot in 0..n {
        if color[slot] == WHITE {
            dfs(g, g.node_at(slot), &mut color, &mut extra);
        }
    }
    extra
}
