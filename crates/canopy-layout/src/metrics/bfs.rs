//! Unweighted shortest-path labelings.

use crate::Result;
use canopy_graph::{Graph, NodeId};
use std::collections::VecDeque;

/// BFS distance from `start` following edge direction. Slot-indexed; unreachable nodes are
/// `None`.
pub fn bfs_distances<N: Default, E: Default>(
    g: &Graph<N, E>,
    start: NodeId,
) -> Result<Vec<Option<u32>>> {
    let slot = g.node_slot(start)?;
    Ok(bfs_multi(g, &[slot]))
}

/// BFS distance labeling seeded simultaneously from every source node.
pub fn bfs_from_sources<N: Default, E: Default>(g: &Graph<N, E>) -> Vec<Option<u32>> {
    let seeds: Vec<usize> = g
        .sources()
        .into_iter()
        .filter_map(|v| g.node_slot(v).ok())
        .collect();
    bfs_multi(g, &seeds)
}

fn bfs_multi<N: Default, E: Default>(g: &Graph<N, E>, seeds: &[usize]) -> Vec<Option<u32>> {
    let mut dist: Vec<Option<u32>> = vec![None; g.node_count()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for &s in seeds {
        dist[s] = Some(0);
        queue.push_back(s);
    }
    while let Some(slot) = queue.pop_front() {
        let d = dist[slot].unwrap_or(0);
        let Ok(children) = g.children(g.node_at(slot)) else {
            continue;
        };
        for c in children.collect::<Vec<_>>() {
            let Ok(c_slot) = g.node_slot(c) else {
                continue;
            };
            if dist[c_slot].is_none() {
                dist[c_slot] = Some(d + 1);
                queue.push_back(c_slot);
            }
        }
    }
    dist
}

/// Maps a distance labeling onto [0, 1] by the observed maximum. A labeling whose maximum is 0
/// maps to all zeros.
pub fn normalize_distances(dist: &[Option<u32>]) -> Vec<Option<f64>> {
    let max = dist.iter().flatten().copied().max().unwrap_or(0);
    dist.iter()
        .map(|d| {
            d.map(|d| {
                if max == 0 {
                    0.0
                } else {
                    d as f64 / max as f64
                }
            })
        })
        .collect()
}

/// Undirected connected components, each listed in discovery order.
pub fn components<N: Default, E: Default>(g: &Graph<N, E>) -> Vec<Vec<NodeId>> {
    let n = g.node_count();
    let mut seen = vec![false; n];
    let mut out: Vec<Vec<NodeId>> = Vec::new();
    for start in 0..n {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut comp = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(start);
        while let Some(slot) = queue.pop_front() {
            let v = g.node_at(slot);
            comp.push(v);
            let Ok(neighbors) = g.neighbors(v) else {
                continue;
            };
            for u in neighbors {
                let Ok(u_slot) = g.node_slot(u) else {
                    continue;
                };
                if !seen[u_slot] {
                    seen[u_slot] = true;
                    queue.push_back(u_slot);
                }
            }
        }
        out.push(comp);
    }
    out
}
