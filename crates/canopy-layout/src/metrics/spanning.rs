//! Spanning-structure extraction: a DFS spanning DAG and a Prim-style maximal spanning tree.

use canopy_graph::{EdgeId, Graph, NodeId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const WHITE: u8 = 0;
const GRAY: u8 = 1;
const BLACK: u8 = 2;

/// Acyclic subgraph of a (possibly cyclic) digraph by DFS edge classification: tree edges and
/// forward/cross edges into finished nodes are kept, back edges into nodes still on the DFS
/// stack are dropped (they would close a cycle). Self-loops are back edges by definition.
pub fn spanning_dag<N: Default, E: Default>(g: &Graph<N, E>) -> Vec<EdgeId> {
    fn dfs<N: Default, E: Default>(
        g: &Graph<N, E>,
        v: NodeId,
        color: &mut [u8],
        keep: &mut Vec<EdgeId>,
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
            match color[w_slot] {
                WHITE => {
                    keep.push(e);
                    dfs(g, w, color, keep);
                }
                BLACK => keep.push(e),
                _ => {}
            }
        }
        color[v_slot] = BLACK;
    }

    let n = g.node_count();
    let mut color = vec![WHITE; n];
    let mut keep: Vec<EdgeId> = Vec::new();
    for slot in 0..n {
        if color[slot] == WHITE {
            dfs(g, g.node_at(slot), &mut color, &mut keep);
        }
    }
    keep
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    key: f64,
    edge: EdgeId,
    to_slot: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so the std max-heap pops the smallest key first; ties break on edge id for
    // determinism.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.edge.cmp(&self.edge))
    }
}

/// Maximum-weight spanning tree (undirected view) via Prim's algorithm on a min-priority queue
/// keyed `max_weight − w`. Disconnected graphs restart from the first unreached node, yielding
/// a spanning forest.
pub fn max_spanning_tree<N: Default, E: Default>(
    g: &Graph<N, E>,
    weight: impl Fn(EdgeId) -> f64,
) -> Vec<EdgeId> {
    let n = g.node_count();
    if n == 0 {
        return Vec::new();
    }
    let max_weight = g
        .edges()
        .map(&weight)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(0.0);

    let mut visited = vec![false; n];
    let mut heap: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut out: Vec<EdgeId> = Vec::new();

    let push_incident = |heap: &mut BinaryHeap<QueueEntry>, visited: &[bool], slot: usize| {
        let v = g.node_at(slot);
        let Ok(incident) = g.edges_of(v) else {
            return;
        };
        for &e in incident {
            let Ok(other) = g.opposite(e, v) else {
                continue;
            };
            let Ok(other_slot) = g.node_slot(other) else {
                continue;
            };
            if !visited[other_slot] {
                heap.push(QueueEntry {
                    key: max_weight - weight(e),
                    edge: e,
                    to_slot: other_slot,
                });
            }
        }
    };

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        push_incident(&mut heap, &visited, start);
        while let Some(entry) = heap.pop() {
            if visited[entry.to_slot] {
                continue;
            }
            visited[entry.to_slot] = true;
            out.push(entry.edge);
            push_incident(&mut heap, &visited, entry.to_slot);
        }
    }
    out
}
