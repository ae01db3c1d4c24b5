//! Layered 3D layout for general directed graphs.
//!
//! Composes a pluggable spanning-DAG extractor with a pluggable tree layout: the input is
//! reduced to a spanning tree, leveled, laid out as a tree in x/y, and the results are copied
//! back with z = level × separation. Long edges are spliced with synthetic intermediate nodes
//! whose positions come back as bend points on the original edges.
//!
//! Self-loop edges are dropped by the spanning-DAG step and never reinstated; known
//! limitation.

use crate::cone::ConeTreeLayout;
use crate::metrics::spanning_dag;
use crate::{Error, NodeSizes, Result, TreeLayout};
use canopy_graph::{EdgeId, Graph, NodeId, Position};
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::collections::VecDeque;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpanParams {
    /// Distance between consecutive DAG levels along z.
    pub level_separation: f64,
}

impl Default for SpanParams {
    fn default() -> Self {
        Self {
            level_separation: 5.0,
        }
    }
}

/// A scratch-tree edge's link back to the input graph.
#[derive(Debug, Clone, Copy)]
struct OrigEdge {
    edge: EdgeId,
    reversed: bool,
}

/// A long-edge substitution: the synthetic nodes standing in for `edge`, in scratch-tree path
/// order.
#[derive(Debug, Clone)]
struct Splice {
    orig: OrigEdge,
    synth: Vec<NodeId>,
}

/// Runs with the default collaborators: DFS spanning-DAG extraction and the cone tree layout.
pub fn run<N: Default, E: Default>(g: &mut Graph<N, E>, params: &SpanParams) -> Result<()> {
    run_with(g, spanning_dag, &ConeTreeLayout::default(), params)
}

pub fn run_with<N, E, X, T>(
    g: &mut Graph<N, E>,
    extract_dag: X,
    tree_layout: &T,
    params: &SpanParams,
) -> Result<()>
where
    N: Default,
    E: Default,
    X: Fn(&Graph<N, E>) -> Vec<EdgeId>,
    T: TreeLayout,
{
    let n = g.node_count();
    if n == 0 {
        return Ok(());
    }
    tracing::debug!(nodes = n, edges = g.edge_count(), "span layout start");

    // 1. Spanning DAG over the input.
    let dag: HashSet<EdgeId> = extract_dag(g).into_iter().collect();

    // 2. Scratch tree over the same node ids. DAG edges come over as-is; a non-DAG edge is
    // reversed when that gives its source its only parent, and dropped otherwise.
    let mut t: Graph<(), ()> = Graph::with_capacity(n, g.edge_count());
    for v in g.nodes().collect::<Vec<_>>() {
        t.create_node_with(v)?;
    }
    let mut edge_map: HashMap<EdgeId, OrigEdge> = HashMap::default();
    let input_edges: Vec<EdgeId> = g.edges().collect();
    for &e in &input_edges {
        let (src, dst) = (g.source(e)?, g.target(e)?);
        if src == dst || !dag.contains(&e) {
            continue;
        }
        let se = t.create_edge(src, dst);
        edge_map.insert(
            se,
            OrigEdge {
                edge: e,
                reversed: false,
            },
        );
    }
    for &e in &input_edges {
        let (src, dst) = (g.source(e)?, g.target(e)?);
        if src == dst || dag.contains(&e) {
            continue;
        }
        if t.in_degree(src)? == 0 && t.find_edge(dst, src).is_none() {
            let se = t.create_edge(dst, src);
            edge_map.insert(
                se,
                OrigEdge {
                    edge: e,
                    reversed: true,
                },
            );
        }
    }
    debug_assert!(t.is_acyclic(), "scratch tree must stay acyclic");

    // Adopt every remaining root under one synthetic super-root so the tree stage sees a
    // single tree.
    let roots = t.roots();
    if roots.len() > 1 {
        let super_root = t.create_node();
        for root in roots {
            t.create_edge(super_root, root);
        }
    }

    // 3. Levels: forward topological pass, then pull nodes down toward their children so the
    // remaining gaps expose genuinely long edges.
    let mut level = assign_levels(&t)?;

    // 4. Splice every tree edge spanning more than one level: one synthetic node just below
    // the source, a second just above the target when the gap is wider than two. The
    // substitution list is replayed as bend points at the end.
    let mut edits: Vec<Splice> = Vec::new();
    let mut synthetic: HashSet<NodeId> = HashSet::default();
    for se in t.edges().collect::<Vec<_>>() {
        let (u, v) = (t.source(se)?, t.target(se)?);
        let span = level_of(&level, v) - level_of(&level, u);
        if span <= 1 {
            continue;
        }
        let mapping = edge_map.remove(&se);
        t.delete_edge(se)?;
        let (level_u, level_v) = (level_of(&level, u), level_of(&level, v));

        let a = t.create_node();
        synthetic.insert(a);
        level.insert(a, level_u + 1);
        let mut chain = vec![a];
        let b = if span > 2 {
            let b = t.create_node();
            synthetic.insert(b);
            level.insert(b, level_v - 1);
            chain.push(b);
            b
        } else {
            a
        };
        t.create_edge(u, a);
        if b != a {
            t.create_edge(a, b);
        }
        t.create_edge(b, v);
        if let Some(orig) = mapping {
            edits.push(Splice { orig, synth: chain });
        }
    }

    // 5. Reduce every multi-parent node (artifact of the DAG-to-tree step) to its first parent
    // edge, then prune synthetic chain tails that lost their way to a target.
    for v in t.nodes().collect::<Vec<_>>() {
        let incoming = t.incoming_edges(v)?.to_vec();
        for &e in incoming.iter().skip(1) {
            edge_map.remove(&e);
            t.delete_edge(e)?;
        }
    }
    loop {
        let dead = t
            .nodes()
            .find(|v| synthetic.contains(v) && t.out_degree(*v).unwrap_or(0) == 0);
        let Some(dead) = dead else {
            break;
        };
        t.delete_node(dead)?;
    }

    // 6. The pluggable tree stage lays out x/y.
    tree_layout.layout_tree(&mut t, &NodeSizes::uniform())?;

    // 7. Copy positions back onto the original ids with z overridden by level, and replay the
    // edit list as bend points (reversed when the tree edge ran against the original edge).
    let min_level = g
        .nodes()
        .filter_map(|v| level.get(&v).copied())
        .min()
        .unwrap_or(0);
    let sep = params.level_separation;
    let scaled = |t: &Graph<(), ()>, node: NodeId, level: &HashMap<NodeId, i64>| -> Result<Position> {
        let p = t.position(node)?;
        let l = (level.get(&node).copied().unwrap_or(min_level) - min_level) as f64;
        Ok(Position::new(p.x, p.y, l * sep))
    };

    for v in g.nodes().collect::<Vec<_>>() {
        let pos = scaled(&t, v, &level)?;
        g.set_position(v, pos)?;
    }
    for edit in &edits {
        if !g.contains_edge(edit.orig.edge) || edit.synth.iter().any(|s| !t.contains_node(*s)) {
            continue;
        }
        let mut points = Vec::with_capacity(edit.synth.len());
        for &s in &edit.synth {
            points.push(scaled(&t, s, &level)?);
        }
        if edit.orig.reversed {
            points.reverse();
        }
        g.clear_bends(edit.orig.edge)?;
        for (i, p) in points.into_iter().enumerate() {
            let bend = g.create_bend();
            g.set_bend_position(bend, p)?;
            g.insert_bend(edit.orig.edge, i, bend)?;
        }
    }

    tracing::debug!(splices = edits.len(), "span layout done");
    Ok(())
}

fn level_of(level: &HashMap<NodeId, i64>, v: NodeId) -> i64 {
    level.get(&v).copied().unwrap_or(0)
}

/// Kahn forward pass (level = deepest parent + 1) followed by a backward min-of-children − 1
/// correction in reverse topological order.
fn assign_levels(t: &Graph<(), ()>) -> Result<HashMap<NodeId, i64>> {
    let mut level: HashMap<NodeId, i64> = HashMap::default();
    let mut indegree: HashMap<NodeId, usize> = HashMap::default();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for v in t.nodes() {
        let d = t.in_degree(v)?;
        indegree.insert(v, d);
        if d == 0 {
            level.insert(v, 0);
            queue.push_back(v);
        }
    }

    let mut topo: Vec<NodeId> = Vec::with_capacity(t.node_count());
    while let Some(v) = queue.pop_front() {
        topo.push(v);
        let lv = level_of(&level, v);
        for c in t.children(v)?.collect::<Vec<_>>() {
            let entry = level.entry(c).or_insert(lv + 1);
            *entry = (*entry).max(lv + 1);
            let d = indegree.entry(c).or_insert(0);
            *d -= 1;
            if *d == 0 {
                queue.push_back(c);
            }
        }
    }
    if topo.len() != t.node_count() {
        return Err(Error::GraphIsCyclic);
    }

    for &v in topo.iter().rev() {
        let child_min = t.children(v)?.map(|c| level_of(&level, c)).min();
        if let Some(child_min) = child_min {
            let candidate = child_min - 1;
            if candidate > level_of(&level, v) {
                level.insert(v, candidate);
            }
        }
    }
    Ok(level)
}
