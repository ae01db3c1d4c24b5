//! High-dimensional embedding layout (Harel–Koren).
//!
//! Greedily picks M pivot nodes spread out over the graph, uses BFS distance to each pivot as
//! one coordinate axis, then projects the N×M distance matrix onto its top eigenvectors
//! (power iteration with Gram–Schmidt deflation). Requires a connected graph.

use crate::{Error, Result};
use canopy_graph::{Graph, Position};
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HdeParams {
    /// Number of pivots M; the graph must have at least this many nodes.
    pub pivots: usize,
    /// Number of projected dimensions C (capped at M).
    pub dimensions: usize,
}

impl Default for HdeParams {
    fn default() -> Self {
        Self {
            pivots: 50,
            dimensions: 3,
        }
    }
}

/// Direction-convergence tolerance of the power iteration (cosine distance).
const EPSILON: f64 = 0.001;
const MAX_POWER_ITERATIONS: usize = 1000;

pub fn run<N: Default, E: Default>(g: &mut Graph<N, E>, params: &HdeParams) -> Result<()> {
    let coords = embed(g, params)?;
    for (slot, row) in coords.iter().enumerate() {
        let axis = |d: usize| row.get(d).copied().unwrap_or(0.0);
        g.set_position(g.node_at(slot), Position::new(axis(0), axis(1), axis(2)))?;
    }
    Ok(())
}

/// The embedded coordinates, one row per node slot with exactly `min(dimensions, pivots)`
/// columns.
pub fn embed<N: Default, E: Default>(
    g: &Graph<N, E>,
    params: &HdeParams,
) -> Result<Vec<Vec<f64>>> {
    let cols = pivot_distance_columns(g, params)?;
    let n = g.node_count();
    let m = cols.len();
    let c = params.dimensions.min(m);

    // Center each axis across nodes.
    let mut centered = cols;
    for col in &mut centered {
        let mean = col.iter().sum::<f64>() / n as f64;
        for v in col.iter_mut() {
            *v -= mean;
        }
    }

    // Covariance S = X·Xᵗ/n over the M axes.
    let mut s = vec![vec![0.0; m]; m];
    for i in 0..m {
        for j in i..m {
            let cov = dot(&centered[i], &centered[j]) / n as f64;
            s[i][j] = cov;
            s[j][i] = cov;
        }
    }

    let basis = top_eigenvectors(&s, c);

    let mut coords = vec![vec![0.0; c]; n];
    for (slot, row) in coords.iter_mut().enumerate() {
        for (d, u) in basis.iter().enumerate() {
            row[d] = (0..m).map(|i| centered[i][slot] * u[i]).sum();
        }
    }
    Ok(coords)
}

/// BFS distance to each greedily chosen pivot, one column per pivot. The first pivot is slot 0;
/// every further pivot maximizes the running minimum distance to the pivots chosen so far.
pub fn pivot_distance_columns<N: Default, E: Default>(
    g: &Graph<N, E>,
    params: &HdeParams,
) -> Result<Vec<Vec<f64>>> {
    let n = g.node_count();
    if n < 2 {
        return Err(Error::TooFewNodes { have: n, need: 2 });
    }
    if n < params.pivots {
        return Err(Error::TooFewNodes {
            have: n,
            need: params.pivots,
        });
    }

    // Undirected adjacency by slot; BFS distances ignore edge direction.
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for e in g.edges().collect::<Vec<_>>() {
        let s = g.node_slot(g.source(e)?)?;
        let d = g.node_slot(g.target(e)?)?;
        if s != d {
            adj[s].push(d);
            adj[d].push(s);
        }
    }

    let mut cols: Vec<Vec<f64>> = Vec::with_capacity(params.pivots);
    let mut min_dist = vec![u32::MAX; n];
    let mut pivot = 0usize;
    for round in 0..params.pivots {
        let dist = bfs(&adj, pivot);
        if round == 0 && dist.iter().any(|d| d.is_none()) {
            return Err(Error::Disconnected);
        }
        cols.push(dist.iter().map(|d| d.unwrap_or(0) as f64).collect());

        let mut next = pivot;
        let mut best = 0u32;
        for (slot, d) in dist.iter().enumerate() {
            let d = d.unwrap_or(0);
            min_dist[slot] = min_dist[slot].min(d);
            if min_dist[slot] > best {
                best = min_dist[slot];
                next = slot;
            }
        }
        pivot = next;
    }
    Ok(cols)
}

fn bfs(adj: &[Vec<usize>], start: usize) -> Vec<Option<u32>> {
    let mut dist: Vec<Option<u32>> = vec![None; adj.len()];
    let mut queue = VecDeque::new();
    dist[start] = Some(0);
    queue.push_back(start);
    while let Some(v) = queue.pop_front() {
        let d = dist[v].unwrap_or(0);
        for &u in &adj[v] {
            if dist[u].is_none() {
                dist[u] = Some(d + 1);
                queue.push_back(u);
            }
        }
    }
    dist
}

/// Power iteration with Gram–Schmidt deflation against the eigenvectors already found.
fn top_eigenvectors(s: &[Vec<f64>], count: usize) -> Vec<Vec<f64>> {
    let m = s.len();
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(count);
    for e in 0..count {
        // Deterministic, non-degenerate start vector.
        let mut u: Vec<f64> = (0..m).map(|i| 1.0 / (i + e + 1) as f64).collect();
        normalize(&mut u);
        for _ in 0..MAX_POWER_ITERATIONS {
            for prev in &basis {
                let d = dot(&u, prev);
                for (ui, pi) in u.iter_mut().zip(prev) {
                    *ui -= d * pi;
                }
            }
            if normalize(&mut u) == 0.0 {
                // The remaining spectrum is degenerate; the axis stays zero.
                break;
            }
            let mut w: Vec<f64> = (0..m).map(|i| dot(&s[i], &u)).collect();
            if normalize(&mut w) == 0.0 {
                u.fill(0.0);
                break;
            }
            let cos = dot(&w, &u).abs();
            u = w;
            if cos >= 1.0 - EPSILON {
                break;
            }
        }
        basis.push(u);
    }
    basis
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn normalize(v: &mut [f64]) -> f64 {
    let len = dot(v, v).sqrt();
    if len > 0.0 {
        for x in v.iter_mut() {
            *x /= len;
        }
    }
    len
}
