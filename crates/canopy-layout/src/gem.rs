//! GEM force-directed layout (Frick, Ludwig, Mehldau).
//!
//! A spring embedder with two phases: `insert` bootstraps a non-degenerate layout by bringing
//! nodes in one at a time next to their already-placed neighbors, `arrange` then iterates
//! randomized round-robin single-node updates. Every node carries its own temperature ("heat")
//! that rises while it keeps moving the same way and cools when it oscillates or spins; the
//! run stops once the summed squared heat falls under a threshold or an iteration cap hits.
//!
//! This is the one stochastic layout in the crate; the generator is seedable so runs are
//! reproducible.

use crate::Result;
use canopy_graph::{Graph, Position};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// One phase's tuning constants. The defaults are the empirically tuned values of the GEM
/// reference implementation; they are preserved verbatim, not re-derived.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GemPhaseParams {
    /// Initial per-node heat, as a fraction of the unit edge length.
    pub start_temp: f64,
    /// Stop once Σ heat² < n · (final_temp · edge_length)².
    pub final_temp: f64,
    /// Per-node heat ceiling, as a fraction of the unit edge length.
    pub max_temp: f64,
    /// Pull toward the barycenter.
    pub gravity: f64,
    /// Heat response to motion along (or against) the previous direction.
    pub oscillation: f64,
    /// Skew accumulation for sideways motion.
    pub rotation: f64,
    /// Random jitter amplitude, as a fraction of the unit edge length.
    pub shake: f64,
    /// Update cap factor: at most `max_iter · n²` single-node updates.
    pub max_iter: usize,
}

pub const INSERT_DEFAULTS: GemPhaseParams = GemPhaseParams {
    start_temp: 0.3,
    final_temp: 0.05,
    max_temp: 1.5,
    gravity: 0.05,
    oscillation: 0.4,
    rotation: 0.5,
    shake: 0.2,
    max_iter: 10,
};

pub const ARRANGE_DEFAULTS: GemPhaseParams = GemPhaseParams {
    start_temp: 1.0,
    final_temp: 0.02,
    max_temp: 1.5,
    gravity: 0.1,
    oscillation: 0.4,
    rotation: 0.9,
    shake: 0.3,
    max_iter: 3,
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GemParams {
    pub insert: GemPhaseParams,
    pub arrange: GemPhaseParams,
    /// Desired edge length in layout units; temperatures and jitter scale with it.
    pub edge_length: f64,
}

impl Default for GemParams {
    fn default() -> Self {
        Self {
            insert: INSERT_DEFAULTS,
            arrange: ARRANGE_DEFAULTS,
            edge_length: 128.0,
        }
    }
}

const MIN_HEAT: f64 = 2.0;
const MAX_ATTRACT: f64 = 1_048_576.0;
// Opening angles for the heat update: motion within ±45° of the previous axis counts as
// oscillation feedback, motion more than 60° sideways counts as rotation.
const OSCILLATION_OPENING_COS: f64 = std::f64::consts::FRAC_1_SQRT_2;
const ROTATION_OPENING_SIN: f64 = 0.5;

pub struct GemLayout {
    params: GemParams,
    rng: SmallRng,
}

impl Default for GemLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GemLayout {
    pub const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    /// Same seed + same graph → identical positions.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: GemParams::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_params(params: GemParams, seed: u64) -> Self {
        Self {
            params,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn params(&self) -> &GemParams {
        &self.params
    }

    pub fn run<N: Default, E: Default>(&mut self, g: &mut Graph<N, E>) -> Result<()> {
        let n = g.node_count();
        if n == 0 {
            return Ok(());
        }
        tracing::debug!(nodes = n, edges = g.edge_count(), "gem layout start");

        let mut sim = SimState::build(g)?;
        self.insert_phase(&mut sim);
        self.arrange_phase(&mut sim);

        for slot in 0..n {
            let (x, y) = sim.pos[slot];
            g.set_position(g.node_at(slot), Position::new(x, y, 0.0))?;
        }
        Ok(())
    }

    /// Brings nodes in one at a time: each round picks the unplaced node with the most placed
    /// neighbors, seeds it near their barycenter and settles it with a few local impulses.
    fn insert_phase(&mut self, sim: &mut SimState) {
        let p = self.params.insert;
        let elen = self.params.edge_length;
        sim.reset_heat(p.start_temp * elen);

        let n = sim.len();
        for _ in 0..n {
            let v = sim.next_unplaced();
            let mut start = (0.0, 0.0);
            let mut placed_neighbors = 0usize;
            for &u in &sim.adj[v] {
                if sim.placed[u] {
                    start.0 += sim.pos[u].0;
                    start.1 += sim.pos[u].1;
                    placed_neighbors += 1;
                }
            }
            if placed_neighbors > 0 {
                start.0 /= placed_neighbors as f64;
                start.1 /= placed_neighbors as f64;
            }
            let shake = p.shake * elen;
            sim.pos[v] = (
                start.0 + self.rng.gen_range(-shake..=shake),
                start.1 + self.rng.gen_range(-shake..=shake),
            );
            sim.place(v);

            for _ in 0..p.max_iter {
                let imp = self.impulse(sim, v, &p);
                sim.displace(v, imp, &p, elen);
            }
        }
    }

    /// Randomized round-robin refinement: the selection permutation is reshuffled once per full
    /// pass; the phase stops on the heat threshold or the `max_iter · n²` update cap.
    fn arrange_phase(&mut self, sim: &mut SimState) {
        let p = self.params.arrange;
        let elen = self.params.edge_length;
        sim.reset_heat(p.start_temp * elen);

        let n = sim.len();
        let stop_temp = n as f64 * (p.final_temp * elen).powi(2);
        let max_updates = p.max_iter * n * n;
        let mut perm: Vec<usize> = (0..n).collect();
        let mut updates = 0usize;

        while updates < max_updates {
            perm.shuffle(&mut self.rng);
            for &v in &perm {
                if updates >= max_updates {
                    break;
                }
                updates += 1;
                let imp = self.impulse(sim, v, &p);
                sim.displace(v, imp, &p, elen);
            }
            let temp: f64 = sim.heat.iter().map(|h| h * h).sum();
            tracing::trace!(temp, updates, "gem arrangement round");
            if temp < stop_temp {
                break;
            }
        }
    }

    /// Net impulse on `v`: gravity toward the barycenter scaled by mass, random shake,
    /// inverse-square repulsion from every placed node and spring attraction along edges
    /// damped by the node's mass. Both distance terms are capped so near-coincident and
    /// far-flung nodes cannot produce unbounded forces.
    fn impulse(&mut self, sim: &SimState, v: usize, p: &GemPhaseParams) -> (f64, f64) {
        let elen = self.params.edge_length;
        let elen2 = elen * elen;
        let (px, py) = sim.pos[v];
        let (cx, cy) = sim.barycenter();

        let mut ix = (cx - px) * p.gravity * sim.mass[v];
        let mut iy = (cy - py) * p.gravity * sim.mass[v];

        let shake = p.shake * elen;
        ix += self.rng.gen_range(-shake..=shake);
        iy += self.rng.gen_range(-shake..=shake);

        for u in 0..sim.len() {
            if u == v || !sim.placed[u] {
                continue;
            }
            let dx = px - sim.pos[u].0;
            let dy = py - sim.pos[u].1;
            let d2 = dx * dx + dy * dy;
            if d2 > 0.0 {
                let f = (elen2 / d2).min(MAX_ATTRACT);
                ix += dx * f;
                iy += dy * f;
            }
        }

        for &u in &sim.adj[v] {
            if !sim.placed[u] {
                continue;
            }
            let dx = px - sim.pos[u].0;
            let dy = py - sim.pos[u].1;
            let d2 = (dx * dx + dy * dy).min(MAX_ATTRACT);
            let f = d2 / (elen2 * sim.mass[v]);
            ix -= dx * f;
            iy -= dy * f;
        }

        (ix, iy)
    }
}

struct SimState {
    adj: Vec<Vec<usize>>,
    mass: Vec<f64>,
    pos: Vec<(f64, f64)>,
    imp: Vec<(f64, f64)>,
    heat: Vec<f64>,
    skew: Vec<f64>,
    placed: Vec<bool>,
    center_sum: (f64, f64),
    placed_count: usize,
}

impl SimState {
    fn build<N: Default, E: Default>(g: &Graph<N, E>) -> Result<Self> {
        let n = g.node_count();
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        for e in g.edges().collect::<Vec<_>>() {
            let s = g.node_slot(g.source(e)?)?;
            let d = g.node_slot(g.target(e)?)?;
            if s != d {
                adj[s].push(d);
                adj[d].push(s);
            }
        }
        // GEM mass: heavier nodes (high degree) move less and anchor their neighborhoods.
        let mass = adj.iter().map(|a| 1.0 + a.len() as f64 / 3.0).collect();
        Ok(Self {
            adj,
            mass,
            pos: vec![(0.0, 0.0); n],
            imp: vec![(0.0, 0.0); n],
            heat: vec![0.0; n],
            skew: vec![0.0; n],
            placed: vec![false; n],
            center_sum: (0.0, 0.0),
            placed_count: 0,
        })
    }

    fn len(&self) -> usize {
        self.pos.len()
    }

    fn reset_heat(&mut self, heat: f64) {
        self.heat.fill(heat);
        self.skew.fill(0.0);
        self.imp.fill((0.0, 0.0));
    }

    fn barycenter(&self) -> (f64, f64) {
        if self.placed_count == 0 {
            return (0.0, 0.0);
        }
        (
            self.center_sum.0 / self.placed_count as f64,
            self.center_sum.1 / self.placed_count as f64,
        )
    }

    fn place(&mut self, v: usize) {
        self.placed[v] = true;
        self.placed_count += 1;
        self.center_sum.0 += self.pos[v].0;
        self.center_sum.1 += self.pos[v].1;
    }

    /// The unplaced node with the most placed neighbors; ties fall back to slot order.
    fn next_unplaced(&self) -> usize {
        let mut best = usize::MAX;
        let mut best_score = 0usize;
        for v in 0..self.len() {
            if self.placed[v] {
                continue;
            }
            let score = self.adj[v].iter().filter(|&&u| self.placed[u]).count();
            if best == usize::MAX || score > best_score {
                best = v;
                best_score = score;
            }
        }
        best
    }

    /// Moves `v` by its impulse scaled to its heat, then lets the heat react to how the motion
    /// relates to the previous impulse: aligned motion accelerates, reversals damp
    /// (oscillation), sideways motion accumulates skew and damps (rotation).
    fn displace(&mut self, v: usize, (ix, iy): (f64, f64), p: &GemPhaseParams, elen: f64) {
        if ix == 0.0 && iy == 0.0 {
            return;
        }
        let len = (ix * ix + iy * iy).sqrt();
        let t = self.heat[v];
        let (dx, dy) = (ix * t / len, iy * t / len);
        self.pos[v].0 += dx;
        self.pos[v].1 += dy;
        self.center_sum.0 += dx;
        self.center_sum.1 += dy;

        let (ox, oy) = self.imp[v];
        let old_len = (ox * ox + oy * oy).sqrt();
        if old_len > 0.0 {
            let norm = len * old_len;
            let cos_b = (ix * ox + iy * oy) / norm;
            let sin_b = (ix * oy - iy * ox) / norm;
            if cos_b.abs() > OSCILLATION_OPENING_COS {
                self.heat[v] *= (1.0 + p.oscillation * cos_b).max(0.0);
            }
            if sin_b.abs() > ROTATION_OPENING_SIN {
                self.skew[v] += p.rotation * sin_b.signum() / (2.0 * self.len() as f64);
                self.heat[v] *= (1.0 - self.skew[v].abs()).max(0.0);
            }
            self.heat[v] = self.heat[v].clamp(MIN_HEAT, p.max_temp * elen);
        }
        self.imp[v] = (ix, iy);
    }
}
