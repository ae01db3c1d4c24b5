//! Spatial layout algorithms and metrics over `canopy-graph`.
//!
//! Every layout reads topology from a [`Graph`](canopy_graph::Graph) and writes the graph's own
//! position table. The tree-shaped layouts (cone, Reingold–Tilford, radial) require a forest
//! and wrap multi-root forests in a temporary super-root; the span layout handles arbitrary
//! digraphs by composing a spanning-DAG extraction with a pluggable tree layout.

use canopy_graph::{Graph, NodeId};

pub mod cone;
pub mod gem;
pub mod hde;
pub mod metrics;
pub mod radial;
pub mod reingold_tilford;
pub mod span;
pub(crate) mod tree;

pub use cone::{ConeParams, ConeStats, ConeTreeLayout};
pub use gem::{GemLayout, GemParams, GemPhaseParams};
pub use hde::HdeParams;
pub use radial::{RadialLayout, RadialParams};
pub use reingold_tilford::{ReingoldTilford, TilfordParams};
pub use span::SpanParams;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] canopy_graph::Error),

    #[error("precondition violated: {0}")]
    PreconditionViolated(&'static str),

    #[error("graph must be connected")]
    Disconnected,

    #[error("graph must be acyclic")]
    GraphIsCyclic,

    #[error("need at least {need} nodes, have {have}")]
    TooFewNodes { have: usize, need: usize },
}

/// Per-node visual size consumed by the cone and Reingold–Tilford layouts. Slot-indexed;
/// entries the caller never assigned read as 1.0, so `uniform()` is simply the empty column.
#[derive(Debug, Clone, Default)]
pub struct NodeSizes {
    sizes: Vec<f64>,
}

impl NodeSizes {
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn from_slots(sizes: Vec<f64>) -> Self {
        Self { sizes }
    }

    /// Builds the column by evaluating `f` for every node of `g`, in slot order.
    pub fn from_fn<N: Default, E: Default>(
        g: &Graph<N, E>,
        f: impl Fn(NodeId) -> f64,
    ) -> Self {
        Self {
            sizes: g.nodes().map(f).collect(),
        }
    }

    pub fn get(&self, slot: usize) -> f64 {
        self.sizes.get(slot).copied().unwrap_or(1.0)
    }
}

/// A tree layout usable as the placement stage of [`span::run`]. Implementations lay out the
/// rooted tree `g` in x/y (and optionally z); the span layout overrides z afterwards.
pub trait TreeLayout {
    fn layout_tree(&self, g: &mut Graph<(), ()>, sizes: &NodeSizes) -> Result<()>;
}
