//! Graph metrics: spanning structures, Strahler numbers, BFS distances.

mod bfs;
mod spanning;
mod strahler;

pub use bfs::{bfs_distances, bfs_from_sources, components, normalize_distances};
pub use spanning::{max_spanning_tree, spanning_dag};
pub use strahler::{GraphStrahler, graph_strahler, strahler};
