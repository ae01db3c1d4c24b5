//! Dense graph container APIs used by `canopy-layout`.
//!
//! Nodes, edges and bend points are addressed by caller-chosen non-negative integer ids.
//! Storage is dense: every element also has a contiguous *slot* (`0..len`) that addresses the
//! position and attribute columns, and an id index is kept in lockstep. Deleting an element
//! compacts its slot by moving the last element into the hole, so slots stay contiguous but are
//! only stable until the next compacting delete.

use std::fmt;

mod graph;
mod id_index;
mod indexed_set;
mod shared;

pub use graph::{Graph, Position};
pub use id_index::IdIndex;
pub use indexed_set::IndexedSet;
pub use shared::SharedGraph;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no such node: {0}")]
    NoSuchNode(NodeId),

    #[error("no such edge: {0}")]
    NoSuchEdge(EdgeId),

    #[error("no such bend point: {0}")]
    NoSuchBend(BendId),

    #[error("no element with id {0}")]
    NoSuchId(usize),

    #[error("id {0} is already in use")]
    DuplicateId(usize),

    #[error("index capacity must be non-zero")]
    InvalidCapacity,
}

/// Caller-visible node identifier. Not necessarily contiguous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Caller-visible edge identifier. Not necessarily contiguous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Identifier of a bend point on an edge path. Bend points are position-only entities owned by
/// their edge; they are not graph nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BendId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl fmt::Display for BendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}
