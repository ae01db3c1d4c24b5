//! Shared-ownership graph handles.
//!
//! `share()` is the aliasing form of copy: both handles address the same storage and mutation
//! through either is visible through the other. `deep_copy()` forks the storage instead.
//! Pass-through consumers that must observe upstream mutation hold a shared handle rather than
//! cloning topology.

use crate::Graph;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

#[derive(Debug)]
pub struct SharedGraph<N, E> {
    inner: Rc<RefCell<Graph<N, E>>>,
}

impl<N: Default, E: Default> Default for SharedGraph<N, E> {
    fn default() -> Self {
        Self::new(Graph::new())
    }
}

impl<N, E> SharedGraph<N, E> {
    pub fn new(graph: Graph<N, E>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(graph)),
        }
    }

    /// Another handle over the same storage.
    pub fn share(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn borrow(&self) -> Ref<'_, Graph<N, E>> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Graph<N, E>> {
        self.inner.borrow_mut()
    }

    /// Number of live handles over this storage.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }
}

impl<N: Default + Clone, E: Default + Clone> SharedGraph<N, E> {
    /// An independent handle over duplicated storage.
    pub fn deep_copy(&self) -> Self {
        Self::new(self.inner.borrow().deep_copy())
    }

    /// Unwraps into an owned graph, cloning when other handles are still alive.
    pub fn into_graph(self) -> Graph<N, E> {
        match Rc::try_unwrap(self.inner) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().deep_copy(),
        }
    }
}

impl<N, E> Clone for SharedGraph<N, E> {
    fn clone(&self) -> Self {
        self.share()
    }
}
