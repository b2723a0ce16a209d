//! External collaborators shared with background tasks

use std::sync::Arc;

/// Store, backend and picker used by actions.
///
/// Each is behind an `Arc` so a task can hold its own handle while the
/// engine keeps dispatching.
pub struct Services<S, B, P> {
    pub store: Arc<S>,
    pub backend: Arc<B>,
    pub picker: Arc<P>,
}

impl<S, B, P> Services<S, B, P> {
    pub fn new(store: Arc<S>, backend: Arc<B>, picker: Arc<P>) -> Self {
        Self {
            store,
            backend,
            picker,
        }
    }
}

// Manual impl: the collaborators themselves need not be Clone
impl<S, B, P> Clone for Services<S, B, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            backend: Arc::clone(&self.backend),
            picker: Arc::clone(&self.picker),
        }
    }
}
