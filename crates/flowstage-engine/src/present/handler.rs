//! Node selection callback.

use std::fmt;
use std::sync::Arc;

use crate::step::StepId;

/// Callback invoked with the step ID when a node is interacted with.
///
/// The hosting application typically opens an edit form for that step.
#[derive(Clone)]
pub struct SelectHandler(Arc<dyn Fn(&StepId) + Send + Sync>);

impl SelectHandler {
    /// Wraps a callback.
    pub fn new(callback: impl Fn(&StepId) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Returns a handler that ignores every event.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Invokes the callback.
    #[inline]
    pub fn call(&self, id: &StepId) {
        (self.0)(id)
    }
}

impl Default for SelectHandler {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for SelectHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SelectHandler").finish_non_exhaustive()
    }
}
