//! Application state shared across handlers

use std::sync::Arc;

use crate::db::Executor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    executor: Arc<dyn Executor>,
}

impl AppState {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { executor }),
        }
    }

    pub fn executor(&self) -> &dyn Executor {
        self.inner.executor.as_ref()
    }
}
