use std::sync::Arc;

use pinhole_core::{KvStore, Resolver};

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn Resolver>,
    store: Arc<dyn KvStore>,
    base_url: Arc<str>,
}

impl AppState {
    /// `store` is only used for health probes; all mapping traffic goes
    /// through `resolver`.
    pub fn new(
        resolver: Arc<dyn Resolver>,
        store: Arc<dyn KvStore>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            store,
            base_url: Arc::from(public_base_url.into()),
        }
    }

    pub fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
