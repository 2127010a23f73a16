use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::chain_adapter::{create_adapter, CrossChainAdapter};
use crate::client::ChainClient;
use crate::config::Registry;
use crate::router::Router;
use crate::{Error, Result};

/// Registered adapters and the router over their routes.
pub struct Bridge {
    adapters: BTreeMap<String, Arc<dyn CrossChainAdapter>>,
    router: Router,
}

impl Bridge {
    pub fn new(adapters: Vec<Arc<dyn CrossChainAdapter>>) -> Self {
        let router = Router::new(adapters.iter().map(|adapter| adapter.routes()));
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.chain().id.clone(), adapter))
            .collect::<BTreeMap<_, _>>();
        info!(chains = adapters.len(), "bridge ready");
        Self { adapters, router }
    }

    /// One adapter for every chain in `registry`.
    pub fn from_registry(registry: Arc<Registry>) -> Result<Self> {
        let chains: Vec<String> = registry.chains().map(|chain| chain.id.clone()).collect();
        Self::with_chains(registry, &chains)
    }

    pub fn with_chains<S: AsRef<str>>(registry: Arc<Registry>, chains: &[S]) -> Result<Self> {
        let adapters = chains
            .iter()
            .map(|chain| create_adapter(registry.clone(), chain.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(adapters))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn adapter(&self, chain: &str) -> Result<Arc<dyn CrossChainAdapter>> {
        self.adapters
            .get(chain)
            .cloned()
            .ok_or_else(|| Error::AdapterNotFound(chain.to_string()))
    }

    pub fn chains(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }

    /// Attaches `client` to the adapter of `chain`.
    pub async fn init(&self, chain: &str, client: Arc<dyn ChainClient>) -> Result<()> {
        self.adapter(chain)?.init(client).await
    }
}
