//! The chain client capability the adapters run on.
//!
//! Connection management, SCALE encoding and fee estimation belong to the client; the
//! adapters only describe what to read and which call to build.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stream::BoxStream;
use crate::xcm::{XcmCall, XcmGeneration};
use crate::Result;

/// A live storage or derive query, e.g. `query.tokens.accounts` with `[address, currency]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageQuery {
    pub path: String,
    pub params: Vec<Value>,
}

impl StorageQuery {
    pub fn new(path: impl Into<String>, params: Vec<Value>) -> Self {
        Self { path: path.into(), params }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Resolves once the connection and runtime metadata are available.
    async fn ready(&self) -> Result<()>;

    /// Subscribes to `query`; every item is the decoded JSON value of the latest block.
    fn subscribe(&self, query: StorageQuery) -> BoxStream<Result<Value>>;

    /// Probes the runtime metadata for the xcm type generation it declares.
    async fn xcm_generation(&self) -> Result<XcmGeneration>;

    /// SCALE encodes `call` against the runtime metadata.
    async fn encode_call(&self, call: &XcmCall) -> Result<Vec<u8>>;

    /// Partial fee of `call` signed by `signer`, in native token units.
    async fn estimate_fee(&self, call: &XcmCall, signer: &str) -> Result<u128>;
}
