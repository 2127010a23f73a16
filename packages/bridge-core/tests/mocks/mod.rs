use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use xcm_bridge_core::stream::BoxStream;
use xcm_bridge_core::{ChainClient, Error, Result, StorageQuery, XcmCall, XcmGeneration};

/// In-memory chain client. Storage values live in watch channels, so every subscriber sees
/// the current value first and each later update.
pub struct MockClient {
    generation: XcmGeneration,
    fee: u128,
    storage: Mutex<HashMap<String, watch::Sender<Value>>>,
    encoded: Mutex<Vec<XcmCall>>,
    fail_encoding: bool,
}

fn storage_key(path: &str, params: &[Value]) -> String {
    format!("{}{}", path, Value::Array(params.to_vec()))
}

impl MockClient {
    pub fn new(generation: XcmGeneration, fee: u128) -> Self {
        Self {
            generation,
            fee,
            storage: Mutex::new(HashMap::new()),
            encoded: Mutex::new(Vec::new()),
            fail_encoding: false,
        }
    }

    pub fn failing_encoder(mut self) -> Self {
        self.fail_encoding = true;
        self
    }

    pub fn set(&self, path: &str, params: Vec<Value>, value: Value) {
        let key = storage_key(path, &params);
        let mut storage = self.storage.lock();
        match storage.get(&key) {
            Some(sender) => {
                sender.send_replace(value);
            }
            None => {
                let (sender, _) = watch::channel(value);
                storage.insert(key, sender);
            }
        }
    }

    pub fn set_native_balance(&self, address: &str, available: u128) {
        self.set(
            "derive.balances.all",
            vec![json!(address)],
            json!({
                "freeBalance": available.to_string(),
                "lockedBalance": "0",
                "reservedBalance": "0",
                "availableBalance": available.to_string(),
            }),
        );
    }

    pub fn encoded_calls(&self) -> Vec<XcmCall> {
        self.encoded.lock().clone()
    }
}

#[async_trait]
impl ChainClient for MockClient {
    async fn ready(&self) -> Result<()> {
        Ok(())
    }

    fn subscribe(&self, query: StorageQuery) -> BoxStream<Result<Value>> {
        let key = storage_key(&query.path, &query.params);
        let mut storage = self.storage.lock();
        let sender = storage.entry(key).or_insert_with(|| watch::channel(Value::Null).0);
        WatchStream::new(sender.subscribe()).map(Ok).boxed()
    }

    async fn xcm_generation(&self) -> Result<XcmGeneration> {
        Ok(self.generation)
    }

    async fn encode_call(&self, call: &XcmCall) -> Result<Vec<u8>> {
        if self.fail_encoding {
            return Err(Error::Chain("metadata mismatch".into()));
        }
        self.encoded.lock().push(call.clone());
        let json = serde_json::to_vec(call).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(json)
    }

    async fn estimate_fee(&self, _call: &XcmCall, _signer: &str) -> Result<u128> {
        Ok(self.fee)
    }
}

pub fn shared(client: MockClient) -> Arc<MockClient> {
    Arc::new(client)
}
