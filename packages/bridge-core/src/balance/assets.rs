use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;

use super::{checked_address, record_amount, subscribe_native, BalanceAdapter, TokenMap};
use crate::amount::FixedPoint;
use crate::client::{ChainClient, StorageQuery};
use crate::config::Chain;
use crate::stream::{combine_latest, BoxStream};
use crate::types::BalanceData;
use crate::{Error, Result};

/// Asset hub chains, where non-native tokens are `pallet-assets` entries.
///
/// The account record and the asset metadata are joined, the metadata supplies the
/// decimals the balance is denominated in.
pub struct AssetsBalanceAdapter {
    tokens: TokenMap,
    client: Arc<dyn ChainClient>,
}

impl AssetsBalanceAdapter {
    pub(crate) fn new(tokens: TokenMap, client: Arc<dyn ChainClient>) -> Self {
        Self { tokens, client }
    }
}

impl BalanceAdapter for AssetsBalanceAdapter {
    fn chain(&self) -> &Chain {
        self.tokens.chain()
    }

    fn subscribe_balance(&self, token: &str, address: &str) -> Result<BoxStream<Result<BalanceData>>> {
        let token = self.tokens.get(token)?;
        let address = checked_address(address)?;
        if self.tokens.is_native(&token.symbol) {
            return Ok(subscribe_native(self.client.as_ref(), token, &address));
        }

        let asset_id = token
            .asset_index()
            .ok_or_else(|| super::token_error(self.tokens.chain(), &token.symbol))?;
        let account = self
            .client
            .subscribe(StorageQuery::new("query.assets.account", vec![json!(asset_id), json!(address)]));
        let metadata = self
            .client
            .subscribe(StorageQuery::new("query.assets.metadata", vec![json!(asset_id)]));

        Ok(combine_latest(account, metadata)
            .map(|(account, metadata)| {
                let balance = record_amount(&account?, "balance")?;
                let decimals = metadata_decimals(&metadata?)?;
                Ok(BalanceData::free_only(FixedPoint::from_inner(balance, decimals)))
            })
            .boxed())
    }
}

fn metadata_decimals(metadata: &serde_json::Value) -> Result<u8> {
    metadata
        .get("decimals")
        .and_then(|decimals| decimals.as_u64())
        .and_then(|decimals| u8::try_from(decimals).ok())
        .ok_or_else(|| Error::Serialization(format!("Unexpected asset metadata: {}", metadata)))
}
