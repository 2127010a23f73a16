use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;

use super::{checked_address, record_amount, subscribe_native, BalanceAdapter, TokenMap};
use crate::amount::FixedPoint;
use crate::client::{ChainClient, StorageQuery};
use crate::config::Chain;
use crate::stream::BoxStream;
use crate::types::BalanceData;
use crate::xcm::builder::currency_of;
use crate::Result;

/// Chains keeping non-native tokens in the orml `tokens` pallet.
pub struct TokensBalanceAdapter {
    tokens: TokenMap,
    client: Arc<dyn ChainClient>,
}

impl TokensBalanceAdapter {
    pub(crate) fn new(tokens: TokenMap, client: Arc<dyn ChainClient>) -> Self {
        Self { tokens, client }
    }
}

impl BalanceAdapter for TokensBalanceAdapter {
    fn chain(&self) -> &Chain {
        self.tokens.chain()
    }

    fn subscribe_balance(&self, token: &str, address: &str) -> Result<BoxStream<Result<BalanceData>>> {
        let token = self.tokens.get(token)?;
        let address = checked_address(address)?;
        if self.tokens.is_native(&token.symbol) {
            return Ok(subscribe_native(self.client.as_ref(), token, &address));
        }

        let currency = serde_json::to_value(currency_of(token))
            .map_err(|e| crate::Error::Serialization(e.to_string()))?;
        let query = StorageQuery::new("query.tokens.accounts", vec![json!(address), currency]);
        let decimals = token.decimals;
        Ok(self
            .client
            .subscribe(query)
            .map(move |value| {
                let free = record_amount(&value?, "free")?;
                Ok(BalanceData::free_only(FixedPoint::from_inner(free, decimals)))
            })
            .boxed())
    }
}
