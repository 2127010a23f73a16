use std::sync::Arc;

use super::{checked_address, subscribe_native, BalanceAdapter, TokenMap};
use crate::client::ChainClient;
use crate::config::Chain;
use crate::stream::BoxStream;
use crate::types::BalanceData;
use crate::Result;

/// Chains whose only transferable token lives in the balances pallet.
pub struct NativeBalanceAdapter {
    tokens: TokenMap,
    client: Arc<dyn ChainClient>,
}

impl NativeBalanceAdapter {
    pub(crate) fn new(tokens: TokenMap, client: Arc<dyn ChainClient>) -> Self {
        Self { tokens, client }
    }
}

impl BalanceAdapter for NativeBalanceAdapter {
    fn chain(&self) -> &Chain {
        self.tokens.chain()
    }

    fn subscribe_balance(&self, token: &str, address: &str) -> Result<BoxStream<Result<BalanceData>>> {
        if !self.tokens.is_native(token) {
            return Err(super::token_error(self.tokens.chain(), token));
        }
        let native = self.tokens.native()?;
        let address = checked_address(address)?;
        Ok(subscribe_native(self.client.as_ref(), native, &address))
    }
}
