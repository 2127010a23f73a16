//! Balance adapters, one per balance storage model.
//!
//! Each adapter turns the chain's own account or asset records into [`BalanceData`].

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::address;
use crate::amount::{ChainAmount, FixedPoint};
use crate::client::{ChainClient, StorageQuery};
use crate::config::{Chain, ChainFamily, Registry, Token};
use crate::stream::BoxStream;
use crate::types::BalanceData;
use crate::{Error, Result};

mod assets;
mod native;
mod tokens;

pub use assets::AssetsBalanceAdapter;
pub use native::NativeBalanceAdapter;
pub use tokens::TokensBalanceAdapter;

pub trait BalanceAdapter: Send + Sync {
    fn chain(&self) -> &Chain;

    /// Live balance of `token` held by `address`.
    ///
    /// Fails up front for tokens the adapter cannot read.
    fn subscribe_balance(&self, token: &str, address: &str) -> Result<BoxStream<Result<BalanceData>>>;
}

/// Builds the balance adapter for the storage model of `chain`.
pub fn balance_adapter_for(
    chain: &Chain,
    registry: &Registry,
    client: Arc<dyn ChainClient>,
) -> Arc<dyn BalanceAdapter> {
    let tokens = TokenMap::new(chain, registry);
    match chain.family {
        ChainFamily::Relay
        | ChainFamily::Tinkernet
        | ChainFamily::Robonomics
        | ChainFamily::Subsocial => Arc::new(NativeBalanceAdapter::new(tokens, client)),
        ChainFamily::Acala | ChainFamily::Hydradx => Arc::new(TokensBalanceAdapter::new(tokens, client)),
        ChainFamily::Statemint => Arc::new(AssetsBalanceAdapter::new(tokens, client)),
    }
}

/// The tokens a chain knows about, with the error its family reports for anything else.
#[derive(Debug, Clone)]
pub(crate) struct TokenMap {
    chain: Chain,
    tokens: BTreeMap<String, Token>,
}

impl TokenMap {
    pub(crate) fn new(chain: &Chain, registry: &Registry) -> Self {
        let tokens = registry
            .tokens(&chain.id)
            .map(|token| (token.symbol.clone(), token.clone()))
            .collect();
        Self { chain: chain.clone(), tokens }
    }

    pub(crate) fn chain(&self) -> &Chain {
        &self.chain
    }

    pub(crate) fn get(&self, symbol: &str) -> Result<&Token> {
        self.tokens.get(symbol).ok_or_else(|| token_error(&self.chain, symbol))
    }

    pub(crate) fn native(&self) -> Result<&Token> {
        self.get(&self.chain.native_token)
    }

    pub(crate) fn is_native(&self, symbol: &str) -> bool {
        self.chain.native_token == symbol
    }
}

/// Native-only families report unknown tokens as unknown currencies.
pub fn token_error(chain: &Chain, token: &str) -> Error {
    match chain.family {
        ChainFamily::Tinkernet | ChainFamily::Robonomics => Error::CurrencyNotFound {
            chain: chain.id.clone(),
            token: token.to_string(),
        },
        _ => Error::TokenNotFound { chain: chain.id.clone(), token: token.to_string() },
    }
}

pub(crate) fn checked_address(address: &str) -> Result<String> {
    address::decode(address)?;
    Ok(address.trim().to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DerivedBalances {
    free_balance: ChainAmount,
    locked_balance: ChainAmount,
    reserved_balance: ChainAmount,
    available_balance: ChainAmount,
}

/// Native balance from `derive.balances.all`.
pub(crate) fn subscribe_native(
    client: &dyn ChainClient,
    token: &Token,
    address: &str,
) -> BoxStream<Result<BalanceData>> {
    let decimals = token.decimals;
    let query = StorageQuery::new("derive.balances.all", vec![json!(address)]);
    client
        .subscribe(query)
        .map(move |value| decode_native(value?, decimals))
        .boxed()
}

pub(crate) fn decode_native(value: Value, decimals: u8) -> Result<BalanceData> {
    let balances: DerivedBalances = serde_json::from_value(value)
        .map_err(|e| Error::Serialization(format!("Failed to decode account balances: {}", e)))?;
    let amount = |raw: ChainAmount| FixedPoint::from_inner(raw.0, decimals);
    Ok(BalanceData {
        free: amount(balances.free_balance),
        locked: amount(balances.locked_balance),
        reserved: amount(balances.reserved_balance),
        available: amount(balances.available_balance),
    })
}

/// Reads a `u128` field from an optional account record, a missing record is zero.
pub(crate) fn record_amount(value: &Value, field: &str) -> Result<u128> {
    match value {
        Value::Null => Ok(0),
        Value::Object(record) => match record.get(field) {
            None | Some(Value::Null) => Ok(0),
            Some(raw) => serde_json::from_value::<ChainAmount>(raw.clone())
                .map(|amount| amount.0)
                .map_err(|e| Error::Serialization(format!("Failed to decode {}: {}", field, e))),
        },
        other => Err(Error::Serialization(format!("Unexpected account record: {}", other))),
    }
}
