pub mod address;
pub mod amount;
pub mod balance;
pub mod bounds;
pub mod bridge;
pub mod chain_adapter;
pub mod client;
pub mod config;
pub mod router;
pub mod stream;
pub mod types;
pub mod xcm;

pub use amount::FixedPoint;
pub use bridge::Bridge;
pub use chain_adapter::{create_adapter, CrossChainAdapter};
pub use client::{ChainClient, StorageQuery};
pub use config::{Chain, ChainFamily, Registry, Route, Token};
pub use router::{RouteFilter, RouteTable, Router};
pub use types::{BalanceData, InputConfigs, TokenAmount, TransactionDescriptor, TransferParams};
pub use xcm::{TransferKind, XcmCall, XcmGeneration};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Api not ready for chain {0}")]
    ApiNotFound(String),

    #[error("Token {token} not found on {chain}")]
    TokenNotFound { chain: String, token: String },

    #[error("Currency {token} not found on {chain}")]
    CurrencyNotFound { chain: String, token: String },

    #[error("No route from {from} to {to} for {token}")]
    RouteNotFound { from: String, to: String, token: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unsupported transfer: {0}")]
    UnsupportedTransfer(String),

    #[error("No adapter registered for chain {0}")]
    AdapterNotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Chain error: {0}")]
    Chain(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
