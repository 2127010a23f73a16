use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::amount::{ChainAmount, FixedPoint};
use crate::xcm::WeightLimit;
use crate::{Error, Result};

const BUILTIN_REGISTRY: &str = include_str!("registry.toml");

/// Adapter family serving a chain. Chains of one family share balance storage layout and
/// xcm call shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
    Relay,
    Acala,
    Hydradx,
    Statemint,
    Tinkernet,
    Robonomics,
    Subsocial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: String,
    pub display: String,
    pub ss58_prefix: u16,
    /// `None` for a relay chain.
    #[serde(default)]
    pub para_chain_id: Option<u32>,
    pub native_token: String,
    pub family: ChainFamily,
}

impl Chain {
    pub fn is_relay(&self) -> bool {
        self.para_chain_id.is_none()
    }
}

/// Currency ids of chains that enumerate their currencies instead of indexing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyId {
    Token(String),
    ForeignAsset(u16),
    Erc20(String),
    StableAssetPoolToken(u32),
    LiquidCrowdloan(u32),
}

/// Chain specific encoding of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawToken {
    Index(u32),
    Currency(CurrencyId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub symbol: String,
    pub decimals: u8,
    /// Existential deposit in the smallest unit.
    pub ed: u128,
    pub raw: Option<RawToken>,
}

impl Token {
    pub fn ed(&self) -> FixedPoint {
        FixedPoint::from_inner(self.ed, self.decimals)
    }

    pub fn amount(&self, inner: u128) -> FixedPoint {
        FixedPoint::from_inner(inner, self.decimals)
    }

    pub fn asset_index(&self) -> Option<u32> {
        match self.raw {
            Some(RawToken::Index(index)) => Some(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFee {
    pub token: String,
    pub amount: ChainAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub from: String,
    pub to: String,
    pub token: String,
    pub fee: RouteFee,
    #[serde(default)]
    pub weight_limit: WeightLimit,
}

impl Route {
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.from, &self.to, &self.token)
    }
}

#[derive(Debug, Deserialize)]
struct TokenConfig {
    decimals: u8,
    ed: ChainAmount,
    #[serde(default)]
    raw: Option<RawToken>,
}

#[derive(Debug, Deserialize)]
struct RegistryConfig {
    chains: Vec<Chain>,
    #[serde(default)]
    tokens: BTreeMap<String, BTreeMap<String, TokenConfig>>,
    #[serde(default)]
    routes: Vec<Route>,
}

/// Chains, per-chain token tables and routes. Built once, shared read-only.
#[derive(Debug, Clone)]
pub struct Registry {
    chains: BTreeMap<String, Chain>,
    tokens: BTreeMap<String, BTreeMap<String, Token>>,
    routes: Vec<Route>,
}

impl Registry {
    /// The chain, token and route tables shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_REGISTRY)
    }

    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        info!("Loading chain registry from {}", path.display());
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&config_str),
            _ => Self::from_toml(&config_str),
        }
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: RegistryConfig = toml::from_str(config_str)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        Self::from_config(config)
    }

    pub fn from_json(config_str: &str) -> Result<Self> {
        let config: RegistryConfig = serde_json::from_str(config_str)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        Self::from_config(config)
    }

    fn from_config(config: RegistryConfig) -> Result<Self> {
        let mut chains = BTreeMap::new();
        for chain in config.chains {
            if chains.contains_key(&chain.id) {
                return Err(Error::Config(format!("Duplicate chain: {}", chain.id)));
            }
            chains.insert(chain.id.clone(), chain);
        }

        let tokens = config
            .tokens
            .into_iter()
            .map(|(chain, table)| {
                let table = table
                    .into_iter()
                    .map(|(symbol, token)| {
                        let token = Token {
                            symbol: symbol.clone(),
                            decimals: token.decimals,
                            ed: token.ed.0,
                            raw: token.raw,
                        };
                        (symbol, token)
                    })
                    .collect();
                (chain, table)
            })
            .collect();

        let registry = Self { chains, tokens, routes: config.routes };
        registry.validate()?;
        debug!(
            chains = registry.chains.len(),
            routes = registry.routes.len(),
            "chain registry loaded"
        );
        Ok(registry)
    }

    fn validate(&self) -> Result<()> {
        for chain in self.chains.values() {
            if self.token(&chain.id, &chain.native_token).is_none() {
                return Err(Error::Config(format!(
                    "Native token {} missing from the token table of {}",
                    chain.native_token, chain.id
                )));
            }
            if (chain.family == ChainFamily::Relay) != chain.is_relay() {
                return Err(Error::Config(format!(
                    "Chain {} must have a parachain id unless it is a relay chain",
                    chain.id
                )));
            }
        }

        for chain in self.tokens.keys() {
            if !self.chains.contains_key(chain) {
                return Err(Error::Config(format!("Token table for unknown chain: {}", chain)));
            }
        }

        let mut seen = HashSet::new();
        for route in &self.routes {
            for chain in [&route.from, &route.to] {
                if !self.chains.contains_key(chain) {
                    return Err(Error::Config(format!("Invalid chain ID in route: {}", chain)));
                }
            }
            if route.from == route.to {
                return Err(Error::Config(format!("Route from {} to itself", route.from)));
            }
            if self.token(&route.from, &route.token).is_none() {
                return Err(Error::Config(format!(
                    "Route token {} is not registered on origin {}",
                    route.token, route.from
                )));
            }
            if self.token(&route.to, &route.token).is_none() {
                return Err(Error::Config(format!(
                    "Route token {} is not registered on destination {}",
                    route.token, route.to
                )));
            }
            if self.token(&route.to, &route.fee.token).is_none() {
                return Err(Error::Config(format!(
                    "Fee token {} is not registered on destination {}",
                    route.fee.token, route.to
                )));
            }
            if !seen.insert(route.key()) {
                return Err(Error::Config(format!(
                    "Duplicate route {} -> {} for {}",
                    route.from, route.to, route.token
                )));
            }
        }

        Ok(())
    }

    pub fn chain(&self, chain_id: &str) -> Option<&Chain> {
        self.chains.get(chain_id)
    }

    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.chains.values()
    }

    pub fn token(&self, chain_id: &str, symbol: &str) -> Option<&Token> {
        self.tokens.get(chain_id).and_then(|table| table.get(symbol))
    }

    pub fn tokens(&self, chain_id: &str) -> impl Iterator<Item = &Token> {
        self.tokens.get(chain_id).into_iter().flat_map(|table| table.values())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_from<'a>(&'a self, chain_id: &'a str) -> impl Iterator<Item = &'a Route> + 'a {
        self.routes.iter().filter(move |route| route.from == chain_id)
    }
}
