use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::address::{self, AccountId32};
use crate::amount::FixedPoint;
use crate::balance::{balance_adapter_for, token_error, BalanceAdapter};
use crate::bounds::{self, FeeFactor};
use crate::client::ChainClient;
use crate::config::{Chain, ChainFamily, CurrencyId, RawToken, Registry, Token};
use crate::router::RouteTable;
use crate::stream::{self, combine_latest, BoxStream};
use crate::types::{BalanceData, InputConfigs, TokenAmount, TransactionDescriptor, TransferParams};
use crate::xcm::builder::currency_of;
use crate::xcm::{TransferContext, WeightLimit, XcmCall, XcmGeneration};
use crate::{Error, Result};

pub mod acala;
pub mod hydradx;
pub mod polkadot;
pub mod robonomics;
pub mod statemint;
pub mod subsocial;
pub mod tinkernet;

pub use acala::AcalaAdapter;
pub use hydradx::HydradxAdapter;
pub use polkadot::RelayAdapter;
pub use robonomics::RobonomicsAdapter;
pub use statemint::StatemintAdapter;
pub use subsocial::SubsocialAdapter;
pub use tinkernet::TinkernetAdapter;

/// Client handle and balance adapter attached by [`CrossChainAdapter::init`].
#[derive(Clone)]
pub struct Api {
    pub client: Arc<dyn ChainClient>,
    pub balance: Arc<dyn BalanceAdapter>,
}

/// State shared by every adapter: its chain, the registry and its slice of the routes.
pub struct AdapterBase {
    chain: Chain,
    registry: Arc<Registry>,
    routes: RouteTable,
    api: RwLock<Option<Api>>,
}

impl AdapterBase {
    pub fn new(registry: Arc<Registry>, chain_id: &str) -> Result<Self> {
        let chain = registry
            .chain(chain_id)
            .cloned()
            .ok_or_else(|| Error::AdapterNotFound(chain_id.to_string()))?;
        let routes = RouteTable::new(registry.routes_from(chain_id).cloned());
        Ok(Self { chain, registry, routes, api: RwLock::new(None) })
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The attached api, or `ApiNotFound` before `init` completed.
    pub fn api(&self) -> Result<Api> {
        self.api.read().clone().ok_or_else(|| Error::ApiNotFound(self.chain.id.clone()))
    }

    fn attach(&self, client: Arc<dyn ChainClient>) {
        let balance = balance_adapter_for(&self.chain, &self.registry, client.clone());
        *self.api.write() = Some(Api { client, balance });
    }

    pub fn token(&self, symbol: &str) -> Result<&Token> {
        self.registry
            .token(&self.chain.id, symbol)
            .ok_or_else(|| token_error(&self.chain, symbol))
    }

    /// The chain `token` is sent to.
    pub fn destination(&self, chain_id: &str, token: &str) -> Result<&Chain> {
        self.registry.chain(chain_id).ok_or_else(|| Error::RouteNotFound {
            from: self.chain.id.clone(),
            to: chain_id.to_string(),
            token: token.to_string(),
        })
    }

    /// Resolves everything the call builder needs for a transfer of `token` to `to`.
    pub fn context(
        &self,
        token: &str,
        to: &str,
        amount: u128,
        beneficiary: AccountId32,
        generation: XcmGeneration,
    ) -> Result<TransferContext<'_>> {
        let origin_token = self.token(token)?;
        let route = self.routes.route_for(&self.chain.id, to, token)?;
        let destination = self.destination(to, token)?;
        let dest_token = self.registry.token(to, token).ok_or_else(|| Error::TokenNotFound {
            chain: to.to_string(),
            token: token.to_string(),
        })?;
        let fee_currency = self
            .registry
            .token(&self.chain.id, &route.fee.token)
            .map(currency_of)
            .unwrap_or_else(|| RawToken::Currency(CurrencyId::Token(route.fee.token.clone())));

        Ok(TransferContext {
            origin: &self.chain,
            destination,
            token: origin_token,
            dest_token,
            route,
            fee_currency,
            amount,
            beneficiary,
            generation,
        })
    }
}

/// One chain's view of cross-chain transfers.
///
/// Implementors supply the family specific call shape, everything else is shared.
#[async_trait]
pub trait CrossChainAdapter: Send + Sync {
    fn base(&self) -> &AdapterBase;

    /// Builds the xcm call for a validated transfer.
    fn build_call(&self, ctx: &TransferContext<'_>) -> Result<XcmCall>;

    fn chain(&self) -> &Chain {
        self.base().chain()
    }

    fn routes(&self) -> &RouteTable {
        self.base().routes()
    }

    /// Waits for `client` to be ready and attaches it. A later call replaces the client for
    /// subsequent operations; streams already handed out keep the one they started with.
    async fn init(&self, client: Arc<dyn ChainClient>) -> Result<()> {
        client.ready().await?;
        self.base().attach(client);
        info!(chain = %self.chain().id, "chain client attached");
        Ok(())
    }

    fn native_token(&self) -> Result<Token> {
        self.base().token(&self.chain().native_token).cloned()
    }

    fn token(&self, symbol: &str) -> Result<Token> {
        self.base().token(symbol).cloned()
    }

    /// Fee charged on `to`, in the route's fee token.
    fn cross_chain_fee(&self, token: &str, to: &str) -> Result<TokenAmount> {
        let route = self.routes().route_for(&self.chain().id, to, token)?;
        let fee_token = self.base().registry().token(to, &route.fee.token).ok_or_else(|| {
            Error::TokenNotFound { chain: to.to_string(), token: route.fee.token.clone() }
        })?;
        Ok(TokenAmount { token: fee_token.symbol.clone(), amount: fee_token.amount(route.fee.amount.0) })
    }

    fn dest_weight(&self, token: &str, to: &str) -> Result<WeightLimit> {
        Ok(self.routes().route_for(&self.chain().id, to, token)?.weight_limit)
    }

    /// Existential deposit of `token` on `to`.
    fn dest_ed(&self, token: &str, to: &str) -> Result<FixedPoint> {
        self.routes().route_for(&self.chain().id, to, token)?;
        self.base()
            .registry()
            .token(to, token)
            .map(Token::ed)
            .ok_or_else(|| Error::TokenNotFound { chain: to.to_string(), token: token.to_string() })
    }

    /// Live balance of `token`. Read failures are logged and reported as a zero balance.
    fn subscribe_token_balance(&self, token: &str, address: &str) -> Result<BoxStream<BalanceData>> {
        let api = self.base().api()?;
        let decimals = self.token(token)?.decimals;
        let chain = self.chain().id.clone();
        let balances = api.balance.subscribe_balance(token, address)?;
        Ok(balances
            .map(move |balance| match balance {
                Ok(balance) => balance,
                Err(e) => {
                    warn!(chain = %chain, error = %e, "balance query failed");
                    BalanceData::zero(decimals)
                }
            })
            .boxed())
    }

    /// Origin fee of the transfer, in native token units, estimated on a zero amount draft.
    async fn estimate_tx_fee(&self, params: &TransferParams) -> Result<u128> {
        let api = self.base().api()?;
        let (beneficiary, _) = address::decode(&params.address)?;
        let generation = api.client.xcm_generation().await?;
        let call = {
            let ctx = self.base().context(&params.token, &params.to, 0, beneficiary, generation)?;
            self.build_call(&ctx)?
        };
        let fee = api.client.estimate_fee(&call, &params.signer).await?;
        debug!(chain = %self.chain().id, to = %params.to, token = %params.token, fee, "estimated tx fee");
        Ok(fee)
    }

    fn subscribe_min_input(&self, token: &str, to: &str) -> Result<BoxStream<FixedPoint>> {
        self.base().api()?;
        let dest_ed = self.dest_ed(token, to)?;
        let dest_fee = self.cross_chain_fee(token, to)?;
        Ok(stream::once(bounds::min_input(token, &dest_ed, &dest_fee)))
    }

    /// Largest amount `address` can send, following its live balance.
    async fn subscribe_max_input(
        &self,
        token: &str,
        address: &str,
        to: &str,
    ) -> Result<BoxStream<FixedPoint>> {
        self.base().api()?;
        let dest_ed = self.dest_ed(token, to)?;
        let native = self.native_token()?;
        let balance = self.subscribe_token_balance(token, address)?;
        let fee = if token == native.symbol {
            self.estimate_tx_fee(&draft_params(token, address, to, native.decimals)).await?
        } else {
            0
        };
        Ok(max_input_stream(balance, native.amount(fee), dest_ed))
    }

    /// Fee estimate, min and max input of one transfer in a single quote.
    async fn subscribe_input_configs(
        &self,
        token: &str,
        address: &str,
        to: &str,
    ) -> Result<BoxStream<InputConfigs>> {
        self.base().api()?;
        let dest_ed = self.dest_ed(token, to)?;
        let dest_fee = self.cross_chain_fee(token, to)?;
        let ss58_prefix = self.base().destination(to, token)?.ss58_prefix;
        let native = self.native_token()?;
        let balance = self.subscribe_token_balance(token, address)?;
        let estimate_fee =
            self.estimate_tx_fee(&draft_params(token, address, to, native.decimals)).await?;

        let min_input = bounds::min_input(token, &dest_ed, &dest_fee);
        let origin_fee = if token == native.symbol {
            native.amount(estimate_fee)
        } else {
            FixedPoint::zero(native.decimals)
        };
        Ok(max_input_stream(balance, origin_fee, dest_ed)
            .map(move |max_input| InputConfigs {
                estimate_fee,
                min_input: min_input.clone(),
                max_input,
                ss58_prefix,
                dest_fee: dest_fee.clone(),
            })
            .boxed())
    }

    /// Validates `params` and builds the encoded transfer.
    async fn create_tx(&self, params: &TransferParams) -> Result<TransactionDescriptor> {
        let api = self.base().api()?;
        let token = self.base().token(&params.token)?;
        self.routes().route_for(&self.chain().id, &params.to, &params.token)?;
        let destination = self.base().destination(&params.to, &params.token)?;
        let beneficiary = address::decode_for(destination, &params.address)?;
        if params.amount.is_negative() || params.amount.is_zero() {
            return Err(Error::InvalidAmount(format!("{} must be positive", params.amount)));
        }
        let amount = params.amount.to_chain_data(token.decimals)?;

        let generation = api.client.xcm_generation().await?;
        let call = {
            let ctx = self.base().context(&params.token, &params.to, amount, beneficiary, generation)?;
            self.build_call(&ctx)?
        };
        let encoded = api.client.encode_call(&call).await?;
        info!(
            chain = %self.chain().id,
            to = %params.to,
            token = %params.token,
            pallet = call.pallet(),
            method = call.method(),
            "created transfer"
        );
        Ok(TransactionDescriptor { chain: self.chain().id.clone(), call, encoded })
    }
}

fn draft_params(token: &str, address: &str, to: &str, decimals: u8) -> TransferParams {
    TransferParams {
        to: to.to_string(),
        token: token.to_string(),
        amount: FixedPoint::zero(decimals),
        address: address.to_string(),
        signer: address.to_string(),
    }
}

fn max_input_stream(
    balance: BoxStream<BalanceData>,
    origin_fee: FixedPoint,
    dest_ed: FixedPoint,
) -> BoxStream<FixedPoint> {
    combine_latest(balance, stream::once(origin_fee))
        .map(move |(balance, fee)| bounds::max_input(&balance.available, &fee, &dest_ed, FeeFactor::DEFAULT))
        .boxed()
}

/// Creates the adapter serving `chain_id`, picked by the chain's family.
pub fn create_adapter(registry: Arc<Registry>, chain_id: &str) -> Result<Arc<dyn CrossChainAdapter>> {
    let family = registry
        .chain(chain_id)
        .map(|chain| chain.family)
        .ok_or_else(|| Error::AdapterNotFound(chain_id.to_string()))?;
    let base = AdapterBase::new(registry, chain_id)?;
    debug!(chain = %chain_id, ?family, routes = base.routes().len(), "creating adapter");

    let adapter: Arc<dyn CrossChainAdapter> = match family {
        ChainFamily::Relay => Arc::new(RelayAdapter::new(base)),
        ChainFamily::Acala => Arc::new(AcalaAdapter::new(base)),
        ChainFamily::Hydradx => Arc::new(HydradxAdapter::new(base)),
        ChainFamily::Statemint => Arc::new(StatemintAdapter::new(base)),
        ChainFamily::Tinkernet => Arc::new(TinkernetAdapter::new(base)),
        ChainFamily::Robonomics => Arc::new(RobonomicsAdapter::new(base)),
        ChainFamily::Subsocial => Arc::new(SubsocialAdapter::new(base)),
    };
    Ok(adapter)
}
