//! Asset hubs: native token teleports to the relay chain, `pallet-assets` tokens reserve
//! transferred to parachains.

use super::{AdapterBase, CrossChainAdapter};
use crate::xcm::builder::pallet_xcm_call;
use crate::xcm::{Location, TransferContext, XcmCall, XcmPallet};
use crate::{Error, Result};

pub struct StatemintAdapter {
    base: AdapterBase,
}

impl StatemintAdapter {
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }
}

impl CrossChainAdapter for StatemintAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn build_call(&self, ctx: &TransferContext<'_>) -> Result<XcmCall> {
        // only the relay token goes back to the relay chain
        if ctx.destination.is_relay() && !ctx.is_native() {
            return Err(Error::TokenNotFound {
                chain: ctx.origin.id.clone(),
                token: ctx.token.symbol.clone(),
            });
        }
        // the native token is the relay token, reserved one level up
        pallet_xcm_call(ctx, XcmPallet::PolkadotXcm, Location::parent())
    }
}
