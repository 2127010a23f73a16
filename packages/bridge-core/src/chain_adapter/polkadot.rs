//! Relay chains: `xcmPallet` transfers down to their parachains.

use super::{AdapterBase, CrossChainAdapter};
use crate::xcm::builder::pallet_xcm_call;
use crate::xcm::{Location, TransferContext, XcmCall, XcmPallet};
use crate::Result;

pub struct RelayAdapter {
    base: AdapterBase,
}

impl RelayAdapter {
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }
}

impl CrossChainAdapter for RelayAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn build_call(&self, ctx: &TransferContext<'_>) -> Result<XcmCall> {
        pallet_xcm_call(ctx, XcmPallet::XcmPallet, Location::here())
    }
}
