use super::{AdapterBase, CrossChainAdapter};
use crate::xcm::builder::xtokens_call;
use crate::xcm::{TransferContext, XcmCall};
use crate::Result;

pub struct TinkernetAdapter {
    base: AdapterBase,
}

impl TinkernetAdapter {
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }
}

impl CrossChainAdapter for TinkernetAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn build_call(&self, ctx: &TransferContext<'_>) -> Result<XcmCall> {
        xtokens_call(ctx)
    }
}
