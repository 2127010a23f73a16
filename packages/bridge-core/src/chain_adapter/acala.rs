use super::{AdapterBase, CrossChainAdapter};
use crate::xcm::builder::xtokens_call;
use crate::xcm::{TransferContext, XcmCall};
use crate::Result;

/// Acala and Karura, orml `xTokens` with enumerated currency ids.
pub struct AcalaAdapter {
    base: AdapterBase,
}

impl AcalaAdapter {
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }
}

impl CrossChainAdapter for AcalaAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn build_call(&self, ctx: &TransferContext<'_>) -> Result<XcmCall> {
        xtokens_call(ctx)
    }
}
