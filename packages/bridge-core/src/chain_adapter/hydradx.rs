use super::{AdapterBase, CrossChainAdapter};
use crate::xcm::builder::xtokens_call;
use crate::xcm::{TransferContext, XcmCall};
use crate::{Error, Result};

/// HydraDX and Basilisk, orml `xTokens` with numeric asset ids.
pub struct HydradxAdapter {
    base: AdapterBase,
}

impl HydradxAdapter {
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }
}

impl CrossChainAdapter for HydradxAdapter {
    fn base(&self) -> &AdapterBase {
        &self.base
    }

    fn build_call(&self, ctx: &TransferContext<'_>) -> Result<XcmCall> {
        if ctx.token.asset_index().is_none() {
            return Err(Error::TokenNotFound {
                chain: ctx.origin.id.clone(),
                token: ctx.token.symbol.clone(),
            });
        }
        xtokens_call(ctx)
    }
}
