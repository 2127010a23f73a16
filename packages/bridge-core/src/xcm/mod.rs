//! Structured xcm call descriptors.
//!
//! These types mirror the argument shapes `polkadotXcm` / `xcmPallet` and orml `xTokens`
//! accept in their versioned wrappers. They serialize to the JSON form chain clients take
//! as call arguments; the SCALE encoding is left to the client.

use serde::{Deserialize, Serialize};

use crate::config::RawToken;

pub mod builder;

pub use builder::{classify_destination, select_transfer_kind, Destination, TransferContext};

/// Which generation of xcm types the runtime of the origin chain still declares.
///
/// `Legacy` runtimes keep the `V0` variant in `XcmVersionedMultiLocation`; they take V0/V1
/// shaped arguments and a numeric weight limit. `Current` runtimes take V3 arguments and an
/// unlimited weight limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XcmGeneration {
    Legacy,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkId {
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Junction {
    /// Only meaningful inside a V0 location, later versions count parents separately.
    Parent,
    Parachain(u32),
    AccountId32 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        network: Option<NetworkId>,
        id: String,
    },
    PalletInstance(u8),
    GeneralIndex(u128),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Junctions {
    Here,
    X1(Junction),
    X2(Junction, Junction),
    X3(Junction, Junction, Junction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub parents: u8,
    pub interior: Junctions,
}

impl Location {
    pub fn new(parents: u8, interior: Junctions) -> Self {
        Self { parents, interior }
    }

    pub fn here() -> Self {
        Self::new(0, Junctions::Here)
    }

    pub fn parent() -> Self {
        Self::new(1, Junctions::Here)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetId {
    Concrete(Location),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fungibility {
    Fungible(u128),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAsset {
    pub id: AssetId,
    pub fun: Fungibility,
}

impl MultiAsset {
    pub fn concrete(location: Location, amount: u128) -> Self {
        Self { id: AssetId::Concrete(location), fun: Fungibility::Fungible(amount) }
    }
}

/// V0 asset, identified by junctions relative to the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiAssetV0 {
    ConcreteFungible { id: Junctions, amount: u128 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionedLocation {
    V0(Junctions),
    V1(Location),
    V3(Location),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionedAssets {
    V0(Vec<MultiAssetV0>),
    V1(Vec<MultiAsset>),
    V3(Vec<MultiAsset>),
}

impl VersionedAssets {
    pub fn len(&self) -> usize {
        match self {
            VersionedAssets::V0(assets) => assets.len(),
            VersionedAssets::V1(assets) | VersionedAssets::V3(assets) => assets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionedAsset {
    V1(MultiAsset),
    V3(MultiAsset),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightLimit {
    #[default]
    Unlimited,
    Limited(u64),
}

/// The pallet carrying xcm transfers on relay chains (`xcmPallet`) and on
/// parachains (`polkadotXcm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XcmPallet {
    XcmPallet,
    PolkadotXcm,
}

impl XcmPallet {
    pub fn name(&self) -> &'static str {
        match self {
            XcmPallet::XcmPallet => "xcmPallet",
            XcmPallet::PolkadotXcm => "polkadotXcm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Trusted burn on the origin, mint on the destination.
    Teleport,
    /// The origin keeps the asset in reserve, the destination mints a derivative.
    ReserveTransfer,
    /// Reserve transfer carrying the principal and a separate fee asset.
    MultiCurrency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum XcmCall {
    LimitedTeleportAssets {
        pallet: XcmPallet,
        dest: VersionedLocation,
        beneficiary: VersionedLocation,
        assets: VersionedAssets,
        fee_asset_item: u32,
        weight_limit: WeightLimit,
    },
    LimitedReserveTransferAssets {
        pallet: XcmPallet,
        dest: VersionedLocation,
        beneficiary: VersionedLocation,
        assets: VersionedAssets,
        fee_asset_item: u32,
        weight_limit: WeightLimit,
    },
    /// `xTokens.transfer`
    Transfer {
        currency_id: RawToken,
        amount: u128,
        dest: VersionedLocation,
        dest_weight_limit: WeightLimit,
    },
    /// `xTokens.transferMultiasset`
    TransferMultiasset {
        asset: VersionedAsset,
        dest: VersionedLocation,
        dest_weight_limit: WeightLimit,
    },
    /// `xTokens.transferMulticurrencies`
    TransferMulticurrencies {
        currencies: Vec<(RawToken, u128)>,
        fee_item: u32,
        dest: VersionedLocation,
        dest_weight_limit: WeightLimit,
    },
}

impl XcmCall {
    pub fn pallet(&self) -> &'static str {
        match self {
            XcmCall::LimitedTeleportAssets { pallet, .. }
            | XcmCall::LimitedReserveTransferAssets { pallet, .. } => pallet.name(),
            _ => "xTokens",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            XcmCall::LimitedTeleportAssets { .. } => "limitedTeleportAssets",
            XcmCall::LimitedReserveTransferAssets { .. } => "limitedReserveTransferAssets",
            XcmCall::Transfer { .. } => "transfer",
            XcmCall::TransferMultiasset { .. } => "transferMultiasset",
            XcmCall::TransferMulticurrencies { .. } => "transferMulticurrencies",
        }
    }

    pub fn kind(&self) -> TransferKind {
        match self {
            XcmCall::LimitedTeleportAssets { .. } => TransferKind::Teleport,
            XcmCall::TransferMulticurrencies { .. } => TransferKind::MultiCurrency,
            _ => TransferKind::ReserveTransfer,
        }
    }

    /// Number of assets the message moves.
    pub fn asset_count(&self) -> usize {
        match self {
            XcmCall::LimitedTeleportAssets { assets, .. }
            | XcmCall::LimitedReserveTransferAssets { assets, .. } => assets.len(),
            XcmCall::TransferMulticurrencies { currencies, .. } => currencies.len(),
            XcmCall::Transfer { .. } | XcmCall::TransferMultiasset { .. } => 1,
        }
    }

    pub fn weight_limit(&self) -> WeightLimit {
        match self {
            XcmCall::LimitedTeleportAssets { weight_limit, .. }
            | XcmCall::LimitedReserveTransferAssets { weight_limit, .. } => *weight_limit,
            XcmCall::Transfer { dest_weight_limit, .. }
            | XcmCall::TransferMultiasset { dest_weight_limit, .. }
            | XcmCall::TransferMulticurrencies { dest_weight_limit, .. } => *dest_weight_limit,
        }
    }

    pub fn dest(&self) -> &VersionedLocation {
        match self {
            XcmCall::LimitedTeleportAssets { dest, .. }
            | XcmCall::LimitedReserveTransferAssets { dest, .. }
            | XcmCall::Transfer { dest, .. }
            | XcmCall::TransferMultiasset { dest, .. }
            | XcmCall::TransferMulticurrencies { dest, .. } => dest,
        }
    }
}
