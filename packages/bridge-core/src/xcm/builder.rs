//! Builds the xcm call for one transfer.
//!
//! Every build is a pure function of the [`TransferContext`]: the destination is
//! classified, a transfer kind is picked for the chain pair, and the locations and assets
//! are rendered in the wire version the origin runtime takes.

use tracing::debug;

use super::{
    Junction, Junctions, Location, MultiAsset, MultiAssetV0, NetworkId, TransferKind,
    VersionedAsset, VersionedAssets, VersionedLocation, WeightLimit, XcmCall, XcmGeneration,
    XcmPallet,
};
use crate::address::{self, AccountId32};
use crate::config::{Chain, ChainFamily, CurrencyId, RawToken, Route, Token};
use crate::{Error, Result};

/// Pallet index of `pallet-assets` on the asset hub chains.
pub const ASSETS_PALLET_INSTANCE: u8 = 50;

/// Everything the builder needs for one transfer, already validated by the adapter.
#[derive(Debug, Clone)]
pub struct TransferContext<'a> {
    pub origin: &'a Chain,
    pub destination: &'a Chain,
    /// The transferred token as registered on the origin.
    pub token: &'a Token,
    /// The transferred token as registered on the destination.
    pub dest_token: &'a Token,
    pub route: &'a Route,
    /// Origin-side encoding of the route's fee token.
    pub fee_currency: RawToken,
    pub amount: u128,
    pub beneficiary: AccountId32,
    pub generation: XcmGeneration,
}

impl TransferContext<'_> {
    pub fn is_native(&self) -> bool {
        self.token.symbol == self.origin.native_token
    }

    fn weight_limit(&self) -> WeightLimit {
        match self.generation {
            XcmGeneration::Legacy => self.route.weight_limit,
            XcmGeneration::Current => WeightLimit::Unlimited,
        }
    }

    fn account(&self) -> Junction {
        Junction::AccountId32 { network: None, id: address::to_hex(&self.beneficiary) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    RelayChain,
    /// An asset hub receiving a token it indexes in `pallet-assets`.
    AssetHub { para_id: u32, asset_index: u32 },
    Sibling(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireVersion {
    V0,
    V1,
    V3,
}

pub fn classify_destination(ctx: &TransferContext<'_>) -> Destination {
    match ctx.destination.para_chain_id {
        None => Destination::RelayChain,
        Some(para_id) => match (ctx.destination.family, ctx.dest_token.asset_index()) {
            (ChainFamily::Statemint, Some(asset_index)) => {
                Destination::AssetHub { para_id, asset_index }
            }
            _ => Destination::Sibling(para_id),
        },
    }
}

/// Teleports move the native token between the relay chain and its asset hub, multi
/// currency transfers carry a fee asset different from the transferred one, anything else
/// is a reserve transfer.
pub fn select_transfer_kind(ctx: &TransferContext<'_>) -> TransferKind {
    let to_relay = classify_destination(ctx) == Destination::RelayChain;
    let relay_to_asset_hub =
        ctx.origin.is_relay() && ctx.destination.family == ChainFamily::Statemint;

    if ctx.is_native() && (to_relay || relay_to_asset_hub) {
        TransferKind::Teleport
    } else if ctx.route.fee.token != ctx.route.token {
        TransferKind::MultiCurrency
    } else {
        TransferKind::ReserveTransfer
    }
}

/// `limitedTeleportAssets` / `limitedReserveTransferAssets` on `xcmPallet` or `polkadotXcm`.
///
/// `native_asset` is the origin-relative location of the origin's native token.
pub fn pallet_xcm_call(
    ctx: &TransferContext<'_>,
    pallet: XcmPallet,
    native_asset: Location,
) -> Result<XcmCall> {
    let kind = select_transfer_kind(ctx);
    let version = match (ctx.generation, kind) {
        (XcmGeneration::Current, _) => WireVersion::V3,
        (XcmGeneration::Legacy, TransferKind::Teleport) => WireVersion::V1,
        (XcmGeneration::Legacy, _) => WireVersion::V0,
    };
    debug!(
        from = %ctx.origin.id,
        to = %ctx.destination.id,
        token = %ctx.token.symbol,
        ?kind,
        ?version,
        "building {} call",
        pallet.name()
    );

    let parents = if ctx.origin.is_relay() { 0 } else { 1 };
    let dest = match classify_destination(ctx) {
        Destination::RelayChain => Location::new(parents, Junctions::Here),
        Destination::AssetHub { para_id, .. } | Destination::Sibling(para_id) => {
            Location::new(parents, Junctions::X1(Junction::Parachain(para_id)))
        }
    };
    let beneficiary = Location::new(0, Junctions::X1(ctx.account()));

    let asset_location = if ctx.is_native() {
        native_asset
    } else if let Some(index) = ctx.token.asset_index() {
        Location::new(
            0,
            Junctions::X2(
                Junction::PalletInstance(ASSETS_PALLET_INSTANCE),
                Junction::GeneralIndex(index as u128),
            ),
        )
    } else {
        return Err(Error::UnsupportedTransfer(format!(
            "{} has no asset location on {}",
            ctx.token.symbol, ctx.origin.id
        )));
    };
    let assets = vec![MultiAsset::concrete(asset_location, ctx.amount)];

    let dest = versioned_location(dest, version)?;
    let beneficiary = versioned_location(beneficiary, version)?;
    let assets = versioned_assets(assets, version)?;
    let weight_limit = ctx.weight_limit();

    match kind {
        TransferKind::Teleport => Ok(XcmCall::LimitedTeleportAssets {
            pallet,
            dest,
            beneficiary,
            assets,
            fee_asset_item: 0,
            weight_limit,
        }),
        TransferKind::ReserveTransfer => Ok(XcmCall::LimitedReserveTransferAssets {
            pallet,
            dest,
            beneficiary,
            assets,
            fee_asset_item: 0,
            weight_limit,
        }),
        TransferKind::MultiCurrency => Err(Error::UnsupportedTransfer(format!(
            "{} cannot pay the {} destination fee in {}",
            pallet.name(),
            ctx.destination.id,
            ctx.route.fee.token
        ))),
    }
}

/// orml `xTokens` calls: `transfer`, `transferMultiasset` and `transferMulticurrencies`.
pub fn xtokens_call(ctx: &TransferContext<'_>) -> Result<XcmCall> {
    let kind = select_transfer_kind(ctx);
    let version = match ctx.generation {
        XcmGeneration::Legacy => WireVersion::V1,
        XcmGeneration::Current => WireVersion::V3,
    };
    let destination = classify_destination(ctx);
    debug!(
        from = %ctx.origin.id,
        to = %ctx.destination.id,
        token = %ctx.token.symbol,
        ?kind,
        ?destination,
        "building xTokens call"
    );

    let dest = match destination {
        Destination::RelayChain => Location::new(1, Junctions::X1(ctx.account())),
        Destination::AssetHub { para_id, .. } | Destination::Sibling(para_id) => {
            Location::new(1, Junctions::X2(Junction::Parachain(para_id), ctx.account()))
        }
    };
    let dest = match version {
        WireVersion::V1 => versioned_location(with_any_network(dest), version)?,
        _ => versioned_location(dest, version)?,
    };
    let dest_weight_limit = ctx.weight_limit();

    match (kind, destination) {
        (TransferKind::Teleport, _) => Err(Error::UnsupportedTransfer(format!(
            "xTokens cannot teleport {} from {}",
            ctx.token.symbol, ctx.origin.id
        ))),
        (TransferKind::MultiCurrency, _) => Ok(XcmCall::TransferMulticurrencies {
            currencies: vec![
                (currency_of(ctx.token), ctx.amount),
                (ctx.fee_currency.clone(), ctx.route.fee.amount.0),
            ],
            fee_item: 1,
            dest,
            dest_weight_limit,
        }),
        (TransferKind::ReserveTransfer, Destination::AssetHub { para_id, asset_index }) => {
            let location = Location::new(
                1,
                Junctions::X3(
                    Junction::Parachain(para_id),
                    Junction::PalletInstance(ASSETS_PALLET_INSTANCE),
                    Junction::GeneralIndex(asset_index as u128),
                ),
            );
            let asset = MultiAsset::concrete(location, ctx.amount);
            let asset = match version {
                WireVersion::V3 => VersionedAsset::V3(asset),
                _ => VersionedAsset::V1(asset),
            };
            Ok(XcmCall::TransferMultiasset { asset, dest, dest_weight_limit })
        }
        (TransferKind::ReserveTransfer, _) => Ok(XcmCall::Transfer {
            currency_id: currency_of(ctx.token),
            amount: ctx.amount,
            dest,
            dest_weight_limit,
        }),
    }
}

/// The chain encoding of `token`, falling back to the symbol as a `Token` currency.
pub fn currency_of(token: &Token) -> RawToken {
    token
        .raw
        .clone()
        .unwrap_or_else(|| RawToken::Currency(CurrencyId::Token(token.symbol.clone())))
}

fn versioned_location(location: Location, version: WireVersion) -> Result<VersionedLocation> {
    Ok(match version {
        WireVersion::V0 => VersionedLocation::V0(to_v0(with_any_network(location))?),
        WireVersion::V1 => VersionedLocation::V1(location),
        WireVersion::V3 => VersionedLocation::V3(location),
    })
}

fn versioned_assets(assets: Vec<MultiAsset>, version: WireVersion) -> Result<VersionedAssets> {
    Ok(match version {
        WireVersion::V0 => VersionedAssets::V0(
            assets
                .into_iter()
                .map(|asset| -> Result<MultiAssetV0> {
                    let super::AssetId::Concrete(location) = asset.id;
                    let super::Fungibility::Fungible(amount) = asset.fun;
                    Ok(MultiAssetV0::ConcreteFungible { id: to_v0(location)?, amount })
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        WireVersion::V1 => VersionedAssets::V1(assets),
        WireVersion::V3 => VersionedAssets::V3(assets),
    })
}

/// Account junctions in V0 locations and in V1 `xTokens` destinations name their network.
fn with_any_network(location: Location) -> Location {
    let junctions = junctions_to_vec(location.interior)
        .into_iter()
        .map(|junction| match junction {
            Junction::AccountId32 { id, .. } => {
                Junction::AccountId32 { network: Some(NetworkId::Any), id }
            }
            other => other,
        })
        .collect::<Vec<_>>();
    Location::new(location.parents, junctions_from_vec(junctions).unwrap_or(Junctions::Here))
}

/// V0 locations spell out parents as leading `Parent` junctions.
fn to_v0(location: Location) -> Result<Junctions> {
    let mut junctions = vec![Junction::Parent; location.parents as usize];
    junctions.extend(junctions_to_vec(location.interior));
    let len = junctions.len();
    junctions_from_vec(junctions)
        .ok_or_else(|| Error::UnsupportedTransfer(format!("{} junctions do not fit a V0 location", len)))
}

fn junctions_to_vec(junctions: Junctions) -> Vec<Junction> {
    match junctions {
        Junctions::Here => vec![],
        Junctions::X1(a) => vec![a],
        Junctions::X2(a, b) => vec![a, b],
        Junctions::X3(a, b, c) => vec![a, b, c],
    }
}

fn junctions_from_vec(junctions: Vec<Junction>) -> Option<Junctions> {
    let mut iter = junctions.into_iter();
    match (iter.next(), iter.next(), iter.next(), iter.next()) {
        (None, ..) => Some(Junctions::Here),
        (Some(a), None, ..) => Some(Junctions::X1(a)),
        (Some(a), Some(b), None, _) => Some(Junctions::X2(a, b)),
        (Some(a), Some(b), Some(c), None) => Some(Junctions::X3(a, b, c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::ChainAmount;
    use crate::config::RouteFee;
    use crate::xcm::AssetId;

    fn chain(id: &str, para: Option<u32>, native: &str, family: ChainFamily) -> Chain {
        Chain {
            id: id.into(),
            display: id.into(),
            ss58_prefix: 42,
            para_chain_id: para,
            native_token: native.into(),
            family,
        }
    }

    fn token(symbol: &str, raw: Option<RawToken>) -> Token {
        Token { symbol: symbol.into(), decimals: 12, ed: 1_000, raw }
    }

    fn route(from: &str, to: &str, token: &str, fee_token: &str) -> Route {
        Route {
            from: from.into(),
            to: to.into(),
            token: token.into(),
            fee: RouteFee { token: fee_token.into(), amount: ChainAmount(77) },
            weight_limit: WeightLimit::Limited(5_000_000_000),
        }
    }

    struct Fixture {
        origin: Chain,
        destination: Chain,
        token: Token,
        dest_token: Token,
        route: Route,
        fee_currency: RawToken,
    }

    impl Fixture {
        fn ctx(&self, generation: XcmGeneration) -> TransferContext<'_> {
            TransferContext {
                origin: &self.origin,
                destination: &self.destination,
                token: &self.token,
                dest_token: &self.dest_token,
                route: &self.route,
                fee_currency: self.fee_currency.clone(),
                amount: 1_000_000,
                beneficiary: [7u8; 32],
                generation,
            }
        }
    }

    fn statemint_to_relay() -> Fixture {
        Fixture {
            origin: chain("statemint", Some(1000), "DOT", ChainFamily::Statemint),
            destination: chain("polkadot", None, "DOT", ChainFamily::Relay),
            token: token("DOT", None),
            dest_token: token("DOT", None),
            route: route("statemint", "polkadot", "DOT", "DOT"),
            fee_currency: RawToken::Index(0),
        }
    }

    fn karura_to_statemine(fee_token: &str) -> Fixture {
        Fixture {
            origin: chain("karura", Some(2000), "KAR", ChainFamily::Acala),
            destination: chain("statemine", Some(1000), "KSM", ChainFamily::Statemint),
            token: token("USDT", Some(RawToken::Currency(CurrencyId::ForeignAsset(7)))),
            dest_token: token("USDT", Some(RawToken::Index(1984))),
            route: route("karura", "statemine", "USDT", fee_token),
            fee_currency: RawToken::Currency(CurrencyId::Token(fee_token.into())),
        }
    }

    #[test]
    fn native_token_to_relay_is_a_teleport() {
        let fixture = statemint_to_relay();
        let call = pallet_xcm_call(&fixture.ctx(XcmGeneration::Current), XcmPallet::PolkadotXcm, Location::parent()).unwrap();
        assert_eq!(call.kind(), TransferKind::Teleport);
        assert_eq!(call.pallet(), "polkadotXcm");
        assert_eq!(call.dest(), &VersionedLocation::V3(Location::parent()));
        assert_eq!(call.weight_limit(), WeightLimit::Unlimited);
        match call {
            XcmCall::LimitedTeleportAssets { assets: VersionedAssets::V3(assets), .. } => {
                assert_eq!(assets, vec![MultiAsset::concrete(Location::parent(), 1_000_000)]);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn legacy_teleports_use_v1_and_leave_the_network_out() {
        let fixture = statemint_to_relay();
        let call = pallet_xcm_call(&fixture.ctx(XcmGeneration::Legacy), XcmPallet::PolkadotXcm, Location::parent()).unwrap();
        assert_eq!(call.weight_limit(), WeightLimit::Limited(5_000_000_000));
        match call {
            XcmCall::LimitedTeleportAssets { beneficiary: VersionedLocation::V1(location), .. } => {
                assert_eq!(
                    location.interior,
                    Junctions::X1(Junction::AccountId32 { network: None, id: address::to_hex(&[7u8; 32]) })
                );
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn asset_hub_reserve_transfer_uses_v0_on_legacy_runtimes() {
        let fixture = Fixture {
            origin: chain("statemint", Some(1000), "DOT", ChainFamily::Statemint),
            destination: chain("hydradx", Some(2034), "HDX", ChainFamily::Hydradx),
            token: token("USDT", Some(RawToken::Index(1984))),
            dest_token: token("USDT", Some(RawToken::Index(10))),
            route: route("statemint", "hydradx", "USDT", "USDT"),
            fee_currency: RawToken::Index(1984),
        };
        let call = pallet_xcm_call(&fixture.ctx(XcmGeneration::Legacy), XcmPallet::PolkadotXcm, Location::parent()).unwrap();
        assert_eq!(call.kind(), TransferKind::ReserveTransfer);
        match call {
            XcmCall::LimitedReserveTransferAssets { dest, beneficiary, assets, .. } => {
                assert_eq!(dest, VersionedLocation::V0(Junctions::X2(Junction::Parent, Junction::Parachain(2034))));
                assert_eq!(
                    beneficiary,
                    VersionedLocation::V0(Junctions::X1(Junction::AccountId32 {
                        network: Some(NetworkId::Any),
                        id: address::to_hex(&[7u8; 32]),
                    }))
                );
                assert_eq!(
                    assets,
                    VersionedAssets::V0(vec![MultiAssetV0::ConcreteFungible {
                        id: Junctions::X2(Junction::PalletInstance(50), Junction::GeneralIndex(1984)),
                        amount: 1_000_000,
                    }])
                );
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn relay_chain_uses_zero_parents() {
        let fixture = Fixture {
            origin: chain("polkadot", None, "DOT", ChainFamily::Relay),
            destination: chain("acala", Some(2000), "ACA", ChainFamily::Acala),
            token: token("DOT", None),
            dest_token: token("DOT", None),
            route: route("polkadot", "acala", "DOT", "DOT"),
            fee_currency: RawToken::Index(0),
        };
        let call = pallet_xcm_call(&fixture.ctx(XcmGeneration::Current), XcmPallet::XcmPallet, Location::here()).unwrap();
        assert_eq!(call.pallet(), "xcmPallet");
        assert_eq!(call.kind(), TransferKind::ReserveTransfer);
        assert_eq!(
            call.dest(),
            &VersionedLocation::V3(Location::new(0, Junctions::X1(Junction::Parachain(2000))))
        );
    }

    #[test]
    fn relay_native_to_asset_hub_is_a_teleport() {
        let fixture = Fixture {
            origin: chain("polkadot", None, "DOT", ChainFamily::Relay),
            destination: chain("statemint", Some(1000), "DOT", ChainFamily::Statemint),
            token: token("DOT", None),
            dest_token: token("DOT", None),
            route: route("polkadot", "statemint", "DOT", "DOT"),
            fee_currency: RawToken::Index(0),
        };
        let call = pallet_xcm_call(&fixture.ctx(XcmGeneration::Current), XcmPallet::XcmPallet, Location::here()).unwrap();
        assert_eq!(call.kind(), TransferKind::Teleport);
    }

    #[test]
    fn foreign_fee_token_yields_two_currencies() {
        let fixture = karura_to_statemine("KSM");
        let call = xtokens_call(&fixture.ctx(XcmGeneration::Current)).unwrap();
        assert_eq!(call.kind(), TransferKind::MultiCurrency);
        assert_eq!(call.asset_count(), 2);
        match call {
            XcmCall::TransferMulticurrencies { currencies, fee_item, .. } => {
                assert_eq!(fee_item, 1);
                assert_eq!(currencies[0], (RawToken::Currency(CurrencyId::ForeignAsset(7)), 1_000_000));
                assert_eq!(currencies[1], (RawToken::Currency(CurrencyId::Token("KSM".into())), 77));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn asset_indexed_destination_gets_a_multiasset() {
        let fixture = karura_to_statemine("USDT");
        let call = xtokens_call(&fixture.ctx(XcmGeneration::Current)).unwrap();
        assert_eq!(call.kind(), TransferKind::ReserveTransfer);
        match call {
            XcmCall::TransferMultiasset { asset: VersionedAsset::V3(asset), dest, .. } => {
                assert_eq!(
                    asset.id,
                    AssetId::Concrete(Location::new(
                        1,
                        Junctions::X3(
                            Junction::Parachain(1000),
                            Junction::PalletInstance(50),
                            Junction::GeneralIndex(1984),
                        ),
                    ))
                );
                assert!(matches!(dest, VersionedLocation::V3(Location { parents: 1, interior: Junctions::X2(Junction::Parachain(1000), _) })));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn xtokens_to_relay_addresses_the_account_directly() {
        let fixture = Fixture {
            origin: chain("hydradx", Some(2034), "HDX", ChainFamily::Hydradx),
            destination: chain("polkadot", None, "DOT", ChainFamily::Relay),
            token: token("DOT", Some(RawToken::Index(5))),
            dest_token: token("DOT", None),
            route: route("hydradx", "polkadot", "DOT", "DOT"),
            fee_currency: RawToken::Index(5),
        };
        let call = xtokens_call(&fixture.ctx(XcmGeneration::Legacy)).unwrap();
        assert_eq!(call.weight_limit(), WeightLimit::Limited(5_000_000_000));
        match call {
            XcmCall::Transfer { currency_id, dest: VersionedLocation::V1(location), .. } => {
                assert_eq!(currency_id, RawToken::Index(5));
                assert_eq!(location.parents, 1);
                assert!(matches!(location.interior, Junctions::X1(Junction::AccountId32 { network: Some(NetworkId::Any), .. })));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn pallet_xcm_rejects_foreign_fee_assets() {
        let mut fixture = statemint_to_relay();
        fixture.destination = chain("hydradx", Some(2034), "HDX", ChainFamily::Hydradx);
        fixture.token = token("USDT", Some(RawToken::Index(1984)));
        fixture.route = route("statemint", "hydradx", "USDT", "DOT");
        let result = pallet_xcm_call(&fixture.ctx(XcmGeneration::Current), XcmPallet::PolkadotXcm, Location::parent());
        assert!(matches!(result, Err(Error::UnsupportedTransfer(_))));
    }

    #[test]
    fn v0_conversion_prepends_parents() {
        let location = Location::new(1, Junctions::X2(Junction::Parachain(1000), Junction::GeneralIndex(1)));
        assert_eq!(
            to_v0(location).unwrap(),
            Junctions::X3(Junction::Parent, Junction::Parachain(1000), Junction::GeneralIndex(1))
        );
        let too_deep = Location::new(2, Junctions::X2(Junction::Parachain(1), Junction::GeneralIndex(1)));
        assert!(to_v0(too_deep).is_err());
    }
}
