use serde::Serialize;

use crate::amount::FixedPoint;
use crate::xcm::XcmCall;

/// Canonical balance of one token for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceData {
    pub free: FixedPoint,
    pub locked: FixedPoint,
    pub reserved: FixedPoint,
    pub available: FixedPoint,
}

impl BalanceData {
    pub fn zero(decimals: u8) -> Self {
        Self {
            free: FixedPoint::zero(decimals),
            locked: FixedPoint::zero(decimals),
            reserved: FixedPoint::zero(decimals),
            available: FixedPoint::zero(decimals),
        }
    }

    /// Balance of a store without locks or reserves.
    pub fn free_only(free: FixedPoint) -> Self {
        let decimals = free.decimals();
        Self {
            available: free.clone(),
            free,
            locked: FixedPoint::zero(decimals),
            reserved: FixedPoint::zero(decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferParams {
    /// Destination chain id.
    pub to: String,
    pub token: String,
    pub amount: FixedPoint,
    /// Receiving address on the destination chain.
    pub address: String,
    /// Sending account, used for fee estimation.
    pub signer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDescriptor {
    pub chain: String,
    pub call: XcmCall,
    #[serde(serialize_with = "hex_bytes")]
    pub encoded: Vec<u8>,
}

fn hex_bytes<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAmount {
    pub token: String,
    pub amount: FixedPoint,
}

/// Combined input quote for one transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfigs {
    /// Origin fee estimate in native token units.
    pub estimate_fee: u128,
    pub min_input: FixedPoint,
    pub max_input: FixedPoint,
    pub ss58_prefix: u16,
    pub dest_fee: TokenAmount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_only_balance_is_fully_available() {
        let balance = BalanceData::free_only(FixedPoint::from_inner(42u32, 6));
        assert_eq!(balance.available, balance.free);
        assert!(balance.locked.is_zero());
        assert_eq!(balance.reserved.decimals(), 6);
    }

    #[test]
    fn descriptor_renders_encoded_bytes_as_hex() {
        let descriptor = TransactionDescriptor {
            chain: "kusama".into(),
            call: XcmCall::Transfer {
                currency_id: crate::config::RawToken::Index(0),
                amount: 1,
                dest: crate::xcm::VersionedLocation::V3(crate::xcm::Location::parent()),
                dest_weight_limit: crate::xcm::WeightLimit::Unlimited,
            },
            encoded: vec![0xde, 0xad],
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["encoded"], "0xdead");
        assert_eq!(json["call"]["method"], "transfer");
    }
}
