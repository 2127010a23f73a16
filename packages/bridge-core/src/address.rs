//! SS58 account addresses.
//!
//! Substrate chains render a 32 byte account id as base58 of
//! `prefix ++ account ++ checksum`, where the checksum is the first two bytes of
//! `blake2b_512("SS58PRE" ++ prefix ++ account)`.

use blake2::{Blake2b512, Digest};
use tracing::debug;

use crate::config::Chain;
use crate::{Error, Result};

const SS58_PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;

/// The generic substrate prefix, accepted by every chain.
pub const GENERIC_SUBSTRATE_PREFIX: u16 = 42;

pub type AccountId32 = [u8; 32];

/// Decodes an SS58 address (any prefix) or a `0x` prefixed hex account id.
///
/// Returns the account id together with the prefix it was encoded with
/// (`None` for hex input).
pub fn decode(address: &str) -> Result<(AccountId32, Option<u16>)> {
    let address = address.trim();
    if let Some(raw) = address.strip_prefix("0x") {
        let bytes = hex::decode(raw).map_err(|_| Error::InvalidAddress(address.to_string()))?;
        let account = AccountId32::try_from(bytes.as_slice())
            .map_err(|_| Error::InvalidAddress(address.to_string()))?;
        return Ok((account, None));
    }

    let data = bs58::decode(address)
        .into_vec()
        .map_err(|_| Error::InvalidAddress(address.to_string()))?;

    let (prefix, prefix_len) = match data.first() {
        Some(&first) if first < 64 => (first as u16, 1),
        Some(&first) if first < 128 && data.len() > 1 => {
            let lower = (first << 2) | (data[1] >> 6);
            let upper = data[1] & 0b0011_1111;
            (lower as u16 | ((upper as u16) << 8), 2)
        }
        _ => return Err(Error::InvalidAddress(address.to_string())),
    };

    if data.len() != prefix_len + 32 + CHECKSUM_LEN {
        return Err(Error::InvalidAddress(address.to_string()));
    }

    let (body, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
    if ss58_hash(body)[..CHECKSUM_LEN] != *checksum {
        return Err(Error::InvalidAddress(address.to_string()));
    }

    let account = AccountId32::try_from(&body[prefix_len..])
        .map_err(|_| Error::InvalidAddress(address.to_string()))?;
    Ok((account, Some(prefix)))
}

/// Decodes `address` as an account on `chain`.
///
/// SS58 input must carry the chain's own prefix or the generic substrate prefix.
pub fn decode_for(chain: &Chain, address: &str) -> Result<AccountId32> {
    let (account, prefix) = decode(address)?;
    match prefix {
        Some(prefix) if prefix != chain.ss58_prefix && prefix != GENERIC_SUBSTRATE_PREFIX => {
            debug!(chain = %chain.id, prefix, expected = chain.ss58_prefix, "address prefix mismatch");
            Err(Error::InvalidAddress(address.to_string()))
        }
        _ => Ok(account),
    }
}

pub fn validate(chain: &Chain, address: &str) -> bool {
    decode_for(chain, address).is_ok()
}

pub fn encode(account: &AccountId32, prefix: u16) -> String {
    let mut data = match prefix {
        0..=63 => vec![prefix as u8],
        _ => {
            let first = (((prefix & 0b0000_0000_1111_1100) >> 2) as u8) | 0b0100_0000;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            vec![first, second]
        }
    };
    data.extend_from_slice(account);
    let checksum = ss58_hash(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(data).into_string()
}

/// `0x` prefixed hex of the account id, the form xcm junctions expect.
pub fn to_hex(account: &AccountId32) -> String {
    format!("0x{}", hex::encode(account))
}

fn ss58_hash(data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_PREFIX);
    hasher.update(data);
    hasher.finalize().to_vec()
}
