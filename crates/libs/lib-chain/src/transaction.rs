//! # Transactions
//!
//! Canonical asset-transfer transaction representation, wire encoding, and
//! group-id assignment.
//!
//! A group id binds multiple transactions into one atomic unit: the ledger
//! accepts or rejects all members together, and no member is valid signed
//! in isolation without the others carrying the same id.

use lib_utils::b64::b64_encode;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of a transaction group identifier in bytes.
pub const GROUP_ID_LEN: usize = 32;

/// Shared tag binding grouped transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupId([u8; GROUP_ID_LEN]);

impl GroupId {
    /// A fresh identifier from OS randomness. Two calls never collide in
    /// practice, which keeps separate purchase attempts distinguishable.
    pub fn fresh() -> Self {
        let mut id = [0u8; GROUP_ID_LEN];
        rand::thread_rng().fill_bytes(&mut id);
        Self(id)
    }

    pub fn as_bytes(&self) -> &[u8; GROUP_ID_LEN] {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// An unsigned asset-transfer transaction.
///
/// `flat_fee` marks the fee as fixed by the caller rather than derived from
/// network size estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedTxn {
    pub sender: String,
    pub receiver: String,
    pub asset_index: u64,
    /// Transfer amount in base units
    pub amount: u64,
    /// Fee in micro-units
    pub fee: u64,
    pub flat_fee: bool,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    /// Group membership; `None` until grouped
    pub group: Option<GroupId>,
}

/// Transaction encoding errors
#[derive(Debug, Error)]
#[error("failed to encode transaction: {0}")]
pub struct EncodeError(String);

impl UnsignedTxn {
    /// Canonical wire bytes of this transaction.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        bincode::serialize(self).map_err(|e| EncodeError(e.to_string()))
    }

    /// Canonical wire bytes, base64-encoded for transport.
    pub fn encode_b64(&self) -> Result<String, EncodeError> {
        Ok(b64_encode(self.encode()?))
    }
}

/// Stamp one fresh group id across all transactions in the slice.
///
/// Returns the assigned id. Grouping is atomic: either every member carries
/// the id or the slice is untouched (the only failure mode is an empty
/// slice, which is a no-op on a fresh id).
pub fn assign_group_id(txns: &mut [UnsignedTxn]) -> GroupId {
    let id = GroupId::fresh();
    for txn in txns.iter_mut() {
        txn.group = Some(id);
    }
    id
}
