//! Chain-level value records returned by the RPC getters.

use crate::asset::Asset;
use crate::tx::{TxType, TxVariant};

/// Snapshot of the chain head as reported by a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainProperties {
    pub height: u64,
    /// Always an owner transaction; decoding rejects anything else.
    pub owner: TxVariant,
    pub network_fee: Asset,
    pub token_supply: Asset,
}

impl ChainProperties {
    pub fn has_owner_tx(&self) -> bool {
        self.owner.tx_type() == TxType::Owner
    }
}

/// Fee schedule and balance for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressInfo {
    pub net_fee: Asset,
    pub addr_fee: Asset,
    pub balance: Asset,
}
