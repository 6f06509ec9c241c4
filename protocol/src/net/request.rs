//! RPC requests.

use tracing::debug;

use super::RpcType;
use crate::codec::types::{read_script_hash, write_script_hash};
use crate::codec::{ByteBuffer, CodecError};
use crate::crypto::ScriptHash;
use crate::tx::TxVariant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Submit a transaction to the peer's mempool.
    Broadcast(TxVariant),
    /// Restrict pushed blocks to those touching these addresses. `None` and
    /// an empty list both filter everything out.
    SetBlockFilter(Option<Vec<ScriptHash>>),
    ClearBlockFilter,
    /// Start receiving new blocks on this connection.
    Subscribe,
    Unsubscribe,
    GetProperties,
    /// A block, filtered by the connection's block filter.
    GetBlock(u64),
    GetFullBlock(u64),
    /// Inclusive range. Blocks are streamed back as `GetBlock` responses,
    /// followed by an empty `GetBlockRange` response.
    GetBlockRange {
        min_height: u64,
        max_height: u64,
    },
    GetAddressInfo(ScriptHash),
}

impl Request {
    pub fn rpc_type(&self) -> RpcType {
        match self {
            Self::Broadcast(_) => RpcType::Broadcast,
            Self::SetBlockFilter(_) => RpcType::SetBlockFilter,
            Self::ClearBlockFilter => RpcType::ClearBlockFilter,
            Self::Subscribe => RpcType::Subscribe,
            Self::Unsubscribe => RpcType::Unsubscribe,
            Self::GetProperties => RpcType::GetProperties,
            Self::GetBlock(_) => RpcType::GetBlock,
            Self::GetFullBlock(_) => RpcType::GetFullBlock,
            Self::GetBlockRange { .. } => RpcType::GetBlockRange,
            Self::GetAddressInfo(_) => RpcType::GetAddressInfo,
        }
    }

    pub fn serialize(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        buf.write_u8(self.rpc_type() as u8);
        match self {
            Self::Broadcast(tx) => tx.serialize(buf, true)?,
            Self::SetBlockFilter(addrs) => {
                let addrs = addrs.as_deref().unwrap_or_default();
                let count = u8::try_from(addrs.len()).map_err(|_| CodecError::TooManyItems {
                    what: "filter addresses",
                    len: addrs.len(),
                })?;
                buf.write_u8(count);
                for addr in addrs {
                    write_script_hash(buf, addr);
                }
            }
            Self::ClearBlockFilter | Self::Subscribe | Self::Unsubscribe | Self::GetProperties => {}
            Self::GetBlock(height) | Self::GetFullBlock(height) => {
                buf.write_u64(*height);
            }
            Self::GetBlockRange {
                min_height,
                max_height,
            } => {
                buf.write_u64(*min_height).write_u64(*max_height);
            }
            Self::GetAddressInfo(addr) => write_script_hash(buf, addr),
        }
        Ok(())
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        let byte = buf.read_u8()?;
        let Some(rpc_type) = RpcType::from_u8(byte) else {
            debug!(rpc_type = byte, "rejecting unknown request");
            return Err(CodecError::UnknownRequest(byte));
        };

        Ok(match rpc_type {
            RpcType::Broadcast => Self::Broadcast(TxVariant::deserialize(buf)?),
            RpcType::SetBlockFilter => {
                let count = buf.read_u8()?;
                if count == 0 {
                    Self::SetBlockFilter(None)
                } else {
                    let addrs = (0..count)
                        .map(|_| read_script_hash(buf))
                        .collect::<Result<Vec<_>, _>>()?;
                    Self::SetBlockFilter(Some(addrs))
                }
            }
            RpcType::ClearBlockFilter => Self::ClearBlockFilter,
            RpcType::Subscribe => Self::Subscribe,
            RpcType::Unsubscribe => Self::Unsubscribe,
            RpcType::GetProperties => Self::GetProperties,
            RpcType::GetBlock => Self::GetBlock(buf.read_u64()?),
            RpcType::GetFullBlock => Self::GetFullBlock(buf.read_u64()?),
            RpcType::GetBlockRange => Self::GetBlockRange {
                min_height: buf.read_u64()?,
                max_height: buf.read_u64()?,
            },
            RpcType::GetAddressInfo => Self::GetAddressInfo(read_script_hash(buf)?),
        })
    }
}
