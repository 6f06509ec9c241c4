//! RPC responses. Each variant answers the request of the same name.

use tracing::debug;

use super::RpcType;
use crate::block::{Block, BlockHeader};
use crate::chain::{AddressInfo, ChainProperties};
use crate::codec::types::{read_asset, read_sig_pair, write_asset, write_sig_pair};
use crate::codec::{ByteBuffer, CodecError};
use crate::crypto::SigPair;
use crate::tx::TxVariant;

/// A block as seen through the connection's block filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilteredBlock {
    /// Nothing in the block matched: only the header and its signer.
    Header(BlockHeader, SigPair),
    Block(Block),
}

impl FilteredBlock {
    const HEADER: u8 = 0;
    const BLOCK: u8 = 1;

    fn serialize(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        match self {
            Self::Header(header, signer) => {
                buf.write_u8(Self::HEADER);
                header.serialize(buf);
                write_sig_pair(buf, signer);
            }
            Self::Block(block) => {
                buf.write_u8(Self::BLOCK);
                block.serialize(buf)?;
            }
        }
        Ok(())
    }

    fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        match buf.read_u8()? {
            Self::HEADER => {
                let header = BlockHeader::deserialize(buf)?;
                let signer = read_sig_pair(buf)?;
                Ok(Self::Header(header, signer))
            }
            Self::BLOCK => Ok(Self::Block(Block::deserialize(buf)?)),
            other => Err(CodecError::InvalidFilteredBlockType(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Broadcast,
    SetBlockFilter,
    ClearBlockFilter,
    Subscribe,
    Unsubscribe,
    GetProperties(ChainProperties),
    GetBlock(FilteredBlock),
    GetFullBlock(Block),
    /// Terminates a streamed range.
    GetBlockRange,
    GetAddressInfo(AddressInfo),
}

impl Response {
    pub fn rpc_type(&self) -> RpcType {
        match self {
            Self::Broadcast => RpcType::Broadcast,
            Self::SetBlockFilter => RpcType::SetBlockFilter,
            Self::ClearBlockFilter => RpcType::ClearBlockFilter,
            Self::Subscribe => RpcType::Subscribe,
            Self::Unsubscribe => RpcType::Unsubscribe,
            Self::GetProperties(_) => RpcType::GetProperties,
            Self::GetBlock(_) => RpcType::GetBlock,
            Self::GetFullBlock(_) => RpcType::GetFullBlock,
            Self::GetBlockRange => RpcType::GetBlockRange,
            Self::GetAddressInfo(_) => RpcType::GetAddressInfo,
        }
    }

    pub fn serialize(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        buf.write_u8(self.rpc_type() as u8);
        match self {
            Self::Broadcast
            | Self::SetBlockFilter
            | Self::ClearBlockFilter
            | Self::Subscribe
            | Self::Unsubscribe
            | Self::GetBlockRange => {}
            Self::GetProperties(props) => {
                if !props.has_owner_tx() {
                    return Err(CodecError::ExpectedOwnerTx(props.owner.tx_type() as u8));
                }
                buf.write_u64(props.height);
                props.owner.serialize(buf, true)?;
                write_asset(buf, &props.network_fee)?;
                write_asset(buf, &props.token_supply)?;
            }
            Self::GetBlock(block) => block.serialize(buf)?,
            Self::GetFullBlock(block) => block.serialize(buf)?,
            Self::GetAddressInfo(info) => {
                write_asset(buf, &info.net_fee)?;
                write_asset(buf, &info.addr_fee)?;
                write_asset(buf, &info.balance)?;
            }
        }
        Ok(())
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        let byte = buf.read_u8()?;
        let Some(rpc_type) = RpcType::from_u8(byte) else {
            debug!(rpc_type = byte, "rejecting unknown response");
            return Err(CodecError::UnknownResponse(byte));
        };

        Ok(match rpc_type {
            RpcType::Broadcast => Self::Broadcast,
            RpcType::SetBlockFilter => Self::SetBlockFilter,
            RpcType::ClearBlockFilter => Self::ClearBlockFilter,
            RpcType::Subscribe => Self::Subscribe,
            RpcType::Unsubscribe => Self::Unsubscribe,
            RpcType::GetProperties => {
                let height = buf.read_u64()?;
                let owner = TxVariant::deserialize(buf)?;
                let props = ChainProperties {
                    height,
                    owner,
                    network_fee: read_asset(buf)?,
                    token_supply: read_asset(buf)?,
                };
                if !props.has_owner_tx() {
                    return Err(CodecError::ExpectedOwnerTx(props.owner.tx_type() as u8));
                }
                Self::GetProperties(props)
            }
            RpcType::GetBlock => Self::GetBlock(FilteredBlock::deserialize(buf)?),
            RpcType::GetFullBlock => Self::GetFullBlock(Block::deserialize(buf)?),
            RpcType::GetBlockRange => Self::GetBlockRange,
            RpcType::GetAddressInfo => Self::GetAddressInfo(AddressInfo {
                net_fee: read_asset(buf)?,
                addr_fee: read_asset(buf)?,
                balance: read_asset(buf)?,
            }),
        })
    }
}
