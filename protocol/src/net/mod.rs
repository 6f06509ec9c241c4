//! # Network Messages
//!
//! The RPC envelope exchanged between peers. Framing, sockets and routing
//! live in the node; this module only fixes the bytes.
//!
//! ## Envelope
//!
//! ```text
//! id         u32     pairs a response with its request
//! body_type  u8      ERROR=0x01 REQUEST=0x02 RESPONSE=0x03 PING=0x04 PONG=0x05
//! body       ...
//! ```
//!
//! Request and response bodies start with an RPC type byte:
//!
//! | RPC              | tag  | request payload     | response payload          |
//! |------------------|------|---------------------|---------------------------|
//! | Broadcast        | 0x10 | tx                  | -                         |
//! | SetBlockFilter   | 0x11 | u8 n, n * address   | -                         |
//! | ClearBlockFilter | 0x12 | -                   | -                         |
//! | Subscribe        | 0x13 | -                   | -                         |
//! | Unsubscribe      | 0x14 | -                   | -                         |
//! | GetProperties    | 0x20 | -                   | height, owner tx, 2 assets|
//! | GetBlock         | 0x21 | u64 height          | u8 flag, header+signer or block |
//! | GetFullBlock     | 0x22 | u64 height          | block                     |
//! | GetBlockRange    | 0x23 | u64 min, u64 max    | -                         |
//! | GetAddressInfo   | 0x24 | address             | 3 assets                  |
//!
//! Message id [`IO_ERROR_MSG_ID`] is reserved: it marks an IO failure and is
//! never paired with a real request. Request and response bodies carrying it
//! fail to encode and to decode.

pub mod error;
pub mod request;
pub mod response;

use tracing::debug;

use crate::codec::{ByteBuffer, CodecError};
use crate::config::IO_ERROR_MSG_ID;

pub use error::{NetErrorKind, NetworkError};
pub use request::Request;
pub use response::{FilteredBlock, Response};

/// Envelope discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyType {
    Error = 0x01,
    Request = 0x02,
    Response = 0x03,
    Ping = 0x04,
    Pong = 0x05,
}

impl BodyType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x01 => Self::Error,
            0x02 => Self::Request,
            0x03 => Self::Response,
            0x04 => Self::Ping,
            0x05 => Self::Pong,
            _ => return None,
        })
    }
}

/// RPC discriminant shared by requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RpcType {
    // Operations that can update the connection or blockchain state
    Broadcast = 0x10,
    SetBlockFilter = 0x11,
    ClearBlockFilter = 0x12,
    Subscribe = 0x13,
    Unsubscribe = 0x14,

    // Getters
    GetProperties = 0x20,
    GetBlock = 0x21,
    GetFullBlock = 0x22,
    GetBlockRange = 0x23,
    GetAddressInfo = 0x24,
}

impl RpcType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x10 => Self::Broadcast,
            0x11 => Self::SetBlockFilter,
            0x12 => Self::ClearBlockFilter,
            0x13 => Self::Subscribe,
            0x14 => Self::Unsubscribe,
            0x20 => Self::GetProperties,
            0x21 => Self::GetBlock,
            0x22 => Self::GetFullBlock,
            0x23 => Self::GetBlockRange,
            0x24 => Self::GetAddressInfo,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Error(NetworkError),
    Request(Request),
    Response(Response),
    /// Nonce echoed back unchanged in the matching `Pong`.
    Ping(u64),
    Pong(u64),
}

impl Body {
    /// Bodies that pair with a request and so need a real message id.
    fn is_rpc(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Response(_))
    }

    pub fn body_type(&self) -> BodyType {
        match self {
            Self::Error(_) => BodyType::Error,
            Self::Request(_) => BodyType::Request,
            Self::Response(_) => BodyType::Response,
            Self::Ping(_) => BodyType::Ping,
            Self::Pong(_) => BodyType::Pong,
        }
    }
}

/// A framed RPC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Msg {
    pub id: u32,
    pub body: Body,
}

impl Msg {
    /// Builds a message. A request or response with [`IO_ERROR_MSG_ID`] is
    /// accepted here but rejected by [`Msg::serialize`].
    pub fn new(id: u32, body: Body) -> Self {
        Self { id, body }
    }

    /// The message a peer sends when it could not read a request at all.
    pub fn io_error() -> Self {
        Self {
            id: IO_ERROR_MSG_ID,
            body: Body::Error(NetworkError::Io),
        }
    }

    /// True for the reserved IO-failure id.
    pub fn is_io_error_id(&self) -> bool {
        self.id == IO_ERROR_MSG_ID
    }

    /// Writes the whole frame or nothing: a body that fails to encode
    /// leaves `buf` untouched.
    pub fn serialize(&self, buf: &mut ByteBuffer) -> Result<(), CodecError> {
        if self.body.is_rpc() && self.is_io_error_id() {
            return Err(CodecError::ReservedMsgId(self.id));
        }
        buf.write_staged(|buf| {
            buf.write_u32(self.id);
            buf.write_u8(self.body.body_type() as u8);
            match &self.body {
                Body::Error(err) => err.serialize(buf),
                Body::Request(req) => req.serialize(buf)?,
                Body::Response(res) => res.serialize(buf)?,
                Body::Ping(nonce) | Body::Pong(nonce) => {
                    buf.write_u64(*nonce);
                }
            }
            Ok(())
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = ByteBuffer::alloc(0);
        self.serialize(&mut buf)?;
        Ok(buf.into_vec())
    }

    pub fn deserialize(buf: &mut ByteBuffer) -> Result<Self, CodecError> {
        let id = buf.read_u32()?;
        let byte = buf.read_u8()?;
        let Some(body_type) = BodyType::from_u8(byte) else {
            debug!(id, body_type = byte, "rejecting message with unknown body");
            return Err(CodecError::UnknownMsgBody(byte));
        };

        let body = match body_type {
            BodyType::Error => Body::Error(NetworkError::deserialize(buf)?),
            BodyType::Request => Body::Request(Request::deserialize(buf)?),
            BodyType::Response => Body::Response(Response::deserialize(buf)?),
            BodyType::Ping => Body::Ping(buf.read_u64()?),
            BodyType::Pong => Body::Pong(buf.read_u64()?),
        };
        if body.is_rpc() && id == IO_ERROR_MSG_ID {
            debug!(id, "rejecting rpc body with reserved id");
            return Err(CodecError::ReservedMsgId(id));
        }
        Ok(Self { id, body })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, CodecError> {
        Self::deserialize(&mut ByteBuffer::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::chain::AddressInfo;
    use crate::tx::TxVerifyError;

    fn round_trip(msg: &Msg) -> Msg {
        Msg::from_bytes(msg.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn ping_pong_nonce() {
        let ping = Msg::new(7, Body::Ping(0xdead_beef_cafe_babe));
        let bytes = ping.to_bytes().unwrap();
        assert_eq!(&bytes[..5], &[0, 0, 0, 7, BodyType::Ping as u8]);
        assert_eq!(&bytes[5..], &0xdead_beef_cafe_babe_u64.to_be_bytes());
        assert_eq!(round_trip(&ping), ping);

        let pong = Msg::new(7, Body::Pong(0xdead_beef_cafe_babe));
        assert_eq!(round_trip(&pong), pong);
    }

    #[test]
    fn error_body() {
        let msg = Msg::new(
            3,
            Body::Error(NetworkError::TxValidation(TxVerifyError::TxDupe)),
        );
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn request_and_response_bodies() {
        let req = Msg::new(1, Body::Request(Request::GetBlock(10)));
        assert_eq!(round_trip(&req), req);

        let res = Msg::new(1, Body::Response(Response::Subscribe));
        assert_eq!(round_trip(&res), res);
    }

    #[test]
    fn io_error_id_is_reserved() {
        let msg = Msg::io_error();
        assert!(msg.is_io_error_id());
        assert_eq!(msg.id, u32::MAX);
        assert_eq!(round_trip(&msg), msg);
        assert!(!Msg::new(0, Body::Ping(0)).is_io_error_id());
    }

    #[test]
    fn reserved_id_rejected_for_rpc_bodies() {
        let req = Msg::new(IO_ERROR_MSG_ID, Body::Request(Request::Subscribe));
        let mut buf = ByteBuffer::alloc(0);
        assert_eq!(
            req.serialize(&mut buf),
            Err(CodecError::ReservedMsgId(IO_ERROR_MSG_ID))
        );
        assert_eq!(buf.offset(), 0);

        let res = Msg::new(IO_ERROR_MSG_ID, Body::Response(Response::Subscribe));
        assert!(res.to_bytes().is_err());

        // Assemble the frame by hand so the decoder sees the reserved id.
        let mut bytes = Msg::new(1, Body::Request(Request::Subscribe))
            .to_bytes()
            .unwrap();
        bytes[..4].copy_from_slice(&IO_ERROR_MSG_ID.to_be_bytes());
        assert_eq!(
            Msg::from_bytes(bytes),
            Err(CodecError::ReservedMsgId(IO_ERROR_MSG_ID))
        );

        let ping = Msg::new(IO_ERROR_MSG_ID, Body::Ping(1));
        assert_eq!(round_trip(&ping), ping);
    }

    #[test]
    fn failed_body_leaves_buffer_untouched() {
        let mut buf = ByteBuffer::alloc(0);
        Msg::new(1, Body::Ping(9)).serialize(&mut buf).unwrap();
        let written = buf.shared_view().to_vec();

        // Amounts past i64 cannot be encoded.
        let huge = &Asset::new(i64::MAX) + &Asset::new(1);
        let msg = Msg::new(
            2,
            Body::Response(Response::GetAddressInfo(AddressInfo {
                net_fee: Asset::zero(),
                addr_fee: Asset::zero(),
                balance: huge,
            })),
        );
        assert!(matches!(
            msg.serialize(&mut buf),
            Err(CodecError::AssetOverflow(_))
        ));
        assert_eq!(buf.offset(), written.len());
        assert_eq!(buf.shared_view(), written.as_slice());
    }

    #[test]
    fn unknown_body() {
        let err = Msg::from_bytes(vec![0, 0, 0, 1, 0xee]).unwrap_err();
        assert_eq!(err.to_string(), "unknown msg body id: 238");
    }

    #[test]
    fn truncated_envelope() {
        assert!(matches!(
            Msg::from_bytes(vec![0, 0, 0]),
            Err(CodecError::OutOfBounds { .. })
        ));
        assert!(matches!(
            Msg::from_bytes(vec![0, 0, 0, 1, BodyType::Ping as u8, 1, 2]),
            Err(CodecError::OutOfBounds { .. })
        ));
    }
}
