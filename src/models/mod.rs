//! Access messages the group control screen sends and recognises.
use crate::access::{ModelIdentifier, Opcode};
use crate::mesh::ModelID;
use core::fmt::{Display, Error, Formatter};

pub mod config;
pub mod generics;

/// Generic OnOff Server (`0x1000`).
pub const GENERIC_ONOFF_SERVER: ModelIdentifier = ModelIdentifier::new_sig(ModelID(0x1000));
/// Generic Level Server (`0x1002`).
pub const GENERIC_LEVEL_SERVER: ModelIdentifier = ModelIdentifier::new_sig(ModelID(0x1002));

/// Error when trying to pack a message into a byte buffer.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub enum MessagePackError {
    /// Byte Buffer too small to fit the whole message.
    SmallBuffer,
    /// Incoming Byte Buffer length doesn't make sense.
    BadLength,
    /// Incoming Byte Buffer creates an invalid message.
    BadBytes,
    /// Message can't be packed because the object is in a bad state.
    BadState,
}
impl Display for MessagePackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.write_str(match self {
            MessagePackError::SmallBuffer => "buffer too small",
            MessagePackError::BadLength => "bad message length",
            MessagePackError::BadBytes => "malformed message",
            MessagePackError::BadState => "message in a bad state",
        })
    }
}

/// An Access Message that can be packed into a (little endian) byte buffer. Object safe so the
/// grid cells can hand any message to the screen.
pub trait MeshMessage {
    fn opcode(&self) -> Opcode;
    /// Bytes need to fit the entire message in bytes (excluding opcode).
    fn message_size(&self) -> usize;
    /// Pack the message into the byte buffer (without the opcode). If the length of the buffer is
    /// too small or the object is in a bad state, return `MessagePackError`.
    fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError>;
    /// Packs the opcode and the parameters into an owned [`AccessPayload`].
    fn to_access_payload(&self) -> Result<AccessPayload, MessagePackError> {
        let mut parameters = vec![0_u8; self.message_size()];
        self.pack_into(&mut parameters[..])?;
        Ok(AccessPayload {
            opcode: self.opcode(),
            parameters,
        })
    }
}
/// Message with a fixed opcode that can be recognised in an incoming [`AccessPayload`].
pub trait UnpackableMessage: MeshMessage + Sized {
    const OPCODE: Opcode;
    /// Unpack the message from the byte buffer (without the opcode). Make sure to check for a valid
    /// message or return a `MessagePackError` otherwise.
    fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError>;
}

/// Opcode + parameters of an access message. What actually travels between the screen and the
/// network manager.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct AccessPayload {
    pub opcode: Opcode,
    pub parameters: Vec<u8>,
}
impl AccessPayload {
    pub fn new(opcode: Opcode, parameters: Vec<u8>) -> Self {
        Self { opcode, parameters }
    }
    pub fn byte_len(&self) -> usize {
        self.opcode.byte_len() + self.parameters.len()
    }
    /// Returns if the payload carries an `M` message.
    pub fn is<M: UnpackableMessage>(&self) -> bool {
        self.opcode == M::OPCODE
    }
    pub fn unpack<M: UnpackableMessage>(&self) -> Result<M, MessagePackError> {
        if !self.is::<M>() {
            return Err(MessagePackError::BadBytes);
        }
        M::unpack_from(&self.parameters[..])
    }
    /// Opcode followed by the parameters, ready for the upper transport layer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessagePackError> {
        let mut out = vec![0_u8; self.byte_len()];
        let opcode_len = self.opcode.byte_len();
        out[opcode_len..].copy_from_slice(&self.parameters[..]);
        self.opcode
            .pack_into(&mut out[..opcode_len])
            .map_err(|_| MessagePackError::BadState)?;
        Ok(out)
    }
    pub fn unpack_from(bytes: &[u8]) -> Result<Self, MessagePackError> {
        let (opcode, opcode_len) =
            Opcode::unpack_from(bytes).map_err(|_| MessagePackError::BadBytes)?;
        Ok(Self::new(opcode, bytes[opcode_len..].to_vec()))
    }
}
impl Display for AccessPayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}:", self.opcode)?;
        for b in &self.parameters {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
#[cfg(test)]
mod tests {
    use super::config::NodeReset;
    use super::generics::onoff;
    use super::*;

    #[test]
    fn test_payload_bytes() {
        let payload = onoff::SetUnacknowledged::new(true, 5)
            .to_access_payload()
            .unwrap();
        let bytes = payload.to_bytes().unwrap();
        assert_eq!(bytes, vec![0x82, 0x03, 0x01, 0x05]);
        assert_eq!(AccessPayload::unpack_from(&bytes), Ok(payload));
    }
    #[test]
    fn test_payload_is() {
        let payload = AccessPayload::unpack_from(&[0x80, 0x49]).unwrap();
        assert!(payload.is::<NodeReset>());
        assert_eq!(payload.unpack::<NodeReset>(), Ok(NodeReset));
        assert!(!payload.is::<onoff::Status>());
        assert!(payload.unpack::<onoff::Status>().is_err());
    }
    #[test]
    fn test_well_known_models() {
        assert_eq!(GENERIC_ONOFF_SERVER.composite_id(), 0x1000);
        assert_eq!(GENERIC_LEVEL_SERVER.composite_id(), 0x1002);
    }
}
