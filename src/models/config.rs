//! Configuration messages the group control screen has to recognise. A Config Node Reset reaching
//! the local node means it was removed from the network remotely.
use crate::access::{Opcode, SigOpcode};
use crate::models::{MeshMessage, MessagePackError, UnpackableMessage};

pub const NODE_RESET: Opcode = Opcode::SIG(SigOpcode::DoubleOctet(0x8049));
pub const NODE_RESET_STATUS: Opcode = Opcode::SIG(SigOpcode::DoubleOctet(0x804A));

/// Config Node Reset. No parameters.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct NodeReset;
/// Config Node Reset Status. No parameters.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct NodeResetStatus;

fn unpack_empty<M>(buffer: &[u8], message: M) -> Result<M, MessagePackError> {
    if buffer.is_empty() {
        Ok(message)
    } else {
        Err(MessagePackError::BadLength)
    }
}
impl MeshMessage for NodeReset {
    fn opcode(&self) -> Opcode {
        NODE_RESET
    }
    fn message_size(&self) -> usize {
        0
    }
    fn pack_into(&self, _buffer: &mut [u8]) -> Result<(), MessagePackError> {
        Ok(())
    }
}
impl UnpackableMessage for NodeReset {
    const OPCODE: Opcode = NODE_RESET;
    fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError> {
        unpack_empty(buffer, NodeReset)
    }
}
impl MeshMessage for NodeResetStatus {
    fn opcode(&self) -> Opcode {
        NODE_RESET_STATUS
    }
    fn message_size(&self) -> usize {
        0
    }
    fn pack_into(&self, _buffer: &mut [u8]) -> Result<(), MessagePackError> {
        Ok(())
    }
}
impl UnpackableMessage for NodeResetStatus {
    const OPCODE: Opcode = NODE_RESET_STATUS;
    fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError> {
        unpack_empty(buffer, NodeResetStatus)
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_reset() {
        let payload = NodeReset.to_access_payload().unwrap();
        assert_eq!(payload.to_bytes().unwrap(), vec![0x80, 0x49]);
        assert!(NodeReset::unpack_from(&[0x00]).is_err());
        assert_eq!(NodeResetStatus::unpack_from(&[]), Ok(NodeResetStatus));
    }
}
