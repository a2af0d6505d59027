//! Access Layer primitives: Opcodes and Model Identifiers. The screen only deals with the most
//! surface layer of the stack, everything under it is the network manager's job.
use crate::mesh::{CompanyID, ModelID};
use core::fmt::{Display, Error, Formatter};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub enum SigOpcode {
    SingleOctet(u8),
    DoubleOctet(u16),
}
impl SigOpcode {
    pub fn byte_len(&self) -> usize {
        match self {
            SigOpcode::SingleOctet(_) => 1,
            SigOpcode::DoubleOctet(_) => 2,
        }
    }
}
impl From<SigOpcode> for Opcode {
    fn from(opcode: SigOpcode) -> Self {
        Opcode::SIG(opcode)
    }
}
const VENDOR_OPCODE_MAX: u8 = (1u8 << 6) - 1;
/// 6 bit Vendor Opcode
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct VendorOpcode(u8);
impl VendorOpcode {
    /// # Panics
    /// Panics if `opcode` doesn't fit in 6 bits.
    pub fn new(opcode: u8) -> Self {
        assert!(opcode <= VENDOR_OPCODE_MAX);
        VendorOpcode(opcode)
    }
}
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct OpcodeConversationError(pub ());
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub enum Opcode {
    SIG(SigOpcode),
    Vendor(VendorOpcode, CompanyID),
}
impl Opcode {
    pub fn company_id(&self) -> Option<CompanyID> {
        match self {
            Opcode::Vendor(_, cid) => Some(*cid),
            _ => None,
        }
    }
    pub fn is_sig(&self) -> bool {
        self.company_id().is_none()
    }
    pub fn byte_len(&self) -> usize {
        match self {
            Opcode::SIG(o) => o.byte_len(),
            Opcode::Vendor(_, _) => 3,
        }
    }
    pub const fn max_byte_len() -> usize {
        3
    }
    /// Unpacks the opcode from the start of an access payload. Returns the opcode and how many
    /// bytes it took up.
    pub fn unpack_from(bytes: &[u8]) -> Result<(Self, usize), OpcodeConversationError> {
        let first = *bytes.first().ok_or(OpcodeConversationError(()))?;
        if first == 0x7F {
            // This opcode is RFU
            Err(OpcodeConversationError(()))
        } else if first & 0x80 == 0 {
            Ok((SigOpcode::SingleOctet(first).into(), 1))
        } else if first & 0xC0 == 0xC0 {
            if bytes.len() < 3 {
                return Err(OpcodeConversationError(()));
            }
            let vendor_opcode = VendorOpcode(first & VENDOR_OPCODE_MAX);
            let company_id = CompanyID(u16::from_le_bytes([bytes[1], bytes[2]]));
            Ok((Opcode::Vendor(vendor_opcode, company_id), 3))
        } else {
            if bytes.len() < 2 {
                return Err(OpcodeConversationError(()));
            }
            Ok((
                SigOpcode::DoubleOctet(u16::from_be_bytes([first, bytes[1]])).into(),
                2,
            ))
        }
    }
    pub fn pack_into(&self, buffer: &mut [u8]) -> Result<(), OpcodeConversationError> {
        if buffer.len() < self.byte_len() {
            return Err(OpcodeConversationError(()));
        }
        match *self {
            Opcode::SIG(SigOpcode::SingleOctet(s)) => {
                if s & 0x80 != 0 || s == 0x7F {
                    return Err(OpcodeConversationError(()));
                }
                buffer[0] = s;
            }
            Opcode::SIG(SigOpcode::DoubleOctet(d)) => {
                if d & 0xC000 != 0x8000 {
                    return Err(OpcodeConversationError(()));
                }
                buffer[..2].copy_from_slice(&d.to_be_bytes());
            }
            Opcode::Vendor(opcode, company_id) => {
                buffer[0] = opcode.0 | 0xC0;
                buffer[1..3].copy_from_slice(&company_id.0.to_le_bytes());
            }
        }
        Ok(())
    }
}
impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Opcode::SIG(SigOpcode::SingleOctet(o)) => write!(f, "{:02X}", o),
            Opcode::SIG(SigOpcode::DoubleOctet(o)) => write!(f, "{:04X}", o),
            Opcode::Vendor(o, cid) => write!(f, "{:02X}:{}", o.0 | 0xC0, cid),
        }
    }
}
/// SIG (`company_id == None`) or vendor model identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelIdentifier {
    model_id: ModelID,
    company_id: Option<CompanyID>,
}
impl ModelIdentifier {
    pub const fn new_sig(sig_model_id: ModelID) -> ModelIdentifier {
        ModelIdentifier {
            model_id: sig_model_id,
            company_id: None,
        }
    }
    /// Creates a new vendor model from a `ModelID` and Bluetooth `CompanyID`
    pub const fn new_vendor(model_id: ModelID, company_id: CompanyID) -> ModelIdentifier {
        ModelIdentifier {
            model_id,
            company_id: Some(company_id),
        }
    }
    /// Returns the `ModelID` of the model.
    pub fn model_id(&self) -> ModelID {
        self.model_id
    }
    /// Returns the `CompanyID` of the vendor model or `None` if it's a SIG model.
    pub fn company_id(&self) -> Option<CompanyID> {
        self.company_id
    }
    /// Returns if the `ModelIdentifier` is a Bluetooth SIG assigned model.
    pub fn is_sig(&self) -> bool {
        self.company_id.is_none()
    }
    /// Returns if the `ModelIdentifier` is a vendor model.
    pub fn is_vendor(&self) -> bool {
        !self.is_sig()
    }
    /// 32-bit identifier with the `CompanyID` in the high half and the `ModelID` in the low half.
    /// SIG models use `0` as their company.
    /// ```
    /// use mesh_group_control::access::ModelIdentifier;
    /// use mesh_group_control::mesh::{CompanyID, ModelID};
    /// assert_eq!(ModelIdentifier::new_sig(ModelID(0x1000)).composite_id(), 0x0000_1000);
    /// assert_eq!(
    ///     ModelIdentifier::new_vendor(ModelID(0x0001), CompanyID(0x0059)).composite_id(),
    ///     0x0059_0001
    /// );
    /// ```
    pub fn composite_id(&self) -> u32 {
        let company_id = self.company_id.map_or(0, |c| c.0);
        (u32::from(company_id) << 16) | u32::from(self.model_id.0)
    }
    /// Inverse of [`ModelIdentifier::composite_id`]. A zero high half is read back as a SIG model.
    pub fn from_composite(id: u32) -> ModelIdentifier {
        let model_id = ModelID((id & 0xFFFF) as u16);
        match (id >> 16) as u16 {
            0 => Self::new_sig(model_id),
            company_id => Self::new_vendor(model_id, CompanyID(company_id)),
        }
    }
}
impl Display for ModelIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:08X}", self.composite_id())
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_id() {
        let sig = ModelIdentifier::new_sig(ModelID(0x1000));
        assert_eq!(sig.composite_id(), 0x0000_1000);
        let vendor = ModelIdentifier::new_vendor(ModelID(0x0001), CompanyID(0x0059));
        assert_eq!(vendor.composite_id(), 0x0059_0001);
        assert_eq!(ModelIdentifier::from_composite(0x0059_0001), vendor);
        assert_eq!(ModelIdentifier::from_composite(0x0000_1000), sig);
        assert_eq!(vendor.to_string(), "00590001");
    }
    #[test]
    fn test_double_octet_opcode() {
        let opcode: Opcode = SigOpcode::DoubleOctet(0x8202).into();
        let mut buf = [0_u8; 2];
        opcode.pack_into(&mut buf).unwrap();
        assert_eq!(buf, [0x82, 0x02]);
        assert_eq!(Opcode::unpack_from(&buf), Ok((opcode, 2)));
    }
    #[test]
    fn test_vendor_opcode() {
        let opcode = Opcode::Vendor(VendorOpcode::new(0x01), CompanyID(0x0059));
        let mut buf = [0_u8; 3];
        opcode.pack_into(&mut buf).unwrap();
        assert_eq!(buf, [0xC1, 0x59, 0x00]);
        assert_eq!(Opcode::unpack_from(&buf[..]), Ok((opcode, 3)));
        assert!(opcode.pack_into(&mut buf[..2]).is_err());
    }
    #[test]
    fn test_bad_opcodes() {
        assert!(Opcode::unpack_from(&[]).is_err());
        assert!(Opcode::unpack_from(&[0x7F]).is_err());
        assert!(Opcode::unpack_from(&[0x82]).is_err());
        let bad: Opcode = SigOpcode::DoubleOctet(0x0202).into();
        assert!(bad.pack_into(&mut [0_u8; 2]).is_err());
    }
}
