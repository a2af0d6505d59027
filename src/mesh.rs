//! Primitive Bluetooth Mesh identifiers (Company IDs, Model IDs, Key Indexes, TTL).
use core::convert::TryFrom;
use core::fmt::{Display, Error, Formatter};

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct TTL(u8);

const TTL_MASK: u8 = 127;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct TTLConversationError(());

impl TTL {
    /// # Panics
    /// Panics if `v > 127`.
    #[must_use]
    pub fn new(v: u8) -> TTL {
        assert!(
            v <= TTL_MASK,
            "TTL {} is bigger than max TTL {}",
            v,
            TTL_MASK
        );
        TTL(v)
    }
    /// Creates a 7 bit TTL by masking out the 8th bit from a u8
    #[must_use]
    pub const fn from_masked_u8(v: u8) -> TTL {
        TTL(v & TTL_MASK)
    }
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}
impl TryFrom<u8> for TTL {
    type Error = TTLConversationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > TTL_MASK {
            Err(TTLConversationError(()))
        } else {
            Ok(TTL(value))
        }
    }
}
impl Display for TTL {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "TTL({})", self.0)
    }
}

/// Bluetooth SIG assigned Company Identifier. Only present on vendor models.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanyID(pub u16);
impl CompanyID {
    pub const fn byte_len() -> usize {
        2
    }
}
impl Display for CompanyID {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:04X}", self.0)
    }
}

/// 16-bit Model Identifier. SIG and vendor models share the same space but vendor models are
/// scoped by their `CompanyID`.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelID(pub u16);
impl ModelID {
    pub const fn byte_len() -> usize {
        2
    }
}
impl Display for ModelID {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:04X}", self.0)
    }
}

const KEY_INDEX_MAX: u16 = (1 << 12) - 1;

/// 12-bit global index of a Network or Application Key.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyIndex(u16);
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct KeyIndexConversationError(());
impl KeyIndex {
    /// # Panics
    /// Panics if `index > 0x0FFF`.
    #[must_use]
    pub fn new(index: u16) -> KeyIndex {
        match KeyIndex::try_from(index) {
            Ok(i) => i,
            Err(_) => panic!("key index {} is bigger than max {}", index, KEY_INDEX_MAX),
        }
    }
    #[must_use]
    pub const fn new_masked(index: u16) -> KeyIndex {
        KeyIndex(index & KEY_INDEX_MAX)
    }
}
impl TryFrom<u16> for KeyIndex {
    type Error = KeyIndexConversationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value > KEY_INDEX_MAX {
            Err(KeyIndexConversationError(()))
        } else {
            Ok(KeyIndex(value))
        }
    }
}
impl From<KeyIndex> for u16 {
    #[must_use]
    fn from(i: KeyIndex) -> Self {
        i.0
    }
}
impl Display for KeyIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct NetKeyIndex(pub KeyIndex);
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct AppKeyIndex(pub KeyIndex);
impl AppKeyIndex {
    /// # Panics
    /// Panics if `index > 0x0FFF`.
    #[must_use]
    pub fn new(index: u16) -> AppKeyIndex {
        AppKeyIndex(KeyIndex::new(index))
    }
}
impl NetKeyIndex {
    /// # Panics
    /// Panics if `index > 0x0FFF`.
    #[must_use]
    pub fn new(index: u16) -> NetKeyIndex {
        NetKeyIndex(KeyIndex::new(index))
    }
}
impl Display for AppKeyIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "AppKeyIndex({})", self.0)
    }
}
impl Display for NetKeyIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "NetKeyIndex({})", self.0)
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl() {
        assert_eq!(TTL::new(5).value(), 5);
        assert!(TTL::try_from(127).is_ok());
        assert!(TTL::try_from(128).is_err());
        assert_eq!(TTL::from_masked_u8(0xFF).value(), 127);
    }
    #[test]
    #[should_panic]
    fn test_ttl_out_of_range() {
        let _ = TTL::new(128);
    }
    #[test]
    fn test_key_index_range() {
        assert_eq!(u16::from(KeyIndex::new(0x0FFF)), 0x0FFF);
        assert!(KeyIndex::try_from(0x1000).is_err());
        assert_eq!(KeyIndex::new_masked(0x1001), KeyIndex::new(1));
    }
}
