//! Bluetooth Mesh Addresses.
//! Only the 16-bit address kinds the group control screen deals with are modeled here. Messages are
//! sent to Group Addresses and delivery reports come back from Unicast Addresses.
//!
//! | Bits (16)             | Type          |
//! | --------------------- | ------------- |
//! | 0b0000 0000 0000 0000 | Unassigned    |
//! | 0b0xxx xxxx xxxx xxxx | Unicast       |
//! | 0b10xx xxxx xxxx xxxx | Virtual       |
//! | 0b11xx xxxx xxxx xxxx | Group         |
use core::convert::TryFrom;
use core::fmt::{Display, Error, Formatter};

pub const ADDRESS_LEN: usize = 2;

const UNICAST_BIT: u16 = 0x8000;
const GROUP_BITS: u16 = 0xC000;

/// Element Unicast Address. Each Element has one Unicast assigned to it.
#[cfg_attr(
    feature = "serde-1",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct UnicastAddress(u16);
/// Group Address. Some Group Address are reserved.
///
/// | Values        | Group Name    |
/// | ------------- | ------------- |
/// | 0xFF00-0xFFFB | RFU           |
/// | 0xFFFC        | All Proxies   |
/// | 0xFFFD        | All Friends   |
/// | 0xFFFE        | All Relays    |
/// | 0xFFFF        | All Nodes     |
#[cfg_attr(
    feature = "serde-1",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u16", into = "u16")
)]
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct GroupAddress(u16);
impl GroupAddress {
    /// # Panics
    /// Panics if `group_address` isn't a valid group address.
    #[must_use]
    pub fn new(group_address: u16) -> Self {
        match Self::try_from(group_address) {
            Ok(g) => g,
            Err(_) => panic!("invalid group address given"),
        }
    }
    /// Creates a Group address by setting the two group bits on any u16.
    #[must_use]
    pub const fn from_masked_u16(v: u16) -> GroupAddress {
        GroupAddress(v | GROUP_BITS)
    }
    /// Group address corresponding to all proxies nodes.
    pub const fn all_proxies() -> GroupAddress {
        GroupAddress(0xFFFC)
    }
    /// Group address corresponding to all friends nodes.
    pub const fn all_friends() -> GroupAddress {
        GroupAddress(0xFFFD)
    }
    /// Group address corresponding to all relay nodes.
    pub const fn all_relays() -> GroupAddress {
        GroupAddress(0xFFFE)
    }
    /// Group address corresponding to all nodes.
    pub const fn all_nodes() -> GroupAddress {
        GroupAddress(0xFFFF)
    }
    /// Returns if the address is one of the fixed (`0xFF00..=0xFFFF`) group addresses.
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        self.0 >= 0xFF00
    }
}
impl UnicastAddress {
    /// Creates a new `UnicastAddress`.
    /// # Panics
    /// Panics if the `u16` is not a valid `UnicastAddress`. (Panics if `u16==0 || u16&UNICAST_BIT!=0`)
    #[must_use]
    pub fn new(v: u16) -> UnicastAddress {
        assert!(
            (v & UNICAST_BIT) == 0 && v != 0,
            "non unicast address '{}'",
            v
        );
        UnicastAddress(v)
    }
}
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct AddressError(());
impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.write_str("invalid address")
    }
}
impl TryFrom<u16> for UnicastAddress {
    type Error = AddressError;

    fn try_from(v: u16) -> Result<UnicastAddress, Self::Error> {
        if v != 0 && v & UNICAST_BIT == 0 {
            Ok(UnicastAddress(v))
        } else {
            Err(AddressError(()))
        }
    }
}
impl TryFrom<u16> for GroupAddress {
    type Error = AddressError;

    fn try_from(v: u16) -> Result<GroupAddress, Self::Error> {
        if v & GROUP_BITS == GROUP_BITS {
            Ok(GroupAddress(v))
        } else {
            Err(AddressError(()))
        }
    }
}
impl From<UnicastAddress> for u16 {
    #[must_use]
    fn from(v: UnicastAddress) -> Self {
        v.0
    }
}
impl From<GroupAddress> for u16 {
    #[must_use]
    fn from(v: GroupAddress) -> Self {
        v.0
    }
}
impl Display for UnicastAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:04X}", self.0)
    }
}
impl Display for GroupAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:04X}", self.0)
    }
}

/// Any 16-bit destination or source address.
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Address {
    Unassigned,
    Unicast(UnicastAddress),
    Group(GroupAddress),
}
impl Address {
    #[must_use]
    pub fn unicast(&self) -> Option<UnicastAddress> {
        match self {
            Address::Unicast(u) => Some(*u),
            _ => None,
        }
    }
    #[must_use]
    pub fn group(&self) -> Option<GroupAddress> {
        match self {
            Address::Group(g) => Some(*g),
            _ => None,
        }
    }
}
impl TryFrom<u16> for Address {
    type Error = AddressError;

    /// Virtual Address hashes (`0b10xx...`) aren't supported and return an `AddressError`.
    fn try_from(v: u16) -> Result<Self, Self::Error> {
        if v == 0 {
            Ok(Address::Unassigned)
        } else if let Ok(u) = UnicastAddress::try_from(v) {
            Ok(Address::Unicast(u))
        } else {
            Ok(Address::Group(GroupAddress::try_from(v)?))
        }
    }
}
impl From<UnicastAddress> for Address {
    fn from(u: UnicastAddress) -> Self {
        Address::Unicast(u)
    }
}
impl From<GroupAddress> for Address {
    fn from(g: GroupAddress) -> Self {
        Address::Group(g)
    }
}
impl From<&Address> for u16 {
    #[must_use]
    fn from(a: &Address) -> Self {
        match a {
            Address::Unassigned => 0,
            Address::Unicast(u) => u.0,
            Address::Group(g) => g.0,
        }
    }
}
impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:04X}", u16::from(self))
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_kinds() {
        assert_eq!(Address::try_from(0), Ok(Address::Unassigned));
        assert_eq!(
            Address::try_from(0x0001),
            Ok(Address::Unicast(UnicastAddress::new(1)))
        );
        assert_eq!(
            Address::try_from(0xC000),
            Ok(Address::Group(GroupAddress::new(0xC000)))
        );
        assert!(Address::try_from(0x8001).is_err());
    }
    #[test]
    fn test_fixed_groups() {
        assert!(GroupAddress::all_nodes().is_fixed());
        assert_eq!(u16::from(GroupAddress::all_relays()), 0xFFFE);
        assert!(!GroupAddress::new(0xC001).is_fixed());
        assert_eq!(GroupAddress::from_masked_u16(0x0001), GroupAddress::new(0xC001));
    }
    #[test]
    #[should_panic]
    fn test_unassigned_unicast() {
        let _ = UnicastAddress::new(0);
    }
}
