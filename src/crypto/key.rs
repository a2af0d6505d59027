//! 128-bit Mesh Keys.
use crate::crypto::hex_16_to_array;
use crate::random;
use core::convert::{TryFrom, TryInto};
use core::fmt::{Error, Formatter, LowerHex, UpperHex};
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use subtle::ConstantTimeEq;

pub const KEY_LEN: usize = 16;

/// 128-bit AES Key. Compared in constant time.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct Key([u8; KEY_LEN]);
pub const ZERO_KEY: Key = Key([0_u8; KEY_LEN]);

impl Key {
    #[must_use]
    pub const fn new(key_bytes: [u8; KEY_LEN]) -> Key {
        Key(key_bytes)
    }
    pub fn from_hex(hex: &str) -> Option<Key> {
        Some(Key::new(hex_16_to_array(hex)?))
    }
    #[must_use]
    pub fn random_secure() -> Key {
        Key(random::rand_16_bytes())
    }
    #[must_use]
    pub const fn into_bytes(self) -> [u8; KEY_LEN] {
        self.0
    }
}
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}
impl Eq for Key {}
impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}
impl TryFrom<&[u8]> for Key {
    type Error = core::array::TryFromSliceError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Ok(Key::new(value.try_into()?))
    }
}
impl AsRef<[u8]> for Key {
    #[must_use]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
impl UpperHex for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for &b in &self.0 {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
impl LowerHex for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for &b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct KeyError(());
impl core::fmt::Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        f.write_str("expected a 128-bit hex key")
    }
}
impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::from_hex(s).ok_or(KeyError(()))
    }
}
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct AppKey(Key);
impl AppKey {
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self(key)
    }
    #[must_use]
    pub fn new_bytes(key_bytes: [u8; KEY_LEN]) -> Self {
        Self::new(Key::new(key_bytes))
    }
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        Some(Self::new(Key::from_hex(hex)?))
    }
    #[must_use]
    pub fn random_secure() -> Self {
        Self(Key::random_secure())
    }
    pub const fn key(&self) -> &Key {
        &self.0
    }
}
impl From<Key> for AppKey {
    fn from(k: Key) -> Self {
        Self(k)
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_hex() {
        let key: Key = "3216d1509884b533248541792b877f98".parse().unwrap();
        assert_eq!(format!("{:x}", key), "3216d1509884b533248541792b877f98");
        assert_eq!(format!("{:X}", key), "3216D1509884B533248541792B877F98");
        assert!("3216".parse::<Key>().is_err());
    }
    #[test]
    fn test_random_keys_differ() {
        assert_ne!(AppKey::random_secure(), AppKey::random_secure());
    }
}
