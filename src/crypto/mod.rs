//! Key material as stored in the Mesh Network model. Keys are opaque here: deriving and encrypting
//! with them is the network manager's job.
use core::convert::TryFrom;

pub mod key;

/// Helper function to convert a 16 byte (32 character) hex string to 16 byte array.
/// Returns `None` if `hex.len() != 32` or if `hex` contains non-hex characters.
pub fn hex_16_to_array(hex: &str) -> Option<[u8; 16]> {
    if hex.len() != 32 {
        None
    } else {
        let mut out = [0_u8; 16];
        for (pos, c) in hex.chars().enumerate() {
            let value = u8::try_from(c.to_digit(16)?).ok()?;
            let byte_pos = pos / 2;
            if pos % 2 == 1 {
                out[byte_pos] |= value;
            } else {
                out[byte_pos] |= value << 4;
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_16() {
        assert_eq!(
            hex_16_to_array("000102030405060708090a0b0c0d0eff"),
            Some([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0xFF])
        );
        assert_eq!(hex_16_to_array("0001"), None);
        assert_eq!(hex_16_to_array("zz0102030405060708090a0b0c0d0eff"), None);
    }
}
