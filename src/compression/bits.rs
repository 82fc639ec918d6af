//! Conversion between '0'/'1' strings and MSB-first packed bytes.
//!
//! The packed form carries no length, so a final partial byte is completed
//! with zero bits that [`unpack`] cannot tell apart from real data. Callers
//! that need the exact bit count have to keep it themselves.

use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Pack a string of '0'/'1' characters into bytes, first bit in the MSB.
///
/// # Example
///
/// ```
/// use classic_codecs::compression::bits::pack;
///
/// assert_eq!(pack("101").unwrap(), vec![0b1010_0000]);
/// assert_eq!(pack("0000000111").unwrap(), vec![0b0000_0001, 0b1100_0000]);
/// ```
pub fn pack(bits: &str) -> Result<Vec<u8>> {
    let mut packed: BitVec<u8, Msb0> = BitVec::with_capacity(bits.len());
    for (position, ch) in bits.chars().enumerate() {
        match ch {
            '0' => packed.push(false),
            '1' => packed.push(true),
            _ => return Err(Error::InvalidBit { ch, position }),
        }
    }
    // Padding bits of the last byte must read back as zero.
    packed.set_uninitialized(false);
    Ok(packed.into_vec())
}

/// Expand bytes into a string of exactly `8 * bytes.len()` '0'/'1' characters.
pub fn unpack(bytes: &[u8]) -> String {
    bytes
        .view_bits::<Msb0>()
        .iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_full_bytes() {
        assert_eq!(pack("1000000011111111").unwrap(), vec![0x80, 0xFF]);
    }

    #[test]
    fn test_pack_pads_low_bits_with_zero() {
        assert_eq!(pack("1").unwrap(), vec![0x80]);
        assert_eq!(pack("111111111").unwrap(), vec![0xFF, 0x80]);
    }

    #[test]
    fn test_pack_empty() {
        assert!(pack("").unwrap().is_empty());
        assert!(unpack(&[]).is_empty());
    }

    #[test]
    fn test_pack_rejects_other_characters() {
        match pack("01a1") {
            Err(Error::InvalidBit { ch, position }) => {
                assert_eq!(ch, 'a');
                assert_eq!(position, 2);
            }
            other => panic!("expected InvalidBit, got {:?}", other),
        }
    }

    #[test]
    fn test_unpack_emits_eight_bits_per_byte() {
        assert_eq!(unpack(&[0xA5, 0x01]), "1010010100000001");
    }

    #[test]
    fn test_unpack_restores_padded_bits() {
        let bits = "1101101";
        let unpacked = unpack(&pack(bits).unwrap());
        assert_eq!(unpacked.len(), 8);
        assert!(unpacked.starts_with(bits));
        assert!(unpacked.ends_with('0'));
    }
}
