//! Helpers for the skipped L1 message bitmap.
//!
//! The bitmap is a sequence of 32-byte words, each read as a big-endian 256-bit integer. The
//! L1 message at relative index `i` maps to bit `i % 256` of word `i / 256`.

use crate::{
    decoding::constants::{
        SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS, SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE,
    },
    CodecError, DecodingError,
};

use std::vec::Vec;

/// Returns the byte offset and bit mask of the relative index in the bitmap.
const fn bit_position(index: u64) -> (usize, u8) {
    let word = (index / SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS) as usize;
    let bit = (index % SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS) as usize;
    let byte = word * SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE +
        (SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE - 1 - bit / 8);
    (byte, 1 << (bit % 8))
}

/// Returns the length in bytes of the bitmap for the amount of popped L1 messages.
pub(crate) const fn bitmap_len(l1_message_popped: u64) -> usize {
    l1_message_popped.div_ceil(SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS) as usize *
        SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE
}

/// Marks the L1 message at the relative index as skipped.
pub(crate) fn set_l1_message_skipped(bitmap: &mut [u8], index: u64) -> Result<(), CodecError> {
    let (byte, mask) = bit_position(index);
    let bits = bitmap.len() as u64 * 8;
    let item = bitmap.get_mut(byte).ok_or(CodecError::BitmapIndexOutOfRange { index, bits })?;
    *item |= mask;
    Ok(())
}

/// Returns true if the L1 message at the relative index is marked as skipped in the bitmap.
pub fn is_l1_message_skipped(bitmap: &[u8], index: u64) -> Result<bool, CodecError> {
    let (byte, mask) = bit_position(index);
    let bits = bitmap.len() as u64 * 8;
    let item = bitmap.get(byte).ok_or(CodecError::BitmapIndexOutOfRange { index, bits })?;
    Ok(item & mask != 0)
}

/// Validates the raw skipped L1 message bitmap covers the amount of popped L1 messages.
pub fn decode_skipped_bitmap(bitmap: &[u8], l1_message_popped: u64) -> Result<Vec<u8>, DecodingError> {
    let length = bitmap.len();
    if length % SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE != 0 ||
        (length as u64) * 8 < l1_message_popped
    {
        return Err(DecodingError::InvalidBitmapLength { length, popped: l1_message_popped })
    }
    Ok(bitmap.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_should_set_first_bits_in_last_byte() -> eyre::Result<()> {
        let mut bitmap = vec![0u8; bitmap_len(10)];
        for i in 0..10 {
            set_l1_message_skipped(&mut bitmap, i)?;
        }

        assert_eq!(bitmap.len(), 32);
        assert_eq!(bitmap[31], 0xff);
        assert_eq!(bitmap[30], 0x03);
        assert!(bitmap[..30].iter().all(|b| *b == 0));

        Ok(())
    }

    #[test]
    fn test_is_skipped_inverts_set() -> eyre::Result<()> {
        let popped = 600;
        let mut rng = rand::rng();
        let skipped: Vec<bool> = (0..popped).map(|_| rng.random_bool(0.3)).collect();

        let mut bitmap = vec![0u8; bitmap_len(popped)];
        for (i, skip) in skipped.iter().enumerate() {
            if *skip {
                set_l1_message_skipped(&mut bitmap, i as u64)?;
            }
        }

        for (i, skip) in skipped.iter().enumerate() {
            assert_eq!(is_l1_message_skipped(&bitmap, i as u64)?, *skip, "index {i}");
        }

        Ok(())
    }

    #[test]
    fn test_should_fail_out_of_range_index() {
        let bitmap = vec![0u8; 32];
        assert!(matches!(
            is_l1_message_skipped(&bitmap, 256),
            Err(CodecError::BitmapIndexOutOfRange { index: 256, bits: 256 })
        ));
    }

    #[test]
    fn test_should_validate_bitmap_length() {
        assert_eq!(
            decode_skipped_bitmap(&[0u8; 31], 1),
            Err(DecodingError::InvalidBitmapLength { length: 31, popped: 1 })
        );
        assert_eq!(
            decode_skipped_bitmap(&[0u8; 32], 257),
            Err(DecodingError::InvalidBitmapLength { length: 32, popped: 257 })
        );
        assert_eq!(decode_skipped_bitmap(&[], 0), Ok(vec![]));
    }
}
