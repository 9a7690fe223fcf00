use anyhow::{bail, Result};

/// Width in bits of one encoded operand or product.
pub const BYTE_WIDTH: usize = 8;

/// Encodes `n` as eight 0/1 values, most significant bit first.
///
/// Values outside `0..=255` are rejected here, before they can reach a
/// network's input layer.
pub fn to_binary_array(n: i64) -> Result<[u8; BYTE_WIDTH]> {
    if n < 0 {
        bail!("cannot encode the negative number {n} as a binary array");
    }
    if n > 255 {
        bail!("{n} does not fit the byte-wide binary encoding");
    }
    let mut bits = [0u8; BYTE_WIDTH];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = ((n >> (BYTE_WIDTH - 1 - i)) & 1) as u8;
    }
    Ok(bits)
}

/// Integer value of a big-endian bit slice.
pub fn from_binary_array(bits: &[u8]) -> u32 {
    bits.iter().fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit))
}

/// Collapses one output activation to a bit, thresholding at 0.5.
pub fn to_bit(activation: f64) -> u8 {
    if activation >= 0.5 { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_most_significant_bit_first() {
        assert_eq!(to_binary_array(5).unwrap(), [0, 0, 0, 0, 0, 1, 0, 1]);
        assert_eq!(to_binary_array(128).unwrap(), [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(to_binary_array(0).unwrap(), [0; 8]);
        assert_eq!(to_binary_array(255).unwrap(), [1; 8]);
    }

    #[test]
    fn round_trips_every_byte_value() {
        for n in 0..=255i64 {
            let bits = to_binary_array(n).unwrap();
            assert_eq!(from_binary_array(&bits), n as u32);
        }
    }

    #[test]
    fn rejects_values_outside_one_byte() {
        assert!(to_binary_array(-1).is_err());
        assert!(to_binary_array(256).is_err());
        assert!(to_binary_array(i64::MAX).is_err());
    }

    #[test]
    fn decodes_shorter_slices() {
        assert_eq!(from_binary_array(&[1, 0, 1]), 5);
        assert_eq!(from_binary_array(&[]), 0);
    }

    #[test]
    fn bit_threshold_sits_at_one_half() {
        assert_eq!(to_bit(0.5), 1);
        assert_eq!(to_bit(0.4999), 0);
        assert_eq!(to_bit(-3.0), 0);
        assert_eq!(to_bit(28.0), 1);
    }
}
