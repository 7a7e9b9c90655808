//! Width/lsb addressed bit fields inside a 64-bit word
//!
//! Fields are described by their `width` in bits and the position of their least significant bit
//! `lsb` (0 being the least significant bit of the word). Invalid field geometry is a bug in the
//! caller and panics, a value that doesn't fit its field is reported as an [`OverflowError`].

/// A value did not fit into the bit field it was supposed to be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value {value} does not fit into a {width} bit field")]
pub struct OverflowError {
    pub width: u32,
    pub value: i128,
}

#[inline(always)]
fn assert_width(width: u32) {
    assert!(
        (1..=64).contains(&width),
        "field width must be within 1..=64, got {width}"
    );
}

#[inline(always)]
fn assert_field(width: u32, lsb: u32) {
    assert!(width <= 64, "field width must be at most 64, got {width}");
    assert!(
        lsb <= 64 - width,
        "field of width {width} at lsb {lsb} does not fit into 64 bits"
    );
}

/// Mask with the lowest `width` bits set, `width` must be within 1..=64
#[inline(always)]
fn low_mask(width: u32) -> u64 {
    u64::MAX >> (64 - width)
}

/// Returns true if `n` can be represented as an unsigned integer of `width` bits
///
/// # Panics
///
/// If `width` is not within 1..=64
pub fn fits_unsigned(n: u64, width: u32) -> bool {
    assert_width(width);

    width == 64 || n >> width == 0
}

/// Returns true if `n` can be represented as a two's complement integer of `width` bits
///
/// # Panics
///
/// If `width` is not within 1..=64
pub fn fits_signed(n: i64, width: u32) -> bool {
    assert_width(width);

    if width == 64 {
        return true;
    }

    let max = (1i64 << (width - 1)) - 1;
    let min = -(1i64 << (width - 1));

    (min..=max).contains(&n)
}

/// Extract the zero-extended field of `width` bits starting at `lsb`
///
/// # Panics
///
/// If `width > 64` or `width + lsb > 64`
pub fn get_unsigned(word: u64, width: u32, lsb: u32) -> u64 {
    assert_field(width, lsb);

    if width == 0 {
        return 0;
    }

    (word >> lsb) & low_mask(width)
}

/// Extract the field of `width` bits starting at `lsb`, sign-extended from its highest bit
///
/// # Panics
///
/// If `width > 64` or `width + lsb > 64`
pub fn get_signed(word: u64, width: u32, lsb: u32) -> i64 {
    let raw = get_unsigned(word, width, lsb);

    if width == 0 {
        return 0;
    }

    let shift = 64 - width;
    ((raw << shift) as i64) >> shift
}

/// Return `word` with the field of `width` bits at `lsb` replaced by `value`
///
/// All bits outside the field are kept as they are.
///
/// # Panics
///
/// If `width > 64` or `width + lsb > 64`
pub fn set_unsigned(word: u64, width: u32, lsb: u32, value: u64) -> Result<u64, OverflowError> {
    assert_field(width, lsb);

    let overflow = OverflowError {
        width,
        value: i128::from(value),
    };

    if width == 0 {
        return if value == 0 { Ok(word) } else { Err(overflow) };
    }

    if !fits_unsigned(value, width) {
        return Err(overflow);
    }

    Ok(insert(word, width, lsb, value))
}

/// Return `word` with the field of `width` bits at `lsb` replaced by the two's complement
/// representation of `value`
///
/// All bits outside the field are kept as they are.
///
/// # Panics
///
/// If `width > 64` or `width + lsb > 64`
pub fn set_signed(word: u64, width: u32, lsb: u32, value: i64) -> Result<u64, OverflowError> {
    assert_field(width, lsb);

    let overflow = OverflowError {
        width,
        value: i128::from(value),
    };

    if width == 0 {
        return if value == 0 { Ok(word) } else { Err(overflow) };
    }

    if !fits_signed(value, width) {
        return Err(overflow);
    }

    Ok(insert(word, width, lsb, value as u64 & low_mask(width)))
}

#[inline(always)]
fn insert(word: u64, width: u32, lsb: u32, bits: u64) -> u64 {
    let mask = low_mask(width) << lsb;

    (word & !mask) | (bits << lsb)
}
