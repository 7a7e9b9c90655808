//! Packing of [`UncodedWord`]s into 32-bit coded words
//!
//! | field    | width | lsb | signed |
//! |----------|-------|-----|--------|
//! | a        | 9     | 23  | no     |
//! | b        | 5     | 18  | yes    |
//! | c        | 5     | 13  | yes    |
//! | d        | 5     | 8   | yes    |
//! | pb index | 4     | 4   | no     |
//! | pr index | 4     | 0   | no     |
//!
//! The fields cover all 32 bits of the word.

use crate::bitpack::{self, OverflowError};
use crate::block::UncodedWord;
use std::fmt;

/// Fields of a coded word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    A,
    B,
    C,
    D,
    PbIndex,
    PrIndex,
}

impl Field {
    /// Width in bits and position of the least significant bit
    pub const fn layout(self) -> (u32, u32) {
        match self {
            Field::A => (9, 23),
            Field::B => (5, 18),
            Field::C => (5, 13),
            Field::D => (5, 8),
            Field::PbIndex => (4, 4),
            Field::PrIndex => (4, 0),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::A => "a",
            Field::B => "b",
            Field::C => "c",
            Field::D => "d",
            Field::PbIndex => "pb index",
            Field::PrIndex => "pr index",
        };

        f.write_str(name)
    }
}

/// A coefficient did not fit into its field of the coded word
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("failed to pack field {field}: {source}")]
pub struct PackError {
    pub field: Field,
    pub source: OverflowError,
}

fn set_unsigned(word: u64, field: Field, value: u64) -> Result<u64, PackError> {
    let (width, lsb) = field.layout();

    bitpack::set_unsigned(word, width, lsb, value).map_err(|source| PackError { field, source })
}

fn set_signed(word: u64, field: Field, value: i64) -> Result<u64, PackError> {
    let (width, lsb) = field.layout();

    bitpack::set_signed(word, width, lsb, value).map_err(|source| PackError { field, source })
}

fn get_unsigned(word: u64, field: Field) -> u64 {
    let (width, lsb) = field.layout();

    bitpack::get_unsigned(word, width, lsb)
}

fn get_signed(word: u64, field: Field) -> i64 {
    let (width, lsb) = field.layout();

    bitpack::get_signed(word, width, lsb)
}

/// Pack the coefficients of a block into a coded word
pub fn pack(uncoded: &UncodedWord) -> Result<u32, PackError> {
    let mut word = 0;

    word = set_unsigned(word, Field::A, uncoded.a.into())?;
    word = set_signed(word, Field::B, uncoded.b.into())?;
    word = set_signed(word, Field::C, uncoded.c.into())?;
    word = set_signed(word, Field::D, uncoded.d.into())?;
    word = set_unsigned(word, Field::PbIndex, uncoded.pb_index.into())?;
    word = set_unsigned(word, Field::PrIndex, uncoded.pr_index.into())?;

    // The highest field ends at bit 31
    Ok(word as u32)
}

/// Extract the coefficients of a block from a coded word
pub fn unpack(word: u32) -> UncodedWord {
    let word = u64::from(word);

    // Field widths bound every value to the target type
    UncodedWord {
        a: get_unsigned(word, Field::A) as u16,
        b: get_signed(word, Field::B) as i8,
        c: get_signed(word, Field::C) as i8,
        d: get_signed(word, Field::D) as i8,
        pb_index: get_unsigned(word, Field::PbIndex) as u8,
        pr_index: get_unsigned(word, Field::PrIndex) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_disjoint_and_cover_the_word() {
        let fields = [
            Field::A,
            Field::B,
            Field::C,
            Field::D,
            Field::PbIndex,
            Field::PrIndex,
        ];

        let mut used = 0u64;
        for field in fields {
            let (width, lsb) = field.layout();
            let mask = ((1u64 << width) - 1) << lsb;

            assert_eq!(used & mask, 0, "{field} overlaps");
            used |= mask;
        }

        assert_eq!(used, u64::from(u32::MAX));
    }

    #[test]
    fn known_layout() {
        let word = pack(&UncodedWord {
            a: 0x1ff,
            b: -1,
            c: 0,
            d: 1,
            pb_index: 0xa,
            pr_index: 0x5,
        })
        .unwrap();

        assert_eq!(word, (0x1ff << 23) | (0x1f << 18) | (1 << 8) | (0xa << 4) | 0x5);
    }

    #[test]
    fn zero_word() {
        assert_eq!(pack(&UncodedWord::default()), Ok(0));
        assert_eq!(unpack(0), UncodedWord::default());
    }

    #[test]
    fn pack_unpack_round_trip() {
        for a in [0, 1, 255, 256, 510, 511] {
            for bcd in -16..=15 {
                for index in [0, 7, 15] {
                    let uncoded = UncodedWord {
                        a,
                        b: bcd,
                        c: -bcd.max(-15),
                        d: bcd / 2,
                        pb_index: index,
                        pr_index: 15 - index,
                    };

                    assert_eq!(unpack(pack(&uncoded).unwrap()), uncoded);
                }
            }
        }
    }

    #[test]
    fn a_overflow_names_the_field() {
        let err = pack(&UncodedWord {
            a: 512,
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(err.field, Field::A);
        assert_eq!(err.source.width, 9);
        assert_eq!(err.source.value, 512);
    }

    #[test]
    fn gradient_overflow_names_the_field() {
        let uncoded = UncodedWord {
            d: 16,
            ..Default::default()
        };
        assert_eq!(pack(&uncoded).unwrap_err().field, Field::D);

        let uncoded = UncodedWord {
            b: -17,
            ..Default::default()
        };
        assert_eq!(pack(&uncoded).unwrap_err().field, Field::B);
    }

    #[test]
    fn index_overflow_names_the_field() {
        let uncoded = UncodedWord {
            pr_index: 16,
            ..Default::default()
        };

        assert_eq!(pack(&uncoded).unwrap_err().field, Field::PrIndex);
    }
}
