//! Lossy image codec storing every 2x2 block of pixels in a single 32-bit word
//!
//! Pixels are converted to component video (Y/Pb/Pr), the four luma values of a block are
//! transformed into their average and three gradients, and the averaged chroma is quantized to
//! one of 16 levels. See [`compress`] and [`decompress`].

use std::io::{self, Read, Write};

pub use block::{Block2x2, UncodedWord};
pub use chroma::{CHROMA_LEVELS, ChromaQuantizer, ChromaTable, ChromaTableError};
pub use codec::{CodedImage, OUTPUT_DENOMINATOR, RgbImage, compress, decompress};
pub use color::{ComponentVideo, RgbPixel};
pub use grid::{Cropped, DenseGrid, Grid, GridError, GridExt};
#[cfg(feature = "multi-thread")]
pub use multi_thread::{compress_multi_thread, decompress_multi_thread};
pub use stream::{FormatError, MAGIC, read_coded, write_coded};
pub use word::{Field, PackError, pack, unpack};

pub mod bitpack;
mod block;
mod chroma;
mod codec;
mod color;
mod grid;
#[cfg(feature = "multi-thread")]
mod multi_thread;
#[cfg(feature = "pnm")]
pub mod pnm;
mod stream;
mod word;

/// Everything that can go wrong when compressing or decompressing an image
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("{width}x{height} image does not contain a single 2x2 block")]
    InvalidDimensions { width: usize, height: usize },

    #[error("denominator must not be zero")]
    InvalidDenominator,

    #[error("block at ({col}, {row}): {source}")]
    Pack {
        col: usize,
        row: usize,
        source: PackError,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[cfg(feature = "pnm")]
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[cfg(feature = "pnm")]
    #[error("unsupported color type {0:?}, expected an RGB or grayscale image")]
    UnsupportedColor(image::ColorType),
}

/// Compress `image` and write it to `writer`
///
/// Nothing is written if compression fails.
pub fn compress_to_writer<Q, W>(image: &RgbImage, chroma: &Q, writer: W) -> Result<(), CodecError>
where
    Q: ChromaQuantizer + ?Sized,
    W: Write,
{
    #[cfg(feature = "multi-thread")]
    let coded = compress_multi_thread(image, chroma)?;
    #[cfg(not(feature = "multi-thread"))]
    let coded = compress(image, chroma)?;

    write_coded(&coded, writer)?;

    Ok(())
}

/// Read a compressed image from `reader` and decompress it
pub fn decompress_from_reader<R, Q>(reader: R, chroma: &Q) -> Result<RgbImage, CodecError>
where
    R: Read,
    Q: ChromaQuantizer + ?Sized,
{
    let coded = read_coded(reader)?;

    #[cfg(feature = "multi-thread")]
    let image = decompress_multi_thread(&coded, chroma)?;
    #[cfg(not(feature = "multi-thread"))]
    let image = decompress(&coded, chroma)?;

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_is_untouched_on_failure() {
        let pixels = DenseGrid::filled(1, 4, RgbPixel::default()).unwrap();
        let image = RgbImage::new(pixels, 255).unwrap();

        let mut out = Vec::new();
        let result = compress_to_writer(&image, &ChromaTable::DEFAULT, &mut out);

        assert!(matches!(result, Err(CodecError::InvalidDimensions { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn reader_round_trip() {
        let pixels = DenseGrid::from_fn(6, 4, |col, row| {
            RgbPixel::new((col * 40) as u16, (row * 60) as u16, 128)
        })
        .unwrap();
        let image = RgbImage::new(pixels, 255).unwrap();

        let mut out = Vec::new();
        compress_to_writer(&image, &ChromaTable::DEFAULT, &mut out).unwrap();

        let decoded = decompress_from_reader(&out[..], &ChromaTable::DEFAULT).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
        assert_eq!(decoded.denominator(), OUTPUT_DENOMINATOR);
    }

    #[test]
    fn format_errors_are_wrapped() {
        let result = decompress_from_reader(&b"P6\n2 2\n255\n"[..], &ChromaTable::DEFAULT);

        assert!(matches!(
            result,
            Err(CodecError::Format(FormatError::Header(_)))
        ));
    }
}
