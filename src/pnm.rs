//! PPM rasters in and out of [`RgbImage`], using the `image` crate's PNM codec
//!
//! - [`read_ppm`]: decode a P3/P6 pixmap (or P2/P5 graymap) of 8 or 16 bits per sample.
//! - [`write_ppm`]: encode a binary P6 pixmap with a maxval of 255.

use crate::{CodecError, DenseGrid, GridError, RgbImage, RgbPixel};
use image::codecs::pnm::{PnmDecoder, PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ExtendedColorType, ImageDecoder, ImageEncoder};
use std::io::{BufRead, Write};

/// Decode a PNM image, 8-bit samples yield a denominator of 255 and 16-bit samples 65535
///
/// Graymaps are replicated into all three channels.
pub fn read_ppm<R: BufRead>(reader: R) -> Result<RgbImage, CodecError> {
    let decoder = PnmDecoder::new(reader)?;

    let (width, height) = decoder.dimensions();
    let color = decoder.color_type();

    let (channels, denominator) = match color {
        ColorType::Rgb8 => (3, u16::from(u8::MAX)),
        ColorType::Rgb16 => (3, u16::MAX),
        ColorType::L8 => (1, u16::from(u8::MAX)),
        ColorType::L16 => (1, u16::MAX),
        _ => return Err(CodecError::UnsupportedColor(color)),
    };

    let width = width as usize;
    let height = height as usize;

    let len = usize::try_from(decoder.total_bytes())
        .map_err(|_| CodecError::InvalidDimensions { width, height })?;

    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(GridError::Allocation)?;
    buf.resize(len, 0);

    decoder.read_image(&mut buf)?;

    log::debug!("read {width}x{height} {color:?} image");

    // The decoder yields 16-bit samples in native byte order
    let sample = |i: usize| -> u16 {
        if denominator == u16::MAX {
            u16::from_ne_bytes([buf[i * 2], buf[i * 2 + 1]])
        } else {
            u16::from(buf[i])
        }
    };

    let pixels = DenseGrid::from_fn(width, height, |col, row| {
        let i = (row * width + col) * channels;

        if channels == 1 {
            let v = sample(i);
            RgbPixel::new(v, v, v)
        } else {
            RgbPixel::new(sample(i), sample(i + 1), sample(i + 2))
        }
    })?;

    RgbImage::new(pixels, denominator)
}

/// Encode `image` as a binary P6 pixmap, rescaling channels to a maxval of 255
pub fn write_ppm<W: Write>(image: &RgbImage, writer: W) -> Result<(), CodecError> {
    let invalid = || CodecError::InvalidDimensions {
        width: image.width(),
        height: image.height(),
    };

    let width = u32::try_from(image.width()).map_err(|_| invalid())?;
    let height = u32::try_from(image.height()).map_err(|_| invalid())?;

    let denominator = u32::from(image.denominator());

    if denominator != u32::from(u8::MAX) {
        log::warn!("rescaling image with denominator {denominator} to 255");
    }

    let scale = |v: u16| -> u8 {
        let v = u32::from(v).min(denominator);
        // round to nearest, v <= denominator keeps the result <= 255
        ((v * 255 + denominator / 2) / denominator) as u8
    };

    let mut buf = Vec::new();
    buf.try_reserve_exact(image.pixels().as_slice().len() * 3)
        .map_err(GridError::Allocation)?;

    for px in image.pixels().as_slice() {
        buf.extend_from_slice(&[scale(px.red), scale(px.green), scale(px.blue)]);
    }

    PnmEncoder::new(writer)
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
        .write_image(&buf, width, height, ExtendedColorType::Rgb8)?;

    log::debug!("wrote {width}x{height} pixmap");

    Ok(())
}
