//! Serialized form of a [`CodedImage`]
//!
//! ```text
//! COMP40 Compressed image format 2\n
//! <width> <height>\n
//! <(width / 2) * (height / 2) big endian 32-bit words, row-major>
//! ```

use crate::CodedImage;
use crate::grid::{DenseGrid, GridError};
use std::io::{self, Read, Write};

/// First line of every compressed image, including its line feed
pub const MAGIC: &[u8] = b"COMP40 Compressed image format 2\n";

/// Upper bound for the dimension line, two 20 digit numbers plus separators
const MAX_DIMENSION_LINE: usize = 48;

/// Errors while reading a compressed image
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid header: {0}")]
    Header(String),

    #[error("compressed image is truncated, expected {expected} words but got {got}")]
    Truncated { expected: usize, got: usize },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Write the header followed by every word of `image`
pub fn write_coded<W: Write>(image: &CodedImage, mut writer: W) -> io::Result<()> {
    writer.write_all(MAGIC)?;
    writeln!(writer, "{} {}", image.width(), image.height())?;

    for row in image.words().rows() {
        let mut bytes = Vec::with_capacity(row.len() * 4);

        for word in row {
            bytes.extend_from_slice(&word.to_be_bytes());
        }

        writer.write_all(&bytes)?;
    }

    writer.flush()
}

/// Read a compressed image written by [`write_coded`]
///
/// The header is read byte by byte, pass a buffered reader where that matters. Bytes after the
/// last word are not consumed.
pub fn read_coded<R: Read>(mut reader: R) -> Result<CodedImage, FormatError> {
    let (width, height) = read_header(&mut reader)?;

    let coded_width = width / 2;
    let coded_height = height / 2;

    let expected = coded_width
        .checked_mul(coded_height)
        .ok_or_else(|| FormatError::Header(format!("{width}x{height} is too large")))?;

    // Let the buffer grow with the data actually present instead of trusting the header
    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take((expected as u64).saturating_mul(4))
        .read_to_end(&mut bytes)?;

    let got = bytes.len() / 4;
    if got < expected {
        return Err(FormatError::Truncated { expected, got });
    }

    let words = bytes
        .chunks_exact(4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let words = DenseGrid::from_vec(coded_width, coded_height, words)?;

    log::debug!("read {width}x{height} compressed image, {expected} words");

    Ok(CodedImage::new(words))
}

fn read_header<R: Read>(reader: &mut R) -> Result<(usize, usize), FormatError> {
    let mut magic = [0u8; MAGIC.len()];

    if let Err(e) = reader.read_exact(&mut magic) {
        return Err(match e.kind() {
            io::ErrorKind::UnexpectedEof => FormatError::Header("missing magic line".into()),
            _ => FormatError::Io(e),
        });
    }

    if magic != MAGIC {
        return Err(FormatError::Header(format!(
            "expected {:?}, got {:?}",
            String::from_utf8_lossy(MAGIC),
            String::from_utf8_lossy(&magic)
        )));
    }

    let mut line = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(FormatError::Header("unterminated dimension line".into()));
        }

        if byte[0] == b'\n' {
            break;
        }

        if line.len() == MAX_DIMENSION_LINE {
            return Err(FormatError::Header("dimension line is too long".into()));
        }

        line.push(byte[0]);
    }

    parse_dimensions(&line)
}

fn parse_dimensions(line: &[u8]) -> Result<(usize, usize), FormatError> {
    let invalid = || {
        FormatError::Header(format!(
            "expected \"<width> <height>\", got {:?}",
            String::from_utf8_lossy(line)
        ))
    };

    let line = std::str::from_utf8(line).map_err(|_| invalid())?;
    let (width, height) = line.split_once(' ').ok_or_else(invalid)?;

    let parse = |s: &str| {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        s.parse::<usize>().ok()
    };

    let width = parse(width).ok_or_else(invalid)?;
    let height = parse(height).ok_or_else(invalid)?;

    if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
        return Err(FormatError::Header(format!(
            "dimensions must be even and non-zero, got {width}x{height}"
        )));
    }

    Ok((width, height))
}
