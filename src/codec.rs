use crate::block::Block2x2;
use crate::chroma::ChromaQuantizer;
use crate::color::{ComponentVideo, RgbPixel};
use crate::grid::{Cropped, DenseGrid, Grid, GridExt};
use crate::word::{pack, unpack};
use crate::CodecError;

/// Denominator of every decompressed image
pub const OUTPUT_DENOMINATOR: u16 = 255;

/// RGB raster whose channels are scaled against `denominator`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pixels: DenseGrid<RgbPixel>,
    denominator: u16,
}

impl RgbImage {
    pub fn new(pixels: DenseGrid<RgbPixel>, denominator: u16) -> Result<Self, CodecError> {
        if denominator == 0 {
            return Err(CodecError::InvalidDenominator);
        }

        Ok(Self {
            pixels,
            denominator,
        })
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Maximum value of a channel
    pub fn denominator(&self) -> u16 {
        self.denominator
    }

    pub fn pixels(&self) -> &DenseGrid<RgbPixel> {
        &self.pixels
    }

    pub fn into_pixels(self) -> DenseGrid<RgbPixel> {
        self.pixels
    }
}

/// Compressed image, one coded word per 2x2 block of pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedImage {
    words: DenseGrid<u32>,
}

impl CodedImage {
    pub fn new(words: DenseGrid<u32>) -> Self {
        Self { words }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.words.width() * 2
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.words.height() * 2
    }

    pub fn words(&self) -> &DenseGrid<u32> {
        &self.words
    }

    pub fn into_words(self) -> DenseGrid<u32> {
        self.words
    }
}

/// Trim the image to even dimensions, making sure there is at least one block left
pub(crate) fn prepare(image: &RgbImage) -> Result<Cropped<&DenseGrid<RgbPixel>>, CodecError> {
    let pixels = image.pixels().crop_even();

    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(CodecError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        });
    }

    if pixels.is_trimmed() {
        log::warn!(
            "trimming {}x{} image to {}x{}",
            image.width(),
            image.height(),
            pixels.width(),
            pixels.height()
        );
    }

    Ok(pixels)
}

pub(crate) fn verify_coded(image: &CodedImage) -> Result<(), CodecError> {
    if image.words().width() == 0 || image.words().height() == 0 {
        return Err(CodecError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        });
    }

    Ok(())
}

/// Compress the block rows starting at `first_row` into `band`, which holds whole rows of words
pub(crate) fn compress_band<G, Q>(
    pixels: &G,
    denominator: u16,
    chroma: &Q,
    first_row: usize,
    band: &mut [u32],
) -> Result<(), CodecError>
where
    G: Grid<Item = RgbPixel> + ?Sized,
    Q: ChromaQuantizer + ?Sized,
{
    let coded_width = pixels.width() / 2;

    for (i, words) in band.chunks_exact_mut(coded_width).enumerate() {
        let row = first_row + i;

        for (col, word) in words.iter_mut().enumerate() {
            let block = Block2x2::read(pixels, col * 2, row * 2, |px| {
                ComponentVideo::from_rgb(*px, denominator)
            });

            *word = pack(&block.encode(chroma))
                .map_err(|source| CodecError::Pack { col, row, source })?;
        }
    }

    Ok(())
}

/// Decompress the block rows starting at `first_row` into `band`, which holds pairs of pixel rows
pub(crate) fn decompress_band<Q>(
    words: &DenseGrid<u32>,
    chroma: &Q,
    first_row: usize,
    band: &mut [RgbPixel],
) where
    Q: ChromaQuantizer + ?Sized,
{
    let width = words.width() * 2;

    for (pixels, words) in band
        .chunks_exact_mut(width * 2)
        .zip(words.rows().skip(first_row))
    {
        let (top, bottom) = pixels.split_at_mut(width);

        for (col, word) in words.iter().enumerate() {
            let block = Block2x2::decode(&unpack(*word), chroma)
                .map(|cv| cv.to_rgb(OUTPUT_DENOMINATOR));

            top[col * 2] = block.px00;
            top[col * 2 + 1] = block.px01;
            bottom[col * 2] = block.px10;
            bottom[col * 2 + 1] = block.px11;
        }
    }
}

/// Compress `image`, trimming odd dimensions by one column or row
///
/// Fails without producing any words if a single block cannot be packed.
pub fn compress<Q>(image: &RgbImage, chroma: &Q) -> Result<CodedImage, CodecError>
where
    Q: ChromaQuantizer + ?Sized,
{
    let pixels = prepare(image)?;

    let mut words = DenseGrid::filled(pixels.width() / 2, pixels.height() / 2, 0u32)?;

    log::debug!(
        "compressing {}x{} pixels into {}x{} words",
        pixels.width(),
        pixels.height(),
        words.width(),
        words.height()
    );

    compress_band(&pixels, image.denominator(), chroma, 0, words.as_mut_slice())?;

    Ok(CodedImage::new(words))
}

/// Reconstruct an image with a denominator of [`OUTPUT_DENOMINATOR`]
pub fn decompress<Q>(image: &CodedImage, chroma: &Q) -> Result<RgbImage, CodecError>
where
    Q: ChromaQuantizer + ?Sized,
{
    verify_coded(image)?;

    let mut pixels = DenseGrid::filled(image.width(), image.height(), RgbPixel::default())?;

    log::debug!("decompressing {}x{} pixels", image.width(), image.height());

    decompress_band(image.words(), chroma, 0, pixels.as_mut_slice());

    RgbImage::new(pixels, OUTPUT_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chroma::ChromaTable;

    fn image(width: usize, height: usize, f: impl FnMut(usize, usize) -> RgbPixel) -> RgbImage {
        RgbImage::new(DenseGrid::from_fn(width, height, f).unwrap(), 255).unwrap()
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let pixels = DenseGrid::filled(2, 2, RgbPixel::default()).unwrap();

        assert!(matches!(
            RgbImage::new(pixels, 0),
            Err(CodecError::InvalidDenominator)
        ));
    }

    #[test]
    fn single_pixel_row_has_no_block() {
        let image = image(5, 1, |_, _| RgbPixel::default());

        assert!(matches!(
            compress(&image, &ChromaTable::DEFAULT),
            Err(CodecError::InvalidDimensions {
                width: 5,
                height: 1
            })
        ));
    }

    #[test]
    fn odd_dimensions_are_trimmed() {
        let image = image(5, 3, |_, _| RgbPixel::new(10, 20, 30));

        let coded = compress(&image, &ChromaTable::DEFAULT).unwrap();
        assert_eq!((coded.width(), coded.height()), (4, 2));
        assert_eq!((coded.words().width(), coded.words().height()), (2, 1));
    }

    #[test]
    fn blocks_are_independent() {
        // left block white, right block black
        let image = image(4, 2, |col, _| {
            if col < 2 {
                RgbPixel::new(255, 255, 255)
            } else {
                RgbPixel::default()
            }
        });

        let coded = compress(&image, &ChromaTable::DEFAULT).unwrap();
        let words = coded.words().as_slice();

        assert_eq!(unpack(words[0]).a, 511);
        assert_eq!(unpack(words[1]).a, 0);

        let decoded = decompress(&coded, &ChromaTable::DEFAULT).unwrap();
        assert_eq!(decoded.pixels().at(3, 1).red, 0);
        assert!(decoded.pixels().at(0, 0).red > 240);
    }

    #[test]
    fn owned_parts_can_be_taken_apart() {
        let image = image(4, 2, |col, _| RgbPixel::new(col as u16 * 60, 0, 0));

        let coded = compress(&image, &ChromaTable::DEFAULT).unwrap();
        let words = coded.clone().into_words();
        assert_eq!(&words, coded.words());

        // Rebuilt from its words, a coded image decodes the same
        let rebuilt = CodedImage::new(words);
        let decoded = decompress(&rebuilt, &ChromaTable::DEFAULT).unwrap();
        assert_eq!(decoded, decompress(&coded, &ChromaTable::DEFAULT).unwrap());

        let pixels = decoded.into_pixels();
        assert_eq!((pixels.width(), pixels.height()), (4, 2));
    }

    #[test]
    fn empty_coded_image_is_rejected() {
        let coded = CodedImage::new(DenseGrid::filled(0, 3, 0).unwrap());

        assert!(matches!(
            decompress(&coded, &ChromaTable::DEFAULT),
            Err(CodecError::InvalidDimensions { .. })
        ));
    }
}
