use crate::chroma::ChromaQuantizer;
use crate::codec::{compress_band, decompress_band, prepare, verify_coded};
use crate::color::RgbPixel;
use crate::grid::{DenseGrid, Grid};
use crate::{CodecError, CodedImage, OUTPUT_DENOMINATOR, RgbImage, compress, decompress};
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;

/// Block rows handed to every thread
fn rows_per_band(rows: usize, threads: usize) -> usize {
    rows.div_ceil(threads).max(1)
}

/// Like [`compress`], distributing bands of block rows across the rayon thread pool
#[inline(never)]
pub fn compress_multi_thread<Q>(image: &RgbImage, chroma: &Q) -> Result<CodedImage, CodecError>
where
    Q: ChromaQuantizer + ?Sized,
{
    let threads = num_cpus::get();

    if threads == 1 {
        return compress(image, chroma);
    }

    let pixels = prepare(image)?;
    let denominator = image.denominator();

    let mut words = DenseGrid::filled(pixels.width() / 2, pixels.height() / 2, 0u32)?;
    let coded_width = words.width();
    let rows = rows_per_band(words.height(), threads);

    log::debug!(
        "compressing {}x{} pixels on {threads} threads, {rows} block rows per band",
        pixels.width(),
        pixels.height()
    );

    words
        .as_mut_slice()
        .par_chunks_mut(rows * coded_width)
        .enumerate()
        .try_for_each(|(band, words)| {
            compress_band(&pixels, denominator, chroma, band * rows, words)
        })?;

    Ok(CodedImage::new(words))
}

/// Like [`decompress`], distributing bands of block rows across the rayon thread pool
#[inline(never)]
pub fn decompress_multi_thread<Q>(image: &CodedImage, chroma: &Q) -> Result<RgbImage, CodecError>
where
    Q: ChromaQuantizer + ?Sized,
{
    let threads = num_cpus::get();

    if threads == 1 {
        return decompress(image, chroma);
    }

    verify_coded(image)?;

    let mut pixels = DenseGrid::filled(image.width(), image.height(), RgbPixel::default())?;
    let rows = rows_per_band(image.words().height(), threads);

    log::debug!(
        "decompressing {}x{} pixels on {threads} threads, {rows} block rows per band",
        image.width(),
        image.height()
    );

    // Every block row covers two pixel rows
    pixels
        .as_mut_slice()
        .par_chunks_mut(rows * 2 * image.width())
        .enumerate()
        .for_each(|(band, pixels)| {
            decompress_band(image.words(), chroma, band * rows, pixels);
        });

    RgbImage::new(pixels, OUTPUT_DENOMINATOR)
}
