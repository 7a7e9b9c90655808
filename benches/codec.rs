use criterion::{Criterion, criterion_group, criterion_main};

use comp40::{ChromaTable, CodecError, CodedImage, DenseGrid, RgbImage, RgbPixel};
use std::hint::black_box;

const IMAGE_WIDTH: usize = 1920;
const IMAGE_HEIGHT: usize = 1080;

type CompressFunction = fn(&RgbImage, &ChromaTable) -> Result<CodedImage, CodecError>;
type DecompressFunction = fn(&CodedImage, &ChromaTable) -> Result<RgbImage, CodecError>;

fn make_image() -> RgbImage {
    let pixels = DenseGrid::from_fn(IMAGE_WIDTH, IMAGE_HEIGHT, |col, row| {
        RgbPixel::new(
            (col * 255 / IMAGE_WIDTH) as u16,
            (row * 255 / IMAGE_HEIGHT) as u16,
            ((col + row) % 256) as u16,
        )
    })
    .unwrap();

    RgbImage::new(pixels, 255).unwrap()
}

fn run_benchmarks(
    c: &mut Criterion,
    compress: CompressFunction,
    decompress: DecompressFunction,
    s: &str,
) {
    let table = ChromaTable::DEFAULT;
    let image = make_image();
    let coded = compress(&image, &table).unwrap();

    c.bench_function(&format!("compress 1080p {s}"), |b| {
        b.iter(|| compress(black_box(&image), &table).unwrap())
    });

    c.bench_function(&format!("decompress 1080p {s}"), |b| {
        b.iter(|| decompress(black_box(&coded), &table).unwrap())
    });
}

fn single_threaded(c: &mut Criterion) {
    run_benchmarks(c, comp40::compress, comp40::decompress, "single threaded")
}

#[cfg(feature = "multi-thread")]
fn multi_threaded(c: &mut Criterion) {
    run_benchmarks(
        c,
        comp40::compress_multi_thread,
        comp40::decompress_multi_thread,
        "multi threaded",
    )
}

#[cfg(feature = "multi-thread")]
criterion_group!(codec, single_threaded, multi_threaded);

#[cfg(not(feature = "multi-thread"))]
criterion_group!(codec, single_threaded);

criterion_main!(codec);
