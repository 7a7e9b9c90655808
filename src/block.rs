//! 2x2 luma block transform with averaged chroma
//!
//! Every block of four component video pixels is turned into its average luma `a`, three
//! gradients `b` (vertical), `c` (horizontal) and `d` (diagonal), and one chroma pair shared by
//! all four pixels.

use crate::chroma::ChromaQuantizer;
use crate::color::ComponentVideo;
use crate::grid::{Grid, GridExt};

/// Largest quantized value of `a`, the 9 bit unsigned maximum
pub const A_SCALE: f32 = 511.0;

/// Scale of the quantized gradients, the 5 bit signed magnitude
pub const BCD_SCALE: f32 = 31.0;

/// Gradients are limited to this magnitude before quantization
pub const BCD_LIMIT: f32 = 0.3;

/// Quantized coefficients of one 2x2 block, before bit packing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UncodedWord {
    pub a: u16,
    pub b: i8,
    pub c: i8,
    pub d: i8,
    pub pb_index: u8,
    pub pr_index: u8,
}

/// Four adjacent pixels, `pxRC` being the pixel in row `R` and column `C` of the block
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Block2x2<P> {
    pub px00: P,
    pub px01: P,
    pub px10: P,
    pub px11: P,
}

impl<P> Block2x2<P> {
    /// Read the block whose top left pixel is at `(col, row)`, mapping every pixel with `f`
    ///
    /// # Panics
    ///
    /// If the block reaches outside of `grid`
    pub fn read<G, F>(grid: &G, col: usize, row: usize, mut f: F) -> Self
    where
        G: Grid + ?Sized,
        F: FnMut(&G::Item) -> P,
    {
        Self {
            px00: f(grid.at(col, row)),
            px01: f(grid.at(col + 1, row)),
            px10: f(grid.at(col, row + 1)),
            px11: f(grid.at(col + 1, row + 1)),
        }
    }

    pub fn map<T>(self, mut f: impl FnMut(P) -> T) -> Block2x2<T> {
        Block2x2 {
            px00: f(self.px00),
            px01: f(self.px01),
            px10: f(self.px10),
            px11: f(self.px11),
        }
    }
}

impl Block2x2<ComponentVideo> {
    /// Transform and quantize the block
    pub fn encode<Q: ChromaQuantizer + ?Sized>(&self, chroma: &Q) -> UncodedWord {
        let y1 = self.px00.y;
        let y2 = self.px01.y;
        let y3 = self.px10.y;
        let y4 = self.px11.y;

        let a = (y1 + y2 + y3 + y4) / 4.0;
        let b = (y3 + y4 - y1 - y2) / 4.0;
        let c = (y2 + y4 - y1 - y3) / 4.0;
        let d = (y4 - y3 - y2 + y1) / 4.0;

        let pb = (self.px00.pb + self.px01.pb + self.px10.pb + self.px11.pb) / 4.0;
        let pr = (self.px00.pr + self.px01.pr + self.px10.pr + self.px11.pr) / 4.0;

        UncodedWord {
            a: quantize_a(a),
            b: quantize_bcd(b),
            c: quantize_bcd(c),
            d: quantize_bcd(d),
            pb_index: chroma.index_of(pb),
            pr_index: chroma.index_of(pr),
        }
    }

    /// Reconstruct the four pixels of a block, all of them share the same chroma
    pub fn decode<Q: ChromaQuantizer + ?Sized>(word: &UncodedWord, chroma: &Q) -> Self {
        let a = f32::from(word.a) / A_SCALE;
        let b = f32::from(word.b) / BCD_SCALE;
        let c = f32::from(word.c) / BCD_SCALE;
        let d = f32::from(word.d) / BCD_SCALE;

        let pb = chroma.chroma_of(word.pb_index);
        let pr = chroma.chroma_of(word.pr_index);

        let px = |y: f32| ComponentVideo {
            y: y.clamp(0.0, 1.0),
            pb,
            pr,
        };

        Self {
            px00: px(a - b - c + d),
            px01: px(a - b + c - d),
            px10: px(a + b - c - d),
            px11: px(a + b + c + d),
        }
    }
}

#[inline(always)]
fn quantize_a(a: f32) -> u16 {
    (a.clamp(0.0, 1.0) * A_SCALE).round() as u16
}

#[inline(always)]
fn quantize_bcd(v: f32) -> i8 {
    (v.clamp(-BCD_LIMIT, BCD_LIMIT) * BCD_SCALE).round() as i8
}
