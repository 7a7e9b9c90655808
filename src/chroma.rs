//! Quantization of averaged chroma values to 4-bit indices

/// Number of chroma levels, every index fits into 4 bits
pub const CHROMA_LEVELS: usize = 16;

/// Bidirectional mapping between a chroma value in `-0.5..=0.5` and an index in `0..16`
///
/// Implementations must be deterministic, [`index_of`](Self::index_of) must always return a value
/// below [`CHROMA_LEVELS`].
pub trait ChromaQuantizer: Sync {
    fn index_of(&self, chroma: f32) -> u8;
    fn chroma_of(&self, index: u8) -> f32;
}

/// Error returned by [`ChromaTable::new`]
#[derive(Debug, thiserror::Error)]
pub enum ChromaTableError {
    #[error("chroma level {index} is not a finite number")]
    NotFinite { index: usize },

    #[error("chroma levels must be strictly ascending, level {index} is not")]
    NotAscending { index: usize },
}

/// Nearest-level chroma quantizer backed by 16 ascending levels
///
/// A value exactly between two levels maps to the lower index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaTable {
    levels: [f32; CHROMA_LEVELS],
}

impl ChromaTable {
    /// Non-linear curve with finer steps around zero chroma, where most blocks of natural images
    /// end up
    pub const DEFAULT: Self = Self {
        levels: [
            -0.35, -0.20, -0.15, -0.10, -0.077, -0.055, -0.033, -0.011, 0.011, 0.033, 0.055, 0.077,
            0.10, 0.15, 0.20, 0.35,
        ],
    };

    /// Index [`ChromaTable::DEFAULT`] maps zero chroma (gray pixels) to
    pub const DEFAULT_ZERO_INDEX: u8 = 7;

    pub fn new(levels: [f32; CHROMA_LEVELS]) -> Result<Self, ChromaTableError> {
        for (index, level) in levels.iter().enumerate() {
            if !level.is_finite() {
                return Err(ChromaTableError::NotFinite { index });
            }

            if index > 0 && levels[index - 1] >= *level {
                return Err(ChromaTableError::NotAscending { index });
            }
        }

        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[f32; CHROMA_LEVELS] {
        &self.levels
    }
}

impl Default for ChromaTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ChromaQuantizer for ChromaTable {
    fn index_of(&self, chroma: f32) -> u8 {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;

        for (index, level) in self.levels.iter().enumerate() {
            let distance = (level - chroma).abs();

            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }

        best as u8
    }

    fn chroma_of(&self, index: u8) -> f32 {
        self.levels[usize::from(index)]
    }
}

impl<Q: ChromaQuantizer + ?Sized> ChromaQuantizer for &Q {
    fn index_of(&self, chroma: f32) -> u8 {
        <Q as ChromaQuantizer>::index_of(self, chroma)
    }

    fn chroma_of(&self, index: u8) -> f32 {
        <Q as ChromaQuantizer>::chroma_of(self, index)
    }
}
