use std::collections::TryReserveError;

/// Everything that can go wrong when constructing a [`DenseGrid`]
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("{width}x{height} elements do not fit into memory")]
    TooLarge { width: usize, height: usize },

    #[error("failed to allocate grid storage: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("got a buffer of {got} elements, expected {expected}")]
    InvalidBufferSize { expected: usize, got: usize },
}

/// Read access to a two dimensional grid of elements, addressed by `(col, row)`
///
/// Construction is up to the implementation, see [`DenseGrid::from_fn`]. Views such as
/// [`Cropped`] only ever wrap an existing grid.
pub trait Grid {
    type Item;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Returns the element at the given position, or `None` if it is out of bounds
    fn get(&self, col: usize, row: usize) -> Option<&Self::Item>;

    /// Call `f` for every element in row-major order
    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, &Self::Item),
    {
        for row in 0..self.height() {
            for col in 0..self.width() {
                if let Some(item) = self.get(col, row) {
                    f(col, row, item);
                }
            }
        }
    }
}

/// [`Grid`] extension methods
pub trait GridExt: Grid {
    /// Returns the element at the given position
    ///
    /// # Panics
    ///
    /// If the position is out of bounds
    #[track_caller]
    fn at(&self, col: usize, row: usize) -> &Self::Item {
        match self.get(col, row) {
            Some(item) => item,
            None => panic!(
                "({col}, {row}) is out of bounds of {}x{} grid",
                self.width(),
                self.height()
            ),
        }
    }

    /// View of the grid cropped to the next lowest even width and height
    fn crop_even(self) -> Cropped<Self>
    where
        Self: Sized,
    {
        let width = self.width().saturating_sub(1).next_multiple_of(2);
        let height = self.height().saturating_sub(1).next_multiple_of(2);

        Cropped {
            inner: self,
            width,
            height,
        }
    }
}

impl<T: Grid + ?Sized> GridExt for T {}

impl<T: Grid> Grid for &T {
    type Item = T::Item;

    fn width(&self) -> usize {
        <T as Grid>::width(self)
    }

    fn height(&self) -> usize {
        <T as Grid>::height(self)
    }

    fn get(&self, col: usize, row: usize) -> Option<&Self::Item> {
        <T as Grid>::get(self, col, row)
    }
}

/// Dense row-major grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseGrid<T> {
    elements: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> DenseGrid<T> {
    /// Allocate a `width` x `height` grid, initializing every element with `f(col, row)` in
    /// row-major order
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, GridError>
    where
        F: FnMut(usize, usize) -> T,
    {
        Self::try_from_fn(width, height, |col, row| Ok::<_, GridError>(f(col, row)))
    }

    /// Like [`DenseGrid::from_fn`], stops at the first element `f` fails to produce
    pub fn try_from_fn<F, E>(width: usize, height: usize, mut f: F) -> Result<Self, E>
    where
        F: FnMut(usize, usize) -> Result<T, E>,
        E: From<GridError>,
    {
        let len = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;

        let mut elements = Vec::new();
        elements
            .try_reserve_exact(len)
            .map_err(GridError::Allocation)?;

        for row in 0..height {
            for col in 0..width {
                elements.push(f(col, row)?);
            }
        }

        Ok(Self {
            elements,
            width,
            height,
        })
    }

    /// Wrap a row-major buffer of exactly `width * height` elements
    pub fn from_vec(width: usize, height: usize, elements: Vec<T>) -> Result<Self, GridError> {
        let expected = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;

        if elements.len() != expected {
            return Err(GridError::InvalidBufferSize {
                expected,
                got: elements.len(),
            });
        }

        Ok(Self {
            elements,
            width,
            height,
        })
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut T> {
        if col >= self.width || row >= self.height {
            return None;
        }

        self.elements.get_mut(row * self.width + col)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.elements
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }

    /// Iterate over the rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on a zero chunk size
        self.elements.chunks_exact(self.width.max(1))
    }
}

impl<T: Clone> DenseGrid<T> {
    /// Allocate a `width` x `height` grid with every element set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        Self::from_fn(width, height, |_, _| value.clone())
    }
}

impl<T> Grid for DenseGrid<T> {
    type Item = T;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, col: usize, row: usize) -> Option<&T> {
        if col >= self.width || row >= self.height {
            return None;
        }

        self.elements.get(row * self.width + col)
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, &T),
    {
        for (i, item) in self.elements.iter().enumerate() {
            f(i % self.width, i / self.width, item);
        }
    }
}

/// Wrapper around a [`Grid`] only exposing its top left `width` x `height` elements
#[derive(Debug, Clone, Copy)]
pub struct Cropped<T> {
    inner: T,
    width: usize,
    height: usize,
}

impl<T: Grid> Cropped<T> {
    /// Returns true if the crop actually removed any columns or rows
    pub fn is_trimmed(&self) -> bool {
        self.width != self.inner.width() || self.height != self.inner.height()
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Grid> Grid for Cropped<T> {
    type Item = T::Item;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, col: usize, row: usize) -> Option<&Self::Item> {
        if col >= self.width || row >= self.height {
            return None;
        }

        self.inner.get(col, row)
    }
}
