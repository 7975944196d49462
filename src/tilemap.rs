use rayon::prelude::*;

use crate::error::ConfigError;

/// Value every cell starts at and returns to on reset.
pub const DEFAULT_ELEVATION: f64 = 0.5;

/// A dense 2D grid stored row-major. Dimensions are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// The elevation field the generators write into and the renderer reads.
pub type TileGrid = Tilemap<f64>;

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![value; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range coordinates are a caller bug, not a recoverable error.
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "tile ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Visit every cell mutably. Cells are independent, so callers must not
    /// depend on the visiting order.
    pub fn for_each_cell<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, &mut T),
    {
        let width = self.width;
        for (idx, val) in self.data.iter_mut().enumerate() {
            f(idx % width, idx / width, val);
        }
    }
}

impl Tilemap<f64> {
    /// A grid of the given size with every cell at [`DEFAULT_ELEVATION`].
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        Self::new_with(width, height, DEFAULT_ELEVATION)
    }

    pub fn value(&self, x: usize, y: usize) -> f64 {
        *self.get(x, y)
    }

    pub fn reset(&mut self, value: f64) {
        self.fill(value);
    }

    /// Smallest and largest cell values.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .par_iter()
            .map(|&v| (v, v))
            .reduce(
                || (f64::INFINITY, f64::NEG_INFINITY),
                |a, b| (a.0.min(b.0), a.1.max(b.1)),
            )
    }

    /// Rescale the field so the lowest cell becomes 0 and the highest 1.
    ///
    /// A flat field (max == min) is left untouched.
    pub fn normalize(&mut self) {
        let (min_val, max_val) = self.min_max();
        let range = max_val - min_val;
        if range.is_nan() || range <= 0.0 {
            return;
        }

        self.data
            .par_iter_mut()
            .for_each(|v| *v = (*v - min_val) / range);
    }
}
