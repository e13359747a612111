//! N-dimensional grid geometry: sizes, element strides and pixel spacing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::flag::InvalidFlag;

/// Errors raised while describing or validating grids and images.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("grid needs at least one dimension")]
    Empty,
    #[error("size along dimension {dim} is zero")]
    ZeroSize { dim: usize },
    #[error("expected {expected} strides, got {got}")]
    StrideCount { expected: usize, got: usize },
    #[error("buffer holds {got} elements, grid needs {needed}")]
    BufferTooShort { needed: usize, got: usize },
    #[error("spacing has {got} entries for a {expected}-D grid")]
    SpacingLength { expected: usize, got: usize },
    #[error("spacing along dimension {dim} must be finite and > 0 (got {value})")]
    InvalidSpacing { dim: usize, value: f64 },
    #[error("image sizes differ: {left:?} vs {right:?}")]
    SizeMismatch { left: Vec<usize>, right: Vec<usize> },
    #[error("dimensionality {got} not supported (expected {expected})")]
    Dimensionality { expected: &'static str, got: usize },
}

/// Sizes and element strides of an n-dimensional array.
///
/// Dimension 0 is the fastest-varying one in the default (contiguous)
/// layout. Strides are counted in elements and are never negative.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    sizes: Vec<usize>,
    strides: Vec<usize>,
}

impl Grid {
    /// Contiguous grid with dimension 0 fastest.
    pub fn new(sizes: &[usize]) -> Result<Self, GridError> {
        let mut strides = Vec::with_capacity(sizes.len());
        let mut step = 1usize;
        for &n in sizes {
            strides.push(step);
            step *= n;
        }
        Self::with_strides(sizes, &strides)
    }

    /// Grid over an existing buffer layout.
    pub fn with_strides(sizes: &[usize], strides: &[usize]) -> Result<Self, GridError> {
        if sizes.is_empty() {
            return Err(GridError::Empty);
        }
        if strides.len() != sizes.len() {
            return Err(GridError::StrideCount {
                expected: sizes.len(),
                got: strides.len(),
            });
        }
        if let Some(dim) = sizes.iter().position(|&n| n == 0) {
            return Err(GridError::ZeroSize { dim });
        }
        Ok(Self {
            sizes: sizes.to_vec(),
            strides: strides.to_vec(),
        })
    }

    pub fn dimensionality(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn size(&self, dim: usize) -> usize {
        self.sizes[dim]
    }

    pub fn stride(&self, dim: usize) -> usize {
        self.strides[dim]
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.sizes.iter().product()
    }

    /// Minimum buffer length addressed by this grid.
    pub fn required_len(&self) -> usize {
        1 + self
            .sizes
            .iter()
            .zip(&self.strides)
            .map(|(&n, &s)| (n - 1) * s)
            .sum::<usize>()
    }

    /// `true` when the strides match [`Grid::new`] for the same sizes.
    pub fn is_contiguous(&self) -> bool {
        let mut step = 1usize;
        for (&n, &s) in self.sizes.iter().zip(&self.strides) {
            if s != step {
                return false;
            }
            step *= n;
        }
        true
    }

    /// Contiguous grid with the same sizes.
    pub fn contiguous(&self) -> Grid {
        let mut strides = Vec::with_capacity(self.sizes.len());
        let mut step = 1usize;
        for &n in &self.sizes {
            strides.push(step);
            step *= n;
        }
        Grid {
            sizes: self.sizes.clone(),
            strides,
        }
    }

    /// Buffer offset of a pixel. Coordinates must be in range.
    #[inline]
    pub fn offset(&self, coords: &[usize]) -> usize {
        coords.iter().zip(&self.strides).map(|(&c, &s)| c * s).sum()
    }

    /// Buffer offset of a pixel, or `None` when out of range.
    pub fn checked_offset(&self, coords: &[usize]) -> Option<usize> {
        if coords.len() != self.sizes.len() || coords.iter().zip(&self.sizes).any(|(&c, &n)| c >= n)
        {
            return None;
        }
        Some(self.offset(coords))
    }

    /// Fixed-size copy of the sizes for kernels specialised on dimensionality.
    pub fn sizes_array<const D: usize>(&self) -> Option<[usize; D]> {
        self.sizes.as_slice().try_into().ok()
    }

    pub fn strides_array<const D: usize>(&self) -> Option<[usize; D]> {
        self.strides.as_slice().try_into().ok()
    }

    /// Fail unless both grids have the same sizes.
    pub fn check_same_sizes(&self, other: &Grid) -> Result<(), GridError> {
        if self.sizes != other.sizes {
            return Err(GridError::SizeMismatch {
                left: self.sizes.clone(),
                right: other.sizes.clone(),
            });
        }
        Ok(())
    }

    /// Buffer offsets of every pixel, dimension 0 fastest.
    pub fn offsets(&self) -> Offsets<'_> {
        Offsets {
            grid: self,
            coords: vec![0; self.sizes.len()],
            offset: 0,
            remaining: self.pixel_count(),
        }
    }
}

/// Iterator over the buffer offsets of a [`Grid`] in scan order.
#[derive(Clone, Debug)]
pub struct Offsets<'a> {
    grid: &'a Grid,
    coords: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl Offsets<'_> {
    /// Coordinates of the pixel the next call to `next` returns.
    pub fn coords(&self) -> &[usize] {
        &self.coords
    }
}

impl Iterator for Offsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.offset;
        for dim in 0..self.coords.len() {
            self.coords[dim] += 1;
            self.offset += self.grid.strides[dim];
            if self.coords[dim] < self.grid.sizes[dim] {
                break;
            }
            self.offset -= self.coords[dim] * self.grid.strides[dim];
            self.coords[dim] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}

/// Physical size of a pixel along each dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Spacing(Vec<f64>);

impl Spacing {
    /// Validate and wrap per-dimension spacing values.
    pub fn new(values: Vec<f64>) -> Result<Self, GridError> {
        if values.is_empty() {
            return Err(GridError::Empty);
        }
        for (dim, &value) in values.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(GridError::InvalidSpacing { dim, value });
            }
        }
        Ok(Self(values))
    }

    /// Unit spacing along every dimension.
    pub fn isotropic(dims: usize) -> Self {
        Self(vec![1.0; dims.max(1)])
    }

    /// The same spacing along every dimension.
    pub fn uniform(dims: usize, value: f64) -> Result<Self, GridError> {
        Self::new(vec![value; dims.max(1)])
    }

    pub fn dimensionality(&self) -> usize {
        self.0.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, dim: usize) -> f64 {
        self.0[dim]
    }

    pub fn min_spacing(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn is_uniform(&self) -> bool {
        self.0.windows(2).all(|w| w[0] == w[1])
    }

    /// Fail unless the spacing matches the grid dimensionality.
    pub fn check_dimensionality(&self, dims: usize) -> Result<(), GridError> {
        if self.0.len() != dims {
            return Err(GridError::SpacingLength {
                expected: dims,
                got: self.0.len(),
            });
        }
        Ok(())
    }

    /// Single-precision copy for the raster kernels.
    pub fn to_f32_array<const D: usize>(&self) -> Option<[f32; D]> {
        if self.0.len() != D {
            return None;
        }
        let mut out = [0.0f32; D];
        for (dst, &src) in out.iter_mut().zip(&self.0) {
            *dst = src as f32;
        }
        Some(out)
    }
}

impl TryFrom<Vec<f64>> for Spacing {
    type Error = GridError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Spacing> for Vec<f64> {
    fn from(spacing: Spacing) -> Self {
        spacing.0
    }
}

/// What lies beyond the image edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Border {
    /// The object continues past the edge; the edge is not a boundary.
    Object,
    /// The pixel one step past the edge is background.
    #[default]
    Background,
}

impl Border {
    pub fn as_str(self) -> &'static str {
        match self {
            Border::Object => "object",
            Border::Background => "background",
        }
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Border {
    type Err = InvalidFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object" => Ok(Border::Object),
            "background" => Ok(Border::Background),
            other => Err(InvalidFlag::new(other)),
        }
    }
}
