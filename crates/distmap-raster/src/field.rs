//! Per-pixel nearest-background result shared by every raster kernel.

use distmap_core::{Border, Grid, Image, ImageView, Spacing, VectorImage};

use crate::error::RasterError;
use crate::lut::SquaredDistanceLut;

/// Result of a kernel at one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nearest<const D: usize> {
    /// The pixel is background itself.
    Background,
    /// Displacement to the nearest background pixel found, in grid steps,
    /// and its squared physical length.
    Found { offset: [i32; D], distance2: f32 },
    /// No background pixel propagated to this pixel.
    Unreachable,
}

/// Nearest-background displacement of every pixel of a 2D or 3D image.
#[derive(Clone, Debug)]
pub struct NearestField<const D: usize> {
    grid: Grid,
    sizes: [usize; D],
    spacing: [f32; D],
    maxdist: f32,
    cells: Vec<Nearest<D>>,
}

impl<const D: usize> NearestField<D> {
    pub(crate) fn new(input: &BinaryRaster<'_, D>, lut: &SquaredDistanceLut<D>) -> Self {
        let grid = input.grid().contiguous();
        let cells = vec![Nearest::Background; grid.pixel_count()];
        Self {
            grid,
            sizes: input.sizes,
            spacing: input.spacing,
            maxdist: lut.maxdist(),
            cells,
        }
    }

    pub fn sizes(&self) -> [usize; D] {
        self.sizes
    }

    /// Squared sentinel distance of unreachable pixels.
    pub fn maxdist(&self) -> f32 {
        self.maxdist
    }

    pub fn cells(&self) -> &[Nearest<D>] {
        &self.cells
    }

    pub fn get(&self, coords: [usize; D]) -> Option<Nearest<D>> {
        self.grid.checked_offset(&coords).map(|i| self.cells[i])
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: Nearest<D>) {
        self.cells[index] = value;
    }

    /// Replace the stored result when `distance2` is strictly smaller.
    #[inline]
    pub(crate) fn offer(&mut self, index: usize, offset: [i32; D], distance2: f32) {
        let current = match self.cells[index] {
            Nearest::Found { distance2, .. } => distance2,
            Nearest::Unreachable => self.maxdist,
            Nearest::Background => return,
        };
        if distance2 < current {
            self.cells[index] = Nearest::Found { offset, distance2 };
        }
    }

    /// Scalar map; unreachable pixels get `sqrt(maxdist)` (or `maxdist`).
    pub fn to_distance(&self, squared: bool) -> Result<Image<f32>, RasterError> {
        let finish = |d2: f32| if squared { d2 } else { d2.sqrt() };
        let data = self
            .cells
            .iter()
            .map(|cell| match *cell {
                Nearest::Background => 0.0,
                Nearest::Found { distance2, .. } => finish(distance2),
                Nearest::Unreachable => finish(self.maxdist),
            })
            .collect();
        Ok(Image::from_vec(self.grid.sizes(), data)?)
    }

    /// One channel per axis holding `offset_d · spacing_d`. Unreachable
    /// pixels get `-n_d · spacing_d`.
    pub fn to_vectors(&self) -> Result<VectorImage, RasterError> {
        let mut out = VectorImage::zeros(self.grid.sizes(), D)?;
        for d in 0..D {
            let s = self.spacing[d];
            let far = -(self.sizes[d] as f32) * s;
            let channel = out.channel_mut(d);
            for (dst, cell) in channel.iter_mut().zip(&self.cells) {
                *dst = match *cell {
                    Nearest::Background => 0.0,
                    Nearest::Found { offset, .. } => offset[d] as f32 * s,
                    Nearest::Unreachable => far,
                };
            }
        }
        Ok(out)
    }
}

/// A binary input image specialised on its dimensionality.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BinaryRaster<'a, const D: usize> {
    view: ImageView<'a, bool>,
    pub sizes: [usize; D],
    strides: [usize; D],
    pub spacing: [f32; D],
    pub border: Border,
}

impl<'a, const D: usize> BinaryRaster<'a, D> {
    pub fn new(
        view: ImageView<'a, bool>,
        spacing: &Spacing,
        border: Border,
    ) -> Result<Self, RasterError> {
        let grid = view.grid();
        spacing.check_dimensionality(grid.dimensionality())?;
        let dims = grid.dimensionality();
        let (Some(sizes), Some(strides), Some(spacing)) = (
            grid.sizes_array::<D>(),
            grid.strides_array::<D>(),
            spacing.to_f32_array::<D>(),
        ) else {
            return Err(RasterError::Dimensionality(dims));
        };
        Ok(Self {
            view,
            sizes,
            strides,
            spacing,
            border,
        })
    }

    pub fn grid(&self) -> &'a Grid {
        self.view.grid()
    }

    /// `true` for object pixels.
    #[inline]
    pub fn is_object(&self, coords: [usize; D]) -> bool {
        let mut offset = 0;
        for d in 0..D {
            offset += coords[d] * self.strides[d];
        }
        self.view.at(offset)
    }

    /// Index of a pixel in the contiguous output.
    #[inline]
    pub fn index(&self, coords: [usize; D]) -> usize {
        let mut index = 0;
        let mut step = 1;
        for d in 0..D {
            index += coords[d] * step;
            step *= self.sizes[d];
        }
        index
    }

    pub fn lut(&self) -> SquaredDistanceLut<D> {
        SquaredDistanceLut::new(self.sizes, self.spacing)
    }

    pub fn min_spacing(&self) -> f32 {
        self.spacing.iter().copied().fold(f32::INFINITY, f32::min)
    }
}
