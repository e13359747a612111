//! Raster-scan and brute-force Euclidean distance transforms for 2D and 3D
//! binary images.
//!
//! Every kernel produces a [`NearestField`]: for each object pixel the
//! displacement to the nearest background pixel it found. The field maps
//! to a scalar distance image or to a per-axis vector image.
//!
//! ```
//! use distmap_core::{Border, Grid, ImageView, Spacing};
//! use distmap_raster::{distance_map, RasterKernel, RasterParams};
//!
//! let grid = Grid::new(&[5, 1]).unwrap();
//! let mask = [true, true, false, true, true];
//! let view = ImageView::new(&grid, &mask).unwrap();
//! let d = distance_map(
//!     view,
//!     &Spacing::isotropic(2),
//!     Border::Object,
//!     RasterKernel::True,
//!     &RasterParams::default(),
//!     false,
//! )
//! .unwrap();
//! assert_eq!(d.as_slice(), &[2.0, 1.0, 0.0, 1.0, 2.0]);
//! ```

mod brute;
mod error;
mod fast;
mod field;
mod lut;
mod params;
mod search;
mod ties;

use distmap_core::{Border, Image, ImageView, Spacing, VectorImage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use error::RasterError;
pub use field::{Nearest, NearestField};
pub use lut::SquaredDistanceLut;
pub use params::{RasterParams, TieMode};
pub use search::{NeighborSearch, SearchResult};

use field::BinaryRaster;

/// Raster-family algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RasterKernel {
    /// Single offset per pixel; approximate.
    Fast,
    /// Candidate sets of exactly minimal offsets.
    Ties,
    /// Candidate sets within a tolerance band; exact in practice.
    True,
    /// Exhaustive search over the boundary pixels; object border only.
    BruteForce,
}

/// Kernel output for a 2D or a 3D image.
#[derive(Clone, Debug)]
pub enum NearestMap {
    Two(NearestField<2>),
    Three(NearestField<3>),
}

impl NearestMap {
    pub fn dimensionality(&self) -> usize {
        match self {
            NearestMap::Two(_) => 2,
            NearestMap::Three(_) => 3,
        }
    }

    pub fn to_distance(&self, squared: bool) -> Result<Image<f32>, RasterError> {
        match self {
            NearestMap::Two(f) => f.to_distance(squared),
            NearestMap::Three(f) => f.to_distance(squared),
        }
    }

    pub fn to_vectors(&self) -> Result<VectorImage, RasterError> {
        match self {
            NearestMap::Two(f) => f.to_vectors(),
            NearestMap::Three(f) => f.to_vectors(),
        }
    }
}

fn run_2d(
    input: &BinaryRaster<'_, 2>,
    kernel: RasterKernel,
    params: &RasterParams,
) -> Result<NearestField<2>, RasterError> {
    Ok(match kernel {
        RasterKernel::Fast => fast::fast_2d(input),
        RasterKernel::Ties => ties::ties_2d(input, TieMode::Ties, params),
        RasterKernel::True => ties::ties_2d(input, TieMode::True, params),
        RasterKernel::BruteForce => brute::brute_force(input)?,
    })
}

fn run_3d(
    input: &BinaryRaster<'_, 3>,
    kernel: RasterKernel,
    params: &RasterParams,
) -> Result<NearestField<3>, RasterError> {
    Ok(match kernel {
        RasterKernel::Fast => fast::fast_3d(input),
        RasterKernel::Ties => ties::ties_3d(input, TieMode::Ties, params),
        RasterKernel::True => ties::ties_3d(input, TieMode::True, params),
        RasterKernel::BruteForce => brute::brute_force(input)?,
    })
}

/// Run `kernel` on a 2D or 3D binary image (`true` = object).
///
/// Fails before any work on a dimensionality other than 2 or 3, on a
/// spacing of the wrong length and, for [`RasterKernel::BruteForce`], on
/// [`Border::Background`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(input, spacing, params), fields(sizes = ?input.sizes()))
)]
pub fn nearest_map(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    kernel: RasterKernel,
    params: &RasterParams,
) -> Result<NearestMap, RasterError> {
    spacing.check_dimensionality(input.dimensionality())?;
    match input.dimensionality() {
        2 => {
            let raster = BinaryRaster::<2>::new(input, spacing, border)?;
            Ok(NearestMap::Two(run_2d(&raster, kernel, params)?))
        }
        3 => {
            let raster = BinaryRaster::<3>::new(input, spacing, border)?;
            Ok(NearestMap::Three(run_3d(&raster, kernel, params)?))
        }
        dims => Err(RasterError::Dimensionality(dims)),
    }
}

/// Scalar distance (or squared distance) to the nearest background pixel.
pub fn distance_map(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    kernel: RasterKernel,
    params: &RasterParams,
    squared: bool,
) -> Result<Image<f32>, RasterError> {
    nearest_map(input, spacing, border, kernel, params)?.to_distance(squared)
}

/// Displacement to the nearest background pixel, one channel per axis.
pub fn vector_map(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    kernel: RasterKernel,
    params: &RasterParams,
) -> Result<VectorImage, RasterError> {
    nearest_map(input, spacing, border, kernel, params)?.to_vectors()
}
