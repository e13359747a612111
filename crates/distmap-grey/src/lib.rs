//! Grey-weighted geodesic distance transform for 2D and 3D images.
//!
//! Distances grow from the background through the object; each step to a
//! neighbour costs its physical length times the neighbour's grey value.
//! The neighbourhood is any [`Metric`](distmap_core::Metric).
//!
//! ```
//! use distmap_core::{Grid, ImageView, Metric, Spacing};
//! use distmap_grey::{grey_weighted_distance_transform, GdtOutput};
//!
//! let grid = Grid::new(&[5, 3]).unwrap();
//! let mut mask = [true; 15];
//! mask[1 + 5] = false;
//! let grey = [2.0f32; 15];
//! let out = grey_weighted_distance_transform(
//!     ImageView::new(&grid, &grey).unwrap(),
//!     ImageView::new(&grid, &mask).unwrap(),
//!     &Spacing::isotropic(2),
//!     &Metric::default(),
//!     GdtOutput::Gdt,
//! )
//! .unwrap();
//! assert_eq!(out.channel(0)[3 + 5], 4.0);
//! ```

mod error;
mod gdt;
mod heap;

use distmap_core::{ImageView, Metric, Spacing, VectorImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use error::GreyError;
pub use gdt::GdtOutput;

/// Grey-weighted distance of every object pixel (`true` in `input`) to the
/// background.
///
/// `grey` must have the sizes of `input`, be non-negative and contain no
/// NaN. The result has one channel for [`GdtOutput::Gdt`] and
/// [`GdtOutput::Euclidean`], two for [`GdtOutput::Both`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(grey, input, spacing), fields(sizes = ?input.sizes()))
)]
pub fn grey_weighted_distance_transform<T: Copy + Into<f64>>(
    grey: ImageView<'_, T>,
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    metric: &Metric,
    output: GdtOutput,
) -> Result<VectorImage, GreyError> {
    gdt::transform(grey, input, spacing, metric, output)
}
