//! Exact Euclidean distance transform for binary images of any
//! dimensionality, computed one dimension at a time.
//!
//! The first pass counts steps to the nearest background pixel along each
//! line; every later pass takes the lower envelope of the parabolas
//! `spacing² · (x - i)² + g(i)` over the previous result.
//!
//! ```
//! use distmap_core::{Border, Grid, ImageView, Spacing};
//! use distmap_separable::separable_distance_transform;
//!
//! let grid = Grid::new(&[3, 3]).unwrap();
//! let mut mask = [true; 9];
//! mask[0] = false;
//! let view = ImageView::new(&grid, &mask).unwrap();
//! let d = separable_distance_transform(view, &Spacing::isotropic(2), Border::Object, true)
//!     .unwrap();
//! assert_eq!(d.get(&[2, 2]), Some(8.0));
//! ```

mod driver;
mod error;
mod line;

use distmap_core::{Border, Image, ImageView, Spacing};

#[cfg(feature = "tracing")]
use tracing::instrument;

pub use driver::SeparableDriver;
pub use error::SeparableError;
pub use line::{DistanceLineFilter, LinePass};

/// Distance (or squared distance with `squared`) from every object pixel
/// (`true`) to the nearest background pixel.
///
/// `spacing` scales every axis inside the squared term, so anisotropic
/// sampling is honoured exactly.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(input, spacing), fields(sizes = ?input.sizes()))
)]
pub fn separable_distance_transform(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    squared: bool,
) -> Result<Image<f32>, SeparableError> {
    driver::transform(input, spacing, border, squared)
}
