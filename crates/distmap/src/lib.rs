//! Distance transforms for n-dimensional binary images.
//!
//! This crate provides:
//! - [`euclidean_distance_transform`]: distance from each object pixel to the
//!   nearest background pixel, exact (separable) or by raster scanning.
//! - [`vector_distance_transform`]: the displacement to that pixel, one
//!   channel per axis.
//! - [`grey_weighted_distance_transform`]: cheapest path to the background
//!   through a cost image.
//! - (feature `image`) loading masks and cost images, writing 16-bit PNGs.
//!
//! ## Quickstart
//!
//! ```
//! use distmap::{euclidean_distance_transform, Border, EdtMethod, Image, Spacing};
//!
//! # fn main() -> Result<(), distmap::DistanceError> {
//! // Object everywhere except the centre pixel.
//! let mask = Image::from_fn(&[5, 5], |c| c != [2, 2])?;
//! let d = euclidean_distance_transform(
//!     mask.view(),
//!     &Spacing::isotropic(2),
//!     Border::Object,
//!     EdtMethod::Separable,
//! )?;
//! assert_eq!(d.get(&[2, 2]), Some(0.0));
//! assert_eq!(d.get(&[4, 2]), Some(2.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `distmap::core`: grids, spacing, images, neighbourhood metrics.
//! - `distmap::raster`: fast/ties/true raster scans and brute force, 2D and 3D.
//! - `distmap::separable`: exact separable transform for any dimensionality.
//! - `distmap::grey_weighted`: grey-weighted transform.
//! - `distmap::image_io` (feature `image`): PNG input and output.

mod error;
mod euclidean;
mod grey;
mod io;
mod method;
mod vector;

#[cfg(feature = "image")]
pub mod image_io;

pub use distmap_core as core;
pub use distmap_grey as grey_weighted;
pub use distmap_raster as raster;
pub use distmap_separable as separable;

pub use distmap_core::{
    radius_coordinate, BinaryImage, Border, Grid, Image, ImageView, InvalidFlag, Metric, Spacing,
    VectorImage,
};
pub use distmap_grey::GdtOutput;
pub use distmap_raster::{RasterParams, TieMode};

pub use error::{DistanceError, DistanceIoError};
pub use euclidean::{euclidean_distance_transform, euclidean_distance_transform_with};
pub use grey::grey_weighted_distance_transform;
pub use io::{
    ChannelDump, ChannelStats, TransformConfig, TransformKind, TransformOutput, TransformReport,
};
pub use method::{EdtMethod, VdtMethod};
pub use vector::{vector_distance_transform, vector_distance_transform_with};
