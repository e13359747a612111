//! Shared types for the `distmap` distance-transform crates.
//!
//! * [`Grid`] / [`Spacing`] / [`Border`]: array geometry and boundary
//!   handling.
//! * [`Image`], [`ImageView`], [`VectorImage`]: owned and strided pixel
//!   storage.
//! * [`Metric`] / [`NeighborList`]: neighbourhoods for the grey-weighted
//!   transform.
//!
//! Nothing here depends on a particular transform algorithm.

mod flag;
mod grid;
mod image;
mod logger;
mod metric;

pub use flag::InvalidFlag;
pub use grid::{Border, Grid, GridError, Offsets, Spacing};
pub use image::{radius_coordinate, BinaryImage, Image, ImageView, VectorImage};
pub use metric::{Metric, MetricError, Neighbor, NeighborList};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_env, LOG_ENV};
