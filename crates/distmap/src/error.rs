use distmap_core::{GridError, InvalidFlag, MetricError};
use distmap_grey::GreyError;
use distmap_raster::RasterError;
use distmap_separable::SeparableError;

/// I/O and JSON failures while reading or writing configuration and
/// reports.
#[derive(thiserror::Error, Debug)]
pub enum DistanceIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Errors produced by the façade functions.
#[derive(thiserror::Error, Debug)]
pub enum DistanceError {
    #[error(transparent)]
    InvalidFlag(#[from] InvalidFlag),

    #[error("{transform} transform needs a grey image")]
    MissingGrey { transform: &'static str },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Separable(#[from] SeparableError),

    #[error(transparent)]
    Grey(#[from] GreyError),

    #[error(transparent)]
    Io(#[from] DistanceIoError),
}
