use distmap_core::{GridError, MetricError};

/// Errors returned by the grey-weighted transform.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GreyError {
    #[error("grey-weighted transform needs a 2D or 3D image, got {0}D")]
    Dimensionality(usize),
    #[error("grey image must be non-negative (minimum {0})")]
    NegativeGrey(f64),
    #[error("grey image contains NaN")]
    NanGrey,
    #[error(transparent)]
    Metric(#[from] MetricError),
    #[error(transparent)]
    Grid(#[from] GridError),
}
