use distmap_core::GridError;

/// Errors returned by the raster-scan kernels.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    #[error("raster transforms need a 2D or 3D image, got {0}D")]
    Dimensionality(usize),
    #[error("the brute-force transform only supports an object border")]
    BackgroundBorder,
    #[error(transparent)]
    Grid(#[from] GridError),
}
