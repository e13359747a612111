use distmap_core::{Border, ImageView, Spacing, VectorImage};
use distmap_raster::RasterParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::DistanceError;
use crate::method::VdtMethod;

/// Displacement from every object pixel to its nearest background pixel,
/// one channel per axis, scaled by `spacing`.
///
/// Background pixels are 0. Pixels no background reaches (an all-object
/// image with an object border) get `-size_d * spacing_d` on every axis.
pub fn vector_distance_transform(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    method: VdtMethod,
) -> Result<VectorImage, DistanceError> {
    vector_distance_transform_with(input, spacing, border, method, &RasterParams::default())
}

/// As [`vector_distance_transform`], with explicit raster-scan tunables.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(input, spacing, params),
        fields(sizes = ?input.sizes(), method = %method, border = %border)
    )
)]
pub fn vector_distance_transform_with(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    method: VdtMethod,
    params: &RasterParams,
) -> Result<VectorImage, DistanceError> {
    log::debug!("vector transform: {method}, border {border}, sizes {:?}", input.sizes());
    Ok(distmap_raster::vector_map(
        input,
        spacing,
        border,
        method.raster_kernel(),
        params,
    )?)
}
