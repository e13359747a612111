use distmap_core::{Border, Image, ImageView, Spacing};
use distmap_raster::RasterParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::DistanceError;
use crate::method::EdtMethod;

/// Distance from every object pixel (`true`) to the nearest background
/// pixel.
///
/// [`EdtMethod::Square`] returns squared distances, every other method
/// plain distances. The separable methods accept any dimensionality, the
/// raster methods 2D and 3D only.
pub fn euclidean_distance_transform(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    method: EdtMethod,
) -> Result<Image<f32>, DistanceError> {
    euclidean_distance_transform_with(input, spacing, border, method, &RasterParams::default())
}

/// As [`euclidean_distance_transform`], with explicit raster-scan tunables.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(input, spacing, params),
        fields(sizes = ?input.sizes(), method = %method, border = %border)
    )
)]
pub fn euclidean_distance_transform_with(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    method: EdtMethod,
    params: &RasterParams,
) -> Result<Image<f32>, DistanceError> {
    log::debug!("euclidean transform: {method}, border {border}, sizes {:?}", input.sizes());
    let out = match method.raster_kernel() {
        None => distmap_separable::separable_distance_transform(
            input,
            spacing,
            border,
            method == EdtMethod::Square,
        )?,
        Some(kernel) => {
            distmap_raster::distance_map(input, spacing, border, kernel, params, false)?
        }
    };
    Ok(out)
}
