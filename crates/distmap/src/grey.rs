use distmap_core::{ImageView, Metric, Spacing, VectorImage};
use distmap_grey::GdtOutput;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::DistanceError;

/// Grey-weighted distance from every object pixel (`true` in `input`)
/// through the cost image `grey` to the background.
///
/// One output channel for [`GdtOutput::Gdt`] and [`GdtOutput::Euclidean`],
/// two for [`GdtOutput::Both`].
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(grey, input, spacing, metric),
        fields(sizes = ?input.sizes(), metric = %metric, output = %output)
    )
)]
pub fn grey_weighted_distance_transform<T: Copy + Into<f64>>(
    grey: ImageView<'_, T>,
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    metric: &Metric,
    output: GdtOutput,
) -> Result<VectorImage, DistanceError> {
    log::debug!("grey-weighted transform: metric {metric}, output {output}");
    Ok(distmap_grey::grey_weighted_distance_transform(
        grey, input, spacing, metric, output,
    )?)
}
