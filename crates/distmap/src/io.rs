//! JSON configuration and report helpers.

use std::{
    fs,
    path::{Path, PathBuf},
};

use distmap_core::{Border, Image, ImageView, Metric, Spacing, VectorImage};
use distmap_grey::GdtOutput;
use distmap_raster::RasterParams;
use serde::{Deserialize, Serialize};

use crate::error::{DistanceError, DistanceIoError};
use crate::method::{EdtMethod, VdtMethod};
use crate::{
    euclidean_distance_transform_with, grey_weighted_distance_transform,
    vector_distance_transform_with,
};

/// Which family of transform a configuration runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    #[default]
    Euclidean,
    Vector,
    Grey,
}

impl TransformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::Euclidean => "euclidean",
            TransformKind::Vector => "vector",
            TransformKind::Grey => "grey",
        }
    }
}

fn default_scale() -> f32 {
    1.0
}

/// A complete transform run, loadable from JSON.
///
/// Every field has a default, so `{}` is a valid configuration: a separable
/// Euclidean transform with a background border and unit spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub transform: TransformKind,
    /// Method name; `None` picks the default of `transform`.
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub border: Border,
    /// Pixel spacing; `None` means 1 on every axis.
    #[serde(default)]
    pub spacing: Option<Spacing>,
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub output: GdtOutput,
    #[serde(default)]
    pub raster: RasterParams,
    /// Binary mask image; non-zero pixels are object.
    #[serde(default)]
    pub input_path: Option<String>,
    /// Cost image for the grey-weighted transform.
    #[serde(default)]
    pub grey_path: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Factor applied before rounding scalar results to 16-bit pixels.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            transform: TransformKind::default(),
            method: None,
            border: Border::default(),
            spacing: None,
            metric: Metric::default(),
            output: GdtOutput::default(),
            raster: RasterParams::default(),
            input_path: None,
            grey_path: None,
            output_path: None,
            scale: default_scale(),
        }
    }
}

impl TransformConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DistanceIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DistanceIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                PathBuf::from(match self.transform {
                    TransformKind::Vector => "distmap_vectors.json",
                    _ => "distmap.png",
                })
            })
    }

    pub fn edt_method(&self) -> Result<EdtMethod, DistanceError> {
        Ok(match &self.method {
            Some(name) => name.parse()?,
            None => EdtMethod::default(),
        })
    }

    pub fn vdt_method(&self) -> Result<VdtMethod, DistanceError> {
        Ok(match &self.method {
            Some(name) => name.parse()?,
            None => VdtMethod::default(),
        })
    }

    /// Configured spacing, or unit spacing for `dims` dimensions.
    pub fn spacing_for(&self, dims: usize) -> Result<Spacing, DistanceError> {
        match &self.spacing {
            Some(s) => {
                s.check_dimensionality(dims)?;
                Ok(s.clone())
            }
            None => Ok(Spacing::isotropic(dims)),
        }
    }

    /// Run the configured transform. `grey` is required for
    /// [`TransformKind::Grey`] and ignored otherwise.
    pub fn run(
        &self,
        input: ImageView<'_, bool>,
        grey: Option<ImageView<'_, f32>>,
    ) -> Result<TransformOutput, DistanceError> {
        let spacing = self.spacing_for(input.dimensionality())?;
        match self.transform {
            TransformKind::Euclidean => {
                let method = self.edt_method()?;
                euclidean_distance_transform_with(input, &spacing, self.border, method, &self.raster)
                    .map(TransformOutput::Scalar)
            }
            TransformKind::Vector => {
                let method = self.vdt_method()?;
                vector_distance_transform_with(input, &spacing, self.border, method, &self.raster)
                    .map(TransformOutput::Channels)
            }
            TransformKind::Grey => {
                let grey = grey.ok_or(DistanceError::MissingGrey { transform: "grey" })?;
                grey_weighted_distance_transform(grey, input, &spacing, &self.metric, self.output)
                    .map(TransformOutput::Channels)
            }
        }
    }
}

/// Result of [`TransformConfig::run`].
#[derive(Clone, Debug, PartialEq)]
pub enum TransformOutput {
    Scalar(Image<f32>),
    Channels(VectorImage),
}

impl TransformOutput {
    pub fn sizes(&self) -> &[usize] {
        match self {
            TransformOutput::Scalar(img) => img.sizes(),
            TransformOutput::Channels(img) => img.sizes(),
        }
    }

    /// Per-channel statistics.
    pub fn report(&self) -> TransformReport {
        let channels = match self {
            TransformOutput::Scalar(img) => vec![ChannelStats::of(img.as_slice())],
            TransformOutput::Channels(img) => (0..img.channel_count())
                .map(|c| ChannelStats::of(img.channel(c)))
                .collect(),
        };
        TransformReport {
            sizes: self.sizes().to_vec(),
            channels,
        }
    }
}

/// Summary statistics of one output channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
}

impl ChannelStats {
    fn of(values: &[f32]) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
        }
        let mean = if values.is_empty() {
            0.0
        } else {
            sum / values.len() as f64
        };
        Self { min, max, mean }
    }
}

/// JSON summary printed by the command line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformReport {
    pub sizes: Vec<usize>,
    pub channels: Vec<ChannelStats>,
}

/// Vector output as JSON: sizes plus one flat array per channel, dimension
/// 0 fastest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelDump {
    pub sizes: Vec<usize>,
    pub channels: Vec<Vec<f32>>,
}

impl ChannelDump {
    pub fn from_output(output: &TransformOutput) -> Self {
        match output {
            TransformOutput::Scalar(img) => Self {
                sizes: img.sizes().to_vec(),
                channels: vec![img.as_slice().to_vec()],
            },
            TransformOutput::Channels(img) => Self::from_vectors(img),
        }
    }

    pub fn from_vectors(img: &VectorImage) -> Self {
        Self {
            sizes: img.sizes().to_vec(),
            channels: (0..img.channel_count())
                .map(|c| img.channel(c).to_vec())
                .collect(),
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DistanceIoError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
