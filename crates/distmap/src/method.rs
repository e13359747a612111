//! Method names accepted by the façades.

use std::fmt;
use std::str::FromStr;

use distmap_core::InvalidFlag;
use distmap_raster::RasterKernel;
use serde::{Deserialize, Serialize};

/// Algorithm of [`euclidean_distance_transform`](crate::euclidean_distance_transform).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdtMethod {
    /// Exact, any dimensionality.
    #[default]
    #[serde(rename = "separable")]
    Separable,
    /// As `Separable`, returning squared distances.
    #[serde(rename = "square")]
    Square,
    /// Raster scan keeping one offset per pixel; 2D/3D, approximate.
    #[serde(rename = "fast")]
    Fast,
    /// Raster scan keeping all equally near offsets; 2D/3D.
    #[serde(rename = "ties")]
    Ties,
    /// Raster scan keeping near-minimal offsets; 2D/3D, exact in practice.
    #[serde(rename = "true")]
    True,
    /// Exhaustive search; 2D/3D, object border only.
    #[serde(rename = "brute force", alias = "brute-force")]
    BruteForce,
}

impl EdtMethod {
    pub const ALL: [EdtMethod; 6] = [
        EdtMethod::Separable,
        EdtMethod::Square,
        EdtMethod::Fast,
        EdtMethod::Ties,
        EdtMethod::True,
        EdtMethod::BruteForce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EdtMethod::Separable => "separable",
            EdtMethod::Square => "square",
            EdtMethod::Fast => "fast",
            EdtMethod::Ties => "ties",
            EdtMethod::True => "true",
            EdtMethod::BruteForce => "brute force",
        }
    }

    /// The raster kernel behind this method, if it is one.
    pub fn raster_kernel(self) -> Option<RasterKernel> {
        match self {
            EdtMethod::Separable | EdtMethod::Square => None,
            EdtMethod::Fast => Some(RasterKernel::Fast),
            EdtMethod::Ties => Some(RasterKernel::Ties),
            EdtMethod::True => Some(RasterKernel::True),
            EdtMethod::BruteForce => Some(RasterKernel::BruteForce),
        }
    }
}

/// Algorithm of [`vector_distance_transform`](crate::vector_distance_transform).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VdtMethod {
    #[default]
    #[serde(rename = "fast")]
    Fast,
    #[serde(rename = "ties")]
    Ties,
    #[serde(rename = "true")]
    True,
    #[serde(rename = "brute force", alias = "brute-force")]
    BruteForce,
}

impl VdtMethod {
    pub const ALL: [VdtMethod; 4] = [
        VdtMethod::Fast,
        VdtMethod::Ties,
        VdtMethod::True,
        VdtMethod::BruteForce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VdtMethod::Fast => "fast",
            VdtMethod::Ties => "ties",
            VdtMethod::True => "true",
            VdtMethod::BruteForce => "brute force",
        }
    }

    pub fn raster_kernel(self) -> RasterKernel {
        match self {
            VdtMethod::Fast => RasterKernel::Fast,
            VdtMethod::Ties => RasterKernel::Ties,
            VdtMethod::True => RasterKernel::True,
            VdtMethod::BruteForce => RasterKernel::BruteForce,
        }
    }
}

impl fmt::Display for EdtMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VdtMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdtMethod {
    type Err = InvalidFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = if s == "brute-force" { "brute force" } else { s };
        EdtMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| InvalidFlag::new(s))
    }
}

impl FromStr for VdtMethod {
    type Err = InvalidFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = if s == "brute-force" { "brute force" } else { s };
        VdtMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| InvalidFlag::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for m in EdtMethod::ALL {
            assert_eq!(m.to_string().parse::<EdtMethod>().unwrap(), m);
            let json = serde_json::to_string(&m).unwrap();
            assert_eq!(json, format!("\"{}\"", m.as_str()));
        }
        for m in VdtMethod::ALL {
            assert_eq!(m.to_string().parse::<VdtMethod>().unwrap(), m);
        }
    }

    #[test]
    fn dashed_brute_force_is_accepted() {
        assert_eq!("brute-force".parse::<EdtMethod>().unwrap(), EdtMethod::BruteForce);
        let m: VdtMethod = serde_json::from_str("\"brute-force\"").unwrap();
        assert_eq!(m, VdtMethod::BruteForce);
    }

    #[test]
    fn unknown_names_are_invalid_flags() {
        let err = "exact".parse::<EdtMethod>().unwrap_err();
        assert_eq!(err.flag(), "exact");
        assert_eq!(err.to_string(), "invalid flag: \"exact\"");
        // Vector transforms have no separable method.
        assert!("separable".parse::<VdtMethod>().is_err());
    }
}
