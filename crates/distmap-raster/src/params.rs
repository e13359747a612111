use serde::{Deserialize, Serialize};

/// Which candidate sets the tie-resolving scan keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieMode {
    /// Only candidates at exactly the minimal distance.
    Ties,
    /// Candidates within a tolerance band above the minimum.
    True,
}

/// Tunables of the tie-resolving scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterParams {
    /// Tolerance band of the `true` mode in 2D, as a multiple of the
    /// smallest pixel spacing.
    pub delta_2d: f32,
    /// Same for 3D. Applies to distance and vector output alike.
    pub delta_3d: f32,
    /// Initial candidate-arena capacity per pixel in `ties` mode is
    /// `2 * dim - 1`; `true` mode multiplies it by this factor. Arenas grow
    /// on demand, so this only affects the first allocation.
    pub true_arena_factor: usize,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            delta_2d: 0.8,
            delta_3d: 1.4,
            true_arena_factor: 50,
        }
    }
}

impl RasterParams {
    /// Band in physical units: the factor times the smallest spacing.
    ///
    /// Scalar and vector output read the same nearest-pixel field, so both
    /// use the scaled band; a spacing-free band would make the kept
    /// candidates depend on the unit the spacing is given in.
    pub(crate) fn delta(&self, dims: usize, min_spacing: f32) -> f32 {
        let factor = if dims == 2 { self.delta_2d } else { self.delta_3d };
        factor * min_spacing
    }

    pub(crate) fn candidates_per_pixel(&self, dims: usize, mode: TieMode) -> usize {
        let guess = 2 * dims - 1;
        match mode {
            TieMode::Ties => guess,
            TieMode::True => guess * self.true_arena_factor.max(1),
        }
    }
}
