//! Per-axis squared-distance lookup tables.

/// `table_d[o + bias_d] = o² · spacing_d²` for every offset the scans can
/// produce along axis `d`.
#[derive(Clone, Debug)]
pub struct SquaredDistanceLut<const D: usize> {
    tables: [Vec<f32>; D],
    bias: [i32; D],
    maxdist: f32,
}

impl<const D: usize> SquaredDistanceLut<D> {
    /// Tables cover offsets in `-(n_d + 1)..=(n_d + 1)`: every in-image
    /// displacement plus one step past the edge.
    pub fn new(sizes: [usize; D], spacing: [f32; D]) -> Self {
        let mut maxdist = 0.0f32;
        let mut bias = [0i32; D];
        let tables = std::array::from_fn(|d| {
            let n = sizes[d] as i32 + 1;
            bias[d] = n;
            let s2 = spacing[d] * spacing[d];
            let nd = sizes[d] as f32;
            maxdist += nd * nd * s2;
            (-n..=n)
                .map(|o| {
                    let o = o as f32;
                    o * o * s2
                })
                .collect()
        });
        Self {
            tables,
            bias,
            maxdist,
        }
    }

    /// Squared weighted length of `offset`.
    #[inline]
    pub fn distance(&self, offset: &[i32; D]) -> f32 {
        let mut sum = 0.0;
        for d in 0..D {
            sum += self.tables[d][(offset[d] + self.bias[d]) as usize];
        }
        sum
    }

    /// Sentinel distance of pixels no candidate reaches: `Σ n_d² · s_d²`.
    pub fn maxdist(&self) -> f32 {
        self.maxdist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_symmetric_and_weighted() {
        let lut = SquaredDistanceLut::new([4, 3], [1.0, 2.0]);
        assert_eq!(lut.distance(&[0, 0]), 0.0);
        assert_eq!(lut.distance(&[3, 0]), 9.0);
        assert_eq!(lut.distance(&[-3, 0]), 9.0);
        assert_eq!(lut.distance(&[1, -2]), 1.0 + 16.0);
        assert_eq!(lut.distance(&[5, 4]), 25.0 + 64.0);
        assert_eq!(lut.maxdist(), 16.0 + 36.0);
    }
}
