//! Reduction of a candidate list to the (near-)nearest offsets.

use crate::lut::SquaredDistanceLut;
use crate::params::TieMode;

/// Outcome of [`NeighborSearch::reduce`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult<const D: usize> {
    /// Number of candidates kept.
    pub count: usize,
    /// Smallest squared distance among the input candidates.
    pub min_distance: f32,
    /// Index of the first minimal candidate in the input order.
    pub min_position: usize,
    /// The minimal candidate itself.
    pub min_offset: [i32; D],
}

/// Candidate-set reducer shared by the `ties` and `true` scans.
///
/// Owns its distance scratch buffer so one instance serves a whole image.
#[derive(Clone, Debug)]
pub struct NeighborSearch {
    mode: TieMode,
    delta: f32,
    distances: Vec<f32>,
}

impl NeighborSearch {
    /// `delta` is the tolerance band of [`TieMode::True`] in physical units.
    pub fn new(mode: TieMode, delta: f32) -> Self {
        Self {
            mode,
            delta,
            distances: Vec::new(),
        }
    }

    pub fn mode(&self) -> TieMode {
        self.mode
    }

    /// Keep the candidates that are minimal (`Ties`) or within the
    /// tolerance band (`True`), preserving their order, then drop repeated
    /// offsets. `candidates` is truncated to the kept entries.
    ///
    /// Returns `None` for an empty candidate list.
    pub fn reduce<const D: usize>(
        &mut self,
        candidates: &mut Vec<[i32; D]>,
        lut: &SquaredDistanceLut<D>,
    ) -> Option<SearchResult<D>> {
        if candidates.is_empty() {
            return None;
        }
        self.distances.clear();
        self.distances
            .extend(candidates.iter().map(|c| lut.distance(c)));

        let mut min_distance = self.distances[0];
        let mut min_position = 0;
        for (i, &d) in self.distances.iter().enumerate().skip(1) {
            if d < min_distance {
                min_distance = d;
                min_position = i;
            }
        }
        let min_offset = candidates[min_position];

        let threshold = match self.mode {
            TieMode::Ties => min_distance,
            TieMode::True => {
                let t = min_distance.sqrt() + self.delta;
                t * t
            }
        };

        let mut kept = 0;
        for i in 0..candidates.len() {
            let accept = match self.mode {
                TieMode::Ties => self.distances[i] == threshold,
                TieMode::True => self.distances[i] <= threshold,
            };
            if accept {
                candidates[kept] = candidates[i];
                kept += 1;
            }
        }
        candidates.truncate(kept);
        dedup_unordered(candidates);

        Some(SearchResult {
            count: candidates.len(),
            min_distance,
            min_position,
            min_offset,
        })
    }
}

/// Remove repeated offsets. A duplicate is replaced by the last element,
/// which is then checked in its place.
fn dedup_unordered<const D: usize>(items: &mut Vec<[i32; D]>) {
    let mut k = 0;
    while k < items.len() {
        let mut i = k + 1;
        while i < items.len() {
            if items[i] == items[k] {
                items.swap_remove(i);
            } else {
                i += 1;
            }
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lut() -> SquaredDistanceLut<2> {
        SquaredDistanceLut::new([10, 10], [1.0, 1.0])
    }

    #[test]
    fn empty_input_has_no_result() {
        let mut search = NeighborSearch::new(TieMode::Ties, 0.8);
        let mut c: Vec<[i32; 2]> = Vec::new();
        assert!(search.reduce(&mut c, &lut()).is_none());
    }

    #[test]
    fn ties_keep_exact_minimum_and_drop_duplicates() {
        let mut search = NeighborSearch::new(TieMode::Ties, 0.8);
        let mut c = vec![[3, 0], [0, -2], [2, 0], [-2, 0], [0, -2], [1, 2]];
        let r = search.reduce(&mut c, &lut()).unwrap();
        assert_eq!(r.min_distance, 4.0);
        assert_eq!(r.min_position, 1);
        assert_eq!(r.min_offset, [0, -2]);
        assert_eq!(r.count, 3);
        assert_eq!(c.len(), 3);
        assert!(c.contains(&[0, -2]) && c.contains(&[2, 0]) && c.contains(&[-2, 0]));
    }

    #[test]
    fn true_mode_keeps_band_above_minimum() {
        let mut search = NeighborSearch::new(TieMode::True, 0.8);
        // min = 4, band = (2 + 0.8)^2 = 7.84
        let mut c = vec![[3, 0], [2, 0], [2, 1], [2, 2], [1, 2]];
        let r = search.reduce(&mut c, &lut()).unwrap();
        assert_eq!(r.min_position, 1);
        assert_eq!(c, vec![[2, 0], [2, 1], [1, 2]]);
        assert_eq!(r.count, 3);
    }

    #[test]
    fn count_never_exceeds_input_and_no_duplicates_remain() {
        let mut search = NeighborSearch::new(TieMode::True, 1.4);
        let mut c = vec![[1, 1], [1, 1], [1, 1], [-1, 1], [1, 1], [-1, 1]];
        let n = c.len();
        let r = search.reduce(&mut c, &lut()).unwrap();
        assert!(r.count <= n);
        assert_eq!(r.count, 2);
        for (i, a) in c.iter().enumerate() {
            assert!(c[i + 1..].iter().all(|b| b != a));
        }
    }
}
