//! Exhaustive reference transform: every object pixel is compared against
//! every background pixel on the object boundary.
//!
//! Quadratic in the image size; meant for validating the scan kernels on
//! small images.

use distmap_core::Border;

use crate::error::RasterError;
use crate::field::{BinaryRaster, Nearest, NearestField};

fn unravel<const D: usize>(mut index: usize, sizes: &[usize; D]) -> [usize; D] {
    let mut coords = [0; D];
    for d in 0..D {
        coords[d] = index % sizes[d];
        index /= sizes[d];
    }
    coords
}

/// Whether a face neighbour of `coords` inside the image is object.
fn touches_object<const D: usize>(input: &BinaryRaster<'_, D>, coords: [usize; D]) -> bool {
    (0..D).any(|d| {
        let mut n = coords;
        let below = coords[d] > 0 && {
            n[d] = coords[d] - 1;
            input.is_object(n)
        };
        below || {
            n[d] = coords[d] + 1;
            n[d] < input.sizes[d] && input.is_object(n)
        }
    })
}

pub(crate) fn brute_force<const D: usize>(
    input: &BinaryRaster<'_, D>,
) -> Result<NearestField<D>, RasterError> {
    if input.border == Border::Background {
        return Err(RasterError::BackgroundBorder);
    }
    let lut = input.lut();
    let mut field = NearestField::new(input, &lut);
    let count: usize = input.sizes.iter().product();

    let boundary: Vec<[usize; D]> = (0..count)
        .map(|i| unravel(i, &input.sizes))
        .filter(|&c| !input.is_object(c) && touches_object(input, c))
        .collect();
    log::debug!(
        "brute force {}D: {} boundary pixels, {} pixels",
        D,
        boundary.len(),
        count
    );

    for i in 0..count {
        let coords = unravel(i, &input.sizes);
        if !input.is_object(coords) {
            continue;
        }
        let mut best = lut.maxdist();
        let mut nearest = Nearest::Unreachable;
        for b in &boundary {
            let offset: [i32; D] =
                std::array::from_fn(|d| b[d] as i32 - coords[d] as i32);
            let d2 = lut.distance(&offset);
            if d2 < best {
                best = d2;
                nearest = Nearest::Found {
                    offset,
                    distance2: d2,
                };
            }
        }
        field.set(input.index(coords), nearest);
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use distmap_core::{Grid, ImageView, Spacing};

    #[test]
    fn interior_background_is_ignored() {
        // Only the background pixel next to the object counts.
        let grid = Grid::new(&[5, 1]).unwrap();
        let data = [true, true, false, false, false];
        let view = ImageView::new(&grid, &data).unwrap();
        let input = BinaryRaster::new(view, &Spacing::isotropic(2), Border::Object).unwrap();
        let field = brute_force::<2>(&input).unwrap();
        assert_eq!(
            field.get([0, 0]),
            Some(Nearest::Found { offset: [2, 0], distance2: 4.0 })
        );
        assert_eq!(field.get([4, 0]), Some(Nearest::Background));
    }

    #[test]
    fn anisotropic_spacing_picks_the_physically_closer_pixel() {
        let grid = Grid::new(&[3, 3]).unwrap();
        let mut data = [true; 9];
        data[grid.offset(&[0, 1])] = false;
        data[grid.offset(&[1, 0])] = false;
        let view = ImageView::new(&grid, &data).unwrap();
        let spacing = Spacing::new(vec![1.0, 3.0]).unwrap();
        let input = BinaryRaster::new(view, &spacing, Border::Object).unwrap();
        let field = brute_force::<2>(&input).unwrap();
        // From (1,1): (0,1) is 1 away, (1,0) is 3 away.
        assert_eq!(
            field.get([1, 1]),
            Some(Nearest::Found { offset: [-1, 0], distance2: 1.0 })
        );
    }

    #[test]
    fn empty_boundary_is_unreachable() {
        let grid = Grid::new(&[2, 2, 2]).unwrap();
        let data = [true; 8];
        let view = ImageView::new(&grid, &data).unwrap();
        let input = BinaryRaster::new(view, &Spacing::isotropic(3), Border::Object).unwrap();
        let field = brute_force::<3>(&input).unwrap();
        assert!(field.cells().iter().all(|c| *c == Nearest::Unreachable));
    }

    #[test]
    fn background_border_is_rejected() {
        let grid = Grid::new(&[2, 2]).unwrap();
        let data = [true; 4];
        let view = ImageView::new(&grid, &data).unwrap();
        let input = BinaryRaster::new(view, &Spacing::isotropic(2), Border::Background).unwrap();
        assert_eq!(
            brute_force::<2>(&input).unwrap_err(),
            RasterError::BackgroundBorder
        );
    }
}
