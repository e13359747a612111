//! Runs a line filter over every line of an image, one dimension at a time.

use distmap_core::{Border, Image, ImageView, Spacing};

use crate::error::SeparableError;
use crate::line::{DistanceLineFilter, LinePass};

/// Copies each line of the working image into a (optionally zero padded)
/// contiguous buffer, filters it, and writes the result back in place.
#[derive(Clone, Debug)]
pub struct SeparableDriver {
    sizes: Vec<usize>,
    strides: Vec<usize>,
    padding: usize,
    input: Vec<f32>,
    output: Vec<f32>,
}

impl SeparableDriver {
    pub fn new(sizes: &[usize], border: Border) -> Self {
        let mut strides = Vec::with_capacity(sizes.len());
        let mut step = 1;
        for &n in sizes {
            strides.push(step);
            step *= n;
        }
        Self {
            sizes: sizes.to_vec(),
            strides,
            padding: match border {
                Border::Object => 0,
                Border::Background => 1,
            },
            input: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Dimensions the passes run over: all with more than one pixel, in
    /// order. A single-pixel image still gets one pass along dimension 0.
    pub fn pass_dimensions(&self) -> Vec<usize> {
        let dims: Vec<usize> = (0..self.sizes.len())
            .filter(|&d| self.sizes[d] > 1)
            .collect();
        if dims.is_empty() {
            vec![0]
        } else {
            dims
        }
    }

    /// Apply `filter` to every line of `data` along `dim`.
    pub fn run_pass(
        &mut self,
        data: &mut [f32],
        dim: usize,
        filter: &mut DistanceLineFilter,
        pass: &LinePass,
    ) {
        let n = self.sizes[dim];
        let stride = self.strides[dim];
        let pad = self.padding;
        self.input.clear();
        self.input.resize(n + 2 * pad, 0.0);
        self.output.clear();
        self.output.resize(n, 0.0);

        let blocks = data.len() / (n * stride);
        for block in 0..blocks {
            for inner in 0..stride {
                let start = block * n * stride + inner;
                for i in 0..n {
                    self.input[pad + i] = data[start + i * stride];
                }
                filter.filter(&self.input, &mut self.output, pad, pass);
                for i in 0..n {
                    data[start + i * stride] = self.output[i];
                }
            }
        }
    }
}

/// Exact Euclidean distance from every object pixel (`true`) to the
/// nearest background pixel, for any dimensionality.
///
/// With `squared` the squared distance is returned and no root is taken.
pub(crate) fn transform(
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    border: Border,
    squared: bool,
) -> Result<Image<f32>, SeparableError> {
    let sizes = input.sizes();
    spacing.check_dimensionality(sizes.len())?;

    let mut max_distance2 = 1.0f64;
    for (&n, &s) in sizes.iter().zip(spacing.values()) {
        let d = n as f64 * s;
        max_distance2 += d * d;
    }

    let mut data: Vec<f32> = input
        .values()
        .map(|object| if object { 1.0 } else { 0.0 })
        .collect();
    let mut driver = SeparableDriver::new(sizes, border);
    let mut filter = DistanceLineFilter::new(max_distance2 as f32, squared);
    let dims = driver.pass_dimensions();
    log::debug!(
        "separable: sizes {:?}, passes over {:?}, border {}",
        sizes,
        dims,
        border
    );

    for (index, &dim) in dims.iter().enumerate() {
        let pass = LinePass {
            spacing: spacing.get(dim) as f32,
            index,
            count: dims.len(),
            object_border: border == Border::Object,
        };
        driver.run_pass(&mut data, dim, &mut filter, &pass);
        log::trace!("separable: pass {} along dimension {} done", index, dim);
    }

    Ok(Image::from_vec(sizes, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_dimensions_are_skipped() {
        let driver = SeparableDriver::new(&[1, 5, 1, 3], Border::Object);
        assert_eq!(driver.pass_dimensions(), vec![1, 3]);
        let driver = SeparableDriver::new(&[1, 1], Border::Object);
        assert_eq!(driver.pass_dimensions(), vec![0]);
    }

    #[test]
    fn passes_visit_every_line() {
        // First pass along dimension 1 of a 2x3 image.
        let mut driver = SeparableDriver::new(&[2, 3], Border::Object);
        let mut filter = DistanceLineFilter::new(100.0, true);
        let mut data = vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        let pass = LinePass {
            spacing: 1.0,
            index: 0,
            count: 2,
            object_border: true,
        };
        driver.run_pass(&mut data, 1, &mut filter, &pass);
        // Column x=0: [0, 1, 1] -> [0, 1, 4]; column x=1: [1, 1, 0] -> [4, 1, 0].
        assert_eq!(data, vec![0.0, 4.0, 1.0, 1.0, 4.0, 0.0]);
    }

    #[test]
    fn single_object_pixel_with_background_border() {
        let grid = distmap_core::Grid::new(&[1, 1]).unwrap();
        let data = [true];
        let view = ImageView::new(&grid, &data).unwrap();
        let out = transform(view, &Spacing::isotropic(2), Border::Background, false).unwrap();
        assert_eq!(out.as_slice(), &[1.0]);
    }
}
