//! Grey-weighted distance transform: a Dijkstra wavefront from the
//! background, where stepping onto a pixel costs the step length times the
//! pixel's grey value.

use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use distmap_core::{Image, ImageView, InvalidFlag, Metric, NeighborList, Spacing, VectorImage};
use serde::{Deserialize, Serialize};

use crate::error::GreyError;
use crate::heap::HeapNode;

/// Which channels the transform returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GdtOutput {
    /// Grey-weighted distance.
    #[default]
    #[serde(rename = "GDT")]
    Gdt,
    /// Physical length of the grey-weighted shortest path.
    #[serde(rename = "Euclidean")]
    Euclidean,
    /// Both of the above, in that channel order.
    #[serde(rename = "both")]
    Both,
}

impl GdtOutput {
    pub fn as_str(self) -> &'static str {
        match self {
            GdtOutput::Gdt => "GDT",
            GdtOutput::Euclidean => "Euclidean",
            GdtOutput::Both => "both",
        }
    }

    fn tracks_length(self) -> bool {
        !matches!(self, GdtOutput::Gdt)
    }
}

impl fmt::Display for GdtOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GdtOutput {
    type Err = InvalidFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GDT" => Ok(GdtOutput::Gdt),
            "Euclidean" => Ok(GdtOutput::Euclidean),
            "both" => Ok(GdtOutput::Both),
            other => Err(InvalidFlag::new(other)),
        }
    }
}

/// Validated inputs copied into contiguous buffers.
struct Problem {
    sizes: Vec<usize>,
    strides: Vec<usize>,
    object: Vec<bool>,
    grey: Vec<f32>,
}

impl Problem {
    fn new<T: Copy + Into<f64>>(
        grey: ImageView<'_, T>,
        input: ImageView<'_, bool>,
    ) -> Result<Self, GreyError> {
        input.grid().check_same_sizes(grey.grid())?;
        let dims = input.dimensionality();
        if !(2..=3).contains(&dims) {
            return Err(GreyError::Dimensionality(dims));
        }

        let mut min = f64::INFINITY;
        let mut values = Vec::with_capacity(input.grid().pixel_count());
        for v in grey.values() {
            let v: f64 = v.into();
            if v.is_nan() {
                return Err(GreyError::NanGrey);
            }
            min = min.min(v);
            values.push(v as f32);
        }
        if min < 0.0 {
            return Err(GreyError::NegativeGrey(min));
        }

        let grid = input.grid().contiguous();
        Ok(Self {
            sizes: grid.sizes().to_vec(),
            strides: grid.strides().to_vec(),
            object: input.values().collect(),
            grey: values,
        })
    }

    /// `true` for pixels at least `border[d]` away from every image edge.
    fn interior(&self, border: &[usize]) -> Result<Image<bool>, GreyError> {
        Ok(Image::from_fn(&self.sizes, |c| {
            c.iter()
                .zip(&self.sizes)
                .zip(border)
                .all(|((&x, &n), &b)| x >= b && x + b < n)
        })?)
    }
}

/// Grey-weighted distance from every object pixel (`true` in `input`) to
/// the background, accumulating `step length × grey` along the path.
///
/// Pixels closer to the image edge than the neighbourhood reaches are set
/// to 0. Object pixels the wavefront never reaches keep `f32::MAX`.
pub(crate) fn transform<T: Copy + Into<f64>>(
    grey: ImageView<'_, T>,
    input: ImageView<'_, bool>,
    spacing: &Spacing,
    metric: &Metric,
    output: GdtOutput,
) -> Result<VectorImage, GreyError> {
    let problem = Problem::new(grey, input)?;
    let neighbors = NeighborList::new(metric, problem.sizes.len(), spacing)?;
    let border = neighbors.border();
    let offsets = neighbors.linear_offsets(&problem.strides)?;
    let weights: Vec<f32> = neighbors.weights().map(|w| w as f32).collect();
    let interior = problem.interior(&border)?;
    let interior = interior.as_slice();
    let n = interior.len();

    let track = output.tracks_length();
    let mut value = vec![0.0f32; n];
    let mut length = vec![0.0f32; if track { n } else { 0 }];
    let mut heap = BinaryHeap::new();

    for i in 0..n {
        if !interior[i] {
            continue;
        }
        if problem.object[i] {
            value[i] = f32::MAX;
        } else if offsets
            .iter()
            .any(|&o| problem.object[i.wrapping_add_signed(o)])
        {
            heap.push(HeapNode { value: 0.0, offset: i });
        }
    }
    log::debug!(
        "grey-weighted: sizes {:?}, {} neighbours, border {:?}, {} seeds",
        problem.sizes,
        neighbors.len(),
        border,
        heap.len()
    );

    let mut peak = heap.len();
    let mut expanded = 0usize;
    while let Some(node) = heap.pop() {
        let current = value[node.offset];
        if node.value > current {
            continue;
        }
        expanded += 1;
        for (&o, &w) in offsets.iter().zip(&weights) {
            let nb = node.offset.wrapping_add_signed(o);
            let candidate = current + w * problem.grey[nb];
            if candidate < value[nb] {
                value[nb] = candidate;
                if track {
                    length[nb] = length[node.offset] + w;
                }
                heap.push(HeapNode {
                    value: candidate,
                    offset: nb,
                });
            }
        }
        peak = peak.max(heap.len());
    }
    log::debug!("grey-weighted: expanded {expanded} pixels, queue peak {peak}");

    let channels = match output {
        GdtOutput::Gdt => vec![value],
        GdtOutput::Euclidean => vec![length],
        GdtOutput::Both => vec![value, length],
    };
    let mut out = VectorImage::zeros(&problem.sizes, channels.len())?;
    for (k, data) in channels.into_iter().enumerate() {
        out.channel_mut(k).copy_from_slice(&data);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use distmap_core::Grid;

    fn run(sizes: &[usize], mask: &[bool], grey: &[f32], metric: Metric, output: GdtOutput) -> VectorImage {
        let grid = Grid::new(sizes).unwrap();
        let input = ImageView::new(&grid, mask).unwrap();
        let grey = ImageView::new(&grid, grey).unwrap();
        transform(grey, input, &Spacing::isotropic(sizes.len()), &metric, output).unwrap()
    }

    #[test]
    fn output_names_round_trip() {
        for mode in [GdtOutput::Gdt, GdtOutput::Euclidean, GdtOutput::Both] {
            assert_eq!(mode.to_string().parse::<GdtOutput>().unwrap(), mode);
        }
        assert_eq!("gdt".parse::<GdtOutput>().unwrap_err().flag(), "gdt");
        let json = serde_json::to_string(&GdtOutput::Gdt).unwrap();
        assert_eq!(json, "\"GDT\"");
    }

    #[test]
    fn unit_grey_city_block_counts_steps() {
        // 7x5 image, background at the centre, border band of one pixel.
        let sizes = [7, 5];
        let mut mask = vec![true; 35];
        mask[3 + 2 * 7] = false;
        let grey = vec![1.0; 35];
        let out = run(&sizes, &mask, &grey, Metric::Connected(1), GdtOutput::Both);
        assert_eq!(out.channel_count(), 2);
        let gdt = out.channel(0);
        let len = out.channel(1);
        for y in 1..4usize {
            for x in 1..6usize {
                let expect = x.abs_diff(3) + y.abs_diff(2);
                assert_eq!(gdt[x + 7 * y], expect as f32);
                assert_eq!(len[x + 7 * y], expect as f32);
            }
        }
        // Border band.
        assert_eq!(gdt[0], 0.0);
        assert_eq!(gdt[6 + 7 * 4], 0.0);
    }

    #[test]
    fn grey_scales_the_step_cost() {
        let sizes = [5, 3];
        let mut mask = vec![true; 15];
        mask[1 + 5] = false;
        let mut grey = vec![1.0; 15];
        grey[2 + 5] = 3.0;
        grey[3 + 5] = 0.5;
        let out = run(&sizes, &mask, &grey, Metric::Connected(1), GdtOutput::Both);
        assert_eq!(out.channel(0)[2 + 5], 3.0);
        assert_eq!(out.channel(0)[3 + 5], 3.5);
        assert_eq!(out.channel(1)[3 + 5], 2.0);
    }

    #[test]
    fn unreached_object_keeps_max() {
        let sizes = [4, 4];
        let out = run(&sizes, &[true; 16], &[1.0; 16], Metric::Connected(1), GdtOutput::Gdt);
        assert_eq!(out.channel(0)[1 + 4], f32::MAX);
        assert_eq!(out.channel(0)[0], 0.0);
    }

    #[test]
    fn rejects_bad_grey() {
        let grid = Grid::new(&[3, 3]).unwrap();
        let mask = [true; 9];
        let input = ImageView::new(&grid, &mask).unwrap();
        let mut values = [1.0f32; 9];
        values[4] = -0.5;
        let grey = ImageView::new(&grid, &values).unwrap();
        let s = Spacing::isotropic(2);
        let err = transform(grey, input, &s, &Metric::default(), GdtOutput::Gdt).unwrap_err();
        assert_eq!(err, GreyError::NegativeGrey(-0.5));
        values[4] = f32::NAN;
        let grey = ImageView::new(&grid, &values).unwrap();
        let err = transform(grey, input, &s, &Metric::default(), GdtOutput::Gdt).unwrap_err();
        assert_eq!(err, GreyError::NanGrey);
    }

    #[test]
    fn rejects_mismatched_sizes_and_1d() {
        let a = Grid::new(&[3, 3]).unwrap();
        let b = Grid::new(&[3, 4]).unwrap();
        let mask = [true; 12];
        let grey = [1.0f32; 12];
        let s = Spacing::isotropic(2);
        let err = transform(
            ImageView::new(&b, &grey).unwrap(),
            ImageView::new(&a, &mask).unwrap(),
            &s,
            &Metric::default(),
            GdtOutput::Gdt,
        )
        .unwrap_err();
        assert!(matches!(err, GreyError::Grid(_)));

        let line = Grid::new(&[6]).unwrap();
        let err = transform(
            ImageView::new(&line, &grey).unwrap(),
            ImageView::new(&line, &mask).unwrap(),
            &Spacing::isotropic(1),
            &Metric::default(),
            GdtOutput::Gdt,
        )
        .unwrap_err();
        assert_eq!(err, GreyError::Dimensionality(1));
    }
}
