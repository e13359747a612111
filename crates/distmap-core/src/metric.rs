//! Neighbourhood metrics for the grey-weighted transform.
//!
//! A [`Metric`] is a recipe; [`NeighborList`] is the metric resolved for a
//! given dimensionality and pixel spacing: a list of integer offsets, each
//! with the physical length of one step along it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grid::{GridError, Spacing};
use crate::image::Image;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("connectivity {connectivity} exceeds dimensionality {dims}")]
    ConnectivityTooLarge { connectivity: usize, dims: usize },
    #[error("chamfer metric needs a maximum distance of at least 1")]
    ChamferOrder,
    #[error("unknown metric {0:?}")]
    UnknownName(String),
    #[error("metric kernel size {size} along dimension {dim} is not odd")]
    EvenKernel { dim: usize, size: usize },
    #[error("metric kernel must not have a positive weight at its centre")]
    PositiveCentre,
    #[error("neighbour offset has {got} components, image has {expected} dimensions")]
    OffsetDimensionality { expected: usize, got: usize },
    #[error("neighbour weight must be finite and > 0 (got {0})")]
    InvalidWeight(f64),
    #[error("metric has no neighbours")]
    Empty,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// One step of a neighbourhood: integer offset plus its physical length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub offset: Vec<isize>,
    pub weight: f64,
}

/// How the neighbours of a pixel, and the cost of stepping to them, are
/// defined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Offsets in `{-1,0,1}^d` with at most `k` non-zero components
    /// (`0` means all of them).
    Connected(usize),
    /// Chamfer neighbourhood reaching `n` pixels, with optimised weights for
    /// `n` in {1, 2} in 2D and 3D.
    Chamfer(usize),
    /// Explicit neighbour list.
    Custom(Vec<Neighbor>),
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Connected(1)
    }
}

impl Metric {
    /// Metric from a name and a parameter, e.g. `("chamfer", 2)`.
    ///
    /// Fixed names such as `"city"` or `"26-connected"` ignore `param`.
    pub fn named(name: &str, param: usize) -> Result<Self, MetricError> {
        match name {
            "connected" => Ok(Metric::Connected(param)),
            "chamfer" => Ok(Metric::Chamfer(param)),
            other => other.parse(),
        }
    }

    /// Build a custom metric from an odd-sized weight kernel.
    ///
    /// Every positive entry becomes a neighbour at its offset from the
    /// kernel centre; zero, negative and non-finite entries are ignored.
    pub fn from_kernel(kernel: &Image<f64>) -> Result<Self, MetricError> {
        let sizes = kernel.sizes();
        for (dim, &size) in sizes.iter().enumerate() {
            if size % 2 == 0 {
                return Err(MetricError::EvenKernel { dim, size });
            }
        }
        let centre: Vec<isize> = sizes.iter().map(|&n| (n / 2) as isize).collect();
        let mut neighbors = Vec::new();
        let mut offsets = kernel.grid().offsets();
        for _ in 0..kernel.grid().pixel_count() {
            let offset: Vec<isize> = offsets
                .coords()
                .iter()
                .zip(&centre)
                .map(|(&c, &m)| c as isize - m)
                .collect();
            let Some(o) = offsets.next() else { break };
            let weight = kernel.as_slice()[o];
            if weight > 0.0 && weight.is_finite() {
                if offset.iter().all(|&c| c == 0) {
                    return Err(MetricError::PositiveCentre);
                }
                neighbors.push(Neighbor { offset, weight });
            }
        }
        Ok(Metric::Custom(neighbors))
    }

    pub fn neighbors(&self, dims: usize, spacing: &Spacing) -> Result<NeighborList, MetricError> {
        NeighborList::new(self, dims, spacing)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Connected(0) => f.write_str("chess"),
            Metric::Connected(1) => f.write_str("city"),
            Metric::Connected(k) => write!(f, "connected:{k}"),
            Metric::Chamfer(n) => write!(f, "chamfer:{n}"),
            Metric::Custom(list) => {
                f.write_str("custom:")?;
                for (i, n) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    for (d, c) in n.offset.iter().enumerate() {
                        if d > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{c}")?;
                    }
                    write!(f, "={}", n.weight)?;
                }
                Ok(())
            }
        }
    }
}

/// `x,y=w;x,y=w;...` as written by `Display` for [`Metric::Custom`].
fn parse_custom(list: &str, whole: &str) -> Result<Metric, MetricError> {
    let bad = || MetricError::UnknownName(whole.to_string());
    let mut neighbors = Vec::new();
    for entry in list.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (offset, weight) = entry.split_once('=').ok_or_else(bad)?;
        let offset = offset
            .split(',')
            .map(|c| c.trim().parse::<isize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| bad())?;
        let weight = weight.trim().parse::<f64>().map_err(|_| bad())?;
        neighbors.push(Neighbor { offset, weight });
    }
    Ok(Metric::Custom(neighbors))
}

impl FromStr for Metric {
    type Err = MetricError;

    /// Accepts the named neighbourhoods, `connected[:k]`, `chamfer[:n]` and
    /// the `custom:` neighbour lists `Display` writes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(list) = s.trim().strip_prefix("custom:") {
            return parse_custom(list, s);
        }
        let (name, param) = match s.split_once(':') {
            Some((name, p)) => {
                let p = p
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| MetricError::UnknownName(s.to_string()))?;
                (name.trim(), Some(p))
            }
            None => (s.trim(), None),
        };
        match (name, param) {
            ("connected", p) => Ok(Metric::Connected(p.unwrap_or(1))),
            ("chamfer", p) => Ok(Metric::Chamfer(p.unwrap_or(1))),
            ("city" | "4-connected" | "6-connected", None) => Ok(Metric::Connected(1)),
            ("chess", None) => Ok(Metric::Connected(0)),
            ("8-connected" | "18-connected", None) => Ok(Metric::Connected(2)),
            ("26-connected" | "28-connected", None) => Ok(Metric::Connected(3)),
            _ => Err(MetricError::UnknownName(s.to_string())),
        }
    }
}

/// A metric resolved for a dimensionality and pixel spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborList {
    dims: usize,
    neighbors: Vec<Neighbor>,
}

impl NeighborList {
    pub fn new(metric: &Metric, dims: usize, spacing: &Spacing) -> Result<Self, MetricError> {
        if dims == 0 {
            return Err(GridError::Empty.into());
        }
        spacing.check_dimensionality(dims)?;
        let neighbors = match metric {
            Metric::Connected(k) => connected(dims, *k, spacing.values())?,
            Metric::Chamfer(n) => chamfer(dims, *n, spacing.values())?,
            Metric::Custom(list) => {
                for n in list {
                    if n.offset.len() != dims {
                        return Err(MetricError::OffsetDimensionality {
                            expected: dims,
                            got: n.offset.len(),
                        });
                    }
                    if !(n.weight.is_finite() && n.weight > 0.0) {
                        return Err(MetricError::InvalidWeight(n.weight));
                    }
                }
                list.clone()
            }
        };
        if neighbors.is_empty() {
            return Err(MetricError::Empty);
        }
        Ok(Self { dims, neighbors })
    }

    pub fn dimensionality(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Neighbor> {
        self.neighbors.iter()
    }

    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.neighbors.iter().map(|n| n.weight)
    }

    /// Largest `|offset|` along each dimension.
    pub fn border(&self) -> Vec<usize> {
        let mut border = vec![0usize; self.dims];
        for n in &self.neighbors {
            for (b, &c) in border.iter_mut().zip(&n.offset) {
                *b = (*b).max(c.unsigned_abs());
            }
        }
        border
    }

    /// Linear buffer offsets of every neighbour for the given strides.
    pub fn linear_offsets(&self, strides: &[usize]) -> Result<Vec<isize>, MetricError> {
        if strides.len() != self.dims {
            return Err(MetricError::OffsetDimensionality {
                expected: self.dims,
                got: strides.len(),
            });
        }
        Ok(self
            .neighbors
            .iter()
            .map(|n| {
                n.offset
                    .iter()
                    .zip(strides)
                    .map(|(&c, &s)| c * s as isize)
                    .sum()
            })
            .collect())
    }
}

impl<'a> IntoIterator for &'a NeighborList {
    type Item = &'a Neighbor;
    type IntoIter = std::slice::Iter<'a, Neighbor>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.iter()
    }
}

/// Visit every point of `[-lim, lim]^dims`, dimension 0 fastest.
fn for_each_in_cube(dims: usize, lim: isize, mut f: impl FnMut(&[isize])) {
    let mut coords = vec![-lim; dims];
    loop {
        f(&coords);
        let mut dim = 0;
        while dim < dims {
            coords[dim] += 1;
            if coords[dim] <= lim {
                break;
            }
            coords[dim] = -lim;
            dim += 1;
        }
        if dim == dims {
            return;
        }
    }
}

fn euclidean_length(offset: &[isize], spacing: &[f64]) -> f64 {
    offset
        .iter()
        .zip(spacing)
        .map(|(&c, &s)| {
            let d = c as f64 * s;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

fn connected(dims: usize, k: usize, spacing: &[f64]) -> Result<Vec<Neighbor>, MetricError> {
    if k > dims {
        return Err(MetricError::ConnectivityTooLarge {
            connectivity: k,
            dims,
        });
    }
    let k = if k == 0 { dims } else { k };
    let mut out = Vec::new();
    for_each_in_cube(dims, 1, |c| {
        let nonzero = c.iter().filter(|&&v| v != 0).count();
        if nonzero > 0 && nonzero <= k {
            out.push(Neighbor {
                offset: c.to_vec(),
                weight: euclidean_length(c, spacing),
            });
        }
    });
    Ok(out)
}

/// Multiplier applied to the Euclidean step length of an offset class,
/// keyed by the number of components equal to ±1 and ±2.
fn chamfer_factor(dims: usize, n: usize, ones: usize, twos: usize) -> Option<f64> {
    let f = match (dims, n, ones, twos) {
        (2, 1, 1, 0) => 0.9481,
        (2, 1, 2, 0) => 1.3408 / 2f64.sqrt(),
        (2, 2, 1, 0) => 0.9801,
        (2, 2, 2, 0) => 1.4060 / 2f64.sqrt(),
        (2, 2, 1, 1) => 2.2044 / 5f64.sqrt(),
        (3, 1, 1, 0) => 0.8939539326,
        (3, 1, 2, 0) => 1.340863402 / 2f64.sqrt(),
        (3, 1, 3, 0) => 1.587920248 / 3f64.sqrt(),
        (3, 2, 1, 0) => 0.9556,
        (3, 2, 2, 0) => 1.3956 / 2f64.sqrt(),
        (3, 2, 3, 0) => 1.7257 / 3f64.sqrt(),
        (3, 2, 1, 1) => 2.1830 / 5f64.sqrt(),
        (3, 2, 2, 1) => 2.3885 / 6f64.sqrt(),
        (3, 2, 1, 2) => 2.9540 / 3.0,
        _ => return None,
    };
    Some(f)
}

fn chamfer(dims: usize, n: usize, spacing: &[f64]) -> Result<Vec<Neighbor>, MetricError> {
    if n == 0 {
        return Err(MetricError::ChamferOrder);
    }
    if dims == 1 {
        return Ok(vec![
            Neighbor {
                offset: vec![-1],
                weight: spacing[0],
            },
            Neighbor {
                offset: vec![1],
                weight: spacing[0],
            },
        ]);
    }
    let tuned = matches!((dims, n), (2 | 3, 1 | 2));
    let mut out = Vec::new();
    for_each_in_cube(dims, n as isize, |c| {
        let ones = c.iter().filter(|v| v.abs() == 1).count();
        if ones == 0 {
            return;
        }
        let mut weight = euclidean_length(c, spacing);
        if tuned {
            let twos = c.iter().filter(|v| v.abs() == 2).count();
            if let Some(f) = chamfer_factor(dims, n, ones, twos) {
                weight *= f;
            }
        }
        out.push(Neighbor {
            offset: c.to_vec(),
            weight,
        });
    });
    Ok(out)
}
