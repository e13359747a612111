//! Raster-scan transform propagating candidate *sets* of offsets.
//!
//! Each pixel keeps every offset at the minimal distance (`ties`) or within
//! a tolerance band above it (`true`), so equidistant or nearly equidistant
//! background pixels all keep propagating.

use distmap_core::Border;

use crate::field::{BinaryRaster, Nearest, NearestField};
use crate::lut::SquaredDistanceLut;
use crate::params::{RasterParams, TieMode};
use crate::search::{NeighborSearch, SearchResult};

/// Scan-buffer state of one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SetSlot {
    /// Background pixel.
    Seed,
    /// `len` offsets starting at `start` in the arena of the same parity.
    /// An empty set means nothing reached the pixel.
    Set { start: usize, len: usize },
}

const EMPTY: SetSlot = SetSlot::Set { start: 0, len: 0 };

impl SetSlot {
    fn border(border: Border) -> Self {
        match border {
            Border::Object => EMPTY,
            Border::Background => SetSlot::Seed,
        }
    }
}

/// Backing storage for the candidate sets of one scan line (2D) or plane
/// (3D).
#[derive(Clone, Debug, Default)]
struct CandidateArena<const D: usize> {
    offsets: Vec<[i32; D]>,
}

impl<const D: usize> CandidateArena<D> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            offsets: Vec::with_capacity(capacity),
        }
    }

    fn clear(&mut self) {
        self.offsets.clear();
    }

    fn store(&mut self, set: &[[i32; D]]) -> SetSlot {
        let start = self.offsets.len();
        self.offsets.extend_from_slice(set);
        SetSlot::Set {
            start,
            len: set.len(),
        }
    }

    /// Append the set in `slot`, shifted by `step`, to `out`. A seed adds
    /// `step` itself.
    fn push_shifted(&self, slot: SetSlot, step: [i32; D], out: &mut Vec<[i32; D]>) {
        match slot {
            SetSlot::Seed => out.push(step),
            SetSlot::Set { start, len } => {
                out.extend(self.offsets[start..start + len].iter().map(|o| {
                    let mut s = *o;
                    for d in 0..D {
                        s[d] += step[d];
                    }
                    s
                }));
            }
        }
    }
}

/// Per-image scratch: candidate buffer, search and lookup table.
struct Scan<const D: usize> {
    lut: SquaredDistanceLut<D>,
    search: NeighborSearch,
    candidates: Vec<[i32; D]>,
    peak: usize,
}

impl<const D: usize> Scan<D> {
    fn reduce(&mut self) -> Option<SearchResult<D>> {
        self.peak = self.peak.max(self.candidates.len());
        self.search.reduce(&mut self.candidates, &self.lut)
    }

    /// Reduce the gathered candidates and store the survivors.
    fn settle(&mut self, arena: &mut CandidateArena<D>) -> (SetSlot, Option<SearchResult<D>>) {
        let result = self.reduce();
        (arena.store(&self.candidates), result)
    }
}

fn pair<T>(pair: &mut [T; 2], index: usize) -> (&mut T, &T) {
    let [a, b] = pair;
    if index & 1 == 1 {
        (a, b)
    } else {
        (b, a)
    }
}

fn found<const D: usize>(result: Option<SearchResult<D>>) -> Nearest<D> {
    match result {
        Some(r) => Nearest::Found {
            offset: r.min_offset,
            distance2: r.min_distance,
        },
        None => Nearest::Unreachable,
    }
}

fn offer<const D: usize>(field: &mut NearestField<D>, index: usize, result: Option<SearchResult<D>>) {
    if let Some(r) = result {
        field.offer(index, r.min_offset, r.min_distance);
    }
}

fn setup<const D: usize>(
    input: &BinaryRaster<'_, D>,
    mode: TieMode,
    params: &RasterParams,
) -> Scan<D> {
    let delta = params.delta(D, input.min_spacing());
    Scan {
        lut: input.lut(),
        search: NeighborSearch::new(mode, delta),
        candidates: Vec::with_capacity(4 * D + 4),
        peak: 0,
    }
}

pub(crate) fn ties_2d(
    input: &BinaryRaster<'_, 2>,
    mode: TieMode,
    params: &RasterParams,
) -> NearestField<2> {
    let [nx, ny] = input.sizes;
    let mut scan = setup(input, mode, params);
    let mut field = NearestField::new(input, &scan.lut);
    let bp = SetSlot::border(input.border);
    let capacity = nx * (2 * params.candidates_per_pixel(2, mode) + 2);
    let mut arenas = [
        CandidateArena::<2>::with_capacity(capacity),
        CandidateArena::<2>::with_capacity(capacity),
    ];
    let mut lines = [vec![bp; nx + 2], vec![bp; nx + 2]];
    log::debug!("{mode:?} scan 2D: {nx}x{ny}, arena capacity {capacity}");

    for y in 0..ny {
        let (cur, above) = pair(&mut lines, y);
        let (arena, above_arena) = pair(&mut arenas, y);
        arena.clear();
        cur[0] = bp;
        for x in 0..nx {
            let i = x + 1;
            if !input.is_object([x, y]) {
                cur[i] = SetSlot::Seed;
                continue;
            }
            scan.candidates.clear();
            above_arena.push_shifted(above[i], [0, -1], &mut scan.candidates);
            arena.push_shifted(cur[i - 1], [-1, 0], &mut scan.candidates);
            cur[i] = scan.settle(arena).0;
        }
        cur[nx + 1] = bp;
        for x in (0..nx).rev() {
            let i = x + 1;
            let idx = input.index([x, y]);
            if cur[i] == SetSlot::Seed {
                field.set(idx, Nearest::Background);
                continue;
            }
            scan.candidates.clear();
            arena.push_shifted(cur[i], [0, 0], &mut scan.candidates);
            arena.push_shifted(cur[i + 1], [1, 0], &mut scan.candidates);
            let (slot, result) = scan.settle(arena);
            cur[i] = slot;
            field.set(idx, found(result));
        }
    }

    lines = [vec![bp; nx + 2], vec![bp; nx + 2]];

    for (k, y) in (0..ny).rev().enumerate() {
        let (cur, below) = pair(&mut lines, k);
        let (arena, below_arena) = pair(&mut arenas, k);
        arena.clear();
        cur[nx + 1] = bp;
        for x in (0..nx).rev() {
            let i = x + 1;
            if !input.is_object([x, y]) {
                cur[i] = SetSlot::Seed;
                continue;
            }
            scan.candidates.clear();
            below_arena.push_shifted(below[i], [0, 1], &mut scan.candidates);
            arena.push_shifted(cur[i + 1], [1, 0], &mut scan.candidates);
            cur[i] = scan.settle(arena).0;
        }
        cur[0] = bp;
        for x in 0..nx {
            let i = x + 1;
            if cur[i] == SetSlot::Seed {
                continue;
            }
            scan.candidates.clear();
            arena.push_shifted(cur[i], [0, 0], &mut scan.candidates);
            arena.push_shifted(cur[i - 1], [-1, 0], &mut scan.candidates);
            let (slot, result) = scan.settle(arena);
            cur[i] = slot;
            offer(&mut field, input.index([x, y]), result);
        }
    }

    log::debug!("{mode:?} scan 2D: largest candidate list {}", scan.peak);
    field
}

pub(crate) fn ties_3d(
    input: &BinaryRaster<'_, 3>,
    mode: TieMode,
    params: &RasterParams,
) -> NearestField<3> {
    let [nx, ny, nz] = input.sizes;
    let mut scan = setup(input, mode, params);
    let mut field = NearestField::new(input, &scan.lut);
    let bp = SetSlot::border(input.border);
    let row = nx + 2;
    let plane = row * (ny + 2);
    let slot = |x: usize, y: usize| (y + 1) * row + x + 1;
    let capacity = nx * ny * (3 * params.candidates_per_pixel(3, mode) + 2);
    let mut arenas = [
        CandidateArena::<3>::with_capacity(capacity),
        CandidateArena::<3>::with_capacity(capacity),
    ];
    let mut planes = [vec![bp; plane], vec![bp; plane]];
    log::debug!("{mode:?} scan 3D: {nx}x{ny}x{nz}, arena capacity {capacity}");

    for z in 0..nz {
        let (cur, prev) = pair(&mut planes, z);
        let (arena, prev_arena) = pair(&mut arenas, z);
        arena.clear();
        cur[..row].fill(bp);
        for y in 0..ny {
            cur[slot(0, y) - 1] = bp;
            for x in 0..nx {
                let s = slot(x, y);
                if !input.is_object([x, y, z]) {
                    cur[s] = SetSlot::Seed;
                    continue;
                }
                scan.candidates.clear();
                prev_arena.push_shifted(prev[s], [0, 0, -1], &mut scan.candidates);
                arena.push_shifted(cur[s - row], [0, -1, 0], &mut scan.candidates);
                arena.push_shifted(cur[s - 1], [-1, 0, 0], &mut scan.candidates);
                cur[s] = scan.settle(arena).0;
            }
            cur[slot(nx, y)] = bp;
            for x in (0..nx).rev() {
                let s = slot(x, y);
                if cur[s] == SetSlot::Seed {
                    continue;
                }
                scan.candidates.clear();
                arena.push_shifted(cur[s], [0, 0, 0], &mut scan.candidates);
                arena.push_shifted(cur[s + 1], [1, 0, 0], &mut scan.candidates);
                cur[s] = scan.settle(arena).0;
            }
        }
        cur[plane - row..].fill(bp);
        for y in (0..ny).rev() {
            for x in (0..nx).rev() {
                let s = slot(x, y);
                let idx = input.index([x, y, z]);
                if cur[s] == SetSlot::Seed {
                    field.set(idx, Nearest::Background);
                    continue;
                }
                scan.candidates.clear();
                arena.push_shifted(cur[s], [0, 0, 0], &mut scan.candidates);
                arena.push_shifted(cur[s + row], [0, 1, 0], &mut scan.candidates);
                let (set, result) = scan.settle(arena);
                cur[s] = set;
                field.set(idx, found(result));
            }
        }
    }

    planes = [vec![bp; plane], vec![bp; plane]];

    for (k, z) in (0..nz).rev().enumerate() {
        let (cur, prev) = pair(&mut planes, k);
        let (arena, prev_arena) = pair(&mut arenas, k);
        arena.clear();
        cur[plane - row..].fill(bp);
        for y in (0..ny).rev() {
            cur[slot(nx, y)] = bp;
            for x in (0..nx).rev() {
                let s = slot(x, y);
                if !input.is_object([x, y, z]) {
                    cur[s] = SetSlot::Seed;
                    continue;
                }
                scan.candidates.clear();
                prev_arena.push_shifted(prev[s], [0, 0, 1], &mut scan.candidates);
                arena.push_shifted(cur[s + row], [0, 1, 0], &mut scan.candidates);
                arena.push_shifted(cur[s + 1], [1, 0, 0], &mut scan.candidates);
                cur[s] = scan.settle(arena).0;
            }
            cur[slot(0, y) - 1] = bp;
            for x in 0..nx {
                let s = slot(x, y);
                if cur[s] == SetSlot::Seed {
                    continue;
                }
                scan.candidates.clear();
                arena.push_shifted(cur[s], [0, 0, 0], &mut scan.candidates);
                arena.push_shifted(cur[s - 1], [-1, 0, 0], &mut scan.candidates);
                cur[s] = scan.settle(arena).0;
            }
        }
        cur[..row].fill(bp);
        for y in 0..ny {
            for x in 0..nx {
                let s = slot(x, y);
                if cur[s] == SetSlot::Seed {
                    continue;
                }
                scan.candidates.clear();
                arena.push_shifted(cur[s], [0, 0, 0], &mut scan.candidates);
                arena.push_shifted(cur[s - row], [0, -1, 0], &mut scan.candidates);
                let (set, result) = scan.settle(arena);
                cur[s] = set;
                offer(&mut field, input.index([x, y, z]), result);
            }
        }
    }

    log::debug!(
        "{mode:?} scan 3D: largest candidate list {}, arena length {}",
        scan.peak,
        arenas[0].offsets.len().max(arenas[1].offsets.len())
    );
    field
}
