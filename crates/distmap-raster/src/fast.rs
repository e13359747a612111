//! Two-pass raster-scan transform propagating a single offset per pixel.
//!
//! Approximate: a pixel only ever sees the offsets of its already visited
//! face neighbours, so a few pixels end up slightly too far from their true
//! nearest background pixel.

use distmap_core::Border;

use crate::field::{BinaryRaster, Nearest, NearestField};
use crate::lut::SquaredDistanceLut;

/// Scan-buffer state of one pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot<const D: usize> {
    /// Background pixel.
    Seed,
    /// Nothing has reached this pixel from this scan direction.
    Unreachable,
    Offset([i32; D]),
}

impl<const D: usize> Slot<D> {
    fn border(border: Border) -> Self {
        match border {
            Border::Object => Slot::Unreachable,
            Border::Background => Slot::Seed,
        }
    }

    /// This slot's offset as seen from the neighbour `step` away from it.
    #[inline]
    fn shifted(self, step: [i32; D]) -> Option<[i32; D]> {
        match self {
            Slot::Seed => Some(step),
            Slot::Unreachable => None,
            Slot::Offset(mut o) => {
                for d in 0..D {
                    o[d] += step[d];
                }
                Some(o)
            }
        }
    }

    /// Carry the slot one `step` further, keeping `Unreachable`.
    #[inline]
    fn carried(self, step: [i32; D]) -> Self {
        self.shifted(step).map_or(Slot::Unreachable, Slot::Offset)
    }

    #[inline]
    fn distance(self, lut: &SquaredDistanceLut<D>) -> f32 {
        match self {
            Slot::Seed => 0.0,
            Slot::Unreachable => lut.maxdist(),
            Slot::Offset(o) => lut.distance(&o),
        }
    }

    fn nearest(self, lut: &SquaredDistanceLut<D>) -> Nearest<D> {
        match self {
            Slot::Seed => Nearest::Background,
            Slot::Unreachable => Nearest::Unreachable,
            Slot::Offset(offset) => Nearest::Found {
                offset,
                distance2: lut.distance(&offset),
            },
        }
    }
}

/// Current and previous scan buffer, selected by scan-index parity.
fn buffers<T>(pair: &mut [Vec<T>; 2], index: usize) -> (&mut [T], &[T]) {
    let [a, b] = pair;
    if index & 1 == 1 {
        (a, b)
    } else {
        (b, a)
    }
}

/// Compare the current slot with a shifted neighbour and keep the closer
/// one; on equal distance the neighbour wins.
#[inline]
fn take_unless_closer<const D: usize>(
    current: Slot<D>,
    neighbour: Slot<D>,
    step: [i32; D],
    lut: &SquaredDistanceLut<D>,
) -> Slot<D> {
    match neighbour.shifted(step) {
        Some(cand) if !(current.distance(lut) < lut.distance(&cand)) => Slot::Offset(cand),
        _ => current,
    }
}

/// Keep the current slot unless the shifted neighbour is strictly closer.
#[inline]
fn take_if_closer<const D: usize>(
    current: Slot<D>,
    neighbour: Slot<D>,
    step: [i32; D],
    lut: &SquaredDistanceLut<D>,
) -> Slot<D> {
    match neighbour.shifted(step) {
        Some(cand) if current.distance(lut) > lut.distance(&cand) => Slot::Offset(cand),
        _ => current,
    }
}

pub(crate) fn fast_2d(input: &BinaryRaster<'_, 2>) -> NearestField<2> {
    let [nx, ny] = input.sizes;
    let lut = input.lut();
    let mut field = NearestField::new(input, &lut);
    let bp = Slot::border(input.border);
    let mut lines = [vec![bp; nx + 2], vec![bp; nx + 2]];

    // Forward: rows top to bottom.
    for y in 0..ny {
        let (cur, above) = buffers(&mut lines, y);
        cur[0] = bp;
        for x in 0..nx {
            let i = x + 1;
            if !input.is_object([x, y]) {
                cur[i] = Slot::Seed;
                continue;
            }
            let mut c = above[i].carried([0, -1]);
            c = match cur[i - 1] {
                // A background pixel on the left is always the nearest.
                Slot::Seed => Slot::Offset([-1, 0]),
                left => take_unless_closer(c, left, [-1, 0], &lut),
            };
            cur[i] = c;
        }
        cur[nx + 1] = bp;
        for x in (0..nx).rev() {
            let i = x + 1;
            let idx = input.index([x, y]);
            if cur[i] == Slot::Seed {
                field.set(idx, Nearest::Background);
                continue;
            }
            cur[i] = take_if_closer(cur[i], cur[i + 1], [1, 0], &lut);
            field.set(idx, cur[i].nearest(&lut));
        }
    }

    lines = [vec![bp; nx + 2], vec![bp; nx + 2]];

    // Backward: rows bottom to top.
    for (k, y) in (0..ny).rev().enumerate() {
        let (cur, below) = buffers(&mut lines, k);
        cur[nx + 1] = bp;
        for x in (0..nx).rev() {
            let i = x + 1;
            if !input.is_object([x, y]) {
                cur[i] = Slot::Seed;
                continue;
            }
            let c = below[i].carried([0, 1]);
            cur[i] = take_unless_closer(c, cur[i + 1], [1, 0], &lut);
        }
        cur[0] = bp;
        for x in 0..nx {
            let i = x + 1;
            if cur[i] == Slot::Seed {
                continue;
            }
            cur[i] = take_if_closer(cur[i], cur[i - 1], [-1, 0], &lut);
            if let Slot::Offset(o) = cur[i] {
                field.offer(input.index([x, y]), o, lut.distance(&o));
            }
        }
    }

    log::debug!("fast scan 2D: {nx}x{ny} done");
    field
}

pub(crate) fn fast_3d(input: &BinaryRaster<'_, 3>) -> NearestField<3> {
    let [nx, ny, nz] = input.sizes;
    let lut = input.lut();
    let mut field = NearestField::new(input, &lut);
    let bp = Slot::border(input.border);
    let row = nx + 2;
    let plane = row * (ny + 2);
    let slot = |x: usize, y: usize| (y + 1) * row + x + 1;
    let mut planes = [vec![bp; plane], vec![bp; plane]];

    // Forward: planes front to back.
    for z in 0..nz {
        let (cur, prev) = buffers(&mut planes, z);
        cur[..row].fill(bp);
        for y in 0..ny {
            cur[slot(0, y) - 1] = bp;
            for x in 0..nx {
                let s = slot(x, y);
                if !input.is_object([x, y, z]) {
                    cur[s] = Slot::Seed;
                    continue;
                }
                let mut c = prev[s].carried([0, 0, -1]);
                c = take_if_closer(c, cur[s - row], [0, -1, 0], &lut);
                c = take_if_closer(c, cur[s - 1], [-1, 0, 0], &lut);
                cur[s] = c;
            }
            cur[slot(nx, y)] = bp;
            for x in (0..nx).rev() {
                let s = slot(x, y);
                if cur[s] != Slot::Seed {
                    cur[s] = take_if_closer(cur[s], cur[s + 1], [1, 0, 0], &lut);
                }
            }
        }
        cur[plane - row..].fill(bp);
        for y in (0..ny).rev() {
            for x in (0..nx).rev() {
                let s = slot(x, y);
                let idx = input.index([x, y, z]);
                if cur[s] == Slot::Seed {
                    field.set(idx, Nearest::Background);
                    continue;
                }
                cur[s] = take_if_closer(cur[s], cur[s + row], [0, 1, 0], &lut);
                field.set(idx, cur[s].nearest(&lut));
            }
        }
    }

    planes = [vec![bp; plane], vec![bp; plane]];

    // Backward: planes back to front.
    for (k, z) in (0..nz).rev().enumerate() {
        let (cur, prev) = buffers(&mut planes, k);
        cur[plane - row..].fill(bp);
        for y in (0..ny).rev() {
            cur[slot(nx, y)] = bp;
            for x in (0..nx).rev() {
                let s = slot(x, y);
                if !input.is_object([x, y, z]) {
                    cur[s] = Slot::Seed;
                    continue;
                }
                let mut c = prev[s].carried([0, 0, 1]);
                c = take_if_closer(c, cur[s + row], [0, 1, 0], &lut);
                c = take_if_closer(c, cur[s + 1], [1, 0, 0], &lut);
                cur[s] = c;
            }
            cur[slot(0, y) - 1] = bp;
            for x in 0..nx {
                let s = slot(x, y);
                if cur[s] != Slot::Seed {
                    cur[s] = take_if_closer(cur[s], cur[s - 1], [-1, 0, 0], &lut);
                }
            }
        }
        cur[..row].fill(bp);
        for y in 0..ny {
            for x in 0..nx {
                let s = slot(x, y);
                if cur[s] == Slot::Seed {
                    continue;
                }
                cur[s] = take_if_closer(cur[s], cur[s - row], [0, -1, 0], &lut);
                if let Slot::Offset(o) = cur[s] {
                    field.offer(input.index([x, y, z]), o, lut.distance(&o));
                }
            }
        }
    }

    log::debug!("fast scan 3D: {nx}x{ny}x{nz} done");
    field
}
