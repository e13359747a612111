//! The 1D distance filter run on every image line.

/// Position of the current pass in the sequence of processed dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePass {
    /// Pixel spacing along the processed dimension.
    pub spacing: f32,
    /// Zero-based pass number.
    pub index: usize,
    /// Total number of passes.
    pub count: usize,
    /// `true` when the image continues as object past the edge.
    pub object_border: bool,
}

impl LinePass {
    fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }
}

/// Distance filter for one line. Keeps the lower-envelope stacks between
/// calls so a single instance serves a whole image.
#[derive(Clone, Debug)]
pub struct DistanceLineFilter {
    max_distance2: f32,
    squared: bool,
    sites: Vec<isize>,
    starts: Vec<isize>,
}

impl DistanceLineFilter {
    /// `max_distance2` is the value carried in from an object border.
    pub fn new(max_distance2: f32, squared: bool) -> Self {
        Self {
            max_distance2,
            squared,
            sites: Vec::new(),
            starts: Vec::new(),
        }
    }

    /// Filter `input` into `output`.
    ///
    /// `input` holds the line padded with `padding` zeros on each side
    /// (0 for an object border, 1 for a background border); `output` is
    /// the unpadded line.
    pub fn filter(&mut self, input: &[f32], output: &mut [f32], padding: usize, pass: &LinePass) {
        let line = &input[padding..input.len() - padding];
        if pass.count == 1 && !self.squared {
            self.sweeps(line, output, pass, false);
        } else if pass.index == 0 {
            self.sweeps(line, output, pass, true);
        } else {
            let s2 = pass.spacing * pass.spacing;
            self.envelope(input, output, s2, padding);
            if !self.squared && pass.is_last() {
                output.iter_mut().for_each(|v| *v = v.sqrt());
            }
        }
    }

    /// Forward and backward chamfer sweeps along the line; exact in 1D.
    fn sweeps(&self, line: &[f32], output: &mut [f32], pass: &LinePass, square: bool) {
        let start = if pass.object_border {
            self.max_distance2
        } else {
            0.0
        };
        let finish = |d: f32| if square { d * d } else { d };

        let mut d = start;
        for (o, &v) in output.iter_mut().zip(line) {
            d = if v == 0.0 { 0.0 } else { d + pass.spacing };
            *o = finish(d);
        }
        let mut d = start;
        for (o, &v) in output.iter_mut().zip(line).rev() {
            d = if v == 0.0 { 0.0 } else { d + pass.spacing };
            let d = finish(d);
            if d < *o {
                *o = d;
            }
        }
    }

    /// Lower envelope of the parabolas `s2 * (x - i)^2 + g[i]`.
    fn envelope(&mut self, g: &[f32], output: &mut [f32], s2: f32, padding: usize) {
        let mut len = g.len() as isize;
        self.sites.clear();
        self.sites.resize(g.len(), 0);
        self.starts.clear();
        self.starts.resize(g.len(), 0);
        let (s, t) = (&mut self.sites, &mut self.starts);

        let at = |i: isize| g[i as usize];
        let mut q: isize = 0;
        for u in 1..len {
            while q >= 0 {
                let k = q as usize;
                let d1 = (t[k] - s[k]) as f32;
                let d2 = (t[k] - u) as f32;
                if s2 * d1 * d1 + at(s[k]) < s2 * d2 * d2 + at(u) {
                    break;
                }
                q -= 1;
            }
            if q < 0 {
                q = 0;
                s[0] = u;
                t[0] = 0;
            } else {
                let k = q as usize;
                let (uf, sf) = (u as f32, s[k] as f32);
                let sep = (s2 * uf * uf - s2 * sf * sf + at(u) - at(s[k])) / (s2 * 2.0 * (uf - sf));
                let w = 1 + sep.trunc() as isize;
                if w < len {
                    q += 1;
                    s[q as usize] = u;
                    t[q as usize] = w;
                }
            }
        }

        let mut end = 0;
        if padding > 0 {
            len -= 1;
            if len == t[q as usize] {
                q -= 1;
            }
            end = 1;
        }
        for u in (end..len).rev() {
            let k = q as usize;
            let d1 = (u - s[k]) as f32;
            output[(u - end) as usize] = s2 * d1 * d1 + at(s[k]);
            if u == t[k] {
                q -= 1;
            }
        }
    }
}
