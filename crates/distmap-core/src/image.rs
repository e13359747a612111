use crate::grid::{Grid, GridError};

/// Borrowed, possibly strided, n-dimensional image.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a, T> {
    grid: &'a Grid,
    data: &'a [T],
}

impl<'a, T: Copy> ImageView<'a, T> {
    pub fn new(grid: &'a Grid, data: &'a [T]) -> Result<Self, GridError> {
        let needed = grid.required_len();
        if data.len() < needed {
            return Err(GridError::BufferTooShort {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { grid, data })
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn sizes(&self) -> &'a [usize] {
        self.grid.sizes()
    }

    pub fn dimensionality(&self) -> usize {
        self.grid.dimensionality()
    }

    /// Value at a buffer offset computed from the grid strides.
    #[inline]
    pub fn at(&self, offset: usize) -> T {
        self.data[offset]
    }

    pub fn get(&self, coords: &[usize]) -> Option<T> {
        self.grid.checked_offset(coords).map(|o| self.data[o])
    }

    /// Iterate values in scan order (dimension 0 fastest).
    pub fn values(&self) -> impl Iterator<Item = T> + 'a {
        let data = self.data;
        self.grid.offsets().map(move |o| data[o])
    }

    /// Copy into an owned contiguous image.
    pub fn to_image(&self) -> Image<T> {
        Image {
            grid: self.grid.contiguous(),
            data: self.values().collect(),
        }
    }
}

/// Owned contiguous n-dimensional image.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    grid: Grid,
    data: Vec<T>,
}

/// Binary image: `true` marks object pixels.
pub type BinaryImage = Image<bool>;

impl<T: Copy> Image<T> {
    /// Wrap a scan-order buffer (dimension 0 fastest).
    pub fn from_vec(sizes: &[usize], data: Vec<T>) -> Result<Self, GridError> {
        let grid = Grid::new(sizes)?;
        if data.len() != grid.pixel_count() {
            return Err(GridError::BufferTooShort {
                needed: grid.pixel_count(),
                got: data.len(),
            });
        }
        Ok(Self { grid, data })
    }

    pub fn filled(sizes: &[usize], value: T) -> Result<Self, GridError> {
        let grid = Grid::new(sizes)?;
        let data = vec![value; grid.pixel_count()];
        Ok(Self { grid, data })
    }

    /// Build an image by evaluating `f` at every pixel coordinate.
    pub fn from_fn(sizes: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Result<Self, GridError> {
        let grid = Grid::new(sizes)?;
        let n = grid.pixel_count();
        let mut data = Vec::with_capacity(n);
        let mut offsets = grid.offsets();
        for _ in 0..n {
            data.push(f(offsets.coords()));
            offsets.next();
        }
        Ok(Self { grid, data })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn sizes(&self) -> &[usize] {
        self.grid.sizes()
    }

    pub fn dimensionality(&self) -> usize {
        self.grid.dimensionality()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            grid: &self.grid,
            data: &self.data,
        }
    }

    pub fn get(&self, coords: &[usize]) -> Option<T> {
        self.grid.checked_offset(coords).map(|o| self.data[o])
    }

    pub fn set(&mut self, coords: &[usize], value: T) -> bool {
        match self.grid.checked_offset(coords) {
            Some(o) => {
                self.data[o] = value;
                true
            }
            None => false,
        }
    }

    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Image<U> {
        Image {
            grid: self.grid.clone(),
            data: self.data.iter().copied().map(f).collect(),
        }
    }
}

impl Image<f32> {
    /// Largest absolute pixel difference; `None` when the sizes differ.
    pub fn max_abs_difference(&self, other: &Image<f32>) -> Option<f32> {
        if self.sizes() != other.sizes() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f32, f32::max),
        )
    }
}

/// Image with one `f32` channel per component, channels stored separately.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorImage {
    grid: Grid,
    channels: Vec<Vec<f32>>,
}

impl VectorImage {
    pub fn zeros(sizes: &[usize], channels: usize) -> Result<Self, GridError> {
        let grid = Grid::new(sizes)?;
        let n = grid.pixel_count();
        Ok(Self {
            grid,
            channels: vec![vec![0.0; n]; channels],
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn sizes(&self) -> &[usize] {
        self.grid.sizes()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// All components of one pixel.
    pub fn pixel(&self, coords: &[usize]) -> Option<Vec<f32>> {
        let o = self.grid.checked_offset(coords)?;
        Some(self.channels.iter().map(|c| c[o]).collect())
    }

    /// Split into single-channel images.
    pub fn into_channels(self) -> Vec<Image<f32>> {
        let grid = self.grid;
        self.channels
            .into_iter()
            .map(|data| Image {
                grid: grid.clone(),
                data,
            })
            .collect()
    }

    /// Euclidean norm of every pixel vector.
    pub fn magnitude(&self) -> Image<f32> {
        let n = self.grid.pixel_count();
        let mut data = vec![0.0f32; n];
        for channel in &self.channels {
            for (acc, v) in data.iter_mut().zip(channel) {
                *acc += v * v;
            }
        }
        for v in &mut data {
            *v = v.sqrt();
        }
        Image {
            grid: self.grid.clone(),
            data,
        }
    }
}

/// Distance of every pixel to the centre pixel (`size / 2` along each axis).
pub fn radius_coordinate(sizes: &[usize]) -> Result<Image<f32>, GridError> {
    let centre: Vec<f64> = sizes.iter().map(|&n| (n / 2) as f64).collect();
    Image::from_fn(sizes, |coords| {
        coords
            .iter()
            .zip(&centre)
            .map(|(&c, &m)| {
                let d = c as f64 - m;
                d * d
            })
            .sum::<f64>()
            .sqrt() as f32
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_visits_scan_order() {
        let img = Image::from_fn(&[3, 2], |c| (c[0] + 10 * c[1]) as u32).unwrap();
        assert_eq!(img.as_slice(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(img.get(&[2, 1]), Some(12));
        assert_eq!(img.get(&[3, 0]), None);
    }

    #[test]
    fn strided_view_copies_to_contiguous() {
        // Transposed layout of a 2x3 image.
        let grid = Grid::with_strides(&[2, 3], &[3, 1]).unwrap();
        let data = [0u8, 1, 2, 10, 11, 12];
        let view = ImageView::new(&grid, &data).unwrap();
        assert_eq!(view.get(&[1, 2]), Some(12));
        let owned = view.to_image();
        assert_eq!(owned.as_slice(), &[0, 10, 1, 11, 2, 12]);
        assert!(owned.grid().is_contiguous());
    }

    #[test]
    fn view_rejects_short_buffer() {
        let grid = Grid::new(&[4, 4]).unwrap();
        let data = [false; 15];
        assert!(matches!(
            ImageView::new(&grid, &data),
            Err(GridError::BufferTooShort { needed: 16, got: 15 })
        ));
    }

    #[test]
    fn radius_coordinate_is_zero_at_centre() {
        let img = radius_coordinate(&[5, 4]).unwrap();
        assert_eq!(img.get(&[2, 2]), Some(0.0));
        assert_eq!(img.get(&[0, 2]), Some(2.0));
        assert!((img.get(&[0, 0]).unwrap() - 8f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn vector_magnitude() {
        let mut v = VectorImage::zeros(&[2, 1], 2).unwrap();
        v.channel_mut(0)[1] = 3.0;
        v.channel_mut(1)[1] = -4.0;
        let m = v.magnitude();
        assert_eq!(m.as_slice(), &[0.0, 5.0]);
        assert_eq!(v.pixel(&[1, 0]), Some(vec![3.0, -4.0]));
    }
}
