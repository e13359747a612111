//! Conversions between `image` crate buffers and distmap images.

use std::path::Path;

use ::image::{DynamicImage, GrayImage, ImageBuffer, ImageReader, Luma};
use distmap_core::{BinaryImage, GridError, Image};

use crate::error::{DistanceError, DistanceIoError};

/// 16-bit greyscale buffer written for scalar results.
pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Non-zero pixels become object.
pub fn mask_from_gray(img: &GrayImage) -> Result<BinaryImage, GridError> {
    let sizes = [img.width() as usize, img.height() as usize];
    Image::from_vec(&sizes, img.as_raw().iter().map(|&v| v != 0).collect())
}

/// Raw grey values: 16-bit images keep their full range, everything else
/// is converted to 8-bit luma first.
pub fn grey_from_dynamic(img: &DynamicImage) -> Result<Image<f32>, GridError> {
    let sizes = [img.width() as usize, img.height() as usize];
    let data: Vec<f32> = match img {
        DynamicImage::ImageLuma16(buf) => buf.as_raw().iter().map(|&v| v as f32).collect(),
        other => other.to_luma8().as_raw().iter().map(|&v| v as f32).collect(),
    };
    Image::from_vec(&sizes, data)
}

/// Load a mask image from disk.
pub fn load_mask(path: impl AsRef<Path>) -> Result<BinaryImage, DistanceError> {
    let img = ImageReader::open(path)
        .map_err(DistanceIoError::from)?
        .decode()
        .map_err(DistanceIoError::from)?
        .to_luma8();
    Ok(mask_from_gray(&img)?)
}

/// Load a grey cost image from disk.
pub fn load_grey(path: impl AsRef<Path>) -> Result<Image<f32>, DistanceError> {
    let img = ImageReader::open(path)
        .map_err(DistanceIoError::from)?
        .decode()
        .map_err(DistanceIoError::from)?;
    Ok(grey_from_dynamic(&img)?)
}

/// `round(value * scale)`, saturating to `0..=u16::MAX`. Only 2D images
/// can be written.
pub fn to_gray16(img: &Image<f32>, scale: f32) -> Result<Gray16Image, GridError> {
    let &[w, h] = img.sizes() else {
        return Err(GridError::Dimensionality {
            expected: "2",
            got: img.dimensionality(),
        });
    };
    let data: Vec<u16> = img
        .as_slice()
        .iter()
        .map(|&v| (v * scale).round().clamp(0.0, u16::MAX as f32) as u16)
        .collect();
    ImageBuffer::from_raw(w as u32, h as u32, data).ok_or(GridError::BufferTooShort {
        needed: w * h,
        got: img.as_slice().len(),
    })
}

/// Write a scalar 2D result as a 16-bit PNG.
pub fn save_gray16(img: &Image<f32>, scale: f32, path: impl AsRef<Path>) -> Result<(), DistanceError> {
    to_gray16(img, scale)?
        .save(path)
        .map_err(DistanceIoError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_zero_pixels_are_object() {
        let img = GrayImage::from_raw(3, 2, vec![0, 1, 255, 0, 0, 7]).unwrap();
        let mask = mask_from_gray(&img).unwrap();
        assert_eq!(mask.sizes(), &[3, 2]);
        assert_eq!(mask.as_slice(), &[false, true, true, false, false, true]);
    }

    #[test]
    fn gray16_rounds_and_saturates() {
        let img = Image::from_vec(&[2, 2], vec![0.26, -3.0, 1.0e9, 2.5]).unwrap();
        let out = to_gray16(&img, 10.0).unwrap();
        assert_eq!(out.as_raw(), &vec![3, 0, u16::MAX, 25]);
    }

    #[test]
    fn only_2d_images_become_pngs() {
        let img = Image::filled(&[2, 2, 2], 1.0f32).unwrap();
        assert!(to_gray16(&img, 1.0).is_err());
    }

    #[test]
    fn sixteen_bit_grey_keeps_its_range() {
        let buf: Gray16Image = ImageBuffer::from_raw(2, 1, vec![1000u16, 65535]).unwrap();
        let grey = grey_from_dynamic(&DynamicImage::ImageLuma16(buf)).unwrap();
        assert_eq!(grey.as_slice(), &[1000.0, 65535.0]);
    }
}
