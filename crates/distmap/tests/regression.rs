//! Radial images with a single background pixel at the centre.

use distmap::{
    euclidean_distance_transform, radius_coordinate, vector_distance_transform, BinaryImage,
    Border, EdtMethod, Image, Spacing, VdtMethod,
};

fn centre_seed(sizes: &[usize]) -> BinaryImage {
    let centre: Vec<usize> = sizes.iter().map(|n| n / 2).collect();
    Image::from_fn(sizes, |c| c != centre.as_slice()).expect("mask")
}

/// Distance of every pixel to the centre or to the first pixel past the
/// image edge, whichever is nearer.
fn radius_or_edge(sizes: &[usize]) -> Image<f32> {
    let r = radius_coordinate(sizes).expect("radius");
    Image::from_fn(sizes, |c| {
        let edge = c
            .iter()
            .zip(sizes)
            .map(|(&x, &n)| (x + 1).min(n - x))
            .min()
            .unwrap_or(0) as f32;
        r.get(c).unwrap_or(0.0).min(edge)
    })
    .expect("expected image")
}

fn distances(mask: &BinaryImage, border: Border, method: EdtMethod) -> Image<f32> {
    let spacing = Spacing::isotropic(mask.dimensionality());
    let d = euclidean_distance_transform(mask.view(), &spacing, border, method)
        .unwrap_or_else(|e| panic!("{method} failed: {e}"));
    if method == EdtMethod::Square {
        d.map(f32::sqrt)
    } else {
        d
    }
}

#[test]
fn line_of_51_pixels() {
    let mask = centre_seed(&[51]);
    for method in [EdtMethod::Separable, EdtMethod::Square] {
        let d = distances(&mask, Border::Object, method);
        for (i, &v) in d.as_slice().iter().enumerate() {
            assert_eq!(v, (i as f32 - 25.0).abs(), "{method} at {i}");
        }
        let d = distances(&mask, Border::Background, method);
        for (i, &v) in d.as_slice().iter().enumerate() {
            let expect = i.abs_diff(25).min(i + 1).min(51 - i) as f32;
            assert_eq!(v, expect, "{method} at {i}");
        }
    }
}

#[test]
fn object_border_reproduces_the_radius() {
    for sizes in [vec![31, 41], vec![31, 21, 11]] {
        let mask = centre_seed(&sizes);
        let expected = radius_coordinate(&sizes).expect("radius");
        for method in EdtMethod::ALL {
            let d = distances(&mask, Border::Object, method);
            let err = d.max_abs_difference(&expected).expect("same shape");
            let tolerance = match method {
                EdtMethod::Fast | EdtMethod::Ties => 0.25,
                _ => 1e-4,
            };
            assert!(err < tolerance, "{method} on {sizes:?}: error {err}");
        }
    }
}

#[test]
fn background_border_clips_at_the_edge() {
    for sizes in [vec![31, 41], vec![31, 21, 11]] {
        let mask = centre_seed(&sizes);
        let expected = radius_or_edge(&sizes);
        for method in [EdtMethod::Separable, EdtMethod::Square] {
            let d = distances(&mask, Border::Background, method);
            let err = d.max_abs_difference(&expected).expect("same shape");
            assert!(err < 1e-4, "{method} on {sizes:?}: error {err}");
        }
        let d = distances(&mask, Border::Background, EdtMethod::True);
        let err = d.max_abs_difference(&expected).expect("same shape");
        assert!(err < 1e-4, "true on {sizes:?}: error {err}");
        for method in [EdtMethod::Fast, EdtMethod::Ties] {
            let d = distances(&mask, Border::Background, method);
            for (a, b) in d.as_slice().iter().zip(expected.as_slice()) {
                assert!(*a + 1e-4 >= *b && *a < *b + 0.25, "{method}: {a} vs {b}");
            }
        }
    }
}

#[test]
fn odd_sizes_clip_at_half_the_size_plus_one() {
    // On the axes through the centre the edge term is `size / 2 + 1 - |u|`.
    let sizes = [31, 41];
    let mask = centre_seed(&sizes);
    let d = distances(&mask, Border::Background, EdtMethod::Separable);
    for x in 0..31usize {
        let u = x.abs_diff(15);
        let expect = (u as f32).min((31 / 2 + 1 - u) as f32);
        assert_eq!(d.get(&[x, 20]), Some(expect), "x = {x}");
    }
}

#[test]
fn all_object_lines_carry_the_border_sentinel() {
    // `1 + Σ n_d²` is carried in from the border, one step added per pixel.
    let line = [52.0, 53.0, 54.0, 55.0, 54.0, 53.0, 52.0];
    let edge = [1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0];
    for sizes in [vec![1, 7], vec![7, 1]] {
        let mask = Image::filled(&sizes, true).expect("mask");
        let d = distances(&mask, Border::Object, EdtMethod::Separable);
        assert_eq!(d.as_slice(), &line, "{sizes:?}");
        let d = distances(&mask, Border::Background, EdtMethod::Separable);
        assert_eq!(d.as_slice(), &edge, "{sizes:?}");
    }
    for (sizes, sentinel) in [(vec![1, 1], 4.0), (vec![1, 1, 1], 5.0)] {
        let mask = Image::filled(&sizes, true).expect("mask");
        let d = distances(&mask, Border::Object, EdtMethod::Separable);
        assert_eq!(d.as_slice(), &[sentinel], "{sizes:?}");
        let d = distances(&mask, Border::Background, EdtMethod::Separable);
        assert_eq!(d.as_slice(), &[1.0], "{sizes:?}");
    }
}

#[test]
fn all_object_raster_scans_report_the_image_diagonal() {
    for (sizes, maxdist) in [
        (vec![1, 7], 50.0f32),
        (vec![7, 1], 50.0),
        (vec![1, 1], 2.0),
        (vec![1, 1, 1], 3.0),
    ] {
        let mask = Image::filled(&sizes, true).expect("mask");
        for method in [EdtMethod::Fast, EdtMethod::Ties, EdtMethod::True, EdtMethod::BruteForce] {
            let d = distances(&mask, Border::Object, method);
            for &v in d.as_slice() {
                assert!((v - maxdist.sqrt()).abs() < 1e-4, "{method} on {sizes:?}: {v}");
            }
        }
        let spacing = Spacing::isotropic(sizes.len());
        let v = vector_distance_transform(mask.view(), &spacing, Border::Object, VdtMethod::True)
            .expect("vector transform");
        for (d, &n) in sizes.iter().enumerate() {
            assert!(v.channel(d).iter().all(|&x| x == -(n as f32)), "{sizes:?} axis {d}");
        }
    }
}

#[test]
fn degenerate_lines_find_their_background_pixel() {
    for sizes in [vec![1, 7], vec![7, 1]] {
        let mask = Image::from_fn(&sizes, |c| c[0] + c[1] != 2).expect("mask");
        for method in EdtMethod::ALL {
            let d = distances(&mask, Border::Object, method);
            for (i, &v) in d.as_slice().iter().enumerate() {
                let expect = i.abs_diff(2) as f32;
                assert!((v - expect).abs() < 1e-4, "{method} on {sizes:?} at {i}: {v}");
            }
        }
    }
}
