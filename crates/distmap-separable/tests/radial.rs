use approx::assert_abs_diff_eq;
use distmap_core::{radius_coordinate, Border, Grid, Image, ImageView, Spacing};
use distmap_separable::{separable_distance_transform, SeparableError};

fn centre_seed(sizes: &[usize]) -> Image<bool> {
    let centre: Vec<usize> = sizes.iter().map(|n| n / 2).collect();
    Image::from_fn(sizes, |c| c != centre.as_slice()).expect("mask")
}

/// `min(r, n_d / 2 + 1 - |c_d - n_d / 2|)` over all axes.
fn clipped_radius(sizes: &[usize]) -> Image<f32> {
    let r = radius_coordinate(sizes).expect("radius");
    Image::from_fn(sizes, |c| {
        let mut v = r.get(c).unwrap_or(0.0);
        for (d, &n) in sizes.iter().enumerate() {
            let off = (c[d] as f32 - (n / 2) as f32).abs();
            v = v.min((n / 2 + 1) as f32 - off);
        }
        v
    })
    .expect("clipped radius")
}

#[test]
fn radial_images_with_object_border() {
    for sizes in [vec![51], vec![31, 41], vec![31, 21, 11]] {
        let mask = centre_seed(&sizes);
        let spacing = Spacing::isotropic(sizes.len());
        let expected = radius_coordinate(&sizes).expect("radius");
        let d = separable_distance_transform(mask.view(), &spacing, Border::Object, false)
            .expect("transform");
        assert!(d.max_abs_difference(&expected).expect("shape") < 1e-4);

        let sq = separable_distance_transform(mask.view(), &spacing, Border::Object, true)
            .expect("transform");
        let root = sq.map(f32::sqrt);
        assert!(root.max_abs_difference(&expected).expect("shape") < 1e-4);
    }
}

#[test]
fn radial_images_with_background_border() {
    for sizes in [vec![51], vec![31, 41], vec![31, 21, 11]] {
        let mask = centre_seed(&sizes);
        let spacing = Spacing::isotropic(sizes.len());
        let expected = clipped_radius(&sizes);
        for squared in [false, true] {
            let d = separable_distance_transform(mask.view(), &spacing, Border::Background, squared)
                .expect("transform");
            let d = if squared { d.map(f32::sqrt) } else { d };
            let err = d.max_abs_difference(&expected).expect("shape");
            assert!(err < 1e-4, "{sizes:?} squared={squared}: error {err}");
        }
    }
}

#[test]
fn four_dimensional_input_is_supported() {
    let sizes = [5, 4, 3, 3];
    let mask = centre_seed(&sizes);
    let d = separable_distance_transform(mask.view(), &Spacing::isotropic(4), Border::Object, true)
        .expect("transform");
    assert_eq!(d.get(&[0, 0, 0, 0]), Some(4.0 + 4.0 + 1.0 + 1.0));
}

#[test]
fn anisotropic_spacing_scales_each_axis() {
    let grid = Grid::new(&[7, 5]).expect("grid");
    let mut data = vec![true; 35];
    data[grid.offset(&[3, 2])] = false;
    let view = ImageView::new(&grid, &data).expect("view");
    let spacing = Spacing::new(vec![2.0, 0.5]).expect("spacing");
    let d = separable_distance_transform(view, &spacing, Border::Object, true).expect("transform");
    for y in 0..5 {
        for x in 0..7 {
            let dx = 2.0 * (x as f32 - 3.0);
            let dy = 0.5 * (y as f32 - 2.0);
            assert_abs_diff_eq!(d.get(&[x, y]).unwrap_or(-1.0), dx * dx + dy * dy, epsilon = 1e-4);
        }
    }
}

#[test]
fn spacing_of_the_wrong_length_is_rejected() {
    let mask = centre_seed(&[4, 4]);
    let err = separable_distance_transform(mask.view(), &Spacing::isotropic(3), Border::Object, false)
        .unwrap_err();
    assert!(matches!(err, SeparableError::Grid(_)));
}
