use approx::assert_abs_diff_eq;
use distmap_core::{Grid, Image, ImageView, Metric, Spacing};
use distmap_grey::{grey_weighted_distance_transform, GdtOutput};

fn centre_mask(sizes: &[usize]) -> Image<bool> {
    let centre: Vec<usize> = sizes.iter().map(|n| n / 2).collect();
    Image::from_fn(sizes, |c| c != centre.as_slice()).expect("mask")
}

fn unit_gdt(sizes: &[usize], metric: Metric, output: GdtOutput) -> Vec<Image<f32>> {
    let mask = centre_mask(sizes);
    let grey = Image::filled(sizes, 1.0f32).expect("grey");
    grey_weighted_distance_transform(
        grey.view(),
        mask.view(),
        &Spacing::isotropic(sizes.len()),
        &metric,
        output,
    )
    .expect("transform")
    .into_channels()
}

#[test]
fn eight_connected_metric_takes_diagonal_steps() {
    let sizes = [9, 7];
    let gdt = unit_gdt(&sizes, Metric::Connected(0), GdtOutput::Gdt);
    assert_eq!(gdt.len(), 1);
    // Axis steps cost 1, diagonal steps sqrt(2).
    for x in 1..8usize {
        assert_abs_diff_eq!(
            gdt[0].get(&[x, 3]).expect("pixel"),
            x.abs_diff(4) as f32,
            epsilon = 1e-5
        );
    }
    for k in 1..3usize {
        assert_abs_diff_eq!(
            gdt[0].get(&[4 + k, 3 + k]).expect("pixel"),
            k as f32 * 2f32.sqrt(),
            epsilon = 1e-5
        );
    }
}

#[test]
fn unit_grey_equals_hop_length() {
    for (sizes, metric) in [
        (vec![11, 9], Metric::Chamfer(2)),
        (vec![7, 7, 5], Metric::Connected(3)),
        (vec![9, 9], Metric::Connected(2)),
    ] {
        let both = unit_gdt(&sizes, metric.clone(), GdtOutput::Both);
        assert_eq!(both.len(), 2);
        for (g, d) in both[0].as_slice().iter().zip(both[1].as_slice()) {
            assert_abs_diff_eq!(*g, *d, epsilon = 1e-4);
        }
        let euclidean = unit_gdt(&sizes, metric, GdtOutput::Euclidean);
        assert_eq!(euclidean[0], both[1]);
    }
}

#[test]
fn integer_grey_images_are_accepted() {
    let grid = Grid::new(&[5, 5]).expect("grid");
    let mut mask = vec![true; 25];
    mask[12] = false;
    let grey = vec![3u8; 25];
    let out = grey_weighted_distance_transform(
        ImageView::new(&grid, &grey).expect("grey"),
        ImageView::new(&grid, &mask).expect("mask"),
        &Spacing::isotropic(2),
        &Metric::Connected(1),
        GdtOutput::Gdt,
    )
    .expect("transform");
    assert_eq!(out.channel(0)[11], 3.0);
    assert_eq!(out.channel(0)[6], 6.0);
}

#[test]
fn spacing_weights_the_steps() {
    let sizes = [7, 5];
    let mask = centre_mask(&sizes);
    let grey = Image::filled(&sizes, 1.0f32).expect("grey");
    let spacing = Spacing::new(vec![2.0, 1.0]).expect("spacing");
    let out = grey_weighted_distance_transform(
        grey.view(),
        mask.view(),
        &spacing,
        &Metric::Connected(1),
        GdtOutput::Gdt,
    )
    .expect("transform");
    let gdt = &out.into_channels()[0];
    assert_eq!(gdt.get(&[5, 2]), Some(4.0));
    assert_eq!(gdt.get(&[3, 3]), Some(1.0));
    assert_eq!(gdt.get(&[4, 3]), Some(3.0));
}
