//! Distance and inhibition regression test
//!
//! Tests:
//!   (1) Distance is zero on flat regions and positive at a step edge
//!   (2) RGB distance of a single off-color pixel
//!   (3) Inhibition leaves flat regions untouched and suppresses texture

use focal_core::{FRaster, RasterStack};
use focal_filter::{InhibitionOptions, distance, inhibit, rgb_distance};
use focal_test::{RegParams, pattern_raster};

#[test]
fn distance_reg_step_edge() {
    let mut rp = RegParams::new("distance_step_edge");

    let data = (0..8 * 8).map(|i| if i % 8 < 4 { 10.0 } else { 30.0 }).collect();
    let step = FRaster::from_data(8, 8, data).expect("step");
    let out = distance(&step, 3, None, None).expect("distance");
    rp.show("distance", &out);

    rp.compare_values(0.0, out.get(4, 1).expect("flat left") as f64, 0.0);
    rp.compare_values(0.0, out.get(4, 6).expect("flat right") as f64, 0.0);
    rp.check(out.get(4, 3).expect("edge") > 0.0, "left of the step responds");
    rp.check(out.get(4, 4).expect("edge") > 0.0, "right of the step responds");

    let masked = distance(&step, 3, Some(10.0), None).expect("no-data distance");
    rp.compare_values(0.0, masked.get(4, 3).expect("no-data center") as f64, 0.0);

    assert!(rp.cleanup(), "distance_step_edge regression test failed");
}

#[test]
fn distance_reg_rgb() {
    let mut rp = RegParams::new("distance_rgb");

    let mut red = FRaster::new(5, 5).expect("red");
    let green = FRaster::new(5, 5).expect("green");
    let mut blue = FRaster::new(5, 5).expect("blue");
    red.set(2, 2, 3.0).expect("red spot");
    blue.set(2, 2, 4.0).expect("blue spot");
    let stack = RasterStack::new(vec![red, green, blue]).expect("stack");

    let out = rgb_distance(&stack, 3).expect("rgb distance");
    // All eight neighbors are 5 away from the center
    rp.compare_values(5.0, out.get(2, 2).expect("center") as f64, 1e-5);
    // A neighbor sees the center once
    rp.compare_values(5.0 / 8.0, out.get(1, 1).expect("neighbor") as f64, 1e-5);

    assert!(rp.cleanup(), "distance_rgb regression test failed");
}

#[test]
fn distance_reg_inhibition() {
    let mut rp = RegParams::new("distance_inhibition");

    let flat = FRaster::new_with_value(7, 7, 40.0).expect("flat");
    let out = inhibit(&flat, &InhibitionOptions::default()).expect("inhibit flat");
    // T / I is 1 on a flat 3x3; mean scale is 0.625
    rp.compare_values(40.0 - 0.625, out.get(3, 3).expect("center") as f64, 1e-4);

    let texture = pattern_raster(9, 9, 17);
    for window_size in [3, 5, 7] {
        let opts = InhibitionOptions::default().with_window_size(window_size);
        let out = inhibit(&texture, &opts).expect("inhibit texture");
        rp.check(out.data().iter().all(|v| v.is_finite()), "finite output");
        rp.compare_values(0.0, out.get(0, 0).expect("border") as f64, 0.0);
    }

    assert!(rp.cleanup(), "distance_inhibition regression test failed");
}
