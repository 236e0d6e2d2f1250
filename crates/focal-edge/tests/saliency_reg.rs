//! Orientation, linearity and saliency regression test
//!
//! Tests:
//!   (1) A uniform straight edge is fully linear at interior pixels
//!   (2) Saliency grows with EGM magnitude
//!   (3) Vertical edges orient at a right angle

use focal_core::FRaster;
use focal_edge::{SaliencyOptions, saliency};
use focal_test::RegParams;

fn horizontal(value: f32) -> FRaster {
    let mut egm = FRaster::new(11, 15).expect("egm");
    for c in 0..15 {
        egm.set(5, c, value).expect("edge");
    }
    egm
}

#[test]
fn saliency_reg_straight_edge() {
    let mut rp = RegParams::new("saliency_straight_edge");

    for window_size in [5, 7] {
        let opts = SaliencyOptions::default().with_window_size(window_size);
        let stack = saliency(&horizontal(30.0), &opts).expect("saliency");
        let linear = stack.band(0).expect("linearity");
        rp.show("linearity", linear);
        for c in window_size..15 - window_size {
            rp.compare_values(1.0, linear.get(5, c).expect("interior") as f64, 1e-5);
        }
        rp.compare_values(0.0, linear.get(3, 7).expect("off edge") as f64, 0.0);
    }

    assert!(rp.cleanup(), "saliency_straight_edge regression test failed");
}

#[test]
fn saliency_reg_monotonic() {
    let mut rp = RegParams::new("saliency_monotonic");

    let opts = SaliencyOptions::default();
    let mut previous = 0.0f32;
    for value in [10.0, 40.0, 160.0] {
        let stack = saliency(&horizontal(value), &opts).expect("saliency");
        let s = stack.band(1).expect("saliency band").get(5, 7).expect("center");
        rp.check(s > previous, "saliency increases with EGM");
        previous = s;
    }

    assert!(rp.cleanup(), "saliency_monotonic regression test failed");
}

#[test]
fn saliency_reg_vertical() {
    let mut rp = RegParams::new("saliency_vertical");

    let mut egm = FRaster::new(11, 11).expect("egm");
    for r in 0..11 {
        egm.set(r, 5, 25.0).expect("edge");
    }
    let stack = saliency(&egm, &SaliencyOptions::default()).expect("saliency");
    let (linear, salient) = (stack.band(0).expect("lin"), stack.band(1).expect("sal"));

    rp.compare_values(1.0, linear.get(5, 5).expect("center") as f64, 1e-5);
    // 3 pixels of 25 along the line, 2 weaker pixels beside it
    rp.compare_values(75.0 * 3.0 * 2.0, salient.get(5, 5).expect("center") as f64, 1e-3);

    assert!(rp.cleanup(), "saliency_vertical regression test failed");
}
