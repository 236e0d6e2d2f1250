//! Endpoint linking regression test
//!
//! Tests:
//!   (1) Medium gap joined on angle compatibility alone
//!   (2) A line crossing a third edge pixel is never drawn
//!   (3) Long gaps need inverse angles and enough EGM
//!   (4) Closures walk away from the line body
//!   (5) Short closures are accepted on EGM alone
//!   (6) Longer closures need orthogonal support or an inverse target
//!   (7) Only the first edge pixel met is considered
//!   (8) An earlier link consumes a partner a later endpoint wanted

use focal_core::ByteRaster;
use focal_edge::{LinkOptions, LinkSummary, link_endpoints};
use focal_test::RegParams;

fn edge_mask(rows: usize, cols: usize, cells: &[(usize, usize)]) -> ByteRaster {
    let mut mask = ByteRaster::new(rows, cols).expect("mask");
    for &(r, c) in cells {
        mask.set(r, c, 1).expect("cell");
    }
    mask
}

fn run(r: usize, cols: std::ops::RangeInclusive<usize>) -> Vec<(usize, usize)> {
    cols.map(|c| (r, c)).collect()
}

fn column(c: usize, rows: std::ops::RangeInclusive<usize>) -> Vec<(usize, usize)> {
    rows.map(|r| (r, c)).collect()
}

/// Link a single endpoint on a 21x21 raster with uniform EGM
fn link_single(
    cells: &[(usize, usize)],
    endpoint: (usize, usize),
    egm_value: u8,
    window_size: usize,
) -> (ByteRaster, ByteRaster, LinkSummary) {
    let mut edges = edge_mask(21, 21, cells);
    let mut endpoints = edge_mask(21, 21, &[endpoint]);
    let egm = ByteRaster::new_with_value(21, 21, egm_value).expect("egm");
    let options = LinkOptions::default().with_window_size(window_size);
    let summary = link_endpoints(&mut edges, &mut endpoints, &egm, &options).expect("link");
    (edges, endpoints, summary)
}

#[test]
fn link_reg_medium_gap() {
    let mut rp = RegParams::new("link_medium_gap");

    let mut cells = run(10, 3..=8);
    cells.extend(run(10, 11..=18));
    let mut edges = edge_mask(21, 24, &cells);
    let mut endpoints = edge_mask(21, 24, &[(10, 8), (10, 11)]);
    // No EGM at all: the medium tier only checks the angle pair
    let egm = ByteRaster::new(21, 24).expect("egm");

    let options = LinkOptions::default();
    let summary = link_endpoints(&mut edges, &mut endpoints, &egm, &options).expect("link");
    rp.show("edges", &edges);

    rp.compare_values(1.0, summary.links as f64, 0.0);
    rp.compare_values(1.0, edges.get(10, 9).expect("gap") as f64, 0.0);
    rp.compare_values(1.0, edges.get(10, 10).expect("gap") as f64, 0.0);
    rp.compare_values(0.0, endpoints.get(10, 8).expect("consumed") as f64, 0.0);
    rp.compare_values(0.0, endpoints.get(10, 11).expect("consumed") as f64, 0.0);

    assert!(rp.cleanup(), "link_medium_gap regression test failed");
}

#[test]
fn link_reg_crossing() {
    let mut rp = RegParams::new("link_crossing");

    let mut cells = run(7, 1..=4);
    cells.extend(run(7, 7..=12));
    cells.extend((2..=12).map(|r| (r, 6)));
    let mut edges = edge_mask(15, 15, &cells);
    let mut endpoints = edge_mask(15, 15, &[(7, 4), (7, 7)]);
    let egm = ByteRaster::new_with_value(15, 15, 200).expect("egm");
    let edges_before = edges.clone();
    let endpoints_before = endpoints.clone();

    let options = LinkOptions::default();
    let summary = link_endpoints(&mut edges, &mut endpoints, &egm, &options).expect("link");

    rp.check(summary == LinkSummary { visited: 2, links: 0, closures: 0 }, "nothing linked");
    rp.compare_rasters(&edges_before, &edges, 0.0);
    rp.compare_rasters(&endpoints_before, &endpoints, 0.0);

    assert!(rp.cleanup(), "link_crossing regression test failed");
}

#[test]
fn link_reg_large_gap() {
    let mut rp = RegParams::new("link_large_gap");

    let opts = LinkOptions::default().with_window_size(11).with_medium_gap(4);
    let mut cells = run(10, 3..=8);
    cells.extend(run(10, 12..=18));

    for (egm_value, expect_link) in [(50u8, true), (20u8, false)] {
        let mut edges = edge_mask(21, 24, &cells);
        let mut endpoints = edge_mask(21, 24, &[(10, 8), (10, 12)]);
        let egm = ByteRaster::new_with_value(21, 24, egm_value).expect("egm");

        let summary = link_endpoints(&mut edges, &mut endpoints, &egm, &opts).expect("link");
        let linked = (9..=11).all(|c| edges.get(10, c).expect("gap") == 1);
        rp.check(linked == expect_link, "long gap decided by EGM");
        rp.compare_values(expect_link as u8 as f64, summary.links as f64, 0.0);
        rp.compare_values(0.0, summary.closures as f64, 0.0);
    }

    assert!(rp.cleanup(), "link_large_gap regression test failed");
}

#[test]
fn link_reg_closure_direction() {
    let mut rp = RegParams::new("link_closure_direction");

    // Body runs southwest of (10,10), so the walk heads northeast
    let body = [(10, 10), (11, 9), (12, 8), (13, 7)];

    let mut cells = body.to_vec();
    cells.push((8, 12));
    let (edges, endpoints, summary) = link_single(&cells, (10, 10), 50, 11);
    rp.show("edges", &edges);
    rp.check(summary == LinkSummary { visited: 1, links: 0, closures: 1 }, "closed northeast");
    rp.compare_values(1.0, edges.get(9, 11).expect("bridge") as f64, 0.0);
    rp.compare_values(0.0, endpoints.get(10, 10).expect("consumed") as f64, 0.0);

    let mut cells = body.to_vec();
    cells.push((12, 12));
    let (edges, endpoints, summary) = link_single(&cells, (10, 10), 50, 11);
    rp.compare_values(0.0, summary.closures as f64, 0.0);
    rp.compare_values(0.0, edges.get(11, 11).expect("untouched") as f64, 0.0);
    rp.compare_values(1.0, endpoints.get(10, 10).expect("kept") as f64, 0.0);

    assert!(rp.cleanup(), "link_closure_direction regression test failed");
}

#[test]
fn link_reg_closure_short_line() {
    let mut rp = RegParams::new("link_closure_short_line");

    // A lone pixel two steps east: a 3-pixel line, judged on EGM alone
    let mut cells = run(10, 3..=10);
    cells.push((10, 12));

    let (edges, _, summary) = link_single(&cells, (10, 10), 50, 11);
    rp.compare_values(1.0, summary.closures as f64, 0.0);
    rp.compare_values(1.0, edges.get(10, 11).expect("bridge") as f64, 0.0);

    let (edges, endpoints, summary) = link_single(&cells, (10, 10), 10, 11);
    rp.compare_values(0.0, summary.closures as f64, 0.0);
    rp.compare_values(0.0, edges.get(10, 11).expect("gap") as f64, 0.0);
    rp.compare_values(1.0, endpoints.get(10, 10).expect("kept") as f64, 0.0);

    assert!(rp.cleanup(), "link_closure_short_line regression test failed");
}

#[test]
fn link_reg_closure_orthogonal_support() {
    let mut rp = RegParams::new("link_closure_orthogonal_support");

    // A vertical edge three steps east crosses the walk at a right angle
    let mut cells = run(10, 3..=10);
    cells.extend(column(13, 5..=15));

    let (edges, endpoints, summary) = link_single(&cells, (10, 10), 50, 15);
    rp.show("edges", &edges);
    rp.check(summary == LinkSummary { visited: 1, links: 0, closures: 1 }, "closed onto the wall");
    rp.compare_values(1.0, edges.get(10, 11).expect("bridge") as f64, 0.0);
    rp.compare_values(1.0, edges.get(10, 12).expect("bridge") as f64, 0.0);
    rp.compare_values(0.0, endpoints.get(10, 10).expect("consumed") as f64, 0.0);

    let (edges, _, summary) = link_single(&cells, (10, 10), 10, 15);
    rp.compare_values(0.0, summary.closures as f64, 0.0);
    rp.compare_values(0.0, edges.get(10, 11).expect("gap") as f64, 0.0);

    assert!(rp.cleanup(), "link_closure_orthogonal_support regression test failed");
}

#[test]
fn link_reg_closure_inverse_target() {
    let mut rp = RegParams::new("link_closure_inverse_target");

    // The body runs east; a second line ends three steps west, facing back
    let mut cells = run(10, 10..=17);
    cells.extend(run(10, 2..=7));

    let (edges, _, summary) = link_single(&cells, (10, 10), 50, 15);
    rp.compare_values(1.0, summary.closures as f64, 0.0);
    rp.compare_values(1.0, edges.get(10, 8).expect("bridge") as f64, 0.0);
    rp.compare_values(1.0, edges.get(10, 9).expect("bridge") as f64, 0.0);

    let (_, _, summary) = link_single(&cells, (10, 10), 10, 15);
    rp.compare_values(0.0, summary.closures as f64, 0.0);

    // Same target pixel, but its line leaves to the northwest
    let mut cells = run(10, 10..=17);
    cells.extend([(10, 7), (9, 6), (8, 5)]);
    let (edges, _, summary) = link_single(&cells, (10, 10), 50, 15);
    rp.compare_values(0.0, summary.closures as f64, 0.0);
    rp.compare_values(0.0, edges.get(10, 9).expect("gap") as f64, 0.0);

    assert!(rp.cleanup(), "link_closure_inverse_target regression test failed");
}

#[test]
fn link_reg_closure_first_hit() {
    let mut rp = RegParams::new("link_closure_first_hit");

    let mut cells = run(10, 3..=10);
    cells.extend(column(14, 5..=15));

    // Unobstructed, the walk reaches the wall four steps east
    let (edges, _, summary) = link_single(&cells, (10, 10), 50, 15);
    rp.compare_values(1.0, summary.closures as f64, 0.0);
    for c in 11..=13 {
        rp.compare_values(1.0, edges.get(10, c).expect("bridge") as f64, 0.0);
    }

    // A lone pixel in front of the wall is met first and fails the test
    cells.push((10, 13));
    let (edges, endpoints, summary) = link_single(&cells, (10, 10), 50, 15);
    rp.compare_values(0.0, summary.closures as f64, 0.0);
    rp.compare_values(0.0, edges.get(10, 11).expect("gap") as f64, 0.0);
    rp.compare_values(0.0, edges.get(10, 12).expect("gap") as f64, 0.0);
    rp.compare_values(1.0, endpoints.get(10, 10).expect("kept") as f64, 0.0);

    assert!(rp.cleanup(), "link_closure_first_hit regression test failed");
}

#[test]
fn link_reg_order_dependence() {
    let mut rp = RegParams::new("link_order_dependence");

    // B at (10,10) hangs south; C at (10,12) hangs east. A at (8,10)
    // hangs north and comes first in row-major order.
    let mut cells = column(10, 5..=8);
    cells.extend(column(10, 10..=13));
    cells.extend(run(10, 12..=15));
    let egm = ByteRaster::new_with_value(21, 21, 50).expect("egm");
    let options = LinkOptions::default();

    // Without A, B and C join across (10,11)
    let mut edges = edge_mask(21, 21, &cells);
    let mut endpoints = edge_mask(21, 21, &[(10, 10), (10, 12)]);
    let summary = link_endpoints(&mut edges, &mut endpoints, &egm, &options).expect("link");
    rp.check(summary == LinkSummary { visited: 2, links: 1, closures: 0 }, "B joins C");
    rp.compare_values(1.0, edges.get(10, 11).expect("bridge") as f64, 0.0);
    rp.compare_values(0.0, endpoints.get(10, 12).expect("consumed") as f64, 0.0);

    // With A, B is taken first and C is left unlinked
    let mut edges = edge_mask(21, 21, &cells);
    let mut endpoints = edge_mask(21, 21, &[(8, 10), (10, 10), (10, 12)]);
    let summary = link_endpoints(&mut edges, &mut endpoints, &egm, &options).expect("link");
    rp.show("edges", &edges);
    rp.check(summary == LinkSummary { visited: 3, links: 1, closures: 0 }, "A joins B");
    rp.compare_values(1.0, edges.get(9, 10).expect("bridge") as f64, 0.0);
    rp.compare_values(0.0, edges.get(10, 11).expect("gap") as f64, 0.0);
    rp.compare_values(0.0, endpoints.get(10, 10).expect("consumed") as f64, 0.0);
    rp.compare_values(1.0, endpoints.get(10, 12).expect("kept") as f64, 0.0);

    assert!(rp.cleanup(), "link_order_dependence regression test failed");
}
