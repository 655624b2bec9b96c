use super::*;

#[test]
fn flat_image_becomes_fully_transparent() {
    let src = Raster::filled(8, 8, [120, 40, 200, 255]).unwrap();
    let out = remove_background(&src).unwrap();
    assert!(out.pixels().all(|p| p == [120, 40, 200, 0]));
}

#[test]
fn border_pixels_never_mark_edges() {
    let mut src = Raster::filled(5, 5, [0, 0, 0, 255]).unwrap();
    src.set_pixel(0, 2, [255, 0, 0, 255]).unwrap();
    let mask = edge_mask(&src);
    assert_eq!(mask[2 * 5], 0);
    // Its interior neighbour sees a difference of 255.
    assert_eq!(mask[2 * 5 + 1], 255);
}

#[test]
fn threshold_is_strictly_greater_than_50() {
    let mut src = Raster::filled(3, 3, [100, 0, 0, 255]).unwrap();
    // Centre differs from each of four neighbours by 12 and 13: sum 50, not an edge.
    src.set_pixel(1, 1, [100, 0, 0, 255]).unwrap();
    src.set_pixel(0, 1, [88, 0, 0, 255]).unwrap();
    src.set_pixel(2, 1, [113, 0, 0, 255]).unwrap();
    src.set_pixel(1, 0, [88, 0, 0, 255]).unwrap();
    src.set_pixel(1, 2, [113, 0, 0, 255]).unwrap();
    assert_eq!(edge_mask(&src)[4], 0);

    src.set_pixel(1, 2, [114, 0, 0, 255]).unwrap();
    assert_eq!(edge_mask(&src)[4], 255);
}

#[test]
fn only_red_channel_is_considered() {
    let mut src = Raster::filled(5, 5, [0, 0, 0, 255]).unwrap();
    src.set_pixel(2, 2, [0, 255, 255, 255]).unwrap();
    assert!(edge_mask(&src).iter().all(|&m| m == 0));
}

#[test]
fn rgb_is_untouched_and_alpha_replaced() {
    let mut src = Raster::filled(7, 7, [10, 20, 30, 17]).unwrap();
    src.set_pixel(3, 3, [255, 20, 30, 17]).unwrap();
    let out = remove_background(&src).unwrap();
    for (a, b) in src.pixels().zip(out.pixels()) {
        assert_eq!(a[..3], b[..3]);
    }
    assert!(out.get_pixel(3, 3).unwrap()[3] > 0);
    assert_eq!(out.get_pixel(0, 6).unwrap()[3], 0);
}

#[test]
fn tiny_images_have_empty_mask() {
    let src = Raster::filled(2, 9, [255, 0, 0, 255]).unwrap();
    assert!(edge_mask(&src).iter().all(|&m| m == 0));
}
