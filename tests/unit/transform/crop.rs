use super::*;

fn numbered(w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            r.set_pixel(x, y, [(x % 256) as u8, (y % 256) as u8, 7, 255])
                .unwrap();
        }
    }
    r
}

#[test]
fn crop_inside_bounds_is_lossless() {
    let src = numbered(300, 200);
    let region = Region::new(50, 25, 100, 100);
    let out = crop(&src, region).unwrap();
    assert_eq!(out.dimensions(), (100, 100));
    for j in 0..100 {
        for i in 0..100 {
            assert_eq!(out.get_pixel(i, j), src.get_pixel(50 + i, 25 + j));
        }
    }
}

#[test]
fn overhanging_box_slides_instead_of_shrinking() {
    let r = clamp_region(Region::new(250, 180, 100, 50), 300, 200);
    assert_eq!(r, Region::new(200, 150, 100, 50));
}

#[test]
fn oversized_box_is_capped_to_image() {
    let r = clamp_region(Region::new(10, 10, 1000, 1000), 300, 200);
    assert_eq!(r, Region::new(0, 0, 300, 200));
}

#[test]
fn empty_box_is_floored_to_one_pixel() {
    let r = clamp_region(Region::new(5, 5, 0, 0), 10, 10);
    assert_eq!(r, Region::new(5, 5, 1, 1));
}

#[test]
fn crop_clamps_out_of_range_request() {
    let src = numbered(40, 30);
    let out = crop(&src, Region::new(35, 0, 10, 10)).unwrap();
    assert_eq!(out.dimensions(), (10, 10));
    assert_eq!(out.get_pixel(0, 0), src.get_pixel(30, 0));
}

#[test]
fn aspect_lock_sets_height_from_width() {
    let r = apply_aspect_lock(Region::new(0, 0, 160, 10), 16.0 / 9.0, 1000);
    assert_eq!(r.height, 90);
}

#[test]
fn aspect_lock_is_limited_by_remaining_height() {
    let r = apply_aspect_lock(Region::new(0, 150, 100, 10), 1.0, 200);
    assert_eq!(r.height, 50);
}

#[test]
fn params_apply_lock_then_clamp() {
    let p = CropParams {
        region: Region::new(280, 0, 100, 1),
        aspect: CropAspect::Square,
    };
    assert_eq!(p.resolve(300, 200), Region::new(200, 0, 100, 100));
}

#[test]
fn free_and_bad_custom_ratios_do_not_lock() {
    assert_eq!(CropAspect::Free.ratio(), None);
    assert_eq!(CropAspect::Custom(0.0).ratio(), None);
    assert_eq!(CropAspect::Custom(2.0).ratio(), Some(2.0));
}

#[test]
fn aspect_names_and_ratios_parse() {
    assert_eq!("16:9".parse::<CropAspect>().unwrap(), CropAspect::SixteenNine);
    assert_eq!("Square".parse::<CropAspect>().unwrap(), CropAspect::Square);
    assert_eq!("free".parse::<CropAspect>().unwrap(), CropAspect::Free);
    assert_eq!("5:4".parse::<CropAspect>().unwrap(), CropAspect::Custom(1.25));
    assert_eq!("2.5".parse::<CropAspect>().unwrap(), CropAspect::Custom(2.5));
    assert!("0:1".parse::<CropAspect>().is_err());
    assert!("wide".parse::<CropAspect>().is_err());
}
