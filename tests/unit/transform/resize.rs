use super::*;

fn checker(w: u32, h: u32) -> Raster {
    let mut r = Raster::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            r.set_pixel(x, y, [v, v, v, 255]).unwrap();
        }
    }
    r
}

#[test]
fn output_dimensions_match_request_for_every_filter() {
    let src = checker(37, 23);
    for filter in [
        ResampleFilter::Nearest,
        ResampleFilter::Bilinear,
        ResampleFilter::CatmullRom,
    ] {
        for (w, h) in [(1, 1), (10, 50), (80, 6), (37, 23), (200, 3)] {
            let out = resize(&src, w, h, filter).unwrap();
            assert_eq!(out.dimensions(), (w, h), "{filter:?} {w}x{h}");
        }
    }
}

#[test]
fn zero_request_is_floored_to_one() {
    let out = resize(&checker(4, 4), 0, 0, ResampleFilter::Bilinear).unwrap();
    assert_eq!(out.dimensions(), (1, 1));
}

#[test]
fn resize_there_and_back_restores_dimensions() {
    let src = checker(30, 20);
    let there = resize(&src, 7, 41, ResampleFilter::Bilinear).unwrap();
    let back = resize(&there, 30, 20, ResampleFilter::Bilinear).unwrap();
    assert_eq!(back.dimensions(), src.dimensions());
}

#[test]
fn constant_image_stays_constant() {
    let src = Raster::filled(9, 5, [12, 200, 99, 255]).unwrap();
    for filter in [ResampleFilter::Bilinear, ResampleFilter::CatmullRom] {
        let out = resize(&src, 23, 3, filter).unwrap();
        assert!(out.pixels().all(|p| p == [12, 200, 99, 255]), "{filter:?}");
    }
}

#[test]
fn translucent_fill_keeps_straight_color_through_resize() {
    let src = Raster::filled(6, 4, [200, 100, 50, 128]).unwrap();
    for filter in [ResampleFilter::Bilinear, ResampleFilter::CatmullRom] {
        let out = resize(&src, 17, 9, filter).unwrap();
        for px in out.pixels() {
            for (got, want) in px.iter().zip([200u8, 100, 50, 128]) {
                assert!((i32::from(*got) - i32::from(want)).abs() <= 2, "{filter:?} {px:?}");
            }
        }
    }
}

#[test]
fn downscale_averages_checkerboard() {
    let out = resize(&checker(8, 8), 1, 1, ResampleFilter::Bilinear).unwrap();
    let px = out.get_pixel(0, 0).unwrap();
    assert!((i32::from(px[0]) - 128).abs() <= 2, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn transparent_pixels_do_not_bleed_color() {
    let mut src = Raster::new(2, 1).unwrap();
    src.set_pixel(0, 0, [255, 0, 0, 255]).unwrap();
    src.set_pixel(1, 0, [0, 255, 0, 0]).unwrap();
    let out = resize(&src, 1, 1, ResampleFilter::Bilinear).unwrap();
    let px = out.get_pixel(0, 0).unwrap();
    assert_eq!(px[1], 0);
    assert_eq!(px[0], 255);
}

#[test]
fn aspect_lock_derives_height_from_width() {
    let p = ResizeParams {
        width: 400,
        height: 999,
        maintain_aspect_ratio: true,
        edited: EditedAxis::Width,
        filter: ResampleFilter::Bilinear,
    };
    assert_eq!(p.resolve(800, 600), (400, 300));
}

#[test]
fn aspect_lock_derives_width_from_height() {
    let p = ResizeParams {
        width: 1,
        height: 150,
        maintain_aspect_ratio: true,
        edited: EditedAxis::Height,
        filter: ResampleFilter::Bilinear,
    };
    assert_eq!(p.resolve(800, 600), (200, 150));
}

#[test]
fn unlocked_request_passes_through_with_floor() {
    let p = ResizeParams {
        width: 800,
        height: 0,
        maintain_aspect_ratio: false,
        edited: EditedAxis::Width,
        filter: ResampleFilter::Nearest,
    };
    assert_eq!(p.resolve(300, 200), (800, 1));
}

#[test]
fn filter_and_axis_names_parse() {
    assert_eq!("bicubic".parse::<ResampleFilter>().unwrap(), ResampleFilter::CatmullRom);
    assert_eq!("Nearest".parse::<ResampleFilter>().unwrap(), ResampleFilter::Nearest);
    assert!("lanczos".parse::<ResampleFilter>().is_err());
    assert_eq!("h".parse::<EditedAxis>().unwrap(), EditedAxis::Height);
}
