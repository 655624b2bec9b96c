use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_dimensions_and_straight_alpha() {
    let img = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 255]).unwrap();
    let raster = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(raster.dimensions(), (2, 1));
    assert_eq!(raster.get_pixel(0, 0), Some([100, 50, 200, 128]));
    assert_eq!(raster.get_pixel(1, 0), Some([1, 2, 3, 255]));
}

#[test]
fn non_image_bytes_are_invalid_input() {
    let err = decode_image(b"%PDF-1.7 not an image").unwrap_err();
    assert!(matches!(err, RasterkitError::InvalidInputType(_)));
}

#[test]
fn truncated_png_is_a_decode_failure() {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([9, 9, 9, 255]));
    let bytes = png_bytes(img);
    let err = decode_image(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, RasterkitError::Decode(_)), "{err}");
}

#[test]
fn declared_mime_types() {
    assert_eq!(ImageMime::from_mime("image/JPEG").unwrap(), ImageMime::Jpeg);
    assert_eq!(ImageMime::from_mime("image/webp").unwrap().mime(), "image/webp");
    assert!(matches!(
        ImageMime::from_mime("application/pdf"),
        Err(RasterkitError::InvalidInputType(_))
    ));
}

#[test]
fn sniff_recognises_png() {
    let bytes = png_bytes(image::RgbaImage::new(1, 1));
    assert_eq!(ImageMime::sniff(&bytes).unwrap(), ImageMime::Png);
}

#[test]
fn missing_file_is_reported() {
    let err = decode_file(Path::new("does/not/exist.png")).unwrap_err();
    assert!(err.to_string().contains("exist.png"));
}

#[test]
fn decode_with_mime_reports_the_sniffed_type() {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([5, 6, 7, 255]));
    let (mime, raster) = decode_image_with_mime(&png_bytes(img)).unwrap();
    assert_eq!(mime, ImageMime::Png);
    assert_eq!(raster.dimensions(), (3, 2));
}
