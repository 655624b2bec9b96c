use super::*;

#[test]
fn named_sizes_in_points() {
    assert_eq!(PageSize::A4.points(Orientation::Portrait), (595.0, 842.0));
    assert_eq!(PageSize::Letter.points(Orientation::Portrait), (612.0, 792.0));
    assert_eq!(PageSize::Legal.points(Orientation::Portrait), (612.0, 1008.0));
    assert_eq!(PageSize::A3.points(Orientation::Portrait), (842.0, 1191.0));
}

#[test]
fn landscape_swaps() {
    assert_eq!(PageSize::A4.points(Orientation::Landscape), (842.0, 595.0));
}

#[test]
fn sizes_parse_case_insensitively() {
    assert_eq!("Letter".parse::<PageSize>().unwrap(), PageSize::Letter);
    assert!("b5".parse::<PageSize>().is_err());
    assert_eq!(
        "LANDSCAPE".parse::<Orientation>().unwrap(),
        Orientation::Landscape
    );
}

#[test]
fn margins_are_clamped() {
    let m = Margins {
        top: -5.0,
        right: 1000.0,
        bottom: f64::NAN,
        left: 20.0,
    }
    .clamped(612.0, 792.0);
    assert_eq!(m.top, 0.0);
    assert_eq!(m.right, 305.0);
    assert_eq!(m.bottom, 0.0);
    assert_eq!(m.left, 20.0);
}

#[test]
fn content_box_subtracts_margins() {
    let layout = PageLayout {
        size: PageSize::A4,
        orientation: Orientation::Portrait,
        margins: Margins::uniform(20.0),
    };
    let r = layout.content_box();
    assert_eq!((r.x0, r.y0, r.x1, r.y1), (20.0, 20.0, 575.0, 822.0));
}

#[test]
fn large_image_is_scaled_to_fit_and_centred() {
    let layout = PageLayout {
        size: PageSize::Letter,
        orientation: Orientation::Portrait,
        margins: Margins::uniform(0.0),
    };
    let r = layout.fit_image(1224, 612);
    assert!((r.width() - 612.0).abs() < 1e-9);
    assert!((r.height() - 306.0).abs() < 1e-9);
    assert!((r.y0 - 243.0).abs() < 1e-9);
}

#[test]
fn small_image_is_not_enlarged() {
    let layout = PageLayout::default();
    let r = layout.fit_image(100, 50);
    assert_eq!((r.width(), r.height()), (100.0, 50.0));
}
