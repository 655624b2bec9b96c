use super::*;

#[test]
fn parses_singles_ranges_and_open_ends() {
    let r = parse_ranges("1-3, 5,8-").unwrap();
    assert_eq!(
        r,
        vec![
            PageRange {
                start: 1,
                end: Some(3)
            },
            PageRange {
                start: 5,
                end: Some(5)
            },
            PageRange {
                start: 8,
                end: None
            },
        ]
    );
    assert_eq!(
        "-4".parse::<PageRange>().unwrap(),
        PageRange {
            start: 1,
            end: Some(4)
        }
    );
}

#[test]
fn rejects_garbage() {
    assert!(parse_ranges("1-x").is_err());
    assert!(parse_ranges(" , ").is_err());
    assert!("a".parse::<PageRange>().is_err());
}

#[test]
fn ranges_are_clamped_and_swapped() {
    let r = PageRange {
        start: 7,
        end: Some(2),
    };
    assert_eq!(r.resolve(5), Some((2, 5)));
    let beyond = PageRange {
        start: 9,
        end: None,
    };
    assert_eq!(beyond.resolve(5), None);
    let zero = PageRange {
        start: 0,
        end: Some(1),
    };
    assert_eq!(zero.resolve(3), Some((1, 1)));
}

#[test]
fn every_page_split() {
    let plan = SplitMode::EveryPage.plan(3).unwrap();
    assert_eq!(plan, vec![vec![1], vec![2], vec![3]]);
}

#[test]
fn range_split_drops_missing_ranges() {
    let mode = SplitMode::Ranges(parse_ranges("1-2, 4-, 10-12").unwrap());
    assert_eq!(mode.plan(5).unwrap(), vec![vec![1, 2], vec![4, 5]]);
    assert!(SplitMode::Ranges(parse_ranges("10").unwrap()).plan(5).is_err());
    assert!(SplitMode::EveryPage.plan(0).is_err());
}

#[test]
fn selection_is_sorted_and_deduplicated() {
    let sel = PageSelection::parse("4-5, 1, 2-4").unwrap();
    assert_eq!(sel.pages(10), vec![1, 2, 3, 4, 5]);
    assert_eq!(PageSelection::parse("ALL").unwrap().pages(3), vec![1, 2, 3]);
    assert_eq!(PageSelection::parse("").unwrap(), PageSelection::All);
}
