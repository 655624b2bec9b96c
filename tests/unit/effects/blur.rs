use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    assert_eq!(box_blur_u8(&src, 3, 2, 0).unwrap(), src);
}

#[test]
fn blur_constant_plane_is_identity() {
    let src = vec![77u8; 6 * 5];
    assert_eq!(box_blur_u8(&src, 6, 5, 2).unwrap(), src);
}

#[test]
fn blur_rejects_wrong_length() {
    assert!(box_blur_u8(&[0; 5], 2, 3, 1).is_err());
}

#[test]
fn corner_averages_only_in_bounds_samples() {
    // 5x5 plane with a single 255 in the corner. The corner's neighbourhood is 3x3 = 9
    // in-bounds samples, so it averages to round(255 / 9) = 28, not 255 / 25.
    let mut src = vec![0u8; 25];
    src[0] = 255;
    let out = box_blur_u8(&src, 5, 5, 2).unwrap();
    assert_eq!(out[0], 28);
    // Centre pixel sees all 25 samples.
    assert_eq!(out[12], 10);
}

#[test]
fn separable_sums_match_direct_mean() {
    let (w, h) = (7u32, 6u32);
    let src: Vec<u8> = (0..w * h).map(|i| ((i * 37) % 256) as u8).collect();
    let out = box_blur_u8(&src, w, h, 2).unwrap();
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let (mut sum, mut n) = (0u32, 0u32);
            for dy in -2..=2 {
                for dx in -2..=2 {
                    let (sx, sy) = (x + dx, y + dy);
                    if sx >= 0 && sy >= 0 && sx < w as i64 && sy < h as i64 {
                        sum += u32::from(src[(sy * w as i64 + sx) as usize]);
                        n += 1;
                    }
                }
            }
            let want = ((2 * sum + n) / (2 * n)) as u8;
            assert_eq!(out[(y * w as i64 + x) as usize], want);
        }
    }
}
