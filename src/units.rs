//! Human-readable sizes for download labels.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count: `"0 Bytes"`, `"1.5 KB"`, `"2 MB"`.
///
/// Divides by the largest power of 1024 not exceeding the value (up to GB) and rounds to two
/// decimals, dropping trailing zeros.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0usize;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", trim_decimal(rounded), UNITS[unit])
}

fn trim_decimal(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Percentage saved going from `before` to `after` bytes, rounded to one decimal.
///
/// Negative when the output grew; zero when `before` is zero.
pub fn compression_ratio(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    let saved = (before as f64 - after as f64) / before as f64 * 100.0;
    (saved * 10.0).round() / 10.0
}

#[cfg(test)]
#[path = "../tests/unit/units.rs"]
mod tests;
