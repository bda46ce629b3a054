/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const DEFAULT_WIDTH: u16 = 556;

/// Rendered width of `text` in points. All label fonts are measured with
/// Helvetica metrics.
pub fn string_width(text: &str, font_size: f64) -> f64 {
    let units = text
        .chars()
        .map(|c| {
            let width = match c as u32 {
                code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
                _ => DEFAULT_WIDTH,
            };
            u32::from(width)
        })
        .sum::<u32>();
    units as f64 / 1000.0 * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("", 8.0), 0.0);
        assert!((string_width("A", 10.0) - 6.67).abs() < 1e-9);
        assert!((string_width("il", 10.0) - 4.44).abs() < 1e-9);
        assert!((string_width(" (r)", 1000.0) - (278.0 + 333.0 + 333.0 + 333.0)).abs() < 1e-9);
        assert!(string_width("WWW", 8.0) > string_width("iii", 8.0));
    }
}
