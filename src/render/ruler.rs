use super::Layout;
use markplot::{Anchor, Element, Scene};

const RULER_COLOR: &str = "#000000";

/// Keeps the leading `digits` digits of `value` and zeroes the rest, so
/// 1234 becomes 1200.
pub fn significant_digits(value: usize, digits: usize) -> usize {
    let text = value.to_string();
    if text.len() <= digits {
        return value;
    }
    let rounded = format!("{}{}", &text[..digits], "0".repeat(text.len() - digits));
    rounded.parse().unwrap_or(value)
}

/// 0-based columns that get a labeled tick. Short alignments label every
/// column; longer ones get `major_ticks` evenly spaced ticks over a span
/// rounded to two significant digits.
pub fn ruler_ticks(columns: usize, major_ticks: usize) -> Vec<usize> {
    if columns <= 20 {
        return (0..columns).collect();
    }
    let last = significant_digits(columns, 2) - 1;
    let mut ticks = vec![0];
    if major_ticks > 0 {
        let distance = last as f64 / major_ticks as f64;
        ticks.extend((1..=major_ticks).map(|tick| (tick as f64 * distance) as usize));
    }
    ticks.push(last);
    ticks.dedup();
    ticks
}

pub(crate) fn draw_ruler(scene: &mut Scene, layout: &Layout) {
    let config = &layout.config;
    let ticks = ruler_ticks(layout.columns, config.ruler_major_ticks);
    let line_y = layout.ruler_y(3.0);

    let mut previous: Option<f64> = None;
    for base in ticks {
        let x = layout.base_center(base);
        scene.add(Element::Text {
            pos: (x, layout.ruler_y(1.0)),
            text: (base + 1).to_string(),
            font: layout.ruler_font(),
            anchor: Anchor::Middle,
            id: None,
        });
        scene.add(tick(x, line_y, layout.ruler_y(2.0)));

        if let Some(left) = previous {
            let spacing = (x - left) / (config.ruler_minor_ticks + 1) as f64;
            for minor in 1..=config.ruler_minor_ticks {
                scene.add(tick(left + minor as f64 * spacing, line_y, layout.ruler_y(2.5)));
            }
        }
        previous = Some(x);
    }

    scene.add(Element::Line {
        from: (layout.plot_left(), line_y),
        to: (layout.plot_right(), line_y),
        stroke: RULER_COLOR.to_string(),
        stroke_width: 2.0,
    });
}

fn tick(x: f64, top: f64, bottom: f64) -> Element {
    Element::Line {
        from: (x, top),
        to: (x, bottom),
        stroke: RULER_COLOR.to_string(),
        stroke_width: 1.0,
    }
}
