use super::Layout;
use crate::highlighter::{Annotation, AnnotationMap};
use markplot::{Element, Scene};

const SIGNATURE_COLOR: &str = "#FF00FF";
const STOP_COLOR: &str = "#0000FF";

/// Draws the overlay symbol of every annotated column of one row: APOBEC
/// sites as filled circles, G->A sites as open diamonds, sequons as circles
/// on the reference and filled diamonds where the reference lacks them, and
/// stop codons as blue diamonds. Only the first applicable symbol is drawn.
pub(crate) fn draw_mismatch_symbols(
    scene: &mut Scene,
    layout: &Layout,
    row: usize,
    map: &AnnotationMap,
    reference_map: &AnnotationMap,
    is_reference: bool,
) {
    let y = layout.row_center(row);
    for (base, codes) in map {
        let x = layout.base_center(*base);
        if codes.contains(&Annotation::Apobec) {
            circle(scene, layout, (x, y));
        } else if codes.contains(&Annotation::GToA) {
            diamond(scene, layout, (x, y), SIGNATURE_COLOR, false);
        } else if codes.contains(&Annotation::Glycosylation) {
            if is_reference {
                circle(scene, layout, (x, y));
            } else if !has_sequon(reference_map, *base) {
                diamond(scene, layout, (x, y), SIGNATURE_COLOR, true);
            }
        } else if codes.contains(&Annotation::StopCodon) {
            diamond(scene, layout, (x, y), STOP_COLOR, false);
        }
    }
}

/// Marks reference sequons missing from the row.
pub(crate) fn draw_sequon_losses(
    scene: &mut Scene,
    layout: &Layout,
    row: usize,
    map: &AnnotationMap,
    reference_map: &AnnotationMap,
) {
    let y = layout.row_center(row);
    for base in reference_map.keys() {
        if has_sequon(reference_map, *base) && !has_sequon(map, *base) {
            diamond(scene, layout, (layout.base_center(*base), y), STOP_COLOR, false);
        }
    }
}

fn has_sequon(map: &AnnotationMap, base: usize) -> bool {
    map.get(&base)
        .is_some_and(|codes| codes.contains(&Annotation::Glycosylation))
}

fn circle(scene: &mut Scene, layout: &Layout, center: (f64, f64)) {
    scene.add(Element::Circle {
        center,
        radius: layout.symbol_radius(),
        fill: Some(SIGNATURE_COLOR.to_string()),
        stroke: SIGNATURE_COLOR.to_string(),
        stroke_width: 0.1,
    });
}

fn diamond(scene: &mut Scene, layout: &Layout, (x, y): (f64, f64), color: &str, filled: bool) {
    let r = layout.symbol_radius();
    scene.add(Element::Polygon {
        points: vec![(x, y - r), (x - r, y), (x, y + r), (x + r, y)],
        fill: filled.then(|| color.to_string()),
        stroke: color.to_string(),
        stroke_width: 2.0,
    });
}
