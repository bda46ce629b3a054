use super::{Layout, MatchScheme, MismatchScheme};
use crate::highlighter::{Annotation, AnnotationMap, MatchCode, MatchMap};
use markplot::{Element, Scene};

const MARK_STROKE_WIDTH: f64 = 0.1;

/// Consecutive columns sharing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<K> {
    pub start: usize,
    pub length: usize,
    pub key: K,
}

/// Merges `(column, key)` pairs, sorted by column, into runs of adjacent
/// columns with equal keys.
pub fn merge_runs<K: PartialEq>(entries: impl IntoIterator<Item = (usize, K)>) -> Vec<Run<K>> {
    let mut runs: Vec<Run<K>> = Vec::new();
    for (base, key) in entries {
        if let Some(run) = runs.last_mut() {
            if run.start + run.length == base && run.key == key {
                run.length += 1;
                continue;
            }
        }
        runs.push(Run {
            start: base,
            length: 1,
            key,
        });
    }
    runs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchClass {
    Single(usize),
    Unique,
    Multiple,
}

impl MatchClass {
    fn of(codes: &[MatchCode]) -> Option<Self> {
        match codes {
            [] => None,
            [MatchCode::Reference(index)] => Some(MatchClass::Single(*index)),
            codes if codes.contains(&MatchCode::Unique) => Some(MatchClass::Unique),
            _ => Some(MatchClass::Multiple),
        }
    }
}

pub(crate) fn mismatch_runs(map: &AnnotationMap, scheme: &MismatchScheme) -> Vec<Run<Annotation>> {
    merge_runs(map.iter().filter_map(|(base, codes)| {
        codes
            .iter()
            .find(|code| scheme.color(code).is_some())
            .map(|code| (*base, *code))
    }))
}

pub(crate) fn match_runs(map: &MatchMap) -> Vec<Run<MatchClass>> {
    merge_runs(
        map.iter()
            .filter_map(|(base, codes)| MatchClass::of(codes).map(|class| (*base, class))),
    )
}

pub(crate) fn draw_mismatch_marks(
    scene: &mut Scene,
    layout: &Layout,
    row: usize,
    map: &AnnotationMap,
    scheme: &MismatchScheme,
) {
    for run in mismatch_runs(map, scheme) {
        if let Some(color) = scheme.color(&run.key) {
            scene.add(mark(layout, row, &run, color));
        }
    }
}

pub(crate) fn draw_match_marks(scene: &mut Scene, layout: &Layout, row: usize, map: &MatchMap, scheme: &MatchScheme) {
    for run in match_runs(map) {
        let color = match run.key {
            MatchClass::Single(index) => Some(scheme.reference_color(index)),
            MatchClass::Unique => scheme.unique.as_deref(),
            MatchClass::Multiple => scheme.multiple.as_deref(),
        };
        if let Some(color) = color {
            scene.add(mark(layout, row, &run, color));
        }
    }
}

fn mark<K>(layout: &Layout, row: usize, run: &Run<K>, color: &str) -> Element {
    let (x, y, width, height) = layout.mark_bounds(row, run.start, run.length);
    Element::Rect {
        x,
        y,
        width,
        height,
        fill: color.to_string(),
        stroke_width: MARK_STROKE_WIDTH,
    }
}
