//! Highlighter and match plots: one baseline per sequence across a fixed
//! width, colored marks for annotated columns, signature symbols, a ruler
//! and sequence labels.

mod layout;
mod marks;
mod metrics;
mod newick;
mod order;
mod ruler;
mod scheme;
mod symbols;

pub use layout::{Layout, PlotConfig};
pub use marks::{merge_runs, Run};
pub use metrics::string_width;
pub use newick::newick_leaf_names;
pub use order::RowOrder;
pub use ruler::{ruler_ticks, significant_digits};
pub use scheme::{MatchScheme, MismatchScheme};

use crate::highlighter::{
    Alignment, CompareError, Comparator, MatchReport, MismatchOptions, MismatchReport, SeqType,
};
use markplot::{Anchor, Element, Scene};

const BASELINE_COLOR: &str = "#D3D3D3";
const MISMATCH_REFERENCE_TAG: &str = " (r)";
const MATCH_REFERENCE_TAG: &str = " (r10)";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid references: {0}")]
    InvalidReferences(String),
    #[error("Invalid color scheme: {0}")]
    InvalidScheme(String),
    #[error("Invalid tree: {0}")]
    InvalidTree(String),
    #[error(transparent)]
    Compare(CompareError),
    #[error("Unable to write plot: {0}")]
    Output(String),
}

impl From<CompareError> for RenderError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::InvalidReferences(message) => RenderError::InvalidReferences(message),
            other => RenderError::Compare(other),
        }
    }
}

impl From<RenderError> for String {
    fn from(err: RenderError) -> Self {
        err.to_string()
    }
}

/// Per-drawing choices.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOptions {
    pub title: Option<String>,
    pub order: RowOrder,
    /// Width of a single-column mark in columns.
    pub mark_width: f64,
    pub scheme: String,
    pub labels: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            title: None,
            order: RowOrder::Similar,
            mark_width: 1.0,
            scheme: "LANL".to_string(),
            labels: true,
        }
    }
}

pub struct HighlighterPlot<'a> {
    alignment: &'a Alignment,
    config: PlotConfig,
    comparator: Comparator,
}

impl<'a> HighlighterPlot<'a> {
    /// The sequence type is guessed from the residues when not given.
    pub fn new(alignment: &'a Alignment, seq_type: Option<SeqType>, config: PlotConfig) -> Self {
        let seq_type = seq_type.unwrap_or_else(|| SeqType::guess(alignment));
        log::debug!("Plotting {} alignment", seq_type);
        Self {
            alignment,
            config,
            comparator: Comparator::new(seq_type),
        }
    }

    pub fn seq_type(&self) -> SeqType {
        self.comparator.seq_type()
    }

    pub fn draw_mismatches(
        &mut self,
        reference: &str,
        options: &MismatchOptions,
        draw: &DrawOptions,
    ) -> Result<(Scene, MismatchReport), RenderError> {
        self.check_columns()?;
        let report = self
            .comparator
            .list_mismatches(self.alignment, reference, options)?;
        let scheme = MismatchScheme::for_type(self.seq_type(), &draw.scheme);
        let rows = draw.order.rows(self.alignment, &report.maps);
        let (mut scene, layout) = self.setup(draw, MISMATCH_REFERENCE_TAG);

        for (plot_row, row) in rows.iter().enumerate() {
            let label = (self.config.mark_reference && *row == report.reference)
                .then(|| MISMATCH_REFERENCE_TAG.to_string());
            self.draw_row_frame(&mut scene, &layout, draw, plot_row, *row, label, BASELINE_COLOR);
        }

        let reference_map = &report.maps[report.reference];
        let sequon_losses = self.seq_type() == SeqType::AminoAcid && options.glycosylation;
        for (plot_row, row) in rows.iter().enumerate() {
            let map = &report.maps[*row];
            marks::draw_mismatch_marks(&mut scene, &layout, plot_row, map, &scheme);
            symbols::draw_mismatch_symbols(
                &mut scene,
                &layout,
                plot_row,
                map,
                reference_map,
                *row == report.reference,
            );
            if sequon_losses {
                symbols::draw_sequon_losses(&mut scene, &layout, plot_row, map, reference_map);
            }
        }
        Ok((scene, report))
    }

    pub fn draw_matches<S: AsRef<str>>(
        &mut self,
        references: &[S],
        draw: &DrawOptions,
    ) -> Result<(Scene, MatchReport), RenderError> {
        let scheme = MatchScheme::named(&draw.scheme)?;
        self.draw_matches_with_scheme(references, draw, &scheme)
    }

    pub fn draw_matches_with_scheme<S: AsRef<str>>(
        &mut self,
        references: &[S],
        draw: &DrawOptions,
        scheme: &MatchScheme,
    ) -> Result<(Scene, MatchReport), RenderError> {
        self.check_columns()?;
        let report = self.comparator.list_matches(self.alignment, references)?;
        let rows = draw.order.rows(self.alignment, &report.maps);
        let (mut scene, layout) = self.setup(draw, MATCH_REFERENCE_TAG);

        for (plot_row, row) in rows.iter().enumerate() {
            let rank = report.reference_rank(*row);
            let label = rank
                .filter(|_| self.config.mark_reference)
                .map(|rank| format!(" (r{})", rank));
            let baseline = match rank {
                Some(rank) => scheme.reference_color(rank - 1),
                None => BASELINE_COLOR,
            };
            self.draw_row_frame(&mut scene, &layout, draw, plot_row, *row, label, baseline);
        }
        for (plot_row, row) in rows.iter().enumerate() {
            marks::draw_match_marks(&mut scene, &layout, plot_row, &report.maps[*row], scheme);
        }
        Ok((scene, report))
    }

    fn check_columns(&self) -> Result<(), RenderError> {
        if self.alignment.width() == 0 {
            return Err(RenderError::InvalidReferences(
                "alignment has no columns".to_string(),
            ));
        }
        Ok(())
    }

    fn setup(&self, draw: &DrawOptions, reference_tag: &str) -> (Scene, Layout) {
        let label_width = if draw.labels {
            self.max_label_width(reference_tag)
        } else {
            0.0
        };
        let layout = Layout::new(
            &self.config,
            self.alignment.len(),
            self.alignment.width(),
            draw.title.is_some(),
            label_width,
            draw.mark_width,
        );
        let mut scene = Scene::new(layout.width, layout.height);

        if let Some(title) = &draw.title {
            scene.add(Element::Text {
                pos: layout.title_position(),
                text: title.clone(),
                font: layout.title_font(),
                anchor: Anchor::Middle,
                id: None,
            });
        }
        if self.config.ruler {
            ruler::draw_ruler(&mut scene, &layout);
        }
        (scene, layout)
    }

    fn max_label_width(&self, reference_tag: &str) -> f64 {
        self.alignment
            .records()
            .iter()
            .map(|record| {
                string_width(
                    &format!("{} {}", record.id, reference_tag),
                    self.config.name_font_size,
                )
            })
            .fold(0.0, f64::max)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_row_frame(
        &self,
        scene: &mut Scene,
        layout: &Layout,
        draw: &DrawOptions,
        plot_row: usize,
        row: usize,
        reference_label: Option<String>,
        baseline: &str,
    ) {
        let id = &self.alignment.records()[row].id;
        if draw.labels {
            let mut text = id.clone();
            if let Some(tag) = reference_label {
                text.push_str(&tag);
            }
            scene.add(Element::Text {
                pos: layout.label_position(plot_row),
                text,
                font: layout.name_font(),
                anchor: Anchor::Start,
                id: Some(id.clone()),
            });
        }
        let y = layout.row_center(plot_row);
        scene.add(Element::Line {
            from: (layout.plot_left(), y),
            to: (layout.plot_right(), y),
            stroke: baseline.to_string(),
            stroke_width: 1.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlighter::SequenceRecord;

    fn alignment(rows: &[(&str, &str)]) -> Alignment {
        Alignment::new(
            rows.iter()
                .map(|(id, residues)| SequenceRecord::new(*id, *residues))
                .collect(),
        )
        .unwrap()
    }

    fn count(scene: &Scene, predicate: impl Fn(&Element) -> bool) -> usize {
        scene.elements.iter().filter(|e| predicate(e)).count()
    }

    fn texts(scene: &Scene) -> Vec<String> {
        scene
            .elements
            .iter()
            .filter_map(|element| match element {
                Element::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_draw_mismatches() {
        let aln = alignment(&[("ref", "GAGCTTTT"), ("q1", "AAGCTTTT"), ("q2", "GAGCTT--")]);
        let mut plot = HighlighterPlot::new(&aln, None, PlotConfig::default());
        assert_eq!(plot.seq_type(), SeqType::Nucleotide);
        let options = MismatchOptions {
            apobec: true,
            g_to_a: true,
            ..Default::default()
        };
        let draw = DrawOptions {
            title: Some("env".to_string()),
            ..Default::default()
        };
        let (scene, report) = plot.draw_mismatches("ref", &options, &draw).unwrap();
        assert_eq!(report.maps[1].len(), 1);
        assert_eq!(report.maps[2].len(), 2);

        // one mark for q1, one merged gap mark for q2
        assert_eq!(count(&scene, |e| matches!(e, Element::Rect { .. })), 2);
        assert_eq!(count(&scene, |e| matches!(e, Element::Circle { .. })), 1);
        let texts = texts(&scene);
        assert!(texts.contains(&"env".to_string()));
        assert!(texts.contains(&"ref (r)".to_string()));
        // similar order: reference, q1, q2
        let labels = texts
            .iter()
            .filter(|t| t.starts_with("ref") || t.starts_with('q'))
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["ref (r)", "q1", "q2"]);
        assert!(scene.width > 18.0 + 288.0 + 18.0);
    }

    #[test]
    fn test_draw_matches_colors_reference_baselines() {
        let aln = alignment(&[("r1", "ACGT"), ("r2", "ACCA"), ("q", "TCGA")]);
        let mut plot = HighlighterPlot::new(&aln, Some(SeqType::Nucleotide), PlotConfig::default());
        let draw = DrawOptions {
            scheme: "ML".to_string(),
            order: RowOrder::Input,
            ..Default::default()
        };
        let (scene, report) = plot.draw_matches(&["r1", "r2"], &draw).unwrap();
        assert_eq!(report.references, vec![0, 1]);
        let baselines = scene
            .elements
            .iter()
            .filter_map(|element| match element {
                Element::Line { stroke, stroke_width, .. } if *stroke_width == 1.0 && stroke != "#000000" => {
                    Some(stroke.clone())
                }
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(baselines, vec!["#FF0000", "#537EFF", BASELINE_COLOR]);
        // q: unique, R1, R2 as three separate marks
        assert_eq!(count(&scene, |e| matches!(e, Element::Rect { .. })), 3);
        assert!(texts(&scene).contains(&"r2 (r2)".to_string()));
    }

    #[test]
    fn test_invalid_inputs() {
        let aln = alignment(&[("r1", "ACGT"), ("q", "TCGA")]);
        let mut plot = HighlighterPlot::new(&aln, None, PlotConfig::default());
        let draw = DrawOptions::default();
        let none: [&str; 0] = [];
        assert!(matches!(
            plot.draw_matches(&none, &draw),
            Err(RenderError::InvalidReferences(_))
        ));
        assert!(matches!(
            plot.draw_mismatches("nope", &MismatchOptions::default(), &draw),
            Err(RenderError::InvalidReferences(_))
        ));
        let bogus = DrawOptions {
            scheme: "bogus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            plot.draw_matches(&["r1"], &bogus),
            Err(RenderError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_labels_off_shrinks_canvas() {
        let aln = alignment(&[("a_long_sequence_name", "ACGT"), ("b", "ACGA")]);
        let mut plot = HighlighterPlot::new(&aln, None, PlotConfig::default());
        let with = plot
            .draw_mismatches("0", &MismatchOptions::default(), &DrawOptions::default())
            .unwrap()
            .0;
        let without = plot
            .draw_mismatches(
                "0",
                &MismatchOptions::default(),
                &DrawOptions {
                    labels: false,
                    ..Default::default()
                },
            )
            .unwrap()
            .0;
        assert!(with.width > without.width);
        assert!((without.width - (18.0 + 288.0 + 18.0)).abs() < 1e-9);
        assert!(texts(&without).iter().all(|t| t.parse::<usize>().is_ok()));
    }
}
