use markplot::Font;

const INCH: f64 = 72.0;

/// Fonts, margins and ruler settings shared by every plot drawn from one
/// alignment. Lengths are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub plot_width: f64,
    pub name_font: String,
    pub name_font_size: f64,
    /// Vertical space between rows; a fifth of the row height when unset.
    pub seq_gap: Option<f64>,
    pub left_margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    pub right_margin: f64,
    pub label_gap: f64,
    pub mark_reference: bool,
    pub title_font: String,
    pub title_font_size: f64,
    pub ruler: bool,
    pub ruler_font: String,
    pub ruler_font_size: f64,
    pub ruler_major_ticks: usize,
    pub ruler_minor_ticks: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            plot_width: 4.0 * INCH,
            name_font: "Helvetica".to_string(),
            name_font_size: 8.0,
            seq_gap: None,
            left_margin: 0.25 * INCH,
            top_margin: 0.25 * INCH,
            bottom_margin: 0.0,
            right_margin: 0.0,
            label_gap: 0.25 * INCH,
            mark_reference: true,
            title_font: "Helvetica".to_string(),
            title_font_size: 12.0,
            ruler: true,
            ruler_font: "Helvetica".to_string(),
            ruler_font_size: 6.0,
            ruler_major_ticks: 10,
            ruler_minor_ticks: 3,
        }
    }
}

/// Page geometry of one drawing. Rows are numbered from the top; all
/// returned coordinates have their origin at the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub config: PlotConfig,
    pub rows: usize,
    pub columns: usize,
    pub seq_height: f64,
    pub seq_gap: f64,
    pub title_height: f64,
    pub ruler_height: f64,
    pub label_width: f64,
    pub mark_width: f64,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn new(
        config: &PlotConfig,
        rows: usize,
        columns: usize,
        titled: bool,
        label_width: f64,
        mark_width: f64,
    ) -> Self {
        let seq_height = config.name_font_size;
        let seq_gap = config.seq_gap.unwrap_or(seq_height / 5.0);
        let title_height = if titled {
            config.title_font_size * 2.0
        } else {
            0.0
        };
        let ruler_height = if config.ruler {
            config.ruler_font_size * 3.0
        } else {
            0.0
        };
        let width = config.left_margin
            + config.plot_width
            + config.label_gap
            + label_width
            + config.right_margin;
        let height = rows as f64 * (seq_height + seq_gap)
            + config.top_margin
            + config.bottom_margin
            + title_height
            + ruler_height;

        Self {
            config: config.clone(),
            rows,
            columns,
            seq_height,
            seq_gap,
            title_height,
            ruler_height,
            label_width,
            mark_width,
            width,
            height,
        }
    }

    fn pitch(&self) -> f64 {
        self.seq_height + self.seq_gap
    }

    /// Bottom of the row area, measured up from the page bottom.
    fn floor(&self) -> f64 {
        self.config.bottom_margin + self.ruler_height
    }

    /// Converts a height above the page bottom into a top-down coordinate.
    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    /// Left edge of a (possibly fractional) column.
    pub fn base_left(&self, base: f64) -> f64 {
        if self.columns == 0 {
            return self.config.left_margin;
        }
        self.config.left_margin + base / self.columns as f64 * self.config.plot_width
    }

    pub fn base_center(&self, base: usize) -> f64 {
        let left = self.base_left(base as f64);
        let right = self.base_left(base as f64 + 1.0);
        left + (right - left) / 2.0
    }

    pub fn plot_left(&self) -> f64 {
        self.config.left_margin
    }

    pub fn plot_right(&self) -> f64 {
        self.config.left_margin + self.config.plot_width
    }

    /// Vertical center of a row, where its baseline and symbols sit.
    pub fn row_center(&self, row: usize) -> f64 {
        let rows = self.rows as f64;
        self.flip((rows - (row as f64 + 0.5)) * self.pitch() + self.seq_gap + self.floor())
    }

    /// `(x, y, width, height)` of a mark covering `length` columns.
    pub fn mark_bounds(&self, row: usize, base: usize, length: usize) -> (f64, f64, f64, f64) {
        let rows = self.rows as f64;
        let x1 = self.base_left(base as f64);
        let x2 = self.base_left(base as f64 + (length as f64 - 1.0) + self.mark_width);
        let top = self.flip((rows - row as f64) * self.pitch() + self.seq_gap / 2.0 + self.floor());
        let bottom =
            self.flip((rows - (row as f64 + 1.0)) * self.pitch() + self.seq_gap + self.floor());
        (x1, top, x2 - x1, bottom - top)
    }

    /// Baseline position of a row label.
    pub fn label_position(&self, row: usize) -> (f64, f64) {
        let rows = self.rows as f64;
        let x = self.plot_right() + self.config.label_gap;
        let y = self.flip((rows - (row as f64 + 0.75)) * self.pitch() + self.seq_gap + self.floor());
        (x, y)
    }

    pub fn title_position(&self) -> (f64, f64) {
        (
            self.config.left_margin + self.config.plot_width / 2.0,
            self.config.top_margin + self.config.title_font_size / 2.0,
        )
    }

    /// Heights above the page bottom are expressed in ruler font units.
    pub fn ruler_y(&self, font_units: f64) -> f64 {
        self.flip(self.config.bottom_margin + self.config.ruler_font_size * font_units)
    }

    /// Radius of circles and half diagonal of diamonds.
    pub fn symbol_radius(&self) -> f64 {
        self.seq_height / 6.0
    }

    pub fn name_font(&self) -> Font {
        Font {
            family: self.config.name_font.clone(),
            size: self.config.name_font_size,
        }
    }

    pub fn title_font(&self) -> Font {
        Font {
            family: self.config.title_font.clone(),
            size: self.config.title_font_size,
        }
    }

    pub fn ruler_font(&self) -> Font {
        Font {
            family: self.config.ruler_font.clone(),
            size: self.config.ruler_font_size,
        }
    }
}
