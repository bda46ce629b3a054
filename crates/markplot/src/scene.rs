pub type Color = String;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Color,
        stroke_width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Color,
        stroke_width: f64,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        fill: Option<Color>,
        stroke: Color,
        stroke_width: f64,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: Option<Color>,
        stroke: Color,
        stroke_width: f64,
    },
    Text {
        pos: (f64, f64),
        text: String,
        font: Font,
        anchor: Anchor,
        id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Option<Color>,
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: Some("white".to_string()),
            elements: Vec::new(),
        }
    }

    pub fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
