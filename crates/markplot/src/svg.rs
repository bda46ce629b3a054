use crate::scene::{Anchor, Color, Element, Font, Scene};
use quick_xml::escape::escape;
use std::fmt::{self, Write};
use std::path::Path;

pub fn generate_string(scene: &Scene) -> Result<String, String> {
    let mut generator = Generator::new();
    generator
        .generate(scene)
        .map_err(|e| format!("Unable to serialize scene: {}", e))?;
    Ok(generator.buffer)
}

pub fn render_from_string(svg_content: &str, path: &Path) -> Result<(), String> {
    std::fs::write(path, svg_content).map_err(|e| e.to_string())
}

struct Generator {
    buffer: String,
}

impl Generator {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn generate(&mut self, scene: &Scene) -> fmt::Result {
        self.start_svg(scene.width, scene.height)?;
        if let Some(color) = &scene.background {
            self.add_background(color)?;
        }

        for element in &scene.elements {
            match element {
                Element::Line {
                    from,
                    to,
                    stroke,
                    stroke_width,
                } => self.add_line(*from, *to, stroke, *stroke_width)?,
                Element::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                    stroke_width,
                } => self.add_rect((*x, *y), (*width, *height), fill, *stroke_width)?,
                Element::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                    stroke_width,
                } => self.add_circle(*center, *radius, fill.as_ref(), stroke, *stroke_width)?,
                Element::Polygon {
                    points,
                    fill,
                    stroke,
                    stroke_width,
                } => self.add_polygon(points, fill.as_ref(), stroke, *stroke_width)?,
                Element::Text {
                    pos,
                    text,
                    font,
                    anchor,
                    id,
                } => self.add_text(*pos, text, font, *anchor, id.as_deref())?,
            }
        }

        self.end_svg()
    }

    fn add_line(&mut self, from: (f64, f64), to: (f64, f64), color: &Color, stroke: f64) -> fmt::Result {
        let x1y1 = format!("x1=\"{}\" y1=\"{}\"", fmt_num(from.0), fmt_num(from.1));
        let x2y2 = format!("x2=\"{}\" y2=\"{}\"", fmt_num(to.0), fmt_num(to.1));
        let style = format!("stroke=\"{}\" stroke-width=\"{}\"", color, fmt_num(stroke));
        writeln!(self.buffer, "<line {} {} {} />", x1y1, x2y2, style)
    }

    fn add_rect(&mut self, pos: (f64, f64), dims: (f64, f64), color: &Color, stroke: f64) -> fmt::Result {
        let (x, y) = pos;
        let (w, h) = dims;

        let pos = format!("x=\"{}\" y=\"{}\"", fmt_num(x), fmt_num(y));
        let dim = format!("width=\"{}\" height=\"{}\"", fmt_num(w), fmt_num(h));
        let style = format!(
            "fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
            color,
            color,
            fmt_num(stroke)
        );
        writeln!(self.buffer, "<rect {} {} {} />", pos, dim, style)
    }

    fn add_circle(
        &mut self,
        center: (f64, f64),
        radius: f64,
        fill: Option<&Color>,
        stroke: &Color,
        stroke_width: f64,
    ) -> fmt::Result {
        let pos = format!(
            "cx=\"{}\" cy=\"{}\" r=\"{}\"",
            fmt_num(center.0),
            fmt_num(center.1),
            fmt_num(radius)
        );
        let style = paint(fill, stroke, stroke_width);
        writeln!(self.buffer, "<circle {} {} />", pos, style)
    }

    fn add_polygon(
        &mut self,
        points: &[(f64, f64)],
        fill: Option<&Color>,
        stroke: &Color,
        stroke_width: f64,
    ) -> fmt::Result {
        let points = points
            .iter()
            .map(|(x, y)| format!("{},{}", fmt_num(*x), fmt_num(*y)))
            .collect::<Vec<_>>()
            .join(" ");
        let style = paint(fill, stroke, stroke_width);
        writeln!(self.buffer, "<polygon points=\"{}\" {} />", points, style)
    }

    fn add_text(
        &mut self,
        pos: (f64, f64),
        text: &str,
        font: &Font,
        anchor: Anchor,
        id: Option<&str>,
    ) -> fmt::Result {
        let point = format!("x=\"{}\" y=\"{}\"", fmt_num(pos.0), fmt_num(pos.1));
        let anchor = match anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let style = format!(
            "font-family=\"{}\" font-size=\"{}\" text-anchor=\"{}\"",
            escape(font.family.as_str()),
            fmt_num(font.size),
            anchor
        );
        let id = id
            .map(|id| format!(" id=\"{}\"", escape(id)))
            .unwrap_or_default();
        writeln!(
            self.buffer,
            "<text{} {} {}>{}</text>",
            id,
            point,
            style,
            escape(text)
        )
    }

    fn start_svg(&mut self, width: f64, height: f64) -> fmt::Result {
        writeln!(self.buffer, r#"<?xml version="1.0"?>"#)?;
        let line = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#;
        write!(self.buffer, "{}", line)?;
        writeln!(
            self.buffer,
            "width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = fmt_num(width),
            h = fmt_num(height)
        )
    }

    fn end_svg(&mut self) -> fmt::Result {
        writeln!(self.buffer, "</svg>")
    }

    fn add_background(&mut self, color: &Color) -> fmt::Result {
        writeln!(
            self.buffer,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            color
        )
    }
}

fn paint(fill: Option<&Color>, stroke: &Color, stroke_width: f64) -> String {
    let fill = fill.map(|c| c.as_str()).unwrap_or("none");
    format!(
        "fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
        fill,
        stroke,
        fmt_num(stroke_width)
    )
}

/// Formats coordinates with at most three decimals and no trailing zeros.
fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.1234), "0.123");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(-0.0001), "0");
    }

    #[test]
    fn test_text_is_escaped() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.add(Element::Text {
            pos: (1.0, 1.0),
            text: "a<b & \"c\"".to_string(),
            font: Font {
                family: "Helvetica".to_string(),
                size: 8.0,
            },
            anchor: Anchor::Middle,
            id: None,
        });
        let svg = generate_string(&scene).unwrap();
        assert!(svg.contains(">a&lt;b &amp; &quot;c&quot;</text>"));
    }

    #[test]
    fn test_generate_string_elements() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.add(Element::Line {
            from: (0.0, 1.0),
            to: (10.0, 1.0),
            stroke: "#D3D3D3".to_string(),
            stroke_width: 1.0,
        });
        scene.add(Element::Rect {
            x: 2.0,
            y: 3.0,
            width: 4.5,
            height: 8.0,
            fill: "#42FF00".to_string(),
            stroke_width: 0.1,
        });
        scene.add(Element::Polygon {
            points: vec![(1.0, 0.0), (0.0, 1.0), (1.0, 2.0), (2.0, 1.0)],
            fill: None,
            stroke: "#FF00FF".to_string(),
            stroke_width: 2.0,
        });
        scene.add(Element::Text {
            pos: (5.0, 5.0),
            text: "seq_1 (r)".to_string(),
            font: Font {
                family: "Helvetica".to_string(),
                size: 8.0,
            },
            anchor: Anchor::Start,
            id: Some("seq_1".to_string()),
        });

        let svg = generate_string(&scene).unwrap();
        assert!(svg.contains(r#"width="100" height="50" viewBox="0 0 100 50""#));
        assert!(svg.contains(r##"<line x1="0" y1="1" x2="10" y2="1" stroke="#D3D3D3" stroke-width="1" />"##));
        assert!(svg.contains(r##"<rect x="2" y="3" width="4.5" height="8" fill="#42FF00" stroke="#42FF00" stroke-width="0.1" />"##));
        assert!(svg.contains(r#"points="1,0 0,1 1,2 2,1" fill="none""#));
        assert!(svg.contains(r#"<text id="seq_1" x="5" y="5""#));
        assert!(svg.contains(">seq_1 (r)</text>"));
    }

    #[test]
    fn test_no_background() {
        let mut scene = Scene::new(1.0, 1.0);
        scene.background = None;
        let svg = generate_string(&scene).unwrap();
        assert!(!svg.contains("100%"));
    }
}
