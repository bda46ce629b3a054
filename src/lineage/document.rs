use super::TreeError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::path::Path;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const LABEL_CLASS_PREFIX: &str = "box";

/// A colored leaf label and the event indexes of its `<text>` element and of
/// the companion outline whose `id` is the sequence name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafLabel {
    pub name: String,
    pub color: String,
    pub label: usize,
    pub geometry: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextElement {
    index: usize,
    class: Option<String>,
    content: String,
}

/// An SVG document held as its flat event stream, so that serializing it
/// again reproduces everything that was not edited.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    events: Vec<Event<'static>>,
}

impl SvgDocument {
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let content = std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;
        Self::parse(&content)
            .map_err(|e| TreeError::DocumentParse(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, TreeError> {
        let mut reader = Reader::from_str(content);
        let mut events = Vec::new();
        let mut depth = 0usize;
        let mut root_seen = false;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(TreeError::DocumentParse(format!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    )))
                }
            };
            match &event {
                Event::Eof => break,
                Event::Start(start) => {
                    if !root_seen {
                        check_root(start)?;
                        root_seen = true;
                    }
                    depth += 1;
                }
                Event::Empty(start) => {
                    if !root_seen {
                        check_root(start)?;
                        root_seen = true;
                    }
                }
                Event::End(_) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        TreeError::DocumentParse("unexpected closing tag".to_string())
                    })?;
                }
                _ => {}
            }
            events.push(event.into_owned());
        }

        if !root_seen {
            return Err(TreeError::DocumentParse("no root element".to_string()));
        }
        if depth != 0 {
            return Err(TreeError::DocumentParse(format!(
                "{} element(s) left unclosed",
                depth
            )));
        }
        Ok(Self { events })
    }

    /// All `<text>` elements carrying a `box{color}` class.
    pub fn leaf_labels(&self) -> Result<Vec<LeafLabel>, TreeError> {
        let geometry = self.geometry_ids()?;
        let mut labels = Vec::new();
        for text in self.text_elements()? {
            let color = match text.class.as_deref().and_then(label_color) {
                Some(color) => color,
                None => continue,
            };
            labels.push(LeafLabel {
                geometry: geometry.get(&text.content).copied(),
                name: text.content,
                color: color.to_string(),
                label: text.index,
            });
        }
        Ok(labels)
    }

    /// Contents of `<text>` elements without a `box{color}` class.
    pub fn unclassified_texts(&self) -> Result<Vec<String>, TreeError> {
        Ok(self
            .text_elements()?
            .into_iter()
            .filter(|text| text.class.as_deref().and_then(label_color).is_none())
            .map(|text| text.content)
            .collect())
    }

    pub fn attribute(&self, index: usize, key: &str) -> Result<Option<String>, TreeError> {
        match self.start_at(index) {
            Some((start, _)) => attribute(start, key),
            None => Ok(None),
        }
    }

    pub fn set_attribute(&mut self, index: usize, key: &str, value: &str) -> Result<(), TreeError> {
        let (start, empty) = self.start_at(index).ok_or_else(|| {
            TreeError::DocumentParse(format!("event {} is not an element", index))
        })?;
        let updated = with_attribute(start, key, value)?;
        self.events[index] = if empty {
            Event::Empty(updated)
        } else {
            Event::Start(updated)
        };
        Ok(())
    }

    /// Replaces the `box*` token of the element's class list.
    pub fn set_label_color(&mut self, index: usize, color: &str) -> Result<(), TreeError> {
        let class = self.attribute(index, "class")?.unwrap_or_default();
        let label_class = format!("{}{}", LABEL_CLASS_PREFIX, color);
        let mut replaced = false;
        let mut tokens = Vec::new();
        for token in class.split_whitespace() {
            if !replaced && token.starts_with(LABEL_CLASS_PREFIX) {
                tokens.push(label_class.as_str());
                replaced = true;
            } else {
                tokens.push(token);
            }
        }
        if !replaced {
            tokens.insert(0, label_class.as_str());
        }
        let class = tokens.join(" ");
        self.set_attribute(index, "class", &class)
    }

    /// Stroke color from the inline style, falling back to the `stroke`
    /// presentation attribute.
    pub fn stroke(&self, index: usize) -> Result<Option<String>, TreeError> {
        if let Some(style) = self.attribute(index, "style")? {
            if let Some(stroke) = style_property(&style, "stroke") {
                return Ok(Some(stroke));
            }
        }
        self.attribute(index, "stroke")
    }

    pub fn set_stroke(&mut self, index: usize, color: &str) -> Result<(), TreeError> {
        match self.attribute(index, "style")? {
            Some(style) => {
                let style = style_with_property(&style, "stroke", color);
                self.set_attribute(index, "style", &style)
            }
            None if self.attribute(index, "stroke")?.is_some() => {
                self.set_attribute(index, "stroke", color)
            }
            None => self.set_attribute(index, "style", &format!("stroke: {};", color)),
        }
    }

    pub fn to_xml_string(&self) -> Result<String, TreeError> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(|e| TreeError::DocumentParse(e.to_string()))?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| TreeError::DocumentParse(e.to_string()))
    }

    pub fn write(&self, path: &Path) -> Result<(), TreeError> {
        let content = self.to_xml_string()?;
        std::fs::write(path, content).map_err(|e| TreeError::io(path, e))
    }

    fn start_at(&self, index: usize) -> Option<(&BytesStart<'static>, bool)> {
        match self.events.get(index) {
            Some(Event::Start(start)) => Some((start, false)),
            Some(Event::Empty(start)) => Some((start, true)),
            _ => None,
        }
    }

    fn text_elements(&self) -> Result<Vec<TextElement>, TreeError> {
        let mut texts = Vec::new();
        for (index, event) in self.events.iter().enumerate() {
            let start = match event {
                Event::Start(start) if start.local_name().as_ref() == b"text" => start,
                _ => continue,
            };
            let mut content = String::new();
            for inner in &self.events[index + 1..] {
                match inner {
                    Event::Text(text) => {
                        let text = text
                            .unescape()
                            .map_err(|e| TreeError::DocumentParse(e.to_string()))?;
                        content.push_str(&text);
                    }
                    Event::CData(data) => content.push_str(&String::from_utf8_lossy(data)),
                    _ => break,
                }
            }
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            texts.push(TextElement {
                index,
                class: attribute(start, "class")?,
                content: content.to_string(),
            });
        }
        Ok(texts)
    }

    fn geometry_ids(&self) -> Result<HashMap<String, usize>, TreeError> {
        let mut ids = HashMap::new();
        for (index, event) in self.events.iter().enumerate() {
            let start = match event {
                Event::Start(start) | Event::Empty(start) => start,
                _ => continue,
            };
            if start.local_name().as_ref() == b"text" {
                continue;
            }
            if let Some(id) = attribute(start, "id")? {
                ids.entry(id).or_insert(index);
            }
        }
        Ok(ids)
    }
}

fn label_color(class: &str) -> Option<&str> {
    class
        .split_whitespace()
        .find_map(|token| token.strip_prefix(LABEL_CLASS_PREFIX))
        .filter(|color| !color.is_empty())
}

fn check_root(start: &BytesStart) -> Result<(), TreeError> {
    if start.local_name().as_ref() != b"svg" {
        return Err(TreeError::DocumentParse(format!(
            "root element is <{}>, expected <svg>",
            String::from_utf8_lossy(start.name().as_ref())
        )));
    }
    for attr in start.attributes() {
        let attr = attr.map_err(|e| TreeError::DocumentParse(e.to_string()))?;
        if attr.key.as_ref().starts_with(b"xmlns") && attr.value.as_ref() == SVG_NAMESPACE.as_bytes() {
            return Ok(());
        }
    }
    Err(TreeError::DocumentParse(format!(
        "missing namespace {}",
        SVG_NAMESPACE
    )))
}

fn attribute(start: &BytesStart, key: &str) -> Result<Option<String>, TreeError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| TreeError::DocumentParse(e.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| TreeError::DocumentParse(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn with_attribute(start: &BytesStart, key: &str, value: &str) -> Result<BytesStart<'static>, TreeError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut updated = BytesStart::new(name);
    let mut replaced = false;
    for attr in start.attributes() {
        let attr = attr.map_err(|e| TreeError::DocumentParse(e.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            updated.push_attribute((key, value));
            replaced = true;
        } else {
            updated.push_attribute(attr);
        }
    }
    if !replaced {
        updated.push_attribute((key, value));
    }
    Ok(updated)
}

fn style_property(style: &str, key: &str) -> Option<String> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .find(|(name, _)| name.trim() == key)
        .map(|(_, value)| value.trim().to_string())
}

fn style_with_property(style: &str, key: &str, value: &str) -> String {
    let mut declarations = Vec::new();
    let mut replaced = false;
    for declaration in style.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        match declaration.split_once(':') {
            Some((name, _)) if name.trim() == key => {
                declarations.push(format!("{}: {}", key, value));
                replaced = true;
            }
            _ => declarations.push(declaration.to_string()),
        }
    }
    if !replaced {
        declarations.push(format!("{}: {}", key, value));
    }
    let mut style = declarations.join("; ");
    style.push(';');
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
  <g>
    <text class="boxred" x="10" y="10">V1_env_200_001_5</text>
    <path id="V1_env_200_001_5" d="M0,0L1,1" style="stroke-width: 1; stroke: rgb(255, 0, 0); fill: none;"/>
    <text class="boxgreen mute" x="10" y="20">V1_env_200_002_3</text>
    <text x="10" y="30">V1_env_200_003_1</text>
    <text class="ruler">0.01</text>
  </g>
</svg>
"#;

    #[test]
    fn test_leaf_labels() {
        let document = SvgDocument::parse(TREE).unwrap();
        let labels = document.leaf_labels().unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].name, "V1_env_200_001_5");
        assert_eq!(labels[0].color, "red");
        assert!(labels[0].geometry.is_some());
        assert_eq!(labels[1].color, "green");
        assert_eq!(labels[1].geometry, None);
    }

    #[test]
    fn test_unclassified_texts() {
        let document = SvgDocument::parse(TREE).unwrap();
        assert_eq!(
            document.unclassified_texts().unwrap(),
            vec!["V1_env_200_003_1".to_string(), "0.01".to_string()]
        );
    }

    #[test]
    fn test_set_label_color_keeps_other_classes() {
        let mut document = SvgDocument::parse(TREE).unwrap();
        let labels = document.leaf_labels().unwrap();
        document.set_label_color(labels[1].label, "black").unwrap();
        assert_eq!(
            document.attribute(labels[1].label, "class").unwrap().as_deref(),
            Some("boxblack mute")
        );
    }

    #[test]
    fn test_set_stroke_rewrites_style() {
        let mut document = SvgDocument::parse(TREE).unwrap();
        let labels = document.leaf_labels().unwrap();
        let path = labels[0].geometry.unwrap();
        document.set_stroke(path, "rgb(0, 203, 133)").unwrap();
        assert_eq!(
            document.stroke(path).unwrap().as_deref(),
            Some("rgb(0, 203, 133)")
        );
        assert_eq!(
            document.attribute(path, "style").unwrap().as_deref(),
            Some("stroke-width: 1; stroke: rgb(0, 203, 133); fill: none;")
        );
    }

    #[test]
    fn test_round_trip_preserves_content() {
        let document = SvgDocument::parse(TREE).unwrap();
        let written = document.to_xml_string().unwrap();
        assert_eq!(written, TREE);
    }

    #[test]
    fn test_edits_survive_serialization() {
        let mut document = SvgDocument::parse(TREE).unwrap();
        let label = document.leaf_labels().unwrap()[0].label;
        document.set_label_color(label, "orange").unwrap();
        let reparsed = SvgDocument::parse(&document.to_xml_string().unwrap()).unwrap();
        assert_eq!(reparsed.leaf_labels().unwrap()[0].color, "orange");
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(matches!(
            SvgDocument::parse("<svg xmlns=\"http://www.w3.org/2000/svg\"><g></svg>"),
            Err(TreeError::DocumentParse(_))
        ));
        assert!(matches!(
            SvgDocument::parse("<svg xmlns=\"http://www.w3.org/2000/svg\"><g>"),
            Err(TreeError::DocumentParse(_))
        ));
        assert!(matches!(
            SvgDocument::parse("<svg><text class=\"boxred\">a_1</text></svg>"),
            Err(TreeError::DocumentParse(_))
        ));
        assert!(matches!(
            SvgDocument::parse("<html xmlns=\"http://www.w3.org/2000/svg\"/>"),
            Err(TreeError::DocumentParse(_))
        ));
        assert!(SvgDocument::parse("").is_err());
    }

    #[test]
    fn test_style_helpers() {
        assert_eq!(
            style_property("stroke-width: 2; stroke:#fff", "stroke").as_deref(),
            Some("#fff")
        );
        assert_eq!(style_property("fill: none", "stroke"), None);
        assert_eq!(
            style_with_property("fill: none", "stroke", "rgb(1, 2, 3)"),
            "fill: none; stroke: rgb(1, 2, 3);"
        );
    }
}
