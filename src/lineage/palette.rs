use super::TreeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One entry of the lineage color table. `short` is the code used in the
/// `box{short}` class of tree labels; `value` is a six digit hex color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationColor {
    pub name: String,
    pub short: String,
    pub value: String,
    pub swapable: bool,
    #[serde(rename = "has_UOLs", alias = "has_uols", default)]
    pub has_uols: bool,
}

impl AnnotationColor {
    fn new(name: &str, short: &str, value: &str, swapable: bool, has_uols: bool) -> Self {
        Self {
            name: name.to_string(),
            short: short.to_string(),
            value: value.to_string(),
            swapable,
            has_uols,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<AnnotationColor>,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = vec![
            AnnotationColor::new("Red", "red", "FF0000", true, false),
            AnnotationColor::new("Neon Blue", "neonblue", "537EFF", true, false),
            AnnotationColor::new("Green", "green", "00CB85", true, false),
            AnnotationColor::new("Black", "black", "000000", true, false),
            AnnotationColor::new("Orange", "orange", "FFA500", true, false),
            AnnotationColor::new("Light Blue", "lightblue", "00E3FF", false, true),
            AnnotationColor::new("Lime", "lime", "BFEF45", false, true),
            AnnotationColor::new("Gray", "gray", "808080", false, true),
            AnnotationColor::new("Apricot", "apricot", "FFD8B1", false, true),
            AnnotationColor::new("Lavender", "lavender", "DCBEFF", false, true),
            AnnotationColor::new("Pink", "pink", "E935A1", false, true),
            AnnotationColor::new("Purple", "purple", "800080", false, true),
            AnnotationColor::new("Yellow", "yellow", "EFE645", false, false),
        ];
        Self { colors }
    }
}

impl Palette {
    pub fn new(colors: Vec<AnnotationColor>) -> Result<Self, TreeError> {
        if colors.is_empty() {
            return Err(TreeError::Config("palette has no colors".to_string()));
        }
        for (index, color) in colors.iter().enumerate() {
            if hex_to_rgb(&color.value).is_none() {
                return Err(TreeError::Config(format!(
                    "color {} has an invalid hex value: {}",
                    color.short, color.value
                )));
            }
            if colors[..index].iter().any(|c| c.short == color.short) {
                return Err(TreeError::Config(format!(
                    "color {} is listed twice",
                    color.short
                )));
            }
        }
        Ok(Self { colors })
    }

    /// Reads a JSON array of color entries.
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let content = std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;
        let colors: Vec<AnnotationColor> = serde_json::from_str(&content)
            .map_err(|e| TreeError::Config(format!("{}: {}", path.display(), e)))?;
        Self::new(colors)
    }

    pub fn colors(&self) -> &[AnnotationColor] {
        &self.colors
    }

    pub fn get(&self, short: &str) -> Option<&AnnotationColor> {
        self.colors.iter().find(|color| color.short == short)
    }

    pub fn contains(&self, short: &str) -> bool {
        self.get(short).is_some()
    }

    /// Swapable colors in declaration order.
    pub fn swapable(&self) -> impl Iterator<Item = &AnnotationColor> {
        self.colors.iter().filter(|color| color.swapable)
    }
}

/// Converts `FF8000` or `#ff8000` to its components.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// CSS form of a hex color as browsers serialize it, e.g. `rgb(255, 0, 0)`.
pub fn rgb_style(hex: &str) -> Option<String> {
    hex_to_rgb(hex).map(|(r, g, b)| format!("rgb({}, {}, {})", r, g, b))
}

/// Per-tree settings stored next to the document. `lineages` maps a color
/// short code to the lineage name shown to users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSettings {
    #[serde(default)]
    pub lineages: BTreeMap<String, String>,
}

impl TreeSettings {
    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let content = std::fs::read_to_string(path).map_err(|e| TreeError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| TreeError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn lineage_name(&self, short: &str) -> Option<&str> {
        self.lineages.get(short).map(|name| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.colors().len(), 13);
        let swapable = palette.swapable().map(|c| c.short.as_str()).collect::<Vec<_>>();
        assert_eq!(swapable, ["red", "neonblue", "green", "black", "orange"]);
        assert!(palette.get("lavender").unwrap().has_uols);
        assert!(!palette.get("yellow").unwrap().has_uols);
        assert!(palette.get("teal").is_none());
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#537eff"), Some((83, 126, 255)));
        assert_eq!(hex_to_rgb("FFF"), None);
        assert_eq!(hex_to_rgb("GG0000"), None);
    }

    #[test]
    fn test_rgb_style() {
        assert_eq!(rgb_style("00CB85").as_deref(), Some("rgb(0, 203, 133)"));
    }

    #[test]
    fn test_palette_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.json");
        std::fs::write(
            &path,
            r#"[{"name": "Red", "short": "red", "value": "FF0000", "swapable": true, "has_UOLs": false},
                {"name": "Teal", "short": "teal", "value": "008080", "swapable": false, "has_uols": true}]"#,
        )
        .unwrap();
        let palette = Palette::from_path(&path).unwrap();
        assert_eq!(palette.colors().len(), 2);
        assert!(palette.get("teal").unwrap().has_uols);
    }

    #[test]
    fn test_palette_rejects_bad_entries() {
        let bad_hex = vec![AnnotationColor::new("Red", "red", "nothex", true, false)];
        assert!(matches!(Palette::new(bad_hex), Err(TreeError::Config(_))));

        let duplicate = vec![
            AnnotationColor::new("Red", "red", "FF0000", true, false),
            AnnotationColor::new("Also red", "red", "FF0001", true, false),
        ];
        assert!(Palette::new(duplicate).is_err());
        assert!(Palette::new(Vec::new()).is_err());
    }

    #[test]
    fn test_tree_settings() {
        let settings: TreeSettings =
            serde_json::from_str(r#"{"lineages": {"red": "A", "green": "B"}, "other": 1}"#).unwrap();
        assert_eq!(settings.lineage_name("red"), Some("A"));
        assert_eq!(settings.lineage_name("black"), None);

        let empty: TreeSettings = serde_json::from_str("{}").unwrap();
        assert!(empty.lineages.is_empty());
    }
}
