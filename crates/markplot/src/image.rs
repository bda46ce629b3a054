use crate::{pdf, png, svg, Scene};
use std::path::Path;

pub fn generate(scene: &Scene, path: &Path) -> Result<(), String> {
    generate_scaled(scene, path, 1.0)
}

/// Writes the scene to `path`; `scale` only affects raster (PNG) output.
pub fn generate_scaled(scene: &Scene, path: &Path, scale: f32) -> Result<(), String> {
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        let svg_content = svg::generate_string(scene)?;
        match FileType::from_extension(extension) {
            Some(FileType::Svg) => svg::render_from_string(&svg_content, path),
            Some(FileType::Png) => png::render_from_string(&svg_content, path, scale),
            Some(FileType::Pdf) => pdf::render_from_string(&svg_content, path),
            None => Err(format!("Unsupported file extension: {extension:?}")),
        }
    } else {
        Err(format!("Failed to get extension from path: {path:?}"))
    }
}

#[derive(Debug, PartialEq)]
enum FileType {
    Svg,
    Png,
    Pdf,
}

impl FileType {
    fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "svg" => Some(FileType::Svg),
            "png" => Some(FileType::Png),
            "pdf" => Some(FileType::Pdf),
            _ => None,
        }
    }
}
