/*!
This crate provides a small vector scene made of lines, rectangles, circles,
polygons, and text, laid out in absolute page coordinates (points, origin at
the top-left corner). Scenes are serialized to SVG and can be rasterized to
PNG or converted to PDF; the output format is chosen by file extension.

Scenes are useful for alignment "highlighter" diagrams where every row is a
baseline decorated with colored marks and symbols.
*/

mod common;
mod image;
mod pdf;
mod png;
mod scene;
mod svg;

pub use common::prepare_svg_tree;
pub use image::{generate as generate_image, generate_scaled as generate_scaled_image};
pub use scene::{Anchor, Color, Element, Font, Scene};
pub use svg::generate_string as generate_svg_string;
