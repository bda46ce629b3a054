//! Annotated tree documents: leaf colors, lineage counts, palette ordering,
//! and per-lineage sequence extraction.

mod counts;
mod document;
mod extract;
mod name;
mod palette;
mod swap;
pub(crate) mod tree;

pub use counts::{LineageCounts, LineageTally};
pub use document::{LeafLabel, SvgDocument};
pub use extract::{extract, extract_all, extract_ids, write_fasta, ExtractOrder};
pub use name::{parse_sequence_name, SequenceIdentity, SequenceName};
pub use palette::{hex_to_rgb, rgb_style, AnnotationColor, Palette, TreeSettings};
pub use swap::{find_swap, Stabilization, MAX_STABILIZE_ITERATIONS};
pub use tree::AnnotatedTree;

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Unable to parse tree document: {0}")]
    DocumentParse(String),
    #[error("Unknown lineage color: {0}")]
    UnknownColor(String),
    #[error("Unknown sequence: {0}")]
    UnknownSequence(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        TreeError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<TreeError> for String {
    fn from(err: TreeError) -> Self {
        err.to_string()
    }
}
