//! Position-wise comparison of aligned sequences against one or more
//! references, with mutation-signature annotations.

mod alignment;
mod annotation;
mod codon;
mod comparator;
mod export;

pub use alignment::{Alignment, SeqType, SequenceRecord};
pub use annotation::{Annotation, AnnotationMap, MatchCode, MatchMap};
pub use codon::codon_position;
pub use comparator::{
    get_matches, get_mismatches, Comparator, MatchReport, MismatchOptions, MismatchReport,
};
pub use export::{export_matches, export_mismatches, ordered_records};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    #[error("Sequence {id} has length {found}, expected {expected}")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid references: {0}")]
    InvalidReferences(String),
    #[error("Unknown sequence: {0}")]
    UnknownSequence(String),
    #[error("Position {0} is a gap")]
    GapPosition(usize),
    #[error("Position {position} is outside a sequence of length {length}")]
    PositionOutOfRange { position: usize, length: usize },
    #[error("Alignment contains no sequences")]
    EmptyAlignment,
}

impl CompareError {
    /// Names the offending sequence of a length error raised by a kernel
    /// that only saw residue strings.
    pub(crate) fn for_sequence(self, name: &str) -> Self {
        match self {
            CompareError::LengthMismatch {
                expected, found, ..
            } => CompareError::LengthMismatch {
                id: name.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }
}

impl From<CompareError> for String {
    fn from(err: CompareError) -> Self {
        err.to_string()
    }
}
