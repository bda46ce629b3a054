use std::collections::BTreeMap;
use std::fmt;

/// One code attached to an alignment column of a compared sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Annotation {
    Residue(char),
    Gap,
    GToA,
    Apobec,
    StopCodon,
    Glycosylation,
}

impl Annotation {
    pub fn from_residue(residue: u8) -> Self {
        match residue {
            b'-' => Annotation::Gap,
            other => Annotation::Residue(other as char),
        }
    }

    /// Codes drawn as overlay symbols rather than colored marks.
    pub fn is_signature(&self) -> bool {
        !matches!(self, Annotation::Residue(_) | Annotation::Gap)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Residue(residue) => write!(f, "{}", residue),
            Annotation::Gap => write!(f, "Gap"),
            Annotation::GToA => write!(f, "G->A mutation"),
            Annotation::Apobec => write!(f, "APOBEC"),
            Annotation::StopCodon => write!(f, "Stop codon"),
            Annotation::Glycosylation => write!(f, "Glycosylation"),
        }
    }
}

/// 0-based column to the codes found there.
pub type AnnotationMap = BTreeMap<usize, Vec<Annotation>>;

/// Which references a query residue agrees with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchCode {
    Reference(usize),
    Unique,
}

pub type MatchMap = BTreeMap<usize, Vec<MatchCode>>;
