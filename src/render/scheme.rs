use super::RenderError;
use crate::highlighter::{Annotation, SeqType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const GAP: &str = "Gap";
const FALLBACK_REFERENCE_COLOR: &str = "#D3D3D3";

/// Mark colors of a mismatch plot keyed by residue and `Gap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchScheme {
    pub name: String,
    colors: HashMap<String, String>,
}

impl MismatchScheme {
    /// Unknown names fall back to `LANL`.
    pub fn for_type(seq_type: SeqType, name: &str) -> Self {
        let table: &[(&str, &str)] = match (seq_type, name) {
            (SeqType::Nucleotide, "ML") => &[
                ("A", "#36b809"),
                ("C", "#1282b5"),
                ("G", "#FFA500"),
                ("T", "#c48002"),
                (GAP, "#666666"),
            ],
            (SeqType::Nucleotide, _) => &[
                ("A", "#42FF00"),
                ("C", "#41B8EE"),
                ("G", "#FFA500"),
                ("T", "#EE0B10"),
                (GAP, "#666666"),
            ],
            (SeqType::AminoAcid, _) => &[
                ("H", "#FF0000"),
                ("D", "#302ECD"),
                ("E", "#302ECD"),
                ("K", "#23659B"),
                ("N", "#23659B"),
                ("Q", "#23659B"),
                ("R", "#23659B"),
                ("M", "#2F9A2F"),
                ("I", "#42FF00"),
                ("L", "#42FF00"),
                ("V", "#42FF00"),
                ("F", "#F900FF"),
                ("W", "#F900FF"),
                ("Y", "#F900FF"),
                ("C", "#CD2F2E"),
                ("A", "#F9CE2E"),
                ("G", "#F9CE2E"),
                ("S", "#F9CE2E"),
                ("T", "#F9CE2E"),
                ("P", "#FBFF00"),
                (GAP, "#bebebe"),
            ],
        };
        let resolved = match (seq_type, name) {
            (SeqType::Nucleotide, "ML") => "ML",
            _ => "LANL",
        };
        if resolved != name {
            log::warn!(
                "No {} mismatch scheme named {}; using {}",
                seq_type,
                name,
                resolved
            );
        }
        Self {
            name: resolved.to_string(),
            colors: table
                .iter()
                .map(|(code, color)| (code.to_string(), color.to_string()))
                .collect(),
        }
    }

    /// Mark color of a code. Residues missing from the table and signature
    /// codes have no mark.
    pub fn color(&self, annotation: &Annotation) -> Option<&str> {
        let key = match annotation {
            Annotation::Residue(residue) => residue.to_ascii_uppercase().to_string(),
            Annotation::Gap => GAP.to_string(),
            _ => return None,
        };
        self.colors.get(&key).map(|color| color.as_str())
    }
}

/// Mark colors of a match plot. Reference colors repeat when there are more
/// references than colors; `None` leaves a class unmarked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchScheme {
    pub references: Vec<String>,
    pub unique: Option<String>,
    pub multiple: Option<String>,
}

impl MatchScheme {
    pub fn named(name: &str) -> Result<Self, RenderError> {
        let (references, unique, multiple) = match name {
            "ML" => (
                ["#FF0000", "#537EFF", "#00CB85", "#000000", "#FFA500"],
                "#EFE645",
                "#808080",
            ),
            "LANL" => (
                ["#ED1C24", "#235192", "#FFC20E", "#00A651", "#8DC73F"],
                "#000000",
                "#666666",
            ),
            _ => return Err(RenderError::InvalidScheme(name.to_string())),
        };
        Ok(Self {
            references: references.iter().map(|c| c.to_string()).collect(),
            unique: Some(unique.to_string()),
            multiple: Some(multiple.to_string()),
        })
    }

    /// Reads `{"references": [...], "unique": ..., "multiple": ...}`.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::InvalidScheme(format!("{}: {}", path.display(), e)))?;
        let scheme: MatchScheme = serde_json::from_str(&content)
            .map_err(|e| RenderError::InvalidScheme(format!("{}: {}", path.display(), e)))?;
        scheme.validate()?;
        Ok(scheme)
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.references.is_empty() {
            return Err(RenderError::InvalidScheme(
                "scheme needs at least one reference color".to_string(),
            ));
        }
        let empty = |color: &Option<String>| color.as_deref().is_some_and(str::is_empty);
        if self.references.iter().any(|c| c.is_empty()) || empty(&self.unique) || empty(&self.multiple)
        {
            return Err(RenderError::InvalidScheme("scheme has an empty color".to_string()));
        }
        Ok(())
    }

    /// Color of the reference at `index`; a scheme without reference colors
    /// falls back to the baseline gray.
    pub fn reference_color(&self, index: usize) -> &str {
        if self.references.is_empty() {
            return FALLBACK_REFERENCE_COLOR;
        }
        &self.references[index % self.references.len()]
    }
}
