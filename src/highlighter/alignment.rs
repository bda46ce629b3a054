use super::CompareError;
use std::fmt;
use std::str::FromStr;

/// IUPAC nucleotide codes plus the gap character.
const NUCLEOTIDE_CODES: &str = "ACGTURYKMSWBDHVN-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub residues: String,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            residues: residues.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqType {
    Nucleotide,
    AminoAcid,
}

impl SeqType {
    /// Nucleotide unless some residue falls outside the IUPAC nucleotide set.
    pub fn guess(alignment: &Alignment) -> SeqType {
        let protein = alignment.records().iter().any(|record| {
            record
                .residues
                .trim()
                .chars()
                .any(|c| !NUCLEOTIDE_CODES.contains(c.to_ascii_uppercase()))
        });
        if protein {
            SeqType::AminoAcid
        } else {
            SeqType::Nucleotide
        }
    }
}

impl FromStr for SeqType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NT" | "DNA" | "RNA" => Ok(SeqType::Nucleotide),
            "AA" | "PROTEIN" => Ok(SeqType::AminoAcid),
            _ => Err(format!("Unknown sequence type {} (expected NT or AA)", s)),
        }
    }
}

impl fmt::Display for SeqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqType::Nucleotide => write!(f, "NT"),
            SeqType::AminoAcid => write!(f, "AA"),
        }
    }
}

/// Records of equal length, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    records: Vec<SequenceRecord>,
    width: usize,
}

impl Alignment {
    pub fn new(records: Vec<SequenceRecord>) -> Result<Self, CompareError> {
        let width = records
            .first()
            .map(|record| record.residues.len())
            .ok_or(CompareError::EmptyAlignment)?;
        if let Some(record) = records.iter().find(|r| r.residues.len() != width) {
            return Err(CompareError::LengthMismatch {
                id: record.id.clone(),
                expected: width,
                found: record.residues.len(),
            });
        }
        Ok(Self { records, width })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&SequenceRecord> {
        self.records.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn by_id(&self, id: &str) -> Option<&SequenceRecord> {
        self.index_of(id).and_then(|index| self.get(index))
    }

    /// Resolves a reference given either as an identifier or a 0-based index.
    /// Identifiers win when a sequence is literally named like a number.
    pub fn resolve(&self, key: &str) -> Result<usize, CompareError> {
        if let Some(index) = self.index_of(key) {
            return Ok(index);
        }
        match key.parse::<usize>() {
            Ok(index) if index < self.len() => Ok(index),
            _ => Err(CompareError::UnknownSequence(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment(rows: &[(&str, &str)]) -> Result<Alignment, CompareError> {
        Alignment::new(
            rows.iter()
                .map(|(id, residues)| SequenceRecord::new(*id, *residues))
                .collect(),
        )
    }

    #[test]
    fn test_rejects_ragged_alignment() {
        assert_eq!(
            alignment(&[("a", "ACGT"), ("b", "ACG")]),
            Err(CompareError::LengthMismatch {
                id: "b".to_string(),
                expected: 4,
                found: 3
            })
        );
        assert_eq!(alignment(&[]), Err(CompareError::EmptyAlignment));
    }

    #[test]
    fn test_resolve_by_id_then_index() {
        let aln = alignment(&[("ref", "AC"), ("1", "AG"), ("q", "AT")]).unwrap();
        assert_eq!(aln.resolve("q"), Ok(2));
        assert_eq!(aln.resolve("1"), Ok(1));
        assert_eq!(aln.resolve("0"), Ok(0));
        assert!(matches!(
            aln.resolve("7"),
            Err(CompareError::UnknownSequence(_))
        ));
    }

    #[test]
    fn test_guess_seq_type() {
        let nt = alignment(&[("a", "ACGTN-"), ("b", "acgu-r")]).unwrap();
        assert_eq!(SeqType::guess(&nt), SeqType::Nucleotide);
        let aa = alignment(&[("a", "MEL-"), ("b", "ACGT")]).unwrap();
        assert_eq!(SeqType::guess(&aa), SeqType::AminoAcid);
    }

    #[test]
    fn test_seq_type_from_str() {
        assert_eq!("nt".parse::<SeqType>(), Ok(SeqType::Nucleotide));
        assert_eq!("AA".parse::<SeqType>(), Ok(SeqType::AminoAcid));
        assert!("xx".parse::<SeqType>().is_err());
    }
}
