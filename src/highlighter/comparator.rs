use super::codon::codon_phases;
use super::{Alignment, Annotation, AnnotationMap, CompareError, MatchCode, MatchMap, SeqType};
use std::collections::HashMap;

/// Extra annotations requested for a mismatch comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MismatchOptions {
    pub apobec: bool,
    pub g_to_a: bool,
    pub stop_codons: bool,
    pub glycosylation: bool,
    pub codon_offset: usize,
}

impl MismatchOptions {
    fn normalized(mut self) -> Self {
        self.codon_offset %= 3;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchReport {
    pub reference: usize,
    /// One map per alignment row, the reference row included.
    pub maps: Vec<AnnotationMap>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub references: Vec<usize>,
    /// One map per alignment row; reference rows are empty.
    pub maps: Vec<MatchMap>,
}

impl MatchReport {
    /// 1-based rank of a row among the references.
    pub fn reference_rank(&self, row: usize) -> Option<usize> {
        self.references
            .iter()
            .position(|reference| *reference == row)
            .map(|rank| rank + 1)
    }
}

type MismatchKey = (String, String, SeqType, MismatchOptions);
type MatchKey = (String, Vec<String>);

/// Compares alignment rows against references, remembering every result by
/// the literal residue strings it was computed from.
#[derive(Debug)]
pub struct Comparator {
    seq_type: SeqType,
    mismatch_cache: HashMap<MismatchKey, AnnotationMap>,
    match_cache: HashMap<MatchKey, MatchMap>,
}

impl Comparator {
    pub fn new(seq_type: SeqType) -> Self {
        Self {
            seq_type,
            mismatch_cache: HashMap::new(),
            match_cache: HashMap::new(),
        }
    }

    pub fn seq_type(&self) -> SeqType {
        self.seq_type
    }

    pub fn list_mismatches(
        &mut self,
        alignment: &Alignment,
        reference: &str,
        options: &MismatchOptions,
    ) -> Result<MismatchReport, CompareError> {
        let reference = alignment
            .resolve(reference)
            .map_err(|_| CompareError::InvalidReferences(reference.to_string()))?;
        let reference_residues = &alignment.records()[reference].residues;
        if reference_residues.is_empty() {
            return Err(CompareError::InvalidReferences(format!(
                "reference {} is empty",
                alignment.records()[reference].id
            )));
        }

        let options = options.normalized();
        let mut maps = Vec::with_capacity(alignment.len());
        for record in alignment.records() {
            let key = (
                record.residues.clone(),
                reference_residues.clone(),
                self.seq_type,
                options,
            );
            if let Some(map) = self.mismatch_cache.get(&key) {
                maps.push(map.clone());
                continue;
            }
            let map = get_mismatches(&record.residues, reference_residues, self.seq_type, &options)
                .map_err(|e| e.for_sequence(&record.id))?;
            self.mismatch_cache.insert(key, map.clone());
            maps.push(map);
        }
        log::debug!(
            "Compared {} sequences to {} ({} cached results)",
            maps.len(),
            alignment.records()[reference].id,
            self.mismatch_cache.len()
        );
        Ok(MismatchReport { reference, maps })
    }

    pub fn list_matches<S: AsRef<str>>(
        &mut self,
        alignment: &Alignment,
        references: &[S],
    ) -> Result<MatchReport, CompareError> {
        if references.is_empty() {
            return Err(CompareError::InvalidReferences(
                "at least one reference is required".to_string(),
            ));
        }
        let mut resolved = Vec::with_capacity(references.len());
        for reference in references {
            let reference = reference.as_ref();
            let index = alignment
                .resolve(reference)
                .map_err(|_| CompareError::InvalidReferences(reference.to_string()))?;
            if resolved.contains(&index) {
                return Err(CompareError::InvalidReferences(format!(
                    "{} is listed twice",
                    reference
                )));
            }
            resolved.push(index);
        }

        let reference_residues = resolved
            .iter()
            .map(|index| alignment.records()[*index].residues.clone())
            .collect::<Vec<_>>();
        let mut maps = Vec::with_capacity(alignment.len());
        for (row, record) in alignment.records().iter().enumerate() {
            if resolved.contains(&row) {
                maps.push(MatchMap::new());
                continue;
            }
            let key = (record.residues.clone(), reference_residues.clone());
            if let Some(map) = self.match_cache.get(&key) {
                maps.push(map.clone());
                continue;
            }
            let map = get_matches(&record.residues, &reference_residues)
                .map_err(|e| e.for_sequence(&record.id))?;
            self.match_cache.insert(key, map.clone());
            maps.push(map);
        }
        Ok(MatchReport {
            references: resolved,
            maps,
        })
    }
}

/// Per-column differences of `sequence` from `reference`, plus requested
/// signature annotations.
pub fn get_mismatches(
    sequence: &str,
    reference: &str,
    seq_type: SeqType,
    options: &MismatchOptions,
) -> Result<AnnotationMap, CompareError> {
    check_length(sequence, reference)?;
    let mut mismatches = AnnotationMap::new();

    let scan = match seq_type {
        SeqType::Nucleotide => options.stop_codons,
        SeqType::AminoAcid => options.glycosylation,
    };
    if sequence == reference && !scan {
        return Ok(mismatches);
    }

    let residues = sequence.as_bytes();
    let reference = reference.as_bytes();
    let len = residues.len();
    let phases = if seq_type == SeqType::Nucleotide && options.stop_codons {
        codon_phases(residues, options.codon_offset % 3)
    } else {
        Vec::new()
    };

    for i in 0..len {
        let mut codes = Vec::new();
        let residue = residues[i];

        if residue != reference[i] {
            codes.push(Annotation::from_residue(residue));
            if seq_type == SeqType::Nucleotide && reference[i] == b'G' && residue == b'A' {
                if options.g_to_a {
                    codes.push(Annotation::GToA);
                }
                if options.apobec
                    && i + 3 <= len
                    && matches!(residues[i + 1], b'A' | b'G')
                    && residues[i + 2] != b'C'
                {
                    codes.push(Annotation::Apobec);
                }
            }
        }

        // signatures need a full codon or sequon ahead
        if i + 3 <= len {
            match seq_type {
                SeqType::Nucleotide
                    if options.stop_codons
                        && matches!(residue, b'T' | b'U')
                        && phases[i] == Some(0) =>
                {
                    if let Some([b'A', b'A'] | [b'A', b'G'] | [b'G', b'A']) =
                        next_residues(residues, i)
                    {
                        codes.push(Annotation::StopCodon);
                    }
                }
                SeqType::AminoAcid if options.glycosylation && residue == b'N' => {
                    if let Some([second, third]) = next_residues(residues, i) {
                        if second != b'P' && matches!(third, b'S' | b'T') {
                            codes.push(Annotation::Glycosylation);
                        }
                    }
                }
                _ => {}
            }
        }

        if !codes.is_empty() {
            mismatches.insert(i, codes);
        }
    }
    Ok(mismatches)
}

/// Per-column agreement of `sequence` with each reference. `X` in a
/// reference matches anything. Columns where every reference agrees are
/// left out.
pub fn get_matches<S: AsRef<str>>(sequence: &str, references: &[S]) -> Result<MatchMap, CompareError> {
    if references.is_empty() {
        return Err(CompareError::InvalidReferences(
            "at least one reference is required".to_string(),
        ));
    }
    for reference in references {
        check_length(sequence, reference.as_ref())?;
    }

    let residues = sequence.as_bytes();
    let references = references
        .iter()
        .map(|reference| reference.as_ref().as_bytes())
        .collect::<Vec<_>>();
    let mut matches = MatchMap::new();
    for (i, residue) in residues.iter().enumerate() {
        let hits = references
            .iter()
            .enumerate()
            .filter(|(_, reference)| reference[i] == *residue || reference[i] == b'X')
            .map(|(index, _)| MatchCode::Reference(index))
            .collect::<Vec<_>>();
        if hits.is_empty() {
            matches.insert(i, vec![MatchCode::Unique]);
        } else if hits.len() < references.len() {
            matches.insert(i, hits);
        }
    }
    Ok(matches)
}

fn check_length(sequence: &str, reference: &str) -> Result<(), CompareError> {
    if sequence.len() != reference.len() {
        return Err(CompareError::LengthMismatch {
            id: "sequence".to_string(),
            expected: reference.len(),
            found: sequence.len(),
        });
    }
    Ok(())
}

/// The next two non-gap residues after `start`.
fn next_residues(residues: &[u8], start: usize) -> Option<[u8; 2]> {
    let mut ahead = residues[start + 1..].iter().filter(|r| **r != b'-');
    Some([*ahead.next()?, *ahead.next()?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlighter::SequenceRecord;

    const NT: SeqType = SeqType::Nucleotide;
    const AA: SeqType = SeqType::AminoAcid;

    fn options() -> MismatchOptions {
        MismatchOptions::default()
    }

    fn alignment(rows: &[(&str, &str)]) -> Alignment {
        Alignment::new(
            rows.iter()
                .map(|(id, residues)| SequenceRecord::new(*id, *residues))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_simple_mismatch_has_no_signature() {
        let opts = MismatchOptions {
            apobec: true,
            g_to_a: true,
            ..options()
        };
        let map = get_mismatches("AAAA", "AAAG", NT, &opts).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&3], vec![Annotation::Residue('A')]);
    }

    #[test]
    fn test_g_to_a_with_apobec_context() {
        let opts = MismatchOptions {
            apobec: true,
            g_to_a: true,
            ..options()
        };
        let map = get_mismatches("AAGC", "GAGC", NT, &opts).unwrap();
        assert_eq!(
            map[&0],
            vec![
                Annotation::Residue('A'),
                Annotation::GToA,
                Annotation::Apobec
            ]
        );
    }

    #[test]
    fn test_apobec_requires_context() {
        let opts = MismatchOptions {
            apobec: true,
            ..options()
        };
        // followed by C two positions on
        let map = get_mismatches("AACT", "GACT", NT, &opts).unwrap();
        assert_eq!(map[&0], vec![Annotation::Residue('A')]);
        // too close to the end
        let map = get_mismatches("TTAG", "TTGG", NT, &opts).unwrap();
        assert_eq!(map[&2], vec![Annotation::Residue('A')]);
    }

    #[test]
    fn test_gap_code() {
        let map = get_mismatches("A-GT", "ACGT", NT, &options()).unwrap();
        assert_eq!(map[&1], vec![Annotation::Gap]);
    }

    #[test]
    fn test_stop_codon_across_gaps() {
        let opts = MismatchOptions {
            stop_codons: true,
            ..options()
        };
        let map = get_mismatches("ATGT-AAGGC", "ATGT-AAGGC", NT, &opts).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&3], vec![Annotation::StopCodon]);

        // the same T out of frame is not a stop
        let opts = MismatchOptions {
            codon_offset: 1,
            ..opts
        };
        let map = get_mismatches("ATGT-AAGGC", "ATGT-AAGGC", NT, &opts).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_identical_sequences_short_circuit() {
        let opts = MismatchOptions {
            glycosylation: true,
            ..options()
        };
        // glycosylation scans only apply to protein
        assert!(get_mismatches("TAAGGG", "TAAGGG", NT, &opts).unwrap().is_empty());
    }

    #[test]
    fn test_glycosylation_sequon() {
        let opts = MismatchOptions {
            glycosylation: true,
            ..options()
        };
        let map = get_mismatches("MN-ATK", "MN-ATK", AA, &opts).unwrap();
        assert_eq!(map[&1], vec![Annotation::Glycosylation]);
        let map = get_mismatches("MNPTKK", "MNPTKK", AA, &opts).unwrap();
        assert!(map.is_empty());
        let map = get_mismatches("MNASKK", "MKASKK", AA, &opts).unwrap();
        assert_eq!(
            map[&1],
            vec![Annotation::Residue('N'), Annotation::Glycosylation]
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            get_mismatches("ACG", "ACGT", NT, &options()),
            Err(CompareError::LengthMismatch { .. })
        ));
        assert!(matches!(
            get_mismatches("ACGTA", "ACGT", NT, &options()),
            Err(CompareError::LengthMismatch { .. })
        ));
        assert!(matches!(
            get_matches("ACG", &["ACG", "AC"]),
            Err(CompareError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_matches_drop_shared_columns() {
        let map = get_matches("ACGTA", &["ACCTT", "AGGTX"]).unwrap();
        assert!(!map.contains_key(&0));
        assert!(!map.contains_key(&3));
        assert_eq!(map[&1], vec![MatchCode::Reference(0)]);
        assert_eq!(map[&2], vec![MatchCode::Reference(1)]);
        assert_eq!(map[&4], vec![MatchCode::Reference(1)]);

        let map = get_matches("ACGTA", &["TTTTT", "ACGTT", "ACGGG"]).unwrap();
        assert_eq!(map[&0], vec![MatchCode::Reference(1), MatchCode::Reference(2)]);
        assert_eq!(map[&4], vec![MatchCode::Unique]);
        assert!(map.values().all(|codes| !codes.is_empty() && codes.len() < 3));
    }

    #[test]
    fn test_list_mismatches_includes_reference_row() {
        let aln = alignment(&[("ref", "ACGT"), ("q1", "ACGA"), ("q2", "ACGT")]);
        let mut comparator = Comparator::new(NT);
        let report = comparator.list_mismatches(&aln, "ref", &options()).unwrap();
        assert_eq!(report.reference, 0);
        assert_eq!(report.maps.len(), 3);
        assert!(report.maps[0].is_empty());
        assert_eq!(report.maps[1][&3], vec![Annotation::Residue('A')]);

        let again = comparator.list_mismatches(&aln, "0", &options()).unwrap();
        assert_eq!(again, report);
        assert!(matches!(
            comparator.list_mismatches(&aln, "missing", &options()),
            Err(CompareError::InvalidReferences(_))
        ));
    }

    #[test]
    fn test_list_matches_reference_rows_are_empty() {
        let aln = alignment(&[("r1", "ACGT"), ("r2", "ACCA"), ("q", "TCGA")]);
        let mut comparator = Comparator::new(NT);
        let report = comparator.list_matches(&aln, &["r1", "1"]).unwrap();
        assert_eq!(report.references, vec![0, 1]);
        assert!(report.maps[0].is_empty());
        assert!(report.maps[1].is_empty());
        assert_eq!(report.maps[2][&0], vec![MatchCode::Unique]);
        assert_eq!(report.maps[2][&2], vec![MatchCode::Reference(0)]);
        assert_eq!(report.maps[2][&3], vec![MatchCode::Reference(1)]);
        assert_eq!(report.reference_rank(1), Some(2));

        let none: [&str; 0] = [];
        assert!(comparator.list_matches(&aln, &none).is_err());
        assert!(comparator.list_matches(&aln, &["r1", "0"]).is_err());
    }
}
