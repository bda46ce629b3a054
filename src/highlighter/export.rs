use super::{Alignment, MatchCode, MatchReport, MismatchReport, SequenceRecord};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Plain-text listing of every mismatch code of every row with its 1-based
/// positions, codes ordered by length and then alphabetically.
pub fn export_mismatches(alignment: &Alignment, report: &MismatchReport) -> String {
    let mut output = String::new();
    for (record, map) in alignment.records().iter().zip(&report.maps) {
        let mut by_code: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (base, codes) in map {
            for code in codes {
                by_code.entry(code.to_string()).or_default().push(base + 1);
            }
        }
        output.push_str(&format!("{}\n", record.id));
        for (code, positions) in by_code
            .iter()
            .sorted_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        {
            output.push_str(&format!("{} [{}]\n", code, positions.iter().join(" ")));
        }
        output.push('\n');
    }
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchGroup {
    Reference(usize),
    Unique,
    Multiple,
}

/// Plain-text listing of reference agreement per row: single-reference
/// matches first, then residues unique to the query, then residues shared
/// by several references.
pub fn export_matches(alignment: &Alignment, report: &MatchReport) -> String {
    let mut output = String::new();
    for (row, (record, map)) in alignment.records().iter().zip(&report.maps).enumerate() {
        let mut groups: BTreeMap<MatchGroup, Vec<usize>> = BTreeMap::new();
        for (base, codes) in map {
            let group = match codes.as_slice() {
                [MatchCode::Reference(index)] => MatchGroup::Reference(*index),
                codes if codes.contains(&MatchCode::Unique) => MatchGroup::Unique,
                _ => MatchGroup::Multiple,
            };
            groups.entry(group).or_default().push(base + 1);
        }

        match report.reference_rank(row) {
            Some(rank) => {
                output.push_str(&format!("{} (R{})\n", record.id, rank));
            }
            None => {
                output.push_str(&format!("{}\n", record.id));
            }
        }
        for (group, positions) in &groups {
            let label = match group {
                MatchGroup::Reference(index) => format!("R{}", index + 1),
                MatchGroup::Unique => "Unique in query".to_string(),
                MatchGroup::Multiple => "Multiple matches".to_string(),
            };
            output.push_str(&format!("{} [{}]\n", label, positions.iter().join(" ")));
        }
        output.push('\n');
    }
    output
}

/// Alignment records rearranged into plot row order.
pub fn ordered_records(alignment: &Alignment, rows: &[usize]) -> Vec<SequenceRecord> {
    rows.iter()
        .filter_map(|row| alignment.get(*row))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlighter::{Comparator, MismatchOptions, SeqType, SequenceRecord};

    fn alignment(rows: &[(&str, &str)]) -> Alignment {
        Alignment::new(
            rows.iter()
                .map(|(id, residues)| SequenceRecord::new(*id, *residues))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_ordered_records() {
        let aln = alignment(&[("a_1", "ACGT"), ("b_1", "ACGA"), ("c_1", "TCGA")]);
        let ordered = ordered_records(&aln, &[2, 0, 1, 7]);
        let ids = ordered.iter().map(|r| r.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["c_1", "a_1", "b_1"]);
        assert_eq!(ordered[0].residues, "TCGA");
    }

    #[test]
    fn test_export_mismatches() {
        let aln = alignment(&[("ref", "GAGCGT"), ("q", "AAGC-A")]);
        let mut comparator = Comparator::new(SeqType::Nucleotide);
        let options = MismatchOptions {
            g_to_a: true,
            ..Default::default()
        };
        let report = comparator.list_mismatches(&aln, "ref", &options).unwrap();
        assert_eq!(
            export_mismatches(&aln, &report),
            "ref\n\nq\nA [1 6]\nGap [5]\nG->A mutation [1]\n\n"
        );
    }

    #[test]
    fn test_export_matches() {
        let aln = alignment(&[("r1", "ACGTA"), ("q", "TCCTT"), ("r2", "ACCAT")]);
        let mut comparator = Comparator::new(SeqType::Nucleotide);
        let report = comparator.list_matches(&aln, &["r1", "r2"]).unwrap();
        assert_eq!(
            export_matches(&aln, &report),
            "r1 (R1)\n\nq\nR1 [4]\nR2 [3 5]\nUnique in query [1]\n\nr2 (R2)\n\n"
        );
    }

    #[test]
    fn test_export_multiple_matches() {
        let aln = alignment(&[("r1", "AC"), ("r2", "AG"), ("r3", "TG"), ("q", "AA")]);
        let mut comparator = Comparator::new(SeqType::Nucleotide);
        let report = comparator.list_matches(&aln, &["r1", "r2", "r3"]).unwrap();
        let text = export_matches(&aln, &report);
        assert!(text.ends_with("q\nUnique in query [2]\nMultiple matches [1]\n\n"));
    }
}
