use super::CompareError;

/// Position of `base` within its codon (0, 1 or 2), counting only non-gap
/// residues and shifting by `offset`.
pub fn codon_position(sequence: &str, base: usize, offset: usize) -> Result<usize, CompareError> {
    let residues = sequence.as_bytes();
    let residue = residues
        .get(base)
        .ok_or(CompareError::PositionOutOfRange {
            position: base,
            length: residues.len(),
        })?;
    if *residue == b'-' {
        return Err(CompareError::GapPosition(base));
    }
    let gaps = residues[..=base].iter().filter(|r| **r == b'-').count();
    Ok((base - gaps + offset) % 3)
}

/// Codon phase of every column in one pass; `None` at gaps.
pub(crate) fn codon_phases(residues: &[u8], offset: usize) -> Vec<Option<usize>> {
    let mut ungapped = 0;
    residues
        .iter()
        .map(|residue| {
            if *residue == b'-' {
                None
            } else {
                let phase = (ungapped + offset) % 3;
                ungapped += 1;
                Some(phase)
            }
        })
        .collect()
}
