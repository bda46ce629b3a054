use super::{parse_sequence_name, AnnotatedTree, SequenceName};
use crate::highlighter::{Alignment, SequenceRecord};
use bio::io::fasta;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;

/// Ordering of an extracted lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractOrder {
    /// Alignment file order.
    Tree,
    /// Highest multiplicity first, ties in alignment order.
    Frequency,
    /// The most frequent variant of every timepoint first, then the rest of
    /// each timepoint by multiplicity.
    TimepointFrequency,
    /// Tree document order.
    #[default]
    Unordered,
}

impl ExtractOrder {
    /// Unrecognized names fall back to [`ExtractOrder::Unordered`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "tree" => ExtractOrder::Tree,
            "frequency" => ExtractOrder::Frequency,
            "timepoint_frequency" | "timepoint-frequency" => ExtractOrder::TimepointFrequency,
            _ => ExtractOrder::Unordered,
        }
    }
}

struct Member<'a> {
    record: &'a SequenceRecord,
    name: SequenceName,
}

/// Sequences of one lineage color with their aligned residues.
pub fn extract(
    tree: &AnnotatedTree,
    alignment: &Alignment,
    color: &str,
    order: ExtractOrder,
) -> Vec<SequenceRecord> {
    let leaves = tree
        .sequences()
        .iter()
        .filter(|leaf| leaf.color == color)
        .collect::<Vec<_>>();
    for leaf in &leaves {
        if alignment.index_of(&leaf.name).is_none() {
            log::warn!("Sequence {} is in the tree but not in the alignment", leaf.name);
        }
    }

    let members = match order {
        ExtractOrder::Unordered => leaves
            .iter()
            .filter_map(|leaf| alignment.by_id(&leaf.name))
            .collect::<Vec<_>>(),
        _ => alignment
            .records()
            .iter()
            .filter(|record| tree.color_of(&record.id) == Some(color))
            .collect::<Vec<_>>(),
    };
    let members = members.into_iter().map(member).collect::<Vec<_>>();

    let ordered = match order {
        ExtractOrder::Tree | ExtractOrder::Unordered => members,
        ExtractOrder::Frequency => by_frequency(members),
        ExtractOrder::TimepointFrequency => by_timepoint_frequency(members),
    };
    ordered
        .into_iter()
        .map(|member| member.record.clone())
        .collect()
}

/// One record per named lineage of the tree settings, holding the residues
/// of all its sequences concatenated in alignment order.
pub fn extract_all(tree: &AnnotatedTree, alignment: &Alignment) -> Vec<SequenceRecord> {
    let lineages = &tree.settings().lineages;
    let palette_order = tree
        .palette()
        .colors()
        .iter()
        .map(|color| color.short.as_str())
        .filter(|short| lineages.contains_key(*short));
    let unlisted = lineages
        .keys()
        .map(|short| short.as_str())
        .filter(|short| !tree.palette().contains(short));

    let mut records = Vec::new();
    for color in palette_order.chain(unlisted) {
        let members = extract(tree, alignment, color, ExtractOrder::Tree);
        if members.is_empty() {
            log::debug!("Lineage {} has no sequences", color);
            continue;
        }
        let residues = members
            .iter()
            .map(|record| record.residues.as_str())
            .collect::<String>();
        records.push(SequenceRecord::new(tree.lineage_name(color), residues));
    }
    records
}

/// Records whose identifiers are listed in `ids`, in record order, renamed
/// with `suffix` appended.
pub fn extract_ids<S: AsRef<str>>(
    records: &[SequenceRecord],
    ids: &[S],
    suffix: &str,
) -> Vec<SequenceRecord> {
    let wanted = ids.iter().map(|id| id.as_ref()).collect::<HashSet<_>>();
    for id in &wanted {
        if !records.iter().any(|record| record.id == *id) {
            log::warn!("Sequence {} is not in the alignment", id);
        }
    }
    records
        .iter()
        .filter(|record| wanted.contains(record.id.as_str()))
        .map(|record| SequenceRecord::new(format!("{}{}", record.id, suffix), record.residues.clone()))
        .collect()
}

pub fn write_fasta<W: Write>(records: &[SequenceRecord], writer: W) -> std::io::Result<()> {
    let mut writer = fasta::Writer::new(writer);
    for record in records {
        writer.write(&record.id, None, record.residues.as_bytes())?;
    }
    writer.flush()
}

fn member(record: &SequenceRecord) -> Member<'_> {
    let name = parse_sequence_name(&record.id).unwrap_or_else(|| {
        log::warn!("Sequence name {} has no multiplicity; treating as 0", record.id);
        SequenceName {
            timepoint: None,
            multiplicity: 0,
        }
    });
    Member { record, name }
}

fn by_frequency(mut members: Vec<Member>) -> Vec<Member> {
    members.sort_by(|a, b| b.name.multiplicity.cmp(&a.name.multiplicity));
    members
}

fn by_timepoint_frequency(members: Vec<Member>) -> Vec<Member> {
    let mut timepoints: BTreeMap<Option<u64>, Vec<Member>> = BTreeMap::new();
    for member in members {
        timepoints.entry(member.name.timepoint).or_default().push(member);
    }

    let mut heads = Vec::new();
    let mut rest = Vec::new();
    for (_, group) in timepoints {
        let mut group = by_frequency(group).into_iter();
        heads.extend(group.next());
        rest.extend(group);
    }
    let mut ordered = by_frequency(heads);
    ordered.extend(rest);
    ordered
}
