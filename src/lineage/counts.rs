use super::SequenceIdentity;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Summed multiplicities of one lineage, split by timepoint when the tree
/// carries timepoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageTally {
    pub timepoints: BTreeMap<Option<u64>, u64>,
    pub total: u64,
}

impl LineageTally {
    fn zeroed(timepoints: &BTreeSet<u64>) -> Self {
        Self {
            timepoints: timepoints.iter().map(|tp| (Some(*tp), 0)).collect(),
            total: 0,
        }
    }

    fn add(&mut self, identity: &SequenceIdentity, by_timepoint: bool) {
        if by_timepoint {
            let count = self.timepoints.entry(identity.timepoint).or_insert(0);
            *count = count.saturating_add(identity.multiplicity);
        }
        self.total = self.total.saturating_add(identity.multiplicity);
    }

    pub fn count_at(&self, timepoint: Option<u64>) -> u64 {
        self.timepoints.get(&timepoint).copied().unwrap_or(0)
    }

    fn to_json(&self, by_timepoint: bool) -> Value {
        if !by_timepoint {
            return json!({ "count": self.total });
        }
        let timepoints = self
            .timepoints
            .iter()
            .map(|(tp, count)| (timepoint_key(*tp), json!(count)))
            .collect::<Map<_, _>>();
        json!({ "timepoints": timepoints, "total": self.total })
    }
}

fn timepoint_key(timepoint: Option<u64>) -> String {
    match timepoint {
        Some(tp) => tp.to_string(),
        None => "none".to_string(),
    }
}

/// Per-color frequency table of a tree plus the aggregate over all colors.
/// Always derived from the current leaf colors, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageCounts {
    has_timepoints: bool,
    lineages: BTreeMap<String, LineageTally>,
    total: LineageTally,
}

impl LineageCounts {
    /// `None` when there is nothing to count.
    pub fn from_identities(identities: &[SequenceIdentity]) -> Option<Self> {
        if identities.is_empty() {
            return None;
        }

        let timepoints = identities
            .iter()
            .filter_map(|identity| identity.timepoint)
            .collect::<BTreeSet<_>>();
        let has_timepoints = !timepoints.is_empty();

        let mut lineages: BTreeMap<String, LineageTally> = BTreeMap::new();
        let mut total = LineageTally::default();
        for identity in identities {
            lineages
                .entry(identity.color.clone())
                .or_insert_with(|| LineageTally::zeroed(&timepoints))
                .add(identity, has_timepoints);
            total.add(identity, has_timepoints);
        }

        Some(Self {
            has_timepoints,
            lineages,
            total,
        })
    }

    pub fn has_timepoints(&self) -> bool {
        self.has_timepoints
    }

    /// Timepoints in ascending order, the unnamed bucket first if present.
    pub fn timepoints(&self) -> Vec<Option<u64>> {
        self.total.timepoints.keys().copied().collect()
    }

    pub fn lineage(&self, color: &str) -> Option<&LineageTally> {
        self.lineages.get(color)
    }

    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.lineages.keys().map(|color| color.as_str())
    }

    /// Total for a color; absent colors count as zero.
    pub fn count(&self, color: &str) -> u64 {
        self.lineage(color).map_or(0, |tally| tally.total)
    }

    pub fn count_at(&self, color: &str, timepoint: Option<u64>) -> u64 {
        self.lineage(color).map_or(0, |tally| tally.count_at(timepoint))
    }

    pub fn total(&self) -> &LineageTally {
        &self.total
    }

    pub fn to_json(&self) -> Value {
        let mut table = Map::new();
        for (color, tally) in &self.lineages {
            table.insert(color.clone(), tally.to_json(self.has_timepoints));
        }
        table.insert("total".to_string(), self.total.to_json(self.has_timepoints));
        Value::Object(table)
    }
}
