use super::{AnnotatedTree, LineageCounts, Palette, TreeError};
use std::cmp::Ordering;

/// Upper bound on swaps performed by [`AnnotatedTree::stabilize`]. Each swap
/// removes at least one inversion among the swapable colors, so a palette
/// of `n` swapable colors settles within `n * (n - 1) / 2` swaps.
pub const MAX_STABILIZE_ITERATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stabilization {
    /// Colors were already in order.
    Stable,
    /// Colors were reordered; holds the lineages touched, in swap order.
    Stabilized(String),
    /// The iteration bound was reached with swaps still pending.
    Incomplete(String),
    /// Some leaf names carry no multiplicity, so lineages could not be ranked.
    Uncounted,
}

impl Stabilization {
    pub fn description(&self) -> Option<&str> {
        match self {
            Stabilization::Stable | Stabilization::Uncounted => None,
            Stabilization::Stabilized(desc) | Stabilization::Incomplete(desc) => Some(desc),
        }
    }

    pub fn changed(&self) -> bool {
        matches!(
            self,
            Stabilization::Stabilized(_) | Stabilization::Incomplete(_)
        )
    }
}

/// First pair of swapable colors, in palette order, whose earlier color is
/// less frequent than the later one. With timepoints the comparison walks
/// timepoints in ascending order and the first unequal timepoint decides.
pub fn find_swap(counts: &LineageCounts, palette: &Palette) -> Option<(String, String)> {
    let swapable = palette
        .swapable()
        .map(|color| color.short.as_str())
        .collect::<Vec<_>>();
    let timepoints = counts.timepoints();

    for (i, first) in swapable.iter().enumerate() {
        for second in &swapable[i + 1..] {
            if compare(counts, &timepoints, first, second) == Ordering::Less {
                return Some((first.to_string(), second.to_string()));
            }
        }
    }
    None
}

fn compare(counts: &LineageCounts, timepoints: &[Option<u64>], first: &str, second: &str) -> Ordering {
    if !counts.has_timepoints() {
        return counts.count(first).cmp(&counts.count(second));
    }
    for timepoint in timepoints {
        match counts
            .count_at(first, *timepoint)
            .cmp(&counts.count_at(second, *timepoint))
        {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }
    Ordering::Equal
}

impl AnnotatedTree {
    pub fn need_swap(&self) -> Option<(String, String)> {
        find_swap(&self.lineage_counts()?, self.palette())
    }

    /// Swaps colors until the most frequent lineage holds the earliest
    /// swapable color, the next most frequent the second, and so on.
    pub fn stabilize(&mut self) -> Result<Stabilization, TreeError> {
        self.stabilize_within(MAX_STABILIZE_ITERATIONS)
    }

    fn stabilize_within(&mut self, max_swaps: usize) -> Result<Stabilization, TreeError> {
        if !self.sequences().is_empty() && self.lineage_counts().is_none() {
            log::warn!("Lineage counts unavailable; not reordering colors");
            return Ok(Stabilization::Uncounted);
        }
        let mut touched: Vec<String> = Vec::new();
        for _ in 0..max_swaps {
            let (first, second) = match self.need_swap() {
                Some(pair) => pair,
                None => break,
            };
            log::debug!("Lineage {} is less frequent than {}", first, second);
            self.swap_lineages(&first, &second)?;
            for color in [first, second] {
                if !touched.contains(&color) {
                    touched.push(color);
                }
            }
        }

        if touched.is_empty() {
            return Ok(Stabilization::Stable);
        }
        let description = touched
            .iter()
            .map(|color| self.lineage_name(color))
            .collect::<Vec<_>>()
            .join(", ");
        if self.need_swap().is_some() {
            log::warn!("Lineages still out of order after {} swaps", max_swaps);
            Ok(Stabilization::Incomplete(description))
        } else {
            Ok(Stabilization::Stabilized(description))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::tree::tests::tree;
    use crate::lineage::{AnnotationColor, SequenceIdentity};

    fn counts(entries: &[(&str, &str)]) -> LineageCounts {
        let identities = entries
            .iter()
            .map(|(name, color)| SequenceIdentity::parse(name, color).unwrap())
            .collect::<Vec<_>>();
        LineageCounts::from_identities(&identities).unwrap()
    }

    #[test]
    fn test_find_swap_on_totals() {
        let palette = Palette::default();
        let counts = counts(&[("s_a_2", "red"), ("s_b_5", "green")]);
        assert_eq!(
            find_swap(&counts, &palette),
            Some(("red".to_string(), "green".to_string()))
        );
        let counts = self::counts(&[("s_a_5", "red"), ("s_b_5", "green")]);
        assert_eq!(find_swap(&counts, &palette), None);
    }

    #[test]
    fn test_find_swap_tie_falls_through_to_next_timepoint() {
        let palette = Palette::default();
        let counts = counts(&[
            ("s_a_100_x_3", "red"),
            ("s_b_100_x_3", "green"),
            ("s_c_200_x_9", "green"),
        ]);
        assert_eq!(
            find_swap(&counts, &palette),
            Some(("red".to_string(), "green".to_string()))
        );
    }

    #[test]
    fn test_find_swap_surplus_stops_pair() {
        let palette = Palette::default();
        let counts = counts(&[
            ("s_a_100_x_4", "red"),
            ("s_b_100_x_1", "green"),
            ("s_c_200_x_50", "green"),
        ]);
        // red leads at the first timepoint; neonblue is absent everywhere
        assert_eq!(
            find_swap(&counts, &palette),
            Some(("neonblue".to_string(), "green".to_string()))
        );
    }

    #[test]
    fn test_find_swap_ignores_colors_not_swapable() {
        let palette = Palette::default();
        let counts = counts(&[("s_a_1", "red"), ("s_b_40", "lightblue")]);
        assert_eq!(find_swap(&counts, &palette), None);

        let custom = Palette::new(vec![AnnotationColor {
            name: "Red".to_string(),
            short: "red".to_string(),
            value: "FF0000".to_string(),
            swapable: true,
            has_uols: false,
        }])
        .unwrap();
        assert_eq!(find_swap(&counts, &custom), None);
    }

    #[test]
    fn test_need_swap_never_returns_more_frequent_first() {
        let tree = tree(&[
            ("s_a_1_x_2", "red"),
            ("s_b_1_x_5", "green"),
            ("s_c_2_x_7", "black"),
            ("s_d_2_x_1", "orange"),
        ]);
        let counts = tree.lineage_counts().unwrap();
        let (first, second) = tree.need_swap().unwrap();
        let timepoints = counts.timepoints();
        assert_ne!(
            compare(&counts, &timepoints, &first, &second),
            Ordering::Greater
        );
    }

    #[test]
    fn test_stabilize_orders_by_frequency() {
        let mut tree = tree(&[
            ("s_a_2", "red"),
            ("s_b_5", "green"),
            ("s_c_1", "black"),
        ]);
        let outcome = tree.stabilize().unwrap();
        assert_eq!(
            outcome,
            Stabilization::Stabilized("Red, Green, Neon Blue, Black".to_string())
        );
        assert_eq!(tree.color_of("s_b_5"), Some("red"));
        assert_eq!(tree.color_of("s_a_2"), Some("neonblue"));
        assert_eq!(tree.color_of("s_c_1"), Some("green"));
    }

    #[test]
    fn test_stabilize_is_idempotent() {
        let mut tree = tree(&[
            ("s_a_100_x_2", "orange"),
            ("s_b_100_x_2", "red"),
            ("s_c_200_x_8", "orange"),
            ("s_d_200_x_1", "green"),
        ]);
        assert!(tree.stabilize().unwrap().changed());
        assert_eq!(tree.stabilize().unwrap(), Stabilization::Stable);
        assert_eq!(tree.need_swap(), None);
    }

    #[test]
    fn test_stabilize_reports_incomplete_at_bound() {
        let mut tree = tree(&[
            ("s_a_2", "red"),
            ("s_b_5", "green"),
            ("s_c_1", "black"),
        ]);
        let outcome = tree.stabilize_within(1).unwrap();
        assert!(matches!(outcome, Stabilization::Incomplete(_)));
        assert!(outcome.changed());
        assert!(outcome.description().is_some());
        assert!(tree.need_swap().is_some());

        assert!(matches!(tree.stabilize().unwrap(), Stabilization::Stabilized(_)));
        assert_eq!(tree.need_swap(), None);
    }

    #[test]
    fn test_stabilize_uncountable_names() {
        let mut tree = tree(&[("s_a_2", "red"), ("s_b_x", "green"), ("s_c_5", "green")]);
        let outcome = tree.stabilize().unwrap();
        assert_eq!(outcome, Stabilization::Uncounted);
        assert!(!outcome.changed());
        assert_eq!(outcome.description(), None);
        assert_eq!(tree.color_of("s_a_2"), Some("red"));
    }

    #[test]
    fn test_stable_tree_has_no_description() {
        let mut tree = tree(&[("s_a_9", "red"), ("s_b_1", "neonblue")]);
        let outcome = tree.stabilize().unwrap();
        assert_eq!(outcome, Stabilization::Stable);
        assert_eq!(outcome.description(), None);
    }
}
