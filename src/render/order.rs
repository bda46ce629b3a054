use super::RenderError;
use crate::highlighter::Alignment;
use std::collections::BTreeMap;

/// Vertical order of plot rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Fewest annotated columns first.
    #[default]
    Similar,
    /// Leaf order of a tree, given as leaf names.
    Tree(Vec<String>),
    /// Alignment order.
    Input,
}

impl RowOrder {
    pub fn from_name(name: &str, tree: Option<Vec<String>>) -> Result<Self, RenderError> {
        match name {
            "similar" => Ok(RowOrder::Similar),
            "tree" => tree.map(RowOrder::Tree).ok_or_else(|| {
                RenderError::InvalidTree("tree ordering needs a tree".to_string())
            }),
            _ => Ok(RowOrder::Input),
        }
    }

    /// Alignment indexes in drawing order.
    pub fn rows<V>(&self, alignment: &Alignment, maps: &[BTreeMap<usize, V>]) -> Vec<usize> {
        match self {
            RowOrder::Similar => {
                let mut rows = (0..maps.len()).collect::<Vec<_>>();
                rows.sort_by_key(|row| maps[*row].len());
                rows
            }
            RowOrder::Input => (0..maps.len()).collect(),
            RowOrder::Tree(leaves) => {
                let mut seen = vec![false; alignment.len()];
                let mut rows = Vec::with_capacity(alignment.len());
                for leaf in leaves {
                    match alignment.index_of(leaf) {
                        Some(row) if !seen[row] => {
                            seen[row] = true;
                            rows.push(row);
                        }
                        Some(_) => {}
                        None => log::warn!("Tree leaf {} is not in the alignment", leaf),
                    }
                }
                for (row, visited) in seen.iter().enumerate() {
                    if !visited {
                        log::warn!(
                            "Sequence {} is not in the tree; drawing it last",
                            alignment.records()[row].id
                        );
                        rows.push(row);
                    }
                }
                rows
            }
        }
    }
}
