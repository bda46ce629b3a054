use super::{
    parse_sequence_name, rgb_style, LeafLabel, LineageCounts, Palette, SequenceIdentity,
    SvgDocument, TreeError, TreeSettings,
};
use crate::utils::{backup_path, backup_timestamp};
use std::path::{Path, PathBuf};

/// A color-annotated tree document together with the palette that gives the
/// colors their meaning. Edits stay in memory until [`AnnotatedTree::save`].
#[derive(Debug, Clone)]
pub struct AnnotatedTree {
    path: Option<PathBuf>,
    palette: Palette,
    settings: TreeSettings,
    document: SvgDocument,
    leaves: Vec<LeafLabel>,
}

impl AnnotatedTree {
    pub fn open(path: &Path, palette: Palette) -> Result<Self, TreeError> {
        let document = SvgDocument::from_path(path)?;
        let mut tree = Self::new(document, palette)?;
        tree.path = Some(path.to_path_buf());
        log::info!(
            "Loaded {} labeled sequences from {}",
            tree.leaves.len(),
            path.display()
        );
        Ok(tree)
    }

    pub fn new(document: SvgDocument, palette: Palette) -> Result<Self, TreeError> {
        let leaves = document.leaf_labels()?;
        Ok(Self {
            path: None,
            palette,
            settings: TreeSettings::default(),
            document,
            leaves,
        })
    }

    pub fn with_settings(mut self, settings: TreeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn document(&self) -> &SvgDocument {
        &self.document
    }

    /// Discards in-memory edits by parsing the backing file again.
    pub fn reload(&mut self) -> Result<(), TreeError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| TreeError::Config("tree has no backing file".to_string()))?;
        self.document = SvgDocument::from_path(&path)?;
        self.leaves = self.document.leaf_labels()?;
        Ok(())
    }

    /// Labeled leaves in document order.
    pub fn sequences(&self) -> &[LeafLabel] {
        &self.leaves
    }

    pub fn sequence(&self, name: &str) -> Option<&LeafLabel> {
        self.leaves.iter().find(|leaf| leaf.name == name)
    }

    pub fn color_of(&self, name: &str) -> Option<&str> {
        self.sequence(name).map(|leaf| leaf.color.as_str())
    }

    /// Decoded identities of every leaf, or `None` if any leaf name does not
    /// follow the naming convention.
    pub fn identities(&self) -> Option<Vec<SequenceIdentity>> {
        let mut identities = Vec::with_capacity(self.leaves.len());
        for leaf in &self.leaves {
            match SequenceIdentity::parse(&leaf.name, &leaf.color) {
                Some(identity) => identities.push(identity),
                None => {
                    log::warn!("Sequence name {} has no multiplicity; not counting", leaf.name);
                    return None;
                }
            }
        }
        Some(identities)
    }

    pub fn lineage_counts(&self) -> Option<LineageCounts> {
        LineageCounts::from_identities(&self.identities()?)
    }

    /// Text labels that look like sequence names but carry no lineage color.
    pub fn unassigned_sequences(&self) -> Result<Vec<String>, TreeError> {
        Ok(self
            .document
            .unclassified_texts()?
            .into_iter()
            .filter(|text| parse_sequence_name(text).is_some())
            .filter(|text| self.sequence(text).is_none())
            .collect())
    }

    pub fn change_lineage(&mut self, name: &str, color: &str) -> Result<(), TreeError> {
        if !self.palette.contains(color) {
            return Err(TreeError::UnknownColor(color.to_string()));
        }
        let targets = self
            .leaves
            .iter()
            .enumerate()
            .filter(|(_, leaf)| leaf.name == name)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        if targets.is_empty() {
            return Err(TreeError::UnknownSequence(name.to_string()));
        }
        for index in targets {
            self.recolor(index, color)?;
        }
        Ok(())
    }

    /// Exchanges two colors on every leaf in one pass and returns the
    /// recomputed counts.
    pub fn swap_lineages(
        &mut self,
        first: &str,
        second: &str,
    ) -> Result<Option<LineageCounts>, TreeError> {
        for color in [first, second] {
            if !self.palette.contains(color) {
                return Err(TreeError::UnknownColor(color.to_string()));
            }
        }
        let mut swapped = 0;
        for index in 0..self.leaves.len() {
            let target = if self.leaves[index].color == first {
                second
            } else if self.leaves[index].color == second {
                first
            } else {
                continue;
            };
            self.recolor(index, target)?;
            swapped += 1;
        }
        log::debug!("Swapped {} and {} on {} leaves", first, second, swapped);
        Ok(self.lineage_counts())
    }

    /// Display name of a color: the tree settings name, else the palette name.
    pub fn lineage_name(&self, color: &str) -> String {
        if let Some(name) = self.settings.lineage_name(color) {
            return name.to_string();
        }
        match self.palette.get(color) {
            Some(entry) => entry.name.clone(),
            None => color.to_string(),
        }
    }

    /// Writes the document to `output`, or back to the file it came from.
    /// An existing target is first copied aside under a timestamped name.
    pub fn save(&self, output: Option<&Path>) -> Result<PathBuf, TreeError> {
        let target = output
            .or(self.path.as_deref())
            .ok_or_else(|| TreeError::Config("no output path for tree".to_string()))?
            .to_path_buf();
        if target.exists() {
            let backup = backup_path(&target, &backup_timestamp());
            std::fs::copy(&target, &backup).map_err(|e| TreeError::io(&backup, e))?;
            log::info!("Backed up {} to {}", target.display(), backup.display());
        }
        self.document.write(&target)?;
        log::info!("Saved tree to {}", target.display());
        Ok(target)
    }

    fn recolor(&mut self, index: usize, color: &str) -> Result<(), TreeError> {
        let stroke = self
            .palette
            .get(color)
            .and_then(|entry| rgb_style(&entry.value))
            .ok_or_else(|| TreeError::UnknownColor(color.to_string()))?;
        let leaf = &mut self.leaves[index];
        self.document.set_label_color(leaf.label, color)?;
        if let Some(geometry) = leaf.geometry {
            self.document.set_stroke(geometry, &stroke)?;
        }
        leaf.color = color.to_string();
        Ok(())
    }
}
