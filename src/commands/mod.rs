pub mod counts;
pub mod extract;
pub mod plot;
pub mod recolor;
pub mod stabilize;

use crate::cli::TreeArgs;
use crate::lineage::{AnnotatedTree, Palette, TreeSettings};
use crate::utils::Result;

/// Opens the tree named on the command line with its palette and settings.
pub(crate) fn open_tree(args: &TreeArgs) -> Result<AnnotatedTree> {
    let palette = match &args.palette_path {
        Some(path) => Palette::from_path(path)?,
        None => Palette::default(),
    };
    let settings = match &args.settings_path {
        Some(path) => TreeSettings::from_path(path)?,
        None => TreeSettings::default(),
    };
    Ok(AnnotatedTree::open(&args.tree_path, palette)?.with_settings(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::tree::tests::tree_document;

    #[test]
    fn test_open_tree_applies_settings() {
        let dir = tempfile::tempdir().unwrap();
        let tree_path = dir.path().join("tree.svg");
        std::fs::write(&tree_path, tree_document(&[("s1_1_4", "red")])).unwrap();
        let settings_path = dir.path().join("settings.json");
        std::fs::write(&settings_path, r#"{"lineages": {"red": "Founder"}}"#).unwrap();

        let tree = open_tree(&TreeArgs {
            tree_path,
            palette_path: None,
            settings_path: Some(settings_path),
        })
        .unwrap();
        assert_eq!(tree.sequences().len(), 1);
        assert_eq!(tree.lineage_name("red"), "Founder");
        assert_eq!(tree.lineage_name("green"), "Green");
    }

    #[test]
    fn test_open_tree_rejects_bad_palette() {
        let dir = tempfile::tempdir().unwrap();
        let tree_path = dir.path().join("tree.svg");
        std::fs::write(&tree_path, tree_document(&[("s1_1_4", "red")])).unwrap();
        let palette_path = dir.path().join("palette.json");
        std::fs::write(&palette_path, "not json").unwrap();

        let opened = open_tree(&TreeArgs {
            tree_path,
            palette_path: Some(palette_path),
            settings_path: None,
        });
        assert!(opened.is_err());
    }
}
