use super::open_tree;
use crate::cli::ExtractArgs;
use crate::highlighter::{Alignment, SequenceRecord};
use crate::lineage::{extract as extract_lineage, extract_all, write_fasta, AnnotatedTree, ExtractOrder};
use crate::utils::{read_alignment, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub fn extract(args: ExtractArgs) -> Result<()> {
    let tree = open_tree(&args.tree)?;
    let alignment = read_alignment(&args.alignment_path)?;
    let order = ExtractOrder::from_name(&args.sort);
    let output = Path::new(&args.output_path);

    match (&args.color, args.all) {
        (Some(color), _) => {
            if !tree.palette().contains(color) {
                return Err(format!("Unknown lineage color: {}", color));
            }
            let records = extract_lineage(&tree, &alignment, color, order);
            if records.is_empty() {
                log::warn!("Lineage {} has no sequences in the alignment", color);
            }
            write_records(&records, output)
        }
        (None, true) if args.concatenate => write_records(&extract_all(&tree, &alignment), output),
        (None, true) => write_lineage_files(&tree, &alignment, order, output),
        (None, false) => Err("Either --color or --all is required".to_string()),
    }
}

/// One FASTA per named lineage, or per populated color when the tree has no
/// lineage names.
fn write_lineage_files(
    tree: &AnnotatedTree,
    alignment: &Alignment,
    order: ExtractOrder,
    directory: &Path,
) -> Result<()> {
    std::fs::create_dir_all(directory)
        .map_err(|e| format!("{}: {}", directory.display(), e))?;
    let colors = lineage_colors(tree);
    for color in &colors {
        let records = extract_lineage(tree, alignment, color, order);
        if records.is_empty() {
            log::debug!("Lineage {} has no sequences", color);
            continue;
        }
        let path = lineage_file(directory, &tree.lineage_name(color));
        write_records(&records, &path)?;
    }
    Ok(())
}

fn lineage_colors(tree: &AnnotatedTree) -> Vec<String> {
    let named = &tree.settings().lineages;
    tree.palette()
        .colors()
        .iter()
        .map(|color| color.short.clone())
        .filter(|short| named.is_empty() || named.contains_key(short))
        .chain(
            named
                .keys()
                .filter(|short| !tree.palette().contains(short))
                .cloned(),
        )
        .collect()
}

fn lineage_file(directory: &Path, lineage: &str) -> PathBuf {
    let stem = lineage
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect::<String>();
    directory.join(format!("{}.fasta", stem))
}

fn write_records(records: &[SequenceRecord], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    write_fasta(records, BufWriter::new(file))
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    log::info!("Wrote {} sequences to {}", records.len(), path.display());
    Ok(())
}
