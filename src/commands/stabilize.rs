use super::open_tree;
use crate::cli::StabilizeArgs;
use crate::lineage::{AnnotatedTree, Stabilization};
use crate::utils::Result;
use std::path::Path;

pub fn stabilize(args: StabilizeArgs) -> Result<()> {
    let mut tree = open_tree(&args.tree)?;
    let outcome = tree.stabilize()?;
    match &outcome {
        Stabilization::Stable => log::info!("Lineages already ordered by frequency"),
        Stabilization::Stabilized(description) => log::info!("Swapped {}", description),
        Stabilization::Incomplete(description) => {
            log::warn!("Swapped {} without reaching a stable order", description)
        }
        Stabilization::Uncounted => {
            return Err(format!(
                "Unable to count lineages of {}: every labeled sequence name needs a numeric multiplicity",
                args.tree.tree_path.display()
            ))
        }
    }
    if let Some(description) = outcome.description() {
        println!("{}", description);
    }

    let populated = populated_uol_lineages(&tree);
    if !populated.is_empty() {
        log::warn!(
            "Lineages with UOLs are populated ({}); check their assignments",
            populated.join(", ")
        );
    }

    if !outcome.changed() {
        return Ok(());
    }
    if args.dry_run {
        log::info!("Dry run, tree left unchanged");
        return Ok(());
    }
    tree.save(args.output_path.as_deref().map(Path::new))?;
    Ok(())
}

fn populated_uol_lineages(tree: &AnnotatedTree) -> Vec<String> {
    let counts = match tree.lineage_counts() {
        Some(counts) => counts,
        None => return Vec::new(),
    };
    tree.palette()
        .colors()
        .iter()
        .filter(|color| color.has_uols && counts.count(&color.short) > 0)
        .map(|color| tree.lineage_name(&color.short))
        .collect()
}
