use super::open_tree;
use crate::cli::{RecolorArgs, SwapArgs};
use crate::utils::Result;
use std::path::Path;

pub fn recolor(args: RecolorArgs) -> Result<()> {
    let mut tree = open_tree(&args.tree)?;
    let previous = tree.color_of(&args.sequence).map(str::to_string);
    tree.change_lineage(&args.sequence, &args.color)?;
    log::info!(
        "Moved {} from {} to {}",
        args.sequence,
        previous.as_deref().unwrap_or("no lineage"),
        args.color
    );
    tree.save(args.output_path.as_deref().map(Path::new))?;
    Ok(())
}

pub fn swap(args: SwapArgs) -> Result<()> {
    let mut tree = open_tree(&args.tree)?;
    let (first, second) = &args.colors;
    let counts = tree.swap_lineages(first, second)?;
    if let Some(counts) = counts {
        log::info!(
            "{} now holds {} sequences, {} holds {}",
            tree.lineage_name(first),
            counts.count(first),
            tree.lineage_name(second),
            counts.count(second)
        );
    }
    tree.save(args.output_path.as_deref().map(Path::new))?;
    Ok(())
}
