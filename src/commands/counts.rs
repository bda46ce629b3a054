use super::open_tree;
use crate::cli::CountsArgs;
use crate::utils::Result;
use serde_json::{json, Value};

pub fn counts(args: CountsArgs) -> Result<()> {
    let tree = open_tree(&args.tree)?;
    let unassigned = tree.unassigned_sequences()?;
    if !unassigned.is_empty() {
        log::debug!("Unassigned sequences: {}", unassigned.join(", "));
    }
    let lineages = match tree.lineage_counts() {
        Some(counts) => counts.to_json(),
        None => {
            log::warn!("No lineage counts for {}", args.tree.tree_path.display());
            Value::Null
        }
    };
    let report = json!({
        "lineages": lineages,
        "unassigned": unassigned.len(),
    });
    let text = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("Unable to serialize counts: {}", e))?;
    println!("{}", text);
    Ok(())
}
