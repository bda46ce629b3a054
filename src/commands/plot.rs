use crate::cli::PlotArgs;
use crate::highlighter::{
    export_matches, export_mismatches, ordered_records, Alignment, MismatchOptions,
};
use crate::lineage::{extract_ids, write_fasta};
use crate::render::{newick_leaf_names, DrawOptions, HighlighterPlot, MatchScheme, PlotConfig, RowOrder};
use crate::utils::{read_alignment, Result};
use markplot::generate_scaled_image;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub fn plot(args: PlotArgs) -> Result<()> {
    let alignment = read_alignment(&args.alignment_path)?;
    let draw = draw_options(&args)?;
    let mut plot = HighlighterPlot::new(&alignment, args.seq_type, PlotConfig::default());

    let (scene, export, rows) = if args.mode == "match" {
        let (scene, report) = match &args.scheme_path {
            Some(path) => {
                let scheme = MatchScheme::from_path(path)?;
                plot.draw_matches_with_scheme(&args.references, &draw, &scheme)?
            }
            None => plot.draw_matches(&args.references, &draw)?,
        };
        let rows = draw.order.rows(&alignment, &report.maps);
        (scene, export_matches(&alignment, &report), rows)
    } else {
        if args.references.len() > 1 {
            log::warn!(
                "Mismatch plots use one reference, ignoring all but {}",
                args.references[0]
            );
        }
        let options = mismatch_options(&args);
        let (scene, report) = plot.draw_mismatches(&args.references[0], &options, &draw)?;
        let rows = draw.order.rows(&alignment, &report.maps);
        (scene, export_mismatches(&alignment, &report), rows)
    };

    generate_scaled_image(&scene, Path::new(&args.output_path), args.scale as f32)?;
    log::info!("Wrote {} marks to {}", scene.len(), args.output_path);

    if let Some(export_path) = &args.export_path {
        std::fs::write(export_path, export).map_err(|e| format!("{}: {}", export_path, e))?;
        log::info!("Wrote positions to {}", export_path);
    }
    if let Some(fasta_path) = &args.ordered_fasta_path {
        write_ordered_fasta(&args, &alignment, &rows, Path::new(fasta_path))?;
    }
    Ok(())
}

/// The alignment in plot row order, optionally narrowed to the sequences
/// listed in `--ids` and renamed with `--suffix`.
fn write_ordered_fasta(
    args: &PlotArgs,
    alignment: &Alignment,
    rows: &[usize],
    path: &Path,
) -> Result<()> {
    let mut records = ordered_records(alignment, rows);
    if let Some(ids_path) = &args.ids_path {
        let ids = read_ids(ids_path)?;
        records = extract_ids(&records, &ids, args.suffix.as_deref().unwrap_or(""));
    }
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    write_fasta(&records, BufWriter::new(file))
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    log::info!("Wrote {} ordered sequences to {}", records.len(), path.display());
    Ok(())
}

fn read_ids(path: &Path) -> Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(content
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect())
}

fn draw_options(args: &PlotArgs) -> Result<DrawOptions> {
    let leaves = match &args.newick_path {
        Some(path) => {
            let newick = std::fs::read_to_string(path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            Some(newick_leaf_names(&newick)?)
        }
        None => None,
    };
    Ok(DrawOptions {
        title: args.title.clone(),
        order: RowOrder::from_name(&args.sort, leaves)?,
        mark_width: args.mark_width,
        scheme: args.scheme.clone(),
        labels: !args.no_labels,
    })
}

fn mismatch_options(args: &PlotArgs) -> MismatchOptions {
    MismatchOptions {
        apobec: args.apobec,
        g_to_a: args.g_to_a,
        stop_codons: args.stop_codons,
        glycosylation: args.glycosylation,
        codon_offset: usize::from(args.codon_offset),
    }
}
