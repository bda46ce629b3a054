use crate::utils::Result;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="highlighter",
          author="Phylobook developers",
          version=&**FULL_VERSION,
          about="Lineage annotation and alignment highlighter plots",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{author}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Report lineage counts of an annotated tree")]
    Counts(CountsArgs),
    #[clap(about = "Move one sequence to another lineage")]
    Recolor(RecolorArgs),
    #[clap(about = "Exchange two lineage colors")]
    Swap(SwapArgs),
    #[clap(about = "Order lineage colors by lineage frequency")]
    Stabilize(StabilizeArgs),
    #[clap(about = "Extract lineage sequences from an alignment")]
    Extract(ExtractArgs),
    #[clap(about = "Draw a highlighter or match plot of an alignment")]
    Plot(PlotArgs),
}

/// Tree document and its color configuration, shared by the tree commands.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[clap(required = true)]
    #[clap(short = 't')]
    #[clap(long = "tree")]
    #[clap(help = "Annotated tree SVG")]
    #[clap(value_name = "SVG")]
    #[arg(value_parser = check_file_exists)]
    pub tree_path: PathBuf,

    #[clap(help_heading("Configuration"))]
    #[clap(long = "palette")]
    #[clap(help = "JSON file replacing the built-in color palette")]
    #[clap(value_name = "JSON")]
    #[arg(value_parser = check_file_exists)]
    pub palette_path: Option<PathBuf>,

    #[clap(help_heading("Configuration"))]
    #[clap(long = "settings")]
    #[clap(help = "JSON file with lineage display names")]
    #[clap(value_name = "JSON")]
    #[arg(value_parser = check_file_exists)]
    pub settings_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("counts")))]
#[command(arg_required_else_help(true))]
pub struct CountsArgs {
    #[clap(flatten)]
    pub tree: TreeArgs,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("recolor")))]
#[command(arg_required_else_help(true))]
pub struct RecolorArgs {
    #[clap(flatten)]
    pub tree: TreeArgs,

    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "sequence")]
    #[clap(help = "Name of the sequence to move")]
    #[clap(value_name = "NAME")]
    pub sequence: String,

    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "color")]
    #[clap(help = "Short code of the target lineage color")]
    #[clap(value_name = "COLOR")]
    pub color: String,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Write the tree here instead of overwriting the input")]
    #[clap(value_name = "SVG")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: Option<String>,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("swap")))]
#[command(arg_required_else_help(true))]
pub struct SwapArgs {
    #[clap(flatten)]
    pub tree: TreeArgs,

    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "colors")]
    #[clap(help = "Two lineage colors to exchange, comma separated")]
    #[clap(value_name = "A,B")]
    #[arg(value_parser = color_pair)]
    pub colors: (String, String),

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Write the tree here instead of overwriting the input")]
    #[clap(value_name = "SVG")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: Option<String>,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("stabilize")))]
#[command(arg_required_else_help(true))]
pub struct StabilizeArgs {
    #[clap(flatten)]
    pub tree: TreeArgs,

    #[clap(long = "dry-run")]
    #[clap(help = "Report the swaps without saving the tree")]
    pub dry_run: bool,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Write the tree here instead of overwriting the input")]
    #[clap(value_name = "SVG")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: Option<String>,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("selection").required(true).args(["color", "all"])))]
#[command(arg_required_else_help(true))]
pub struct ExtractArgs {
    #[clap(flatten)]
    pub tree: TreeArgs,

    #[clap(required = true)]
    #[clap(short = 'a')]
    #[clap(long = "alignment")]
    #[clap(help = "Aligned FASTA, optionally gzipped")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub alignment_path: PathBuf,

    #[clap(short = 'c')]
    #[clap(long = "color")]
    #[clap(help = "Short code of the lineage color to extract")]
    #[clap(value_name = "COLOR")]
    pub color: Option<String>,

    #[clap(long = "all")]
    #[clap(help = "Extract every named lineage")]
    pub all: bool,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output FASTA, or output directory with --all")]
    #[clap(value_name = "PATH")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: String,

    #[clap(long = "sort")]
    #[clap(value_name = "ORDER")]
    #[clap(help = "Order of the extracted sequences")]
    #[clap(value_parser(["tree", "frequency", "timepoint_frequency", "unordered"]))]
    #[clap(default_value = "unordered")]
    pub sort: String,

    #[clap(long = "concatenate")]
    #[clap(help = "With --all, write one concatenated record per lineage")]
    #[clap(requires = "all")]
    pub concatenate: bool,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("plot")))]
#[command(arg_required_else_help(true))]
pub struct PlotArgs {
    #[clap(required = true)]
    #[clap(short = 'a')]
    #[clap(long = "alignment")]
    #[clap(help = "Aligned FASTA, optionally gzipped")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub alignment_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "image")]
    #[clap(help = "Output image path")]
    #[clap(value_name = "IMAGE")]
    #[arg(value_parser = check_image_path)]
    pub output_path: String,

    #[clap(long = "mode")]
    #[clap(value_name = "MODE")]
    #[clap(help = "Compare against one reference or match against several")]
    #[clap(value_parser(["mismatch", "match"]))]
    #[clap(default_value = "mismatch")]
    pub mode: String,

    #[clap(short = 'r')]
    #[clap(long = "reference")]
    #[clap(help = "Reference sequence by identifier or 0-based index; repeat for match mode")]
    #[clap(value_name = "ID")]
    #[clap(default_value = "0")]
    pub references: Vec<String>,

    #[clap(help_heading("Comparison"))]
    #[clap(long = "seq-type")]
    #[clap(value_name = "TYPE")]
    #[clap(help = "Sequence type, guessed from the residues when absent")]
    #[arg(value_parser = parse_seq_type)]
    pub seq_type: Option<crate::highlighter::SeqType>,

    #[clap(help_heading("Comparison"))]
    #[clap(long = "apobec")]
    #[clap(help = "Mark APOBEC signatures")]
    pub apobec: bool,

    #[clap(help_heading("Comparison"))]
    #[clap(long = "g-to-a")]
    #[clap(help = "Mark G to A mutations")]
    pub g_to_a: bool,

    #[clap(help_heading("Comparison"))]
    #[clap(long = "stop-codons")]
    #[clap(help = "Mark stop codons")]
    pub stop_codons: bool,

    #[clap(help_heading("Comparison"))]
    #[clap(long = "glycosylation")]
    #[clap(help = "Mark N-linked glycosylation sites")]
    pub glycosylation: bool,

    #[clap(help_heading("Comparison"))]
    #[clap(long = "codon-offset")]
    #[clap(value_name = "OFFSET")]
    #[clap(help = "Reading frame offset for stop codons")]
    #[clap(value_parser = clap::value_parser!(u8).range(0..3))]
    #[clap(default_value = "0")]
    pub codon_offset: u8,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "sort")]
    #[clap(value_name = "ORDER")]
    #[clap(help = "Row order")]
    #[clap(value_parser(["similar", "tree", "input"]))]
    #[clap(default_value = "similar")]
    pub sort: String,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "newick")]
    #[clap(value_name = "NEWICK")]
    #[clap(help = "Newick tree giving the row order for --sort tree")]
    #[arg(value_parser = check_file_exists)]
    pub newick_path: Option<PathBuf>,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "title")]
    #[clap(value_name = "TITLE")]
    #[clap(help = "Plot title")]
    pub title: Option<String>,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "scheme")]
    #[clap(value_name = "SCHEME")]
    #[clap(help = "Color scheme name (LANL or ML)")]
    #[clap(default_value = "LANL")]
    pub scheme: String,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "scheme-file")]
    #[clap(value_name = "JSON")]
    #[clap(help = "JSON match scheme replacing --scheme in match mode")]
    #[arg(value_parser = check_file_exists)]
    pub scheme_path: Option<PathBuf>,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "mark-width")]
    #[clap(value_name = "WIDTH")]
    #[clap(help = "Width multiplier of single-column marks")]
    #[clap(default_value = "1.0")]
    #[arg(value_parser = positive_float)]
    pub mark_width: f64,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "scale")]
    #[clap(value_name = "SCALE")]
    #[clap(help = "Scale factor of PNG output")]
    #[clap(default_value = "1.0")]
    #[arg(value_parser = positive_float)]
    pub scale: f64,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "no-labels")]
    #[clap(help = "Omit sequence labels")]
    pub no_labels: bool,

    #[clap(help_heading("Plotting"))]
    #[clap(long = "export")]
    #[clap(value_name = "TXT")]
    #[clap(help = "Also write the annotated positions as text")]
    #[arg(value_parser = check_prefix_path)]
    pub export_path: Option<String>,

    #[clap(help_heading("Sequences"))]
    #[clap(long = "ordered-fasta")]
    #[clap(value_name = "FASTA")]
    #[clap(help = "Also write the alignment in plot row order")]
    #[arg(value_parser = check_prefix_path)]
    pub ordered_fasta_path: Option<String>,

    #[clap(help_heading("Sequences"))]
    #[clap(long = "ids")]
    #[clap(value_name = "FILE")]
    #[clap(help = "Restrict the ordered FASTA to these sequence IDs (comma or line separated)")]
    #[clap(requires = "ordered_fasta_path")]
    #[arg(value_parser = check_file_exists)]
    pub ids_path: Option<PathBuf>,

    #[clap(help_heading("Sequences"))]
    #[clap(long = "suffix")]
    #[clap(value_name = "SUFFIX")]
    #[clap(help = "Suffix appended to the names of sequences selected with --ids")]
    #[clap(requires = "ids_path")]
    pub suffix: Option<String>,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn check_image_path(s: &str) -> Result<String> {
    let prefix_check = check_prefix_path(s)?;
    let path = Path::new(s);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("svg") | Some("png") | Some("pdf") => Ok(prefix_check),
        _ => Err("Image must have an extension of .svg, .png, or .pdf".to_string()),
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn color_pair(s: &str) -> Result<(String, String)> {
    let colors: Vec<&str> = s.split(',').map(str::trim).collect();
    match colors.as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => {
            Ok((first.to_string(), second.to_string()))
        }
        _ => Err(format!("Expected two comma-separated colors. Got {}", s)),
    }
}

fn parse_seq_type(s: &str) -> Result<crate::highlighter::SeqType> {
    s.parse()
        .map_err(|_| format!("Unknown sequence type: {} (expected NT or AA)", s))
}

fn positive_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("The value must be positive, got: {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_pair() {
        assert_eq!(
            color_pair("red, green").unwrap(),
            ("red".to_string(), "green".to_string())
        );
        assert!(color_pair("red").is_err());
        assert!(color_pair("red,green,black").is_err());
        assert!(color_pair("red,").is_err());
    }

    #[test]
    fn test_positive_float() {
        assert_eq!(positive_float("2.5").unwrap(), 2.5);
        assert!(positive_float("0").is_err());
        assert!(positive_float("-1").is_err());
        assert!(positive_float("wide").is_err());
    }

    #[test]
    fn test_check_image_path() {
        assert!(check_image_path("plot.svg").is_ok());
        assert!(check_image_path("plot.png").is_ok());
        assert!(check_image_path("plot.jpg").is_err());
        assert!(check_image_path("/nonexistent/dir/plot.svg").is_err());
    }

    #[test]
    fn test_parse_extract_args() {
        let cli = Cli::try_parse_from([
            "highlighter",
            "extract",
            "--tree",
            "Cargo.toml",
            "--alignment",
            "Cargo.toml",
            "--all",
            "--concatenate",
            "-o",
            "out.fasta",
        ])
        .unwrap();
        match cli.command {
            Command::Extract(args) => {
                assert!(args.all);
                assert!(args.concatenate);
                assert_eq!(args.color, None);
                assert_eq!(args.sort, "unordered");
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_extract_requires_selection() {
        let parsed = Cli::try_parse_from([
            "highlighter",
            "extract",
            "--tree",
            "Cargo.toml",
            "--alignment",
            "Cargo.toml",
            "-o",
            "out.fasta",
        ]);
        assert!(parsed.is_err());
    }
}
