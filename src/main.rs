use clap::Parser;
use highlighter::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{counts, extract, plot, recolor, stabilize},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Counts(_) => "counts",
        Command::Recolor(_) => "recolor",
        Command::Swap(_) => "swap",
        Command::Stabilize(_) => "stabilize",
        Command::Extract(_) => "extract",
        Command::Plot(_) => "plot",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Counts(args) => counts::counts(args)?,
        Command::Recolor(args) => recolor::recolor(args)?,
        Command::Swap(args) => recolor::swap(args)?,
        Command::Stabilize(args) => stabilize::stabilize(args)?,
        Command::Extract(args) => extract::extract(args)?,
        Command::Plot(args) => plot::plot(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
