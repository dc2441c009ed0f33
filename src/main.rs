use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;
use mask_inspect::{dataset, loader, preview, scan};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mask_inspect",
    about = "Print the label values found in a segmentation dataset's masks"
)]
struct Args {
    /// Dataset root containing Train/Val/Test directories.
    dataset_root: PathBuf,

    #[arg(long, value_enum, default_value = "Train")]
    split: dataset::Split,

    #[arg(long, value_enum, default_value = "Urban")]
    area: dataset::Area,

    /// Also decode every mask in the folder and report how many load.
    #[arg(long)]
    load_all: bool,

    /// Print the preview as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// JSON output owns stdout, so diagnostics move to stderr.
fn log_target(json: bool) -> env_logger::Target {
    if json {
        env_logger::Target::Stderr
    } else {
        env_logger::Target::Stdout
    }
}

/// Writes the report for `args` to `out`. Diagnostics go through `log`.
fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let listing = scan::scan(&args.dataset_root, args.split, args.area);

    if args.load_all {
        let paths = listing.paths();
        let pb = ProgressBar::new(paths.len() as u64);
        loader::load_all_with(&loader::ImageDecoder, &paths, &pb);
        pb.finish_and_clear();
    }

    if args.json {
        let report = preview::preview(&listing, &mut io::sink())?;
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        preview::preview(&listing, out)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(log_target(args.json))
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out)
}
