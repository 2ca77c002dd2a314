use std::error::Error as _;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use mgsfontgen::config::Config;
use mgsfontgen::error::Result;
use mgsfontgen::export::{self, ArtifactPaths};
use mgsfontgen::font;
use mgsfontgen::input::InputSequence;
use mgsfontgen::logging;
use mgsfontgen::pipeline;

/// Render a bitmap font atlas, its outline atlas and the width table.
#[derive(Debug, Parser)]
#[command(name = "mgsfontgen", version)]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// UTF-16LE character sequence, one code unit per cell.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Fill atlas PNG.
    #[arg(long, default_value = "output.png")]
    output: PathBuf,

    /// Outline atlas PNG.
    #[arg(long, default_value = "outputOutline.png")]
    outline_output: PathBuf,

    /// Width table.
    #[arg(long, default_value = "widths.bin")]
    widths: PathBuf,

    /// Override `font.family`.
    #[arg(long)]
    font_family: Option<String>,

    /// Override `font.size` (pixels).
    #[arg(long)]
    font_size: Option<f32>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    print_config: bool,

    /// Also append log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

const DEFAULT_INPUT: &str = "input.bin";

fn main() {
    let args = Args::parse();

    if args.print_config {
        match toml::to_string_pretty(&Config::default()) {
            Ok(s) => print!("{s}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = logging::init(
        logging::level_for(args.verbose, args.quiet),
        args.log_file.as_deref(),
    ) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        let mut message = format!("error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            let _ = write!(message, "\n  caused by: {cause}");
            source = cause.source();
        }
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(family) = args.font_family {
        config.font.family = family;
        config.font.path = None;
    }
    if let Some(size) = args.font_size {
        config.font.size = size;
    }
    config.validate()?;

    let geometry = config.geometry()?;
    let input = match args.input {
        Some(path) => InputSequence::read(&path, geometry.total_cells())?,
        None if !config.ranges.is_empty() => {
            info!("input: building cells from {} configured ranges", config.ranges.len());
            InputSequence::from_ranges(&config.ranges, &geometry)?
        }
        None => InputSequence::read(Path::new(DEFAULT_INPUT), geometry.total_cells())?,
    };

    let mut fonts = font::load_selection(&config.font)?;
    let atlas = pipeline::render(&config, &input, &mut fonts)?;

    let stats = atlas.stats;
    info!(
        "done: {} populated, {} empty, {} overridden, {} fallback, {} missing, {} skipped, {} overflowed widths",
        stats.populated,
        stats.empty,
        stats.overridden,
        stats.fallback,
        stats.missing,
        stats.skipped,
        stats.overflowed
    );

    export::write_all(
        &atlas,
        &ArtifactPaths {
            fill: args.output,
            outline: args.outline_output,
            widths: args.widths,
        },
    )
}
