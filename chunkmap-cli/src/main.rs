use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod progress;

use chunkmap_core::WorldCoordinate;
use chunkmap_render::Background;
use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "chunkmap")]
#[command(about = "Chunkmap - stitch map tiles into one image and annotate it")]
#[command(version)]
#[command(long_about = "
Chunkmap assembles a sparse grid of square map tiles into a single basemap,
then draws area, line and circle markers on it and crops or rescales the result.

Examples:
  chunkmap build ./tiles --output ./map --zoom 4 --purge-isolated
  chunkmap edit ./map --markers markers.json --clip 120,150,-10,10 --width 2048
  chunkmap info ./map
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stitch a tile directory into basemap.png and metadata.json
    Build {
        /// The directory of tile images
        input: PathBuf,

        /// The directory to write the basemap and metadata to
        #[arg(short, long, required = true)]
        output: PathBuf,

        /// Zoom level from 0 to 4
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=4))]
        zoom: Option<u8>,

        /// Edge length of the tile images in pixels
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        tile_resolution: Option<u32>,

        /// Fill for grid slots without a tile (black or transparent)
        #[arg(long)]
        background: Option<Background>,

        /// Draw the tile grid on the basemap
        #[arg(short, long)]
        grid: bool,

        /// Drop tiles that are not connected to the centre tile
        #[arg(long)]
        purge_isolated: bool,

        /// Reuse an existing basemap in the output directory
        #[arg(long)]
        cache: bool,
    },

    /// Draw markers on a built map, then crop, scale and resize it
    Edit {
        /// Directory holding basemap.png and metadata.json
        map: PathBuf,

        /// JSON file describing the markers to draw
        #[arg(short, long)]
        markers: Option<PathBuf>,

        /// World rectangle to clip to: x1,y1,x2,y2
        #[arg(short, long, value_parser = commands::edit::parse_clip, allow_hyphen_values = true)]
        clip: Option<[WorldCoordinate; 2]>,

        /// Output width in pixels; alone it keeps the aspect ratio
        #[arg(short = 'W', long, value_parser = clap::value_parser!(u32).range(1..))]
        width: Option<u32>,

        /// Output height in pixels; alone it keeps the aspect ratio
        #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..))]
        height: Option<u32>,

        /// Scale factor applied last (0<x<1 to scale down, 1<x to scale up)
        #[arg(short, long, value_parser = commands::edit::parse_resize)]
        resize: Option<f64>,

        /// Output file (defaults to a timestamped name in the map directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the metadata of a built map
    Info {
        /// Directory holding metadata.json
        map: PathBuf,
    },

    /// Print an example configuration file
    Config,
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    let threads = cli.threads.unwrap_or(config.general.threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to set thread count")?;

    match cli.command {
        Commands::Build {
            input,
            output,
            zoom,
            tile_resolution,
            background,
            grid,
            purge_isolated,
            cache,
        } => {
            commands::build::execute(
                &config,
                input,
                output,
                zoom,
                tile_resolution,
                background,
                grid,
                purge_isolated,
                cache,
                cli.quiet,
            )?;
        }

        Commands::Edit {
            map,
            markers,
            clip,
            width,
            height,
            resize,
            out,
        } => {
            commands::edit::execute(&config, map, markers, clip, width, height, resize, out, cli.quiet)?;
        }

        Commands::Info { map } => {
            commands::info::execute(map)?;
        }

        Commands::Config => {
            print!("{}", Config::example_toml()?);
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
