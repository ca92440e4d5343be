//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use drawcov::{DEFAULT_HEIGHT, DEFAULT_WIDTH, RasterConfig, RenderOptions, VisitedSource};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "drawcov")]
#[command(about = "Draw coverage maps of a guest's executable memory regions")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Show metrics summary after execution
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    /// Inputs for the default `render` command
    #[command(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one PNG per executable region (default)
    Render {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write per-function coverage to funcov.txt
    Funcov {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Input and output locations shared by all commands.
#[derive(clap::Args, Clone, Debug)]
pub struct InputArgs {
    /// Guest directory containing mapinfo and syms [default: guest-last, with
    /// visited ranges read from stdin]. A directory named like a subcommand
    /// must be given as a path, e.g. ./render
    #[arg(value_name = "GUESTPATH")]
    pub guest: Option<PathBuf>,

    /// Visited ranges file, START-END per line ("-" for stdin)
    #[arg(short = 'v', long = "visited-file", value_name = "FILE")]
    pub visited_file: Option<PathBuf>,

    /// Instruction address trace, one address per line ("-" for stdin)
    #[arg(short = 'i', long = "insaddr-file", value_name = "FILE")]
    pub insaddr_file: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,
}

impl InputArgs {
    /// Build run options, choosing the visited source.
    pub fn to_options(&self) -> drawcov::Result<RenderOptions> {
        let visited = VisitedSource::select(
            self.visited_file.as_deref(),
            self.insaddr_file.as_deref(),
            self.guest.as_deref(),
        )?;
        let mut options = RenderOptions::new()
            .with_visited(visited)
            .with_output_dir(&self.output_dir)
            .with_raster(RasterConfig::new().with_size(self.width, self.height));
        if let Some(guest) = &self.guest {
            options = options.with_guest_dir(guest);
        }
        Ok(options)
    }
}
