//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quillwort_core::config::{
    DEFAULT_ICON_ASCENT, DEFAULT_ICON_DESCENT, DEFAULT_ICON_WIDTH, DEFAULT_VERSION,
};

use crate::commands::{build, build_icons, inspect};

#[derive(Parser)]
#[command(name = "quillwort")]
#[command(about = "Compose a programming font from Latin, wide and icon sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct BuildArgs {
    /// Directory source fonts are resolved against
    #[arg(long, default_value = ".")]
    pub src_dir: PathBuf,
    #[arg(long, default_value = "dist")]
    pub dst_dir: PathBuf,
    #[arg(short, long, default_value = DEFAULT_VERSION)]
    pub version: String,
    /// File whose contents become the copyright name record
    #[arg(long)]
    pub copyright_file: Option<PathBuf>,
    #[arg(long)]
    pub license_url: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct IconArgs {
    #[arg(long, default_value = ".")]
    pub src_dir: PathBuf,
    #[arg(long, default_value = "dist")]
    pub dst_dir: PathBuf,
    #[arg(long, default_value_t = DEFAULT_ICON_ASCENT)]
    pub ascent: i32,
    #[arg(long, default_value_t = DEFAULT_ICON_DESCENT)]
    pub descent: i32,
    #[arg(long, default_value_t = DEFAULT_ICON_WIDTH)]
    pub width: i32,
    /// JSON list of glyph sets; the stock icon table when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, default_value = DEFAULT_VERSION)]
    pub version: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one font per parameter file
    Build {
        #[command(flatten)]
        args: BuildArgs,
        /// Parameter files or glob patterns
        #[arg(required = true)]
        params: Vec<String>,
    },
    /// Build the standalone icon font
    BuildIcons {
        #[command(flatten)]
        args: IconArgs,
    },
    /// Print glyph metrics
    Inspect {
        font: PathBuf,
        /// U+XXXX, 0xXXXX or a single character
        #[arg(required = true)]
        codepoints: Vec<String>,
        /// Also measure stem weight at this relative height (0..=1)
        #[arg(long)]
        weight: Option<f64>,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { args, params } => build(&args, &params),
            Commands::BuildIcons { args } => build_icons(&args),
            Commands::Inspect { font, codepoints, weight } => inspect(&font, &codepoints, weight),
        }
    }
}
