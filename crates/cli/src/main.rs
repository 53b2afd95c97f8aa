use anyhow::Result;
use clap::Parser;
use env_logger::{Env, init_from_env};
use quillwort_cli::cli::Cli;

fn main() -> Result<()> {
    init_from_env(Env::default().default_filter_or("info"));
    Cli::parse().command.run()
}
