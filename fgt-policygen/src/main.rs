use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod artifacts;
mod check_cmd;
mod cli;
mod compile_cmd;
mod path_guard;
mod sheet;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compile(args) => compile_cmd::run_compile(args),
        Command::Check(args) => check_cmd::run_check(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
