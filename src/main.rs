use std::process::ExitCode;

use clap::Parser;
use jssp_ga::cli::Args;

fn main() -> ExitCode {
    env_logger::init();
    jssp_ga::cli::run(Args::parse())
}
