#![forbid(unsafe_code)]

use clap::Parser;
use keyplate_planner::{Args, run};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(error) = run(&args) {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
