use clap::Parser;
use log::info;

use hashlayout::{run_comparison, RunConfig};

/// Time hash-map population under two hash-bit layouts and two backends.
#[derive(Parser, Debug)]
#[command(name = "hashlayout", version, about)]
struct Args {
    /// Timed population passes per backend/layout combination.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Keys inserted per pass.
    #[arg(long, default_value_t = 20_000, value_parser = clap::value_parser!(u32).range(1..))]
    elements: u32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let cfg = RunConfig {
        iterations: args.iterations,
        elements: args.elements,
    };
    info!(
        "comparing backends: {} iterations x {} elements",
        cfg.iterations, cfg.elements
    );
    run_comparison(cfg);
}
