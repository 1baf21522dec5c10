use clap::Parser;
use kmeans_lloyd::cli::{self, Cli};
use kmeans_lloyd::observability;

fn main() -> anyhow::Result<()> {
    observability::init()?;
    let args = Cli::parse();
    cli::run(&args)
}
