use clap::Parser;

use hsw::cli::{self, Args};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    cli::run(args)?;

    Ok(())
}
