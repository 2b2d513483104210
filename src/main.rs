use clap::Parser;
use hazard_points::region::{config::Config, select::select_points};
use std::path::PathBuf;

/// Select the hazard points inside the Norway bounding box and write them to a smaller GeoJSON file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to an optional YAML config file.
    #[arg(short, long)]
    config_filepath: Option<PathBuf>,

    /// Directory holding the input file and receiving the output file. Takes precedence over the
    /// config file.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let mut config = match &args.config_filepath {
        Some(config_filepath) => Config::load(config_filepath)?,
        None => Config::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    log::debug!("{:?}", config);

    let summary = select_points(&config)?;
    log::debug!("{:?}", summary);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
