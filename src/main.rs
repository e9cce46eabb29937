//! tubize video library previewer
//!
//! # Usage
//!
//! ```bash
//! tubize library -i ~/Videos --scene 350 -w 200
//! tubize inspect -i clip.mp4 --format json
//! tubize convert -i raw/ -x avi
//! tubize join -i raw/ --prefix cam
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use tubize::app::container::DefaultAppContainer;
use tubize::cli::{commands, Cli, Commands};
use tubize::config_initialization::initialize_configuration_hierarchy;
use tubize::error::exit_code_for;
use tubize::utils::logging::init_logging;

/// Main entry point for the tubize CLI application
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let base_dir = std::env::current_dir()?;
    let settings = initialize_configuration_hierarchy(&cli, &base_dir, |name| std::env::var(name).ok())?;
    init_logging(&settings.log_level, cli.json_logs)?;

    info!("Starting tubize {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &settings.config_file {
        info!("Loaded configuration from {}", path.display());
    }
    debug!("Effective settings: {:?}", settings);

    let container = DefaultAppContainer::new()?;
    let options = settings.library_options(&cli);

    info!("Executing {} command", cli.command.name());
    match cli.command {
        Commands::Library(args) => commands::library(&container, args, options).await?,
        Commands::Inspect(args) => commands::inspect(&container, args).await?,
        Commands::Convert(args) => commands::convert(&container, args).await?,
        Commands::Join(args) => commands::join(&container, args).await?,
    }

    info!("tubize completed successfully");
    Ok(())
}
