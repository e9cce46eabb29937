//! Command implementations

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::app::container::AppContainer;
use crate::app::inspect_interactor::InspectRequest;
use crate::app::library_interactor::LibraryOptions;
use crate::cli::args::{ConvertArgs, InspectArgs, JoinArgs, LibraryArgs};
use crate::engine::ConvertOutcome;
use crate::error::TubizeError;
use crate::utils::{format_duration, format_file_size};

/// Execute the library command
pub async fn library(
    container: &dyn AppContainer,
    args: LibraryArgs,
    options: LibraryOptions,
) -> Result<()> {
    info!("Starting library operation");
    info!("Input: {}", args.input.display());

    if !args.input.is_dir() {
        return Err(TubizeError::InvalidEntryPath {
            path: args.input.display().to_string(),
            message: "expected an existing directory".to_string(),
        }
        .into());
    }

    let interactor = container.library_interactor(options);

    let missing = interactor.missing_dependencies().await;
    if let Some((tool, e)) = missing.first() {
        for (tool, e) in &missing {
            error!("Required tool {} is unavailable: {}", tool, e);
        }
        return Err(TubizeError::MissingDependency {
            tool: tool.to_string(),
            message: e.to_string(),
        }
        .into());
    }

    let report = interactor
        .build_library(&args.input)
        .await
        .context("Failed to build library")?;

    info!(
        "Library done: {} videos, {} updated, catalog {}",
        report.assets,
        report.updated,
        if report.catalog.written { "written" } else { "unchanged" }
    );
    println!(
        "{} videos ({} updated), {} total, {}",
        report.assets,
        report.updated,
        format_duration(report.catalog.stats.total_duration),
        format_file_size(report.catalog.stats.total_file_size)
    );
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(container: &dyn AppContainer, args: InspectArgs) -> Result<()> {
    info!("Starting inspect operation");
    info!("Input: {}", args.input.display());

    if !args.input.is_file() {
        return Err(TubizeError::InvalidEntryPath {
            path: args.input.display().to_string(),
            message: "input file does not exist".to_string(),
        }
        .into());
    }

    let response = container
        .inspect_interactor()
        .execute(InspectRequest::with_format(&args.input, &args.format))
        .await
        .context("Failed to inspect input file")?;

    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Execute the convert command
pub async fn convert(container: &dyn AppContainer, args: ConvertArgs) -> Result<()> {
    info!("Starting convert operation");
    info!("Input: {}", args.input.display());

    let outcomes = container
        .batch_interactor()
        .convert(&args.input, &args.ext)
        .await
        .context("Failed to convert")?;

    for outcome in &outcomes {
        match outcome {
            ConvertOutcome::Converted(path) => println!("converted {}", path.display()),
            ConvertOutcome::AlreadyExists(path) => println!("exists    {}", path.display()),
            ConvertOutcome::Unsupported(ext) => warn!("Unsupported extension: {}", ext),
        }
    }
    Ok(())
}

/// Execute the join command
pub async fn join(container: &dyn AppContainer, args: JoinArgs) -> Result<()> {
    info!("Starting join operation");
    info!("Input: {}", args.input.display());

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let outputs = container
        .batch_interactor()
        .join(&args.input, &args.prefix, &args.output_dir)
        .await
        .context("Failed to join")?;

    for output in &outputs {
        println!("{}", output.display());
    }
    info!("Join operation completed: {} segments", outputs.len());
    Ok(())
}
