//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. The
//! helpers here are shared by every export command.

/// `gif` and `trim`: range-based exports of a video.
pub mod clip;
/// `photo`: brightness and width adjustment of an image.
pub mod photo;
/// `probe`: media information for a file.
pub mod probe;

use crate::cli::{GlobalArgs, OutputArgs};
use crate::error::{CliErrorContext, CliResult};
use crate::progress::TerminalProgressHandler;
use clipforge_core::{
    ClipPipeline, ClipRequest, CoreConfig, CoreConfigBuilder, Delivery, DeliveryStrategy,
    DownloadTrigger, EngineAdapter, EventDispatcher, FileLoggingHandler, JsonProgressHandler,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Canonicalizes the input path and checks that it is a file.
pub fn validate_input_path(input: &Path) -> CliResult<PathBuf> {
    let path = input
        .canonicalize()
        .cli_with_context(|| format!("Invalid input path '{}'", input.display()))?;
    if !path.is_file() {
        return Err(clipforge_core::CoreError::OperationFailed(format!(
            "Invalid input path '{}': not a file",
            input.display()
        )));
    }
    Ok(path)
}

/// Builds the core configuration from global and output options.
pub fn build_config(globals: &GlobalArgs, output: &OutputArgs) -> CliResult<CoreConfig> {
    let delivery = if output.data_url {
        DeliveryStrategy::DataUrl
    } else {
        DeliveryStrategy::File
    };
    let config = CoreConfigBuilder::new()
        .output_dir(output.output_dir.clone())
        .maybe_temp_dir(globals.temp_dir.clone())
        .delivery(delivery)
        .build();
    config.validate()?;

    if delivery == DeliveryStrategy::File {
        std::fs::create_dir_all(&config.output_dir).cli_with_context(|| {
            format!(
                "Failed to create output directory '{}'",
                config.output_dir.display()
            )
        })?;
    }
    Ok(config)
}

/// Event handlers matching the global options.
pub fn build_dispatcher(globals: &GlobalArgs) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    if globals.progress_json {
        dispatcher.add_handler(Arc::new(JsonProgressHandler::new()));
    } else if std::io::stderr().is_terminal() {
        dispatcher.add_handler(Arc::new(TerminalProgressHandler::new()));
    }
    if globals.log_file.is_some() {
        dispatcher.add_handler(Arc::new(FileLoggingHandler::new()));
    }
    dispatcher
}

/// Exports `request` and delivers the artifact through `trigger`.
pub fn run_export<E: EngineAdapter>(
    pipeline: &ClipPipeline<E>,
    request: &ClipRequest,
    trigger: &dyn DownloadTrigger,
) -> CliResult<Delivery> {
    log::info!("{}: {}", request.mode(), request.source.describe());
    let delivery = pipeline.export_and_deliver(request, trigger)?;
    if let Delivery::Saved(path) = &delivery {
        log::info!("Saved {}", path.display());
    }
    Ok(delivery)
}
