use std::path::PathBuf;

use log::{info, warn};

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::merge::Merger;
use crate::{loader, validate, writer};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub services: usize,
    pub paths: usize,
    pub components: usize,
    pub tags: usize,
    pub warnings: usize,
    pub validated: bool,
    pub output: PathBuf,
}

/// Load, merge, validate and write. Nothing is written unless every earlier
/// stage succeeded.
pub fn run(config: &MergeConfig) -> Result<RunSummary, MergeError> {
    info!("loading OpenAPI files from {}", config.input_dir.display());
    let services = loader::load_directory(&config.input_dir)?;

    info!("merging {} OpenAPI files", services.len());
    let outcome = Merger::new(config.envelope.clone()).merge(&services);
    let document = outcome.document;

    if config.validate {
        validate::validate(&document)?;
    } else {
        warn!("validation disabled, writing the merged document unchecked");
    }

    writer::write_output(&config.output, &document)?;

    Ok(RunSummary {
        services: services.len(),
        paths: document.paths.len(),
        components: document.components.len(),
        tags: document.tags.len(),
        warnings: outcome.report.warnings(),
        validated: config.validate,
        output: config.output.clone(),
    })
}
