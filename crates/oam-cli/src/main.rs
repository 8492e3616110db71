use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use oam_core::config::{self, CONFIG_FILE_NAME, MergeConfig};
use oam_core::error::{MergeError, ValidationError};
use oam_core::{loader, pipeline, validate};

#[derive(Parser)]
#[command(
    name = "oam",
    about = "Merge per-service OpenAPI documents into one mock server spec",
    version
)]
struct Cli {
    /// Verbose output, providing step-by-step details of the merge
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every spec in a directory into one unified document
    Merge {
        /// Directory containing the OpenAPI files (*.yml, *.yaml, *.json)
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        /// Output file for the unified specification (.json for JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip validation of the merged document
        #[arg(long)]
        no_validate: bool,
    },

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new oam configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Merge {
            input_dir,
            output,
            no_validate,
        } => cmd_merge(input_dir, output, no_validate),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oam", &mut std::io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Stage-specific exit code if the failure came from the pipeline, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MergeError>())
        .map(MergeError::exit_code)
        .unwrap_or(1)
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<MergeConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let loaded = config::load_config(&config_path)?;
    if loaded.is_some() {
        log::info!("using config {}", config_path.display());
    }
    Ok(loaded)
}

fn print_violations(err: &ValidationError) {
    for violation in &err.violations {
        eprintln!("  {violation}");
    }
}

fn cmd_merge(input_dir: Option<PathBuf>, output: Option<PathBuf>, no_validate: bool) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(input_dir) = input_dir {
        cfg.input_dir = input_dir;
    }
    if let Some(output) = output {
        cfg.output = output;
    }
    if no_validate {
        cfg.validate = false;
    }

    let summary = match pipeline::run(&cfg) {
        Ok(summary) => summary,
        Err(err) => {
            if let MergeError::Validation(ref validation) = err {
                print_violations(validation);
            }
            return Err(err).with_context(|| {
                format!("failed to merge specs from {}", cfg.input_dir.display())
            });
        }
    };

    eprintln!(
        "Merged {} services into {}",
        summary.services,
        summary.output.display()
    );
    eprintln!("  Paths: {}", summary.paths);
    eprintln!("  Components: {}", summary.components);
    eprintln!("  Tags: {}", summary.tags);
    if summary.warnings > 0 {
        eprintln!("  Warnings: {} (run with --verbose for details)", summary.warnings);
    }
    if !summary.validated {
        eprintln!("  Validation was skipped.");
    }
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let document = loader::load_value(&input).map_err(MergeError::from)?;

    if let Err(err) = validate::validate_value(&document) {
        print_violations(&err);
        return Err(MergeError::from(err))
            .with_context(|| format!("{} is not a valid OpenAPI document", input.display()));
    }

    let title = document["info"]["title"].as_str().unwrap_or_default();
    let version = document["openapi"].as_str().unwrap_or_default();
    eprintln!("Valid OpenAPI {version} spec: {title}");
    if let Some(paths) = document["paths"].as_mapping() {
        eprintln!("  Paths: {}", paths.len());
    }
    if let Some(schemas) = document["components"]["schemas"].as_mapping() {
        eprintln!("  Schemas: {}", schemas.len());
    }
    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
