// This is the command-line entry point for the AVIF batch converter.
// The library crate carries all conversion logic; this file only parses
// arguments, wires up logging and prints results.

use std::path::PathBuf;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use avif_batch_lib::commands::{
    convert_directory,
    convert_image,
    image_info,
    list_outputs,
    package_outputs,
    supported_formats,
};
use avif_batch_lib::core::{AppConfig, AppState, BatchProgress, OutcomeStatus};
use avif_batch_lib::packaging::DEFAULT_ARCHIVE_NAME;
use avif_batch_lib::processing::CancelHandle;
use avif_batch_lib::utils::format_bytes;

#[derive(Parser, Debug)]
#[command(name = "avif-batch", version, about = "Batch convert images to AVIF")]
struct Cli {
    /// JSON settings file; command-line flags take precedence
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single image
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Convert every supported image under a directory
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[command(flatten)]
        tuning: Tuning,
        /// Number of concurrent conversions (1-8)
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Stop starting new conversions after this many seconds
        #[arg(long, value_name = "SECS")]
        deadline: Option<u64>,
        /// Also write a ZIP of the outputs to this path
        #[arg(long, value_name = "ZIP")]
        zip: Option<PathBuf>,
    },
    /// Print dimensions, format and color mode of an image
    Probe { path: PathBuf },
    /// List converted files under an output directory
    Manifest { output_dir: PathBuf },
    /// Pack converted files into a ZIP archive
    Package {
        output_dir: PathBuf,
        /// Destination of the archive
        #[arg(default_value = DEFAULT_ARCHIVE_NAME)]
        zip_path: PathBuf,
    },
    /// List supported input and output formats
    Formats,
}

#[derive(Args, Debug)]
struct Tuning {
    /// AVIF quality (1-100)
    #[arg(short, long)]
    quality: Option<u32>,
    /// Encoder effort (1 = best compression, 10 = fastest)
    #[arg(short, long)]
    speed: Option<u32>,
    /// Per-image timeout in seconds, 0 disables it
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Node.js executable
    #[arg(long, env = "AVIF_BATCH_NODE")]
    node: Option<PathBuf>,
    /// Encoder sidecar script
    #[arg(long, env = "AVIF_BATCH_SCRIPT")]
    script: Option<PathBuf>,
}

impl Tuning {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(quality) = self.quality {
            config.conversion.quality = quality;
        }
        if let Some(speed) = self.speed {
            config.conversion.speed = speed;
        }
        if let Some(timeout) = self.timeout {
            config.encoder.timeout_secs = timeout;
        }
        if let Some(node) = &self.node {
            config.encoder.node_path = node.clone();
        }
        if let Some(script) = &self.script {
            config.encoder.script_path = script.clone();
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

fn print_progress(progress: &BatchProgress) {
    let status = match progress.status {
        OutcomeStatus::Converted => "ok",
        OutcomeStatus::Failed => "failed",
        OutcomeStatus::Cancelled => "cancelled",
    };
    eprintln!(
        "[{:>3}%] {}/{} {} ({})",
        progress.progress_percentage,
        progress.completed_tasks,
        progress.total_tasks,
        progress.current_file,
        status
    );
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::load(cli.config.as_deref()).context("Failed to load settings")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("Parsed arguments: {:?}", cli);

    match &cli.command {
        Command::Convert { input, output, tuning } => {
            let mut config = load_config(&cli)?;
            tuning.apply(&mut config);
            let state = AppState::new(config).context("Invalid settings")?;

            let outcome = convert_image(&state, input, output).await;
            if cli.json {
                print_json(&outcome)?;
            } else if outcome.success() {
                println!(
                    "{} -> {} ({} -> {})",
                    input.display(),
                    output.display(),
                    format_bytes(outcome.original_size_bytes),
                    format_bytes(outcome.converted_size_bytes),
                );
            }
            if !outcome.success() {
                bail!(
                    "Conversion of {} failed: {}",
                    input.display(),
                    outcome.error_message.as_deref().unwrap_or("unknown error")
                );
            }
        }
        Command::Batch { input_dir, output_dir, tuning, concurrency, deadline, zip } => {
            let mut config = load_config(&cli)?;
            tuning.apply(&mut config);
            if let Some(concurrency) = concurrency {
                config.batch.concurrency = *concurrency;
            }
            if let Some(deadline) = deadline {
                config.batch = config.batch.clone().with_deadline(std::time::Duration::from_secs(*deadline));
            }
            let state = AppState::new(config).context("Invalid settings")?;

            let cancel = CancelHandle::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, finishing in-flight conversions");
                    ctrl_c.cancel();
                }
            });

            let reporter = |progress: &BatchProgress| {
                if !cli.json {
                    print_progress(progress);
                }
            };
            let run = convert_directory(&state, input_dir, output_dir, &reporter, &cancel)
                .await
                .with_context(|| format!("Batch conversion of {} failed", input_dir.display()))?;

            if let Some(zip_path) = zip {
                match package_outputs(output_dir).await.context("Failed to build archive")? {
                    Some(archive) => {
                        let entries = archive.entry_count();
                        archive
                            .deliver_to(zip_path)
                            .with_context(|| format!("Failed to write {}", zip_path.display()))?;
                        info!("Wrote {} ({} files)", zip_path.display(), entries);
                    }
                    None => warn!("No converted files to package"),
                }
            }

            if cli.json {
                print_json(&run)?;
            } else {
                println!("{}", run.report);
            }
            if run.report.success_count == 0 && run.report.total_count > 0 {
                bail!("No images were converted");
            }
        }
        Command::Probe { path } => {
            let info = image_info(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if cli.json {
                print_json(&info)?;
            } else {
                println!(
                    "{}: {}x{} {} {} ({})",
                    path.display(),
                    info.width,
                    info.height,
                    info.format,
                    info.color_mode,
                    format_bytes(info.size_bytes)
                );
            }
        }
        Command::Manifest { output_dir } => {
            let listing = list_outputs(output_dir).await.context("Failed to list outputs")?;
            if cli.json {
                print_json(&listing)?;
            } else {
                for entry in &listing.manifest {
                    println!("{:>10}  {}", format_bytes(entry.size_bytes), entry.relative_path);
                }
                match &listing.summary {
                    Some(summary) => println!(
                        "{} files, {} in {} directories",
                        summary.file_count,
                        format_bytes(summary.total_size_bytes),
                        summary.directory_count
                    ),
                    None => println!("No converted files in {}", output_dir.display()),
                }
            }
        }
        Command::Package { output_dir, zip_path } => {
            let Some(archive) = package_outputs(output_dir).await.context("Failed to build archive")? else {
                bail!("No converted files in {}", output_dir.display());
            };
            let entries = archive.entry_count();
            let size = archive.size_bytes();
            archive
                .deliver_to(zip_path)
                .with_context(|| format!("Failed to write {}", zip_path.display()))?;
            println!("{} ({} files, {})", zip_path.display(), entries, format_bytes(size));
        }
        Command::Formats => {
            let formats = supported_formats();
            if cli.json {
                print_json(&formats)?;
            } else {
                println!("Input:  {}", formats.input.join(", "));
                println!("Output: {}", formats.output.join(", "));
            }
        }
    }

    Ok(())
}
