//! CLI command definitions for hiertt-forge.
//!
//! Each subcommand is a single bounded pass over a dataset file: read it,
//! transform it, write the result, print a short summary (JSON with `--json`).

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ForgeConfig;
use crate::dataset::{load_examples, load_records, renumber_uids, save_records};
use crate::grp::{build_grp, write_grp};
use crate::tables::TableExporter;

/// MultiHiertt dataset tooling.
#[derive(Parser, Debug)]
#[command(name = "hiertt-forge")]
#[command(about = "Export MultiHiertt tables to XLSX and build GRP task files")]
#[command(version)]
#[command(
    long_about = "hiertt-forge turns MultiHiertt-style JSON records into per-table XLSX workbooks and flat GRP task files.\n\nExample usage:\n  hiertt-forge convert-tables --src lightning_modules/datasets/test.json --out extracted_xlsx/test\n  hiertt-forge build-grp --src lightning_modules/datasets/train.json --out train_GRP.json"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Write every HTML table of every record to `<out>/<uid>/table{n}.xlsx`.
    ConvertTables(ConvertTablesArgs),

    /// Same as `convert-tables --with-descriptions`.
    #[command(name = "convert-tables-desc")]
    ConvertTablesDesc(ConvertPathsArgs),

    /// Build a GRP task JSON pointing at previously exported workbooks.
    #[command(name = "build-grp", alias = "grp")]
    BuildGrp(BuildGrpArgs),

    /// Rewrite record uids to the sequence "1".."N".
    #[command(name = "renumber-uids", alias = "renumber")]
    RenumberUids(RenumberArgs),
}

/// Source and destination for table export.
#[derive(Parser, Debug)]
pub struct ConvertPathsArgs {
    /// Source dataset JSON (e.g. lightning_modules/datasets/test.json).
    #[arg(long)]
    pub src: PathBuf,

    /// Output directory for the XLSX files.
    #[arg(long)]
    pub out: PathBuf,

    /// Print the export summary as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `hiertt-forge convert-tables`.
#[derive(Parser, Debug)]
pub struct ConvertTablesArgs {
    #[command(flatten)]
    pub paths: ConvertPathsArgs,

    /// Add a `description` sheet with the text following each `## Table k ##` marker.
    #[arg(long)]
    pub with_descriptions: bool,
}

/// Arguments for `hiertt-forge build-grp`.
///
/// Unset options fall back to `HIERTT_*` environment variables, then to
/// built-in defaults.
#[derive(Parser, Debug)]
pub struct BuildGrpArgs {
    /// Source dataset JSON.
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Directory holding the per-record workbook folders.
    #[arg(long)]
    pub xlsx_dir: Option<PathBuf>,

    /// Output GRP JSON file.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Prefix of per-record workbook folders (e.g. "Train_").
    #[arg(long)]
    pub folder_prefix: Option<String>,

    /// Prefix of the emitted task ids (e.g. "Test ").
    #[arg(long)]
    pub task_prefix: Option<String>,

    /// Word limit for titles taken from the first paragraph.
    #[arg(long)]
    pub title_words: Option<usize>,

    /// Print the summary as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `hiertt-forge renumber-uids`.
#[derive(Parser, Debug)]
pub struct RenumberArgs {
    /// Source dataset JSON.
    #[arg(long)]
    pub input: PathBuf,

    /// Destination; defaults to rewriting the input in place.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments without executing.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::ConvertTables(args) => run_convert_command(args.paths, args.with_descriptions),
        Commands::ConvertTablesDesc(args) => run_convert_command(args, true),
        Commands::BuildGrp(args) => run_build_grp_command(args),
        Commands::RenumberUids(args) => run_renumber_command(args),
    }
}

// ============================================================================
// Table export
// ============================================================================

#[derive(Debug, Serialize)]
struct ConvertOutput {
    status: String,
    source: PathBuf,
    destination: PathBuf,
    with_descriptions: bool,
    examples: usize,
    workbooks_written: usize,
    tables_skipped: usize,
}

fn run_convert_command(args: ConvertPathsArgs, with_descriptions: bool) -> anyhow::Result<()> {
    let examples = load_examples(&args.src)
        .with_context(|| format!("Failed to load examples from {}", args.src.display()))?;
    info!(
        examples = examples.len(),
        src = %args.src.display(),
        with_descriptions,
        "Converting tables"
    );

    let exporter = TableExporter::new(&args.out).with_descriptions(with_descriptions);
    let summary = exporter
        .export_all(&examples)
        .with_context(|| format!("Failed to export tables to {}", args.out.display()))?;

    let output = ConvertOutput {
        status: if summary.workbooks_written > 0 {
            "success".to_string()
        } else {
            "empty".to_string()
        },
        source: args.src,
        destination: summary.output_dir,
        with_descriptions,
        examples: summary.examples,
        workbooks_written: summary.workbooks_written,
        tables_skipped: summary.tables_skipped,
    };

    if args.json {
        return print_json(&output);
    }

    if output.status == "empty" {
        warn!("No workbooks were written to {}", output.destination.display());
    }
    println!(
        "Wrote {} workbooks for {} examples to {} ({} tables skipped)",
        output.workbooks_written,
        output.examples,
        output.destination.display(),
        output.tables_skipped
    );
    Ok(())
}

// ============================================================================
// GRP generation
// ============================================================================

#[derive(Debug, Serialize)]
struct BuildGrpOutput {
    status: String,
    source: PathBuf,
    xlsx_dir: PathBuf,
    output: PathBuf,
    entries: usize,
    entries_with_spreadsheets: usize,
}

/// Layers the `build-grp` flags over `config`.
fn resolve_grp_config(
    args: &BuildGrpArgs,
    mut config: ForgeConfig,
) -> anyhow::Result<ForgeConfig> {
    if let Some(src) = &args.src {
        config.dataset_path = src.clone();
    }
    if let Some(dir) = &args.xlsx_dir {
        config.xlsx_dir = dir.clone();
    }
    if let Some(out) = &args.out {
        config.grp_output = out.clone();
    }
    if let Some(prefix) = &args.folder_prefix {
        config.folder_prefix = prefix.clone();
    }
    if let Some(prefix) = &args.task_prefix {
        config.task_id_prefix = prefix.clone();
    }
    if let Some(words) = args.title_words {
        config.title_max_words = words;
    }

    config.validate()?;
    Ok(config)
}

fn run_build_grp_command(args: BuildGrpArgs) -> anyhow::Result<()> {
    let base = ForgeConfig::from_env().context("Invalid HIERTT_* environment")?;
    let config = resolve_grp_config(&args, base)?;

    let examples = load_examples(&config.dataset_path).with_context(|| {
        format!(
            "Failed to load examples from {}",
            config.dataset_path.display()
        )
    })?;

    let entries = build_grp(&examples, &config)?;
    write_grp(&entries, &config.grp_output)
        .with_context(|| format!("Failed to write {}", config.grp_output.display()))?;

    let output = BuildGrpOutput {
        status: "success".to_string(),
        source: config.dataset_path,
        xlsx_dir: config.xlsx_dir,
        output: config.grp_output,
        entries: entries.len(),
        entries_with_spreadsheets: entries
            .iter()
            .filter(|e| !e.spreadsheets.is_empty())
            .count(),
    };

    if args.json {
        return print_json(&output);
    }

    if output.entries > 0 && output.entries_with_spreadsheets == 0 {
        warn!(
            "No spreadsheets matched under {}; was convert-tables run first?",
            output.xlsx_dir.display()
        );
    }
    println!(
        "Wrote {} GRP entries ({} with spreadsheets) to {}",
        output.entries,
        output.entries_with_spreadsheets,
        output.output.display()
    );
    Ok(())
}

// ============================================================================
// Uid renumbering
// ============================================================================

#[derive(Debug, Serialize)]
struct RenumberOutput {
    status: String,
    input: PathBuf,
    output: PathBuf,
    in_place: bool,
    renumbered: usize,
}

fn run_renumber_command(args: RenumberArgs) -> anyhow::Result<()> {
    let output_path = args.output.clone().unwrap_or_else(|| args.input.clone());

    let mut records = load_records(&args.input)
        .with_context(|| format!("Failed to load records from {}", args.input.display()))?;
    let renumbered = renumber_uids(&mut records);
    save_records(&records, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!(renumbered, output = %output_path.display(), "Renumbered uids");

    let output = RenumberOutput {
        status: "success".to_string(),
        in_place: output_path == args.input,
        input: args.input,
        output: output_path,
        renumbered,
    };

    if args.json {
        return print_json(&output);
    }

    println!(
        "Renumbered {} records into {}",
        output.renumbered,
        output.output.display()
    );
    Ok(())
}

fn print_json<T: Serialize>(output: &T) -> anyhow::Result<()> {
    let json_output = serde_json::to_string_pretty(output)
        .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
    println!("{}", json_output);
    Ok(())
}
