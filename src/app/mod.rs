// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Command-line surface: argument parsing and dispatch to the packing core.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{Config, Settings};
use crate::logic::archiver;
use crate::logic::folders::find_exercise_folders;
use crate::logic::numbers::{extract_numbers, sole_number};
use crate::logic::pack::{ArchiveBuilder, BatchPolicy, PackRequest};
use crate::models::exercise::Selection;

#[derive(Debug, Parser)]
#[command(name = "sheetpack", version)]
#[command(about = "Find exercise solution folders and pack them into submission archives")]
pub struct Cli {
    /// Config file (defaults to $SHEETPACK_CONFIG, then <root>/sheetpack.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List exercise folders below a root directory
    Find {
        root: PathBuf,
        /// Only these exercise numbers
        #[arg(short = 'n', long = "number", num_args = 1..)]
        numbers: Vec<u32>,
        /// Only the folder with the highest exercise number
        #[arg(long)]
        newest: bool,
        /// Print JSON instead of one path per line
        #[arg(long)]
        json: bool,
    },
    /// Extract matriculation numbers from archive file names
    Ids {
        root: PathBuf,
        /// Keep repeated values
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Build one archive per selected exercise folder
    Pack(PackArgs),
}

#[derive(Debug, Args)]
pub struct PackArgs {
    pub root: PathBuf,
    /// Pack these exercise numbers
    #[arg(short = 'n', long = "number", num_args = 1.., conflicts_with = "all_sheets")]
    pub numbers: Vec<u32>,
    /// Pack every exercise folder (default: only the newest)
    #[arg(long)]
    pub all_sheets: bool,
    /// Do not add the note file
    #[arg(long)]
    pub no_note: bool,
    /// File-name globs or extensions to include (default: everything)
    #[arg(long, num_args = 1..)]
    pub include: Vec<String>,
    /// File-name globs or extensions to exclude (default: built archives)
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,
    /// Matriculation number used in archive names (digits, kept verbatim)
    #[arg(long, conflicts_with = "detect_id", value_parser = parse_identifier)]
    pub id: Option<String>,
    /// Take the matriculation number from existing archives under the root
    #[arg(long)]
    pub detect_id: bool,
    /// Continue with remaining folders when one fails
    #[arg(long)]
    pub keep_going: bool,
    #[arg(long)]
    pub json: bool,
}

/// Accept ASCII digits only; leading zeros are part of the identifier.
fn parse_identifier(value: &str) -> Result<String, String> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(format!("`{value}` is not a matriculation number (digits only)"))
    }
}

/// Run the parsed command; returns the process exit code.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Find {
            root,
            numbers,
            newest,
            json,
        } => {
            let settings = load_settings(config_path, &root)?;
            let wanted = (!numbers.is_empty()).then(|| numbers.iter().copied().collect());
            let folders =
                find_exercise_folders(&root, &settings.folder_pattern, wanted.as_ref(), newest)
                    .with_context(|| format!("Failed to list exercise folders in {:?}", root))?;

            let lines: Vec<String> = folders.iter().map(|f| f.path.display().to_string()).collect();
            emit(json, &folders, &lines)?;
        }
        Commands::Ids { root, all, json } => {
            let settings = load_settings(config_path, &root)?;
            let values = extract_numbers(
                &root,
                &settings.archive_pattern,
                &settings.archive_extension,
                all,
            )
            .with_context(|| format!("Failed to extract identifiers under {:?}", root))?;

            emit(json, &values, &values)?;
        }
        Commands::Pack(args) => return pack(config_path, args),
    }
    Ok(ExitCode::SUCCESS)
}

fn pack(config_path: Option<&Path>, args: PackArgs) -> Result<ExitCode> {
    let settings = load_settings(config_path, &args.root)?;

    let identifier = if args.detect_id {
        let id = sole_number(
            &args.root,
            &settings.archive_pattern,
            &settings.archive_extension,
        )
        .context("Failed to detect matriculation number")?;
        tracing::info!(id = %id, "detected matriculation number");
        Some(id)
    } else {
        args.id
    };

    let request = PackRequest {
        selection: Selection::from_args(&args.numbers, args.all_sheets),
        include: args.include,
        exclude: args.exclude,
        no_note: args.no_note,
        identifier,
        policy: if args.keep_going {
            BatchPolicy::KeepGoing
        } else {
            BatchPolicy::StopOnError
        },
    };

    let archiver = archiver::from_config(&settings.archiver);
    let report = ArchiveBuilder::new(&settings, archiver.as_ref())
        .build(&args.root, &request)
        .with_context(|| format!("Failed to pack exercises in {:?}", args.root))?;

    if args.json {
        emit(true, &report, &[])?;
    }
    for failure in &report.failures {
        tracing::error!(folder = %failure.folder.name, "{}", failure.error);
    }
    tracing::info!(
        built = report.built.len(),
        failed = report.failures.len(),
        "pack finished"
    );

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_settings(config_path: Option<&Path>, root: &Path) -> Result<Settings> {
    let config = Config::discover(config_path, root).context("Failed to load configuration")?;
    config
        .resolve(root)
        .context("Invalid configuration")
}

/// Print `value` as JSON, or `lines` one per line.
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, lines: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, value).context("Failed to serialize output")?;
        writeln!(out)?;
    } else {
        for line in lines {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
