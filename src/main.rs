use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use dbreclaim::{
    color_output_available, error_report, load_config, to_set, ArtifactKind,
    DatabaseFileReclaimer, DatabaseFootprint, ReclaimResult,
};
use humansize::{format_size, BINARY};
use std::{
    fs,
    path::{Component, Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Delete a closed embedded database together with its sidecar files",
    long_about = "Deletes each database's primary file, its .management directory and its \
                  .note file. The databases must be closed in every process first."
)]
struct Args {
    /// Primary database files to reclaim
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Directory holding the management sidecar (defaults to the primary file's directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Logical database name used to derive sidecar names (defaults to the primary file name)
    #[arg(long)]
    name: Option<String>,

    /// TOML file overriding the sidecar naming rules
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Show what would be removed, but don't remove anything
    #[arg(long)]
    dry_run: bool,

    /// Show every removed artifact
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "dbreclaim=debug" } else { "dbreclaim=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Make a command-line path absolute without following its final component.
/// The parent directory is canonicalized when it exists; otherwise the path is
/// anchored at the current directory and normalized lexically.
fn absolute_path(path: &Path) -> Result<PathBuf> {
    if let Some(name) = path.file_name() {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if let Ok(parent) = fs::canonicalize(parent) {
            return Ok(parent.join(name));
        }
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        cwd.join(path)
    };
    Ok(normalize_lexically(&absolute))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Sidecar names derive from the path as given; only the primary file (and
/// with it the note file) follows a symlink to the real database.
fn build_footprint(path: &Path, args: &Args) -> Result<DatabaseFootprint> {
    let given = absolute_path(path)?;
    let as_given = DatabaseFootprint::from_primary_path(&given)
        .with_context(|| format!("Invalid database path {}", path.display()))?;

    let root = match &args.root {
        Some(root) => absolute_path(root)?,
        None => as_given.root_directory().to_path_buf(),
    };
    let name = match &args.name {
        Some(name) => name.clone(),
        None => as_given.logical_name().to_string(),
    };
    let primary = fs::canonicalize(&given).unwrap_or(given);

    DatabaseFootprint::new(primary, root, name)
        .with_context(|| format!("Invalid database path {}", path.display()))
}

fn print_plan(footprint: &DatabaseFootprint, planned: &[(ArtifactKind, PathBuf)]) {
    if planned.is_empty() {
        println!(
            "Nothing to reclaim for {}",
            footprint.primary_path().display()
        );
        return;
    }
    for (kind, path) in planned {
        println!("Would remove: {} ({})", path.display(), kind.label().to_lowercase());
    }
}

fn print_outcome(footprint: &DatabaseFootprint, result: &ReclaimResult, verbose: bool) {
    if verbose {
        for path in &result.removed {
            println!("Removed: {}", path.display());
        }
    }

    let primary = footprint.primary_path().display();
    let freed = format_size(result.bytes_freed, BINARY);

    if !result.primary_deleted {
        println!(
            "{}",
            format!("{}: database file could not be deleted", primary)
                .bold()
                .red()
        );
    } else if result.warnings.is_empty() {
        println!("{}", format!("{}: reclaimed ({} freed)", primary, freed).green());
    } else {
        println!(
            "{}",
            format!(
                "{}: reclaimed with {} leftover sidecar(s) ({} freed)",
                primary,
                result.warnings.len(),
                freed
            )
            .yellow()
        );
    }
}

fn reclaim_databases(args: &Args) -> Result<bool> {
    let paths: Vec<PathBuf> = to_set(args.paths.iter().cloned());

    if paths.len() > 1 && (args.root.is_some() || args.name.is_some()) {
        bail!("--root and --name can only be used with a single database path");
    }

    let config = load_config(args.config.as_deref()).context("Failed to load reclaim rules")?;
    let reclaimer = DatabaseFileReclaimer::new(config);

    let mut all_deleted = true;
    let mut total_freed: u64 = 0;

    for path in &paths {
        let footprint = match build_footprint(path, args) {
            Ok(footprint) => footprint,
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), error_report(&err));
                all_deleted = false;
                continue;
            }
        };

        if args.dry_run {
            print_plan(&footprint, &reclaimer.plan(&footprint));
            continue;
        }

        let result = reclaimer.reclaim(&footprint);
        print_outcome(&footprint, &result, args.verbose);

        total_freed += result.bytes_freed;
        all_deleted &= result.primary_deleted;
    }

    if args.dry_run {
        println!("Dry run mode: No files were deleted.");
    } else if paths.len() > 1 {
        println!("========================================");
        println!(
            "Total Size Freed: {}",
            format_size(total_freed, BINARY).bold()
        );
    }

    Ok(all_deleted)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(args.verbose);
    colored::control::set_override(color_output_available());

    let all_deleted = reclaim_databases(&args)?;

    Ok(if all_deleted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
