mod cli_args;

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::*;

use cli_args::Cli;
use reposcribe_core::{AppError, RuleSet, read_ignore_lines, walk, write_export_file};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);
    log::debug!("CLI args parsed: {:?}", cli_args);

    let quiet = cli_args.quiet;
    let exit_code = match run_app(cli_args, quiet) {
        Ok(code) => code,
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::PatternSyntax { .. }) => 1,
                Some(AppError::Scan { .. }) => 2,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::DirCreation { .. }) => 2,
                Some(_) => 1,
                None => 1,
            };
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<i32> {
    // 1. Resolve and validate the project root.
    let project_root = cli
        .project_dir
        .canonicalize()
        .with_context(|| format!("Project directory not found: {}", cli.project_dir.display()))?;
    if !project_root.is_dir() {
        bail!("'{}' is not a directory.", project_root.display());
    }

    // 2. Resolve the output path, defaulting to ./output/<project>_context.txt.
    let output_path = resolve_output_path(cli.output_file.as_deref(), &project_root)?;
    log::info!("Using output file: {}", output_path.display());

    // 3. Assemble ignore patterns: defaults, then the user's .gitignore.
    let gitignore_path = project_root.join(".gitignore");
    if !quiet {
        eprintln!("Reading ignore rules...");
    }
    let mut pattern_lines = read_ignore_lines(&gitignore_path);

    // Dynamically ignore the output file when it lives inside the
    // scanned root, so a re-run never scribes its own output.
    if let Some(output_rel) = relative_inside(&project_root, &output_path) {
        log::info!("Dynamically ignoring output file: {}", output_rel);
        pattern_lines.push(output_rel);
    }

    let rules = RuleSet::compile(&pattern_lines).context("Error parsing ignore patterns")?;

    // 4. Walk the tree.
    if !quiet {
        eprintln!("Scanning project directory: {}", project_root.display());
    }
    let result = walk(&project_root, &rules).context("Error scanning directory")?;

    if !result.warnings.is_empty() && !quiet {
        eprintln!(
            "\n{}",
            "⚠️ Warning: some directories could not be read:".yellow()
        );
        for warning in &result.warnings {
            eprintln!(" - {}", warning);
        }
        eprintln!("---");
    }

    if result.files.is_empty() {
        println!(
            "{}",
            "No files found to scribe (after applying ignore rules). Nothing to do.".yellow()
        );
        return Ok(0);
    }

    // 5. List the files and confirm.
    println!("\nThe following files will be scribed:");
    for file in &result.files {
        println!("  - {}", file);
    }
    println!("\nTotal files: {}", result.files.len());

    if !cli.yes {
        print!(
            "Proceed with scribing to '{}'? [{}/{}] ",
            output_path.display().to_string().cyan(),
            "y".green(),
            "N".red()
        );
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut response = String::new();
        io::stdin()
            .read_line(&mut response)
            .context("Failed to read user input")?;
        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Scribing cancelled by user.");
            return Ok(0);
        }
    }

    // 6. Write the export file.
    if !quiet {
        eprintln!("\nScribing files to {}...", output_path.display());
    }
    let summary = write_export_file(&output_path, &project_root, &result.files, !cli.no_tree)
        .context("Scribing failed during file writing")?;

    println!(
        "\n{} Successfully scribed content of {} files.",
        "✅".green(),
        summary.file_count
    );
    println!(
        "Total approximate size: {:.2} KB",
        summary.total_bytes as f64 / 1024.0
    );
    println!(
        "Output written to: {}",
        output_path.display().to_string().blue()
    );

    Ok(0)
}

/// Resolves the output path, creating the default `./output` directory
/// when no explicit path was given.
fn resolve_output_path(explicit: Option<&Path>, project_root: &Path) -> Result<PathBuf> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    match explicit {
        Some(path) => {
            let absolute = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            Ok(absolute)
        }
        None => {
            let output_dir = cwd.join("output");
            fs::create_dir_all(&output_dir).map_err(|e| AppError::DirCreation {
                path: output_dir.clone(),
                source: e,
            })?;
            let project_name = project_root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string());
            Ok(output_dir.join(format!("{}_context.txt", project_name)))
        }
    }
}

/// Returns the forward-slash relative path of `path` under `root`, or
/// `None` when `path` lies outside `root`.
fn relative_inside(root: &Path, path: &Path) -> Option<String> {
    let rel = pathdiff::diff_paths(path, root)?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            // Any parent step means the output is outside the root.
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
