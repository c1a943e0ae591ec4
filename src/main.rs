use anyhow::{Context, Error};
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde_json::to_string_pretty;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use headnote::actions::{
    Action, CheckAction, DescribeAction, JavaTopAction, ListAction, ReformatAction,
    RelicenseAction, RelicenseMode, StripBlankAction, XmlTopAction, load_reference_license,
};
use headnote::cli::{Cli, Command};
use headnote::models::{
    ExtraData, FileReport, Header, OUTPUT_FORMAT_VERSION, Output, SystemEnvironment,
};
use headnote::scanner::{ProcessResult, count, process};
use headnote::utils::file::{
    DEFAULT_EXCLUDES, compile_exclude_patterns, read_excludes_file, resolve_against,
};

fn main() -> std::io::Result<()> {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Utc::now();

    let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    excludes.extend(cli.exclude.iter().cloned());
    if let Some(excludes_file) = &cli.excludes_file {
        excludes.extend(read_excludes_file(&resolve_against(&cli.dir, excludes_file))?);
    }
    info!("Traversed tree: {}", cli.dir.display());
    info!("Exclusion patterns: {:?}", excludes);
    let exclude_patterns = compile_exclude_patterns(&excludes);

    let action = create_action(&cli.command, &cli.dir)?;

    let (total_files, total_dirs, excluded_count) =
        count(&cli.dir, cli.max_depth, &exclude_patterns)
            .with_context(|| format!("Could not read {}", cli.dir.display()))?;
    info!(
        "Found {} files in {} directories ({} items excluded)",
        total_files, total_dirs, excluded_count
    );

    let progress_bar = create_progress_bar(total_files, cli.quiet);
    let scan_result = process(
        &cli.dir,
        cli.max_depth,
        Arc::clone(&progress_bar),
        &exclude_patterns,
        action.as_ref(),
    )?;
    progress_bar.finish_and_clear();

    print_findings(&scan_result.files, cli.verbose > 0);

    if let Some(output_file) = &cli.output {
        let end_time = Utc::now();
        let output = create_output(
            action.name(),
            start_time,
            end_time,
            scan_result,
            total_dirs,
        );
        write_output(output_file, &output)?;
        info!("JSON output written to {}", output_file);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn create_action(command: &Command, root: &Path) -> Result<Box<dyn Action>, Error> {
    let action: Box<dyn Action> = match command {
        Command::Describe => Box::new(DescribeAction),
        Command::List => Box::new(ListAction),
        Command::Check(license) => {
            let path = resolve_against(root, &license.license_file);
            Box::new(CheckAction::new(load_reference_license(
                &path,
                &license.license_type,
            )?))
        }
        Command::Relicense {
            license,
            existing_only,
            new_only,
        } => {
            let mode = RelicenseMode {
                existing: *existing_only,
                new: *new_only,
            };
            let path = resolve_against(root, &license.license_file);
            Box::new(RelicenseAction::new(
                load_reference_license(&path, &license.license_type)?,
                mode,
            )?)
        }
        Command::Reformat => Box::new(ReformatAction),
        Command::StripBlank => Box::new(StripBlankAction),
        Command::JavaTop { license_on_top } => Box::new(JavaTopAction::new(*license_on_top)),
        Command::XmlTop => Box::new(XmlTopAction),
    };
    Ok(action)
}

fn create_progress_bar(total_files: usize, quiet: bool) -> Arc<ProgressBar> {
    if quiet {
        return Arc::new(ProgressBar::hidden());
    }

    let progress_bar = ProgressBar::new(total_files as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files processed ({eta})",
    ) {
        progress_bar.set_style(style.progress_chars("#>-"));
    }
    Arc::new(progress_bar)
}

fn print_findings(files: &[FileReport], verbose: bool) {
    for file in files {
        for finding in &file.findings {
            if verbose || !finding.is_verbose_only() {
                println!("{}: {}", file.path, finding);
            }
        }
        for error in &file.scan_errors {
            eprintln!("{}: {}", file.path, error);
        }
    }
}

fn create_output(
    action: &str,
    start_time: chrono::DateTime<Utc>,
    end_time: chrono::DateTime<Utc>,
    scan_result: ProcessResult,
    total_dirs: usize,
) -> Output {
    let duration = (end_time - start_time).num_nanoseconds().unwrap_or(0) as f64 / 1_000_000_000.0;

    let extra_data = ExtraData {
        files_count: scan_result.files.len(),
        directories_count: total_dirs,
        excluded_count: scan_result.excluded_count,
        modified_count: scan_result.files.iter().filter(|file| file.modified).count(),
        system_environment: SystemEnvironment::current(),
    };

    // Collect all scan errors from individual files
    let errors: Vec<String> = scan_result
        .files
        .iter()
        .flat_map(|file| {
            file.scan_errors
                .iter()
                .map(move |error| format!("{}: {}", file.path, error))
        })
        .collect();

    Output {
        headers: vec![Header {
            action: action.to_string(),
            start_timestamp: start_time.to_rfc3339(),
            end_timestamp: end_time.to_rfc3339(),
            duration,
            extra_data,
            errors,
            output_format_version: OUTPUT_FORMAT_VERSION.to_string(),
        }],
        files: scan_result.files,
    }
}

fn write_output(output_file: &str, output: &Output) -> Result<(), Error> {
    let json_output = to_string_pretty(output)?;
    let mut file = File::create(output_file)
        .with_context(|| format!("Could not create output file {}", output_file))?;
    file.write_all(json_output.as_bytes())?;
    Ok(())
}
