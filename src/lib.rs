//! sortdupe - organize a directory by file type and separate duplicates.
//!
//! Every file below a root directory is moved into a per-extension bucket
//! next to it (`FILE_TYPE_PDF`, `FILE_TYPE_JPG`, ...). The first file seen
//! with a given content and extension is the canonical copy; later copies
//! land in the matching duplicate bucket (`DUPLICATES_PDF`, ...).
//!
//! The library entry points are [`organizer::Organizer`] for embedding and
//! [`run_app`] for the command-line flow.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod organizer;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use chrono::Local;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::organizer::{write_audit_file, Organizer};
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the command-line flow against the real stdin and stdout.
///
/// # Errors
///
/// Returns an error for invalid configuration, a missing root directory,
/// or failures writing output. Per-file failures are not errors; they
/// yield [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with_io(cli, &mut stdin.lock(), &mut stdout.lock())
}

/// Run the command-line flow, reading the confirmation from `input` and
/// writing the prompt and report to `output`.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with_io<R: BufRead, W: Write>(
    cli: Cli,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);

    logging::init_logging(cli.verbose, cli.quiet, config.log_file.as_deref())
        .context("failed to open log file")?;

    if cli.no_color {
        yansi::disable();
    }

    let skip_confirmation = config.skip_confirmation;
    let audit_file = config.audit_file.clone();
    let run_config = config
        .into_run_config(&Local::now())
        .context("invalid configuration")?;

    let handler = signal::install_handler()?;

    if !run_config.dry_run && !skip_confirmation {
        let preview = Organizer::new(run_config.clone().with_dry_run(true))
            .with_shutdown_flag(handler.get_flag())
            .run(&cli.path)?;

        if preview.stats.interrupted {
            return Ok(ExitCode::Interrupted);
        }

        if !preview.records.is_empty() {
            writeln!(
                output,
                "{} file(s) would be moved ({} unique, {} duplicate) in {}.",
                preview.records.len(),
                preview.stats.unique,
                preview.stats.duplicate,
                cli.path.display()
            )?;
            if !confirm(input, output)? {
                writeln!(output, "Operation cancelled.")?;
                log::info!("Cancelled at the confirmation prompt");
                return Ok(ExitCode::Success);
            }
        }
    }

    let progress = Progress::new(!cli.show_progress());
    let report = Organizer::new(run_config)
        .with_shutdown_flag(handler.get_flag())
        .run_with_observer(&cli.path, &progress)?;

    let exit_code = ExitCode::from_stats(&report.stats);

    if let Some(path) = &audit_file {
        write_audit_file(path, &report)?;
    }

    match cli.output {
        OutputFormat::Text => {
            if !cli.quiet {
                TextOutput::new(&report).write_to(output)?;
            }
        }
        OutputFormat::Json => JsonOutput::new(&report, exit_code).write_to(output, true)?,
    }

    Ok(exit_code)
}

/// Ask `Proceed? [y/N]` and read one line; only `y` or `yes` accepts.
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "Proceed? [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
