//! sortdupe - organize files by type and separate duplicates.
//!
//! Entry point for the sortdupe CLI application.

use clap::Parser;
use sortdupe::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    organizer::OrganizeError,
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    match sortdupe::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err.downcast_ref::<OrganizeError>().is_some() {
                ExitCode::DirectoryNotFound
            } else {
                ExitCode::GeneralError
            };

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
