//! tutor - Multi-tool tutorials with progress tracking

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tutorial_kit::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
