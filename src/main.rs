//! doclinks - Documents, weighted links and ordered cyclic lists

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = doclinks::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
