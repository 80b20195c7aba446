//! The `starguard` command line tool.
//!
//! It loads a grant table and a parsed statement from JSON, and reports
//! whether the user may run the statement.

#[macro_use]
extern crate tracing;

mod cli;
mod cnf;
mod telemetry;

use std::process::ExitCode;

fn main() -> ExitCode {
	cli::init() // Initiate the command line
}
