mod check;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::cnf::{DEFAULT_LOG_LEVEL, EXIT_INVALID, PKG_NAME};
use crate::telemetry;

use self::check::CheckCommandArguments;

const INFO: &str = "
StarGuard checks whether a user holds every privilege a SQL statement requires.

Statements and grant tables are read as JSON, as produced by the query front end.
";

#[derive(Parser, Debug)]
#[command(name = "StarGuard command-line interface", bin_name = PKG_NAME)]
#[command(about = INFO, version)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[arg(help = "The logging level for the command-line tool")]
	#[arg(env = "STARGUARD_LOG", short = 'l', long = "log")]
	#[arg(default_value = DEFAULT_LOG_LEVEL)]
	log: String,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	#[command(about = "Check whether a user may run a statement")]
	Check(CheckCommandArguments),
}

pub fn init() -> ExitCode {
	// Parse the CLI arguments
	let args = Cli::parse();
	// Initialize logging before anything else runs
	if let Err(e) = telemetry::builder().with_log_level(&args.log).and_then(|b| b.init()) {
		eprintln!("{e:#}");
		return ExitCode::from(EXIT_INVALID);
	}
	// Run the requested subcommand
	let output = match args.command {
		Commands::Check(args) => check::init(args),
	};
	match output {
		Ok(code) => code,
		Err(e) => {
			eprintln!("{e:#}");
			ExitCode::from(EXIT_INVALID)
		}
	}
}
