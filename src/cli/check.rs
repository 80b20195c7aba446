use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;
use serde::de::DeserializeOwned;
use starguard_core::cnf::INTERNAL_CATALOG_NAME;
use starguard_core::dbs::Session;
use starguard_core::err::Error;
use starguard_core::iam::UserIdentity;
use starguard_core::iam::policies::GrantTable;
use starguard_core::sql::Statement;
use starguard_core::{Context, authorize};

use crate::cnf::EXIT_DENIED;

#[derive(Args, Debug)]
pub struct CheckCommandArguments {
	#[arg(help = "Path to a JSON grant table")]
	#[arg(env = "STARGUARD_GRANTS", short = 'g', long = "grants")]
	pub(crate) grants: PathBuf,
	#[arg(help = "Path to a JSON statement tree")]
	#[arg(short = 's', long = "statement")]
	pub(crate) statement: PathBuf,
	#[arg(help = "The user running the statement, as 'user'@'host'")]
	#[arg(env = "STARGUARD_USER", short = 'u', long = "user")]
	pub(crate) user: UserIdentity,
	#[arg(help = "The catalog selected in the session")]
	#[arg(env = "STARGUARD_CATALOG", long = "catalog")]
	#[arg(default_value = INTERNAL_CATALOG_NAME)]
	pub(crate) catalog: String,
	#[arg(help = "The address the user connected from")]
	#[arg(long = "ip", default_value = "127.0.0.1")]
	pub(crate) ip: String,
}

pub fn init(args: CheckCommandArguments) -> Result<ExitCode> {
	match run(args)? {
		Ok(()) => {
			println!("OK");
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			println!("{e}");
			Ok(ExitCode::from(EXIT_DENIED))
		}
	}
}

/// Load the inputs and check the statement. The outer error means the
/// inputs were unusable, the inner one that the statement was refused.
fn run(
	CheckCommandArguments {
		grants,
		statement,
		user,
		catalog,
		ip,
	}: CheckCommandArguments,
) -> Result<Result<(), Error>> {
	let table: GrantTable = load(&grants)?;
	table.validate().with_context(|| format!("Invalid grant table '{}'", grants.display()))?;
	let stmt: Statement = load(&statement)?;
	let session = Session::for_user(user).with_catalog(&catalog).with_ip(&ip);
	info!(user = %session.user, catalog = %session.catalog, "Checking statement");
	Ok(authorize(&stmt, &Context::new(&session, &table)))
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
	let text =
		fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
	serde_json::from_str(&text).with_context(|| format!("Failed to parse '{}'", path.display()))
}
