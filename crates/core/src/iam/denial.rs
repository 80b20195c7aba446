use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dbs::Session;
use crate::err::Error;

/// The shape of the user-facing message a denial is reported with
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
	/// A table or view action was refused
	Table,
	/// A database action was refused
	Database,
	/// A catalog action was refused
	Catalog,
	/// A system, resource or administrative privilege was refused
	Specific,
}

/// A refused privilege check, carrying everything needed to report it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Denial {
	pub kind: DenialKind,
	/// The name of the action which was required
	pub action: String,
	/// The user name of the principal
	pub principal: String,
	/// The remote address the principal connected from
	pub origin: String,
	/// The object the action was required on, if any
	pub object: Option<String>,
}

impl Denial {
	fn new(kind: DenialKind, session: &Session, action: impl fmt::Display) -> Self {
		Self {
			kind,
			action: action.to_string(),
			principal: session.qualified_user().to_owned(),
			origin: session.ip.clone(),
			object: None,
		}
	}

	/// A table or view action was refused on the named object
	pub fn table(session: &Session, action: impl fmt::Display, object: impl fmt::Display) -> Self {
		Self {
			object: Some(object.to_string()),
			..Self::new(DenialKind::Table, session, action)
		}
	}

	/// Access to the database was refused
	pub fn database(session: &Session, action: impl fmt::Display, db: &str) -> Self {
		Self {
			object: Some(db.to_owned()),
			..Self::new(DenialKind::Database, session, action)
		}
	}

	/// Access to the catalog was refused
	pub fn catalog(session: &Session, action: impl fmt::Display, catalog: &str) -> Self {
		Self {
			object: Some(catalog.to_owned()),
			..Self::new(DenialKind::Catalog, session, action)
		}
	}

	/// A named privilege was refused
	pub fn specific(session: &Session, privilege: impl fmt::Display) -> Self {
		Self::new(DenialKind::Specific, session, privilege)
	}
}

impl fmt::Display for Denial {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let object = self.object.as_deref().unwrap_or_default();
		match self.kind {
			DenialKind::Table => write!(
				f,
				"{} command denied to user '{}'@'{}' for table '{}'",
				self.action, self.principal, self.origin, object
			),
			DenialKind::Database => {
				write!(f, "Access denied for user '{}' to database '{}'", self.principal, object)
			}
			DenialKind::Catalog => {
				write!(f, "Access denied for user '{}' to catalog '{}'", self.principal, object)
			}
			DenialKind::Specific => write!(
				f,
				"Access denied; you need (at least one of) the {} privilege(s) for this operation",
				self.action
			),
		}
	}
}

/// Passes when the privilege is held, otherwise reports the denial.
///
/// The denial is only built when the check fails.
pub fn require(granted: bool, denial: impl FnOnce() -> Denial) -> Result<(), Error> {
	if granted {
		return Ok(());
	}
	let denial = denial();
	debug!(
		principal = %denial.principal,
		origin = %denial.origin,
		action = %denial.action,
		object = ?denial.object,
		"Statement denied: {denial}"
	);
	Err(Error::AccessDenied(denial))
}
