use thiserror::Error;

use crate::iam::Denial;

/// An error raised while authorizing a statement.
///
/// Every variant is terminal for the statement being checked. Nothing in
/// the checker retries or recovers from one of these locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The principal lacks a privilege the statement requires
	#[error("{0}")]
	AccessDenied(Denial),

	/// The statement targets an external catalog where only the internal catalog is supported
	#[error("external catalog is not supported for now! (catalog '{catalog}')")]
	UnsupportedCatalog {
		catalog: String,
	},

	/// An identity embedded in the statement failed validation
	#[error("Invalid user identity '{identity}': {reason}")]
	MalformedIdentity {
		identity: String,
		reason: String,
	},

	/// A privilege name could not be mapped onto the action taxonomy
	#[error("Unknown {kind} privilege '{name}'")]
	InvalidAction {
		kind: &'static str,
		name: String,
	},

	/// A grant pairs an action with an object of another kind
	#[error("Action '{action}' cannot be granted on {object}")]
	InvalidGrant {
		action: String,
		object: String,
	},

	/// The relation tree nests deeper than the configured limit
	#[error("Reached excessive relation depth while checking the query, limit: {limit}")]
	RelationDepthExceeded {
		limit: u32,
	},
}

impl Error {
	/// Check if this error is an access denial
	pub fn is_access_denied(&self) -> bool {
		matches!(self, Error::AccessDenied(_))
	}

	/// Returns the denial details, if this error is an access denial
	pub fn denial(&self) -> Option<&Denial> {
		match self {
			Error::AccessDenied(denial) => Some(denial),
			Error::UnsupportedCatalog {
				..
			}
			| Error::MalformedIdentity {
				..
			}
			| Error::InvalidAction {
				..
			}
			| Error::InvalidGrant {
				..
			}
			| Error::RelationDepthExceeded {
				..
			} => None,
		}
	}
}
