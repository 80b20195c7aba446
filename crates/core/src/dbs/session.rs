use crate::cnf::INTERNAL_CATALOG_NAME;
use crate::iam::UserIdentity;

/// Specifies the current session information when authorizing a statement.
///
/// A session is created by the connection layer and is only ever read by
/// the checker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
	/// The authenticated identity on whose behalf statements run
	pub user: UserIdentity,
	/// The currently selected catalog
	pub catalog: String,
	/// The current connection IP address
	pub ip: String,
}

impl Session {
	/// Create a session for the user, in the internal catalog
	pub fn for_user(user: UserIdentity) -> Session {
		Session {
			user,
			catalog: INTERNAL_CATALOG_NAME.to_owned(),
			ip: String::from("127.0.0.1"),
		}
	}
	/// Set the selected catalog for the session
	pub fn with_catalog(mut self, catalog: &str) -> Session {
		catalog.clone_into(&mut self.catalog);
		self
	}
	/// Set the remote address for the session
	pub fn with_ip(mut self, ip: &str) -> Session {
		ip.clone_into(&mut self.ip);
		self
	}
	/// Retrieves the user name, without the host pattern
	pub fn qualified_user(&self) -> &str {
		&self.user.user
	}
	/// Resolves an optional catalog name against the selected catalog
	pub fn catalog_or_current<'a>(&'a self, catalog: Option<&'a str>) -> &'a str {
		catalog.unwrap_or(&self.catalog)
	}
}
