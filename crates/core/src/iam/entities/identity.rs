use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::err::Error;

const MAX_USER_LENGTH: usize = 64;
const MAX_HOST_LENGTH: usize = 255;

/// A principal, identified by user name and the host pattern it connects from.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
	pub user: String,
	pub host: String,
}

impl UserIdentity {
	pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
		Self {
			user: user.into(),
			host: host.into(),
		}
	}

	/// Create an identity matching the user from any host
	pub fn any_host(user: impl Into<String>) -> Self {
		Self::new(user, "%")
	}

	/// Check the user name and host pattern are well formed
	pub fn validate(&self) -> Result<(), Error> {
		let fail = |reason: &str| Error::MalformedIdentity {
			identity: self.to_string(),
			reason: reason.to_string(),
		};
		let mut chars = self.user.chars();
		match chars.next() {
			None => return Err(fail("user name is empty")),
			Some(c) if !c.is_ascii_alphabetic() => {
				return Err(fail("user name must start with a letter"));
			}
			Some(_) => {}
		}
		if self.user.len() > MAX_USER_LENGTH {
			return Err(fail("user name is too long"));
		}
		if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
			return Err(fail("user name contains invalid characters"));
		}
		if self.host.is_empty() {
			return Err(fail("host is empty"));
		}
		if self.host.len() > MAX_HOST_LENGTH {
			return Err(fail("host is too long"));
		}
		if self.host.chars().any(char::is_whitespace) {
			return Err(fail("host contains whitespace"));
		}
		Ok(())
	}
}

impl fmt::Display for UserIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "'{}'@'{}'", self.user, self.host)
	}
}

impl FromStr for UserIdentity {
	type Err = Error;
	/// Parses `'user'@'host'`, `user@host` or a bare `user` (any host)
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let unquote = |v: &str| {
			let v = v.trim();
			v.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')).unwrap_or(v).to_string()
		};
		let identity = match s.rsplit_once('@') {
			Some((user, host)) => UserIdentity::new(unquote(user), unquote(host)),
			None => UserIdentity::any_host(unquote(s)),
		};
		identity.validate()?;
		Ok(identity)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::quoted("'jack'@'%'", UserIdentity::new("jack", "%"))]
	#[case::unquoted("jack@10.0.0.1", UserIdentity::new("jack", "10.0.0.1"))]
	#[case::bare("jack", UserIdentity::new("jack", "%"))]
	#[case::punctuated("'etl.load-1'@'%.corp'", UserIdentity::new("etl.load-1", "%.corp"))]
	fn parses_identity(#[case] input: &str, #[case] expected: UserIdentity) {
		assert_eq!(input.parse::<UserIdentity>().unwrap(), expected);
	}

	#[rstest]
	#[case::empty_user(UserIdentity::new("", "%"), "user name is empty")]
	#[case::leading_digit(UserIdentity::new("1jack", "%"), "user name must start with a letter")]
	#[case::bad_char(UserIdentity::new("ja ck", "%"), "user name contains invalid characters")]
	#[case::too_long(UserIdentity::new("a".repeat(65), "%"), "user name is too long")]
	#[case::empty_host(UserIdentity::new("jack", ""), "host is empty")]
	#[case::spaced_host(UserIdentity::new("jack", "10.0 .0.1"), "host contains whitespace")]
	fn rejects_malformed_identity(#[case] identity: UserIdentity, #[case] reason: &str) {
		match identity.validate() {
			Err(Error::MalformedIdentity {
				reason: r,
				..
			}) => assert_eq!(r, reason),
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn displays_quoted() {
		assert_eq!(UserIdentity::new("jack", "%").to_string(), "'jack'@'%'");
	}
}
