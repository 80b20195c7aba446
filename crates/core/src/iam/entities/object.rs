use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ObjectType, UserIdentity};

/// A possibly catalog-qualified table or view name.
///
/// An absent catalog refers to the session's current catalog.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TableName {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub catalog: Option<String>,
	pub db: String,
	pub table: String,
}

impl TableName {
	pub fn new(db: impl Into<String>, table: impl Into<String>) -> Self {
		Self {
			catalog: None,
			db: db.into(),
			table: table.into(),
		}
	}

	/// Set the catalog this name is qualified with
	pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
		self.catalog = Some(catalog.into());
		self
	}

	/// Returns this name, qualified with the given catalog when it has none
	pub fn resolved(&self, default_catalog: &str) -> TableName {
		TableName {
			catalog: Some(self.catalog.clone().unwrap_or_else(|| default_catalog.to_owned())),
			db: self.db.clone(),
			table: self.table.clone(),
		}
	}

	/// Returns this name, qualified with the given catalog in place of its own
	pub fn in_catalog(&self, catalog: &str) -> TableName {
		TableName {
			catalog: Some(catalog.to_owned()),
			db: self.db.clone(),
			table: self.table.clone(),
		}
	}
}

impl fmt::Display for TableName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.catalog {
			Some(catalog) => write!(f, "{}.{}.{}", catalog, self.db, self.table),
			None => write!(f, "{}.{}", self.db, self.table),
		}
	}
}

/// The identity of an object a privilege can be held on
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Object {
	Table {
		catalog: String,
		db: String,
		table: String,
	},
	View {
		catalog: String,
		db: String,
		view: String,
	},
	Database {
		catalog: String,
		db: String,
	},
	Catalog {
		catalog: String,
	},
	Resource {
		resource: String,
	},
	User {
		user: UserIdentity,
	},
	System,
}

impl Object {
	/// A table object, qualified with the given catalog when the name has none
	pub fn table(name: &TableName, default_catalog: &str) -> Self {
		let name = name.resolved(default_catalog);
		Object::Table {
			catalog: name.catalog.unwrap_or_default(),
			db: name.db,
			table: name.table,
		}
	}

	/// A view object, qualified with the given catalog when the name has none
	pub fn view(name: &TableName, default_catalog: &str) -> Self {
		let name = name.resolved(default_catalog);
		Object::View {
			catalog: name.catalog.unwrap_or_default(),
			db: name.db,
			view: name.table,
		}
	}

	pub fn object_type(&self) -> ObjectType {
		match self {
			Object::Table {
				..
			} => ObjectType::Table,
			Object::View {
				..
			} => ObjectType::View,
			Object::Database {
				..
			} => ObjectType::Database,
			Object::Catalog {
				..
			} => ObjectType::Catalog,
			Object::Resource {
				..
			} => ObjectType::Resource,
			Object::User {
				..
			} => ObjectType::User,
			Object::System => ObjectType::System,
		}
	}

	/// Check if this object is the given database, or lives inside it
	pub fn is_on_or_under_db(&self, in_catalog: &str, in_db: &str) -> bool {
		match self {
			Object::Database {
				catalog,
				db,
			}
			| Object::Table {
				catalog,
				db,
				..
			}
			| Object::View {
				catalog,
				db,
				..
			} => catalog == in_catalog && db == in_db,
			Object::Catalog {
				..
			}
			| Object::Resource {
				..
			}
			| Object::User {
				..
			}
			| Object::System => false,
		}
	}
}

impl fmt::Display for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Object::Table {
				catalog,
				db,
				table,
			} => write!(f, "TABLE {catalog}.{db}.{table}"),
			Object::View {
				catalog,
				db,
				view,
			} => write!(f, "VIEW {catalog}.{db}.{view}"),
			Object::Database {
				catalog,
				db,
			} => write!(f, "DATABASE {catalog}.{db}"),
			Object::Catalog {
				catalog,
			} => write!(f, "CATALOG {catalog}"),
			Object::Resource {
				resource,
			} => write!(f, "RESOURCE {resource}"),
			Object::User {
				user,
			} => write!(f, "USER {user}"),
			Object::System => write!(f, "SYSTEM"),
		}
	}
}
