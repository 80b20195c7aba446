use std::fmt;

use serde::{Deserialize, Serialize};

// Each enum below is scoped to exactly one kind of object. A rule in the
// checker names the enum of the object it checks, so a table action can
// never be asked about a database.

/// Actions which can be granted on a table
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableAction {
	Delete,
	Drop,
	Insert,
	Select,
	Alter,
	Export,
	Update,
}

impl_action_names!(TableAction {
	Delete => "DELETE",
	Drop => "DROP",
	Insert => "INSERT",
	Select => "SELECT",
	Alter => "ALTER",
	Export => "EXPORT",
	Update => "UPDATE",
});

/// Actions which can be granted on a view
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewAction {
	Select,
	Alter,
	Drop,
}

impl_action_names!(ViewAction {
	Select => "SELECT",
	Alter => "ALTER",
	Drop => "DROP",
});

/// Actions which can be granted on a database
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DbAction {
	CreateTable,
	Drop,
	Alter,
	CreateView,
	CreateFunction,
	CreateMaterializedView,
}

impl_action_names!(DbAction {
	CreateTable => "CREATE_TABLE",
	Drop => "DROP",
	Alter => "ALTER",
	CreateView => "CREATE_VIEW",
	CreateFunction => "CREATE_FUNCTION",
	CreateMaterializedView => "CREATE_MATERIALIZED_VIEW",
});

/// Actions which can be granted on a catalog
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogAction {
	Usage,
	CreateDatabase,
	Drop,
	Alter,
}

impl_action_names!(CatalogAction {
	Usage => "USAGE",
	CreateDatabase => "CREATE_DATABASE",
	Drop => "DROP",
	Alter => "ALTER",
});

/// Actions which can be granted on an external resource
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceAction {
	Usage,
	Alter,
	Drop,
}

impl_action_names!(ResourceAction {
	Usage => "USAGE",
	Alter => "ALTER",
	Drop => "DROP",
});

/// Actions which can be granted on another user
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
	Impersonate,
}

impl_action_names!(UserAction {
	Impersonate => "IMPERSONATE",
});

/// System-wide actions, not attached to any particular object
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemAction {
	Grant,
	Node,
	CreateResource,
	Plugin,
	File,
	Blacklist,
	Operate,
	CreateExternalCatalog,
	Repository,
	CreateResourceGroup,
	CreateGlobalFunction,
}

impl_action_names!(SystemAction {
	Grant => "GRANT",
	Node => "NODE",
	CreateResource => "CREATE_RESOURCE",
	Plugin => "PLUGIN",
	File => "FILE",
	Blacklist => "BLACKLIST",
	Operate => "OPERATE",
	CreateExternalCatalog => "CREATE_EXTERNAL_CATALOG",
	Repository => "REPOSITORY",
	CreateResourceGroup => "CREATE_RESOURCE_GROUP",
	CreateGlobalFunction => "CREATE_GLOBAL_FUNCTION",
});

/// The kinds of object a privilege can be granted on
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
	Table,
	View,
	Database,
	Catalog,
	Resource,
	User,
	System,
}

impl_action_names!(ObjectType {
	Table => "TABLE",
	View => "VIEW",
	Database => "DATABASE",
	Catalog => "CATALOG",
	Resource => "RESOURCE",
	User => "USER",
	System => "SYSTEM",
});

/// Any action from the taxonomy, tagged with the kind of object it applies to
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "on", content = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
	Table(TableAction),
	View(ViewAction),
	Database(DbAction),
	Catalog(CatalogAction),
	Resource(ResourceAction),
	User(UserAction),
	System(SystemAction),
}

impl Action {
	/// The single kind of object this action belongs to
	pub fn object_type(&self) -> ObjectType {
		match self {
			Action::Table(_) => ObjectType::Table,
			Action::View(_) => ObjectType::View,
			Action::Database(_) => ObjectType::Database,
			Action::Catalog(_) => ObjectType::Catalog,
			Action::Resource(_) => ObjectType::Resource,
			Action::User(_) => ObjectType::User,
			Action::System(_) => ObjectType::System,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Action::Table(v) => v.as_str(),
			Action::View(v) => v.as_str(),
			Action::Database(v) => v.as_str(),
			Action::Catalog(v) => v.as_str(),
			Action::Resource(v) => v.as_str(),
			Action::User(v) => v.as_str(),
			Action::System(v) => v.as_str(),
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ON {}", self.as_str(), self.object_type())
	}
}

impl From<TableAction> for Action {
	fn from(v: TableAction) -> Self {
		Action::Table(v)
	}
}

impl From<ViewAction> for Action {
	fn from(v: ViewAction) -> Self {
		Action::View(v)
	}
}

impl From<DbAction> for Action {
	fn from(v: DbAction) -> Self {
		Action::Database(v)
	}
}

impl From<CatalogAction> for Action {
	fn from(v: CatalogAction) -> Self {
		Action::Catalog(v)
	}
}

impl From<ResourceAction> for Action {
	fn from(v: ResourceAction) -> Self {
		Action::Resource(v)
	}
}

impl From<UserAction> for Action {
	fn from(v: UserAction) -> Self {
		Action::User(v)
	}
}

impl From<SystemAction> for Action {
	fn from(v: SystemAction) -> Self {
		Action::System(v)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::table(Action::Table(TableAction::Select), ObjectType::Table)]
	#[case::view(Action::View(ViewAction::Select), ObjectType::View)]
	#[case::database(Action::Database(DbAction::Drop), ObjectType::Database)]
	#[case::catalog(Action::Catalog(CatalogAction::Drop), ObjectType::Catalog)]
	#[case::resource(Action::Resource(ResourceAction::Drop), ObjectType::Resource)]
	#[case::user(Action::User(UserAction::Impersonate), ObjectType::User)]
	#[case::system(Action::System(SystemAction::Operate), ObjectType::System)]
	fn action_belongs_to_one_object_type(#[case] action: Action, #[case] expected: ObjectType) {
		assert_eq!(action.object_type(), expected);
	}

	#[test]
	fn names_parse_back_case_insensitively() {
		for action in SystemAction::ALL {
			assert_eq!(action.as_str().to_lowercase().parse::<SystemAction>().unwrap(), *action);
		}
		assert_eq!("create_table".parse::<DbAction>().unwrap(), DbAction::CreateTable);
	}

	#[test]
	fn unknown_name_is_rejected() {
		let err = "SUPERUSER".parse::<SystemAction>().unwrap_err();
		assert_eq!(err.to_string(), "Unknown SystemAction privilege 'SUPERUSER'");
	}

	#[test]
	fn serialized_form_uses_privilege_names() {
		let json = serde_json::to_string(&Action::Database(DbAction::CreateView)).unwrap();
		assert_eq!(json, r#"{"on":"DATABASE","action":"CREATE_VIEW"}"#);
	}
}
