use serde::{Deserialize, Serialize};

use crate::iam::{Action, Object, ObjectType, TableName, UserIdentity};
use crate::sql::QueryStatement;

/// A possibly catalog-qualified database name
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DatabaseName {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub catalog: Option<String>,
	pub db: String,
}

impl DatabaseName {
	pub fn new(db: impl Into<String>) -> Self {
		Self {
			catalog: None,
			db: db.into(),
		}
	}

	pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
		self.catalog = Some(catalog.into());
		self
	}
}

/// Who receives, or loses, a privilege or a role
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grantee {
	User(UserIdentity),
	Role(String),
}

/// `GRANT <actions> ON <objects> TO ...` or the matching `REVOKE`
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GrantRevokePrivilegeStatement {
	#[serde(default)]
	pub revoke: bool,
	pub object_type: ObjectType,
	pub actions: Vec<Action>,
	pub objects: Vec<Object>,
	pub grantee: Grantee,
	#[serde(default)]
	pub with_grant_option: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetType {
	#[default]
	Default,
	Session,
	Global,
}

/// One assignment in a `SET` statement
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetVar {
	/// `SET [GLOBAL | SESSION] name = value`
	Variable {
		#[serde(default)]
		scope: SetType,
		name: String,
		value: String,
	},
	/// `SET PASSWORD [FOR user] = ...`, with the target already filled in
	Password {
		user: UserIdentity,
	},
}

/// A parsed statement, as handed to the checker.
///
/// Every statement the parser can produce has a variant here, so the
/// dispatcher has to decide on a rule for each one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
	// Queries and data manipulation
	Query(QueryStatement),
	Insert {
		table: TableName,
	},
	Delete {
		table: TableName,
	},
	// Tables and views
	CreateTable {
		table: TableName,
		#[serde(default)]
		if_not_exists: bool,
	},
	DropTable {
		table: TableName,
		#[serde(default)]
		is_view: bool,
		#[serde(default)]
		if_exists: bool,
	},
	CreateView {
		view: TableName,
		query: QueryStatement,
	},
	AlterView {
		view: TableName,
		query: QueryStatement,
	},
	// Databases
	UseDb(DatabaseName),
	ShowCreateDb(DatabaseName),
	RecoverDb(DatabaseName),
	AlterDatabaseQuota {
		database: DatabaseName,
		quota: u64,
	},
	AlterDatabaseRename {
		database: DatabaseName,
		new_name: String,
	},
	DropDb {
		database: DatabaseName,
		#[serde(default)]
		force: bool,
	},
	// External resources
	CreateResource {
		name: String,
	},
	DropResource {
		name: String,
	},
	AlterResource {
		name: String,
	},
	// Catalogs
	UseCatalog {
		name: String,
	},
	CreateCatalog {
		name: String,
	},
	DropCatalog {
		name: String,
	},
	ShowCatalogs,
	// Plugins
	InstallPlugin {
		source: String,
	},
	UninstallPlugin {
		name: String,
	},
	ShowPlugins,
	// Cluster nodes
	ShowBackends,
	ShowFrontends,
	ShowBrokers,
	ShowComputeNodes,
	// Small files
	CreateFile {
		db: String,
		name: String,
	},
	DropFile {
		db: String,
		name: String,
	},
	ShowSmallFiles {
		db: String,
	},
	// SQL blacklist
	AddSqlBlacklist {
		sql: String,
	},
	DelSqlBlacklist {
		ids: Vec<u64>,
	},
	ShowSqlBlacklist,
	// Privileges, users and roles
	GrantRevokePrivilege(GrantRevokePrivilegeStatement),
	GrantRevokeRole {
		#[serde(default)]
		revoke: bool,
		roles: Vec<String>,
		grantee: Grantee,
	},
	ShowGrants {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		user: Option<UserIdentity>,
	},
	ShowAuthentication {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		user: Option<UserIdentity>,
	},
	ShowUserProperty {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		user: Option<String>,
	},
	SetUserProperty {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		user: Option<String>,
		properties: Vec<(String, String)>,
	},
	CreateUser {
		user: UserIdentity,
	},
	AlterUser {
		user: UserIdentity,
	},
	DropUser {
		user: UserIdentity,
	},
	CreateRole {
		name: String,
	},
	DropRole {
		name: String,
	},
	ShowRoles,
	ExecuteAs {
		user: UserIdentity,
	},
	// Session variables
	Set {
		vars: Vec<SetVar>,
	},
	ShowVariables {
		#[serde(default)]
		scope: SetType,
	},
	ShowTransaction {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		db: Option<String>,
		id: u64,
	},
	// Operations and administration
	ShowTablet,
	ShowProc {
		path: String,
	},
	Kill {
		connection_id: u64,
		#[serde(default)]
		query_only: bool,
	},
	AdminSetConfig {
		key: String,
		value: String,
	},
	AdminSetReplicaStatus,
	AdminShowConfig,
	AdminShowReplicaDistribution {
		table: TableName,
	},
	AdminShowReplicaStatus {
		table: TableName,
	},
	AdminRepairTable {
		table: TableName,
	},
	AdminCancelRepairTable {
		table: TableName,
	},
	AdminCheckTablets {
		tablets: Vec<u64>,
	},
	AlterSystem {
		clause: String,
	},
	CancelAlterSystem,
}

impl From<QueryStatement> for Statement {
	fn from(query: QueryStatement) -> Self {
		Statement::Query(query)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::iam::{Action, TableAction};

	#[test]
	fn statements_load_from_json() {
		let stmt: Statement = serde_json::from_str(
			r#"{ "type": "set", "vars": [
				{ "kind": "variable", "scope": "global", "name": "query_timeout", "value": "600" },
				{ "kind": "password", "user": { "user": "jack", "host": "%" } }
			] }"#,
		)
		.unwrap();
		assert_eq!(
			stmt,
			Statement::Set {
				vars: vec![
					SetVar::Variable {
						scope: SetType::Global,
						name: "query_timeout".into(),
						value: "600".into(),
					},
					SetVar::Password {
						user: UserIdentity::new("jack", "%"),
					},
				],
			}
		);
	}

	#[test]
	fn grant_statement_loads_from_json() {
		let stmt: Statement = serde_json::from_str(
			r#"{
				"type": "grant_revoke_privilege",
				"object_type": "TABLE",
				"actions": [{ "on": "TABLE", "action": "SELECT" }],
				"objects": [{ "type": "TABLE", "catalog": "default_catalog", "db": "db", "table": "t" }],
				"grantee": { "role": "analyst" }
			}"#,
		)
		.unwrap();
		let Statement::GrantRevokePrivilege(grant) = stmt else {
			panic!("expected a grant statement");
		};
		assert!(!grant.revoke);
		assert_eq!(grant.actions, vec![Action::Table(TableAction::Select)]);
		assert_eq!(grant.grantee, Grantee::Role("analyst".into()));
	}

	#[test]
	fn unit_statements_load_from_json() {
		let stmt: Statement = serde_json::from_str(r#"{ "type": "show_catalogs" }"#).unwrap();
		assert_eq!(stmt, Statement::ShowCatalogs);
	}
}
