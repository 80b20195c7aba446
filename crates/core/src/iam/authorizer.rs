use crate::cnf::INTERNAL_CATALOG_NAME;
use crate::iam::{
	Action, CatalogAction, DbAction, Object, ObjectType, ResourceAction, SystemAction,
	TableAction, TableName, UserIdentity, ViewAction,
};

/// The privilege graph the checker queries.
///
/// Every method is a pure, side-effect-free read. Implementations are
/// expected to answer from an in-memory snapshot and must be safe to
/// share between the sessions checking statements concurrently.
pub trait Authorizer: Send + Sync {
	/// Does the principal hold the action on the table
	fn check_table_action(
		&self,
		principal: &UserIdentity,
		table: &TableName,
		action: TableAction,
	) -> bool;

	/// Does the principal hold the action on the view
	fn check_view_action(
		&self,
		principal: &UserIdentity,
		view: &TableName,
		action: ViewAction,
	) -> bool;

	/// Does the principal hold the action on the database
	fn check_db_action(
		&self,
		principal: &UserIdentity,
		catalog: &str,
		db: &str,
		action: DbAction,
	) -> bool;

	/// Does the principal hold the action on the catalog
	fn check_catalog_action(
		&self,
		principal: &UserIdentity,
		catalog: &str,
		action: CatalogAction,
	) -> bool;

	/// Does the principal hold the action on the resource
	fn check_resource_action(
		&self,
		principal: &UserIdentity,
		resource: &str,
		action: ResourceAction,
	) -> bool;

	/// Does the principal hold the system-wide action
	fn check_system_action(&self, principal: &UserIdentity, action: SystemAction) -> bool;

	/// Does the principal hold any action on the catalog itself
	fn check_any_action_on_catalog(&self, principal: &UserIdentity, catalog: &str) -> bool;

	/// Does the principal hold any action on the database itself
	fn check_any_action_on_db(&self, principal: &UserIdentity, catalog: &str, db: &str) -> bool;

	/// Does the principal hold any action on the database, or on any object inside it
	fn check_any_action_on_or_under_db(
		&self,
		principal: &UserIdentity,
		catalog: &str,
		db: &str,
	) -> bool;

	/// May the principal grant or revoke these actions on these objects
	fn allow_grant(
		&self,
		principal: &UserIdentity,
		object_type: ObjectType,
		actions: &[Action],
		objects: &[Object],
	) -> bool;

	/// May the principal run statements as the target user
	fn can_execute_as(&self, principal: &UserIdentity, target: &UserIdentity) -> bool;
}

/// Knows which catalogs are built in, as opposed to federated.
pub trait CatalogRegistry: Send + Sync {
	fn is_internal_catalog(&self, name: &str) -> bool;

	/// The spelling the privilege graph keys this catalog by
	fn canonical_name<'n>(&self, name: &'n str) -> &'n str {
		name
	}
}

/// A registry where only the default catalog is internal
#[derive(Clone, Copy, Debug, Default)]
pub struct InternalCatalog;

impl CatalogRegistry for InternalCatalog {
	fn is_internal_catalog(&self, name: &str) -> bool {
		name.eq_ignore_ascii_case(INTERNAL_CATALOG_NAME)
	}

	fn canonical_name<'n>(&self, name: &'n str) -> &'n str {
		if self.is_internal_catalog(name) {
			INTERNAL_CATALOG_NAME
		} else {
			name
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn internal_catalog_is_case_insensitive() {
		assert!(InternalCatalog.is_internal_catalog("DEFAULT_CATALOG"));
		assert_eq!(InternalCatalog.canonical_name("Default_Catalog"), INTERNAL_CATALOG_NAME);
		assert_eq!(InternalCatalog.canonical_name("hive"), "hive");
	}
}
