use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::cnf::INTERNAL_CATALOG_NAME;
use crate::err::Error;
use crate::iam::{
	Action, Authorizer, CatalogAction, DbAction, Object, ObjectType, ResourceAction,
	SystemAction, TableAction, TableName, UserAction, UserIdentity, ViewAction,
};

/// A single action held on a single object
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Grant {
	pub object: Object,
	pub action: Action,
}

/// Everything granted to one principal
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PrincipalGrants {
	pub user: UserIdentity,
	#[serde(default)]
	pub grants: Vec<Grant>,
}

/// An immutable table of grants, keyed by principal.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GrantTable {
	#[serde(default)]
	principals: Vec<PrincipalGrants>,
}

impl GrantTable {
	/// Returns this table with one more action granted to the user
	pub fn grant(mut self, user: &UserIdentity, object: Object, action: Action) -> Self {
		let grant = Grant {
			object,
			action,
		};
		match self.principals.iter_mut().find(|p| &p.user == user) {
			Some(principal) => principal.grants.push(grant),
			None => self.principals.push(PrincipalGrants {
				user: user.clone(),
				grants: vec![grant],
			}),
		}
		self
	}

	/// Check every grant pairs an action with an object of the matching kind
	pub fn validate(&self) -> Result<(), Error> {
		for principal in &self.principals {
			principal.user.validate()?;
			for grant in &principal.grants {
				if grant.action.object_type() != grant.object.object_type() {
					return Err(Error::InvalidGrant {
						action: grant.action.to_string(),
						object: grant.object.to_string(),
					});
				}
			}
		}
		Ok(())
	}

	fn grants_of<'a>(&'a self, user: &'a UserIdentity) -> impl Iterator<Item = &'a Grant> + 'a {
		self.principals.iter().filter(move |p| &p.user == user).flat_map(|p| p.grants.iter())
	}

	fn holds(&self, user: &UserIdentity, object: &Object, action: Action) -> bool {
		self.grants_of(user).any(|g| &g.object == object && g.action == action)
	}

	fn holds_any(&self, user: &UserIdentity, f: impl Fn(&Object) -> bool) -> bool {
		self.grants_of(user).any(|g| f(&g.object))
	}
}

impl Authorizer for GrantTable {
	fn check_table_action(
		&self,
		user: &UserIdentity,
		table: &TableName,
		action: TableAction,
	) -> bool {
		self.holds(user, &Object::table(table, INTERNAL_CATALOG_NAME), action.into())
	}

	fn check_view_action(
		&self,
		user: &UserIdentity,
		view: &TableName,
		action: ViewAction,
	) -> bool {
		self.holds(user, &Object::view(view, INTERNAL_CATALOG_NAME), action.into())
	}

	fn check_db_action(
		&self,
		user: &UserIdentity,
		catalog: &str,
		db: &str,
		action: DbAction,
	) -> bool {
		let object = Object::Database {
			catalog: catalog.to_owned(),
			db: db.to_owned(),
		};
		self.holds(user, &object, action.into())
	}

	fn check_catalog_action(
		&self,
		user: &UserIdentity,
		catalog: &str,
		action: CatalogAction,
	) -> bool {
		let object = Object::Catalog {
			catalog: catalog.to_owned(),
		};
		self.holds(user, &object, action.into())
	}

	fn check_resource_action(
		&self,
		user: &UserIdentity,
		resource: &str,
		action: ResourceAction,
	) -> bool {
		let object = Object::Resource {
			resource: resource.to_owned(),
		};
		self.holds(user, &object, action.into())
	}

	fn check_system_action(&self, user: &UserIdentity, action: SystemAction) -> bool {
		self.holds(user, &Object::System, action.into())
	}

	fn check_any_action_on_catalog(&self, user: &UserIdentity, catalog: &str) -> bool {
		self.holds_any(user, |o| {
			matches!(o, Object::Catalog { catalog: c } if c == catalog)
		})
	}

	fn check_any_action_on_db(&self, user: &UserIdentity, catalog: &str, db: &str) -> bool {
		self.holds_any(user, |o| {
			matches!(o, Object::Database { catalog: c, db: d } if c == catalog && d == db)
		})
	}

	fn check_any_action_on_or_under_db(
		&self,
		user: &UserIdentity,
		catalog: &str,
		db: &str,
	) -> bool {
		self.holds_any(user, |o| o.is_on_or_under_db(catalog, db))
	}

	/// The table has no grant option, so only holders of the system-wide
	/// GRANT action may pass privileges on, whatever the objects.
	fn allow_grant(
		&self,
		user: &UserIdentity,
		_object_type: ObjectType,
		_actions: &[Action],
		_objects: &[Object],
	) -> bool {
		self.check_system_action(user, SystemAction::Grant)
	}

	fn can_execute_as(&self, user: &UserIdentity, target: &UserIdentity) -> bool {
		let object = Object::User {
			user: target.clone(),
		};
		self.holds(user, &object, UserAction::Impersonate.into())
	}
}

/// A grant table which can be refreshed while sessions keep reading it.
///
/// Each statement should be checked against one [`SharedGrants::snapshot`],
/// so that a refresh landing mid-check cannot mix two versions of the graph.
#[derive(Debug, Default)]
pub struct SharedGrants {
	inner: ArcSwap<GrantTable>,
}

impl SharedGrants {
	pub fn new(table: GrantTable) -> Self {
		Self {
			inner: ArcSwap::from_pointee(table),
		}
	}

	/// The current table, pinned for as long as the caller holds it
	pub fn snapshot(&self) -> Arc<GrantTable> {
		self.inner.load_full()
	}

	/// Install a refreshed table, without blocking readers
	pub fn replace(&self, table: GrantTable) {
		debug!("Replacing the shared grant table");
		self.inner.store(Arc::new(table));
	}
}
