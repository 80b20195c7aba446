use crate::cnf::MAX_RELATION_DEPTH;
use crate::dbs::Session;
use crate::err::Error;
use crate::iam::relation::check_query;
use crate::iam::{
	Authorizer, CatalogAction, CatalogRegistry, DbAction, Denial, InternalCatalog,
	ResourceAction, SystemAction, TableAction, TableName, UserAction, ViewAction, require,
};
use crate::sql::{DatabaseName, SetType, SetVar, Statement};

/// The privilege name reported when any action on an object would have sufficed
const ANY_ACTION: &str = "ANY";

/// Everything a single authorization reads.
///
/// The context is built once per statement and threaded through every rule.
/// All of its parts are borrowed and nothing in it is ever mutated.
#[derive(Clone, Copy)]
pub struct Context<'a> {
	/// The session issuing the statement
	pub session: &'a Session,
	/// The privilege graph, pinned for the duration of the check
	pub authorizer: &'a dyn Authorizer,
	/// Knows which catalogs are built in
	pub catalogs: &'a dyn CatalogRegistry,
	max_depth: u32,
}

impl<'a> Context<'a> {
	/// Create a context where only the default catalog is internal
	pub fn new(session: &'a Session, authorizer: &'a dyn Authorizer) -> Self {
		Self {
			session,
			authorizer,
			catalogs: &InternalCatalog,
			max_depth: *MAX_RELATION_DEPTH,
		}
	}

	/// Use another catalog registry
	pub fn with_catalogs(mut self, catalogs: &'a dyn CatalogRegistry) -> Self {
		self.catalogs = catalogs;
		self
	}

	/// Override how deep the relation checker may descend
	pub fn with_max_depth(mut self, max_depth: u32) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// The maximum relation nesting depth
	pub fn max_depth(&self) -> u32 {
		self.max_depth
	}

	/// Fail unless the catalog is built in, returning its canonical name.
	/// Nothing is asked of the authorizer before this has passed.
	fn ensure_internal<'b>(&self, catalog: &'b str) -> Result<&'b str, Error> {
		if self.catalogs.is_internal_catalog(catalog) {
			return Ok(self.catalogs.canonical_name(catalog));
		}
		debug!(catalog, "Statement refused on an external catalog");
		Err(Error::UnsupportedCatalog {
			catalog: catalog.to_owned(),
		})
	}

	fn db_catalog<'b>(&'b self, db: &'b DatabaseName) -> &'b str {
		self.session.catalog_or_current(db.catalog.as_deref())
	}

	fn table_catalog<'b>(&'b self, table: &'b TableName) -> &'b str {
		self.session.catalog_or_current(table.catalog.as_deref())
	}

	/// The table name qualified with the canonical spelling of its catalog
	pub(crate) fn qualified(&self, table: &TableName) -> TableName {
		table.in_catalog(self.catalogs.canonical_name(self.table_catalog(table)))
	}
}

fn check_table_action(ctx: &Context, table: &TableName, action: TableAction) -> Result<(), Error> {
	let catalog = ctx.ensure_internal(ctx.table_catalog(table))?;
	let sess = ctx.session;
	let granted = ctx.authorizer.check_table_action(&sess.user, &table.in_catalog(catalog), action);
	require(granted, || Denial::table(sess, action, table))
}

fn check_view_action(ctx: &Context, view: &TableName, action: ViewAction) -> Result<(), Error> {
	let catalog = ctx.ensure_internal(ctx.table_catalog(view))?;
	let sess = ctx.session;
	let granted = ctx.authorizer.check_view_action(&sess.user, &view.in_catalog(catalog), action);
	require(granted, || Denial::table(sess, action, view))
}

fn check_db_action(ctx: &Context, catalog: &str, db: &str, action: DbAction) -> Result<(), Error> {
	let catalog = ctx.ensure_internal(catalog)?;
	let sess = ctx.session;
	let granted = ctx.authorizer.check_db_action(&sess.user, catalog, db, action);
	require(granted, || Denial::database(sess, action, db))
}

fn check_any_action_on_db(ctx: &Context, catalog: &str, db: &str) -> Result<(), Error> {
	let catalog = ctx.ensure_internal(catalog)?;
	let sess = ctx.session;
	let granted = ctx.authorizer.check_any_action_on_db(&sess.user, catalog, db);
	require(granted, || Denial::database(sess, ANY_ACTION, db))
}

fn check_any_action_on_or_under_db(ctx: &Context, catalog: &str, db: &str) -> Result<(), Error> {
	let catalog = ctx.ensure_internal(catalog)?;
	let sess = ctx.session;
	let granted = ctx.authorizer.check_any_action_on_or_under_db(&sess.user, catalog, db);
	require(granted, || Denial::database(sess, ANY_ACTION, db))
}

fn check_catalog_action(ctx: &Context, catalog: &str, action: CatalogAction) -> Result<(), Error> {
	let sess = ctx.session;
	let granted = ctx.authorizer.check_catalog_action(&sess.user, catalog, action);
	require(granted, || Denial::catalog(sess, action, catalog))
}

fn check_any_action_on_catalog(ctx: &Context, catalog: &str) -> Result<(), Error> {
	let sess = ctx.session;
	let granted = ctx.authorizer.check_any_action_on_catalog(&sess.user, catalog);
	require(granted, || Denial::catalog(sess, ANY_ACTION, catalog))
}

fn check_resource_action(ctx: &Context, name: &str, action: ResourceAction) -> Result<(), Error> {
	let sess = ctx.session;
	let granted = ctx.authorizer.check_resource_action(&sess.user, name, action);
	require(granted, || Denial::specific(sess, action))
}

fn check_system_action(ctx: &Context, action: SystemAction) -> Result<(), Error> {
	let sess = ctx.session;
	let granted = ctx.authorizer.check_system_action(&sess.user, action);
	require(granted, || Denial::specific(sess, action))
}

fn check_operate(ctx: &Context) -> Result<(), Error> {
	check_system_action(ctx, SystemAction::Operate)
}

/// Node membership changes need OPERATE, but are reported as NODE
fn check_node(ctx: &Context) -> Result<(), Error> {
	let sess = ctx.session;
	let granted = ctx.authorizer.check_system_action(&sess.user, SystemAction::Operate);
	require(granted, || Denial::specific(sess, SystemAction::Node))
}

fn check_operate_or_node(ctx: &Context) -> Result<(), Error> {
	let sess = ctx.session;
	let granted = ctx.authorizer.check_system_action(&sess.user, SystemAction::Operate)
		|| ctx.authorizer.check_system_action(&sess.user, SystemAction::Node);
	require(granted, || {
		Denial::specific(sess, format!("{}/{}", SystemAction::Operate, SystemAction::Node))
	})
}

/// Inspecting or changing your own account is always allowed
fn check_self_or_grant(ctx: &Context, is_self: bool) -> Result<(), Error> {
	if is_self {
		return Ok(());
	}
	check_system_action(ctx, SystemAction::Grant)
}

fn check_set_var(ctx: &Context, var: &SetVar) -> Result<(), Error> {
	match var {
		SetVar::Password {
			user,
		} => {
			user.validate()?;
			check_self_or_grant(ctx, user == &ctx.session.user)
		}
		SetVar::Variable {
			scope: SetType::Global,
			..
		} => check_operate(ctx),
		SetVar::Variable {
			scope: SetType::Default | SetType::Session,
			..
		} => Ok(()),
	}
}

/// Authorize a statement for the session in the context.
///
/// Returns `Ok(())` only when the principal holds every privilege the
/// statement requires. Checks run in the order the statement is written
/// and the first unmet requirement is returned.
#[instrument(level = "trace", target = "starguard::core::iam", skip_all)]
pub fn authorize(stmt: &Statement, ctx: &Context) -> Result<(), Error> {
	let sess = ctx.session;
	trace!(user = %sess.user, catalog = %sess.catalog, "Authorizing statement");
	match stmt {
		// Queries and data manipulation
		Statement::Query(query) => check_query(query, ctx),
		Statement::Insert {
			table,
		} => check_table_action(ctx, table, TableAction::Insert),
		Statement::Delete {
			table,
		} => check_table_action(ctx, table, TableAction::Delete),
		// Tables and views
		Statement::CreateTable {
			table,
			..
		} => check_db_action(ctx, ctx.table_catalog(table), &table.db, DbAction::CreateTable),
		Statement::DropTable {
			table,
			is_view,
			..
		} => {
			if *is_view {
				check_view_action(ctx, table, ViewAction::Drop)
			} else {
				check_table_action(ctx, table, TableAction::Drop)
			}
		}
		Statement::CreateView {
			view,
			query,
		} => {
			check_db_action(ctx, ctx.table_catalog(view), &view.db, DbAction::CreateView)?;
			trace!(view = %view, "Checking the defining query of the new view");
			check_query(query, ctx)
		}
		Statement::AlterView {
			view,
			query,
		} => {
			check_view_action(ctx, view, ViewAction::Alter)?;
			trace!(view = %view, "Checking the new defining query of the view");
			check_query(query, ctx)
		}
		// Databases
		Statement::UseDb(db) => check_any_action_on_or_under_db(ctx, ctx.db_catalog(db), &db.db),
		Statement::ShowCreateDb(db) => check_any_action_on_db(ctx, ctx.db_catalog(db), &db.db),
		Statement::RecoverDb(db) => {
			let catalog = ctx.catalogs.canonical_name(ctx.db_catalog(db));
			check_db_action(ctx, catalog, &db.db, DbAction::Drop)?;
			check_catalog_action(ctx, catalog, CatalogAction::CreateDatabase)
		}
		Statement::AlterDatabaseQuota {
			database,
			..
		}
		| Statement::AlterDatabaseRename {
			database,
			..
		} => check_db_action(ctx, ctx.db_catalog(database), &database.db, DbAction::Alter),
		Statement::DropDb {
			database,
			..
		} => check_db_action(ctx, ctx.db_catalog(database), &database.db, DbAction::Drop),
		// External resources
		Statement::CreateResource {
			..
		} => check_system_action(ctx, SystemAction::CreateResource),
		Statement::DropResource {
			name,
		} => check_resource_action(ctx, name, ResourceAction::Drop),
		Statement::AlterResource {
			name,
		} => check_resource_action(ctx, name, ResourceAction::Alter),
		// Catalogs
		Statement::UseCatalog {
			name,
		} => {
			if ctx.catalogs.is_internal_catalog(name) {
				trace!(catalog = %name, "Using the internal catalog needs no privilege");
				return Ok(());
			}
			check_any_action_on_catalog(ctx, name)
		}
		Statement::CreateCatalog {
			name,
		} => {
			let granted =
				ctx.authorizer.check_system_action(&sess.user, SystemAction::CreateExternalCatalog);
			require(granted, || Denial::catalog(sess, SystemAction::CreateExternalCatalog, name))
		}
		Statement::DropCatalog {
			name,
		} => check_catalog_action(ctx, name, CatalogAction::Drop),
		// Rows are filtered by visibility when the statement executes
		Statement::ShowCatalogs => Ok(()),
		// Plugins
		Statement::InstallPlugin {
			..
		}
		| Statement::UninstallPlugin {
			..
		}
		| Statement::ShowPlugins => check_system_action(ctx, SystemAction::Plugin),
		// Cluster nodes
		Statement::ShowBackends
		| Statement::ShowFrontends
		| Statement::ShowBrokers
		| Statement::ShowComputeNodes => check_operate_or_node(ctx),
		// Small files live in a database of the current catalog
		Statement::CreateFile {
			db,
			..
		}
		| Statement::DropFile {
			db,
			..
		} => {
			check_any_action_on_or_under_db(ctx, &sess.catalog, db)?;
			check_system_action(ctx, SystemAction::File)
		}
		Statement::ShowSmallFiles {
			db,
		} => check_any_action_on_or_under_db(ctx, &sess.catalog, db),
		// SQL blacklist
		Statement::AddSqlBlacklist {
			..
		}
		| Statement::DelSqlBlacklist {
			..
		}
		| Statement::ShowSqlBlacklist => check_system_action(ctx, SystemAction::Blacklist),
		// Privileges, users and roles
		Statement::GrantRevokePrivilege(stmt) => {
			let granted = ctx.authorizer.allow_grant(
				&sess.user,
				stmt.object_type,
				&stmt.actions,
				&stmt.objects,
			);
			require(granted, || Denial::specific(sess, SystemAction::Grant))
		}
		Statement::GrantRevokeRole {
			..
		} => check_system_action(ctx, SystemAction::Grant),
		Statement::ShowGrants {
			user,
		}
		| Statement::ShowAuthentication {
			user,
		} => check_self_or_grant(ctx, user.as_ref().is_none_or(|u| u == &sess.user)),
		Statement::ShowUserProperty {
			user,
		}
		| Statement::SetUserProperty {
			user,
			..
		} => check_self_or_grant(ctx, user.as_deref().is_none_or(|u| u == sess.qualified_user())),
		Statement::CreateUser {
			..
		}
		| Statement::AlterUser {
			..
		}
		| Statement::DropUser {
			..
		}
		| Statement::CreateRole {
			..
		}
		| Statement::DropRole {
			..
		}
		| Statement::ShowRoles => check_system_action(ctx, SystemAction::Grant),
		Statement::ExecuteAs {
			user,
		} => {
			let granted = ctx.authorizer.can_execute_as(&sess.user, user);
			require(granted, || Denial::specific(sess, UserAction::Impersonate))
		}
		// Session variables
		Statement::Set {
			vars,
		} => vars.iter().try_for_each(|var| check_set_var(ctx, var)),
		Statement::ShowVariables {
			..
		}
		| Statement::ShowTransaction {
			..
		} => Ok(()),
		// Operations and administration
		Statement::ShowTablet
		| Statement::ShowProc {
			..
		}
		| Statement::Kill {
			..
		}
		| Statement::AdminSetConfig {
			..
		}
		| Statement::AdminSetReplicaStatus
		| Statement::AdminShowConfig
		| Statement::AdminShowReplicaDistribution {
			..
		}
		| Statement::AdminShowReplicaStatus {
			..
		}
		| Statement::AdminRepairTable {
			..
		}
		| Statement::AdminCancelRepairTable {
			..
		}
		| Statement::AdminCheckTablets {
			..
		} => check_operate(ctx),
		Statement::AlterSystem {
			..
		}
		| Statement::CancelAlterSystem => check_node(ctx),
	}
}
