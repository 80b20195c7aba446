use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use starguard_core::dbs::Session;
use starguard_core::err::Error;
use starguard_core::iam::policies::{GrantTable, SharedGrants};
use starguard_core::iam::{
	Action, Authorizer, CatalogAction, DbAction, Object, ObjectType, ResourceAction,
	SystemAction, TableAction, TableName, UserIdentity, ViewAction,
};
use starguard_core::sql::{QueryStatement, Relation, SetVar, Statement};
use starguard_core::{Context, authorize};
use test_log::test;

const CATALOG: &str = "default_catalog";

fn user(name: &str) -> UserIdentity {
	UserIdentity::new(name, "%")
}

fn select_on_table(grants: GrantTable, who: &UserIdentity, db: &str, t: &str) -> GrantTable {
	grants.grant(who, Object::table(&TableName::new(db, t), CATALOG), TableAction::Select.into())
}

fn check(grants: &dyn Authorizer, who: UserIdentity, stmt: &Statement) -> Result<(), Error> {
	let sess = Session::for_user(who);
	authorize(stmt, &Context::new(&sess, grants))
}

fn denied_object(res: Result<(), Error>) -> Option<String> {
	res.err()?.denial()?.object.clone()
}

/// Counts every question, and answers yes to all of them
#[derive(Default)]
struct Permissive {
	calls: AtomicUsize,
}

impl Permissive {
	fn hit(&self) -> bool {
		self.calls.fetch_add(1, Ordering::SeqCst);
		true
	}
}

impl Authorizer for Permissive {
	fn check_table_action(&self, _: &UserIdentity, _: &TableName, _: TableAction) -> bool {
		self.hit()
	}
	fn check_view_action(&self, _: &UserIdentity, _: &TableName, _: ViewAction) -> bool {
		self.hit()
	}
	fn check_db_action(&self, _: &UserIdentity, _: &str, _: &str, _: DbAction) -> bool {
		self.hit()
	}
	fn check_catalog_action(&self, _: &UserIdentity, _: &str, _: CatalogAction) -> bool {
		self.hit()
	}
	fn check_resource_action(&self, _: &UserIdentity, _: &str, _: ResourceAction) -> bool {
		self.hit()
	}
	fn check_system_action(&self, _: &UserIdentity, _: SystemAction) -> bool {
		self.hit()
	}
	fn check_any_action_on_catalog(&self, _: &UserIdentity, _: &str) -> bool {
		self.hit()
	}
	fn check_any_action_on_db(&self, _: &UserIdentity, _: &str, _: &str) -> bool {
		self.hit()
	}
	fn check_any_action_on_or_under_db(&self, _: &UserIdentity, _: &str, _: &str) -> bool {
		self.hit()
	}
	fn allow_grant(&self, _: &UserIdentity, _: ObjectType, _: &[Action], _: &[Object]) -> bool {
		self.hit()
	}
	fn can_execute_as(&self, _: &UserIdentity, _: &UserIdentity) -> bool {
		self.hit()
	}
}

#[test]
fn select_on_one_table_does_not_cover_a_join() {
	let jack = user("jack");
	let grants = select_on_table(GrantTable::default(), &jack, "db", "t");
	let select = Statement::Query(QueryStatement::select_from(Relation::table("db", "t")));
	check(&grants, jack.clone(), &select).unwrap();
	let join = Statement::Query(QueryStatement::select_from(Relation::join(
		Relation::table("db", "t"),
		Relation::table("db", "u"),
	)));
	let res = check(&grants, jack, &join);
	assert_eq!(denied_object(res).as_deref(), Some("db.u"));
}

#[test]
fn view_grant_does_not_cover_redefining_the_view() {
	let jack = user("jack");
	let v = TableName::new("db", "v");
	let grants = GrantTable::default()
		.grant(&jack, Object::view(&v, CATALOG), ViewAction::Select.into())
		.grant(&jack, Object::view(&v, CATALOG), ViewAction::Alter.into());
	let body = || QueryStatement::select_from(Relation::table("db", "t"));
	let select = Statement::Query(QueryStatement::select_from(Relation::view(v.clone(), body())));
	check(&grants, jack.clone(), &select).unwrap();
	let alter = Statement::AlterView {
		view: v,
		query: body(),
	};
	let res = check(&grants, jack, &alter);
	assert_eq!(
		res.unwrap_err().to_string(),
		"SELECT command denied to user 'jack'@'127.0.0.1' for table 'db.t'"
	);
}

#[test]
fn select_on_a_view_does_not_cover_altering_it() {
	let jack = user("jack");
	let v = TableName::new("db", "v");
	let grants =
		GrantTable::default().grant(&jack, Object::view(&v, CATALOG), ViewAction::Select.into());
	let alter = Statement::AlterView {
		view: v,
		query: QueryStatement::select_from(Relation::table("db", "t")),
	};
	let res = check(&grants, jack, &alter);
	assert_eq!(
		res.unwrap_err().to_string(),
		"ALTER command denied to user 'jack'@'127.0.0.1' for table 'db.v'"
	);
}

#[test]
fn internal_catalog_spelling_does_not_hide_grants() {
	let jack = user("jack");
	let grants = GrantTable::default()
		.grant(
			&jack,
			Object::Database {
				catalog: CATALOG.into(),
				db: "db".into(),
			},
			DbAction::CreateTable.into(),
		)
		.grant(
			&jack,
			Object::table(&TableName::new("db", "t"), CATALOG),
			TableAction::Insert.into(),
		);
	let create = Statement::CreateTable {
		table: TableName::new("db", "t").with_catalog("DEFAULT_CATALOG"),
		if_not_exists: false,
	};
	check(&grants, jack.clone(), &create).unwrap();
	let insert = Statement::Insert {
		table: TableName::new("db", "t").with_catalog("Default_Catalog"),
	};
	check(&grants, jack.clone(), &insert).unwrap();
	let sess = Session::for_user(jack).with_catalog("DEFAULT_CATALOG");
	let select = Statement::Query(QueryStatement::select_from(Relation::table("db", "t")));
	let res = authorize(&select, &Context::new(&sess, &grants));
	assert!(res.unwrap_err().is_access_denied());
	let grants = select_on_table(grants, &user("jack"), "db", "t");
	authorize(&select, &Context::new(&sess, &grants)).unwrap();
}

#[test]
fn using_an_external_catalog_needs_any_catalog_action() {
	let jack = user("jack");
	let stmt = Statement::UseCatalog {
		name: "hive_cat".into(),
	};
	let res = check(&GrantTable::default(), jack.clone(), &stmt);
	assert_eq!(
		res.unwrap_err().to_string(),
		"Access denied for user 'jack' to catalog 'hive_cat'"
	);
	let grants = GrantTable::default().grant(
		&jack,
		Object::Catalog {
			catalog: "hive_cat".into(),
		},
		CatalogAction::Usage.into(),
	);
	check(&grants, jack, &stmt).unwrap();
}

#[test]
fn create_table_in_an_external_catalog_asks_nothing() {
	let authorizer = Permissive::default();
	let stmt = Statement::CreateTable {
		table: TableName::new("db", "t").with_catalog("ext_cat"),
		if_not_exists: false,
	};
	let res = check(&authorizer, user("root"), &stmt);
	assert_eq!(
		res.unwrap_err(),
		Error::UnsupportedCatalog {
			catalog: "ext_cat".into()
		}
	);
	assert_eq!(authorizer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn changing_your_own_password_needs_no_privilege() {
	let set_password = Statement::Set {
		vars: vec![SetVar::Password {
			user: user("self"),
		}],
	};
	check(&GrantTable::default(), user("self"), &set_password).unwrap();
	let res = check(&GrantTable::default(), user("mallory"), &set_password);
	let err = res.unwrap_err();
	assert!(err.is_access_denied());
	assert_eq!(err.denial().map(|d| d.action.as_str()), Some("GRANT"));
}

#[test]
fn show_catalogs_is_always_allowed() {
	check(&GrantTable::default(), user("nobody"), &Statement::ShowCatalogs).unwrap();
}

#[test]
fn checks_are_deterministic() {
	let stmt = Statement::Query(QueryStatement::select_from(Relation::union(vec![
		Relation::table("db", "a"),
		Relation::table("db", "b"),
		Relation::table("db", "c"),
	])));
	let grants = select_on_table(GrantTable::default(), &user("jack"), "db", "a");
	let first = check(&grants, user("jack"), &stmt).unwrap_err();
	for _ in 0..10 {
		assert_eq!(check(&grants, user("jack"), &stmt).unwrap_err(), first);
	}
	assert_eq!(first.denial().and_then(|d| d.object.as_deref()), Some("db.b"));
}

#[test]
fn statements_load_from_json_and_check() {
	let grants: GrantTable = serde_json::from_str(
		r#"{ "principals": [{
			"user": { "user": "jack", "host": "%" },
			"grants": [
				{ "object": { "type": "DATABASE", "catalog": "default_catalog", "db": "db" }, "action": { "on": "DATABASE", "action": "CREATE_TABLE" } }
			]
		}] }"#,
	)
	.unwrap();
	grants.validate().unwrap();
	let stmt: Statement = serde_json::from_str(
		r#"{ "type": "create_table", "table": { "db": "db", "table": "orders" } }"#,
	)
	.unwrap();
	check(&grants, user("jack"), &stmt).unwrap();
}

#[test]
fn concurrent_sessions_check_against_snapshots() {
	let shared = Arc::new(SharedGrants::default());
	let stmt = Statement::ShowRoles;
	thread::scope(|s| {
		for _ in 0..4 {
			let shared = Arc::clone(&shared);
			let stmt = &stmt;
			s.spawn(move || {
				for _ in 0..500 {
					let snapshot = shared.snapshot();
					// Either outcome is fine, as long as each check completes
					let _ = check(snapshot.as_ref(), user("jack"), stmt);
				}
			});
		}
		for i in 0..50 {
			let table = if i % 2 == 0 {
				GrantTable::default().grant(
					&user("jack"),
					Object::System,
					SystemAction::Grant.into(),
				)
			} else {
				GrantTable::default()
			};
			shared.replace(table);
		}
	});
	shared.replace(GrantTable::default().grant(
		&user("jack"),
		Object::System,
		SystemAction::Grant.into(),
	));
	check(shared.snapshot().as_ref(), user("jack"), &stmt).unwrap();
}
