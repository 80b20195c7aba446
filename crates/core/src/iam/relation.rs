//! Read authorization for the relation tree of a query.
//!
//! The walk is fail-fast and visits relations in the order they are
//! written: `WITH` definitions before the body, left before right. The first
//! table the principal cannot read is the one reported.

use crate::err::Error;
use crate::iam::check::Context;
use crate::iam::{Denial, TableAction, ViewAction, require};
use crate::sql::{CteRelation, QueryStatement, Relation};

/// Authorize read access to every table the query can observe
pub(crate) fn check_query(query: &QueryStatement, ctx: &Context) -> Result<(), Error> {
	check_relation(&query.relation, ctx, 0)
}

fn check_nested(query: &QueryStatement, ctx: &Context, depth: u32) -> Result<(), Error> {
	check_relation(&query.relation, ctx, depth)
}

fn check_ctes(ctes: &[CteRelation], ctx: &Context, depth: u32) -> Result<(), Error> {
	// Defined CTEs are checked whether or not the body references them
	ctes.iter().try_for_each(|cte| check_nested(&cte.query, ctx, depth))
}

fn check_relation(relation: &Relation, ctx: &Context, depth: u32) -> Result<(), Error> {
	if depth > ctx.max_depth() {
		return Err(Error::RelationDepthExceeded {
			limit: ctx.max_depth(),
		});
	}
	let depth = depth + 1;
	match relation {
		Relation::Table {
			name,
			..
		} => {
			trace!(table = %name, "Checking SELECT on table");
			let sess = ctx.session;
			let table = ctx.qualified(name);
			let granted = ctx.authorizer.check_table_action(&sess.user, &table, TableAction::Select);
			require(granted, || Denial::table(sess, TableAction::Select, name))
		}
		Relation::View {
			name,
			query,
		} => {
			let sess = ctx.session;
			// Holding SELECT on the view vouches for everything it reads
			let view = ctx.qualified(name);
			if ctx.authorizer.check_view_action(&sess.user, &view, ViewAction::Select) {
				trace!(view = %name, "View is readable, skipping its defining query");
				return Ok(());
			}
			trace!(view = %name, "View is not readable, checking its defining query");
			check_nested(query, ctx, depth)
		}
		Relation::Subquery {
			query,
			..
		} => check_nested(query, ctx, depth),
		Relation::Cte(cte) => check_nested(&cte.query, ctx, depth),
		Relation::Join {
			left,
			right,
			..
		} => {
			check_relation(left, ctx, depth)?;
			check_relation(right, ctx, depth)
		}
		Relation::SetOperation {
			ctes,
			relations,
			..
		} => {
			check_ctes(ctes, ctx, depth)?;
			relations.iter().try_for_each(|r| check_relation(r, ctx, depth))
		}
		Relation::Select {
			ctes,
			from,
		} => {
			check_ctes(ctes, ctx, depth)?;
			match from {
				Some(from) => check_relation(from, ctx, depth),
				None => Ok(()),
			}
		}
		Relation::Values => Ok(()),
	}
}
