use serde::{Deserialize, Serialize};

use crate::iam::TableName;

/// A query, rooted at the relation it reads from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct QueryStatement {
	pub relation: Relation,
}

impl QueryStatement {
	pub fn new(relation: Relation) -> Self {
		Self {
			relation,
		}
	}

	/// `SELECT ... FROM <relation>`
	pub fn select_from(relation: Relation) -> Self {
		Self::new(Relation::Select {
			ctes: Vec::new(),
			from: Some(Box::new(relation)),
		})
	}
}

impl From<Relation> for QueryStatement {
	fn from(relation: Relation) -> Self {
		Self::new(relation)
	}
}

/// A common table expression defined in a `WITH` clause.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CteRelation {
	pub name: String,
	pub query: Box<QueryStatement>,
}

impl CteRelation {
	pub fn new(name: impl Into<String>, query: QueryStatement) -> Self {
		Self {
			name: name.into(),
			query: Box::new(query),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
	#[default]
	Inner,
	Left,
	Right,
	Full,
	Cross,
	Semi,
	Anti,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOperator {
	Union,
	Intersect,
	Except,
}

/// A node in the relation tree of a query.
///
/// The tree is produced from tree-shaped syntax, so it is acyclic. Every
/// leaf which reads data is a base table or a view.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Relation {
	/// A base table
	Table {
		name: TableName,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		alias: Option<String>,
	},
	/// A view, together with its resolved defining query
	View {
		name: TableName,
		query: Box<QueryStatement>,
	},
	/// A parenthesised query in a `FROM` clause
	Subquery {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		alias: Option<String>,
		query: Box<QueryStatement>,
	},
	/// A reference to a common table expression
	Cte(CteRelation),
	/// A binary join
	Join {
		#[serde(default)]
		kind: JoinKind,
		left: Box<Relation>,
		right: Box<Relation>,
	},
	/// `UNION`, `INTERSECT` or `EXCEPT` over any number of members
	SetOperation {
		operator: SetOperator,
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		ctes: Vec<CteRelation>,
		relations: Vec<Relation>,
	},
	/// A `SELECT` block, with its own `WITH` clause and optional `FROM` clause
	Select {
		#[serde(default, skip_serializing_if = "Vec::is_empty")]
		ctes: Vec<CteRelation>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		from: Option<Box<Relation>>,
	},
	/// Literal rows, reading no relation at all
	Values,
}

impl Relation {
	pub fn table(db: impl Into<String>, table: impl Into<String>) -> Self {
		Relation::Table {
			name: TableName::new(db, table),
			alias: None,
		}
	}

	pub fn view(name: TableName, query: QueryStatement) -> Self {
		Relation::View {
			name,
			query: Box::new(query),
		}
	}

	pub fn subquery(query: QueryStatement) -> Self {
		Relation::Subquery {
			alias: None,
			query: Box::new(query),
		}
	}

	pub fn join(left: Relation, right: Relation) -> Self {
		Relation::Join {
			kind: JoinKind::Inner,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	pub fn union(relations: Vec<Relation>) -> Self {
		Relation::SetOperation {
			operator: SetOperator::Union,
			ctes: Vec::new(),
			relations,
		}
	}
}

impl From<TableName> for Relation {
	fn from(name: TableName) -> Self {
		Relation::Table {
			name,
			alias: None,
		}
	}
}
