//! A reference, in-memory privilege graph.
//!
//! Production deployments answer [`crate::iam::Authorizer`] queries from
//! the role and privilege store. This table is used by the command line
//! tool, and by tests, to drive the checker end to end.

mod grants;

pub use self::grants::{Grant, GrantTable, PrincipalGrants, SharedGrants};
