//! # StarGuard Core
//!
//! This crate is the statement authorization engine of the StarGuard query
//! front end. Given a parsed statement tree and the requesting session, it
//! decides, before any planning or execution work happens, whether the
//! principal holds every privilege the statement requires.
//!
//! The privilege graph itself lives behind the [`iam::Authorizer`] trait.
//! This crate only implements the decision procedure which consumes it.

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod cnf;
pub mod dbs;
pub mod err;
pub mod iam;
pub mod sql;

pub use crate::iam::check::{Context, authorize};
