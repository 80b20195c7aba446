//! Identity and access management for statements.
//!
//! A statement is authorized by [`check::authorize`], which selects the
//! rule for the statement and asks an [`Authorizer`] every question the
//! rule needs answered. The first unmet requirement ends the check.

pub mod authorizer;
pub mod check;
mod denial;
pub mod entities;
pub mod policies;
mod relation;

pub use self::authorizer::*;
pub use self::denial::{Denial, DenialKind, require};
pub use self::entities::*;
