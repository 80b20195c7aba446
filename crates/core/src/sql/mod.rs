//! The statement and relation trees the checker walks.
//!
//! Both trees are produced by the parser and analyzer, which live outside
//! this crate. They are immutable once built.

mod relation;
mod statement;

pub use self::relation::*;
pub use self::statement::*;
