//! Session state consumed by the checker.

mod session;

pub use self::session::Session;
