mod action;
mod identity;
mod object;

pub use action::*;
pub use identity::*;
pub use object::*;
