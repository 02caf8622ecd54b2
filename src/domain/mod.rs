//! Domain models

pub mod scim;
pub mod user;

pub use user::{User, UserChanges, UserDraft};
