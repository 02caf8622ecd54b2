//! Business services

pub mod login;

pub use login::{ExternalProfile, IdentityMatch, LoginError, LoginService};
