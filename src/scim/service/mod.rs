//! SCIM protocol services

pub mod filter;
pub mod mapper;
pub mod patch;
#[allow(clippy::module_inception)]
pub mod scim;

pub use scim::ScimService;
