pub mod basic;
pub mod factory;

pub use basic::{AccessGuard, BasicCredentials, GuardError};
pub use factory::build_access_guard;
