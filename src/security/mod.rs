//! Security utilities

pub mod password;
pub mod timing;

pub use password::{hash_password, verify_password};
pub use timing::{add_auth_delay, AuthTimer};
