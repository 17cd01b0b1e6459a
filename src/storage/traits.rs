//! Abstract storage interface for user records
//!
//! The user store is the single I/O seam of the authentication core. The
//! core reads records through this narrow interface and never writes.

use async_trait::async_trait;

use crate::auth::user::UserRecord;
use crate::error::Result;

/// User record lookup.
///
/// Implementations treat email and username as one identifier namespace:
/// `find_by_identifier` matches either field, first hit wins. Uniqueness
/// across both fields combined is the store's responsibility.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email or username.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>>;
}
