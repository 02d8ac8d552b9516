//! Port for persisted bearer tokens.
//!
//! Adapters only ever see [`TokenDigest`] values; plaintext tokens are handed
//! to the client once and never stored.
use async_trait::async_trait;

use crate::domain::{TokenDigest, User, UserId};

use super::AccountRepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Record a newly issued token for `user_id`.
    async fn store(&self, user_id: UserId, digest: &TokenDigest) -> Result<(), AccountRepositoryError>;

    /// Resolve a token digest to the account that owns it.
    async fn find_owner(&self, digest: &TokenDigest) -> Result<Option<User>, AccountRepositoryError>;

    /// Remove a token. Returns `false` when it was not stored.
    async fn revoke(&self, digest: &TokenDigest) -> Result<bool, AccountRepositoryError>;
}
