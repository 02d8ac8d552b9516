//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewAccount, StoredAccount, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account and token adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { constraint: String } => "unique constraint violated: {constraint}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Duplicate emails yield
    /// [`AccountRepositoryError::Duplicate`].
    async fn create(&self, account: &NewAccount) -> Result<User, AccountRepositoryError>;

    /// Fetch an account and its password hash by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AccountRepositoryError>;
}
