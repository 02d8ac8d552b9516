//! Account and token ports over the in-memory store.

use async_trait::async_trait;

use crate::domain::ports::{AccessTokenRepository, AccountRepositoryError, UserRepository};
use crate::domain::{EmailAddress, NewAccount, StoredAccount, TokenDigest, User, UserId};

use super::{InMemoryCatalogue, next_id};

#[async_trait]
impl UserRepository for InMemoryCatalogue {
    async fn create(&self, account: &NewAccount) -> Result<User, AccountRepositoryError> {
        let mut state = self.lock_accounts()?;
        let taken = state
            .users
            .values()
            .any(|stored| stored.user.email == account.email.as_str());
        if taken {
            return Err(AccountRepositoryError::duplicate("users_email_key"));
        }
        let id = next_id(&mut state.next_user);
        let user = User {
            id: UserId::new(id),
            name: account.name.as_str().to_owned(),
            email: account.email.as_str().to_owned(),
            role: account.role,
        };
        state.users.insert(
            id,
            StoredAccount {
                user: user.clone(),
                password_hash: account.password_hash.clone(),
            },
        );
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let state = self.lock_accounts()?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email == email.as_str())
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AccountRepositoryError> {
        Ok(self.lock_accounts()?.user(id))
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryCatalogue {
    async fn store(&self, user_id: UserId, digest: &TokenDigest) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock_accounts()?;
        if state.tokens.contains_key(digest.as_str()) {
            return Err(AccountRepositoryError::duplicate("access_tokens_token_hash_key"));
        }
        state.tokens.insert(digest.as_str().to_owned(), user_id);
        Ok(())
    }

    async fn find_owner(&self, digest: &TokenDigest) -> Result<Option<User>, AccountRepositoryError> {
        let state = self.lock_accounts()?;
        Ok(state
            .tokens
            .get(digest.as_str())
            .and_then(|owner| state.user(*owner)))
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<bool, AccountRepositoryError> {
        Ok(self.lock_accounts()?.tokens.remove(digest.as_str()).is_some())
    }
}
