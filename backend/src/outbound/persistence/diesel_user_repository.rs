//! PostgreSQL-backed `UserRepository` and `AccessTokenRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccessTokenRepository, AccountRepositoryError, UserRepository};
use crate::domain::{EmailAddress, NewAccount, StoredAccount, TokenDigest, User, UserId};

use super::diesel_error_mapping::{account_pool_error, map_account_diesel_error};
use super::models::{NewAccessTokenRow, NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{access_tokens, users};

fn decode(row: UserRow) -> Result<StoredAccount, AccountRepositoryError> {
    row.into_stored().map_err(AccountRepositoryError::query)
}

/// Diesel-backed account repository.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &NewAccount) -> Result<User, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                name: account.name.as_str(),
                email: account.email.as_str(),
                password_hash: &account.password_hash,
                role: account.role.as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_account_diesel_error)?;
        decode(row).map(|stored| stored.user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_account_diesel_error)?;
        row.map(decode).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_account_diesel_error)?;
        row.map(|row| decode(row).map(|stored| stored.user))
            .transpose()
    }
}

/// Diesel-backed token repository.
#[derive(Clone)]
pub struct DieselAccessTokenRepository {
    pool: DbPool,
}

impl DieselAccessTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessTokenRepository for DieselAccessTokenRepository {
    async fn store(&self, user_id: UserId, digest: &TokenDigest) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;
        diesel::insert_into(access_tokens::table)
            .values(&NewAccessTokenRow {
                user_id: user_id.get(),
                token_hash: digest.as_str(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_account_diesel_error)
    }

    async fn find_owner(&self, digest: &TokenDigest) -> Result<Option<User>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;
        let row: Option<UserRow> = access_tokens::table
            .inner_join(users::table)
            .filter(access_tokens::token_hash.eq(digest.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_account_diesel_error)?;
        row.map(|row| row.into_user().map_err(AccountRepositoryError::query))
            .transpose()
    }

    async fn revoke(&self, digest: &TokenDigest) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(account_pool_error)?;
        let deleted = diesel::delete(
            access_tokens::table.filter(access_tokens::token_hash.eq(digest.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_account_diesel_error)?;
        Ok(deleted > 0)
    }
}
