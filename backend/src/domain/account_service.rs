//! Registration, login, logout, and bearer token resolution.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use super::catalogue_errors::map_account_error;
use super::ports::{
    AccessTokenRepository, AccountRepositoryError, PasswordHashError, PasswordHasher,
    UserRepository,
};
use super::{
    Error, IssuedToken, LoginCredentials, NewAccount, Principal, Registration, Role, TokenDigest,
    User,
};

/// An account together with a freshly issued bearer token.
pub struct AuthenticatedSession {
    pub user: User,
    pub token: Zeroizing<String>,
}

impl std::fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

fn email_taken() -> Error {
    Error::conflict("email already registered")
        .with_details(json!({ "field": "email", "code": "taken" }))
}

fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal("password hashing failed")
}

/// Account lifecycle and token authentication.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn AccessTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AccessTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    /// Create a `user` account and sign it in.
    pub async fn register(&self, registration: &Registration) -> Result<AuthenticatedSession, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_account_error)?;
        if existing.is_some() {
            return Err(email_taken());
        }
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let account = NewAccount {
            name: registration.name().clone(),
            email: registration.email().clone(),
            role: Role::User,
            password_hash,
        };
        let user = self.users.create(&account).await.map_err(|err| match err {
            AccountRepositoryError::Duplicate { .. } => email_taken(),
            other => map_account_error(other),
        })?;
        info!(user_id = %user.id, "account registered");
        self.issue(user).await
    }

    /// Check credentials and issue a new token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_account_error)?
            .ok_or_else(invalid_credentials)?;
        let verified = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .map_err(map_hash_error)?;
        if !verified {
            warn!(user_id = %account.user.id, "rejected login attempt");
            return Err(invalid_credentials());
        }
        self.issue(account.user).await
    }

    /// Revoke the presented token.
    pub async fn logout(&self, token: &str) -> Result<(), Error> {
        let revoked = self
            .tokens
            .revoke(&TokenDigest::of(token))
            .await
            .map_err(map_account_error)?;
        if !revoked {
            return Err(Error::unauthorized("invalid or revoked token"));
        }
        Ok(())
    }

    /// Resolve a bearer token to the account behind it.
    pub async fn authenticate(&self, token: &str) -> Result<User, Error> {
        self.tokens
            .find_owner(&TokenDigest::of(token))
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthorized("invalid or revoked token"))
    }

    /// Resolve a bearer token straight to a [`Principal`].
    pub async fn principal(&self, token: &str) -> Result<Principal, Error> {
        self.authenticate(token)
            .await
            .map(|user| Principal::new(user.id, user.role))
    }

    async fn issue(&self, user: User) -> Result<AuthenticatedSession, Error> {
        let token = IssuedToken::generate();
        self.tokens
            .store(user.id, token.digest())
            .await
            .map_err(map_account_error)?;
        Ok(AuthenticatedSession {
            user,
            token: token.into_plaintext(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockAccessTokenRepository, MockUserRepository};
    use crate::domain::test_fixtures::user;
    use crate::domain::{ErrorCode, StoredAccount, UserId};
    use rstest::rstest;

    /// Reversible stand-in so tests stay fast.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &Zeroizing<String>) -> Result<String, PasswordHashError> {
            Ok(format!("plain:{}", password.as_str()))
        }

        fn verify(&self, password: &Zeroizing<String>, hash: &str) -> Result<bool, PasswordHashError> {
            Ok(hash == format!("plain:{}", password.as_str()))
        }
    }

    fn service(users: MockUserRepository, tokens: MockAccessTokenRepository) -> AccountService {
        AccountService::new(Arc::new(users), Arc::new(tokens), Arc::new(PlainHasher))
    }

    fn stored(id: i64) -> StoredAccount {
        StoredAccount {
            user: user(id, Role::User),
            password_hash: "plain:password1".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_creates_users_and_issues_a_token() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|account| account.role == Role::User && account.password_hash == "plain:password1")
            .returning(|account| {
                Ok(User {
                    id: UserId::new(7),
                    name: account.name.as_str().to_owned(),
                    email: account.email.as_str().to_owned(),
                    role: account.role,
                })
            });
        let mut tokens = MockAccessTokenRepository::new();
        tokens
            .expect_store()
            .withf(|user_id, _| *user_id == UserId::new(7))
            .times(1)
            .returning(|_, _| Ok(()));

        let registration =
            Registration::try_from_parts("Ada", "ada@mail.com", "password1").expect("valid");
        let session = service(users, tokens)
            .register(&registration)
            .await
            .expect("registration succeeds");
        assert_eq!(session.user.email, "ada@mail.com");
        assert_eq!(session.token.len(), 64);
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_taken_emails() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(Some(stored(3))));
        users.expect_create().never();

        let registration =
            Registration::try_from_parts("Ada", "user3@mail.com", "password1").expect("valid");
        let error = service(users, MockAccessTokenRepository::new())
            .register(&registration)
            .await
            .expect_err("email taken");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("wrong-password"))]
    #[tokio::test]
    async fn login_failures_are_indistinguishable(#[case] password: Option<&str>) {
        let known = password.is_some();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(known.then(|| stored(3))));
        let credentials =
            LoginCredentials::try_from_parts("user3@mail.com", password.unwrap_or("password1"))
                .expect("valid");

        let error = service(users, MockAccessTokenRepository::new())
            .login(&credentials)
            .await
            .expect_err("login refused");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "invalid credentials");
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_resolves_principal_from_digest() {
        let mut tokens = MockAccessTokenRepository::new();
        tokens
            .expect_find_owner()
            .withf(|digest| *digest == TokenDigest::of("opaque"))
            .returning(|_| Ok(Some(user(4, Role::Admin))));

        let principal = service(MockUserRepository::new(), tokens)
            .principal("opaque")
            .await
            .expect("token resolves");
        assert_eq!(principal, Principal::new(UserId::new(4), Role::Admin));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_tokens_are_unauthorized() {
        let mut tokens = MockAccessTokenRepository::new();
        tokens.expect_find_owner().returning(|_| Ok(None));
        tokens.expect_revoke().returning(|_| Ok(false));
        let svc = service(MockUserRepository::new(), tokens);

        let resolve = svc.authenticate("nope").await.expect_err("unknown token");
        let revoke = svc.logout("nope").await.expect_err("unknown token");
        assert_eq!(resolve.code(), ErrorCode::Unauthorized);
        assert_eq!(revoke.code(), ErrorCode::Unauthorized);
    }
}
