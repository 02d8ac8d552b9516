//! Registration and login inputs plus bearer token primitives.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{EmailAddress, UserName, UserValidationError};

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

const TOKEN_BYTES: usize = 32;

/// Validation errors for account requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    Field(UserValidationError),
    EmptyPassword,
    PasswordTooShort { min: usize },
}

impl AccountValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Field(inner) => inner.field(),
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Field(inner) => inner.code(),
            Self::EmptyPassword => "required",
            Self::PasswordTooShort { .. } => "too_short",
        }
    }
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(inner) => write!(f, "{inner}"),
            Self::EmptyPassword => write!(f, "password is required"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

impl From<UserValidationError> for AccountValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Field(value)
    }
}

/// Validated self-registration request.
#[derive(Clone)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields.
    ///
    /// # Examples
    /// ```
    /// use recipe_catalogue::domain::Registration;
    ///
    /// let registration = Registration::try_from_parts("Ada", "ada@mail.com", "correct horse")
    ///     .expect("valid registration");
    /// assert_eq!(registration.email().as_str(), "ada@mail.com");
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AccountValidationError> {
        let name = UserName::new(name)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Zeroizing<String> {
        &self.password
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated login request.
#[derive(Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AccountValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Zeroizing<String> {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// SHA-256 digest of a bearer token, hex encoded. This is what storage sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Digest a plaintext token.
    ///
    /// # Examples
    /// ```
    /// use recipe_catalogue::domain::TokenDigest;
    ///
    /// let digest = TokenDigest::of("secret");
    /// assert_eq!(digest.as_str().len(), 64);
    /// assert_eq!(digest, TokenDigest::of("secret"));
    /// ```
    pub fn of(token: &str) -> Self {
        Self(hex::encode(Sha256::digest(token.as_bytes())))
    }

    /// Rehydrate a digest read back from storage.
    pub fn from_stored(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A freshly minted bearer token.
pub struct IssuedToken {
    plaintext: Zeroizing<String>,
    digest: TokenDigest,
}

impl IssuedToken {
    /// Mint a token from 32 random bytes.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        rand::thread_rng().fill_bytes(bytes.as_mut_slice());
        let plaintext = Zeroizing::new(hex::encode(bytes.as_slice()));
        let digest = TokenDigest::of(&plaintext);
        Self { plaintext, digest }
    }

    /// The value handed to the client.
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    pub fn digest(&self) -> &TokenDigest {
        &self.digest
    }

    /// Give up the plaintext once the digest has been persisted.
    pub fn into_plaintext(self) -> Zeroizing<String> {
        self.plaintext
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}
