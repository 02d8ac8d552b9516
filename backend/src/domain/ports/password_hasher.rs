//! Port for password hashing.

use zeroize::Zeroizing;

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing or verifying passwords.
    pub enum PasswordHashError {
        /// Hash computation failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes passwords for storage and verifies login attempts.
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string for `password`.
    fn hash(&self, password: &Zeroizing<String>) -> Result<String, PasswordHashError>;

    /// Check `password` against a hash produced by [`PasswordHasher::hash`].
    fn verify(&self, password: &Zeroizing<String>, hash: &str) -> Result<bool, PasswordHashError>;
}
