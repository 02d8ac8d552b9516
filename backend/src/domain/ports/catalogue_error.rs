//! Error type shared by the category, recipe, and favorite repositories.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { constraint: String } => "unique constraint violated: {constraint}",
        /// A foreign-key constraint rejected the write.
        Dependency { constraint: String } => "foreign key constraint violated: {constraint}",
    }
}
