//! Translate repository failures into domain errors.

use tracing::error;

use super::Error;
use super::ports::{AccountRepositoryError, CatalogueRepositoryError};

/// Map a catalogue repository failure onto the public error taxonomy.
///
/// Constraint names never reach the message.
pub(crate) fn map_catalogue_error(err: CatalogueRepositoryError) -> Error {
    match err {
        CatalogueRepositoryError::Connection { message } => {
            error!(%message, "catalogue repository unavailable");
            Error::service_unavailable("catalogue store unavailable")
        }
        CatalogueRepositoryError::Query { message } => {
            error!(%message, "catalogue repository query failed");
            Error::internal("catalogue query failed")
        }
        CatalogueRepositoryError::Duplicate { .. } => Error::conflict("resource already exists"),
        CatalogueRepositoryError::Dependency { .. } => {
            Error::conflict("resource is still referenced")
        }
    }
}

/// Map an account repository failure onto the public error taxonomy.
pub(crate) fn map_account_error(err: AccountRepositoryError) -> Error {
    match err {
        AccountRepositoryError::Connection { message } => {
            error!(%message, "account repository unavailable");
            Error::service_unavailable("account store unavailable")
        }
        AccountRepositoryError::Query { message } => {
            error!(%message, "account repository query failed");
            Error::internal("account query failed")
        }
        AccountRepositoryError::Duplicate { .. } => Error::conflict("account already exists"),
    }
}
