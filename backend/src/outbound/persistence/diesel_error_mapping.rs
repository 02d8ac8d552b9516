//! Shared mapping from Diesel and pool failures to port errors.
//!
//! Constraint violations keep the constraint name so services can tell a
//! duplicate favorite from a duplicate category name when they need to.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{AccountRepositoryError, CatalogueRepositoryError};

use super::pool::PoolError;

enum Failure {
    Connection(String),
    Query(String),
    Unique(String),
    ForeignKey(String),
}

fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn classify(error: DieselError) -> Failure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => Failure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => Failure::Query("database query error".to_owned()),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().unwrap_or("unknown").to_owned();
            match kind {
                DatabaseErrorKind::UniqueViolation => Failure::Unique(constraint),
                DatabaseErrorKind::ForeignKeyViolation => Failure::ForeignKey(constraint),
                DatabaseErrorKind::ClosedConnection => {
                    Failure::Connection("database connection error".to_owned())
                }
                _ => Failure::Query("database error".to_owned()),
            }
        }
        _ => Failure::Query("database error".to_owned()),
    }
}

pub(crate) fn catalogue_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(pool_message(error))
}

pub(crate) fn account_pool_error(error: PoolError) -> AccountRepositoryError {
    AccountRepositoryError::connection(pool_message(error))
}

pub(crate) fn map_catalogue_diesel_error(error: DieselError) -> CatalogueRepositoryError {
    match classify(error) {
        Failure::Connection(message) => CatalogueRepositoryError::connection(message),
        Failure::Query(message) => CatalogueRepositoryError::query(message),
        Failure::Unique(constraint) => CatalogueRepositoryError::duplicate(constraint),
        Failure::ForeignKey(constraint) => CatalogueRepositoryError::dependency(constraint),
    }
}

pub(crate) fn map_account_diesel_error(error: DieselError) -> AccountRepositoryError {
    match classify(error) {
        Failure::Connection(message) => AccountRepositoryError::connection(message),
        Failure::Query(message) => AccountRepositoryError::query(message),
        Failure::Unique(constraint) => AccountRepositoryError::duplicate(constraint),
        Failure::ForeignKey(constraint) => {
            AccountRepositoryError::query(format!("foreign key violation: {constraint}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "violation"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    fn unique_violations_keep_the_constraint() {
        let err = map_catalogue_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("favorites_user_id_recipe_id_key"),
        ));
        assert_eq!(
            err,
            CatalogueRepositoryError::duplicate("favorites_user_id_recipe_id_key")
        );
    }

    #[rstest]
    fn foreign_key_violations_map_to_dependency() {
        let err = map_catalogue_diesel_error(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            Some("recipes_category_id_fkey"),
        ));
        assert!(matches!(err, CatalogueRepositoryError::Dependency { .. }));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let err = map_account_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(err, AccountRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn pool_failures_map_to_connection_errors() {
        let err = catalogue_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, CatalogueRepositoryError::connection("timed out"));
    }
}
