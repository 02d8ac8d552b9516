//! Domain entities, policies, and use-cases.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters call the
//! services; the services talk to storage and the keto upstream only through
//! the traits in [`ports`].

pub mod account;
pub mod account_service;
pub mod authorization;
mod catalogue_errors;
pub mod category;
pub mod category_service;
pub mod error;
pub mod favorite;
pub mod favorite_service;
pub mod ids;
pub mod keto_proxy;
pub mod ports;
pub mod projection;
pub mod recipe;
pub mod recipe_export;
pub mod recipe_filter;
pub mod recipe_search;
pub mod recipe_service;
pub mod seed;
#[cfg(test)]
pub(crate) mod test_fixtures;
pub mod trace_id;
pub mod user;

pub use self::account::{
    AccountValidationError, IssuedToken, LoginCredentials, MIN_PASSWORD_LEN, Registration,
    TokenDigest,
};
pub use self::account_service::{AccountService, AuthenticatedSession};
pub use self::authorization::{
    Action, Decision, Denial, FavoriteScope, Principal, Role, UnknownRole, authorize,
    ensure_allowed,
};
pub use self::category::{Category, CategoryName, CategoryValidationError, MAX_CATEGORY_NAME_LEN};
pub use self::category_service::CategoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::favorite::{Favorite, FavoriteDetails};
pub use self::favorite_service::{FavoriteService, FavoriteUniquenessGuard};
pub use self::ids::{CategoryId, FavoriteId, RecipeId, UserId};
pub use self::keto_proxy::KetoProxy;
pub use self::projection::{
    AccountView, CategoryView, FavoriteView, RecipeView, UserContactView, UserSummaryView,
};
pub use self::recipe::{
    MAX_TITLE_LEN, Recipe, RecipeDetails, RecipeDraft, RecipePatch, RecipeValidationError,
};
pub use self::recipe_export::{
    CSV_HEADER, EXPORT_BATCH_SIZE, ExportCursor, RecipeCsvExporter, export_filename,
};
pub use self::recipe_filter::{
    Combinator, FieldMatch, RecipeDocument, RecipeField, RecipeFilters, RecipePredicate,
};
pub use self::recipe_search::{RecipeSearchEngine, TitleSort};
pub use self::recipe_service::RecipeService;
pub use self::seed::{CatalogueSeeder, DEMO_ADMIN_EMAIL, DEMO_PASSWORD, SeedError, SeedReport};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, MAX_USER_FIELD_LEN, NewAccount, StoredAccount, User, UserName,
    UserValidationError,
};
