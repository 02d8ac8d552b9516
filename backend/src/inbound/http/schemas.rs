//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema mirrors are only read by utoipa during OpenAPI generation"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The write would break a uniqueness or dependency rule.
    #[schema(rename = "conflict")]
    Conflict,
    /// The keto API failed or could not be reached.
    #[schema(rename = "upstream_unavailable")]
    UpstreamUnavailable,
    /// The database is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title is required")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, e.g. `{"field":"title","code":"required"}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "admin")]
    Admin,
    #[schema(rename = "user")]
    User,
}

/// OpenAPI schema for [`crate::domain::CategoryView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CategoryView)]
pub struct CategoryViewSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Breakfast")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::UserSummaryView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSummaryView)]
pub struct UserSummaryViewSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Admin")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::UserContactView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserContactView)]
pub struct UserContactViewSchema {
    #[schema(example = 2)]
    id: i64,
    #[schema(example = "Demo User 1")]
    name: String,
    #[schema(example = "user1@mail.com")]
    email: String,
}

/// OpenAPI schema for [`crate::domain::AccountView`].
///
/// The authenticated caller's own account.
#[derive(ToSchema)]
#[schema(as = crate::domain::AccountView)]
pub struct AccountViewSchema {
    #[schema(example = 2)]
    id: i64,
    #[schema(example = "Demo User 1")]
    name: String,
    #[schema(example = "user1@mail.com")]
    email: String,
    role: RoleSchema,
}

/// OpenAPI schema for [`crate::domain::RecipeView`].
///
/// A recipe with its category, creator, and favorite count embedded.
/// Relations that are absent render as `null`.
#[derive(ToSchema)]
#[schema(as = crate::domain::RecipeView)]
pub struct RecipeViewSchema {
    #[schema(example = 3)]
    id: i64,
    #[schema(example = "Pancakes")]
    title: String,
    #[schema(example = "Fluffy breakfast pancakes")]
    description: Option<String>,
    #[schema(example = "Flour, Eggs, Milk")]
    ingredients: String,
    #[schema(example = "Mix and fry.")]
    instructions: String,
    category: Option<CategoryViewSchema>,
    creator: Option<UserSummaryViewSchema>,
    #[schema(example = 2)]
    favorited_by_count: u64,
}

/// OpenAPI schema for [`crate::domain::FavoriteView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FavoriteView)]
pub struct FavoriteViewSchema {
    #[schema(example = 9)]
    id: i64,
    user: UserContactViewSchema,
    recipe: RecipeViewSchema,
}

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = pagination::PageMeta)]
pub struct PageMetaSchema {
    #[schema(example = 1)]
    current_page: u32,
    #[schema(example = 10)]
    per_page: u32,
    #[schema(example = 42)]
    total: u64,
    #[schema(example = 5)]
    last_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_has_expected_name() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
    }

    #[test]
    fn error_schema_uses_the_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"), "missing traceId: {schema_json}");
        assert!(schema_json.contains("details"), "missing details: {schema_json}");
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "upstream_unavailable",
            "service_unavailable",
            "internal_error",
        ] {
            let variant = serde_json::to_string(&code).expect("quoted code");
            assert!(schema_json.contains(&variant), "missing {code}");
        }
    }

    #[test]
    fn recipe_schema_embeds_relations() {
        let schema_json = schema_to_json::<RecipeViewSchema>();
        assert_eq!(RecipeViewSchema::name(), "crate.domain.RecipeView");
        for field in ["category", "creator", "favorited_by_count"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
