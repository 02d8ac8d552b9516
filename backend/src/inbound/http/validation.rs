//! Shared validation helpers for HTTP handlers.
//!
//! Every validation failure becomes an `invalid_request` error whose details
//! name the offending request field and a machine-readable code:
//!
//! ```text
//! {"code":"invalid_request","message":"title is required",
//!  "details":{"field":"title","code":"required"}}
//! ```

use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::ports::KetoCategoryId;
use crate::domain::{
    AccountValidationError, CategoryValidationError, Error, RecipeValidationError,
};

/// Build an `invalid_request` error pointing at `field`.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn map_account_validation_error(err: AccountValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn map_recipe_validation_error(err: RecipeValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn map_category_validation_error(err: CategoryValidationError) -> Error {
    let code = match err {
        CategoryValidationError::EmptyName => "required",
        CategoryValidationError::NameTooLong { .. } => "too_long",
    };
    field_error("name", code, err.to_string())
}

fn map_page_error(err: PageRequestError) -> Error {
    let field = match err {
        PageRequestError::PageOutOfRange => "page",
        PageRequestError::PerPageOutOfRange { .. } => "per_page",
    };
    field_error(field, "out_of_range", err.to_string())
}

/// Validate `page`/`per_page` query parameters, applying defaults.
pub(crate) fn page_request(page: Option<u32>, per_page: Option<u32>) -> Result<PageRequest, Error> {
    PageRequest::from_query(page, per_page).map_err(map_page_error)
}

/// Parse the keto `category` query parameter: an integer of 1 or more.
pub(crate) fn keto_category(raw: Option<&str>) -> Result<KetoCategoryId, Error> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty()).ok_or_else(|| {
        field_error("category", "required", "category is required")
    })?;
    raw.parse::<u32>()
        .ok()
        .and_then(KetoCategoryId::new)
        .ok_or_else(|| {
            field_error(
                "category",
                "invalid",
                "category must be an integer of at least 1",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details()?.get(key).and_then(Value::as_str)
    }

    #[rstest]
    #[case(Some(0), None, "page")]
    #[case(None, Some(0), "per_page")]
    #[case(Some(1), Some(101), "per_page")]
    fn rejects_out_of_range_pages(
        #[case] page: Option<u32>,
        #[case] per_page: Option<u32>,
        #[case] field: &str,
    ) {
        let err = page_request(page, per_page).expect_err("out of range");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some("out_of_range"));
    }

    #[rstest]
    fn page_defaults_apply() {
        let request = page_request(None, None).expect("defaults are valid");
        assert_eq!((request.page(), request.per_page()), (1, 10));
    }

    #[rstest]
    #[case(Some("3"), Ok(3))]
    #[case(Some(" 12 "), Ok(12))]
    #[case(None, Err("required"))]
    #[case(Some(""), Err("required"))]
    #[case(Some("0"), Err("invalid"))]
    #[case(Some("-4"), Err("invalid"))]
    #[case(Some("keto"), Err("invalid"))]
    fn parses_keto_categories(#[case] raw: Option<&str>, #[case] expected: Result<u32, &str>) {
        match (keto_category(raw), expected) {
            (Ok(id), Ok(want)) => assert_eq!(id.get(), want),
            (Err(err), Err(code)) => {
                assert_eq!(err.code(), ErrorCode::InvalidRequest);
                assert_eq!(detail(&err, "field"), Some("category"));
                assert_eq!(detail(&err, "code"), Some(code));
            }
            (actual, want) => panic!("unexpected outcome {actual:?} for {want:?}"),
        }
    }

    #[rstest]
    fn category_names_report_the_name_field() {
        let err = map_category_validation_error(CategoryValidationError::NameTooLong { max: 255 });
        assert_eq!(detail(&err, "field"), Some("name"));
        assert_eq!(detail(&err, "code"), Some("too_long"));
        assert_eq!(err.message(), "name must be at most 255 characters");
    }

    #[rstest]
    fn recipe_errors_keep_their_field() {
        let err = map_recipe_validation_error(RecipeValidationError::EmptyInstructions);
        assert_eq!(detail(&err, "field"), Some("instructions"));
        assert_eq!(detail(&err, "code"), Some("required"));
    }
}
