//! Recipe categories.

use std::fmt;

use super::CategoryId;

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 255;

/// Validation errors for category names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is required"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// A trimmed, non-empty category name.
///
/// # Examples
/// ```
/// use recipe_catalogue::domain::CategoryName;
///
/// let name = CategoryName::new("  Breakfast ").expect("valid name");
/// assert_eq!(name.as_str(), "Breakfast");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Trim and validate a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CategoryValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if trimmed.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong {
                max: MAX_CATEGORY_NAME_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
