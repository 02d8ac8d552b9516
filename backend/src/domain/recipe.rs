//! Recipes and their write payloads.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{Category, CategoryId, RecipeId, User, UserId};

/// Longest accepted recipe title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Validation errors for recipe payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyIngredients,
    EmptyInstructions,
}

impl RecipeValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyIngredients => "ingredients",
            Self::EmptyInstructions => "instructions",
        }
    }

    /// Machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TitleTooLong { .. } => "too_long",
            Self::EmptyTitle | Self::EmptyIngredients | Self::EmptyInstructions => "required",
        }
    }
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyIngredients => write!(f, "ingredients are required"),
            Self::EmptyInstructions => write!(f, "instructions are required"),
        }
    }
}

impl std::error::Error for RecipeValidationError {}

fn validate_title(raw: &str) -> Result<String, RecipeValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RecipeValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(RecipeValidationError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    Ok(trimmed.to_owned())
}

fn validate_body(raw: &str, missing: RecipeValidationError) -> Result<String, RecipeValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(missing);
    }
    Ok(trimmed.to_owned())
}

fn normalise_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// A stored recipe row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub category_id: Option<CategoryId>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A recipe with the relations rendered alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub category: Option<Category>,
    pub creator: Option<User>,
    pub favorited_by_count: u64,
}

/// Validated payload for creating a recipe.
///
/// The author is never part of the payload; services attach the acting
/// principal's id when persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub category_id: Option<CategoryId>,
}

impl RecipeDraft {
    /// Validate raw fields into a draft.
    ///
    /// # Examples
    /// ```
    /// use recipe_catalogue::domain::RecipeDraft;
    ///
    /// let draft = RecipeDraft::try_from_parts("Pancakes", None, "Flour", "Whisk", None)
    ///     .expect("valid draft");
    /// assert_eq!(draft.title, "Pancakes");
    /// ```
    pub fn try_from_parts(
        title: &str,
        description: Option<&str>,
        ingredients: &str,
        instructions: &str,
        category_id: Option<CategoryId>,
    ) -> Result<Self, RecipeValidationError> {
        Ok(Self {
            title: validate_title(title)?,
            description: normalise_description(description),
            ingredients: validate_body(ingredients, RecipeValidationError::EmptyIngredients)?,
            instructions: validate_body(instructions, RecipeValidationError::EmptyInstructions)?,
            category_id,
        })
    }
}

/// Validated partial update. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub category_id: Option<Option<CategoryId>>,
}

impl RecipePatch {
    /// Validate the fields present in a partial update.
    pub fn try_from_parts(
        title: Option<&str>,
        description: Option<Option<&str>>,
        ingredients: Option<&str>,
        instructions: Option<&str>,
        category_id: Option<Option<CategoryId>>,
    ) -> Result<Self, RecipeValidationError> {
        Ok(Self {
            title: title.map(validate_title).transpose()?,
            description: description.map(normalise_description),
            ingredients: ingredients
                .map(|raw| validate_body(raw, RecipeValidationError::EmptyIngredients))
                .transpose()?,
            instructions: instructions
                .map(|raw| validate_body(raw, RecipeValidationError::EmptyInstructions))
                .transpose()?,
            category_id,
        })
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.category_id.is_none()
    }

    /// Apply the patch to an in-memory recipe.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            recipe.description.clone_from(description);
        }
        if let Some(ingredients) = &self.ingredients {
            recipe.ingredients.clone_from(ingredients);
        }
        if let Some(instructions) = &self.instructions {
            recipe.instructions.clone_from(instructions);
        }
        if let Some(category_id) = self.category_id {
            recipe.category_id = category_id;
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "Flour", "Whisk", RecipeValidationError::EmptyTitle)]
    #[case("Pancakes", " ", "Whisk", RecipeValidationError::EmptyIngredients)]
    #[case("Pancakes", "Flour", "", RecipeValidationError::EmptyInstructions)]
    fn draft_requires_fields(
        #[case] title: &str,
        #[case] ingredients: &str,
        #[case] instructions: &str,
        #[case] expected: RecipeValidationError,
    ) {
        let result = RecipeDraft::try_from_parts(title, None, ingredients, instructions, None);
        assert_eq!(result, Err(expected));
    }

    #[rstest]
    fn draft_drops_blank_description() {
        let draft = RecipeDraft::try_from_parts("Toast", Some("  "), "Bread", "Toast it", None)
            .expect("valid draft");
        assert_eq!(draft.description, None);
    }

    #[rstest]
    fn long_titles_are_rejected() {
        let title = "t".repeat(MAX_TITLE_LEN + 1);
        let error = RecipeDraft::try_from_parts(&title, None, "a", "b", None)
            .expect_err("title too long");
        assert_eq!(error.field(), "title");
        assert_eq!(error.code(), "too_long");
    }

    #[rstest]
    fn patch_applies_present_fields_only() {
        let mut recipe = Recipe {
            id: RecipeId::new(1),
            title: "Pancakes".to_owned(),
            description: Some("Fluffy".to_owned()),
            ingredients: "Flour".to_owned(),
            instructions: "Whisk".to_owned(),
            category_id: Some(CategoryId::new(4)),
            user_id: UserId::new(1),
            created_at: DateTime::<Utc>::default(),
        };
        let patch = RecipePatch::try_from_parts(Some("Crepes"), Some(None), None, None, Some(None))
            .expect("valid patch");
        patch.apply_to(&mut recipe);
        assert_eq!(recipe.title, "Crepes");
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.ingredients, "Flour");
        assert_eq!(recipe.category_id, None);
    }

    #[rstest]
    fn empty_patch_is_detected() {
        assert!(RecipePatch::default().is_empty());
    }
}
