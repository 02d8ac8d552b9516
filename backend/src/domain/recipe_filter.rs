//! Storage-independent recipe predicates.
//!
//! Listing filters narrow with AND across distinct fields; a search term
//! widens with OR across every field. Both reduce to a [`RecipePredicate`]:
//! a combinator over case-insensitive substring clauses. Adapters either
//! translate the predicate into SQL (`ILIKE '%needle%'`) or evaluate it in
//! memory with [`RecipePredicate::matches`].

/// Recipe attributes a clause can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeField {
    /// Recipe title.
    Title,
    /// Free-text description; recipes without one never match.
    Description,
    /// Ingredient list.
    Ingredients,
    /// Preparation steps.
    Instructions,
    /// Name of the related category; recipes without one never match.
    CategoryName,
}

impl RecipeField {
    /// Every searchable field, in search order.
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::Ingredients,
        Self::Instructions,
        Self::CategoryName,
    ];
}

/// A case-insensitive substring test against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    field: RecipeField,
    needle: String,
}

impl FieldMatch {
    /// Build a clause. The needle is matched as a literal substring.
    pub fn new(field: RecipeField, needle: impl Into<String>) -> Self {
        Self {
            field,
            needle: needle.into(),
        }
    }

    /// Field under test.
    pub fn field(&self) -> RecipeField {
        self.field
    }

    /// Literal substring to look for.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    fn matches(&self, document: &RecipeDocument<'_>) -> bool {
        let haystack = match self.field {
            RecipeField::Title => Some(document.title),
            RecipeField::Description => document.description,
            RecipeField::Ingredients => Some(document.ingredients),
            RecipeField::Instructions => Some(document.instructions),
            RecipeField::CategoryName => document.category_name,
        };
        haystack.is_some_and(|text| contains_ignore_case(text, &self.needle))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// How clauses combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Every clause must hold. No clauses means no constraint.
    All,
    /// At least one clause must hold.
    Any,
}

/// A composed condition over recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePredicate {
    combinator: Combinator,
    clauses: Vec<FieldMatch>,
}

impl RecipePredicate {
    /// The predicate accepting every recipe.
    pub fn everything() -> Self {
        Self {
            combinator: Combinator::All,
            clauses: Vec::new(),
        }
    }

    /// OR the same term across every searchable field.
    ///
    /// # Examples
    /// ```
    /// use recipe_catalogue::domain::{Combinator, RecipePredicate};
    ///
    /// let predicate = RecipePredicate::search("pan");
    /// assert_eq!(predicate.combinator(), Combinator::Any);
    /// assert_eq!(predicate.clauses().len(), 5);
    /// ```
    pub fn search(term: &str) -> Self {
        Self {
            combinator: Combinator::Any,
            clauses: RecipeField::ALL
                .iter()
                .map(|field| FieldMatch::new(*field, term))
                .collect(),
        }
    }

    /// How the clauses combine.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// The individual field tests.
    pub fn clauses(&self) -> &[FieldMatch] {
        &self.clauses
    }

    /// Whether the predicate imposes any constraint.
    pub fn is_unconstrained(&self) -> bool {
        self.combinator == Combinator::All && self.clauses.is_empty()
    }

    /// Evaluate the predicate against a materialised recipe.
    pub fn matches(&self, document: &RecipeDocument<'_>) -> bool {
        match self.combinator {
            Combinator::All => self.clauses.iter().all(|clause| clause.matches(document)),
            Combinator::Any => self.clauses.iter().any(|clause| clause.matches(document)),
        }
    }
}

/// Borrowed view of the recipe text the predicate inspects.
#[derive(Debug, Clone, Copy)]
pub struct RecipeDocument<'a> {
    /// Recipe title.
    pub title: &'a str,
    /// Description, when the recipe has one.
    pub description: Option<&'a str>,
    /// Ingredient list.
    pub ingredients: &'a str,
    /// Preparation steps.
    pub instructions: &'a str,
    /// Name of the related category, when there is one.
    pub category_name: Option<&'a str>,
}

/// Optional listing filters. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilters {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub category: Option<String>,
}

impl RecipeFilters {
    /// AND every present filter into one predicate.
    ///
    /// # Examples
    /// ```
    /// use recipe_catalogue::domain::{RecipeDocument, RecipeFilters};
    ///
    /// let filters = RecipeFilters {
    ///     title: Some("egg".into()),
    ///     ..RecipeFilters::default()
    /// };
    /// let predicate = filters.build();
    /// let document = RecipeDocument {
    ///     title: "Scrambled Eggs",
    ///     description: None,
    ///     ingredients: "Eggs",
    ///     instructions: "Stir",
    ///     category_name: None,
    /// };
    /// assert!(predicate.matches(&document));
    /// ```
    pub fn build(&self) -> RecipePredicate {
        let candidates = [
            (RecipeField::Title, &self.title),
            (RecipeField::Description, &self.description),
            (RecipeField::Ingredients, &self.ingredients),
            (RecipeField::Instructions, &self.instructions),
            (RecipeField::CategoryName, &self.category),
        ];
        let clauses = candidates
            .into_iter()
            .filter_map(|(field, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|needle| !needle.is_empty())
                    .map(|needle| FieldMatch::new(field, needle))
            })
            .collect();
        RecipePredicate {
            combinator: Combinator::All,
            clauses,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    struct Sample {
        title: &'static str,
        description: Option<&'static str>,
        ingredients: &'static str,
        instructions: &'static str,
        category: Option<&'static str>,
    }

    impl Sample {
        fn document(&self) -> RecipeDocument<'_> {
            RecipeDocument {
                title: self.title,
                description: self.description,
                ingredients: self.ingredients,
                instructions: self.instructions,
                category_name: self.category,
            }
        }
    }

    #[fixture]
    fn pancakes() -> Sample {
        Sample {
            title: "Pancakes",
            description: Some("Fluffy pancakes"),
            ingredients: "Flour, Eggs, Milk",
            instructions: "Mix and fry.",
            category: Some("Breakfast"),
        }
    }

    #[fixture]
    fn tacos() -> Sample {
        Sample {
            title: "Vegan Tacos",
            description: None,
            ingredients: "Tortillas, Beans",
            instructions: "Warm and fill.",
            category: None,
        }
    }

    fn filters(title: Option<&str>, category: Option<&str>) -> RecipeFilters {
        RecipeFilters {
            title: title.map(str::to_owned),
            category: category.map(str::to_owned),
            ..RecipeFilters::default()
        }
    }

    #[rstest]
    fn no_filters_match_everything(pancakes: Sample, tacos: Sample) {
        let predicate = RecipeFilters::default().build();
        assert!(predicate.is_unconstrained());
        assert!(predicate.matches(&pancakes.document()));
        assert!(predicate.matches(&tacos.document()));
    }

    #[rstest]
    fn blank_filters_are_ignored() {
        let predicate = filters(Some("   "), Some("")).build();
        assert!(predicate.is_unconstrained());
    }

    #[rstest]
    #[case(filters(Some("PAN"), None), true)]
    #[case(filters(Some("pan"), Some("break")), true)]
    #[case(filters(Some("pan"), Some("dinner")), false)]
    #[case(filters(Some("taco"), Some("break")), false)]
    fn filters_combine_with_and(
        pancakes: Sample,
        #[case] chosen: RecipeFilters,
        #[case] expected: bool,
    ) {
        assert_eq!(chosen.build().matches(&pancakes.document()), expected);
    }

    #[rstest]
    fn category_filter_never_matches_uncategorised(tacos: Sample) {
        let predicate = filters(None, Some("a")).build();
        assert!(!predicate.matches(&tacos.document()));
    }

    #[rstest]
    fn description_filter_skips_missing_description(tacos: Sample) {
        let predicate = RecipeFilters {
            description: Some("x".to_owned()),
            ..RecipeFilters::default()
        }
        .build();
        assert!(!predicate.matches(&tacos.document()));
    }

    #[rstest]
    #[case("flour")]
    #[case("FRY")]
    #[case("breakfast")]
    #[case("fluffy")]
    fn search_matches_any_field(pancakes: Sample, #[case] term: &str) {
        assert!(RecipePredicate::search(term).matches(&pancakes.document()));
    }

    #[rstest]
    fn search_term_present_in_one_field_of_one_recipe(pancakes: Sample, tacos: Sample) {
        let predicate = RecipePredicate::search("tortilla");
        assert!(!predicate.matches(&pancakes.document()));
        assert!(predicate.matches(&tacos.document()));
    }

    #[rstest]
    fn filters_preserve_field_order() {
        let predicate = RecipeFilters {
            instructions: Some("fry".to_owned()),
            title: Some("pan".to_owned()),
            ..RecipeFilters::default()
        }
        .build();
        let fields: Vec<_> = predicate.clauses().iter().map(FieldMatch::field).collect();
        assert_eq!(fields, vec![RecipeField::Title, RecipeField::Instructions]);
    }
}
