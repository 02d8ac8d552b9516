//! Demo catalogue seeding.
//!
//! Writes one admin, five regular users, the standard categories, eight
//! recipes, and a deterministic pair of favorites per user through the
//! repository ports. Seeding is skipped entirely once the admin account
//! exists, so repeated runs leave the store unchanged.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use zeroize::Zeroizing;

use super::ports::{
    AccountRepositoryError, CatalogueRepositoryError, CategoryRepository, FavoriteRepository,
    PasswordHashError, PasswordHasher, RecipeRepository, UserRepository,
};
use super::{
    CategoryId, CategoryName, CategoryValidationError, EmailAddress, NewAccount, RecipeDraft,
    RecipeId, RecipeValidationError, Role, UserName, UserValidationError,
};

/// Email of the seeded administrator.
pub const DEMO_ADMIN_EMAIL: &str = "admin@mail.com";
/// Password shared by every seeded account.
pub const DEMO_PASSWORD: &str = "password";
/// Number of regular users created alongside the admin.
pub const DEMO_USER_COUNT: usize = 5;
/// Favorites assigned to each seeded user.
pub const DEMO_FAVORITES_PER_USER: usize = 2;

/// Category names created by the seeder.
pub const DEMO_CATEGORIES: [&str; 5] = ["Breakfast", "Dinner", "Vegan", "Dessert", "Gluten-Free"];

/// A recipe fixture keyed by category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoRecipe {
    pub title: &'static str,
    pub description: &'static str,
    pub ingredients: &'static str,
    pub instructions: &'static str,
    pub category: &'static str,
}

/// Recipes created by the seeder, all authored by the admin.
pub const DEMO_RECIPES: [DemoRecipe; 8] = [
    DemoRecipe {
        title: "Pancakes",
        description: "Fluffy homemade pancakes",
        ingredients: "Flour, Milk, Eggs, Baking Powder, Sugar, Salt",
        instructions: "Mix all ingredients and cook on a skillet.",
        category: "Breakfast",
    },
    DemoRecipe {
        title: "Spaghetti Bolognese",
        description: "Classic Italian pasta with meat sauce",
        ingredients: "Spaghetti, Ground Beef, Tomato Sauce, Garlic, Onion, Olive Oil",
        instructions: "Cook pasta, prepare sauce, combine and serve.",
        category: "Dinner",
    },
    DemoRecipe {
        title: "Vegan Tacos",
        description: "Healthy and tasty vegan tacos",
        ingredients: "Tortillas, Black Beans, Avocado, Tomato, Onion, Cilantro",
        instructions: "Assemble all ingredients in tortillas.",
        category: "Vegan",
    },
    DemoRecipe {
        title: "Chicken Curry",
        description: "A spicy and creamy Indian-style chicken curry.",
        ingredients: "Chicken, Onion, Garlic, Ginger, Tomatoes, Coconut Milk, Curry Powder",
        instructions: "Cook onions, garlic, and ginger; add chicken and spices; simmer in coconut milk.",
        category: "Dinner",
    },
    DemoRecipe {
        title: "Avocado Toast",
        description: "A quick and healthy breakfast option.",
        ingredients: "Bread, Avocado, Lemon Juice, Salt, Pepper, Chili Flakes",
        instructions: "Toast bread, mash avocado with lemon, spread on toast, sprinkle toppings.",
        category: "Breakfast",
    },
    DemoRecipe {
        title: "Chocolate Cake",
        description: "Moist and rich chocolate layer cake.",
        ingredients: "Flour, Cocoa Powder, Eggs, Sugar, Baking Powder, Butter, Milk",
        instructions: "Mix ingredients, bake in a preheated oven at 180°C for 30 minutes.",
        category: "Dessert",
    },
    DemoRecipe {
        title: "Quinoa Salad",
        description: "A fresh and healthy gluten-free salad.",
        ingredients: "Quinoa, Cucumber, Tomato, Lemon, Olive Oil, Mint, Salt",
        instructions: "Cook quinoa, chop veggies, mix with lemon juice and olive oil.",
        category: "Gluten-Free",
    },
    DemoRecipe {
        title: "Banana Smoothie",
        description: "A creamy smoothie packed with energy.",
        ingredients: "Banana, Milk, Honey, Ice Cubes, Chia Seeds",
        instructions: "Blend all ingredients until smooth.",
        category: "Vegan",
    },
];

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReport {
    /// The admin account already existed; nothing was written.
    Skipped,
    /// Rows written by this run.
    Applied {
        users: usize,
        categories: usize,
        recipes: usize,
        favorites: usize,
    },
}

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("account persistence failed: {0}")]
    Accounts(#[from] AccountRepositoryError),
    #[error("catalogue persistence failed: {0}")]
    Catalogue(#[from] CatalogueRepositoryError),
    #[error("password hashing failed: {0}")]
    Hash(#[from] PasswordHashError),
    #[error("seed user is invalid: {0}")]
    User(#[from] UserValidationError),
    #[error("seed category is invalid: {0}")]
    Category(#[from] CategoryValidationError),
    #[error("seed recipe is invalid: {0}")]
    Recipe(#[from] RecipeValidationError),
}

/// Applies the demo dataset through the repository ports.
#[derive(Clone)]
pub struct CatalogueSeeder {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    recipes: Arc<dyn RecipeRepository>,
    favorites: Arc<dyn FavoriteRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CatalogueSeeder {
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        recipes: Arc<dyn RecipeRepository>,
        favorites: Arc<dyn FavoriteRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            categories,
            recipes,
            favorites,
            hasher,
        }
    }

    /// Seed the demo dataset unless the admin account already exists.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when hashing or any repository write fails.
    pub async fn seed(&self) -> Result<SeedReport, SeedError> {
        let admin_email = EmailAddress::new(DEMO_ADMIN_EMAIL)?;
        if self.users.find_by_email(&admin_email).await?.is_some() {
            info!("demo catalogue already present; skipping seed");
            return Ok(SeedReport::Skipped);
        }

        let password_hash = self.hasher.hash(&Zeroizing::new(DEMO_PASSWORD.to_owned()))?;
        let admin = self
            .users
            .create(&NewAccount {
                name: UserName::new("Admin")?,
                email: admin_email,
                role: Role::Admin,
                password_hash: password_hash.clone(),
            })
            .await?;

        let mut members = Vec::with_capacity(DEMO_USER_COUNT);
        for index in 1..=DEMO_USER_COUNT {
            let member = self
                .users
                .create(&NewAccount {
                    name: UserName::new(format!("Demo User {index}"))?,
                    email: EmailAddress::new(format!("user{index}@mail.com"))?,
                    role: Role::User,
                    password_hash: password_hash.clone(),
                })
                .await?;
            members.push(member);
        }

        let mut category_ids = Vec::with_capacity(DEMO_CATEGORIES.len());
        for raw in DEMO_CATEGORIES {
            let name = CategoryName::new(raw)?;
            let category = match self.categories.find_by_name(&name).await? {
                Some(existing) => existing,
                None => self.categories.create(&name).await?,
            };
            category_ids.push((raw, category.id));
        }

        let mut recipe_ids = Vec::with_capacity(DEMO_RECIPES.len());
        for fixture in &DEMO_RECIPES {
            let draft = RecipeDraft::try_from_parts(
                fixture.title,
                Some(fixture.description),
                fixture.ingredients,
                fixture.instructions,
                category_for(&category_ids, fixture.category),
            )?;
            recipe_ids.push(self.recipes.create(&draft, admin.id).await?);
        }

        let mut favorites = 0;
        for (index, member) in members.iter().enumerate() {
            for recipe_id in favorite_picks(&recipe_ids, index) {
                if !self.favorites.exists(member.id, recipe_id).await? {
                    self.favorites.create(member.id, recipe_id).await?;
                    favorites += 1;
                }
            }
        }

        let report = SeedReport::Applied {
            users: members.len() + 1,
            categories: category_ids.len(),
            recipes: recipe_ids.len(),
            favorites,
        };
        info!(?report, "demo catalogue seeded");
        Ok(report)
    }
}

fn category_for(ids: &[(&str, CategoryId)], name: &str) -> Option<CategoryId> {
    ids.iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, id)| *id)
}

/// Consecutive recipes starting at `2 * index`, wrapping around.
fn favorite_picks(recipes: &[RecipeId], index: usize) -> Vec<RecipeId> {
    if recipes.is_empty() {
        return Vec::new();
    }
    (0..DEMO_FAVORITES_PER_USER)
        .map(|offset| recipes[(index * DEMO_FAVORITES_PER_USER + offset) % recipes.len()])
        .collect()
}
