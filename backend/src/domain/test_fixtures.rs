//! Builders for domain values shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::{
    Category, CategoryId, Principal, Recipe, RecipeDetails, RecipeId, Role, User, UserId,
};

pub(crate) fn admin() -> Principal {
    Principal::new(UserId::new(1), Role::Admin)
}

pub(crate) fn member(id: i64) -> Principal {
    Principal::new(UserId::new(id), Role::User)
}

pub(crate) fn user(id: i64, role: Role) -> User {
    User {
        id: UserId::new(id),
        name: format!("User {id}"),
        email: format!("user{id}@mail.com"),
        role,
    }
}

pub(crate) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

pub(crate) fn category(id: i64, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_owned(),
    }
}

pub(crate) fn recipe_details(id: i64, title: &str, category: Option<Category>) -> RecipeDetails {
    RecipeDetails {
        recipe: Recipe {
            id: RecipeId::new(id),
            title: title.to_owned(),
            description: Some(format!("About {title}")),
            ingredients: "Flour, Eggs".to_owned(),
            instructions: "Mix and cook.".to_owned(),
            category_id: category.as_ref().map(|c| c.id),
            user_id: UserId::new(1),
            created_at: created_at(),
        },
        category,
        creator: Some(user(1, Role::Admin)),
        favorited_by_count: 0,
    }
}
