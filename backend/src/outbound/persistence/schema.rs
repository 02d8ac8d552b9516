//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `admin` or `user`.
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer tokens, stored as SHA-256 hex digests.
    access_tokens (id) {
        id -> Int8,
        user_id -> Int8,
        token_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Int8,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        title -> Varchar,
        description -> Nullable<Text>,
        ingredients -> Text,
        instructions -> Text,
        category_id -> Nullable<Int8>,
        user_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    favorites (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(access_tokens -> users (user_id));
diesel::joinable!(recipes -> categories (category_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(favorites -> users (user_id));
diesel::joinable!(favorites -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(access_tokens, categories, favorites, recipes, users,);
