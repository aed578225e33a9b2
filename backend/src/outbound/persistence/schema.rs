//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations. Audit columns the
//! application never reads (`created_at`) are left out.

diesel::table! {
    /// Registered accounts. `email` is the login identifier.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// PHC-formatted password hash.
        password_hash -> Text,
        /// Media-relative avatar path.
        avatar -> Nullable<Varchar>,
        is_admin -> Bool,
    }
}

diesel::table! {
    /// Directed follow edges; `user_id` follows `author_id`.
    subscriptions (id) {
        id -> Int8,
        user_id -> Int8,
        author_id -> Int8,
    }
}

diesel::table! {
    tags (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        author_id -> Int8,
        name -> Varchar,
        /// Media-relative image path.
        image -> Nullable<Varchar>,
        text -> Text,
        /// Minutes, at least 1.
        cooking_time -> Int4,
    }
}

diesel::table! {
    recipe_tags (id) {
        id -> Int8,
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    recipe_ingredients (id) {
        id -> Int8,
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Int4,
    }
}

diesel::table! {
    favorite_recipes (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    shopping_cart (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    short_links (id) {
        id -> Int8,
        original_url -> Varchar,
        url_hash -> Varchar,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    subscriptions,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
    favorite_recipes,
    shopping_cart,
    short_links,
);
