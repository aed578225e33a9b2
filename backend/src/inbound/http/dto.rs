//! Response bodies shared by several endpoint groups.
//!
//! Domain types stay free of presentation concerns; these DTOs flatten them
//! into the JSON shapes clients consume and resolve stored image paths into
//! public URLs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::state::Presentation;
use crate::domain::{
    AuthorCard, Ingredient, RecipeIngredientView, RecipeSummary, RecipeView, Tag, UserCard,
};

/// Public user profile as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "ada")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user.
    pub is_subscribed: bool,
    /// Public avatar URL.
    #[schema(example = "/media/users/3f2c.png")]
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn from_card(card: UserCard, presentation: &Presentation) -> Self {
        let UserCard {
            user,
            is_subscribed,
        } = card;
        Self {
            id: user.id.get(),
            email: user.email.as_str().to_owned(),
            username: user.username.as_str().to_owned(),
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user
                .avatar
                .as_ref()
                .map(|path| presentation.image_url(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            slug: tag.slug.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i64,
    #[schema(example = "Salt")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    #[schema(example = 200)]
    pub amount: u32,
}

impl From<RecipeIngredientView> for RecipeIngredientResponse {
    fn from(line: RecipeIngredientView) -> Self {
        Self {
            id: line.ingredient.id.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe with viewer-relative flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    #[schema(example = "Tomato soup")]
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    /// Minutes.
    #[schema(example = 30)]
    pub cooking_time: u32,
}

impl RecipeResponse {
    pub fn from_view(view: RecipeView, presentation: &Presentation) -> Self {
        Self {
            id: view.id.get(),
            tags: view.tags.into_iter().map(TagResponse::from).collect(),
            author: UserResponse::from_card(view.author, presentation),
            ingredients: view
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: view.name,
            image: view.image.as_ref().map(|path| presentation.image_url(path)),
            text: view.text,
            cooking_time: view.cooking_time,
        }
    }
}

/// Compact recipe used in collections and author cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: u32,
}

impl RecipeSummaryResponse {
    pub fn from_summary(summary: RecipeSummary, presentation: &Presentation) -> Self {
        Self {
            id: summary.id.get(),
            name: summary.name,
            image: summary
                .image
                .as_ref()
                .map(|path| presentation.image_url(path)),
            cooking_time: summary.cooking_time,
        }
    }
}

/// Followed author with a preview of their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl AuthorResponse {
    pub fn from_card(card: AuthorCard, presentation: &Presentation) -> Self {
        Self {
            user: UserResponse::from_card(card.card, presentation),
            recipes: card
                .recipes
                .into_iter()
                .map(|summary| RecipeSummaryResponse::from_summary(summary, presentation))
                .collect(),
            recipes_count: card.recipes_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, ImagePath, RecipeId, User, UserId, Username};
    use rstest::rstest;
    use serde_json::json;

    fn card() -> UserCard {
        UserCard {
            user: User {
                id: UserId::new(3),
                email: Email::new("ada@example.com").expect("email"),
                username: Username::new("ada").expect("username"),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                avatar: Some(ImagePath::new("users/ada.png").expect("path")),
                is_admin: true,
            },
            is_subscribed: true,
        }
    }

    #[rstest]
    fn user_json_hides_admin_flag_and_resolves_avatar() {
        let value =
            serde_json::to_value(UserResponse::from_card(card(), &Presentation::default()))
                .expect("json");
        assert_eq!(
            value,
            json!({
                "id": 3,
                "email": "ada@example.com",
                "username": "ada",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "is_subscribed": true,
                "avatar": "/media/users/ada.png",
            })
        );
    }

    #[rstest]
    fn author_card_flattens_profile() {
        let author = AuthorCard {
            card: card(),
            recipes: vec![RecipeSummary {
                id: RecipeId::new(8),
                name: "Pie".to_owned(),
                image: None,
                cooking_time: 40,
            }],
            recipes_count: 12,
        };
        let value = serde_json::to_value(AuthorResponse::from_card(
            author,
            &Presentation::default(),
        ))
        .expect("json");
        assert_eq!(value["username"], "ada");
        assert_eq!(value["recipes_count"], 12);
        assert_eq!(
            value["recipes"],
            json!([{ "id": 8, "name": "Pie", "image": null, "cooking_time": 40 }])
        );
    }
}
