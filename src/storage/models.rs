use serde::{Deserialize, Serialize};

/// A persisted alias: `token` maps one-to-one to `origin_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    pub origin_path: String,
    pub token: String,
}

/// Result of trying to persist a new [`ShortLink`].
///
/// Both conflict kinds are reported by the storage layer's uniqueness
/// constraints, not by a prior lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another record already owns this token.
    TokenTaken,
    /// Another record was created for the same origin path in the meantime.
    OriginTaken,
}

/// Author fields shown in a dish header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl AuthorView {
    /// `"{first} {last} ({username})"`
    pub fn display_name(&self) -> String {
        format!("{} {} ({})", self.first_name, self.last_name, self.username)
    }
}

/// One ingredient row of a recipe with its name and unit already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Read-only projection of a recipe used for shopping-list generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishView {
    pub name: String,
    pub author: AuthorView,
    pub cooking_time: u32,
    pub text: String,
    pub ingredients: Vec<IngredientLine>,
}

/// Compact recipe representation returned after cart/favorite changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub cooking_time: u32,
}

/// Public user fields returned by subscription endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// Per-user recipe bookmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeRelation {
    Favorite,
    ShoppingCart,
}

impl RecipeRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Message used when the pair already exists.
    pub fn duplicate_message(&self) -> &'static str {
        match self {
            Self::Favorite => "Recipe already favorited",
            Self::ShoppingCart => "Recipe already in cart",
        }
    }

    /// Message used when removing a pair that does not exist.
    pub fn missing_message(&self) -> &'static str {
        match self {
            Self::Favorite => "Recipe is not in favorites",
            Self::ShoppingCart => "Recipe is not in cart",
        }
    }
}

/// Ingredient dictionary entry, as found in import files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
