//! Data models for cocktail recipes.
//!
//! - `Recipe`, `Ingredient`: the typed record every other module works with
//! - `ApiDrink`: the upstream wire shape, decoded once via `ApiDrink::into_recipe`

pub mod recipe;

pub use recipe::{ApiDrink, Ingredient, Recipe, MAX_INGREDIENTS};
