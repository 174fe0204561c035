use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of numbered ingredient/measure slots the upstream exposes.
pub const MAX_INGREDIENTS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Option<String>,
}

impl Ingredient {
    /// Display line for the result card, e.g. "Tequila 1 1/2 oz".
    pub fn display(&self) -> String {
        match self.measure {
            Some(ref measure) => format!("{} {}", self.name, measure),
            None => self.name.clone(),
        }
    }
}

/// A decoded cocktail. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub glass: Option<String>,
    #[serde(default)]
    pub alcoholic: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Minimal recipe with only a name. Mostly useful in tests and fakes.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            thumbnail: None,
            instructions: None,
            category: None,
            glass: None,
            alcoholic: None,
            ingredients: Vec::new(),
        }
    }

    pub fn display_ingredients(&self) -> Vec<String> {
        self.ingredients.iter().map(Ingredient::display).collect()
    }
}

/// One drink object as returned by `search.php`.
///
/// The numbered `strIngredientN` / `strMeasureN` fields land in `slots`
/// and are only ever read by `into_recipe`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDrink {
    #[serde(rename = "idDrink", default)]
    pub id: Option<String>,
    #[serde(rename = "strDrink")]
    pub name: String,
    #[serde(rename = "strDrinkThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strGlass", default)]
    pub glass: Option<String>,
    #[serde(rename = "strAlcoholic", default)]
    pub alcoholic: Option<String>,
    #[serde(flatten)]
    slots: HashMap<String, Value>,
}

impl ApiDrink {
    fn slot(&self, prefix: &str, index: usize) -> Option<String> {
        self.slots
            .get(&format!("{prefix}{index}"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Convert the wire record into a typed `Recipe`.
    /// Empty ingredient slots are dropped; slot order is kept.
    pub fn into_recipe(self) -> Recipe {
        let ingredients = (1..=MAX_INGREDIENTS)
            .filter_map(|i| {
                let name = self.slot("strIngredient", i)?;
                Some(Ingredient {
                    name,
                    measure: self.slot("strMeasure", i),
                })
            })
            .collect();

        Recipe {
            id: non_blank(self.id),
            name: self.name,
            thumbnail: non_blank(self.thumbnail),
            instructions: non_blank(self.instructions),
            category: non_blank(self.category),
            glass: non_blank(self.glass),
            alcoholic: non_blank(self.alcoholic),
            ingredients,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGARITA: &str = r#"{
        "idDrink": "11007",
        "strDrink": "Margarita",
        "strDrinkThumb": "https://example.test/margarita.jpg",
        "strInstructions": "Rub the rim of the glass with the lime slice.",
        "strCategory": "Ordinary Drink",
        "strGlass": "Cocktail glass",
        "strAlcoholic": "Alcoholic",
        "strIngredient1": "Tequila",
        "strIngredient2": "Triple sec",
        "strIngredient3": "",
        "strIngredient4": "Salt",
        "strIngredient5": null,
        "strMeasure1": "1 1/2 oz ",
        "strMeasure2": "1/2 oz",
        "strMeasure3": null,
        "strMeasure4": null,
        "strMeasure5": null,
        "dateModified": "2015-08-18 14:42:59"
    }"#;

    #[test]
    fn test_into_recipe_skips_empty_slots() {
        let drink: ApiDrink = serde_json::from_str(MARGARITA).unwrap();
        let recipe = drink.into_recipe();

        assert_eq!(recipe.name, "Margarita");
        assert_eq!(recipe.id.as_deref(), Some("11007"));
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].name, "Tequila");
        assert_eq!(recipe.ingredients[0].measure.as_deref(), Some("1 1/2 oz"));
        assert_eq!(recipe.ingredients[2].name, "Salt");
        assert_eq!(recipe.ingredients[2].measure, None);
    }

    #[test]
    fn test_display_ingredients() {
        let drink: ApiDrink = serde_json::from_str(MARGARITA).unwrap();
        let lines = drink.into_recipe().display_ingredients();
        assert_eq!(lines, vec!["Tequila 1 1/2 oz", "Triple sec 1/2 oz", "Salt"]);
    }

    #[test]
    fn test_into_recipe_sparse_high_slot() {
        let json = r#"{"strDrink": "Odd", "strIngredient15": "Bitters", "strMeasure15": "2 dashes"}"#;
        let recipe = serde_json::from_str::<ApiDrink>(json).unwrap().into_recipe();
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].display(), "Bitters 2 dashes");
        assert_eq!(recipe.thumbnail, None);
    }

    #[test]
    fn test_recipe_serde_round_trip_keeps_equality() {
        let recipe = serde_json::from_str::<ApiDrink>(MARGARITA).unwrap().into_recipe();
        let json = serde_json::to_string(&recipe).unwrap();
        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recipe);
    }
}
