use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Image shown when a recipe has none
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=300&width=400";

/// Diet tag applied when a recipe carries no other diet information
pub const GENERAL_TAG: &str = "general";

/// Opaque recipe identifier.
///
/// Provider ids are numeric, json-server ids may be either numbers or strings,
/// so the id is kept as text and accepts both on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RecipeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(i64),
            Text(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Number(n) => RecipeId::from(n),
            Wire::Text(s) => RecipeId(s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Derive difficulty from total time and the number of instruction steps
    pub fn from_metrics(prep_time: u32, steps: usize) -> Self {
        if prep_time <= 20 && steps <= 5 {
            Difficulty::Easy
        } else if prep_time <= 45 && steps <= 10 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
    pub fiber: i64,
    pub sugar: i64,
}

/// Canonical recipe record every source is normalized into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub prep_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub diet_tags: Vec<String>,
    pub category: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition: Nutrition,
    pub likes: i64,
    pub health_score: i64,
    pub source_url: Option<String>,
    pub price_per_serving: f64,
    pub cuisines: Vec<String>,
    pub dish_types: Vec<String>,
}

impl Recipe {
    /// Case-insensitive substring match against the title or any ingredient line.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .ingredients
                .iter()
                .any(|line| line.to_lowercase().contains(needle))
    }

    pub fn has_diet(&self, diet: &str) -> bool {
        self.diet_tags.iter().any(|tag| tag == diet)
    }
}

/// One ingredient of a detailed recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedIngredient {
    pub id: Option<i64>,
    pub name: String,
    pub original: String,
    pub amount: f64,
    pub unit: String,
    pub image: Option<String>,
}

/// Full recipe detail shown in the modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub extended_ingredients: Vec<ExtendedIngredient>,
    /// Untruncated summary as plain text
    pub summary: String,
    /// Summary HTML passed through ammonia
    pub summary_html: String,
}

impl From<Recipe> for RecipeDetail {
    fn from(recipe: Recipe) -> Self {
        let extended_ingredients = recipe
            .ingredients
            .iter()
            .map(|line| ExtendedIngredient {
                id: None,
                name: line.clone(),
                original: line.clone(),
                amount: 0.0,
                unit: String::new(),
                image: None,
            })
            .collect();
        let summary = recipe.description.clone();
        let summary_html = crate::utils::sanitize::sanitize_html(&summary);

        Self {
            recipe,
            extended_ingredients,
            summary,
            summary_html,
        }
    }
}

/// One page of recipes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub results: Vec<Recipe>,
    pub total_results: usize,
    pub offset: usize,
    pub number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientUse {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Result of a find-by-ingredients search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMatch {
    pub id: RecipeId,
    pub title: String,
    pub image: String,
    pub used_ingredient_count: u32,
    pub missed_ingredient_count: u32,
    pub used_ingredients: Vec<IngredientUse>,
    pub missed_ingredients: Vec<IngredientUse>,
    pub likes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMatchPage {
    pub results: Vec<IngredientMatch>,
    pub total_results: usize,
}

/// Autocomplete entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: RecipeId,
    pub title: String,
    pub image_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarRecipe {
    pub id: RecipeId,
    pub title: String,
    pub ready_in_minutes: u32,
    pub servings: u32,
    pub source_url: Option<String>,
}
