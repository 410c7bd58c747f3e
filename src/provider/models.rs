//! Raw payload shapes returned by the recipe provider.
//!
//! Each endpoint has its own type; `normalize` converts them into the
//! canonical records in `crate::models`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/recipes/complexSearch`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplexSearchResponse {
    pub results: Vec<RawRecipe>,
    pub total_results: usize,
    pub offset: usize,
    pub number: usize,
}

/// `/recipes/random`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomResponse {
    pub recipes: Vec<RawRecipe>,
}

/// A recipe as returned by search, random and information endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecipe {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub ready_in_minutes: Option<f64>,
    pub servings: Option<f64>,
    pub instructions: Option<String>,
    pub analyzed_instructions: Vec<AnalyzedInstruction>,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub very_healthy: bool,
    pub cheap: bool,
    pub very_popular: bool,
    pub diets: Vec<String>,
    pub dish_types: Vec<String>,
    pub cuisines: Vec<String>,
    pub occasions: Vec<String>,
    pub extended_ingredients: Vec<RawIngredient>,
    pub nutrition: Option<RawNutrition>,
    pub source_url: Option<String>,
    pub spoonacular_source_url: Option<String>,
    pub aggregate_likes: Option<f64>,
    pub health_score: Option<f64>,
    pub price_per_serving: Option<f64>,
    pub wine_pairing: Option<Value>,
    pub taste: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzedInstruction {
    pub name: String,
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStep {
    pub number: u32,
    pub step: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIngredient {
    pub id: Option<i64>,
    pub name: String,
    pub original: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNutrition {
    pub nutrients: Vec<RawNutrient>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNutrient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// `/recipes/findByIngredients` entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawIngredientMatch {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub used_ingredient_count: u32,
    pub missed_ingredient_count: u32,
    pub used_ingredients: Vec<RawIngredient>,
    pub missed_ingredients: Vec<RawIngredient>,
    pub likes: Option<f64>,
}

/// `/recipes/autocomplete` entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSuggestion {
    pub id: i64,
    pub title: String,
    pub image_type: Option<String>,
}

/// `/recipes/{id}/similar` entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSimilarRecipe {
    pub id: i64,
    pub title: String,
    pub ready_in_minutes: Option<f64>,
    pub servings: Option<f64>,
    pub source_url: Option<String>,
}

/// `/food/ingredients/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngredientSearchResponse {
    pub results: Vec<PopularIngredient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularIngredient {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
}

/// Recipe record as stored in the local backend's `/recipes` collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalRecipe {
    pub id: Option<crate::models::RecipeId>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub prep_time: u32,
    pub servings: Option<u32>,
    #[serde(deserialize_with = "crate::models::one_or_many")]
    pub diet_type: Vec<String>,
    pub category: Option<String>,
    pub ingredients: Vec<String>,
    #[serde(deserialize_with = "crate::models::one_or_many")]
    pub instructions: Vec<String>,
    pub nutrition: crate::models::Nutrition,
    pub likes: i64,
}
