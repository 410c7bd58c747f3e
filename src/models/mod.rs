pub mod content;
pub mod recipe;
pub mod user;

pub use content::{AppStats, DietAdvice, MotivationalQuote};
pub use recipe::{
    Difficulty, ExtendedIngredient, IngredientMatch, IngredientMatchPage, IngredientUse,
    Nutrition, Recipe, RecipeDetail, RecipeId, RecipePage, SimilarRecipe, Suggestion,
};
pub use user::{Preferences, Role, SessionUser, User};

/// Accept either a single string or a list of strings
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}
