//! Search over the local backend's recipe list, used when the provider has
//! no API key.

use crate::backend::BackendClient;
use crate::models::Recipe;
use crate::provider::{models::LocalRecipe, normalize};
use crate::search::state::SearchForm;
use crate::Result;
use rand::seq::SliceRandom;

/// Backend collection holding the local recipes
pub const LOCAL_RECIPES_PATH: &str = "/recipes";

/// Fetch and normalize the backend's recipe list
pub async fn fetch(backend: &BackendClient) -> Result<Vec<Recipe>> {
    let raw: Vec<LocalRecipe> = backend.get(LOCAL_RECIPES_PATH).await?;
    Ok(normalize::local_recipes(raw))
}

/// Keep recipes matching the query text, diet and time filters.
///
/// Cuisine is not part of local records and is ignored.
pub fn filter_recipes(recipes: Vec<Recipe>, form: &SearchForm) -> Vec<Recipe> {
    let needle = form.query.trim().to_lowercase();
    let filters = &form.filters;

    recipes
        .into_iter()
        .filter(|recipe| needle.is_empty() || recipe.matches_text(&needle))
        .filter(|recipe| match &filters.diet {
            Some(diet) => recipe.has_diet(diet),
            None => true,
        })
        .filter(|recipe| match filters.max_time {
            Some(max) => recipe.prep_time <= max,
            None => true,
        })
        .collect()
}

/// Fisher-Yates shuffle of the whole list
pub fn shuffle(mut recipes: Vec<Recipe>) -> Vec<Recipe> {
    recipes.shuffle(&mut rand::thread_rng());
    recipes
}
