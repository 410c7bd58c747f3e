//! Views rendered into the router's container.

pub mod admin;
pub mod home;
pub mod not_found;
pub mod profile;
pub mod recipes;

pub use admin::AdminView;
pub use home::HomeView;
pub use not_found::NotFoundView;
pub use profile::ProfileView;
pub use recipes::RecipesView;

use crate::models::{Recipe, SessionUser};
use crate::router::{Route, ViewRouter};
use crate::session::SessionContext;
use crate::{Error, Result};

/// Register every standard view with `router`
pub fn register_all(router: &mut ViewRouter) {
    router.register(Route::Home, |app| Box::new(HomeView::new(app.clone())));
    router.register(Route::Recipes, |app| Box::new(RecipesView::new(app.clone())));
    router.register(Route::Profile, |app| Box::new(ProfileView::new(app.clone())));
    router.register(Route::Admin, |app| Box::new(AdminView::new(app.clone())));
    router.register(Route::NotFound, |_| Box::new(NotFoundView::new()));
}

/// Signed-in user, or a render error for views that need one
pub(crate) fn require_user(session: &SessionContext) -> Result<SessionUser> {
    session
        .current_user()
        .ok_or_else(|| Error::Unauthorized("Sign in to continue".to_string()))
}

/// Recipe summary as shown on a card
#[derive(Debug, Clone)]
pub struct RecipeCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub prep_time: u32,
    pub servings: u32,
    pub difficulty: &'static str,
    pub category: String,
    pub diet_tags: Vec<String>,
    pub likes: i64,
}

impl From<&Recipe> for RecipeCard {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.to_string(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            image: recipe.image.clone(),
            prep_time: recipe.prep_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty.as_str(),
            category: recipe.category.clone(),
            diet_tags: recipe.diet_tags.iter().take(3).cloned().collect(),
            likes: recipe.likes,
        }
    }
}

pub(crate) fn cards(recipes: &[Recipe]) -> Vec<RecipeCard> {
    recipes.iter().map(RecipeCard::from).collect()
}
