use crate::app::AppContext;
use crate::models::{DietAdvice, MotivationalQuote, Recipe};
use crate::provider::RandomOptions;
use crate::router::{Container, Route, View};
use crate::search::local;
use crate::views::{cards, require_user, RecipeCard};
use crate::Result;
use askama::Template;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

pub const QUOTES_PATH: &str = "/motivationalQuotes";
pub const DIET_ADVICE_PATH: &str = "/dietAdvice";

/// Recipes featured on the home page
const FEATURED_COUNT: usize = 3;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    user_name: String,
    quote: Option<MotivationalQuote>,
    advice: Option<DietAdvice>,
    recipes: Vec<RecipeCard>,
}

pub struct HomeView {
    app: AppContext,
}

impl HomeView {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    async fn featured_recipes(&self) -> Result<Vec<Recipe>> {
        if self.app.provider.is_configured() {
            let options = RandomOptions {
                number: Some(FEATURED_COUNT),
                tags: None,
            };
            match self.app.provider.get_random_recipes(&options).await {
                Ok(page) => return Ok(page.results),
                Err(e) => warn!("Error loading recipes for home: {}", e.log_safe()),
            }
        }

        let mut recipes = local::fetch(&self.app.backend).await?;
        recipes.truncate(FEATURED_COUNT);
        Ok(recipes)
    }
}

#[async_trait]
impl View for HomeView {
    fn route(&self) -> Route {
        Route::Home
    }

    async fn render(&mut self, container: &mut Container) -> Result<()> {
        let user = require_user(&self.app.session)?;

        let quotes: Vec<MotivationalQuote> = self.app.backend.get(QUOTES_PATH).await?;
        let quote = quotes.choose(&mut rand::thread_rng()).cloned();

        let diet_type = user.preferences.diet_type.clone();
        let advice = if diet_type.is_empty() {
            None
        } else {
            let advice: Vec<DietAdvice> = self.app.backend.get(DIET_ADVICE_PATH).await?;
            advice.into_iter().find(|a| a.diet_type == diet_type)
        };

        let recipes = self.featured_recipes().await?;
        debug!("Home view with {} featured recipes", recipes.len());

        let template = HomeTemplate {
            user_name: user.name,
            quote,
            advice,
            recipes: cards(&recipes),
        };
        container.set_html(template.render()?);
        Ok(())
    }
}
