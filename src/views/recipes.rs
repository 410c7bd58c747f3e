use crate::app::AppContext;
use crate::models::RecipeDetail;
use crate::router::{Container, Route, View};
use crate::search::{DisplayState, ModalState, QuickFilter, SearchController, SearchForm, SearchState};
use crate::views::{cards, require_user, RecipeCard};
use crate::Result;
use askama::Template;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub const DIET_OPTIONS: [&str; 5] = ["vegetarian", "vegan", "gluten free", "ketogenic", "paleo"];
pub const CUISINE_OPTIONS: [&str; 6] = ["italian", "mexican", "asian", "mediterranean", "american", "french"];
pub const TIME_OPTIONS: [u32; 4] = [15, 30, 45, 60];

#[derive(Template)]
#[template(path = "recipes.html")]
struct RecipesTemplate {
    query: String,
    diets: Vec<SelectOption>,
    cuisines: Vec<SelectOption>,
    times: Vec<SelectOption>,
    quick_filters: Vec<&'static str>,
    state: &'static str,
    error_message: String,
    results: Vec<RecipeCard>,
    result_count: usize,
    total_results: usize,
    show_load_more: bool,
    loading_more: bool,
    notice_kind: String,
    notice_message: String,
    modal_html: String,
}

/// One `<option>` of a filter selector
struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

fn select_options<I, T>(values: I, current: Option<&str>) -> Vec<SelectOption>
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    values
        .into_iter()
        .map(|v| {
            let value = v.to_string();
            SelectOption {
                selected: current == Some(value.as_str()),
                label: value.clone(),
                value,
            }
        })
        .collect()
}

/// Detail modal, rendered inside the recipes page
#[derive(Template)]
#[template(path = "recipe_modal.html")]
struct ModalTemplate {
    loading: bool,
    error_message: String,
    detail: Option<DetailData>,
}

struct DetailData {
    title: String,
    image: String,
    prep_time: u32,
    servings: u32,
    difficulty: &'static str,
    health_score: i64,
    likes: i64,
    summary_html: String,
    diet_tags: Vec<String>,
    ingredients: Vec<IngredientLine>,
    instructions: Vec<String>,
    calories: i64,
    protein: i64,
    carbs: i64,
    fat: i64,
    source_url: String,
}

struct IngredientLine {
    text: String,
    image: String,
}

impl From<&RecipeDetail> for DetailData {
    fn from(detail: &RecipeDetail) -> Self {
        let recipe = &detail.recipe;
        Self {
            title: recipe.title.clone(),
            image: recipe.image.clone(),
            prep_time: recipe.prep_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty.as_str(),
            health_score: recipe.health_score,
            likes: recipe.likes,
            summary_html: detail.summary_html.clone(),
            diet_tags: recipe.diet_tags.clone(),
            ingredients: detail
                .extended_ingredients
                .iter()
                .map(|ing| IngredientLine {
                    text: ing.original.clone(),
                    image: ing.image.clone().unwrap_or_default(),
                })
                .collect(),
            instructions: recipe.instructions.clone(),
            calories: recipe.nutrition.calories,
            protein: recipe.nutrition.protein,
            carbs: recipe.nutrition.carbs,
            fat: recipe.nutrition.fat,
            source_url: recipe.source_url.clone().unwrap_or_default(),
        }
    }
}

fn modal_template(modal: &ModalState) -> Option<ModalTemplate> {
    match modal {
        ModalState::Closed => None,
        ModalState::Loading => Some(ModalTemplate {
            loading: true,
            error_message: String::new(),
            detail: None,
        }),
        ModalState::Open(detail) => Some(ModalTemplate {
            loading: false,
            error_message: String::new(),
            detail: Some(DetailData::from(detail.as_ref())),
        }),
        ModalState::Failed(message) => Some(ModalTemplate {
            loading: false,
            error_message: message.clone(),
            detail: None,
        }),
    }
}

/// Render the recipes page from a state snapshot
pub fn render_state(state: &SearchState, uses_provider: bool) -> Result<String> {
    let (state_name, error_message) = match &state.display {
        DisplayState::Idle => ("idle", String::new()),
        DisplayState::Loading => ("loading", String::new()),
        DisplayState::Error(message) => ("error", message.clone()),
        DisplayState::Empty => ("empty", String::new()),
        DisplayState::Populated => ("populated", String::new()),
    };
    let (notice_kind, notice_message) = state
        .notice
        .as_ref()
        .map(|n| (n.kind.as_str().to_string(), n.message.clone()))
        .unwrap_or_default();
    let filters = &state.form.filters;
    let max_time = filters.max_time.map(|t| t.to_string());
    let modal_html = match modal_template(&state.modal) {
        Some(modal) => modal.render()?,
        None => String::new(),
    };

    let template = RecipesTemplate {
        query: state.form.query.clone(),
        diets: select_options(DIET_OPTIONS, filters.diet.as_deref()),
        cuisines: select_options(CUISINE_OPTIONS, filters.cuisine.as_deref()),
        times: select_options(TIME_OPTIONS, max_time.as_deref()),
        quick_filters: QuickFilter::ALL.iter().map(|f| f.as_str()).collect(),
        state: state_name,
        error_message,
        results: cards(&state.results),
        result_count: state.results.len(),
        total_results: state.total_results,
        show_load_more: state.has_more && uses_provider && state.display == DisplayState::Populated,
        loading_more: state.loading_more,
        notice_kind,
        notice_message,
        modal_html,
    };
    Ok(template.render()?)
}

/// Render the live state of `controller`, consuming its pending notice
pub async fn render_controller(controller: &SearchController) -> Result<String> {
    let state = controller.snapshot().await;
    controller.take_notice().await;
    render_state(&state, controller.uses_provider())
}

pub struct RecipesView {
    app: AppContext,
    controller: Arc<SearchController>,
}

impl RecipesView {
    pub fn new(app: AppContext) -> Self {
        let controller = app.search_controller();
        Self { app, controller }
    }
}

#[async_trait]
impl View for RecipesView {
    fn route(&self) -> Route {
        Route::Recipes
    }

    async fn render(&mut self, container: &mut Container) -> Result<()> {
        require_user(&self.app.session)?;

        match self.app.session.take_search_query() {
            Some(query) => {
                debug!("Running stashed search: {}", query);
                self.controller
                    .set_form(SearchForm {
                        query,
                        ..Default::default()
                    })
                    .await;
                self.controller.handle_search().await;
            }
            None => self.controller.load_initial().await,
        }

        container.set_html(render_controller(&self.controller).await?);
        Ok(())
    }

    fn destroy(&mut self) {
        self.controller.destroy();
    }

    fn search_controller(&self) -> Option<Arc<SearchController>> {
        Some(Arc::clone(&self.controller))
    }
}
