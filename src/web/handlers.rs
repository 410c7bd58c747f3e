use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::app::AppContext;
use crate::auth::{Registration, INVALID_CREDENTIALS};
use crate::models::{Preferences, RecipeId, Suggestion};
use crate::router::{Route, ViewRouter};
use crate::search::{Notice, QuickFilter, SearchController, SearchFilters, SearchForm};
use crate::views::{profile::DIET_TYPES, recipes::render_controller};
use crate::Result;

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub app: AppContext,
    pub router: Arc<Mutex<ViewRouter>>,
}

impl AppState {
    pub fn new(app: AppContext) -> Self {
        let router = ViewRouter::new(app.clone());
        Self {
            app,
            router: Arc::new(Mutex::new(router)),
        }
    }
}

/// Deserialize optional string, treating empty strings as None
fn deserialize_optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.to_string())),
    }
}

/// Deserialize optional number from a form field that may be blank
fn deserialize_optional_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = deserialize_optional_string(deserializer)?;
    opt.map(|s| s.parse::<u32>().map_err(serde::de::Error::custom))
        .transpose()
}

struct NavItem {
    route: &'static str,
    title: &'static str,
    active: bool,
}

/// Page chrome around the current view
#[derive(Template)]
#[template(path = "shell.html")]
struct ShellTemplate {
    title: &'static str,
    theme: &'static str,
    nav: Vec<NavItem>,
    user_name: String,
    flash_kind: &'static str,
    flash_message: String,
    content: String,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    theme: &'static str,
    flash_kind: &'static str,
    flash_message: String,
    diet_types: Vec<&'static str>,
}

fn flash_parts(notice: Option<Notice>) -> (&'static str, String) {
    notice
        .map(|n| (n.kind.as_str(), n.message))
        .unwrap_or(("info", String::new()))
}

/// Controller of the recipes view, navigating there first if needed.
/// `None` when the recipes view could not be shown.
async fn recipes_controller(state: &AppState) -> Option<Arc<SearchController>> {
    let mut router = state.router.lock().await;
    if let Some(controller) = router.current_search() {
        return Some(controller);
    }
    router.navigate(Route::Recipes.as_str()).await;
    router.current_search()
}

fn home() -> Redirect {
    Redirect::to("/")
}

/// GET / - Current view inside the shell, or the sign-in page
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let session = &state.app.session;
    let theme = session.theme().as_str();
    let (flash_kind, flash_message) = flash_parts(session.take_flash());

    let Some(user) = session.current_user() else {
        let template = LoginTemplate {
            theme,
            flash_kind,
            flash_message,
            diet_types: DIET_TYPES.to_vec(),
        };
        return Ok(Html(template.render()?));
    };

    let mut router = state.router.lock().await;
    if router.current_route().is_none() {
        router.navigate(Route::Home.as_str()).await;
    }
    let route = router.current_route().unwrap_or(Route::NotFound);

    let controller = router.current_search();
    let content = match controller {
        Some(controller) => {
            drop(router);
            render_controller(&controller).await?
        }
        None => router.container().html().to_string(),
    };

    let nav = Route::NAMED
        .into_iter()
        .filter(|r| *r != Route::Admin || user.is_admin())
        .map(|r| NavItem {
            route: r.as_str(),
            title: r.title(),
            active: r == route,
        })
        .collect();

    let template = ShellTemplate {
        title: route.title(),
        theme,
        nav,
        user_name: user.name,
        flash_kind,
        flash_message,
        content,
    };
    Ok(Html(template.render()?))
}

/// GET /view/:route
pub async fn show_view(State(state): State<AppState>, Path(route): Path<String>) -> Redirect {
    state.router.lock().await.navigate(&route).await;
    home()
}

/// POST /history/back
pub async fn history_back(State(state): State<AppState>) -> Redirect {
    if state.router.lock().await.back().await.is_none() {
        debug!("History back: nothing to go back to");
    }
    home()
}

/// POST /history/forward
pub async fn history_forward(State(state): State<AppState>) -> Redirect {
    if state.router.lock().await.forward().await.is_none() {
        debug!("History forward: nothing ahead");
    }
    home()
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// POST /login
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Redirect {
    let session = &state.app.session;
    match state.app.auth.login(form.email.trim(), &form.password).await {
        Ok(Some(user)) => {
            session.flash(Notice::success(format!("Welcome, {}!", user.name)));
            let mut router = state.router.lock().await;
            router.reset();
            router.navigate(Route::Home.as_str()).await;
        }
        Ok(None) => session.flash(Notice::error(INVALID_CREDENTIALS)),
        Err(e) => session.flash(Notice::error(e.user_message())),
    }
    home()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    diet_type: Option<String>,
    #[serde(default)]
    accept_terms: Option<String>,
}

impl From<RegisterForm> for Registration {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password,
            confirm_password: form.confirm_password,
            diet_type: form.diet_type,
            accept_terms: form.accept_terms.is_some(),
        }
    }
}

/// POST /register
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Redirect {
    let session = &state.app.session;
    match state.app.auth.register(form.into()).await {
        Ok(user) => {
            session.flash(Notice::success(format!("Welcome, {}!", user.name)));
            let mut router = state.router.lock().await;
            router.reset();
            router.navigate(Route::Home.as_str()).await;
        }
        Err(e) => session.flash(Notice::error(e.user_message())),
    }
    home()
}

/// POST /logout
pub async fn logout(State(state): State<AppState>) -> Result<Redirect> {
    state.router.lock().await.reset();
    state.app.auth.logout()?;
    state.app.session.flash(Notice::info("Session closed"));
    Ok(home())
}

/// POST /theme
pub async fn toggle_theme(State(state): State<AppState>) -> Result<Redirect> {
    let theme = state.app.session.toggle_theme()?;
    debug!("Theme switched to {}", theme);
    Ok(home())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    query: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    diet: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    cuisine: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    max_time: Option<u32>,
}

/// GET /recipes/search
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Redirect {
    if let Some(controller) = recipes_controller(&state).await {
        controller
            .set_form(SearchForm {
                query: params.query.trim().to_string(),
                filters: SearchFilters {
                    diet: params.diet,
                    cuisine: params.cuisine,
                    max_time: params.max_time,
                }
                .cleaned(),
            })
            .await;
        controller.handle_search().await;
    }
    home()
}

#[derive(Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    query: String,
}

/// POST /recipes/input - debounced search as the user types
pub async fn query_input(State(state): State<AppState>, Form(form): Form<QueryForm>) -> StatusCode {
    match recipes_controller(&state).await {
        Some(controller) => {
            controller.on_query_input(&form.query).await;
            StatusCode::ACCEPTED
        }
        None => StatusCode::CONFLICT,
    }
}

/// POST /recipes/more
pub async fn load_more(State(state): State<AppState>) -> Redirect {
    if let Some(controller) = recipes_controller(&state).await {
        controller.load_more_recipes().await;
    }
    home()
}

/// POST /recipes/random
pub async fn random(State(state): State<AppState>) -> Redirect {
    if let Some(controller) = recipes_controller(&state).await {
        controller.load_random_recipes().await;
    }
    home()
}

/// POST /recipes/quick/:filter
pub async fn quick_filter(
    State(state): State<AppState>,
    Path(filter): Path<String>,
) -> Result<Redirect> {
    let filter: QuickFilter = filter.parse()?;
    if let Some(controller) = recipes_controller(&state).await {
        controller.apply_quick_filter(filter).await;
    }
    Ok(home())
}

/// POST /recipes/clear
pub async fn clear_filters(State(state): State<AppState>) -> Redirect {
    if let Some(controller) = recipes_controller(&state).await {
        controller.clear_filters().await;
    }
    home()
}

#[derive(Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    q: String,
}

/// GET /recipes/suggest
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<Suggestion>> {
    let controller = state.router.lock().await.current_search();
    let suggestions = match controller {
        Some(controller) => controller.suggestions(&params.q).await,
        None => Vec::new(),
    };
    Json(suggestions)
}

/// GET /recipes/:id - open the detail modal
pub async fn recipe_detail(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    if let Some(controller) = recipes_controller(&state).await {
        controller.show_recipe_modal(&RecipeId::new(id)).await;
    }
    home()
}

/// POST /recipes/modal/close
pub async fn close_modal(State(state): State<AppState>) -> Redirect {
    let controller = state.router.lock().await.current_search();
    if let Some(controller) = controller {
        controller.close_recipe_modal().await;
    }
    home()
}

/// POST /not-found/search
pub async fn not_found_search(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> Redirect {
    let query = form.query.trim();
    if !query.is_empty() {
        state.app.session.stash_search_query(query);
        state.router.lock().await.navigate(Route::Recipes.as_str()).await;
    }
    home()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesForm {
    #[serde(default)]
    diet_type: String,
    #[serde(default)]
    allergies: String,
    #[serde(default)]
    favorite_categories: String,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<PreferencesForm> for Preferences {
    fn from(form: PreferencesForm) -> Self {
        let diet_type = form.diet_type.trim();
        Self {
            diet_type: if diet_type.is_empty() {
                Preferences::default().diet_type
            } else {
                diet_type.to_string()
            },
            allergies: split_list(&form.allergies),
            favorite_categories: split_list(&form.favorite_categories),
        }
    }
}

/// POST /profile/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Form(form): Form<PreferencesForm>,
) -> Redirect {
    let session = &state.app.session;
    if state.app.auth.update_preferences(form.into()).await {
        session.flash(Notice::success("Preferences saved"));
        state.router.lock().await.navigate(Route::Profile.as_str()).await;
    } else {
        session.flash(Notice::error("Error saving preferences"));
    }
    home()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

/// POST /profile/password
pub async fn change_password(
    State(state): State<AppState>,
    Form(form): Form<PasswordForm>,
) -> Redirect {
    let session = &state.app.session;
    match state
        .app
        .auth
        .change_password(&form.current_password, &form.new_password)
        .await
    {
        Ok(()) => session.flash(Notice::success("Password changed")),
        Err(e) => session.flash(Notice::error(e.user_message())),
    }
    home()
}

#[derive(Deserialize)]
pub struct ResetForm {
    #[serde(default)]
    email: String,
}

/// POST /password/reset
pub async fn reset_password(State(state): State<AppState>, Form(form): Form<ResetForm>) -> Redirect {
    let session = &state.app.session;
    match state.app.auth.reset_password(form.email.trim()).await {
        Ok(temp) => {
            info!("Password reset requested");
            session.flash(Notice::info(format!("Your temporary password is: {temp}")));
        }
        Err(e) => session.flash(Notice::error(e.user_message())),
    }
    home()
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    provider: bool,
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.app.provider.is_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_form() {
        let prefs: Preferences = PreferencesForm {
            diet_type: "".to_string(),
            allergies: "nuts, , shellfish".to_string(),
            favorite_categories: "desserts".to_string(),
        }
        .into();

        assert_eq!(prefs.diet_type, "omnivore");
        assert_eq!(prefs.allergies, vec!["nuts", "shellfish"]);
        assert_eq!(prefs.favorite_categories, vec!["desserts"]);
    }

    #[test]
    fn test_register_form_checkbox() {
        let form: RegisterForm = serde_json::from_value(serde_json::json!({
            "name": " Ana ",
            "email": "ana@test.com",
            "password": "secret1",
            "confirmPassword": "secret1",
            "dietType": "",
            "acceptTerms": "on"
        }))
        .unwrap();

        let registration = Registration::from(form);
        assert_eq!(registration.name, "Ana");
        assert_eq!(registration.diet_type, None);
        assert!(registration.accept_terms);
        assert!(registration.validate().is_ok());
    }
}
