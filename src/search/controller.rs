//! Search and pagination over the recipe list of a recipes view.
//!
//! Every replacing load (initial, search, random, clear) bumps the state's
//! generation; a response is applied only if the generation it captured is
//! still current. The state lock is never held across a fetch.

use crate::backend::BackendClient;
use crate::config::SearchConfig;
use crate::models::{Recipe, RecipeDetail, RecipeId, Suggestion};
use crate::provider::{ProviderClient, RandomOptions, SearchOptions};
use crate::search::{
    debounce::Debouncer,
    local,
    state::{DisplayState, ModalState, Notice, QuickFilter, SearchFilters, SearchForm, SearchState},
};
use crate::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

pub const RANDOM_LOADED_MESSAGE: &str = "New recipes loaded!";
pub const LOAD_MORE_FAILED_MESSAGE: &str = "Error loading more recipes";
pub const RECIPE_NOT_FOUND_MESSAGE: &str = "Recipe not found";

/// Outcome of a replacing fetch: recipes, reported total, whether more pages exist
type Batch = (Vec<Recipe>, usize, bool);

pub struct SearchController {
    provider: Arc<ProviderClient>,
    backend: BackendClient,
    page_size: usize,
    suggestion_limit: usize,
    state: Mutex<SearchState>,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(provider: Arc<ProviderClient>, backend: BackendClient, config: &SearchConfig) -> Self {
        Self {
            provider,
            backend,
            page_size: config.page_size.max(1),
            suggestion_limit: config.suggestion_limit,
            state: Mutex::new(SearchState::default()),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether results come from the provider rather than the local backend
    pub fn uses_provider(&self) -> bool {
        self.provider.is_configured()
    }

    /// Copy of the current state for rendering
    pub async fn snapshot(&self) -> SearchState {
        self.state.lock().await.clone()
    }

    /// Remove and return the pending notification
    pub async fn take_notice(&self) -> Option<Notice> {
        self.state.lock().await.notice.take()
    }

    pub async fn set_form(&self, form: SearchForm) {
        let mut state = self.state.lock().await;
        state.form = SearchForm {
            query: form.query,
            filters: form.filters.cleaned(),
        };
    }

    pub async fn set_filters(&self, filters: SearchFilters) {
        self.state.lock().await.form.filters = filters.cleaned();
    }

    /// Start a replacing load: bump the generation and enter `Loading`
    fn begin_replace(state: &mut SearchState) -> u64 {
        state.generation += 1;
        state.display = DisplayState::Loading;
        state.loading_more = false;
        state.notice = None;
        state.generation
    }

    /// Lock the state if `generation` is still current
    async fn current(&self, generation: u64, operation: &str) -> Option<MutexGuard<'_, SearchState>> {
        let state = self.state.lock().await;
        if state.generation == generation {
            Some(state)
        } else {
            debug!(
                "Discarding stale {} response (generation {} < {})",
                operation, generation, state.generation
            );
            None
        }
    }

    async fn local_recipes(&self) -> Result<Vec<Recipe>> {
        local::fetch(&self.backend).await
    }

    fn search_options(&self, filters: &SearchFilters, offset: usize) -> SearchOptions {
        SearchOptions {
            number: Some(self.page_size),
            offset,
            diet: filters.diet.clone(),
            cuisine: filters.cuisine.clone(),
            max_ready_time: filters.max_time,
            ..Default::default()
        }
    }

    fn random_options(&self) -> RandomOptions {
        RandomOptions {
            number: Some(self.page_size),
            tags: None,
        }
    }

    fn apply_batch(state: &mut SearchState, batch: Result<Batch>, operation: &str) -> bool {
        match batch {
            Ok((results, total_results, has_more)) => {
                debug!("{} loaded {} recipes", operation, results.len());
                state.results = results;
                state.total_results = total_results;
                state.has_more = has_more;
                state.settle();
                true
            }
            Err(e) => {
                error!("Error during {}: {}", operation, e.log_safe());
                state.display = DisplayState::Error(e.user_message());
                state.has_more = false;
                false
            }
        }
    }

    /// First load of the view: a provider random batch, or the whole local list
    pub async fn load_initial(&self) {
        let generation = {
            let mut state = self.state.lock().await;
            state.offset = 0;
            state.active = SearchForm::default();
            Self::begin_replace(&mut state)
        };

        let batch = if self.uses_provider() {
            self.provider
                .get_random_recipes(&self.random_options())
                .await
                .map(|page| {
                    let total = page.total_results;
                    (page.results, total, true)
                })
        } else {
            self.local_recipes().await.map(|recipes| {
                let total = recipes.len();
                (recipes, total, false)
            })
        };

        if let Some(mut state) = self.current(generation, "initial load").await {
            Self::apply_batch(&mut state, batch, "initial load");
        }
    }

    /// Run the form's query from the first page
    pub async fn handle_search(&self) {
        let (generation, form) = {
            let mut state = self.state.lock().await;
            state.offset = 0;
            state.has_more = true;
            state.active = state.form.clone();
            (Self::begin_replace(&mut state), state.form.clone())
        };
        let query = form.query.trim();

        let batch = if self.uses_provider() {
            self.provider
                .search_recipes(query, &self.search_options(&form.filters, 0))
                .await
                .map(|page| {
                    let has_more = page.total_results > page.results.len();
                    (page.results, page.total_results, has_more)
                })
        } else {
            self.local_recipes().await.map(|recipes| {
                let matches = local::filter_recipes(recipes, &form);
                let total = matches.len();
                (matches, total, false)
            })
        };

        if let Some(mut state) = self.current(generation, "search").await {
            if Self::apply_batch(&mut state, batch, "search") {
                info!(
                    "Search \"{}\" returned {} of {} recipes",
                    query,
                    state.results.len(),
                    state.total_results
                );
            }
        }
    }

    /// Store typed text and search once typing pauses. A new input replaces
    /// the pending search.
    pub async fn on_query_input(self: &Arc<Self>, text: &str) {
        self.state.lock().await.form.query = text.to_string();

        let controller = Arc::clone(self);
        self.debouncer.schedule(async move {
            controller.handle_search().await;
        });
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Append the next page of the last search. Text typed since then is
    /// not used until the next search runs.
    pub async fn load_more_recipes(&self) {
        // Local results always arrive complete
        if !self.uses_provider() {
            return;
        }

        let (generation, offset, form) = {
            let mut state = self.state.lock().await;
            if state.is_loading() || state.loading_more || !state.has_more {
                return;
            }
            state.offset += self.page_size;
            state.loading_more = true;
            (state.generation, state.offset, state.active.clone())
        };

        let page = self
            .provider
            .search_recipes(form.query.trim(), &self.search_options(&form.filters, offset))
            .await;

        let Some(mut state) = self.current(generation, "load more").await else {
            return;
        };
        state.loading_more = false;

        match page {
            Ok(page) => {
                let new_count = page.results.len();
                let mut seen: HashSet<RecipeId> =
                    state.results.iter().map(|r| r.id.clone()).collect();
                for recipe in page.results {
                    if seen.insert(recipe.id.clone()) {
                        state.results.push(recipe);
                    }
                }
                state.total_results = page.total_results;
                state.has_more = offset + new_count < page.total_results;
                state.settle();
                debug!("Loaded {} more recipes at offset {}", new_count, offset);
            }
            Err(e) => {
                error!("Error loading more recipes: {}", e.log_safe());
                state.offset = offset.saturating_sub(self.page_size);
                state.notice = Some(Notice::error(LOAD_MORE_FAILED_MESSAGE));
            }
        }
    }

    /// Replace the list with a random batch
    pub async fn load_random_recipes(&self) {
        let generation = {
            let mut state = self.state.lock().await;
            Self::begin_replace(&mut state)
        };

        let batch = if self.uses_provider() {
            self.provider
                .get_random_recipes(&self.random_options())
                .await
                .map(|page| {
                    let total = page.total_results;
                    (page.results, total, false)
                })
        } else {
            self.local_recipes().await.map(|recipes| {
                let total = recipes.len();
                (local::shuffle(recipes), total, false)
            })
        };

        if let Some(mut state) = self.current(generation, "random load").await {
            if Self::apply_batch(&mut state, batch, "random load") {
                state.offset = 0;
                state.has_more = false;
                state.notice = Some(Notice::success(RANDOM_LOADED_MESSAGE));
            }
        }
    }

    /// Open the detail modal for `id`. Failures end up inside the modal.
    pub async fn show_recipe_modal(&self, id: &RecipeId) -> ModalState {
        self.state.lock().await.modal = ModalState::Loading;

        let outcome = if self.uses_provider() {
            match self.provider.get_recipe_information(id).await {
                Ok(detail) => ModalState::Open(Box::new(detail)),
                Err(e) => {
                    error!("Error loading recipe {}: {}", id, e.log_safe());
                    ModalState::Failed(e.user_message())
                }
            }
        } else {
            let state = self.state.lock().await;
            let found = state.results.iter().find(|recipe| &recipe.id == id).cloned();
            drop(state);

            match found {
                Some(recipe) => ModalState::Open(Box::new(RecipeDetail::from(recipe))),
                None => ModalState::Failed(RECIPE_NOT_FOUND_MESSAGE.to_string()),
            }
        };

        let mut state = self.state.lock().await;
        if state.modal == ModalState::Closed {
            debug!("Modal closed before recipe {} arrived", id);
            return ModalState::Closed;
        }
        state.modal = outcome.clone();
        outcome
    }

    pub async fn close_recipe_modal(&self) {
        self.state.lock().await.modal = ModalState::Closed;
    }

    pub async fn apply_quick_filter(&self, filter: QuickFilter) {
        {
            let mut state = self.state.lock().await;
            filter.apply(&mut state.form);
        }
        debug!("Quick filter applied: {}", filter);
        self.handle_search().await;
    }

    /// Reset the form and reload the initial list
    pub async fn clear_filters(&self) {
        self.state.lock().await.form = SearchForm::default();
        self.load_initial().await;
    }

    /// Title completions for the search box; empty without a provider key
    pub async fn suggestions(&self, text: &str) -> Vec<Suggestion> {
        if !self.uses_provider() {
            return Vec::new();
        }
        self.provider
            .get_autocomplete_suggestions(text, self.suggestion_limit)
            .await
    }

    /// Cancel any pending debounced search
    pub fn destroy(&self) {
        self.debouncer.cancel();
    }
}
