use crate::config::ProviderConfig;
use crate::models::{IngredientMatchPage, RecipeDetail, RecipeId, RecipePage, SimilarRecipe, Suggestion};
use crate::provider::{
    cache::ResponseCache,
    models::{
        ComplexSearchResponse, IngredientSearchResponse, PopularIngredient, RandomResponse,
        RawIngredientMatch, RawRecipe, RawSimilarRecipe, RawSuggestion,
    },
    normalize,
};
use crate::{Error, Result};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

pub const DEFAULT_SEARCH_NUMBER: usize = 12;
pub const DEFAULT_RANDOM_NUMBER: usize = 6;
pub const DEFAULT_SUGGESTION_NUMBER: usize = 5;
pub const DEFAULT_SIMILAR_NUMBER: usize = 3;
pub const DEFAULT_POPULAR_NUMBER: usize = 20;

/// Options for `/recipes/complexSearch`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub number: Option<usize>,
    pub offset: usize,
    pub diet: Option<String>,
    pub intolerances: Option<String>,
    pub dish_type: Option<String>,
    pub cuisine: Option<String>,
    pub max_ready_time: Option<u32>,
    pub min_calories: Option<u32>,
    pub max_calories: Option<u32>,
}

/// Options for `/recipes/random`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomOptions {
    pub number: Option<usize>,
    pub tags: Option<String>,
}

/// Options for `/recipes/findByIngredients`
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientOptions {
    pub number: usize,
    pub ranking: u8,
    pub ignore_pantry: bool,
}

impl Default for IngredientOptions {
    fn default() -> Self {
        Self {
            number: DEFAULT_SEARCH_NUMBER,
            ranking: 1,
            ignore_pantry: true,
        }
    }
}

/// Request parameters; empty values are dropped before they reach the URL
/// or the cache key
#[derive(Debug, Default)]
struct Params(BTreeMap<String, String>);

impl Params {
    fn set(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    fn set_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }
}

/// Client for the third-party recipe API.
///
/// Every request goes through a shared response cache; the API key is added
/// to the URL but never to the cache key.
pub struct ProviderClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    configured: bool,
    cache: Mutex<ResponseCache>,
}

impl ProviderClient {
    /// Create a new provider client
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("Invalid user agent: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            configured: config.is_configured(),
            cache: Mutex::new(ResponseCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_seconds),
            )),
        })
    }

    /// Whether a usable API key is present
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
        debug!("Provider cache cleared");
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Fetch an endpoint through the cache and decode it as `T`
    async fn request<T>(&self, endpoint: &str, params: Params) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let payload = self.request_value(endpoint, params).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn request_value(&self, endpoint: &str, params: Params) -> Result<Value> {
        let Params(params) = params;
        let key = ResponseCache::key(endpoint, &params);

        if let Some(hit) = self.cache.lock().await.get(&key) {
            debug!("Provider cache hit: {}", key);
            return Ok(hit);
        }

        let mut url = url::Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(api_key) = &self.api_key {
                query.append_pair("apiKey", api_key);
            }
            for (name, value) in &params {
                query.append_pair(name, value);
            }
        }

        debug!("Provider request: GET {}", key);
        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Provider request {} failed: {}", endpoint, e);
            Error::Http(e)
        })?;

        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED {
            warn!("Provider quota exhausted on {}", endpoint);
            return Err(Error::QuotaExceeded);
        }
        if !status.is_success() {
            error!("Provider API error: {} on {}", status, endpoint);
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        self.cache.lock().await.insert(key, payload.clone());
        Ok(payload)
    }

    /// Search recipes with filters
    pub async fn search_recipes(&self, query: &str, options: &SearchOptions) -> Result<RecipePage> {
        let params = Params::default()
            .set("query", query)
            .set("number", options.number.unwrap_or(DEFAULT_SEARCH_NUMBER))
            .set("offset", options.offset)
            .set_opt("diet", options.diet.as_deref())
            .set_opt("intolerances", options.intolerances.as_deref())
            .set_opt("type", options.dish_type.as_deref())
            .set_opt("cuisine", options.cuisine.as_deref())
            .set_opt("maxReadyTime", options.max_ready_time)
            .set_opt("minCalories", options.min_calories)
            .set_opt("maxCalories", options.max_calories)
            .set("addRecipeInformation", true)
            .set("addRecipeNutrition", true)
            .set("fillIngredients", true);

        let raw: ComplexSearchResponse = self.request("/recipes/complexSearch", params).await?;
        Ok(normalize::search_page(raw))
    }

    /// Fetch a random batch of recipes
    pub async fn get_random_recipes(&self, options: &RandomOptions) -> Result<RecipePage> {
        let params = Params::default()
            .set("number", options.number.unwrap_or(DEFAULT_RANDOM_NUMBER))
            .set_opt("tags", options.tags.as_deref())
            .set("include_nutrition", true)
            .set("include_ingredients", true);

        let raw: RandomResponse = self.request("/recipes/random", params).await?;
        Ok(normalize::random_page(raw))
    }

    /// Find recipes that use the given ingredients
    pub async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        options: &IngredientOptions,
    ) -> Result<IngredientMatchPage> {
        let params = Params::default()
            .set("ingredients", ingredients.join(","))
            .set("number", options.number)
            .set("ranking", options.ranking)
            .set("ignorePantry", options.ignore_pantry);

        let raw: Vec<RawIngredientMatch> =
            self.request("/recipes/findByIngredients", params).await?;
        Ok(normalize::ingredient_matches(raw))
    }

    /// Full recipe detail with nutrition
    pub async fn get_recipe_information(&self, id: &RecipeId) -> Result<RecipeDetail> {
        let endpoint = format!("/recipes/{id}/information");
        let params = Params::default().set("includeNutrition", true);

        let raw: RawRecipe = self.request(&endpoint, params).await?;
        Ok(normalize::recipe_detail(raw))
    }

    /// Title completions for a partial query. Never fails: short queries
    /// skip the network and errors yield no suggestions.
    pub async fn get_autocomplete_suggestions(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let params = Params::default().set("query", query).set("number", limit);
        match self
            .request::<Vec<RawSuggestion>>("/recipes/autocomplete", params)
            .await
        {
            Ok(raw) => normalize::suggestions(raw),
            Err(e) => {
                error!("Error getting autocomplete suggestions: {}", e.log_safe());
                Vec::new()
            }
        }
    }

    pub async fn get_similar_recipes(&self, id: &RecipeId, number: usize) -> Result<Vec<SimilarRecipe>> {
        let endpoint = format!("/recipes/{id}/similar");
        let params = Params::default().set("number", number);

        let raw: Vec<RawSimilarRecipe> = self.request(&endpoint, params).await?;
        Ok(normalize::similar_recipes(raw))
    }

    /// Nutrition widget payload, passed through untouched
    pub async fn get_recipe_nutrition(&self, id: &RecipeId) -> Result<Value> {
        let endpoint = format!("/recipes/{id}/nutritionWidget.json");
        self.request_value(&endpoint, Params::default()).await
    }

    /// Most popular ingredients; errors yield an empty list
    pub async fn get_popular_ingredients(&self, number: usize) -> Vec<PopularIngredient> {
        let params = Params::default()
            .set("number", number)
            .set("sort", "popularity")
            .set("sortDirection", "desc");

        match self
            .request::<IngredientSearchResponse>("/food/ingredients/search", params)
            .await
        {
            Ok(raw) => raw.results,
            Err(e) => {
                error!("Error getting popular ingredients: {}", e.log_safe());
                Vec::new()
            }
        }
    }
}
