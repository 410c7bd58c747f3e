#![allow(dead_code)]

use recipebox::app::AppContext;
use recipebox::config::{
    BackendConfig, ProviderConfig, SearchConfig, ServerConfig, Settings, StorageConfig,
};
use recipebox::session::SessionContext;
use serde_json::{json, Value};
use std::path::Path;

/// Address nothing listens on; requests fail fast with a connection error
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub const API_KEY: &str = "test-key";

pub fn settings(backend_url: &str, provider_url: &str, api_key: Option<&str>) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_request_body_size: 1_048_576,
        },
        backend: BackendConfig {
            base_url: backend_url.to_string(),
            timeout_seconds: 5,
        },
        provider: ProviderConfig {
            base_url: provider_url.to_string(),
            api_key: api_key.map(str::to_string),
            cache_ttl_seconds: 300,
            cache_capacity: 32,
            timeout_seconds: 5,
            user_agent: "recipebox-tests".to_string(),
        },
        search: SearchConfig {
            page_size: 12,
            debounce_ms: 500,
            suggestion_limit: 5,
        },
        storage: StorageConfig {
            path: std::env::temp_dir().join("recipebox-unused.json"),
        },
    }
}

/// App with an in-memory session
pub fn app(settings: Settings) -> AppContext {
    AppContext::with_session(settings, SessionContext::in_memory()).unwrap()
}

/// App whose session persists to `storage`
pub fn app_with_storage(mut settings: Settings, storage: &Path) -> AppContext {
    settings.storage.path = storage.to_path_buf();
    AppContext::new(settings).unwrap()
}

pub fn provider_recipe(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "summary": format!("A <b>tasty</b> {title}"),
        "image": format!("https://img.example.com/{id}.jpg"),
        "readyInMinutes": 25,
        "servings": 4,
        "vegetarian": true,
        "analyzedInstructions": [
            {"steps": [{"number": 1, "step": "Boil water"}, {"number": 2, "step": "Cook"}]}
        ],
        "extendedIngredients": [
            {"id": 1, "name": "pasta", "original": "200 g pasta", "amount": 200.0, "unit": "g", "image": "pasta.png"}
        ],
        "aggregateLikes": 10,
        "healthScore": 55
    })
}

pub fn search_response(ids: &[i64], total: usize, offset: usize) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| provider_recipe(*id, &format!("Recipe {id}")))
        .collect();
    json!({
        "results": results,
        "totalResults": total,
        "offset": offset,
        "number": ids.len()
    })
}

pub fn local_recipes() -> Value {
    json!([
        {
            "id": 1,
            "title": "Pasta Primavera",
            "description": "Spring vegetables and pasta",
            "prepTime": 25,
            "servings": 2,
            "dietType": ["vegetarian"],
            "category": "italian",
            "ingredients": ["pasta", "zucchini"],
            "instructions": ["Cook pasta", "Add vegetables"],
            "likes": 3
        },
        {
            "id": 2,
            "title": "Beef Stew",
            "description": "Slow cooked",
            "prepTime": 120,
            "servings": 6,
            "dietType": "omnivore",
            "ingredients": ["beef", "carrots"],
            "instructions": "Simmer for two hours",
            "likes": 8
        },
        {
            "id": 3,
            "title": "Tomato Soup",
            "description": "Quick soup",
            "prepTime": 15,
            "servings": 2,
            "dietType": ["vegetarian", "vegan"],
            "ingredients": ["tomatoes", "pasta stars"],
            "instructions": ["Blend", "Heat"],
            "likes": 1
        }
    ])
}

pub fn users() -> Value {
    json!([
        {
            "id": 1,
            "email": "admin@test.com",
            "password": "admin123",
            "name": "Administrator",
            "role": "admin",
            "isActive": true
        },
        {
            "id": 2,
            "email": "user@test.com",
            "password": "user123",
            "name": "Demo User",
            "role": "user",
            "preferences": {"dietType": "vegetarian", "allergies": [], "favoriteCategories": []},
            "isActive": true
        }
    ])
}
