//! Recipe provider adapter: HTTP client, response cache and normalization
//! of raw payloads into canonical records.

pub mod cache;
pub mod client;
pub mod models;
pub mod normalize;

pub use cache::ResponseCache;
pub use client::{IngredientOptions, ProviderClient, RandomOptions, SearchOptions};
