use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotivationalQuote {
    pub text: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietAdvice {
    pub diet_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "crate::models::one_or_many")]
    pub advice: Vec<String>,
}

/// Free-form counters kept by the backend under `/appStats`
pub type AppStats = Map<String, Value>;
