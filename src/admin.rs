use crate::backend::{fallback::USERS_PATH, BackendClient};
use crate::models::{AppStats, User};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

pub const RECIPES_PATH: &str = "/recipes";
pub const APP_STATS_PATH: &str = "/appStats";

/// Everything the admin view shows, fetched in one concurrent batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub users: Vec<User>,
    pub recipe_count: usize,
    pub stats: AppStats,
    pub active_users: usize,
    pub admin_count: usize,
}

impl AdminDashboard {
    fn new(mut users: Vec<User>, recipes: Vec<Value>, stats: AppStats) -> Self {
        for user in &mut users {
            user.password = None;
        }
        let active_users = users.iter().filter(|u| u.is_active).count();
        let admin_count = users.iter().filter(|u| u.is_admin()).count();

        Self {
            users,
            recipe_count: recipes.len(),
            stats,
            active_users,
            admin_count,
        }
    }

    pub fn popular_categories(&self) -> Vec<String> {
        self.stats
            .get("popularCategories")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.stats
            .get("lastUpdated")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Clone)]
pub struct AdminService {
    backend: BackendClient,
}

impl AdminService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Fetch users, recipes and stats concurrently; any failure fails the batch
    pub async fn dashboard(&self) -> Result<AdminDashboard> {
        let (users, recipes, stats) = futures::try_join!(
            self.backend.get::<Vec<User>>(USERS_PATH),
            self.backend.get::<Vec<Value>>(RECIPES_PATH),
            self.backend.get::<AppStats>(APP_STATS_PATH),
        )
        .map_err(|e| {
            error!("Error loading admin dashboard: {}", e.log_safe());
            e
        })?;

        debug!(
            "Admin dashboard: {} users, {} recipes",
            users.len(),
            recipes.len()
        );
        Ok(AdminDashboard::new(users, recipes, stats))
    }
}
