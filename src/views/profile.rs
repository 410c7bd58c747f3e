use crate::app::AppContext;
use crate::router::{Container, Route, View};
use crate::views::require_user;
use crate::Result;
use askama::Template;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub const DIET_TYPES: [&str; 6] = ["omnivore", "vegetarian", "vegan", "keto", "paleo", "mediterranean"];

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    name: String,
    email: String,
    role: &'static str,
    diet_types: Vec<DietOption>,
    allergies: String,
    favorite_categories: String,
    last_login: String,
    created_at: String,
}

struct DietOption {
    value: &'static str,
    selected: bool,
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Never".to_string())
}

pub struct ProfileView {
    app: AppContext,
}

impl ProfileView {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }
}

#[async_trait]
impl View for ProfileView {
    fn route(&self) -> Route {
        Route::Profile
    }

    async fn render(&mut self, container: &mut Container) -> Result<()> {
        let user = require_user(&self.app.session)?;
        let role = if user.is_admin() { "admin" } else { "user" };
        let prefs = user.preferences;

        let template = ProfileTemplate {
            role,
            name: user.name,
            email: user.email,
            diet_types: DIET_TYPES
                .iter()
                .map(|&value| DietOption {
                    value,
                    selected: value == prefs.diet_type,
                })
                .collect(),
            allergies: prefs.allergies.join(", "),
            favorite_categories: prefs.favorite_categories.join(", "),
            last_login: format_date(user.last_login),
            created_at: format_date(user.created_at),
        };
        container.set_html(template.render()?);
        Ok(())
    }
}
