use crate::app::AppContext;
use crate::router::{Container, Route, View};
use crate::views::require_user;
use crate::{Error, Result};
use askama::Template;
use async_trait::async_trait;
use tracing::warn;

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    users: Vec<UserRow>,
    user_count: usize,
    active_users: usize,
    admin_count: usize,
    recipe_count: usize,
    popular_categories: Vec<String>,
    last_updated: String,
}

struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: &'static str,
    active: bool,
    last_login: String,
}

pub struct AdminView {
    app: AppContext,
}

impl AdminView {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }
}

#[async_trait]
impl View for AdminView {
    fn route(&self) -> Route {
        Route::Admin
    }

    async fn render(&mut self, container: &mut Container) -> Result<()> {
        let user = require_user(&self.app.session)?;
        if !user.is_admin() {
            warn!("Admin view requested by non-admin {}", user.email);
            return Err(Error::Unauthorized("Admin access required".to_string()));
        }

        let dashboard = self.app.admin.dashboard().await?;

        let users = dashboard
            .users
            .iter()
            .map(|u| UserRow {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                role: if u.is_admin() { "admin" } else { "user" },
                active: u.is_active,
                last_login: u
                    .last_login
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "Never".to_string()),
            })
            .collect();

        let template = AdminTemplate {
            users,
            user_count: dashboard.users.len(),
            active_users: dashboard.active_users,
            admin_count: dashboard.admin_count,
            recipe_count: dashboard.recipe_count,
            popular_categories: dashboard.popular_categories(),
            last_updated: dashboard
                .last_updated()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        };
        container.set_html(template.render()?);
        Ok(())
    }
}
