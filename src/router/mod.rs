//! Single-view router with history, an admin gate and a not-found fallback.

pub mod history;
pub mod route;
pub mod view;

pub use history::{History, HistoryEntry};
pub use route::Route;
pub use view::{Container, View, ViewFactory, CRITICAL_ERROR_HTML};

use crate::app::AppContext;
use crate::search::SearchController;
use crate::session::SessionContext;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct ViewRouter {
    app: AppContext,
    registry: HashMap<Route, ViewFactory>,
    current: Option<Box<dyn View>>,
    current_route: Option<Route>,
    history: History,
    container: Container,
}

impl ViewRouter {
    /// Router with the standard views registered
    pub fn new(app: AppContext) -> Self {
        let mut router = Self::empty(app);
        crate::views::register_all(&mut router);
        router
    }

    /// Router with no views; routes without a view render the critical error
    pub fn empty(app: AppContext) -> Self {
        Self {
            app,
            registry: HashMap::new(),
            current: None,
            current_route: None,
            history: History::default(),
            container: Container::default(),
        }
    }

    pub fn register<F>(&mut self, route: Route, factory: F)
    where
        F: Fn(&AppContext) -> Box<dyn View> + Send + Sync + 'static,
    {
        self.registry.insert(route, Box::new(factory));
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn session(&self) -> &SessionContext {
        &self.app.session
    }

    pub fn current_route(&self) -> Option<Route> {
        self.current_route
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Search controller of the current view, when it is a recipes view
    pub fn current_search(&self) -> Option<Arc<SearchController>> {
        self.current.as_ref().and_then(|view| view.search_controller())
    }

    pub async fn navigate(&mut self, name: &str) -> Route {
        self.navigate_with(name, true).await
    }

    /// Resolve `name`, record it in history when `push` is set, and render it.
    /// Returns the route that ended up rendered.
    pub async fn navigate_with(&mut self, name: &str, push: bool) -> Route {
        let mut route = Route::resolve(name);
        if route == Route::NotFound && Route::parse(name).is_none() {
            debug!("Unknown route: {}", name);
        }

        if route == Route::Admin && !self.app.session.is_admin() {
            warn!("Admin route denied, showing not-found");
            route = Route::NotFound;
        }

        if push {
            self.history.push(route);
        }

        loop {
            self.destroy_current();
            self.container.clear();
            self.current_route = Some(route);

            let result = match self.build(route) {
                Ok(mut view) => {
                    let result = view.render(&mut self.container).await;
                    self.current = Some(view);
                    result
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {
                    info!("Rendered view {}", route);
                    return route;
                }
                Err(e) if route != Route::NotFound => {
                    error!("Error rendering view {}: {}", route, e.log_safe());
                    route = Route::NotFound;
                }
                Err(e) => {
                    error!("Error rendering not-found view: {}", e.log_safe());
                    self.container.set_html(CRITICAL_ERROR_HTML);
                    return route;
                }
            }
        }
    }

    fn build(&self, route: Route) -> Result<Box<dyn View>> {
        let factory = self
            .registry
            .get(&route)
            .ok_or_else(|| Error::Render(format!("No view registered for route {route}")))?;
        Ok(factory(&self.app))
    }

    pub async fn back(&mut self) -> Option<Route> {
        let route = self.history.back()?;
        Some(self.navigate_with(route.as_str(), false).await)
    }

    pub async fn forward(&mut self) -> Option<Route> {
        let route = self.history.forward()?;
        Some(self.navigate_with(route.as_str(), false).await)
    }

    /// Tear down the current view, e.g. on logout
    pub fn destroy_current(&mut self) {
        if let Some(mut view) = self.current.take() {
            view.destroy();
        }
    }

    /// Drop view and history, leaving an empty container
    pub fn reset(&mut self) {
        self.destroy_current();
        self.current_route = None;
        self.history = History::default();
        self.container.clear();
    }
}
