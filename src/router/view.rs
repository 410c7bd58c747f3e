use crate::app::AppContext;
use crate::router::route::Route;
use crate::search::SearchController;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Shown when even the not-found view fails to render
pub const CRITICAL_ERROR_HTML: &str = r#"<div class="container critical-error">
  <h2>Critical error</h2>
  <p>The content could not be loaded</p>
</div>"#;

/// Render target for the current view
#[derive(Debug, Default, Clone)]
pub struct Container {
    html: String,
}

impl Container {
    pub fn clear(&mut self) {
        self.html.clear();
    }

    pub fn set_html(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// A top-level screen managed by the router
#[async_trait]
pub trait View: Send + Sync {
    fn route(&self) -> Route;

    async fn render(&mut self, container: &mut Container) -> Result<()>;

    /// Called before the router replaces this view
    fn destroy(&mut self) {}

    /// Live search controller, for views that own one
    fn search_controller(&self) -> Option<Arc<SearchController>> {
        None
    }
}

pub type ViewFactory = Box<dyn Fn(&AppContext) -> Box<dyn View> + Send + Sync>;
