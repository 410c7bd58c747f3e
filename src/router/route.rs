use std::fmt;

/// Named top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Recipes,
    Profile,
    Admin,
    NotFound,
}

impl Route {
    /// Routes reachable by name
    pub const NAMED: [Route; 4] = [Route::Home, Route::Recipes, Route::Profile, Route::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Recipes => "recipes",
            Route::Profile => "profile",
            Route::Admin => "admin",
            Route::NotFound => "404",
        }
    }

    /// URL fragment recorded in history
    pub fn fragment(&self) -> String {
        format!("#{}", self.as_str())
    }

    pub fn parse(name: &str) -> Option<Route> {
        let name = name.trim().trim_start_matches('#');
        Route::NAMED.into_iter().find(|route| route.as_str() == name)
    }

    /// Like `parse`, with unknown names resolving to `NotFound`
    pub fn resolve(name: &str) -> Route {
        Route::parse(name).unwrap_or(Route::NotFound)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Recipes => "Recipes",
            Route::Profile => "Profile",
            Route::Admin => "Admin",
            Route::NotFound => "Not found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
