use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::config::Settings;
use crate::web::handlers::{self, AppState};

/// Create the router with every page, form and JSON endpoint
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let page_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/view/:route", get(handlers::show_view))
        .route("/history/back", post(handlers::history_back))
        .route("/history/forward", post(handlers::history_forward))
        .route("/theme", post(handlers::toggle_theme))
        .route("/not-found/search", post(handlers::not_found_search))
        .with_state(state.clone());

    let account_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/password/reset", post(handlers::reset_password))
        .route("/profile/preferences", post(handlers::update_preferences))
        .route("/profile/password", post(handlers::change_password))
        .with_state(state.clone());

    // Recipes view actions; each one drives the live search controller
    let recipe_routes = Router::new()
        .route("/recipes/search", get(handlers::search))
        .route("/recipes/input", post(handlers::query_input))
        .route("/recipes/more", post(handlers::load_more))
        .route("/recipes/random", post(handlers::random))
        .route("/recipes/quick/:filter", post(handlers::quick_filter))
        .route("/recipes/clear", post(handlers::clear_filters))
        .route("/recipes/suggest", get(handlers::suggest))
        .route("/recipes/modal/close", post(handlers::close_modal))
        .route("/recipes/:id", get(handlers::recipe_detail))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state);

    Router::new()
        .merge(page_routes)
        .merge(account_routes)
        .merge(recipe_routes)
        .merge(health_routes)
        .layer(
            // Request body size limit
            RequestBodyLimitLayer::new(settings.server.max_request_body_size),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(
            // Security headers
            SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; object-src 'none'; base-uri 'self'",
            ),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
