//! Server-rendered web surface around the view router.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
