pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Remote data
pub mod backend;
pub mod provider;

// Client state and accounts
pub mod admin;
pub mod auth;
pub mod session;

// Search and views
pub mod app;
pub mod router;
pub mod search;
pub mod views;

// Surfaces
pub mod cli;
pub mod web;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
