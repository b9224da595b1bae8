pub mod auth;
pub mod config;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
