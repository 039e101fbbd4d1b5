//! HTTP API handlers for orgchart-web

pub mod actions;
pub mod auth;
pub mod error;
pub mod export;
pub mod health;
pub mod options;
pub mod views;

pub use actions::apply_action;
pub use auth::{auth_middleware, login, logout};
pub use error::ApiError;
pub use export::export_roster;
pub use health::health_routes;
pub use options::picker_options;
pub use views::{current_view, drill_view, root_view};
