#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Domain models, persistence, the token-based session subsystem, routing"]
#![doc = "configuration and error handling for the task management service."]
#![doc = "The binary (`main.rs`) only reads configuration and runs the server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod store;

pub use error::{AppError, StartupError};
pub use routes::AppState;

use auth::SessionManager;
use config::Config;
use store::{TaskStore, UserStore};

/// Opens the database, creates missing tables and wires every component.
pub async fn build_state(config: &Config) -> Result<AppState, StartupError> {
    let pool = db::connect(config).await?;
    db::init_schema(&pool).await?;

    let sessions = SessionManager::from_config(config, UserStore::new(pool.clone()))?;
    Ok(AppState::new(sessions, TaskStore::new(pool)))
}
