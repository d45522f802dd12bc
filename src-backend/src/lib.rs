//! Pantry Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - validation: Request body rules
//! - commands: Mutation and read endpoint handlers

pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;
pub mod validation;

use std::path::PathBuf;

pub use commands::{Action, ActionResponse, PantryService};
pub use config::BackendConfig;
pub use domain::{DomainError, DomainResult, Item, Shelf};

use repository::{init_db, DbState};

/// Application state shared across requests
pub struct AppState {
    pub db_state: DbState,
    pub db_path: PathBuf,
    pub service: PantryService,
}

impl AppState {
    /// Set up logging and the database described by `config`
    pub async fn open(config: BackendConfig) -> DomainResult<Self> {
        if let Some(log_dir) = &config.log_dir {
            // A second init in the same process keeps the first logger
            if let Err(e) = rolling_logger::init_logger(log_dir, "Pantry") {
                log::warn!("file logging not enabled: {}", e);
            }
        }

        let db_state = match init_db(&config.db_path).await {
            Ok(state) => state,
            Err(e) => {
                let _ = rolling_logger::error(&format!("DB init failed: {}", e));
                return Err(e);
            }
        };
        let _ = rolling_logger::info(&format!("DB ready at {}", config.db_path.display()));

        let service = PantryService::new(&db_state, &config);
        Ok(Self {
            db_path: config.db_path.clone(),
            db_state,
            service,
        })
    }
}
