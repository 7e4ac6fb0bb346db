//! Application state shared across all handlers

use sea_orm::DatabaseConnection;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub passcode: Option<String>,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, passcode: Option<String>, jwt_secret: String) -> Self {
        Self {
            db,
            passcode,
            jwt_secret,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self::new(db, config.passcode.clone(), config.jwt_secret.clone())
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
