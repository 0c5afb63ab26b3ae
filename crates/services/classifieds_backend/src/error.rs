use classifieds_db::DbError;
use classifieds_firebase::FirebaseError;
use classifieds_push::PushError;
use thiserror::Error;

/// Anything that stops the server from starting
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Failed to load config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing configuration section: {0}")]
    MissingSection(&'static str),

    #[error("Database setup failed: {0}")]
    Database(#[from] DbError),

    #[error("Firebase client setup failed: {0}")]
    Firebase(#[from] FirebaseError),

    #[error("Push client setup failed: {0}")]
    Push(#[from] PushError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
