use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Marketplace error: {0}")]
    Market(#[from] wfmarket::Error),

    #[error("No competing sell orders for {0}")]
    EmptyQuote(String),

    #[error("Item key not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}

impl Error {
    /// Auth failures end the run; every other failure only costs the item it happened on.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Market(e) if e.is_auth())
    }
}
