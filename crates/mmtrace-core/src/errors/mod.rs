pub mod classify_error;
pub mod config_error;
pub mod error_code;
pub mod ingest_error;

pub use classify_error::{check_session_id, ClassifyError};
pub use config_error::ConfigError;
pub use ingest_error::IngestError;
