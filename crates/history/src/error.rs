use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("The job input is invalid:\n{0}")]
    Invalid(ValidationErrors),

    #[error("Job storage error: {0}")]
    Database(#[from] database::DbError),
}
