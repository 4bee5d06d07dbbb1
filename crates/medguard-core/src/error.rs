use thiserror::Error;

pub type MedGuardResult<T> = Result<T, MedGuardError>;

#[derive(Debug, Error)]
pub enum MedGuardError {
    #[error("ledger payload decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("ledger payload must be a JSON object keyed by trial id")]
    NotAnObject,

    #[error("ledger entry `{id}` is malformed: {source}")]
    MalformedEntry {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
