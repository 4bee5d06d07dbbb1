use medguard_core::MedGuardError;
use serde::Serialize;
use thiserror::Error;

/// Advisory text shown in the error banner whenever a fetch fails.
pub const CONNECTION_ADVISORY: &str = "Connection to API failed. Make sure backend is running.";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("ledger transport failed: {0}")]
    Transport(String),

    #[error("ledger responded with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("ledger payload rejected: {0}")]
    Payload(#[from] MedGuardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncErrorKind {
    /// The request never produced a response.
    Transport,
    /// A response arrived but was not a usable ledger.
    Protocol,
}

impl SyncError {
    pub fn kind(&self) -> SyncErrorKind {
        match self {
            Self::Transport(_) => SyncErrorKind::Transport,
            Self::HttpStatus { .. } | Self::Payload(_) => SyncErrorKind::Protocol,
        }
    }
}

impl SyncErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Protocol => "protocol",
        }
    }
}
