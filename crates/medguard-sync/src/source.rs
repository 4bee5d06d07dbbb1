use std::future::Future;

use medguard_core::LedgerSnapshot;

use crate::config::SyncConfig;
use crate::error::SyncError;

/// Where full ledger snapshots come from.
pub trait LedgerSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<LedgerSnapshot, SyncError>> + Send;
}

/// `GET <ledger_url>` against the ledger middleware.
#[derive(Debug, Clone)]
pub struct HttpLedgerSource {
    client: reqwest::Client,
    url: String,
}

impl HttpLedgerSource {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: config.ledger_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LedgerSource for HttpLedgerSource {
    async fn fetch(&self) -> Result<LedgerSnapshot, SyncError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Ok(LedgerSnapshot::from_json_slice(&body)?)
    }
}
