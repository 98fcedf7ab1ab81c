//! HTTP client for the external refinement engine.
//!
//! The engine receives `POST {base}/refine` with
//! `{ "document": ..., "instruction": "..." }` and answers
//! `{ "document": ... }`. Everything it returns is validated by the service
//! layer before it can become a revision.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vitrine_core::document::Document;
use vitrine_core::refinement::{RefinementEngine, RefinementError};

#[derive(Serialize)]
struct RefineRequest<'a> {
    document: &'a Document,
    instruction: &'a str,
}

#[derive(Deserialize)]
struct RefineResponse {
    document: serde_json::Value,
}

/// [`RefinementEngine`] backed by a remote HTTP service.
pub struct HttpRefinementEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRefinementEngine {
    /// Create a client for the engine at `base_url`.
    ///
    /// `timeout` bounds each HTTP call; the service applies its own budget
    /// on top.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create an engine reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/refine", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RefinementEngine for HttpRefinementEngine {
    async fn generate(
        &self,
        current: &Document,
        instruction: &str,
    ) -> Result<serde_json::Value, RefinementError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&RefineRequest {
                document: current,
                instruction,
            })
            .send()
            .await
            .map_err(|e| RefinementError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefinementError::Rejected(format!("{status}: {body}")));
        }

        let parsed: RefineResponse = response
            .json()
            .await
            .map_err(|e| RefinementError::Rejected(format!("unreadable response: {e}")))?;
        Ok(parsed.document)
    }
}
