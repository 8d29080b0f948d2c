//! REST client for the hosted payment table
//!
//! Talks to a PostgREST endpoint (the API Supabase exposes under
//! `/rest/v1`). Only inserts are needed.

use super::traits::PaymentStore;
use crate::state::PaymentRecord;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Default table holding payment records
pub const DEFAULT_TABLE: &str = "payment_details";

/// Client for inserting rows into the hosted payment table
pub struct RestPaymentStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    /// Sent as the bearer token when present, otherwise the api key is used
    access_token: Option<String>,
}

impl RestPaymentStore {
    /// Requests that take longer than `timeout` fail instead of leaving the
    /// form busy.
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: Option<&str>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.unwrap_or(DEFAULT_TABLE).to_string(),
            access_token,
        })
    }

    /// URL rows are posted to
    pub fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }
}

#[async_trait]
impl PaymentStore for RestPaymentStore {
    async fn insert(&self, record: &PaymentRecord) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to reach payment table: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Insert into {} rejected ({}): {}", self.table, status, body));
        }

        tracing::debug!(table = %self.table, "payment row inserted");
        Ok(())
    }
}
