use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Registrant, RowNumber},
    protocol::{decode_registrants, MarkAccreditedRequest},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::TransportError;

/// The two operations the spreadsheet endpoint supports.
#[async_trait]
pub trait RegistrantGateway: Send + Sync {
    async fn list_registrants(&self) -> Result<Vec<Registrant>, TransportError>;
    async fn mark_accredited(&self, row_number: RowNumber) -> Result<(), TransportError>;
}

/// How a completed mark-accredited POST is judged.
///
/// The endpoint has no documented success response, so `Lenient` counts any
/// request that reached the server as applied. `RequireSuccessStatus` at
/// least rejects non-2xx replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPolicy {
    #[default]
    Lenient,
    #[serde(alias = "strict")]
    RequireSuccessStatus,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: Url,
    pub mutation_policy: MutationPolicy,
    pub request_timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            mutation_policy: MutationPolicy::default(),
            request_timeout: None,
        }
    }
}

pub struct HttpGateway {
    http: Client,
    endpoint: Url,
    mutation_policy: MutationPolicy,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint,
            mutation_policy: config.mutation_policy,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RegistrantGateway for HttpGateway {
    async fn list_registrants(&self) -> Result<Vec<Registrant>, TransportError> {
        debug!(endpoint = %self.endpoint, "gateway: listing registrants");
        let res = self.http.get(self.endpoint.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!(%status, "gateway: list request rejected");
            return Err(TransportError::Status(status));
        }

        let body = res.bytes().await?;
        let registrants = decode_registrants(&body)?;
        info!(count = registrants.len(), "gateway: registrants loaded");
        Ok(registrants)
    }

    async fn mark_accredited(&self, row_number: RowNumber) -> Result<(), TransportError> {
        debug!(row = row_number.0, "gateway: marking registrant accredited");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&MarkAccreditedRequest { row_number })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            match self.mutation_policy {
                MutationPolicy::Lenient => {
                    warn!(
                        row = row_number.0,
                        %status,
                        "gateway: ignoring non-success status for mark request"
                    );
                }
                MutationPolicy::RequireSuccessStatus => {
                    warn!(row = row_number.0, %status, "gateway: mark request rejected");
                    return Err(TransportError::Status(status));
                }
            }
        }

        info!(row = row_number.0, "gateway: mark request completed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
