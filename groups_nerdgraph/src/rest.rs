//! GraphQL-over-HTTP interface for NerdGraph
//!

use anyhow::{bail, Context, Result};
use groups_core::logging::debug;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::creds::NerdGraphCredentials;

const API_KEY_HEADER: &str = "API-Key";
const USER_AGENT: &str = "groups-nerdgraph";

/// Settings for the http client
#[derive(Debug, Default, Clone, Copy)]
pub struct NerdGraphRestConfig {
    /// Enable/disable retrying transient http failures.
    pub retry: bool,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize, Debug)]
struct GraphQlError {
    message: String,
}

/// Wrapper struct for http functionality
pub(crate) struct NerdGraphRestClient {
    credentials: NerdGraphCredentials,
    http_client: ClientWithMiddleware,
}

impl NerdGraphRestClient {
    pub(crate) fn new(
        credentials: NerdGraphCredentials,
        config: NerdGraphRestConfig,
    ) -> Result<Self> {
        credentials.validate()?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let mut client_builder = ClientBuilder::new(
            reqwest::Client::builder()
                .gzip(true)
                .build()
                .context("building http client")?,
        );
        if config.retry {
            client_builder =
                client_builder.with(RetryTransientMiddleware::new_with_policy(retry_policy))
        }
        Ok(Self {
            credentials,
            http_client: client_builder.build(),
        })
    }

    /// Run a query or mutation. Returns `Ok(None)` when the response has no
    /// `data`. Any GraphQL `errors` become an error.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Option<T>> {
        debug!("sending NerdGraph request with variables {variables}");
        let response = self
            .http_client
            .post(self.credentials.endpoint())
            .json(&GraphQlRequest { query, variables })
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context("couldn't send request")?
            .error_for_status()?;

        let body = response
            .json::<GraphQlResponse<T>>()
            .await
            .context("parsing NerdGraph response")?;

        if !body.errors.is_empty() {
            bail!(
                "NerdGraph returned errors: {}",
                body.errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            );
        }
        Ok(body.data)
    }
}
