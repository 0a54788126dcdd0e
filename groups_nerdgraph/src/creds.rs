use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// US datacenter endpoint
const US_ENDPOINT: &str = "https://api.newrelic.com/graphql";
/// EU datacenter endpoint
const EU_ENDPOINT: &str = "https://api.eu.newrelic.com/graphql";

/// The datacenter the account lives in
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// United States
    #[default]
    Us,
    /// European Union
    Eu,
}

/// Credentials for authenticating to NerdGraph.
///
/// The user puts these in their credentials file.
#[derive(Deserialize, Default, Clone)]
pub struct NerdGraphCredentials {
    pub(crate) api_key: String,
    #[serde(default)]
    pub(crate) region: Region,
    /// Overrides the region endpoint when set (e.g. for testing)
    pub(crate) url: Option<String>,
}

impl std::fmt::Debug for NerdGraphCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NerdGraphCredentials")
            .field("api_key", &"<redacted>")
            .field("region", &self.region)
            .field("url", &self.url)
            .finish()
    }
}

impl NerdGraphCredentials {
    /// Basic constructor
    pub fn new(api_key: String, region: Region, url: Option<String>) -> Self {
        Self {
            api_key,
            region,
            url,
        }
    }

    /// Build credentials from a loosely-typed credentials map.
    pub fn from_map(credentials: &HashMap<String, String>) -> Result<Self> {
        let mut creds = NerdGraphCredentials::default();
        let mut required_fields = HashSet::from(["api_key".to_owned()]);

        for (k, v) in credentials.iter() {
            match k.as_ref() {
                "api_key" => creds.api_key = v.to_string(),
                "region" => {
                    creds.region = match v.to_lowercase().as_str() {
                        "us" => Region::Us,
                        "eu" => Region::Eu,
                        other => return Err(anyhow!["unknown region: {other}"]),
                    }
                }
                "url" => creds.url = Some(v.to_string()),
                _ => (),
            }

            required_fields.remove(k);
        }

        if !required_fields.is_empty() {
            return Err(anyhow![
                "NerdGraph credentials missing required fields: {:#?}",
                required_fields
            ]);
        }

        Ok(creds)
    }

    /// Perform simple field validation to catch bad input.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(anyhow!(
                "api_key is missing. Please make sure your credentials file is correct."
            ));
        }
        Ok(())
    }

    /// If the URL is explicitly defined, that's used first.
    /// Otherwise, the region's endpoint is used.
    pub(crate) fn endpoint(&self) -> String {
        self.url.to_owned().unwrap_or_else(|| {
            match self.region {
                Region::Us => US_ENDPOINT,
                Region::Eu => EU_ENDPOINT,
            }
            .to_owned()
        })
    }
}
