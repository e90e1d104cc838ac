//! Porkbun DNS provider.
//!
//! API reference: <https://porkbun.com/api/json/v3/documentation>

use super::RecordProvider;
use crate::context::Context;
use crate::error::{DdnsError, Result};
use crate::record::{Credentials, RecordTarget, RecordType};
use crate::transport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.porkbun.com";
const API_PREFIX: &str = "/api/json/v3/dns";

/// Porkbun DNS provider.
pub struct PorkbunProvider {
    client: reqwest::Client,
    target: RecordTarget,
    credentials: Credentials,
    base_url: String,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "secretapikey")]
    secret_api_key: &'a str,
    #[serde(rename = "apikey")]
    api_key: &'a str,
}

#[derive(Serialize)]
struct RecordRequest<'a> {
    #[serde(flatten)]
    auth: AuthRequest<'a>,
    content: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    name: &'a str,
    #[serde(rename = "type")]
    record_type: RecordType,
    ttl: String,
}

fn is_empty(value: &&str) -> bool {
    value.is_empty()
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Option<Vec<RecordEntry>>,
}

#[derive(Debug, Deserialize)]
struct RecordEntry {
    id: String,
}

impl PorkbunProvider {
    /// Create a new Porkbun provider.
    pub fn new(client: reqwest::Client, target: RecordTarget, credentials: Credentials) -> Self {
        Self::with_base_url(client, target, credentials, DEFAULT_BASE_URL.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(
        client: reqwest::Client,
        target: RecordTarget,
        credentials: Credentials,
        base_url: String,
    ) -> Self {
        Self {
            client,
            target,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn auth(&self) -> AuthRequest<'_> {
        AuthRequest {
            secret_api_key: self.credentials.secret_api_key(),
            api_key: self.credentials.api_key(),
        }
    }

    fn record_request<'a>(&'a self, record_type: RecordType, content: &'a str) -> RecordRequest<'a> {
        RecordRequest {
            auth: self.auth(),
            content,
            name: &self.target.owner,
            record_type,
            ttl: self.target.ttl.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn delete_by_name_type(&self, ctx: &Context, record_type: RecordType) -> Result<()> {
        let url = self.url(&name_type_path("deleteByNameType", &self.target, record_type));
        transport::post_no_body(ctx, &self.client, &url, &self.auth())
            .await
            .map_err(|e| DdnsError::for_record(record_type, e))
    }
}

/// Path addressing every record of a type at the target's owner.
///
/// The owner is appended verbatim: Porkbun expects a literal `*` for
/// wildcards, and the apex owner `@` is expressed by leaving it out.
pub(crate) fn name_type_path(action: &str, target: &RecordTarget, record_type: RecordType) -> String {
    let mut path = format!("{}/{}/{}/{}/", API_PREFIX, action, target.domain, record_type);
    if !target.is_apex() {
        path.push_str(&target.owner);
    }
    path
}

#[async_trait]
impl RecordProvider for PorkbunProvider {
    fn name(&self) -> &'static str {
        "porkbun"
    }

    fn target(&self) -> &RecordTarget {
        &self.target
    }

    async fn record_ids(&self, ctx: &Context, record_type: RecordType) -> Result<Vec<String>> {
        let url = self.url(&name_type_path("retrieveByNameType", &self.target, record_type));

        let response: RecordsResponse = transport::post_json(ctx, &self.client, &url, &self.auth())
            .await
            .map_err(|e| DdnsError::for_record(record_type, e))?;

        let ids: Vec<String> = response
            .records
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.id)
            .collect();
        tracing::debug!(
            "Found {} {} record(s) for {}",
            ids.len(),
            record_type,
            self.target.fqdn()
        );
        Ok(ids)
    }

    async fn create_record(
        &self,
        ctx: &Context,
        record_type: RecordType,
        content: &str,
    ) -> Result<()> {
        let url = self.url(&format!("{}/create/{}", API_PREFIX, self.target.domain));

        transport::post_no_body(ctx, &self.client, &url, &self.record_request(record_type, content))
            .await
            .map_err(|e| DdnsError::for_record(record_type, e))
    }

    async fn update_record(
        &self,
        ctx: &Context,
        record_type: RecordType,
        content: &str,
        record_id: &str,
    ) -> Result<()> {
        let url = self.url(&format!(
            "{}/edit/{}/{}",
            API_PREFIX, self.target.domain, record_id
        ));

        transport::post_no_body(ctx, &self.client, &url, &self.record_request(record_type, content))
            .await
            .map_err(|e| DdnsError::for_record_id(record_type, record_id, e))
    }

    async fn delete_alias_records(&self, ctx: &Context) -> Result<()> {
        self.delete_by_name_type(ctx, RecordType::Alias).await
    }
}
