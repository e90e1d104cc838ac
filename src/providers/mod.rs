//! DNS hosting provider implementations.

mod porkbun;

#[cfg(test)]
mod tests;

pub use porkbun::PorkbunProvider;

use crate::config::RecordConfig;
use crate::context::Context;
use crate::error::Result;
use crate::record::{Credentials, RecordTarget, RecordType};
use async_trait::async_trait;
use std::time::Duration;

/// Record operations a DNS hosting provider exposes.
///
/// Every operation is bound to the provider's domain and owner. A provider
/// may hold several records sharing one name and type, so queries return
/// every identifier found.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &'static str;

    /// Get the record being managed.
    fn target(&self) -> &RecordTarget;

    /// Identifiers of every record of `record_type` at the owner.
    async fn record_ids(&self, ctx: &Context, record_type: RecordType) -> Result<Vec<String>>;

    /// Create a record with `content` at the owner.
    async fn create_record(&self, ctx: &Context, record_type: RecordType, content: &str)
        -> Result<()>;

    /// Replace the content of the record identified by `record_id`.
    async fn update_record(
        &self,
        ctx: &Context,
        record_type: RecordType,
        content: &str,
        record_id: &str,
    ) -> Result<()>;

    /// Remove every ALIAS record at the owner.
    async fn delete_alias_records(&self, ctx: &Context) -> Result<()>;
}

/// Create a provider from configuration.
pub fn create_provider(config: &RecordConfig, request_timeout: Duration) -> Result<Box<dyn RecordProvider>> {
    let client = reqwest::Client::builder()
        .timeout(request_timeout)
        .build()
        .map_err(crate::error::DdnsError::Transport)?;

    let target = RecordTarget::new(config.domain.clone(), config.owner.clone(), config.ttl);
    let credentials = Credentials::new(
        resolve_env(&config.api_key),
        resolve_env(&config.secret_api_key),
    );

    Ok(Box::new(PorkbunProvider::new(client, target, credentials)))
}

/// Resolve environment variable references (values starting with $).
pub(crate) fn resolve_env(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_else(|_| {
            tracing::warn!("Environment variable {} not set", var_name);
            value.to_string()
        })
    } else {
        value.to_string()
    }
}
