//! Bring the provider's record set in line with the current public IP.

use crate::context::Context;
use crate::error::Result;
use crate::providers::RecordProvider;
use crate::record::RecordType;
use serde::Serialize;
use std::net::IpAddr;

/// What [`sync`] did to the record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "count", rename_all = "snake_case")]
pub enum SyncAction {
    /// No record existed; one was created.
    Created,
    /// This many existing records were updated.
    Updated(usize),
}

/// Result of a reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    /// Provider name.
    pub provider: String,
    /// Record that was reconciled.
    pub domain: String,
    pub record_type: RecordType,
    pub action: SyncAction,
    pub ip: IpAddr,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Make the provider hold `ip` at its owner.
///
/// Every record of the matching address type is updated. When none exists
/// a new one is created, after removing any ALIAS record at the owner
/// since an ALIAS blocks address records sharing its name.
pub async fn sync(ctx: &Context, provider: &dyn RecordProvider, ip: IpAddr) -> Result<UpdateOutcome> {
    let record_type = RecordType::for_ip(ip);
    let content = ip.to_string();
    let domain = provider.target().fqdn();

    let record_ids = provider.record_ids(ctx, record_type).await?;

    let action = if record_ids.is_empty() {
        delete_alias_if_present(ctx, provider).await?;
        provider.create_record(ctx, record_type, &content).await?;
        tracing::info!("Created {} record {} -> {}", record_type, domain, ip);
        SyncAction::Created
    } else {
        for record_id in &record_ids {
            provider
                .update_record(ctx, record_type, &content, record_id)
                .await?;
        }
        tracing::info!(
            "Updated {} {} record(s) {} -> {}",
            record_ids.len(),
            record_type,
            domain,
            ip
        );
        SyncAction::Updated(record_ids.len())
    };

    Ok(UpdateOutcome {
        provider: provider.name().to_string(),
        domain,
        record_type,
        action,
        ip,
        timestamp: chrono::Utc::now(),
    })
}

async fn delete_alias_if_present(ctx: &Context, provider: &dyn RecordProvider) -> Result<()> {
    let alias_ids = provider.record_ids(ctx, RecordType::Alias).await?;
    if alias_ids.is_empty() {
        return Ok(());
    }

    tracing::info!(
        "Deleting ALIAS record at {} to make room for an address record",
        provider.target().fqdn()
    );
    provider.delete_alias_records(ctx).await
}
