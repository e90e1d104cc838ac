//! The DNS record being synchronized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Owner label denoting the bare domain apex.
pub const APEX_OWNER: &str = "@";

/// Default record TTL in seconds.
pub const DEFAULT_TTL: u32 = 600;

/// DNS record types the reconciler handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Alias,
}

impl RecordType {
    /// Wire name of the record type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Alias => "ALIAS",
        }
    }

    /// Address record type matching the IP family.
    pub fn for_ip(ip: IpAddr) -> Self {
        if ip.is_ipv4() {
            RecordType::A
        } else {
            RecordType::Aaaa
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API credentials for one provider account.
///
/// `Debug` is redacted so credentials never reach logs or error text.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret_api_key(&self) -> &str {
        &self.secret_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("secret_api_key", &"<redacted>")
            .finish()
    }
}

/// Domain, owner and TTL of the record being synchronized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    pub domain: String,
    /// Subdomain label; `@` is the apex, `*` a literal wildcard.
    pub owner: String,
    pub ttl: u32,
}

impl RecordTarget {
    pub fn new(domain: impl Into<String>, owner: impl Into<String>, ttl: u32) -> Self {
        Self {
            domain: domain.into(),
            owner: owner.into(),
            ttl,
        }
    }

    /// Whether the owner is the apex sentinel.
    pub fn is_apex(&self) -> bool {
        self.owner == APEX_OWNER
    }

    /// Fully qualified record name.
    pub fn fqdn(&self) -> String {
        if self.is_apex() {
            self.domain.clone()
        } else {
            format!("{}.{}", self.owner, self.domain)
        }
    }
}
