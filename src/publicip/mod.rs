//! Public IP echo sources.
//!
//! Which echo services are queried to learn the public address, and in
//! what order, is fixed once at startup through [`Settings`].

mod settings;

pub use settings::{set_providers, set_timeout, Settings, SettingsOption, DEFAULT_TIMEOUT};

use crate::error::DdnsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A DNS service that answers with the querying client's public address.
///
/// Variant order is the canonical order of provider lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpEchoProvider {
    Cloudflare,
    Google,
    #[serde(rename = "opendns")]
    OpenDns,
}

impl IpEchoProvider {
    /// Every recognized provider.
    pub const ALL: [IpEchoProvider; 3] = [
        IpEchoProvider::Cloudflare,
        IpEchoProvider::Google,
        IpEchoProvider::OpenDns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IpEchoProvider::Cloudflare => "cloudflare",
            IpEchoProvider::OpenDns => "opendns",
            IpEchoProvider::Google => "google",
        }
    }
}

impl fmt::Display for IpEchoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpEchoProvider {
    type Err = DdnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DdnsError::UnknownIpProvider(s.to_string()))
    }
}

impl From<IpEchoProvider> for String {
    fn from(provider: IpEchoProvider) -> Self {
        provider.as_str().to_string()
    }
}
