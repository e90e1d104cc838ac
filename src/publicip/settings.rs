use super::IpEchoProvider;
use crate::error::{DdnsError, Result};
use std::time::Duration;

/// Default time allowed for one public IP lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Ordered echo providers and the lookup timeout.
///
/// Provider order is the query priority: later entries are fallbacks.
/// Every list is kept in canonical [`IpEchoProvider`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    providers: Vec<IpEchoProvider>,
    timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            providers: vec![IpEchoProvider::Cloudflare, IpEchoProvider::OpenDns],
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings {
    /// Start from the defaults and apply `options` in order.
    ///
    /// Stops at the first option that fails; the failing option leaves no
    /// trace and later options are not applied.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = SettingsOption>,
    {
        let mut settings = Self::default();
        for option in options {
            option.apply(&mut settings)?;
        }
        Ok(settings)
    }

    pub fn providers(&self) -> &[IpEchoProvider] {
        &self.providers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// One validated mutation of [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOption {
    /// Replace the provider list with the set of `first` and `rest`.
    Providers { first: String, rest: Vec<String> },
    /// Replace the lookup timeout.
    Timeout(Duration),
}

/// Use `first` and `rest` as the provider set.
///
/// The stored list is deduplicated and kept in canonical provider order,
/// so two calls naming the same set always yield the same settings.
/// Argument order does not set fallback priority; the canonical order does.
pub fn set_providers<P, I>(first: P, rest: I) -> SettingsOption
where
    P: Into<String>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    SettingsOption::Providers {
        first: first.into(),
        rest: rest.into_iter().map(Into::into).collect(),
    }
}

/// Use `timeout` for each public IP lookup.
pub fn set_timeout(timeout: Duration) -> SettingsOption {
    SettingsOption::Timeout(timeout)
}

impl SettingsOption {
    /// Apply to `settings`, or leave it untouched and report why not.
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        match self {
            SettingsOption::Providers { first, rest } => {
                let mut providers = std::iter::once(first)
                    .chain(rest)
                    .map(|name| name.parse::<IpEchoProvider>())
                    .collect::<Result<Vec<_>>>()?;
                providers.sort_unstable();
                providers.dedup();
                settings.providers = providers;
            }
            SettingsOption::Timeout(timeout) => {
                if timeout.is_zero() {
                    return Err(DdnsError::InvalidTimeout);
                }
                settings.timeout = *timeout;
            }
        }
        Ok(())
    }
}
