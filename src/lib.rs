//! # porkbun-ddns
//!
//! Keeps one Porkbun DNS record pointed at a dynamic public IP.
//!
//! ## Features
//!
//! - Record reconciliation against the Porkbun JSON API: query record
//!   identifiers, create, update by identifier, bulk-delete ALIAS records
//! - Cancellation and deadlines on every provider call
//! - Validated public IP echo source settings
//!
//! ## Usage
//!
//! ```bash
//! # Write an example config
//! porkbun-ddns init
//!
//! # List record identifiers for the configured record
//! porkbun-ddns status
//!
//! # Point the record at an address
//! porkbun-ddns update --ip 203.0.113.7
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod providers;
pub mod publicip;
pub mod reconcile;
pub mod record;
pub mod transport;

pub use config::Config;
pub use context::Context;
pub use error::{DdnsError, Result};
pub use providers::{PorkbunProvider, RecordProvider};
pub use publicip::Settings;
pub use record::{Credentials, RecordTarget, RecordType};
