//! Zone transfers as a record source
//!
//! [`XfrSource`] pulls the complete contents of a zone from its
//! authoritative server with AXFR. There is no cache: every read is a
//! fresh transfer, so the records always reflect what the server is
//! currently serving.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ZoneError;
use crate::provider::ZoneSource;
use crate::rr::{Name, Rr};
use crate::transport::{DnsTransport, Transport, TsigKey, resolve_server};

/// Connection settings for one authoritative server.
///
/// Shared by the transfer source and the dynamic-update target, which
/// talk to the same server with the same credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Server hostname or IP literal.
    pub host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Resolve the host to an IPv6 address instead of IPv4.
    #[serde(default)]
    pub ipv6: bool,

    /// Per-operation timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// TSIG key, when the server requires signed operations.
    #[serde(default)]
    pub key: Option<TsigKey>,

    /// Most changes sent in a single update message. Only meaningful
    /// for update targets.
    #[serde(default = "default_batch_size")]
    pub update_batch_size: usize,
}

fn default_port() -> u16 {
    53
}

fn default_timeout() -> u64 {
    15
}

fn default_batch_size() -> usize {
    1000
}

impl TransferConfig {
    /// Configuration for `host` with every other knob at its default.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            ipv6: false,
            timeout: default_timeout(),
            key: None,
            update_batch_size: default_batch_size(),
        }
    }

    /// Resolve the server and build the TCP transport this
    /// configuration describes.
    ///
    /// Resolution and signer construction happen here, once, so a bad
    /// hostname or key fails before any zone work starts.
    pub(crate) async fn transport(&self) -> Result<Transport, ZoneError> {
        let server = resolve_server(&self.host, self.port, self.ipv6)
            .await
            .map_err(ZoneError::Transfer)?;
        let signer = match &self.key {
            Some(key) => Some(key.signer().map_err(ZoneError::Transfer)?),
            None => None,
        };
        Ok(Transport::new(
            server,
            Duration::from_secs(self.timeout),
            signer,
        ))
    }
}

/// Record source backed by full zone transfers.
#[derive(Clone)]
pub struct XfrSource {
    transport: Arc<dyn DnsTransport>,
}

impl XfrSource {
    /// Connect to the server described by `config`.
    ///
    /// # Errors
    ///
    /// Fails when the host does not resolve in the requested address
    /// family or the TSIG key cannot be used.
    pub async fn new(config: &TransferConfig) -> Result<Self, ZoneError> {
        Ok(Self::with_transport(Arc::new(config.transport().await?)))
    }

    /// Source over an existing transport.
    pub fn with_transport(transport: Arc<dyn DnsTransport>) -> Self {
        Self { transport }
    }

    /// Handle to the underlying transport, shared with the update
    /// target that reads through this source.
    pub(crate) fn transport(&self) -> Arc<dyn DnsTransport> {
        self.transport.clone()
    }
}

impl fmt::Debug for XfrSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XfrSource").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ZoneSource for XfrSource {
    async fn zone_records(&self, zone: &Name, _target: bool) -> Result<Vec<Rr>, ZoneError> {
        let records = self
            .transport
            .zone_transfer(zone)
            .await
            .map_err(ZoneError::Transfer)?;
        Ok(records.iter().filter_map(Rr::from_wire).collect())
    }

    async fn zone_exists(&self, _zone: &Name, _target: bool) -> Result<bool, ZoneError> {
        // Transfers cannot ask whether a zone exists, and transfer-backed
        // zones cannot be created here, so they are assumed to exist
        // upstream.
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_cover_everything_but_the_host() {
        let config: TransferConfig =
            serde_json::from_str(r#"{"host": "ns1.unit.tests"}"#).unwrap();
        assert_eq!(config.port, 53);
        assert!(!config.ipv6);
        assert_eq!(config.timeout, 15);
        assert!(config.key.is_none());
        assert_eq!(config.update_batch_size, 1000);
    }
}
