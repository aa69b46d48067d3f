//! TCP transport for zone transfers and dynamic updates
//!
//! The transfer source and the dynamic-update target both talk to one
//! authoritative server over TCP. [`Transport`] owns the connection
//! details (server address, timeout, optional TSIG signer) and exposes
//! the two wire operations behind [`DnsTransport`] so tests can swap in
//! scripted servers.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use data_encoding::BASE64;
use futures::TryStreamExt;
use hickory_client::client::Client;
use hickory_proto::ProtoError;
use hickory_proto::dnssec::rdata::tsig::TsigAlgorithm;
use hickory_proto::dnssec::tsig::TSigner;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, Record, RecordType};
use hickory_proto::runtime::TokioRuntimeProvider;
use hickory_proto::tcp::TcpClientStream;
use hickory_proto::xfer::{DnsHandle, DnsMultiplexer};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// TSIG time window, matching the common server default.
const TSIG_FUDGE_SECONDS: u16 = 300;

/// Errors raised while talking to a DNS server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server hostname did not resolve to a usable address.
    #[error("no usable address for server {host}:{port}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The TCP connection could not be established.
    #[error("connection to {0} failed")]
    Connect(SocketAddr, #[source] ProtoError),

    /// The server did not answer within the configured deadline.
    #[error("request to {0} timed out after {1:?}")]
    Timeout(SocketAddr, Duration),

    /// The server answered with a non-success response code.
    #[error("server {0} answered {1}")]
    Refused(SocketAddr, ResponseCode),

    /// The exchange failed below the DNS layer.
    #[error(transparent)]
    Protocol(#[from] ProtoError),

    /// The TSIG key material could not be turned into a signer.
    #[error("invalid TSIG key: {0}")]
    Key(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// TSIG key material for signing transfers and updates.
///
/// The secret is base64 encoded, the same form it takes in a BIND
/// `key` statement. The secret is scrubbed from memory on drop.
#[derive(Clone, Serialize, Deserialize)]
pub struct TsigKey {
    /// Key name as known to the server.
    pub name: String,
    /// Base64 encoded shared secret.
    pub secret: String,
    /// HMAC algorithm name, `hmac-sha256` unless stated otherwise.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    "hmac-sha256".to_owned()
}

impl TsigKey {
    /// New key with the default `hmac-sha256` algorithm.
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
            algorithm: default_algorithm(),
        }
    }

    /// Build the message signer backing this key.
    ///
    /// # Errors
    ///
    /// Fails when the algorithm name is not a supported HMAC, when the
    /// key name is not a valid domain name, or when the secret is not
    /// valid base64.
    pub fn signer(&self) -> Result<TSigner, TransportError> {
        let algorithm = match self.algorithm.to_ascii_lowercase().as_str() {
            "hmac-sha1" => TsigAlgorithm::HmacSha1,
            "hmac-sha224" => TsigAlgorithm::HmacSha224,
            "hmac-sha256" => TsigAlgorithm::HmacSha256,
            "hmac-sha384" => TsigAlgorithm::HmacSha384,
            "hmac-sha512" => TsigAlgorithm::HmacSha512,
            other => {
                return Err(TransportError::Key(
                    format!("unsupported TSIG algorithm {other:?}").into(),
                ));
            }
        };

        let name = Name::from_utf8(&self.name).map_err(|error| TransportError::Key(error.into()))?;
        let secret = BASE64
            .decode(self.secret.as_bytes())
            .map_err(|error| TransportError::Key(error.into()))?;

        TSigner::new(secret, algorithm, name, TSIG_FUDGE_SECONDS)
            .map_err(|error| TransportError::Key(error.into()))
    }
}

impl fmt::Debug for TsigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsigKey")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl Drop for TsigKey {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Resolve `host` to a socket address in the requested family.
///
/// IP literals are used as given, whatever the family flag says.
/// Hostnames go through the system resolver and the first address in
/// the requested family wins.
pub(crate) async fn resolve_server(
    host: &str,
    port: u16,
    ipv6: bool,
) -> Result<SocketAddr, TransportError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let resolved = tokio::net::lookup_host((host, port))
        .await
        .map_err(|error| TransportError::Resolve {
            host: host.to_owned(),
            port,
            source: Some(error),
        })?;

    resolved
        .into_iter()
        .find(|addr| addr.is_ipv6() == ipv6)
        .ok_or_else(|| TransportError::Resolve {
            host: host.to_owned(),
            port,
            source: None,
        })
}

/// Low level DNS operations against a single server.
#[async_trait::async_trait]
pub trait DnsTransport: Send + Sync {
    /// Run a full zone transfer (AXFR) and return the answer records.
    async fn zone_transfer(&self, zone: &Name) -> Result<Vec<Record>, TransportError>;

    /// Send a prepared UPDATE message, returning the response code.
    async fn submit_update(&self, update: Message) -> Result<ResponseCode, TransportError>;
}

/// TCP client for a single authoritative server.
///
/// A fresh connection is opened per operation. Transfer sessions and
/// update messages are short exchanges and servers routinely close the
/// stream once they finish.
pub struct Transport {
    server: SocketAddr,
    timeout: Duration,
    signer: Option<TSigner>,
}

impl Transport {
    pub fn new(server: SocketAddr, timeout: Duration, signer: Option<TSigner>) -> Self {
        Self {
            server,
            timeout,
            signer,
        }
    }

    /// Address of the server this transport talks to.
    pub fn server(&self) -> SocketAddr {
        self.server
    }

    async fn connect(&self) -> Result<Client, TransportError> {
        let (stream, sender) = TcpClientStream::new(
            self.server,
            None,
            Some(self.timeout),
            TokioRuntimeProvider::default(),
        );
        let multiplexer = match &self.signer {
            Some(signer) => DnsMultiplexer::new(stream, sender, Some(Arc::new(signer.clone()))),
            None => DnsMultiplexer::new(stream, sender, None),
        };
        let (client, driver) = Client::connect(multiplexer)
            .await
            .map_err(|error| TransportError::Connect(self.server, error))?;
        tokio::spawn(driver);
        Ok(client)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("server", &self.server)
            .field("timeout", &self.timeout)
            .field("signed", &self.signer.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl DnsTransport for Transport {
    async fn zone_transfer(&self, zone: &Name) -> Result<Vec<Record>, TransportError> {
        let client = self.connect().await?;

        let mut message = Message::new();
        message
            .add_query(Query::query(zone.clone(), RecordType::AXFR))
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(false);

        tracing::debug!(%zone, server = %self.server, "requesting zone transfer");
        let responses = tokio::time::timeout(
            self.timeout,
            client.send(message).try_collect::<Vec<_>>(),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.server, self.timeout))??;

        let mut records = Vec::new();
        for response in responses {
            if response.response_code() != ResponseCode::NoError {
                return Err(TransportError::Refused(
                    self.server,
                    response.response_code(),
                ));
            }
            records.extend(response.answers().iter().cloned());
        }

        // A well-formed transfer opens and closes with the zone's SOA.
        if !records
            .iter()
            .any(|record| record.record_type() == RecordType::SOA)
        {
            return Err(TransportError::Protocol(ProtoError::from(
                "transfer answer did not include an SOA record",
            )));
        }

        tracing::debug!(%zone, records = records.len(), "zone transfer complete");
        Ok(records)
    }

    async fn submit_update(&self, update: Message) -> Result<ResponseCode, TransportError> {
        let client = self.connect().await?;

        tracing::debug!(server = %self.server, "submitting update");
        let mut responses = tokio::time::timeout(
            self.timeout,
            client.send(update).try_collect::<Vec<_>>(),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.server, self.timeout))??;

        let response = responses.pop().ok_or_else(|| {
            TransportError::Protocol(ProtoError::from("update produced no response"))
        })?;

        Ok(response.response_code())
    }
}
