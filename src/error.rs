use std::io;

use camino::Utf8PathBuf;
use hickory_proto::op::ResponseCode;

use crate::rr::Name;
use crate::transport::TransportError;

/// Failures surfaced by zone sources and targets.
///
/// Nothing here is retried internally; every variant carries the
/// originating diagnostic so callers can tell a parse complaint from a
/// connection refusal from an authentication rejection.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    /// The zone file does not exist. Recoverable: callers may treat the
    /// zone as empty and regenerate it.
    #[error("zone file not found at {0}")]
    NotFound(Utf8PathBuf),

    /// The zone file exists but could not be parsed, or failed origin
    /// validation.
    #[error("failed to load zone {zone}: {source}")]
    Load {
        zone: Name,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unable to perform zone transfer: {0}")]
    Transfer(#[source] TransportError),

    #[error("unable to perform update: {0}")]
    Update(#[from] UpdateError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl ZoneError {
    pub(crate) fn load<E>(zone: &Name, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ZoneError::Load {
            zone: zone.clone(),
            source: error.into(),
        }
    }
}

/// Why a dynamic-update apply failed.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The server processed the message and answered with a non-success
    /// status. The server may have applied part of the batch; callers
    /// must treat the zone state as unknown.
    #[error("server answered {0}")]
    Rejected(ResponseCode),

    /// A change's rdata could not be encoded into a wire value.
    #[error("could not encode record data: {0}")]
    Encode(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The message never got a usable answer.
    #[error(transparent)]
    Transport(TransportError),
}
