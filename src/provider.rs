//! Capability traits for zone sources and targets
//!
//! The engine is split along what a backend can do rather than what it
//! is: reading current records, applying a planned diff, and listing the
//! zones a backend knows about are separate capabilities. A zone-file
//! directory implements all three; a transfer-only source implements
//! just [`ZoneSource`]; a dynamic-update target reads through transfers
//! and applies through update messages.

use crate::change::Change;
use crate::error::ZoneError;
use crate::rr::{Name, Rr};

/// Read access to the current records of a zone.
#[async_trait::async_trait]
pub trait ZoneSource: Send + Sync {
    /// Fetch the records for `zone`, filtered to the supported types.
    ///
    /// When `target` is set the caller intends to fully regenerate this
    /// zone; backends that rebuild state from scratch report an empty
    /// record list so every desired record shows up as a create.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot produce the zone
    /// contents (missing file, parse failure, failed transfer).
    async fn zone_records(&self, zone: &Name, target: bool) -> Result<Vec<Rr>, ZoneError>;

    /// Report whether the zone exists in this backend.
    ///
    /// Backends that regenerate zones from scratch deny existence in
    /// target mode so downstream planning treats the zone as brand new.
    async fn zone_exists(&self, zone: &Name, target: bool) -> Result<bool, ZoneError>;
}

/// Write access: apply a planned set of changes to a zone.
#[async_trait::async_trait]
pub trait ZoneTarget: Send + Sync {
    /// Apply `changes` to `zone`, in the order supplied.
    ///
    /// A failure leaves the backend in an unspecified state between "no
    /// changes applied" and "all changes applied"; callers own
    /// re-verification, no rollback is attempted here.
    async fn apply(&self, zone: &Name, changes: &[Change]) -> Result<(), ZoneError>;
}

/// Enumeration of the zones a backend knows about.
#[async_trait::async_trait]
pub trait ZoneList: Send + Sync {
    /// List zone names, absolute and dot-terminated.
    async fn list_zones(&self) -> Result<Vec<Name>, ZoneError>;
}
