//! Dynamic updates (RFC 2136) as a zone target
//!
//! Changes are translated into UPDATE messages: creates become adds,
//! updates replace the whole record set, deletes remove specific
//! values. Reads go through a zone transfer against the same server, so
//! plans diff against what the server currently serves.

use std::sync::Arc;

use hickory_proto::op::update_message::UpdateMessage;
use hickory_proto::op::{Message, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, RData, Record, RecordType};

use crate::change::Change;
use crate::error::{UpdateError, ZoneError};
use crate::provider::{ZoneSource, ZoneTarget};
use crate::rr::{Name, RecordSet, Rr, rdata_from_text};
use crate::transport::DnsTransport;
use crate::xfr::{TransferConfig, XfrSource};

/// Zone target speaking dynamic updates.
///
/// Zones cannot be created this way. The server must already be
/// authoritative for every zone applied here; a missing zone shows up
/// as a rejected update rather than a distinct error.
pub struct Rfc2136Provider {
    xfr: XfrSource,
    batch_size: usize,
}

impl Rfc2136Provider {
    /// Connect to the server described by `config`.
    ///
    /// # Errors
    ///
    /// Fails when the host does not resolve in the requested address
    /// family or the TSIG key cannot be used.
    pub async fn new(config: &TransferConfig) -> Result<Self, ZoneError> {
        let transport: Arc<dyn DnsTransport> = Arc::new(config.transport().await?);
        Ok(Self::with_transport(transport, config.update_batch_size))
    }

    /// Provider over an existing transport.
    pub fn with_transport(transport: Arc<dyn DnsTransport>, batch_size: usize) -> Self {
        Self {
            xfr: XfrSource::with_transport(transport),
            batch_size,
        }
    }
}

#[async_trait::async_trait]
impl ZoneSource for Rfc2136Provider {
    async fn zone_records(&self, zone: &Name, target: bool) -> Result<Vec<Rr>, ZoneError> {
        self.xfr.zone_records(zone, target).await
    }

    async fn zone_exists(&self, zone: &Name, target: bool) -> Result<bool, ZoneError> {
        self.xfr.zone_exists(zone, target).await
    }
}

#[async_trait::async_trait]
impl ZoneTarget for Rfc2136Provider {
    async fn apply(&self, zone: &Name, changes: &[Change]) -> Result<(), ZoneError> {
        let batch_size = self.batch_size.max(1);
        for batch in changes.chunks(batch_size) {
            let update = update_message(zone, batch)?;
            tracing::debug!(%zone, changes = batch.len(), "submitting update batch");
            let code = self
                .xfr
                .transport()
                .submit_update(update)
                .await
                .map_err(UpdateError::Transport)?;
            if code != ResponseCode::NoError {
                return Err(UpdateError::Rejected(code).into());
            }
        }
        tracing::debug!(%zone, total_changes = changes.len(), "update complete");
        Ok(())
    }
}

/// One UPDATE message covering `changes`.
///
/// The zone section names the zone with an SOA query, as the protocol
/// requires. Creates add records in class IN. Updates first delete the
/// whole record set (class ANY, empty rdata, TTL 0) and then add the
/// desired values. Deletes remove specific values in class NONE with
/// TTL 0.
fn update_message(zone: &Name, changes: &[Change]) -> Result<Message, ZoneError> {
    let mut message = Message::new();
    message.set_op_code(OpCode::Update);
    message.add_zone(Query::query(zone.clone(), RecordType::SOA));

    for change in changes {
        match change {
            Change::Create(set) => {
                add_record_set(&mut message, zone, set)?;
            }
            Change::Update { desired, .. } => {
                let mut clear = Record::from_rdata(
                    desired.name.clone(),
                    0,
                    RData::Update0(desired.kind.into()),
                );
                clear.set_dns_class(DNSClass::ANY);
                message.add_update(clear);
                add_record_set(&mut message, zone, desired)?;
            }
            Change::Delete(set) => {
                for rr in set.records() {
                    let rdata = encode_rdata(zone, &rr)?;
                    let mut record = Record::from_rdata(rr.name, 0, rdata);
                    record.set_dns_class(DNSClass::NONE);
                    message.add_update(record);
                }
            }
        }
    }

    Ok(message)
}

fn add_record_set(message: &mut Message, zone: &Name, set: &RecordSet) -> Result<(), ZoneError> {
    for rr in set.records() {
        let rdata = encode_rdata(zone, &rr)?;
        message.add_update(Record::from_rdata(rr.name, rr.ttl.into(), rdata));
    }
    Ok(())
}

fn encode_rdata(zone: &Name, rr: &Rr) -> Result<RData, ZoneError> {
    let rdata = rdata_from_text(zone, &rr.name, rr.kind, rr.ttl, &rr.rdata)
        .map_err(UpdateError::Encode)?;
    Ok(rdata)
}
