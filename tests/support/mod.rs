#![allow(unused)]

use std::sync::{Mutex, Once};

use hickory_proto::ProtoError;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::rdata::{MX, SOA, TXT};
use hickory_proto::rr::{Name, RData, Record};

use bindsync::{DnsTransport, TransportError};

/// Registers a global default tracing subscriber when called for the first time. This is intended
/// for use in tests.
pub fn subscribe() {
    static INSTALL_TRACING_SUBSCRIBER: Once = Once::new();
    INSTALL_TRACING_SUBSCRIBER.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();
    });
}

/// Scripted stand-in for a DNS server.
///
/// Zone transfers answer with a canned record list (or a scripted failure),
/// updates are captured for inspection and acknowledged with scripted
/// response codes, answering `NoError` once the script runs out.
pub struct MockTransport {
    answers: Vec<Record>,
    fail_transfer: bool,
    update_codes: Mutex<Vec<ResponseCode>>,
    pub transfers: Mutex<Vec<Name>>,
    pub updates: Mutex<Vec<Message>>,
}

impl MockTransport {
    pub fn serving(answers: Vec<Record>) -> Self {
        Self {
            answers,
            fail_transfer: false,
            update_codes: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_transfer: true,
            ..Self::serving(Vec::new())
        }
    }

    pub fn with_update_codes(mut self, codes: Vec<ResponseCode>) -> Self {
        self.update_codes = Mutex::new(codes);
        self
    }
}

#[async_trait::async_trait]
impl DnsTransport for MockTransport {
    async fn zone_transfer(&self, zone: &Name) -> Result<Vec<Record>, TransportError> {
        self.transfers.lock().expect("poisoned").push(zone.clone());
        if self.fail_transfer {
            return Err(TransportError::Protocol(ProtoError::from(
                "scripted transfer failure",
            )));
        }
        Ok(self.answers.clone())
    }

    async fn submit_update(&self, update: Message) -> Result<ResponseCode, TransportError> {
        let mut codes = self.update_codes.lock().expect("poisoned");
        let code = if codes.is_empty() {
            ResponseCode::NoError
        } else {
            codes.remove(0)
        };
        self.updates.lock().expect("poisoned").push(update);
        Ok(code)
    }
}

pub fn soa(zone: &str) -> Record {
    let origin = Name::from_utf8(zone).unwrap();
    let mname = Name::from_utf8(format!("ns1.{zone}")).unwrap();
    let rname = Name::from_utf8(format!("webmaster.{zone}")).unwrap();
    Record::from_rdata(
        origin,
        3600,
        RData::SOA(SOA::new(mname, rname, 2024010101, 3600, 600, 604800, 3600)),
    )
}

pub fn a(name: &str, ttl: u32, address: &str) -> Record {
    let ip: std::net::Ipv4Addr = address.parse().unwrap();
    Record::from_rdata(Name::from_utf8(name).unwrap(), ttl, RData::A(ip.into()))
}

pub fn aaaa(name: &str, ttl: u32, address: &str) -> Record {
    let ip: std::net::Ipv6Addr = address.parse().unwrap();
    Record::from_rdata(Name::from_utf8(name).unwrap(), ttl, RData::AAAA(ip.into()))
}

pub fn txt(name: &str, ttl: u32, value: &str) -> Record {
    Record::from_rdata(
        Name::from_utf8(name).unwrap(),
        ttl,
        RData::TXT(TXT::new(vec![value.to_owned()])),
    )
}

pub fn mx(name: &str, ttl: u32, preference: u16, exchange: &str) -> Record {
    Record::from_rdata(
        Name::from_utf8(name).unwrap(),
        ttl,
        RData::MX(MX::new(preference, Name::from_utf8(exchange).unwrap())),
    )
}
