use std::sync::Arc;

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{DNSClass, RecordType};

use bindsync::rr::{Name, RecordKind, RecordSet, TimeToLive};
use bindsync::{Change, Rfc2136Provider, UpdateError, ZoneError, ZoneSource, ZoneTarget};

mod support;
use support::{MockTransport, subscribe};

fn zone() -> Name {
    Name::from_utf8("unit.tests.").unwrap()
}

fn a_set(owner: &str, values: &[&str]) -> RecordSet {
    RecordSet::new(
        Name::from_utf8(owner).unwrap(),
        RecordKind::A,
        TimeToLive::from_secs(300),
        values.iter().copied(),
    )
}

#[tokio::test]
async fn applies_changes_as_update_messages() {
    subscribe();
    let transport = Arc::new(MockTransport::serving(Vec::new()));
    let target = Rfc2136Provider::with_transport(transport.clone(), 1000);

    let changes = vec![
        Change::Create(a_set("www.unit.tests.", &["1.2.3.4"])),
        Change::Delete(a_set("old.unit.tests.", &["5.6.7.8"])),
    ];
    target.apply(&zone(), &changes).await.unwrap();

    let updates = transport.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);

    let message = &updates[0];
    assert_eq!(message.queries().len(), 1);
    assert_eq!(message.queries()[0].name(), &zone());
    assert_eq!(message.queries()[0].query_type(), RecordType::SOA);

    let records = message.name_servers();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].dns_class(), DNSClass::IN);
    assert_eq!(records[0].ttl(), 300);
    assert_eq!(records[1].dns_class(), DNSClass::NONE);
    assert_eq!(records[1].ttl(), 0);
}

#[tokio::test]
async fn changes_keep_their_caller_order() {
    subscribe();
    let transport = Arc::new(MockTransport::serving(Vec::new()));
    let target = Rfc2136Provider::with_transport(transport.clone(), 1000);

    let changes = vec![
        Change::Delete(a_set("old.unit.tests.", &["5.6.7.8"])),
        Change::Create(a_set("www.unit.tests.", &["1.2.3.4"])),
    ];
    target.apply(&zone(), &changes).await.unwrap();

    let updates = transport.updates.lock().unwrap();
    let records = updates[0].name_servers();
    assert_eq!(records[0].dns_class(), DNSClass::NONE);
    assert_eq!(records[1].dns_class(), DNSClass::IN);
}

#[tokio::test]
async fn large_plans_split_into_batches() {
    subscribe();
    let transport = Arc::new(MockTransport::serving(Vec::new()));
    let target = Rfc2136Provider::with_transport(transport.clone(), 2);

    let changes: Vec<Change> = (0..5)
        .map(|i| Change::Create(a_set(&format!("host{i}.unit.tests."), &["10.0.0.1"])))
        .collect();
    target.apply(&zone(), &changes).await.unwrap();

    let updates = transport.updates.lock().unwrap();
    let sizes: Vec<usize> = updates.iter().map(|m| m.name_servers().len()).collect();
    assert_eq!(sizes, vec![2, 2, 1]);

    // Every batch names the zone it belongs to.
    assert!(updates.iter().all(|m| m.queries()[0].name() == &zone()));
}

#[tokio::test]
async fn rejected_batches_stop_the_apply() {
    subscribe();
    let transport = Arc::new(
        MockTransport::serving(Vec::new())
            .with_update_codes(vec![ResponseCode::NoError, ResponseCode::Refused]),
    );
    let target = Rfc2136Provider::with_transport(transport.clone(), 1);

    let changes: Vec<Change> = (0..3)
        .map(|i| Change::Create(a_set(&format!("host{i}.unit.tests."), &["10.0.0.1"])))
        .collect();
    let error = target.apply(&zone(), &changes).await.unwrap_err();

    assert!(
        matches!(
            error,
            ZoneError::Update(UpdateError::Rejected(ResponseCode::Refused))
        ),
        "{error:?}"
    );
    assert_eq!(transport.updates.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_plans_send_nothing() {
    subscribe();
    let transport = Arc::new(MockTransport::serving(Vec::new()));
    let target = Rfc2136Provider::with_transport(transport.clone(), 1000);

    target.apply(&zone(), &[]).await.unwrap();
    assert!(transport.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn reads_come_from_zone_transfers() {
    subscribe();
    let transport = Arc::new(MockTransport::serving(vec![
        support::soa("unit.tests."),
        support::a("www.unit.tests.", 300, "1.2.3.4"),
    ]));
    let provider = Rfc2136Provider::with_transport(transport.clone(), 1000);

    let records = provider.zone_records(&zone(), false).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, RecordKind::A);
    assert!(provider.zone_exists(&zone(), false).await.unwrap());
    assert_eq!(transport.transfers.lock().unwrap().len(), 1);
}
