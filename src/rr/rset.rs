use hickory_proto::rr::Name;

use super::{Rr, RecordKind, TimeToLive};

/// One owner name and type with its full list of textual rdata values.
///
/// Changes and the zone-file writer work on whole record sets: an apply
/// replaces or removes every value for a name/type pair at once, and a
/// rendered zone file emits one line per value. Values keep the same
/// textual conventions as [`Rr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub name: Name,
    pub kind: RecordKind,
    pub ttl: TimeToLive,
    pub values: Vec<String>,
}

impl RecordSet {
    pub fn new(
        name: Name,
        kind: RecordKind,
        ttl: TimeToLive,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        RecordSet {
            name,
            kind,
            ttl,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// One [`Rr`] per value, sharing this set's name, kind, and TTL.
    pub fn records(&self) -> impl Iterator<Item = Rr> + '_ {
        self.values
            .iter()
            .map(|value| Rr::new(self.name.clone(), self.kind, self.ttl, value.clone()))
    }
}

impl FromIterator<Rr> for RecordSet {
    /// Collect records into a set, taking name, kind, and TTL from the
    /// first record. Callers are expected to group records beforehand;
    /// stray members contribute only their rdata.
    ///
    /// # Panics
    ///
    /// Panics when the iterator yields nothing: an empty set would have
    /// no name or type.
    fn from_iter<T: IntoIterator<Item = Rr>>(iter: T) -> Self {
        let mut records = iter.into_iter();
        let first = records.next().expect("record set cannot be empty");
        let mut set = RecordSet {
            name: first.name,
            kind: first.kind,
            ttl: first.ttl,
            values: vec![first.rdata],
        };
        set.values.extend(records.map(|rr| rr.rdata));
        set
    }
}
