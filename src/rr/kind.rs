use std::fmt;

use hickory_proto::rr::RecordType;

/// Record types handled by this crate.
///
/// This is the declared capability of every source and target: records of
/// any other type encountered in a zone file or a transfer are silently
/// dropped rather than surfaced as errors. The variants are declared in
/// the canonical (alphabetical) order so the derived `Ord` matches the
/// ordering used when rendering zone files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    A,
    Aaaa,
    Caa,
    Cname,
    Ds,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Srv,
    Sshfp,
    Tlsa,
    Txt,
}

impl RecordKind {
    /// Every supported kind, in canonical order.
    pub const ALL: [RecordKind; 13] = [
        RecordKind::A,
        RecordKind::Aaaa,
        RecordKind::Caa,
        RecordKind::Cname,
        RecordKind::Ds,
        RecordKind::Mx,
        RecordKind::Naptr,
        RecordKind::Ns,
        RecordKind::Ptr,
        RecordKind::Srv,
        RecordKind::Sshfp,
        RecordKind::Tlsa,
        RecordKind::Txt,
    ];

    /// Map a wire record type into the supported set.
    ///
    /// Returns `None` for unsupported types, which callers treat as
    /// "drop this record".
    pub fn from_record_type(rtype: RecordType) -> Option<Self> {
        match rtype {
            RecordType::A => Some(RecordKind::A),
            RecordType::AAAA => Some(RecordKind::Aaaa),
            RecordType::CAA => Some(RecordKind::Caa),
            RecordType::CNAME => Some(RecordKind::Cname),
            RecordType::DS => Some(RecordKind::Ds),
            RecordType::MX => Some(RecordKind::Mx),
            RecordType::NAPTR => Some(RecordKind::Naptr),
            RecordType::NS => Some(RecordKind::Ns),
            RecordType::PTR => Some(RecordKind::Ptr),
            RecordType::SRV => Some(RecordKind::Srv),
            RecordType::SSHFP => Some(RecordKind::Sshfp),
            RecordType::TLSA => Some(RecordKind::Tlsa),
            RecordType::TXT => Some(RecordKind::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::Aaaa => "AAAA",
            RecordKind::Caa => "CAA",
            RecordKind::Cname => "CNAME",
            RecordKind::Ds => "DS",
            RecordKind::Mx => "MX",
            RecordKind::Naptr => "NAPTR",
            RecordKind::Ns => "NS",
            RecordKind::Ptr => "PTR",
            RecordKind::Srv => "SRV",
            RecordKind::Sshfp => "SSHFP",
            RecordKind::Tlsa => "TLSA",
            RecordKind::Txt => "TXT",
        }
    }
}

impl From<RecordKind> for RecordType {
    fn from(kind: RecordKind) -> Self {
        match kind {
            RecordKind::A => RecordType::A,
            RecordKind::Aaaa => RecordType::AAAA,
            RecordKind::Caa => RecordType::CAA,
            RecordKind::Cname => RecordType::CNAME,
            RecordKind::Ds => RecordType::DS,
            RecordKind::Mx => RecordType::MX,
            RecordKind::Naptr => RecordType::NAPTR,
            RecordKind::Ns => RecordType::NS,
            RecordKind::Ptr => RecordType::PTR,
            RecordKind::Srv => RecordType::SRV,
            RecordKind::Sshfp => RecordType::SSHFP,
            RecordKind::Tlsa => RecordType::TLSA,
            RecordKind::Txt => RecordType::TXT,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
