//! Resource record values exchanged with zone sources and targets

mod kind;
mod name;
mod record;
mod rset;
mod serial;
mod ttl;

pub use self::kind::RecordKind;
pub(crate) use self::name::{ascii_name, decoded_name};
pub use self::record::Rr;
pub(crate) use self::record::{naptr_text, quote_txt, rdata_from_text};
pub use self::rset::RecordSet;
pub use self::serial::SerialNumber;
pub use self::ttl::TimeToLive;

/// DNS Name with case preserved.
///
pub use hickory_proto::rr::Name;

/// DNS Name converted to the canonical lowercase form.
///
pub use hickory_proto::rr::LowerName;
