pub mod change;
pub mod error;
pub mod file;
pub mod provider;
pub mod rfc2136;
pub mod rr;
pub mod transport;
pub mod xfr;

pub use self::change::Change;
pub use self::error::{UpdateError, ZoneError};
pub use self::file::{FileConfig, ZoneFileProvider};
pub use self::provider::{ZoneList, ZoneSource, ZoneTarget};
pub use self::rfc2136::Rfc2136Provider;
pub use self::transport::{DnsTransport, Transport, TransportError, TsigKey};
pub use self::xfr::{TransferConfig, XfrSource};
