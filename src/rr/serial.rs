use std::fmt;

use chrono::Utc;

/// Largest value representable in the signed 32-bit range of a SOA serial.
///
/// Serials derived from timestamps are reduced modulo this value so they
/// stay within the field and wrap predictably when the epoch clock passes
/// the boundary.
const SERIAL_MODULUS: i64 = 2_147_483_647;

/// SOA serial number derived from wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialNumber(u32);

impl SerialNumber {
    /// Serial for the current moment: Unix epoch seconds modulo 2^31 - 1.
    pub fn now() -> Self {
        Self::from_epoch(Utc::now().timestamp())
    }

    /// Reduce an epoch timestamp into the serial field.
    pub fn from_epoch(timestamp: i64) -> Self {
        SerialNumber(timestamp.rem_euclid(SERIAL_MODULUS) as u32)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for SerialNumber {
    fn from(value: u32) -> Self {
        SerialNumber(value)
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_passes_small_timestamps_through() {
        assert_eq!(SerialNumber::from_epoch(0).get(), 0);
        assert_eq!(SerialNumber::from_epoch(42).get(), 42);
        assert_eq!(SerialNumber::from_epoch(1_694_231_210).get(), 1_694_231_210);
    }

    #[test]
    fn serial_wraps_at_the_signed_boundary() {
        assert_eq!(SerialNumber::from_epoch(2_147_483_646).get(), 2_147_483_646);
        assert_eq!(SerialNumber::from_epoch(2_147_483_647).get(), 0);
        assert_eq!(SerialNumber::from_epoch(2_147_483_648).get(), 1);
        assert_eq!(SerialNumber::from_epoch(2_147_483_649).get(), 2);
    }

    #[test]
    fn serial_now_fits_the_field() {
        assert!(SerialNumber::now().get() < SERIAL_MODULUS as u32);
    }
}
