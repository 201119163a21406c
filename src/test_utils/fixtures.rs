//! Fixed test data.

use chrono::{DateTime, TimeZone, Utc};

/// Serial used by most single-inverter tests.
pub fn test_serial() -> String {
    "INV001".to_string()
}

/// First reading time.
pub fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Second reading time, after [`t1`].
pub fn t2() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 5, 0).unwrap()
}

/// Reading time never written by any fixture.
pub fn t3() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
}
