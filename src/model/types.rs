use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Classification of how a sample was obtained.
///
/// The numeric codes are stable and are what the SQLite store persists in
/// the `sample_type` column.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum SampleType {
    /// Ad hoc samples, externally controlled
    AdHoc,
    /// High(ish) frequency samples recorded by the inverter
    InverterFast,
    /// Daily samples recorded by the inverter
    InverterDaily,
}

impl SampleType {
    /// Every known sample type, in code order.
    pub const ALL: [SampleType; 3] = [
        SampleType::AdHoc,
        SampleType::InverterFast,
        SampleType::InverterDaily,
    ];

    /// Stable numeric code for this sample type.
    pub fn code(self) -> i64 {
        match self {
            SampleType::AdHoc => 0,
            SampleType::InverterFast => 1,
            SampleType::InverterDaily => 2,
        }
    }
}

impl TryFrom<i64> for SampleType {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        SampleType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| Error::UnknownSampleType(code.to_string()))
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SampleType::AdHoc => write!(f, "adhoc"),
            SampleType::InverterFast => write!(f, "inverter_fast"),
            SampleType::InverterDaily => write!(f, "inverter_daily"),
        }
    }
}

impl FromStr for SampleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SampleType::ALL
            .into_iter()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| Error::UnknownSampleType(s.to_string()))
    }
}
