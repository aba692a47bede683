//! Module containing functionality related to BSON DateTimes.

use std::{
    fmt::{self, Display},
    time::{Duration, SystemTime},
};

use time::format_description::well_known::Rfc3339;

use crate::error::{Error, Result};

/// Struct representing a BSON datetime: a signed count of non-leap
/// milliseconds since January 1, 1970 0:00:00 UTC.
///
/// Note: BSON datetimes have millisecond precision.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Default)]
pub struct DateTime(i64);

impl DateTime {
    /// The latest possible date that can be represented in BSON.
    pub const MAX: Self = Self::from_millis(i64::MAX);

    /// The earliest possible date that can be represented in BSON.
    pub const MIN: Self = Self::from_millis(i64::MIN);

    /// The conventional "zero" datetime, 0001-01-01T00:00:00Z. Writers that
    /// need to encode an unset datetime emit this value, so it is worth
    /// comparing against after a decode.
    pub const ZERO: Self = Self::from_millis(-62_135_596_800_000);

    /// Makes a new [`DateTime`] from the number of non-leap milliseconds since
    /// January 1, 1970 0:00:00 UTC (aka "UNIX timestamp").
    pub const fn from_millis(date: i64) -> Self {
        Self(date)
    }

    /// Returns the number of non-leap milliseconds since January 1, 1970 UTC.
    pub const fn timestamp_millis(self) -> i64 {
        self.0
    }

    /// Convert the given [`time::OffsetDateTime`] into a [`DateTime`],
    /// truncating it to millisecond precision.
    ///
    /// If the provided time is too far in the future or too far in the past to
    /// be represented by a BSON datetime, either [`DateTime::MAX`] or
    /// [`DateTime::MIN`] will be returned, whichever is closer.
    pub fn from_time(dt: time::OffsetDateTime) -> Self {
        let millis = dt.unix_timestamp_nanos() / 1_000_000;
        match millis.try_into() {
            Ok(ts) => Self::from_millis(ts),
            _ => {
                if millis > 0 {
                    Self::MAX
                } else {
                    Self::MIN
                }
            }
        }
    }

    /// Convert this [`DateTime`] to a [`time::OffsetDateTime`].
    ///
    /// Note: Not every BSON datetime can be represented as a
    /// [`time::OffsetDateTime`]. For such dates, [`time::PrimitiveDateTime::MIN`]
    /// or [`time::PrimitiveDateTime::MAX`] will be returned, whichever is
    /// closer.
    pub fn to_time(self) -> time::OffsetDateTime {
        match self.to_time_opt() {
            Some(dt) => dt,
            None => if self.0 < 0 {
                time::PrimitiveDateTime::MIN
            } else {
                time::PrimitiveDateTime::MAX
            }
            .assume_utc(),
        }
    }

    pub(crate) fn to_time_opt(self) -> Option<time::OffsetDateTime> {
        time::OffsetDateTime::UNIX_EPOCH.checked_add(time::Duration::milliseconds(self.0))
    }

    /// Convert the given [`std::time::SystemTime`] to a [`DateTime`].
    ///
    /// If the provided time is out of range for a BSON datetime, either
    /// [`DateTime::MAX`] or [`DateTime::MIN`] will be returned, whichever is
    /// closer.
    pub fn from_system_time(st: SystemTime) -> Self {
        match st.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(duration) => {
                if duration.as_millis() <= i64::MAX as u128 {
                    Self::from_millis(duration.as_millis() as i64)
                } else {
                    Self::MAX
                }
            }
            // handle SystemTime from before the Unix Epoch
            Err(e) => {
                let millis = e.duration().as_millis();
                if millis > i64::MAX as u128 {
                    Self::MIN
                } else {
                    Self::from_millis(-(millis as i64))
                }
            }
        }
    }

    /// Convert this [`DateTime`] to a [`std::time::SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        if self.0 >= 0 {
            SystemTime::UNIX_EPOCH + Duration::from_millis(self.0 as u64)
        } else {
            // need to convert to i128 before calculating absolute value since
            // i64::MIN.abs() overflows and panics.
            SystemTime::UNIX_EPOCH - Duration::from_millis((self.0 as i128).unsigned_abs() as u64)
        }
    }

    /// Convert this [`DateTime`] to an RFC 3339 formatted string.
    pub fn try_to_rfc3339_string(self) -> Result<String> {
        self.to_time()
            .format(&Rfc3339)
            .map_err(|e| Error::invalid_value(format!("cannot format DateTime as RFC 3339: {}", e)))
    }

    /// Convert the given RFC 3339 formatted string to a [`DateTime`],
    /// truncating it to millisecond precision.
    pub fn parse_rfc3339_str(s: impl AsRef<str>) -> Result<Self> {
        let odt = time::OffsetDateTime::parse(s.as_ref(), &Rfc3339)
            .map_err(|e| Error::invalid_value(format!("cannot parse RFC 3339 datetime: {}", e)))?;
        Ok(Self::from_time(odt))
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut tup = f.debug_tuple("DateTime");
        match self.to_time_opt() {
            Some(dt) => tup.field(&format!("{}", dt)),
            _ => tup.field(&self.0),
        };
        tup.finish()
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_time_opt() {
            Some(dt) => write!(f, "{}", dt),
            _ => write!(f, "DateTime({})", self.0),
        }
    }
}

impl From<SystemTime> for DateTime {
    fn from(st: SystemTime) -> Self {
        Self::from_system_time(st)
    }
}

impl From<DateTime> for SystemTime {
    fn from(dt: DateTime) -> Self {
        dt.to_system_time()
    }
}

#[cfg(test)]
mod test {
    use super::DateTime;

    #[test]
    fn zero_is_year_one() {
        let odt = DateTime::ZERO.to_time();
        assert_eq!(odt.year(), 1);
        assert_eq!(odt.unix_timestamp(), -62_135_596_800);
    }

    #[test]
    fn rfc3339_round_trip() {
        let dt = DateTime::from_millis(1_609_459_200_123);
        let s = dt.try_to_rfc3339_string().unwrap();
        assert_eq!(DateTime::parse_rfc3339_str(&s).unwrap(), dt);
    }
}
