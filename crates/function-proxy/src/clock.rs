//! Battery-backed realtime clock.
//!
//! Advertises the unix time as a plain decimal. The civil datetime string
//! is derived from the advertised time and the configured UTC offset, so it
//! stays readable without querying the device.

use driver_api::{raw, FunctionKind, RealtimeClockDriver};
use jiff::tz::{Offset, TimeZone};
use jiff::Timestamp;
use tracing::error;

use crate::core::{read_cached, write_cached, ProxyCore};
use crate::error::Error;
use crate::parse;
use crate::registry::FunctionProxy;
use crate::value::{driver_enum, i64_from_raw, AttrValue, INVALID_INT};

driver_enum! {
    /// Whether the clock has been set since its last power loss.
    TimeSet {
        False = 1 => "FALSE",
        True = 2 => "TRUE",
    }
}

#[derive(Debug)]
pub struct RealtimeClockProxy {
    core: ProxyCore<dyn RealtimeClockDriver>,
    unix_time: i64,
    date_time: String,
    utc_offset: i64,
    time_set: TimeSet,
}

impl FunctionProxy for RealtimeClockProxy {
    type Driver = dyn RealtimeClockDriver;

    fn new(instantiation_name: &str) -> Self {
        Self {
            core: ProxyCore::new(instantiation_name, FunctionKind::RealtimeClock),
            unix_time: INVALID_INT,
            date_time: String::new(),
            utc_offset: INVALID_INT,
            time_set: TimeSet::Invalid,
        }
    }

    fn core(&self) -> &ProxyCore<dyn RealtimeClockDriver> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProxyCore<dyn RealtimeClockDriver> {
        &mut self.core
    }

    fn arrival(&mut self) {
        self.reload_config();
        self.unix_time =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.unix_time()));
        self.date_time = format_datetime(self.unix_time, self.utc_offset);
        self.core.mark_arrived();
    }

    fn config_changed(&mut self) {
        self.reload_config();
        // a changed offset moves the civil time as well
        self.date_time = format_datetime(self.unix_time, self.utc_offset);
    }

    fn value_changed(&mut self, advertised: &str) {
        match parse::decimal_i64(advertised) {
            Ok(seconds) => {
                self.unix_time = seconds;
                self.date_time = format_datetime(seconds, self.utc_offset);
            }
            Err(err) => error!(
                function = %self.core.display_name(),
                "bad clock advertisement: {err}"
            ),
        }
    }
}

impl RealtimeClockProxy {
    fn reload_config(&mut self) {
        self.utc_offset =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.utc_offset()));
        self.time_set = TimeSet::from_raw(
            self.core.query_or(raw::INVALID_ORDINAL, |d| d.time_set()),
        );
    }

    pub fn read_unix_time(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.unix_time())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_unix_time(&mut self, seconds: i64) -> Result<(), Error> {
        if seconds.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_unix_time(seconds))??;
        Ok(())
    }

    pub fn read_utc_offset(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.utc_offset())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_utc_offset(&mut self, seconds: i64) -> Result<(), Error> {
        if seconds.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_utc_offset(seconds))??;
        Ok(())
    }

    pub fn read_time_set(&self) -> Result<TimeSet, Error> {
        let ordinal = self.core.with_driver(|d| d.time_set())??;
        Ok(TimeSet::from_raw(ordinal))
    }

    /// Last advertised unix time.
    #[must_use]
    pub fn unix_time(&self) -> i64 {
        read_cached(&self.core, &self.unix_time)
    }

    pub fn set_unix_time(&mut self, seconds: i64) -> Result<(), Error> {
        let before = self.unix_time;
        write_cached(&self.core, &mut self.unix_time, seconds, |d, seconds| {
            d.set_unix_time(*seconds)
        })?;
        if self.unix_time != before {
            self.date_time = format_datetime(self.unix_time, self.utc_offset);
        }
        Ok(())
    }

    /// Civil datetime `YYYY/MM/DD hh:mm:ss` in the configured offset.
    /// Derived, read-only; empty while time or offset are unknown.
    #[must_use]
    pub fn date_time(&self) -> String {
        read_cached(&self.core, &self.date_time)
    }

    /// Seconds east of UTC.
    #[must_use]
    pub fn utc_offset(&self) -> i64 {
        read_cached(&self.core, &self.utc_offset)
    }

    pub fn set_utc_offset(&mut self, seconds: i64) -> Result<(), Error> {
        let before = self.utc_offset;
        write_cached(&self.core, &mut self.utc_offset, seconds, |d, seconds| {
            d.set_utc_offset(*seconds)
        })?;
        if self.utc_offset != before {
            self.date_time = format_datetime(self.unix_time, self.utc_offset);
        }
        Ok(())
    }

    #[must_use]
    pub fn time_set(&self) -> TimeSet {
        read_cached(&self.core, &self.time_set)
    }
}

fn format_datetime(unix_time: i64, utc_offset: i64) -> String {
    if unix_time.is_invalid() || utc_offset.is_invalid() {
        return String::new();
    }
    let Ok(timestamp) = Timestamp::from_second(unix_time) else {
        return String::new();
    };
    let Ok(seconds) = i32::try_from(utc_offset) else {
        return String::new();
    };
    let Ok(offset) = Offset::from_seconds(seconds) else {
        return String::new();
    };
    let zoned = timestamp.to_zoned(TimeZone::fixed(offset));
    zoned.strftime("%Y/%m/%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::format_datetime;
    use crate::value::INVALID_INT;

    #[test]
    fn civil_time_follows_the_offset() {
        // 2024-05-06 07:08:09 UTC
        let unix = 1_714_979_289;
        assert_eq!(format_datetime(unix, 0), "2024/05/06 07:08:09");
        assert_eq!(format_datetime(unix, 7200), "2024/05/06 09:08:09");
        assert_eq!(format_datetime(unix, -3600), "2024/05/06 06:08:09");
    }

    #[test]
    fn unknown_parts_yield_the_empty_sentinel() {
        assert_eq!(format_datetime(INVALID_INT, 0), "");
        assert_eq!(format_datetime(1_714_979_289, INVALID_INT), "");
    }
}
