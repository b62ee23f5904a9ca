//! One trait per function kind, mirroring the driver library's generated
//! accessor surface. Conventions:
//!
//! - getters return the raw sentinels from [`crate::raw`] when the value is
//!   not (yet) known, never an error for "unknown"
//! - enum attributes cross as raw `i16` ordinals, -1 invalid and valid
//!   values 0-based
//! - durations are milliseconds, as the firmware counts them

use crate::{DriverError, FunctionDriver};

pub trait BuzzerDriver: FunctionDriver {
    fn frequency(&self) -> Result<f64, DriverError>;
    fn set_frequency(&mut self, hz: f64) -> Result<(), DriverError>;
    /// 0..=100.
    fn volume(&self) -> Result<i64, DriverError>;
    fn set_volume(&mut self, percent: i64) -> Result<(), DriverError>;
    /// Largest sequence the device can buffer. Fixed per firmware.
    fn play_seq_max_size(&self) -> Result<i64, DriverError>;
    fn pulse(&mut self, hz: f64, duration_ms: i64) -> Result<(), DriverError>;
    fn frequency_move(
        &mut self,
        hz: f64,
        duration_ms: i64,
    ) -> Result<(), DriverError>;
}

pub trait ColorLedDriver: FunctionDriver {
    /// Packed `0xRRGGBB`.
    fn rgb(&self) -> Result<i64, DriverError>;
    fn set_rgb(&mut self, rgb: i64) -> Result<(), DriverError>;
    /// 0..=100.
    fn luminosity(&self) -> Result<i64, DriverError>;
    fn set_luminosity(&mut self, percent: i64) -> Result<(), DriverError>;
    fn blinking(&self) -> Result<i16, DriverError>;
    fn set_blinking(&mut self, ordinal: i16) -> Result<(), DriverError>;
    fn rgb_move(
        &mut self,
        rgb: i64,
        duration_ms: i64,
    ) -> Result<(), DriverError>;
}

pub trait ServoDriver: FunctionDriver {
    /// -1000..=1000, 0 at neutral.
    fn position(&self) -> Result<i64, DriverError>;
    fn set_position(&mut self, target: i64) -> Result<(), DriverError>;
    /// Percent of the full pulse range the servo may use.
    fn range(&self) -> Result<i64, DriverError>;
    fn set_range(&mut self, percent: i64) -> Result<(), DriverError>;
    /// Pulse width at rest, microseconds.
    fn neutral(&self) -> Result<i64, DriverError>;
    fn set_neutral(&mut self, us: i64) -> Result<(), DriverError>;
    fn enabled(&self) -> Result<i16, DriverError>;
    fn set_enabled(&mut self, ordinal: i16) -> Result<(), DriverError>;
    fn move_to(
        &mut self,
        target: i64,
        duration_ms: i64,
    ) -> Result<(), DriverError>;
}

pub trait PowerSupplyDriver: FunctionDriver {
    fn voltage_setpoint(&self) -> Result<f64, DriverError>;
    fn set_voltage_setpoint(&mut self, volts: f64) -> Result<(), DriverError>;
    fn current_limit(&self) -> Result<f64, DriverError>;
    fn set_current_limit(&mut self, amps: f64) -> Result<(), DriverError>;
    fn power_output(&self) -> Result<i16, DriverError>;
    fn set_power_output(&mut self, ordinal: i16) -> Result<(), DriverError>;
    /// Voltage actually measured at the output terminals.
    fn measured_voltage(&self) -> Result<f64, DriverError>;
    fn voltage_move(
        &mut self,
        volts: f64,
        duration_ms: i64,
    ) -> Result<(), DriverError>;
}

pub trait SensorDriver: FunctionDriver {
    fn current_value(&self) -> Result<f64, DriverError>;
    fn unit(&self) -> Result<String, DriverError>;
    fn resolution(&self) -> Result<f64, DriverError>;
    fn set_resolution(&mut self, resolution: f64) -> Result<(), DriverError>;
    /// Extremes since power on or the last reset.
    fn lowest_value(&self) -> Result<f64, DriverError>;
    fn highest_value(&self) -> Result<f64, DriverError>;
    fn reset_min_max(&mut self) -> Result<(), DriverError>;
}

pub trait RealtimeClockDriver: FunctionDriver {
    fn unix_time(&self) -> Result<i64, DriverError>;
    fn set_unix_time(&mut self, seconds: i64) -> Result<(), DriverError>;
    /// Seconds east of UTC.
    fn utc_offset(&self) -> Result<i64, DriverError>;
    fn set_utc_offset(&mut self, seconds: i64) -> Result<(), DriverError>;
    fn time_set(&self) -> Result<i16, DriverError>;
}

pub trait WirelessDriver: FunctionDriver {
    /// 0..=100, 0 when not associated.
    fn link_quality(&self) -> Result<i64, DriverError>;
    fn ssid(&self) -> Result<String, DriverError>;
    fn channel(&self) -> Result<i64, DriverError>;
    fn set_channel(&mut self, channel: i64) -> Result<(), DriverError>;
    fn security(&self) -> Result<i16, DriverError>;
    fn set_security(&mut self, ordinal: i16) -> Result<(), DriverError>;
}
