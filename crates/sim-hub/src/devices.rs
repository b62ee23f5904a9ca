//! Simulated function objects. Each implements the matching driver trait
//! with plain fields for state, a write counter and a failure switch so
//! tests can observe exactly what the proxy layer forwarded.

use driver_api::{raw, DriverError, FunctionKind};
use rand::Rng;

/// Bookkeeping shared by every simulated function.
#[derive(Debug)]
pub struct SimBase {
    pub serial: String,
    pub function_id: String,
    pub logical_name: String,
    pub online: bool,
    /// Driver writes (sets and actions) that reached this device.
    pub writes: usize,
    /// When set, the next writes are rejected instead of applied.
    pub fail_writes: bool,
}

impl SimBase {
    fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            serial: serial.to_owned(),
            function_id: function_id.to_owned(),
            logical_name: logical_name.to_owned(),
            online: true,
            writes: 0,
            fail_writes: false,
        }
    }

    #[must_use]
    pub fn hardware_id(&self) -> String {
        format!("{}.{}", self.serial, self.function_id)
    }

    fn write(&mut self) -> Result<(), DriverError> {
        if !self.online {
            return Err(DriverError::Unreachable);
        }
        if self.fail_writes {
            return Err(DriverError::Rejected("simulated fault".to_owned()));
        }
        self.writes += 1;
        Ok(())
    }
}

macro_rules! impl_function_driver {
    ($device:ident, $kind:ident) => {
        impl driver_api::FunctionDriver for $device {
            fn hardware_id(&self) -> String {
                self.base.hardware_id()
            }

            fn logical_name(&self) -> String {
                self.base.logical_name.clone()
            }

            fn is_online(&self) -> bool {
                self.base.online
            }

            fn kind(&self) -> FunctionKind {
                FunctionKind::$kind
            }
        }
    };
}

#[derive(Debug)]
pub struct SimBuzzer {
    pub base: SimBase,
    pub frequency: f64,
    pub volume: i64,
    pub play_seq_max_size: i64,
}

impl SimBuzzer {
    pub(crate) fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            base: SimBase::new(serial, function_id, logical_name),
            frequency: 0.0,
            volume: 50,
            play_seq_max_size: 52,
        }
    }
}

impl_function_driver!(SimBuzzer, Buzzer);

impl driver_api::BuzzerDriver for SimBuzzer {
    fn frequency(&self) -> Result<f64, DriverError> {
        Ok(self.frequency)
    }

    fn set_frequency(&mut self, hz: f64) -> Result<(), DriverError> {
        self.base.write()?;
        self.frequency = hz;
        Ok(())
    }

    fn volume(&self) -> Result<i64, DriverError> {
        Ok(self.volume)
    }

    fn set_volume(&mut self, percent: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.volume = percent;
        Ok(())
    }

    fn play_seq_max_size(&self) -> Result<i64, DriverError> {
        Ok(self.play_seq_max_size)
    }

    fn pulse(&mut self, _hz: f64, _duration_ms: i64) -> Result<(), DriverError> {
        self.base.write()
    }

    fn frequency_move(
        &mut self,
        hz: f64,
        _duration_ms: i64,
    ) -> Result<(), DriverError> {
        self.base.write()?;
        self.frequency = hz;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimColorLed {
    pub base: SimBase,
    pub rgb: i64,
    pub luminosity: i64,
    /// Raw driver ordinal: -1 unknown, 0-based valid.
    pub blinking: i16,
}

impl SimColorLed {
    pub(crate) fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            base: SimBase::new(serial, function_id, logical_name),
            rgb: 0x000000,
            luminosity: 100,
            blinking: 0,
        }
    }
}

impl_function_driver!(SimColorLed, ColorLed);

impl driver_api::ColorLedDriver for SimColorLed {
    fn rgb(&self) -> Result<i64, DriverError> {
        Ok(self.rgb)
    }

    fn set_rgb(&mut self, rgb: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.rgb = rgb;
        Ok(())
    }

    fn luminosity(&self) -> Result<i64, DriverError> {
        Ok(self.luminosity)
    }

    fn set_luminosity(&mut self, percent: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.luminosity = percent;
        Ok(())
    }

    fn blinking(&self) -> Result<i16, DriverError> {
        Ok(self.blinking)
    }

    fn set_blinking(&mut self, ordinal: i16) -> Result<(), DriverError> {
        self.base.write()?;
        self.blinking = ordinal;
        Ok(())
    }

    fn rgb_move(&mut self, rgb: i64, _duration_ms: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.rgb = rgb;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimServo {
    pub base: SimBase,
    pub position: i64,
    pub range: i64,
    pub neutral: i64,
    /// Raw driver ordinal: -1 unknown, 0 false, 1 true.
    pub enabled: i16,
}

impl SimServo {
    pub(crate) fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            base: SimBase::new(serial, function_id, logical_name),
            position: 0,
            range: 100,
            neutral: 1500,
            enabled: 0,
        }
    }
}

impl_function_driver!(SimServo, Servo);

impl driver_api::ServoDriver for SimServo {
    fn position(&self) -> Result<i64, DriverError> {
        Ok(self.position)
    }

    fn set_position(&mut self, target: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.position = target;
        Ok(())
    }

    fn range(&self) -> Result<i64, DriverError> {
        Ok(self.range)
    }

    fn set_range(&mut self, percent: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.range = percent;
        Ok(())
    }

    fn neutral(&self) -> Result<i64, DriverError> {
        Ok(self.neutral)
    }

    fn set_neutral(&mut self, us: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.neutral = us;
        Ok(())
    }

    fn enabled(&self) -> Result<i16, DriverError> {
        Ok(self.enabled)
    }

    fn set_enabled(&mut self, ordinal: i16) -> Result<(), DriverError> {
        self.base.write()?;
        self.enabled = ordinal;
        Ok(())
    }

    fn move_to(&mut self, target: i64, _duration_ms: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.position = target;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimPowerSupply {
    pub base: SimBase,
    pub voltage_setpoint: f64,
    pub current_limit: f64,
    /// Raw driver ordinal: -1 unknown, 0 off, 1 on.
    pub power_output: i16,
    pub measured_voltage: f64,
}

impl SimPowerSupply {
    pub(crate) fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            base: SimBase::new(serial, function_id, logical_name),
            voltage_setpoint: 0.0,
            current_limit: 1.0,
            power_output: 0,
            measured_voltage: 0.0,
        }
    }
}

impl_function_driver!(SimPowerSupply, PowerSupply);

impl driver_api::PowerSupplyDriver for SimPowerSupply {
    fn voltage_setpoint(&self) -> Result<f64, DriverError> {
        Ok(self.voltage_setpoint)
    }

    fn set_voltage_setpoint(&mut self, volts: f64) -> Result<(), DriverError> {
        self.base.write()?;
        self.voltage_setpoint = volts;
        Ok(())
    }

    fn current_limit(&self) -> Result<f64, DriverError> {
        Ok(self.current_limit)
    }

    fn set_current_limit(&mut self, amps: f64) -> Result<(), DriverError> {
        self.base.write()?;
        self.current_limit = amps;
        Ok(())
    }

    fn power_output(&self) -> Result<i16, DriverError> {
        Ok(self.power_output)
    }

    fn set_power_output(&mut self, ordinal: i16) -> Result<(), DriverError> {
        self.base.write()?;
        self.power_output = ordinal;
        Ok(())
    }

    fn measured_voltage(&self) -> Result<f64, DriverError> {
        Ok(self.measured_voltage)
    }

    fn voltage_move(
        &mut self,
        volts: f64,
        _duration_ms: i64,
    ) -> Result<(), DriverError> {
        self.base.write()?;
        self.voltage_setpoint = volts;
        self.measured_voltage = volts;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimSensor {
    pub base: SimBase,
    pub current_value: f64,
    pub unit: String,
    pub resolution: f64,
    pub lowest_value: f64,
    pub highest_value: f64,
}

impl SimSensor {
    pub(crate) fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            base: SimBase::new(serial, function_id, logical_name),
            current_value: 20.0,
            unit: "°C".to_owned(),
            resolution: 0.1,
            lowest_value: raw::INVALID_F64,
            highest_value: raw::INVALID_F64,
        }
    }

    /// Random-walk the reading a little, as real sensors do. Returns the
    /// new value so callers can advertise it.
    pub fn drift(&mut self) -> f64 {
        let step = rand::rng().random_range(-0.25..0.25);
        self.current_value += step;
        self.current_value
    }
}

impl_function_driver!(SimSensor, Sensor);

impl driver_api::SensorDriver for SimSensor {
    fn current_value(&self) -> Result<f64, DriverError> {
        Ok(self.current_value)
    }

    fn unit(&self) -> Result<String, DriverError> {
        Ok(self.unit.clone())
    }

    fn resolution(&self) -> Result<f64, DriverError> {
        Ok(self.resolution)
    }

    fn set_resolution(&mut self, resolution: f64) -> Result<(), DriverError> {
        self.base.write()?;
        self.resolution = resolution;
        Ok(())
    }

    fn lowest_value(&self) -> Result<f64, DriverError> {
        Ok(self.lowest_value)
    }

    fn highest_value(&self) -> Result<f64, DriverError> {
        Ok(self.highest_value)
    }

    fn reset_min_max(&mut self) -> Result<(), DriverError> {
        self.base.write()?;
        self.lowest_value = self.current_value;
        self.highest_value = self.current_value;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimRealtimeClock {
    pub base: SimBase,
    pub unix_time: i64,
    pub utc_offset: i64,
    /// Raw driver ordinal: -1 unknown, 0 false, 1 true.
    pub time_set: i16,
}

impl SimRealtimeClock {
    pub(crate) fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            base: SimBase::new(serial, function_id, logical_name),
            unix_time: raw::INVALID_I64,
            utc_offset: 0,
            time_set: 0,
        }
    }
}

impl_function_driver!(SimRealtimeClock, RealtimeClock);

impl driver_api::RealtimeClockDriver for SimRealtimeClock {
    fn unix_time(&self) -> Result<i64, DriverError> {
        Ok(self.unix_time)
    }

    fn set_unix_time(&mut self, seconds: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.unix_time = seconds;
        self.time_set = 1;
        Ok(())
    }

    fn utc_offset(&self) -> Result<i64, DriverError> {
        Ok(self.utc_offset)
    }

    fn set_utc_offset(&mut self, seconds: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.utc_offset = seconds;
        Ok(())
    }

    fn time_set(&self) -> Result<i16, DriverError> {
        Ok(self.time_set)
    }
}

#[derive(Debug)]
pub struct SimWireless {
    pub base: SimBase,
    pub link_quality: i64,
    pub ssid: String,
    pub channel: i64,
    /// Raw driver ordinal: -1 unknown, 0-based valid.
    pub security: i16,
}

impl SimWireless {
    pub(crate) fn new(serial: &str, function_id: &str, logical_name: &str) -> Self {
        Self {
            base: SimBase::new(serial, function_id, logical_name),
            link_quality: 0,
            ssid: String::new(),
            channel: 1,
            security: 0,
        }
    }
}

impl_function_driver!(SimWireless, Wireless);

impl driver_api::WirelessDriver for SimWireless {
    fn link_quality(&self) -> Result<i64, DriverError> {
        Ok(self.link_quality)
    }

    fn ssid(&self) -> Result<String, DriverError> {
        Ok(self.ssid.clone())
    }

    fn channel(&self) -> Result<i64, DriverError> {
        Ok(self.channel)
    }

    fn set_channel(&mut self, channel: i64) -> Result<(), DriverError> {
        self.base.write()?;
        self.channel = channel;
        Ok(())
    }

    fn security(&self) -> Result<i16, DriverError> {
        Ok(self.security)
    }

    fn set_security(&mut self, ordinal: i16) -> Result<(), DriverError> {
        self.base.write()?;
        self.security = ordinal;
        Ok(())
    }
}
