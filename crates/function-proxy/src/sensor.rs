//! Generic measuring function (temperature, pressure, light, ...).
//!
//! Advertises each new reading as a plain decimal. The running extremes are
//! derived locally from the advertised stream so they stay consistent with
//! what the caller actually saw; arrival seeds them with the device's own
//! record.

use driver_api::{raw, FunctionKind, SensorDriver};
use tracing::error;

use crate::core::{read_cached, write_cached, ProxyCore};
use crate::error::Error;
use crate::parse;
use crate::registry::FunctionProxy;
use crate::value::{f64_from_raw, string_from_raw, AttrValue};

#[derive(Debug)]
pub struct SensorProxy {
    core: ProxyCore<dyn SensorDriver>,
    current_value: f64,
    lowest_value: f64,
    highest_value: f64,
    unit: String,
    resolution: f64,
}

impl FunctionProxy for SensorProxy {
    type Driver = dyn SensorDriver;

    fn new(instantiation_name: &str) -> Self {
        Self {
            core: ProxyCore::new(instantiation_name, FunctionKind::Sensor),
            current_value: f64::NAN,
            lowest_value: f64::NAN,
            highest_value: f64::NAN,
            unit: String::new(),
            resolution: f64::NAN,
        }
    }

    fn core(&self) -> &ProxyCore<dyn SensorDriver> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProxyCore<dyn SensorDriver> {
        &mut self.core
    }

    fn arrival(&mut self) {
        self.unit = string_from_raw(
            self.core
                .query_or(raw::INVALID_STRING.to_owned(), |d| d.unit()),
        );
        self.reload_config();
        self.current_value = f64_from_raw(
            self.core.query_or(raw::INVALID_F64, |d| d.current_value()),
        );
        self.lowest_value = f64_from_raw(
            self.core.query_or(raw::INVALID_F64, |d| d.lowest_value()),
        );
        self.highest_value = f64_from_raw(
            self.core.query_or(raw::INVALID_F64, |d| d.highest_value()),
        );
        self.core.mark_arrived();
    }

    fn config_changed(&mut self) {
        self.reload_config();
    }

    fn value_changed(&mut self, advertised: &str) {
        match parse::decimal_f64(advertised) {
            Ok(reading) => {
                self.current_value = reading;
                if self.lowest_value.is_invalid() || reading < self.lowest_value {
                    self.lowest_value = reading;
                }
                if self.highest_value.is_invalid() || reading > self.highest_value
                {
                    self.highest_value = reading;
                }
            }
            Err(err) => error!(
                function = %self.core.display_name(),
                "bad sensor advertisement: {err}"
            ),
        }
    }
}

impl SensorProxy {
    fn reload_config(&mut self) {
        self.resolution = f64_from_raw(
            self.core.query_or(raw::INVALID_F64, |d| d.resolution()),
        );
    }

    pub fn read_current_value(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.current_value())??;
        Ok(f64_from_raw(value))
    }

    pub fn read_unit(&self) -> Result<String, Error> {
        let value = self.core.with_driver(|d| d.unit())??;
        Ok(string_from_raw(value))
    }

    pub fn read_resolution(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.resolution())??;
        Ok(f64_from_raw(value))
    }

    pub fn write_resolution(&mut self, resolution: f64) -> Result<(), Error> {
        if resolution.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_resolution(resolution))??;
        Ok(())
    }

    pub fn read_lowest_value(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.lowest_value())??;
        Ok(f64_from_raw(value))
    }

    pub fn read_highest_value(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.highest_value())??;
        Ok(f64_from_raw(value))
    }

    /// Last advertised reading, NaN while offline.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        read_cached(&self.core, &self.current_value)
    }

    /// Lowest reading seen since arrival (seeded from the device record).
    #[must_use]
    pub fn lowest_value(&self) -> f64 {
        read_cached(&self.core, &self.lowest_value)
    }

    /// Highest reading seen since arrival (seeded from the device record).
    #[must_use]
    pub fn highest_value(&self) -> f64 {
        read_cached(&self.core, &self.highest_value)
    }

    /// Unit the readings are expressed in, fixed per function.
    #[must_use]
    pub fn unit(&self) -> String {
        read_cached(&self.core, &self.unit)
    }

    #[must_use]
    pub fn resolution(&self) -> f64 {
        read_cached(&self.core, &self.resolution)
    }

    pub fn set_resolution(&mut self, resolution: f64) -> Result<(), Error> {
        write_cached(
            &self.core,
            &mut self.resolution,
            resolution,
            |d, resolution| d.set_resolution(*resolution),
        )
    }

    /// Clear the device's min/max record and restart ours from the current
    /// reading.
    pub fn reset_min_max(&mut self) -> Result<(), Error> {
        self.core.with_driver_mut(|d| d.reset_min_max())??;
        self.lowest_value = self.current_value;
        self.highest_value = self.current_value;
        Ok(())
    }
}
