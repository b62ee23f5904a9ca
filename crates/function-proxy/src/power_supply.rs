//! Programmable power supply.
//!
//! Advertises the voltage measured at its output terminals. Setpoint,
//! current limit and output switch are configuration-class.

use driver_api::{raw, FunctionKind, PowerSupplyDriver};
use tracing::error;

use crate::core::{read_cached, write_cached, ProxyCore};
use crate::error::Error;
use crate::parse;
use crate::registry::FunctionProxy;
use crate::value::{driver_enum, f64_from_raw, AttrValue};

driver_enum! {
    /// Output relay state.
    PowerOutput {
        Off = 1 => "OFF",
        On = 2 => "ON",
    }
}

#[derive(Debug)]
pub struct PowerSupplyProxy {
    core: ProxyCore<dyn PowerSupplyDriver>,
    measured_voltage: f64,
    voltage_setpoint: f64,
    current_limit: f64,
    power_output: PowerOutput,
}

impl FunctionProxy for PowerSupplyProxy {
    type Driver = dyn PowerSupplyDriver;

    fn new(instantiation_name: &str) -> Self {
        Self {
            core: ProxyCore::new(instantiation_name, FunctionKind::PowerSupply),
            measured_voltage: f64::NAN,
            voltage_setpoint: f64::NAN,
            current_limit: f64::NAN,
            power_output: PowerOutput::Invalid,
        }
    }

    fn core(&self) -> &ProxyCore<dyn PowerSupplyDriver> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProxyCore<dyn PowerSupplyDriver> {
        &mut self.core
    }

    fn arrival(&mut self) {
        self.reload_config();
        self.measured_voltage = f64_from_raw(
            self.core
                .query_or(raw::INVALID_F64, |d| d.measured_voltage()),
        );
        self.core.mark_arrived();
    }

    fn config_changed(&mut self) {
        self.reload_config();
    }

    fn value_changed(&mut self, advertised: &str) {
        match parse::decimal_f64(advertised) {
            Ok(volts) => self.measured_voltage = volts,
            Err(err) => error!(
                function = %self.core.display_name(),
                "bad power supply advertisement: {err}"
            ),
        }
    }
}

impl PowerSupplyProxy {
    fn reload_config(&mut self) {
        self.voltage_setpoint = f64_from_raw(
            self.core
                .query_or(raw::INVALID_F64, |d| d.voltage_setpoint()),
        );
        self.current_limit = f64_from_raw(
            self.core.query_or(raw::INVALID_F64, |d| d.current_limit()),
        );
        self.power_output = PowerOutput::from_raw(
            self.core.query_or(raw::INVALID_ORDINAL, |d| d.power_output()),
        );
    }

    pub fn read_measured_voltage(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.measured_voltage())??;
        Ok(f64_from_raw(value))
    }

    pub fn read_voltage_setpoint(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.voltage_setpoint())??;
        Ok(f64_from_raw(value))
    }

    pub fn write_voltage_setpoint(&mut self, volts: f64) -> Result<(), Error> {
        if volts.is_invalid() {
            return Ok(());
        }
        self.core
            .with_driver_mut(|d| d.set_voltage_setpoint(volts))??;
        Ok(())
    }

    pub fn read_current_limit(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.current_limit())??;
        Ok(f64_from_raw(value))
    }

    pub fn write_current_limit(&mut self, amps: f64) -> Result<(), Error> {
        if amps.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_current_limit(amps))??;
        Ok(())
    }

    pub fn read_power_output(&self) -> Result<PowerOutput, Error> {
        let ordinal = self.core.with_driver(|d| d.power_output())??;
        Ok(PowerOutput::from_raw(ordinal))
    }

    pub fn write_power_output(&mut self, state: PowerOutput) -> Result<(), Error> {
        if state.is_invalid() {
            return Ok(());
        }
        self.core
            .with_driver_mut(|d| d.set_power_output(state.to_raw()))??;
        Ok(())
    }

    /// Last advertised terminal voltage, NaN while offline. Derived,
    /// read-only.
    #[must_use]
    pub fn measured_voltage(&self) -> f64 {
        read_cached(&self.core, &self.measured_voltage)
    }

    #[must_use]
    pub fn voltage_setpoint(&self) -> f64 {
        read_cached(&self.core, &self.voltage_setpoint)
    }

    pub fn set_voltage_setpoint(&mut self, volts: f64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.voltage_setpoint, volts, |d, volts| {
            d.set_voltage_setpoint(*volts)
        })
    }

    #[must_use]
    pub fn current_limit(&self) -> f64 {
        read_cached(&self.core, &self.current_limit)
    }

    pub fn set_current_limit(&mut self, amps: f64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.current_limit, amps, |d, amps| {
            d.set_current_limit(*amps)
        })
    }

    #[must_use]
    pub fn power_output(&self) -> PowerOutput {
        read_cached(&self.core, &self.power_output)
    }

    pub fn set_power_output(&mut self, state: PowerOutput) -> Result<(), Error> {
        write_cached(&self.core, &mut self.power_output, state, |d, state| {
            d.set_power_output(state.to_raw())
        })
    }

    /// Ramp the setpoint to `volts` over `duration_ms`.
    pub fn voltage_move(
        &mut self,
        volts: f64,
        duration_ms: i64,
    ) -> Result<(), Error> {
        self.core
            .with_driver_mut(|d| d.voltage_move(volts, duration_ms))??;
        Ok(())
    }
}
