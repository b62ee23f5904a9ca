//! Positional servo output.
//!
//! Advertises its position (-1000..=1000) as a plain decimal. `range` and
//! `neutral` are configuration-class, `enabled` switches the pulse train.

use driver_api::{raw, FunctionKind, ServoDriver};
use tracing::error;

use crate::core::{read_cached, write_cached, ProxyCore};
use crate::error::Error;
use crate::parse;
use crate::registry::FunctionProxy;
use crate::value::{driver_enum, i64_from_raw, AttrValue, INVALID_INT};

driver_enum! {
    /// Whether the servo drives its pulse train.
    Enabled {
        False = 1 => "FALSE",
        True = 2 => "TRUE",
    }
}

#[derive(Debug)]
pub struct ServoProxy {
    core: ProxyCore<dyn ServoDriver>,
    position: i64,
    range: i64,
    neutral: i64,
    enabled: Enabled,
}

impl FunctionProxy for ServoProxy {
    type Driver = dyn ServoDriver;

    fn new(instantiation_name: &str) -> Self {
        Self {
            core: ProxyCore::new(instantiation_name, FunctionKind::Servo),
            position: INVALID_INT,
            range: INVALID_INT,
            neutral: INVALID_INT,
            enabled: Enabled::Invalid,
        }
    }

    fn core(&self) -> &ProxyCore<dyn ServoDriver> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProxyCore<dyn ServoDriver> {
        &mut self.core
    }

    fn arrival(&mut self) {
        self.reload_config();
        self.position =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.position()));
        self.core.mark_arrived();
    }

    fn config_changed(&mut self) {
        self.reload_config();
    }

    fn value_changed(&mut self, advertised: &str) {
        match parse::decimal_i64(advertised) {
            Ok(position) => self.position = position,
            Err(err) => error!(
                function = %self.core.display_name(),
                "bad servo advertisement: {err}"
            ),
        }
    }
}

impl ServoProxy {
    fn reload_config(&mut self) {
        self.range =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.range()));
        self.neutral =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.neutral()));
        self.enabled = Enabled::from_raw(
            self.core.query_or(raw::INVALID_ORDINAL, |d| d.enabled()),
        );
    }

    pub fn read_position(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.position())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_position(&mut self, target: i64) -> Result<(), Error> {
        if target.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_position(target))??;
        Ok(())
    }

    pub fn read_range(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.range())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_range(&mut self, percent: i64) -> Result<(), Error> {
        if percent.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_range(percent))??;
        Ok(())
    }

    pub fn read_neutral(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.neutral())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_neutral(&mut self, us: i64) -> Result<(), Error> {
        if us.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_neutral(us))??;
        Ok(())
    }

    pub fn read_enabled(&self) -> Result<Enabled, Error> {
        let ordinal = self.core.with_driver(|d| d.enabled())??;
        Ok(Enabled::from_raw(ordinal))
    }

    pub fn write_enabled(&mut self, enabled: Enabled) -> Result<(), Error> {
        if enabled.is_invalid() {
            return Ok(());
        }
        self.core
            .with_driver_mut(|d| d.set_enabled(enabled.to_raw()))??;
        Ok(())
    }

    /// Last advertised position.
    #[must_use]
    pub fn position(&self) -> i64 {
        read_cached(&self.core, &self.position)
    }

    pub fn set_position(&mut self, target: i64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.position, target, |d, target| {
            d.set_position(*target)
        })
    }

    #[must_use]
    pub fn range(&self) -> i64 {
        read_cached(&self.core, &self.range)
    }

    pub fn set_range(&mut self, percent: i64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.range, percent, |d, percent| {
            d.set_range(*percent)
        })
    }

    #[must_use]
    pub fn neutral(&self) -> i64 {
        read_cached(&self.core, &self.neutral)
    }

    pub fn set_neutral(&mut self, us: i64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.neutral, us, |d, us| {
            d.set_neutral(*us)
        })
    }

    #[must_use]
    pub fn enabled(&self) -> Enabled {
        read_cached(&self.core, &self.enabled)
    }

    pub fn set_enabled(&mut self, enabled: Enabled) -> Result<(), Error> {
        write_cached(&self.core, &mut self.enabled, enabled, |d, enabled| {
            d.set_enabled(enabled.to_raw())
        })
    }

    /// Ramp to `target` over `duration_ms` instead of jumping.
    pub fn move_to(&mut self, target: i64, duration_ms: i64) -> Result<(), Error> {
        self.core
            .with_driver_mut(|d| d.move_to(target, duration_ms))??;
        Ok(())
    }
}
