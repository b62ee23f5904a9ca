//! Frequency-programmable buzzer.
//!
//! Advertises its current frequency as a plain decimal. `volume` is
//! configuration-class (persisted on the module), `play_seq_max_size` is
//! fixed per firmware and only read once at arrival.

use driver_api::{raw, BuzzerDriver, FunctionKind};
use tracing::error;

use crate::core::{read_cached, write_cached, ProxyCore};
use crate::error::Error;
use crate::parse;
use crate::registry::FunctionProxy;
use crate::value::{f64_from_raw, i64_from_raw, AttrValue, INVALID_INT};

#[derive(Debug)]
pub struct BuzzerProxy {
    core: ProxyCore<dyn BuzzerDriver>,
    frequency: f64,
    volume: i64,
    play_seq_max_size: i64,
}

impl FunctionProxy for BuzzerProxy {
    type Driver = dyn BuzzerDriver;

    fn new(instantiation_name: &str) -> Self {
        Self {
            core: ProxyCore::new(instantiation_name, FunctionKind::Buzzer),
            frequency: f64::NAN,
            volume: INVALID_INT,
            play_seq_max_size: INVALID_INT,
        }
    }

    fn core(&self) -> &ProxyCore<dyn BuzzerDriver> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProxyCore<dyn BuzzerDriver> {
        &mut self.core
    }

    fn arrival(&mut self) {
        self.play_seq_max_size = i64_from_raw(
            self.core
                .query_or(raw::INVALID_I64, |d| d.play_seq_max_size()),
        );
        self.reload_config();
        self.frequency =
            f64_from_raw(self.core.query_or(raw::INVALID_F64, |d| d.frequency()));
        self.core.mark_arrived();
    }

    fn config_changed(&mut self) {
        self.reload_config();
    }

    fn value_changed(&mut self, advertised: &str) {
        match parse::decimal_f64(advertised) {
            Ok(hz) => self.frequency = hz,
            Err(err) => error!(
                function = %self.core.display_name(),
                "bad buzzer advertisement: {err}"
            ),
        }
    }
}

impl BuzzerProxy {
    fn reload_config(&mut self) {
        self.volume =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.volume()));
    }

    /// Frequency straight from the hardware, NaN while the device does not
    /// know one.
    pub fn read_frequency(&self) -> Result<f64, Error> {
        let value = self.core.with_driver(|d| d.frequency())??;
        Ok(f64_from_raw(value))
    }

    /// Forwards unless `hz` is the NaN sentinel, which means "no change
    /// requested" and reports success without touching the driver.
    pub fn write_frequency(&mut self, hz: f64) -> Result<(), Error> {
        if hz.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_frequency(hz))??;
        Ok(())
    }

    pub fn read_volume(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.volume())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_volume(&mut self, percent: i64) -> Result<(), Error> {
        if percent.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_volume(percent))??;
        Ok(())
    }

    pub fn read_play_seq_max_size(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.play_seq_max_size())??;
        Ok(i64_from_raw(value))
    }

    /// Last advertised frequency, NaN while offline.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        read_cached(&self.core, &self.frequency)
    }

    pub fn set_frequency(&mut self, hz: f64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.frequency, hz, |d, hz| {
            d.set_frequency(*hz)
        })
    }

    #[must_use]
    pub fn volume(&self) -> i64 {
        read_cached(&self.core, &self.volume)
    }

    pub fn set_volume(&mut self, percent: i64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.volume, percent, |d, percent| {
            d.set_volume(*percent)
        })
    }

    #[must_use]
    pub fn play_seq_max_size(&self) -> i64 {
        read_cached(&self.core, &self.play_seq_max_size)
    }

    /// Beep at `hz` for `duration_ms`, then fall silent again.
    pub fn pulse(&mut self, hz: f64, duration_ms: i64) -> Result<(), Error> {
        self.core.with_driver_mut(|d| d.pulse(hz, duration_ms))??;
        Ok(())
    }

    /// Glide from the current frequency to `hz` over `duration_ms`.
    pub fn frequency_move(
        &mut self,
        hz: f64,
        duration_ms: i64,
    ) -> Result<(), Error> {
        self.core
            .with_driver_mut(|d| d.frequency_move(hz, duration_ms))??;
        Ok(())
    }
}
