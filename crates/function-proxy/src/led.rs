//! RGB led with firmware-driven blink patterns.
//!
//! Advertises its color as a hex word (`0xRRGGBB`). The HSL mirror is not a
//! device attribute: it is derived from every advertised RGB word so
//! callers get both encodings without an extra driver round trip.

use driver_api::{raw, ColorLedDriver, FunctionKind};
use tracing::error;

use crate::conversion::rgb_to_hsl;
use crate::core::{read_cached, write_cached, ProxyCore};
use crate::error::Error;
use crate::parse;
use crate::registry::FunctionProxy;
use crate::value::{driver_enum, i64_from_raw, AttrValue, INVALID_INT};

driver_enum! {
    /// Blink pattern run by the led firmware.
    Blinking {
        Still = 1 => "STILL",
        Relax = 2 => "RELAX",
        Aware = 3 => "AWARE",
        Run = 4 => "RUN",
        Call = 5 => "CALL",
        Panic = 6 => "PANIC",
    }
}

#[derive(Debug)]
pub struct ColorLedProxy {
    core: ProxyCore<dyn ColorLedDriver>,
    rgb: i64,
    hsl: i64,
    luminosity: i64,
    blinking: Blinking,
}

impl FunctionProxy for ColorLedProxy {
    type Driver = dyn ColorLedDriver;

    fn new(instantiation_name: &str) -> Self {
        Self {
            core: ProxyCore::new(instantiation_name, FunctionKind::ColorLed),
            rgb: INVALID_INT,
            hsl: INVALID_INT,
            luminosity: INVALID_INT,
            blinking: Blinking::Invalid,
        }
    }

    fn core(&self) -> &ProxyCore<dyn ColorLedDriver> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProxyCore<dyn ColorLedDriver> {
        &mut self.core
    }

    fn arrival(&mut self) {
        self.reload_config();
        self.rgb = i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.rgb()));
        self.hsl = if self.rgb.is_invalid() {
            INVALID_INT
        } else {
            rgb_to_hsl(self.rgb)
        };
        self.core.mark_arrived();
    }

    fn config_changed(&mut self) {
        self.reload_config();
    }

    fn value_changed(&mut self, advertised: &str) {
        match parse::hex_rgb(advertised) {
            Ok(rgb) => {
                self.rgb = rgb;
                self.hsl = rgb_to_hsl(rgb);
            }
            Err(err) => error!(
                function = %self.core.display_name(),
                "bad led advertisement: {err}"
            ),
        }
    }
}

impl ColorLedProxy {
    fn reload_config(&mut self) {
        self.luminosity =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.luminosity()));
        self.blinking = Blinking::from_raw(
            self.core.query_or(raw::INVALID_ORDINAL, |d| d.blinking()),
        );
    }

    pub fn read_rgb(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.rgb())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_rgb(&mut self, rgb: i64) -> Result<(), Error> {
        if rgb.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_rgb(rgb))??;
        Ok(())
    }

    pub fn read_luminosity(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.luminosity())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_luminosity(&mut self, percent: i64) -> Result<(), Error> {
        if percent.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_luminosity(percent))??;
        Ok(())
    }

    pub fn read_blinking(&self) -> Result<Blinking, Error> {
        let ordinal = self.core.with_driver(|d| d.blinking())??;
        Ok(Blinking::from_raw(ordinal))
    }

    pub fn write_blinking(&mut self, pattern: Blinking) -> Result<(), Error> {
        if pattern.is_invalid() {
            return Ok(());
        }
        self.core
            .with_driver_mut(|d| d.set_blinking(pattern.to_raw()))??;
        Ok(())
    }

    /// Last advertised color as `0xRRGGBB`.
    #[must_use]
    pub fn rgb(&self) -> i64 {
        read_cached(&self.core, &self.rgb)
    }

    pub fn set_rgb(&mut self, rgb: i64) -> Result<(), Error> {
        let before = self.rgb;
        write_cached(&self.core, &mut self.rgb, rgb, |d, rgb| d.set_rgb(*rgb))?;
        if self.rgb != before {
            self.hsl = rgb_to_hsl(self.rgb);
        }
        Ok(())
    }

    /// HSL mirror of [`Self::rgb`], packed `0xHHSSLL`. Derived, read-only.
    #[must_use]
    pub fn hsl(&self) -> i64 {
        read_cached(&self.core, &self.hsl)
    }

    #[must_use]
    pub fn luminosity(&self) -> i64 {
        read_cached(&self.core, &self.luminosity)
    }

    pub fn set_luminosity(&mut self, percent: i64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.luminosity, percent, |d, percent| {
            d.set_luminosity(*percent)
        })
    }

    #[must_use]
    pub fn blinking(&self) -> Blinking {
        read_cached(&self.core, &self.blinking)
    }

    pub fn set_blinking(&mut self, pattern: Blinking) -> Result<(), Error> {
        write_cached(&self.core, &mut self.blinking, pattern, |d, pattern| {
            d.set_blinking(pattern.to_raw())
        })
    }

    /// Fade to `rgb` over `duration_ms`.
    pub fn rgb_move(&mut self, rgb: i64, duration_ms: i64) -> Result<(), Error> {
        self.core.with_driver_mut(|d| d.rgb_move(rgb, duration_ms))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Blinking;
    use std::str::FromStr;

    #[test]
    fn keywords_map_to_patterns() {
        assert_eq!(Blinking::from_str("RELAX"), Ok(Blinking::Relax));
        assert!(Blinking::from_str("DISCO").is_err());
    }

    #[test]
    fn raw_ordinals_are_shifted_by_one() {
        assert_eq!(Blinking::from_raw(-1), Blinking::Invalid);
        assert_eq!(Blinking::from_raw(0), Blinking::Still);
        assert_eq!(Blinking::from_raw(5), Blinking::Panic);
        assert_eq!(Blinking::from_raw(6), Blinking::Invalid);
        assert_eq!(Blinking::Panic.to_raw(), 5);
    }
}
