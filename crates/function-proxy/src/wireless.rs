//! Wireless network interface.
//!
//! Advertises its link quality (0..=100) as a plain decimal. The joined
//! network's name is read at arrival, channel and security are
//! configuration-class.

use driver_api::{raw, FunctionKind, WirelessDriver};
use tracing::error;

use crate::core::{read_cached, write_cached, ProxyCore};
use crate::error::Error;
use crate::parse;
use crate::registry::FunctionProxy;
use crate::value::{driver_enum, i64_from_raw, string_from_raw, AttrValue, INVALID_INT};

driver_enum! {
    /// Security scheme of the joined network.
    Security {
        Open = 1 => "OPEN",
        Wep = 2 => "WEP",
        WpaKey = 3 => "WPA_KEY",
        Wpa2Key = 4 => "WPA2_KEY",
    }
}

#[derive(Debug)]
pub struct WirelessProxy {
    core: ProxyCore<dyn WirelessDriver>,
    link_quality: i64,
    ssid: String,
    channel: i64,
    security: Security,
}

impl FunctionProxy for WirelessProxy {
    type Driver = dyn WirelessDriver;

    fn new(instantiation_name: &str) -> Self {
        Self {
            core: ProxyCore::new(instantiation_name, FunctionKind::Wireless),
            link_quality: INVALID_INT,
            ssid: String::new(),
            channel: INVALID_INT,
            security: Security::Invalid,
        }
    }

    fn core(&self) -> &ProxyCore<dyn WirelessDriver> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ProxyCore<dyn WirelessDriver> {
        &mut self.core
    }

    fn arrival(&mut self) {
        self.ssid = string_from_raw(
            self.core
                .query_or(raw::INVALID_STRING.to_owned(), |d| d.ssid()),
        );
        self.reload_config();
        self.link_quality = i64_from_raw(
            self.core.query_or(raw::INVALID_I64, |d| d.link_quality()),
        );
        self.core.mark_arrived();
    }

    fn config_changed(&mut self) {
        self.reload_config();
    }

    fn value_changed(&mut self, advertised: &str) {
        match parse::decimal_i64(advertised) {
            Ok(quality) => self.link_quality = quality,
            Err(err) => error!(
                function = %self.core.display_name(),
                "bad wireless advertisement: {err}"
            ),
        }
    }
}

impl WirelessProxy {
    fn reload_config(&mut self) {
        self.channel =
            i64_from_raw(self.core.query_or(raw::INVALID_I64, |d| d.channel()));
        self.security = Security::from_raw(
            self.core.query_or(raw::INVALID_ORDINAL, |d| d.security()),
        );
    }

    pub fn read_link_quality(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.link_quality())??;
        Ok(i64_from_raw(value))
    }

    pub fn read_ssid(&self) -> Result<String, Error> {
        let value = self.core.with_driver(|d| d.ssid())??;
        Ok(string_from_raw(value))
    }

    pub fn read_channel(&self) -> Result<i64, Error> {
        let value = self.core.with_driver(|d| d.channel())??;
        Ok(i64_from_raw(value))
    }

    pub fn write_channel(&mut self, channel: i64) -> Result<(), Error> {
        if channel.is_invalid() {
            return Ok(());
        }
        self.core.with_driver_mut(|d| d.set_channel(channel))??;
        Ok(())
    }

    pub fn read_security(&self) -> Result<Security, Error> {
        let ordinal = self.core.with_driver(|d| d.security())??;
        Ok(Security::from_raw(ordinal))
    }

    pub fn write_security(&mut self, security: Security) -> Result<(), Error> {
        if security.is_invalid() {
            return Ok(());
        }
        self.core
            .with_driver_mut(|d| d.set_security(security.to_raw()))??;
        Ok(())
    }

    /// Last advertised link quality. Derived, read-only.
    #[must_use]
    pub fn link_quality(&self) -> i64 {
        read_cached(&self.core, &self.link_quality)
    }

    /// Name of the joined network, fixed until the next arrival.
    #[must_use]
    pub fn ssid(&self) -> String {
        read_cached(&self.core, &self.ssid)
    }

    #[must_use]
    pub fn channel(&self) -> i64 {
        read_cached(&self.core, &self.channel)
    }

    pub fn set_channel(&mut self, channel: i64) -> Result<(), Error> {
        write_cached(&self.core, &mut self.channel, channel, |d, channel| {
            d.set_channel(*channel)
        })
    }

    #[must_use]
    pub fn security(&self) -> Security {
        read_cached(&self.core, &self.security)
    }

    pub fn set_security(&mut self, security: Security) -> Result<(), Error> {
        write_cached(&self.core, &mut self.security, security, |d, security| {
            d.set_security(security.to_raw())
        })
    }
}
