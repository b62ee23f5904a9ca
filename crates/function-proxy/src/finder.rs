//! Top-level context owning one [`ProxyTable`] per function kind. Not a
//! process-wide static: applications (and tests) create as many independent
//! registries as they need and pass the driver hub in explicitly.

use driver_api::{DriverHub, FunctionKind, Notification};

use crate::buzzer::BuzzerProxy;
use crate::clock::RealtimeClockProxy;
use crate::led::ColorLedProxy;
use crate::power_supply::PowerSupplyProxy;
use crate::registry::{ProxyTable, SharedProxy};
use crate::sensor::SensorProxy;
use crate::servo::ServoProxy;
use crate::wireless::WirelessProxy;

#[derive(Default)]
pub struct FunctionRegistry {
    buzzers: ProxyTable<BuzzerProxy>,
    leds: ProxyTable<ColorLedProxy>,
    servos: ProxyTable<ServoProxy>,
    supplies: ProxyTable<PowerSupplyProxy>,
    sensors: ProxyTable<SensorProxy>,
    clocks: ProxyTable<RealtimeClockProxy>,
    wireless: ProxyTable<WirelessProxy>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_buzzer(
        &mut self,
        hub: &impl DriverHub,
        name: &str,
    ) -> SharedProxy<BuzzerProxy> {
        self.buzzers.find_by_name(hub, name)
    }

    pub fn find_color_led(
        &mut self,
        hub: &impl DriverHub,
        name: &str,
    ) -> SharedProxy<ColorLedProxy> {
        self.leds.find_by_name(hub, name)
    }

    pub fn find_servo(
        &mut self,
        hub: &impl DriverHub,
        name: &str,
    ) -> SharedProxy<ServoProxy> {
        self.servos.find_by_name(hub, name)
    }

    pub fn find_power_supply(
        &mut self,
        hub: &impl DriverHub,
        name: &str,
    ) -> SharedProxy<PowerSupplyProxy> {
        self.supplies.find_by_name(hub, name)
    }

    pub fn find_sensor(
        &mut self,
        hub: &impl DriverHub,
        name: &str,
    ) -> SharedProxy<SensorProxy> {
        self.sensors.find_by_name(hub, name)
    }

    pub fn find_realtime_clock(
        &mut self,
        hub: &impl DriverHub,
        name: &str,
    ) -> SharedProxy<RealtimeClockProxy> {
        self.clocks.find_by_name(hub, name)
    }

    pub fn find_wireless(
        &mut self,
        hub: &impl DriverHub,
        name: &str,
    ) -> SharedProxy<WirelessProxy> {
        self.wireless.find_by_name(hub, name)
    }

    pub fn known_buzzers(&self, hub: &impl DriverHub) -> Vec<String> {
        self.buzzers.known_ids(hub)
    }

    pub fn known_color_leds(&self, hub: &impl DriverHub) -> Vec<String> {
        self.leds.known_ids(hub)
    }

    pub fn known_servos(&self, hub: &impl DriverHub) -> Vec<String> {
        self.servos.known_ids(hub)
    }

    pub fn known_power_supplies(&self, hub: &impl DriverHub) -> Vec<String> {
        self.supplies.known_ids(hub)
    }

    pub fn known_sensors(&self, hub: &impl DriverHub) -> Vec<String> {
        self.sensors.known_ids(hub)
    }

    pub fn known_realtime_clocks(&self, hub: &impl DriverHub) -> Vec<String> {
        self.clocks.known_ids(hub)
    }

    pub fn known_wireless(&self, hub: &impl DriverHub) -> Vec<String> {
        self.wireless.known_ids(hub)
    }

    /// Route one event from the driver's notification channel to the
    /// affected proxies. Events for hardware no proxy represents yet are
    /// dropped, a later lookup picks the hardware up instead.
    pub fn handle(&mut self, hub: &impl DriverHub, notification: Notification) {
        match notification {
            Notification::Arrival { kind, hardware_id } => match kind {
                FunctionKind::Buzzer => {
                    self.buzzers.handle_arrival(hub, &hardware_id);
                }
                FunctionKind::ColorLed => {
                    self.leds.handle_arrival(hub, &hardware_id);
                }
                FunctionKind::Servo => {
                    self.servos.handle_arrival(hub, &hardware_id);
                }
                FunctionKind::PowerSupply => {
                    self.supplies.handle_arrival(hub, &hardware_id);
                }
                FunctionKind::Sensor => {
                    self.sensors.handle_arrival(hub, &hardware_id);
                }
                FunctionKind::RealtimeClock => {
                    self.clocks.handle_arrival(hub, &hardware_id);
                }
                FunctionKind::Wireless => {
                    self.wireless.handle_arrival(hub, &hardware_id);
                }
            },
            Notification::ConfigChanged { serial } => {
                self.buzzers.handle_config_changed(&serial);
                self.leds.handle_config_changed(&serial);
                self.servos.handle_config_changed(&serial);
                self.supplies.handle_config_changed(&serial);
                self.sensors.handle_config_changed(&serial);
                self.clocks.handle_config_changed(&serial);
                self.wireless.handle_config_changed(&serial);
            }
            Notification::ValueChanged {
                kind,
                hardware_id,
                value,
            } => match kind {
                FunctionKind::Buzzer => {
                    self.buzzers.handle_value_changed(&hardware_id, &value);
                }
                FunctionKind::ColorLed => {
                    self.leds.handle_value_changed(&hardware_id, &value);
                }
                FunctionKind::Servo => {
                    self.servos.handle_value_changed(&hardware_id, &value);
                }
                FunctionKind::PowerSupply => {
                    self.supplies.handle_value_changed(&hardware_id, &value);
                }
                FunctionKind::Sensor => {
                    self.sensors.handle_value_changed(&hardware_id, &value);
                }
                FunctionKind::RealtimeClock => {
                    self.clocks.handle_value_changed(&hardware_id, &value);
                }
                FunctionKind::Wireless => {
                    self.wireless.handle_value_changed(&hardware_id, &value);
                }
            },
            Notification::Removal { kind, hardware_id } => match kind {
                FunctionKind::Buzzer => {
                    self.buzzers.handle_removal(&hardware_id);
                }
                FunctionKind::ColorLed => self.leds.handle_removal(&hardware_id),
                FunctionKind::Servo => {
                    self.servos.handle_removal(&hardware_id);
                }
                FunctionKind::PowerSupply => {
                    self.supplies.handle_removal(&hardware_id);
                }
                FunctionKind::Sensor => {
                    self.sensors.handle_removal(&hardware_id);
                }
                FunctionKind::RealtimeClock => {
                    self.clocks.handle_removal(&hardware_id);
                }
                FunctionKind::Wireless => {
                    self.wireless.handle_removal(&hardware_id);
                }
            },
        }
    }
}
