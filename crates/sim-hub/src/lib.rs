//! In-memory stand-in for the hardware driver library.
//!
//! Implements the full `driver-api` surface over plain structs: simulated
//! modules and functions whose state tests poke directly, per-device write
//! counters, a failure switch, and a queue of [`Notification`]s the
//! embedding test pumps into its registry. No transport, no discovery, no
//! timing; this crate only makes the trait seam exercisable without
//! hardware on the bench.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use driver_api::{DriverRef, Enumerate, FunctionKind, Notification};
use tracing::{trace, warn};

pub use devices::{
    SimBase, SimBuzzer, SimColorLed, SimPowerSupply, SimRealtimeClock,
    SimSensor, SimServo, SimWireless,
};
pub use fixture::{Fixture, FixtureError, FunctionFixture, ModuleFixture};

mod devices;
mod fixture;

#[derive(Default)]
pub struct SimHub {
    buzzers: Vec<Rc<RefCell<SimBuzzer>>>,
    leds: Vec<Rc<RefCell<SimColorLed>>>,
    servos: Vec<Rc<RefCell<SimServo>>>,
    supplies: Vec<Rc<RefCell<SimPowerSupply>>>,
    sensors: Vec<Rc<RefCell<SimSensor>>>,
    clocks: Vec<Rc<RefCell<SimRealtimeClock>>>,
    wireless: Vec<Rc<RefCell<SimWireless>>>,
    pending: VecDeque<Notification>,
}

macro_rules! install {
    ($name:ident, $list:ident, $device:ident, $kind:ident) => {
        /// Plug a simulated function in. The device starts online and an
        /// arrival notification is queued, as the real driver does on
        /// discovery.
        pub fn $name(
            &mut self,
            serial: &str,
            function_id: &str,
            logical_name: &str,
        ) -> Rc<RefCell<$device>> {
            let device = Rc::new(RefCell::new($device::new(
                serial,
                function_id,
                logical_name,
            )));
            self.$list.push(Rc::clone(&device));
            self.push(Notification::Arrival {
                kind: FunctionKind::$kind,
                hardware_id: device.borrow().base.hardware_id(),
            });
            device
        }
    };
}

impl SimHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hub from a RON fixture, see [`Fixture`].
    pub fn from_ron(fixture: &str) -> Result<Self, FixtureError> {
        let fixture: Fixture = ron::from_str(fixture)?;
        let mut hub = Self::new();
        for module in &fixture.modules {
            for function in &module.functions {
                let (serial, id, logical) = (
                    module.serial.as_str(),
                    function.id.as_str(),
                    function.logical_name.as_str(),
                );
                match function.kind {
                    FunctionKind::Buzzer => {
                        hub.install_buzzer(serial, id, logical);
                    }
                    FunctionKind::ColorLed => {
                        hub.install_color_led(serial, id, logical);
                    }
                    FunctionKind::Servo => {
                        hub.install_servo(serial, id, logical);
                    }
                    FunctionKind::PowerSupply => {
                        hub.install_power_supply(serial, id, logical);
                    }
                    FunctionKind::Sensor => {
                        hub.install_sensor(serial, id, logical);
                    }
                    FunctionKind::RealtimeClock => {
                        hub.install_realtime_clock(serial, id, logical);
                    }
                    FunctionKind::Wireless => {
                        hub.install_wireless(serial, id, logical);
                    }
                }
            }
        }
        Ok(hub)
    }

    install!(install_buzzer, buzzers, SimBuzzer, Buzzer);
    install!(install_color_led, leds, SimColorLed, ColorLed);
    install!(install_servo, servos, SimServo, Servo);
    install!(install_power_supply, supplies, SimPowerSupply, PowerSupply);
    install!(install_sensor, sensors, SimSensor, Sensor);
    install!(install_realtime_clock, clocks, SimRealtimeClock, RealtimeClock);
    install!(install_wireless, wireless, SimWireless, Wireless);

    /// Pull the function off the bus: it stays installed but goes offline
    /// and a removal notification is queued.
    pub fn detach(&mut self, hardware_id: &str) {
        match self.set_online(hardware_id, false) {
            Some(kind) => self.push(Notification::Removal {
                kind,
                hardware_id: hardware_id.to_owned(),
            }),
            None => warn!(hardware_id, "detach for unknown hardware"),
        }
    }

    /// Put a detached function back on the bus.
    pub fn reattach(&mut self, hardware_id: &str) {
        match self.set_online(hardware_id, true) {
            Some(kind) => self.push(Notification::Arrival {
                kind,
                hardware_id: hardware_id.to_owned(),
            }),
            None => warn!(hardware_id, "reattach for unknown hardware"),
        }
    }

    /// Queue an advertised-value notification, the async channel real
    /// devices report changes over.
    pub fn advertise(&mut self, hardware_id: &str, value: impl Into<String>) {
        match self.kind_of(hardware_id) {
            Some(kind) => self.push(Notification::ValueChanged {
                kind,
                hardware_id: hardware_id.to_owned(),
                value: value.into(),
            }),
            None => warn!(hardware_id, "advertisement for unknown hardware"),
        }
    }

    /// Queue a module-configuration-reloaded notification.
    pub fn announce_config_changed(&mut self, serial: &str) {
        self.push(Notification::ConfigChanged {
            serial: serial.to_owned(),
        });
    }

    /// Everything queued since the last drain, in delivery order.
    pub fn drain_events(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    fn push(&mut self, notification: Notification) {
        trace!(?notification, "queueing notification");
        self.pending.push_back(notification);
    }

    fn set_online(&mut self, hardware_id: &str, online: bool) -> Option<FunctionKind> {
        macro_rules! try_list {
            ($list:expr, $kind:ident) => {
                if let Some(device) = $list
                    .iter()
                    .find(|d| d.borrow().base.hardware_id() == hardware_id)
                {
                    device.borrow_mut().base.online = online;
                    return Some(FunctionKind::$kind);
                }
            };
        }
        try_list!(self.buzzers, Buzzer);
        try_list!(self.leds, ColorLed);
        try_list!(self.servos, Servo);
        try_list!(self.supplies, PowerSupply);
        try_list!(self.sensors, Sensor);
        try_list!(self.clocks, RealtimeClock);
        try_list!(self.wireless, Wireless);
        None
    }

    fn kind_of(&self, hardware_id: &str) -> Option<FunctionKind> {
        macro_rules! try_list {
            ($list:expr, $kind:ident) => {
                if $list
                    .iter()
                    .any(|d| d.borrow().base.hardware_id() == hardware_id)
                {
                    return Some(FunctionKind::$kind);
                }
            };
        }
        try_list!(self.buzzers, Buzzer);
        try_list!(self.leds, ColorLed);
        try_list!(self.servos, Servo);
        try_list!(self.supplies, PowerSupply);
        try_list!(self.sensors, Sensor);
        try_list!(self.clocks, RealtimeClock);
        try_list!(self.wireless, Wireless);
        None
    }
}

macro_rules! impl_enumerate {
    ($list:ident, $driver:path) => {
        impl Enumerate<dyn $driver> for SimHub {
            fn find_by_id(&self, name: &str) -> Option<DriverRef<dyn $driver>> {
                self.$list
                    .iter()
                    .find(|device| {
                        let device = device.borrow();
                        device.base.hardware_id() == name
                            || (!device.base.logical_name.is_empty()
                                && device.base.logical_name == name)
                    })
                    .map(|device| {
                        let device: DriverRef<dyn $driver> = device.clone();
                        device
                    })
            }

            fn first(&self) -> Option<DriverRef<dyn $driver>> {
                self.$list.first().map(|device| {
                    let device: DriverRef<dyn $driver> = device.clone();
                    device
                })
            }

            fn next_after(
                &self,
                current: &DriverRef<dyn $driver>,
            ) -> Option<DriverRef<dyn $driver>> {
                let current = Rc::as_ptr(current).cast::<()>();
                let position = self
                    .$list
                    .iter()
                    .position(|device| Rc::as_ptr(device).cast::<()>() == current)?;
                self.$list.get(position + 1).map(|device| {
                    let device: DriverRef<dyn $driver> = device.clone();
                    device
                })
            }
        }
    };
}

impl_enumerate!(buzzers, driver_api::BuzzerDriver);
impl_enumerate!(leds, driver_api::ColorLedDriver);
impl_enumerate!(servos, driver_api::ServoDriver);
impl_enumerate!(supplies, driver_api::PowerSupplyDriver);
impl_enumerate!(sensors, driver_api::SensorDriver);
impl_enumerate!(clocks, driver_api::RealtimeClockDriver);
impl_enumerate!(wireless, driver_api::WirelessDriver);

#[cfg(test)]
mod tests {
    use super::*;
    use driver_api::{BuzzerDriver, FunctionDriver};

    const FIXTURE: &str = r#"(
        modules: [
            (serial: "DEV1", functions: [
                (kind: Buzzer, id: "buzzer", logical_name: "melody"),
                (kind: Sensor, id: "sensor1"),
            ]),
            (serial: "DEV2", functions: [
                (kind: Sensor, id: "sensor1", logical_name: "cellar"),
            ]),
        ],
    )"#;

    #[test]
    fn fixture_installs_functions() {
        let hub = SimHub::from_ron(FIXTURE).unwrap();
        let buzzer =
            <SimHub as Enumerate<dyn BuzzerDriver>>::find_by_id(&hub, "melody")
                .unwrap();
        assert_eq!(buzzer.borrow().hardware_id(), "DEV1.buzzer");

        let first = <SimHub as Enumerate<dyn driver_api::SensorDriver>>::first(&hub)
            .unwrap();
        let second = <SimHub as Enumerate<dyn driver_api::SensorDriver>>::next_after(
            &hub, &first,
        )
        .unwrap();
        assert_eq!(second.borrow().hardware_id(), "DEV2.sensor1");
        assert!(
            <SimHub as Enumerate<dyn driver_api::SensorDriver>>::next_after(
                &hub, &second
            )
            .is_none()
        );
    }

    #[test]
    fn install_and_detach_queue_notifications() {
        let mut hub = SimHub::new();
        hub.install_servo("DEV1", "servo1", "");
        hub.detach("DEV1.servo1");
        let events = hub.drain_events();
        assert_eq!(
            events,
            vec![
                Notification::Arrival {
                    kind: FunctionKind::Servo,
                    hardware_id: "DEV1.servo1".to_owned(),
                },
                Notification::Removal {
                    kind: FunctionKind::Servo,
                    hardware_id: "DEV1.servo1".to_owned(),
                },
            ]
        );
        assert!(hub.drain_events().is_empty());
    }

    #[test]
    fn writes_are_counted_and_can_fail() {
        let mut hub = SimHub::new();
        let device = hub.install_buzzer("DEV1", "buzzer", "");
        {
            let mut device = device.borrow_mut();
            device.set_frequency(440.0).unwrap();
            assert_eq!(device.base.writes, 1);
            device.base.fail_writes = true;
            assert!(device.set_frequency(880.0).is_err());
            assert_eq!(device.base.writes, 1);
            assert_eq!(device.frequency, 440.0);
        }
    }
}
