//! End-to-end scenarios through the simulated hub: lookup, lifecycle,
//! cache gating, sentinel handling and the enum ordinal shift.

use std::rc::Rc;

use sim_hub::SimHub;
use strum::IntoEnumIterator;

use crate::registry::FunctionProxy;
use crate::{
    Blinking, Enabled, Error, FunctionRegistry, PowerOutput, Security, TimeSet,
    INVALID_INT,
};

/// Deliver everything the hub queued, the way the embedding application
/// drains the driver's notification channel.
fn pump(registry: &mut FunctionRegistry, hub: &mut SimHub) {
    for event in hub.drain_events() {
        registry.handle(hub, event);
    }
}

#[test]
fn lookup_is_idempotent() {
    logger::tracing::setup_for_tests();
    let mut hub = SimHub::new();
    hub.install_buzzer("DEV1", "buzzer", "melody");
    let mut registry = FunctionRegistry::new();

    let by_id = registry.find_buzzer(&hub, "DEV1.buzzer");
    let again = registry.find_buzzer(&hub, "DEV1.buzzer");
    assert!(Rc::ptr_eq(&by_id, &again));

    // the logical name resolves to the same instance
    let by_logical = registry.find_buzzer(&hub, "melody");
    assert!(Rc::ptr_eq(&by_id, &by_logical));
}

#[test]
fn unbound_lookup_then_arrival() {
    logger::tracing::setup_for_tests();
    let mut hub = SimHub::new();
    let mut registry = FunctionRegistry::new();

    // no hardware yet: the proxy comes back unbound instead of an error
    let proxy = registry.find_buzzer(&hub, "DEV1.buzzer");
    assert!(matches!(
        proxy.borrow().read_frequency(),
        Err(Error::NotConnected { .. })
    ));
    assert!(proxy.borrow().frequency().is_nan());

    let device = hub.install_buzzer("DEV1", "buzzer", "");
    device.borrow_mut().frequency = 440.0;
    pump(&mut registry, &mut hub);

    assert!(proxy.borrow().core().is_online());
    assert_eq!(proxy.borrow().frequency(), 440.0);
    assert_eq!(proxy.borrow().play_seq_max_size(), 52);

    // same value: no driver call
    let writes_before = device.borrow().base.writes;
    proxy.borrow_mut().set_frequency(440.0).unwrap();
    assert_eq!(device.borrow().base.writes, writes_before);

    // new value: exactly one driver call, cache follows
    proxy.borrow_mut().set_frequency(523.0).unwrap();
    assert_eq!(device.borrow().base.writes, writes_before + 1);
    assert_eq!(proxy.borrow().frequency(), 523.0);
    assert_eq!(device.borrow().frequency, 523.0);
}

#[test]
fn sentinel_setters_never_forward() {
    let mut hub = SimHub::new();
    let buzzer_dev = hub.install_buzzer("DEV1", "buzzer", "");
    let led_dev = hub.install_color_led("DEV1", "led1", "");
    let servo_dev = hub.install_servo("DEV1", "servo1", "");
    let mut registry = FunctionRegistry::new();

    let buzzer = registry.find_buzzer(&hub, "DEV1.buzzer");
    let led = registry.find_color_led(&hub, "DEV1.led1");
    let servo = registry.find_servo(&hub, "DEV1.servo1");

    buzzer.borrow_mut().set_frequency(f64::NAN).unwrap();
    buzzer.borrow_mut().write_frequency(f64::NAN).unwrap();
    buzzer.borrow_mut().set_volume(INVALID_INT).unwrap();
    led.borrow_mut().set_blinking(Blinking::Invalid).unwrap();
    led.borrow_mut().write_blinking(Blinking::Invalid).unwrap();
    led.borrow_mut().write_rgb(INVALID_INT).unwrap();
    servo.borrow_mut().write_position(INVALID_INT).unwrap();
    servo.borrow_mut().set_enabled(Enabled::Invalid).unwrap();

    assert_eq!(buzzer_dev.borrow().base.writes, 0);
    assert_eq!(led_dev.borrow().base.writes, 0);
    assert_eq!(servo_dev.borrow().base.writes, 0);
}

#[test]
fn cache_gates_on_online() {
    let mut hub = SimHub::new();
    let device = hub.install_servo("DEV1", "servo1", "");
    let mut registry = FunctionRegistry::new();

    let proxy = registry.find_servo(&hub, "DEV1.servo1");
    device.borrow_mut().position = 250;
    hub.advertise("DEV1.servo1", "250");
    pump(&mut registry, &mut hub);
    assert_eq!(proxy.borrow().position(), 250);

    hub.detach("DEV1.servo1");
    pump(&mut registry, &mut hub);
    assert!(!proxy.borrow().core().is_online());
    // cached 250 is stale knowledge now, the sentinel comes back instead
    assert_eq!(proxy.borrow().position(), INVALID_INT);
    // offline writes are a quiet no-op
    proxy.borrow_mut().set_position(0).unwrap();
    assert_eq!(device.borrow().base.writes, 0);

    hub.reattach("DEV1.servo1");
    pump(&mut registry, &mut hub);
    assert_eq!(proxy.borrow().position(), 250);
}

#[test]
fn enum_shift_is_self_inverse() {
    for value in Blinking::iter().filter(|v| *v != Blinking::Invalid) {
        assert_eq!(Blinking::from_raw(value.to_raw()), value);
    }
    for value in Enabled::iter().filter(|v| *v != Enabled::Invalid) {
        assert_eq!(Enabled::from_raw(value.to_raw()), value);
    }
    for value in PowerOutput::iter().filter(|v| *v != PowerOutput::Invalid) {
        assert_eq!(PowerOutput::from_raw(value.to_raw()), value);
    }
    for value in TimeSet::iter().filter(|v| *v != TimeSet::Invalid) {
        assert_eq!(TimeSet::from_raw(value.to_raw()), value);
    }
    for value in Security::iter().filter(|v| *v != Security::Invalid) {
        assert_eq!(Security::from_raw(value.to_raw()), value);
    }
}

#[test]
fn public_enabled_forwards_shifted_ordinal() {
    // driver ordinals: -1 invalid, 0 off, 1 on
    // public ordinals: 0 invalid, 1 off, 2 on
    assert_eq!(Enabled::from_raw(-1), Enabled::Invalid);
    assert_eq!(Enabled::from_raw(0), Enabled::False);
    assert_eq!(Enabled::from_raw(1), Enabled::True);
    assert_eq!(Enabled::True as i16, 2);

    let mut hub = SimHub::new();
    let device = hub.install_servo("DEV1", "servo1", "");
    let mut registry = FunctionRegistry::new();
    let proxy = registry.find_servo(&hub, "DEV1.servo1");

    // setting public 2 must put driver 1 on the wire
    proxy.borrow_mut().set_enabled(Enabled::True).unwrap();
    assert_eq!(device.borrow().enabled, 1);
    assert_eq!(proxy.borrow().enabled(), Enabled::True);
    assert_eq!(proxy.borrow().read_enabled().unwrap(), Enabled::True);
}

#[test]
fn failed_write_through_leaves_cache() {
    let mut hub = SimHub::new();
    let device = hub.install_buzzer("DEV1", "buzzer", "");
    device.borrow_mut().frequency = 440.0;
    let mut registry = FunctionRegistry::new();
    let proxy = registry.find_buzzer(&hub, "DEV1.buzzer");
    assert_eq!(proxy.borrow().frequency(), 440.0);

    device.borrow_mut().base.fail_writes = true;
    let result = proxy.borrow_mut().set_frequency(523.0);
    assert!(matches!(result, Err(Error::Driver(_))));
    // driver first, cache second: a rejected write changes neither
    assert_eq!(proxy.borrow().frequency(), 440.0);
    assert_eq!(device.borrow().frequency, 440.0);
}

#[test]
fn empty_name_adopts_first_arrival() {
    let mut hub = SimHub::new();
    let mut registry = FunctionRegistry::new();

    let any = registry.find_buzzer(&hub, "");
    let same = registry.find_buzzer(&hub, "");
    assert!(Rc::ptr_eq(&any, &same));
    assert!(matches!(
        any.borrow().read_frequency(),
        Err(Error::NotConnected { .. })
    ));

    let device = hub.install_buzzer("DEV1", "buzzer", "");
    device.borrow_mut().frequency = 330.0;
    pump(&mut registry, &mut hub);

    assert!(any.borrow().core().is_online());
    assert_eq!(any.borrow().core().hardware_id(), "DEV1.buzzer");
    assert_eq!(any.borrow().frequency(), 330.0);
}

#[test]
fn config_changed_reloads_configuration_fields() {
    let mut hub = SimHub::new();
    let device = hub.install_buzzer("DEV1", "buzzer", "");
    let mut registry = FunctionRegistry::new();
    let proxy = registry.find_buzzer(&hub, "DEV1.buzzer");
    assert_eq!(proxy.borrow().volume(), 50);

    // the module reloaded its persisted settings behind our back
    device.borrow_mut().volume = 80;
    hub.announce_config_changed("DEV1");
    pump(&mut registry, &mut hub);

    assert_eq!(proxy.borrow().volume(), 80);
    assert!(proxy.borrow().core().is_online());
}

#[test]
fn advertisements_drive_derived_fields() {
    let mut hub = SimHub::new();
    hub.install_color_led("DEV1", "led1", "");
    hub.install_sensor("DEV1", "sensor1", "");
    let clock_dev = hub.install_realtime_clock("DEV1", "clock", "");
    clock_dev.borrow_mut().utc_offset = 3600;
    let mut registry = FunctionRegistry::new();

    let led = registry.find_color_led(&hub, "DEV1.led1");
    let sensor = registry.find_sensor(&hub, "DEV1.sensor1");
    let clock = registry.find_realtime_clock(&hub, "DEV1.clock");
    pump(&mut registry, &mut hub);

    hub.advertise("DEV1.led1", "0x00FF00");
    pump(&mut registry, &mut hub);
    assert_eq!(led.borrow().rgb(), 0x00FF00);
    assert_eq!(led.borrow().hsl(), 0x55FF80);

    hub.advertise("DEV1.sensor1", "18.5");
    hub.advertise("DEV1.sensor1", "21.0");
    pump(&mut registry, &mut hub);
    assert_eq!(sensor.borrow().current_value(), 21.0);
    assert_eq!(sensor.borrow().lowest_value(), 18.5);
    assert_eq!(sensor.borrow().highest_value(), 21.0);
    assert_eq!(sensor.borrow().unit(), "°C");

    // 2024-05-06 07:08:09 UTC, shown in the configured +01:00
    hub.advertise("DEV1.clock", "1714979289");
    pump(&mut registry, &mut hub);
    assert_eq!(clock.borrow().unix_time(), 1_714_979_289);
    assert_eq!(clock.borrow().date_time(), "2024/05/06 08:08:09");
}

#[test]
fn known_ids_enumerate_discovered_hardware() {
    let mut hub = SimHub::new();
    hub.install_sensor("DEV1", "sensor1", "");
    hub.install_sensor("DEV2", "sensor1", "cellar");
    let registry = FunctionRegistry::new();

    assert_eq!(
        registry.known_sensors(&hub),
        vec!["DEV1.sensor1".to_owned(), "DEV2.sensor1".to_owned()]
    );
    assert!(registry.known_buzzers(&hub).is_empty());
}

#[test]
fn value_updates_for_one_function_leave_others_alone() {
    let mut hub = SimHub::new();
    hub.install_sensor("DEV1", "sensor1", "");
    hub.install_sensor("DEV2", "sensor1", "");
    let mut registry = FunctionRegistry::new();
    let first = registry.find_sensor(&hub, "DEV1.sensor1");
    let second = registry.find_sensor(&hub, "DEV2.sensor1");
    pump(&mut registry, &mut hub);

    hub.advertise("DEV2.sensor1", "3.25");
    pump(&mut registry, &mut hub);
    assert_eq!(first.borrow().current_value(), 20.0);
    assert_eq!(second.borrow().current_value(), 3.25);
}

#[test]
fn power_supply_round_trip() {
    let mut hub = SimHub::new();
    let device = hub.install_power_supply("PSU1", "supply", "bench");
    let mut registry = FunctionRegistry::new();
    let proxy = registry.find_power_supply(&hub, "bench");

    proxy.borrow_mut().set_voltage_setpoint(12.0).unwrap();
    proxy.borrow_mut().set_power_output(PowerOutput::On).unwrap();
    assert_eq!(device.borrow().voltage_setpoint, 12.0);
    assert_eq!(device.borrow().power_output, 1);

    device.borrow_mut().measured_voltage = 11.98;
    hub.advertise("PSU1.supply", "11.98");
    pump(&mut registry, &mut hub);
    assert_eq!(proxy.borrow().measured_voltage(), 11.98);
    assert_eq!(proxy.borrow().read_measured_voltage().unwrap(), 11.98);
}
