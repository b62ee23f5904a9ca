use std::thread::sleep;
use std::time::Duration;

use function_proxy::FunctionRegistry;
use sim_hub::SimHub;

fn main() {
    logger::tracing::setup();

    let mut hub = SimHub::new();
    let device = hub.install_sensor("DEV1", "sensor1", "office");
    let mut registry = FunctionRegistry::new();

    let sensor = registry.find_sensor(&hub, "office");
    for event in hub.drain_events() {
        registry.handle(&hub, event);
    }

    for _ in 0..10 {
        let reading = device.borrow_mut().drift();
        hub.advertise("DEV1.sensor1", format!("{reading:.2}"));
        for event in hub.drain_events() {
            registry.handle(&hub, event);
        }

        let sensor = sensor.borrow();
        println!(
            "{:.2} {} (min {:.2}, max {:.2})",
            sensor.current_value(),
            sensor.unit(),
            sensor.lowest_value(),
            sensor.highest_value()
        );
        drop(sensor);

        sleep(Duration::from_millis(200));
    }
}
