use function_proxy::FunctionRegistry;
use sim_hub::SimHub;

const FIXTURE: &str = r#"(
    modules: [
        (serial: "DEV1", functions: [
            (kind: Buzzer, id: "buzzer", logical_name: "doorbell"),
            (kind: ColorLed, id: "led1"),
        ]),
    ],
)"#;

fn main() {
    logger::tracing::setup();

    let mut hub = SimHub::from_ron(FIXTURE).unwrap();
    let mut registry = FunctionRegistry::new();

    let buzzer = registry.find_buzzer(&hub, "doorbell");
    for event in hub.drain_events() {
        registry.handle(&hub, event);
    }

    println!("known buzzers: {:?}", registry.known_buzzers(&hub));

    buzzer.borrow_mut().set_frequency(440.0).unwrap();
    buzzer.borrow_mut().pulse(880.0, 250).unwrap();
    println!("buzzer now at {} Hz", buzzer.borrow().frequency());

    let led = registry.find_color_led(&hub, "DEV1.led1");
    led.borrow_mut().set_rgb(0x1E90FF).unwrap();
    println!(
        "led color 0x{:06X}, hsl mirror 0x{:06X}",
        led.borrow().rgb(),
        led.borrow().hsl()
    );

    hub.detach("DEV1.buzzer");
    for event in hub.drain_events() {
        registry.handle(&hub, event);
    }
    println!(
        "after detach the cache gates itself: frequency = {}",
        buzzer.borrow().frequency()
    );
}
