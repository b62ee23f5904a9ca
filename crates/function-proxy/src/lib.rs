//! Cache-and-forward proxies over the hardware driver library.
//!
//! Every module here wraps one kind of device function (buzzer, color led,
//! servo, ...) behind the same lifecycle: a [`FunctionRegistry`] lookup
//! returns a proxy that may not have hardware behind it yet, the proxy binds
//! to a driver object once the hardware is discovered, and advertised-value
//! notifications keep a small cache warm for synchronous reads.
//!
//! Per attribute there are two access styles:
//! - `read_x()` / `write_x(v)` forward straight to the driver and error with
//!   [`Error::NotConnected`] while unbound
//! - `x()` / `set_x(v)` go through the cache: reads never touch the driver
//!   and yield the type's sentinel while offline, writes forward only when
//!   the value actually changes
//!
//! This layer is single threaded: proxies and driver handles are
//! `Rc<RefCell<_>>`. The embedding application delivers the driver's
//! notifications on the same thread that calls the accessors.

pub use buzzer::BuzzerProxy;
pub use clock::{RealtimeClockProxy, TimeSet};
pub use crate::core::ProxyCore;
pub use error::Error;
pub use finder::FunctionRegistry;
pub use led::{Blinking, ColorLedProxy};
pub use parse::ParseError;
pub use power_supply::{PowerOutput, PowerSupplyProxy};
pub use registry::{FunctionProxy, ProxyTable, SharedProxy};
pub use sensor::SensorProxy;
pub use servo::{Enabled, ServoProxy};
pub use value::{AttrValue, INVALID_INT};
pub use wireless::{Security, WirelessProxy};

mod buzzer;
mod clock;
mod conversion;
mod core;
mod error;
mod finder;
mod led;
mod parse;
mod power_supply;
mod registry;
mod sensor;
mod servo;
mod value;
mod wireless;

#[cfg(test)]
mod tests;
