//! Vocabulary shared between the proxy layer and the wrapped driver library.
//!
//! The real driver (USB/network transport, discovery, firmware protocol)
//! lives outside this workspace. Everything the proxy layer needs from it is
//! captured here as traits: a base [`FunctionDriver`] surface, one trait per
//! function kind in [`functions`], and the [`Enumerate`] resolution seam the
//! registry uses to turn names into live driver objects.
//!
//! Driver handles are `Rc<RefCell<_>>` ([`DriverRef`]): the whole layer is
//! single threaded and cooperative. Notification delivery and accessor calls
//! must be serialized by the embedding application, which `!Send` handles
//! enforce at compile time.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub mod functions;

pub use functions::{
    BuzzerDriver, ColorLedDriver, PowerSupplyDriver, RealtimeClockDriver,
    SensorDriver, ServoDriver, WirelessDriver,
};

/// Shared handle to a driver-owned function object. The driver layer owns
/// the strong reference for the lifetime of the process; proxies hold weak
/// ones.
pub type DriverRef<D> = Rc<RefCell<D>>;

/// Reserved values the driver layer returns for attributes it does not
/// know (yet). The proxy layer translates these into its own public
/// sentinels at the boundary.
pub mod raw {
    /// Floating point attributes.
    pub const INVALID_F64: f64 = f64::MIN;
    /// Integer attributes.
    pub const INVALID_I64: i64 = i32::MIN as i64;
    /// String attributes.
    pub const INVALID_STRING: &str = "!INVALID!";
    /// Enum attributes: -1 is unknown, valid ordinals start at 0.
    pub const INVALID_ORDINAL: i16 = -1;
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
pub enum FunctionKind {
    Buzzer,
    ColorLed,
    Servo,
    PowerSupply,
    Sensor,
    RealtimeClock,
    Wireless,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("transport failure while talking to the module: {0}")]
    Transport(String),
    #[error("device rejected the command: {0}")]
    Rejected(String),
    #[error("module is no longer reachable")]
    Unreachable,
}

/// Every attribute and method below the per-kind traits shares this
/// surface. Identity and reachability are cheap bookkeeping reads inside
/// the driver, never I/O.
pub trait FunctionDriver: std::fmt::Debug {
    /// `SERIAL.function`, unique per hardware function.
    fn hardware_id(&self) -> String;
    /// User-assigned name, empty while none is configured.
    fn logical_name(&self) -> String;
    fn is_online(&self) -> bool;
    fn kind(&self) -> FunctionKind;
}

/// Resolution seam per function kind: the driver library knows which
/// hardware exists, the registry asks. `name` resolution accepts a
/// hardware id as well as a logical name.
pub trait Enumerate<D: ?Sized> {
    fn find_by_id(&self, name: &str) -> Option<DriverRef<D>>;
    fn first(&self) -> Option<DriverRef<D>>;
    fn next_after(&self, current: &DriverRef<D>) -> Option<DriverRef<D>>;
}

/// Umbrella over the per-kind [`Enumerate`] seams. The registry resolves
/// every kind against one of these; the simulated hub implements it, as
/// would a binding to the real driver library.
pub trait DriverHub:
    Enumerate<dyn BuzzerDriver>
    + Enumerate<dyn ColorLedDriver>
    + Enumerate<dyn ServoDriver>
    + Enumerate<dyn PowerSupplyDriver>
    + Enumerate<dyn SensorDriver>
    + Enumerate<dyn RealtimeClockDriver>
    + Enumerate<dyn WirelessDriver>
{
}

impl<T> DriverHub for T where
    T: Enumerate<dyn BuzzerDriver>
        + Enumerate<dyn ColorLedDriver>
        + Enumerate<dyn ServoDriver>
        + Enumerate<dyn PowerSupplyDriver>
        + Enumerate<dyn SensorDriver>
        + Enumerate<dyn RealtimeClockDriver>
        + Enumerate<dyn WirelessDriver>
{
}

/// One event from the driver's notification channel. Delivery order is the
/// driver's, the proxy layer never reorders or retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The function became reachable.
    Arrival {
        kind: FunctionKind,
        hardware_id: String,
    },
    /// The module's persisted configuration was reloaded.
    ConfigChanged { serial: String },
    /// The device reported a change to its advertised value. `value` is the
    /// kind-specific string encoding.
    ValueChanged {
        kind: FunctionKind,
        hardware_id: String,
        value: String,
    },
    /// The function dropped off the bus.
    Removal {
        kind: FunctionKind,
        hardware_id: String,
    },
}
