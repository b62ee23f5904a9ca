//! The bindable half every proxy is built from, plus the guarded
//! cached-property helpers. Composition instead of a proxy class hierarchy:
//! each function kind owns a [`ProxyCore`] and its own cache fields.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use driver_api::{DriverError, DriverRef, FunctionDriver, FunctionKind};
use tracing::{trace, warn};

use crate::error::Error;
use crate::value::AttrValue;

#[derive(Debug)]
pub struct ProxyCore<D: ?Sized + FunctionDriver> {
    /// Name the proxy was looked up under; stable for its whole life.
    instantiation_name: String,
    kind: FunctionKind,
    /// The driver layer owns the function object, we only borrow it.
    bound: Option<Weak<RefCell<D>>>,
    online: bool,
    // identity cached at arrival so lookups and logs work offline
    hardware_id: String,
    logical_name: String,
}

impl<D: ?Sized + FunctionDriver> ProxyCore<D> {
    pub(crate) fn new(instantiation_name: &str, kind: FunctionKind) -> Self {
        Self {
            instantiation_name: instantiation_name.to_owned(),
            kind,
            bound: None,
            online: false,
            hardware_id: String::new(),
            logical_name: String::new(),
        }
    }

    #[must_use]
    pub fn instantiation_name(&self) -> &str {
        &self.instantiation_name
    }

    /// `SERIAL.function` of the bound hardware, empty before first arrival.
    #[must_use]
    pub fn hardware_id(&self) -> &str {
        &self.hardware_id
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
            .as_ref()
            .is_some_and(|driver| driver.strong_count() > 0)
    }

    pub(crate) fn display_name(&self) -> String {
        if !self.hardware_id.is_empty() {
            self.hardware_id.clone()
        } else if !self.instantiation_name.is_empty() {
            self.instantiation_name.clone()
        } else {
            format!("<any {}>", self.kind)
        }
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        name == self.instantiation_name
            || (!self.hardware_id.is_empty() && name == self.hardware_id)
            || (!self.logical_name.is_empty() && name == self.logical_name)
    }

    /// Attach to a driver object. Idempotent: rebinding to the object
    /// already held keeps all state, a different object resets `online`
    /// until the next arrival.
    pub(crate) fn bind(&mut self, driver: &DriverRef<D>) {
        if let Some(old) = self.bound.as_ref().and_then(Weak::upgrade) {
            if Rc::as_ptr(&old).cast::<()>() == Rc::as_ptr(driver).cast::<()>() {
                return;
            }
        }
        trace!(function = %self.display_name(), "binding to driver object");
        self.bound = Some(Rc::downgrade(driver));
        self.online = false;
    }

    /// Arrival tail: cache the identity and flip online. Field population
    /// is the owning proxy's job and must happen before this.
    pub(crate) fn mark_arrived(&mut self) {
        if let Ok((hardware_id, logical_name)) =
            self.with_driver(|d| (d.hardware_id(), d.logical_name()))
        {
            self.hardware_id = hardware_id;
            self.logical_name = logical_name;
        }
        self.online = true;
        trace!(function = %self.display_name(), "function arrived");
    }

    pub(crate) fn mark_detached(&mut self) {
        self.online = false;
        trace!(function = %self.display_name(), "function detached");
    }

    /// Forward a read to the driver, [`Error::NotConnected`] while unbound.
    pub(crate) fn with_driver<R>(
        &self,
        call: impl FnOnce(&D) -> R,
    ) -> Result<R, Error> {
        let driver = self
            .bound
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::NotConnected {
                function: self.display_name(),
            })?;
        let result = call(&driver.borrow());
        Ok(result)
    }

    /// Forward a write or action to the driver, [`Error::NotConnected`]
    /// while unbound.
    pub(crate) fn with_driver_mut<R>(
        &self,
        call: impl FnOnce(&mut D) -> R,
    ) -> Result<R, Error> {
        let driver = self
            .bound
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::NotConnected {
                function: self.display_name(),
            })?;
        let result = call(&mut driver.borrow_mut());
        Ok(result)
    }

    /// Population query used by the lifecycle hooks: a failure keeps the
    /// cache at `fallback` (the raw sentinel) and is only logged, the hook
    /// itself never fails.
    pub(crate) fn query_or<T>(
        &self,
        fallback: T,
        get: impl FnOnce(&D) -> Result<T, DriverError>,
    ) -> T {
        match self.with_driver(get) {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                warn!(
                    function = %self.display_name(),
                    "population query failed: {err}"
                );
                fallback
            }
            Err(_) => fallback,
        }
    }
}

/// Cached-property read: the cache is only meaningful while online,
/// otherwise the sentinel comes back no matter what was cached.
pub(crate) fn read_cached<D, T>(core: &ProxyCore<D>, cache: &T) -> T
where
    D: ?Sized + FunctionDriver,
    T: AttrValue,
{
    if core.is_online() {
        cache.clone()
    } else {
        T::invalid()
    }
}

/// Cached-property write-through. No-ops (reporting success) on a sentinel
/// input, while unbound or offline, and when the value is already cached.
/// Otherwise the driver write happens first and the cache follows only once
/// it succeeded; a failed write surfaces the driver error and leaves the
/// cache as it was.
pub(crate) fn write_cached<D, T>(
    core: &ProxyCore<D>,
    cache: &mut T,
    new: T,
    forward: impl FnOnce(&mut D, &T) -> Result<(), DriverError>,
) -> Result<(), Error>
where
    D: ?Sized + FunctionDriver,
    T: AttrValue,
{
    if new.is_invalid() {
        return Ok(());
    }
    if !core.is_bound() || !core.is_online() {
        return Ok(());
    }
    if *cache == new {
        trace!(function = %core.display_name(), "value already current, skipping write");
        return Ok(());
    }
    core.with_driver_mut(|driver| forward(driver, &new))??;
    *cache = new;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use driver_api::raw;

    #[derive(Debug)]
    struct FakeDriver {
        online: bool,
        level: i64,
    }

    impl FunctionDriver for FakeDriver {
        fn hardware_id(&self) -> String {
            "FAKE01.sensor1".to_owned()
        }
        fn logical_name(&self) -> String {
            "cellar".to_owned()
        }
        fn is_online(&self) -> bool {
            self.online
        }
        fn kind(&self) -> FunctionKind {
            FunctionKind::Sensor
        }
    }

    fn fake() -> DriverRef<FakeDriver> {
        Rc::new(RefCell::new(FakeDriver {
            online: true,
            level: 7,
        }))
    }

    #[test]
    fn unbound_access_is_not_connected() {
        let core: ProxyCore<FakeDriver> =
            ProxyCore::new("FAKE01.sensor1", FunctionKind::Sensor);
        let res = core.with_driver(|d| d.level);
        assert!(matches!(res, Err(Error::NotConnected { .. })));
    }

    #[test]
    fn rebinding_the_same_object_keeps_online() {
        let driver = fake();
        let mut core: ProxyCore<FakeDriver> =
            ProxyCore::new("", FunctionKind::Sensor);
        core.bind(&driver);
        core.mark_arrived();
        assert!(core.is_online());

        core.bind(&driver);
        assert!(core.is_online());

        let other = fake();
        core.bind(&other);
        assert!(!core.is_online());
    }

    #[test]
    fn arrival_caches_identity_for_offline_matching() {
        let driver = fake();
        let mut core: ProxyCore<FakeDriver> =
            ProxyCore::new("cellar", FunctionKind::Sensor);
        core.bind(&driver);
        core.mark_arrived();
        core.mark_detached();

        assert!(core.matches("cellar"));
        assert!(core.matches("FAKE01.sensor1"));
        assert!(!core.matches("FAKE01.sensor2"));
    }

    #[test]
    fn guarded_write_skips_sentinel_offline_and_unchanged() {
        let driver = fake();
        let mut core: ProxyCore<FakeDriver> =
            ProxyCore::new("", FunctionKind::Sensor);
        let mut cache = 7_i64;

        // offline: nothing forwarded
        core.bind(&driver);
        write_cached(&core, &mut cache, 9, |d, v| {
            d.level = *v;
            Ok(())
        })
        .unwrap();
        assert_eq!(driver.borrow().level, 7);

        core.mark_arrived();
        write_cached(&core, &mut cache, crate::value::INVALID_INT, |d, v| {
            d.level = *v;
            Ok(())
        })
        .unwrap();
        assert_eq!(driver.borrow().level, 7);

        write_cached(&core, &mut cache, 7, |d, v| {
            d.level = *v;
            Ok(())
        })
        .unwrap();
        assert_eq!(driver.borrow().level, 7);

        write_cached(&core, &mut cache, 9, |d, v| {
            d.level = *v;
            Ok(())
        })
        .unwrap();
        assert_eq!(driver.borrow().level, 9);
        assert_eq!(cache, 9);
    }

    #[test]
    fn failed_forward_leaves_the_cache() {
        let driver = fake();
        let mut core: ProxyCore<FakeDriver> =
            ProxyCore::new("", FunctionKind::Sensor);
        core.bind(&driver);
        core.mark_arrived();

        let mut cache = 7_i64;
        let res = write_cached(&core, &mut cache, 9, |_, _| {
            Err(DriverError::Rejected("nope".to_owned()))
        });
        assert!(matches!(res, Err(Error::Driver(_))));
        assert_eq!(cache, 7);
    }

    #[test]
    fn query_or_falls_back_on_driver_failure() {
        let driver = fake();
        let mut core: ProxyCore<FakeDriver> =
            ProxyCore::new("", FunctionKind::Sensor);
        assert_eq!(core.query_or(raw::INVALID_I64, |d| Ok(d.level)), raw::INVALID_I64);

        core.bind(&driver);
        assert_eq!(core.query_or(raw::INVALID_I64, |d| Ok(d.level)), 7);
        assert_eq!(
            core.query_or(raw::INVALID_I64, |_| Err(DriverError::Unreachable)),
            raw::INVALID_I64
        );
    }
}
