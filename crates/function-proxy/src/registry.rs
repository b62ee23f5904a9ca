//! Generic per-kind registry: resolves names to proxies, guarantees at most
//! one proxy per hardware function, and routes the driver's notifications
//! into the lifecycle hooks. The map from driver-object identity to proxy
//! lives here as a side table instead of an opaque payload slot on the
//! driver object.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use driver_api::{DriverRef, Enumerate, FunctionDriver};
use tracing::{debug, warn};

use crate::core::ProxyCore;

/// One device-function proxy. Built by the registry, driven by the
/// lifecycle hooks, read through its accessor surface.
pub trait FunctionProxy {
    type Driver: ?Sized + FunctionDriver;

    fn new(instantiation_name: &str) -> Self;
    fn core(&self) -> &ProxyCore<Self::Driver>;
    fn core_mut(&mut self) -> &mut ProxyCore<Self::Driver>;

    /// Hardware became reachable: populate the cache by direct driver
    /// queries, then flip online.
    fn arrival(&mut self);
    /// Module configuration reloaded: re-read configuration-class fields.
    /// Leaves `online` alone.
    fn config_changed(&mut self);
    /// Asynchronous advertised-value update. Pure parse-and-cache; must
    /// never query back into the driver.
    fn value_changed(&mut self, advertised: &str);
}

pub type SharedProxy<P> = Rc<RefCell<P>>;

pub struct ProxyTable<P: FunctionProxy> {
    entries: Vec<SharedProxy<P>>,
    /// driver object identity -> proxy
    by_driver: HashMap<*const (), SharedProxy<P>>,
}

fn thin_ptr<D: ?Sized>(driver: &DriverRef<D>) -> *const () {
    Rc::as_ptr(driver).cast::<()>()
}

impl<P: FunctionProxy> Default for ProxyTable<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_driver: HashMap::new(),
        }
    }
}

impl<P: FunctionProxy> ProxyTable<P> {
    /// Resolve `name` to a proxy, creating one on first use. The empty name
    /// asks for "any instance of this kind not yet known by name". Never
    /// fails: without matching hardware an unbound proxy comes back, whose
    /// direct accessors error until the hardware appears.
    ///
    /// Idempotent: the same identity always yields the same instance.
    pub fn find_by_name<E>(&mut self, hub: &E, name: &str) -> SharedProxy<P>
    where
        E: ?Sized + Enumerate<P::Driver>,
    {
        if name.is_empty() {
            if let Some(existing) = self.entries.iter().find(|proxy| {
                let proxy = proxy.borrow();
                proxy.core().instantiation_name().is_empty()
                    && !proxy.core().is_bound()
            }) {
                return Rc::clone(existing);
            }
            if let Some(existing) = self
                .entries
                .iter()
                .find(|proxy| proxy.borrow().core().is_bound())
            {
                return Rc::clone(existing);
            }
        } else if let Some(existing) = self
            .entries
            .iter()
            .find(|proxy| proxy.borrow().core().matches(name))
        {
            return Rc::clone(existing);
        }

        let driver = if name.is_empty() {
            hub.first()
        } else {
            hub.find_by_id(name)
        };

        // the driver object may already carry a proxy from an earlier
        // lookup under another name
        if let Some(driver) = &driver {
            if let Some(attached) = self.by_driver.get(&thin_ptr(driver)) {
                return Rc::clone(attached);
            }
        }

        let proxy = Rc::new(RefCell::new(P::new(name)));
        self.entries.push(Rc::clone(&proxy));
        match driver {
            Some(driver) => {
                proxy.borrow_mut().core_mut().bind(&driver);
                self.by_driver.insert(thin_ptr(&driver), Rc::clone(&proxy));
                if driver.borrow().is_online() {
                    proxy.borrow_mut().arrival();
                }
            }
            None => {
                debug!(name, "no matching hardware yet, returning unbound proxy");
            }
        }
        proxy
    }

    /// Hardware ids of every instance of this kind the driver layer
    /// currently knows, in enumeration order.
    pub fn known_ids<E>(&self, hub: &E) -> Vec<String>
    where
        E: ?Sized + Enumerate<P::Driver>,
    {
        let mut ids = Vec::new();
        let mut current = hub.first();
        while let Some(driver) = current {
            ids.push(driver.borrow().hardware_id());
            current = hub.next_after(&driver);
        }
        ids
    }

    pub(crate) fn handle_arrival<E>(&mut self, hub: &E, hardware_id: &str)
    where
        E: ?Sized + Enumerate<P::Driver>,
    {
        let Some(driver) = hub.find_by_id(hardware_id) else {
            warn!(
                hardware_id,
                "arrival for hardware the driver cannot resolve"
            );
            return;
        };

        if let Some(attached) = self.by_driver.get(&thin_ptr(&driver)) {
            let attached = Rc::clone(attached);
            attached.borrow_mut().core_mut().bind(&driver);
            attached.borrow_mut().arrival();
            return;
        }

        let logical_name = driver.borrow().logical_name();
        let adopter = self
            .entries
            .iter()
            .find(|proxy| {
                let name = proxy.borrow().core().instantiation_name().to_owned();
                name == hardware_id
                    || (!logical_name.is_empty() && name == logical_name)
            })
            .or_else(|| {
                // an "any instance" proxy waiting for whatever shows up
                self.entries.iter().find(|proxy| {
                    let proxy = proxy.borrow();
                    proxy.core().instantiation_name().is_empty()
                        && !proxy.core().is_bound()
                })
            })
            .map(Rc::clone);

        let Some(proxy) = adopter else {
            debug!(hardware_id, "arrival for hardware nobody asked for yet");
            return;
        };
        proxy.borrow_mut().core_mut().bind(&driver);
        self.by_driver.insert(thin_ptr(&driver), Rc::clone(&proxy));
        proxy.borrow_mut().arrival();
    }

    pub(crate) fn handle_config_changed(&mut self, serial: &str) {
        let prefix = format!("{serial}.");
        for proxy in &self.entries {
            let is_ours =
                proxy.borrow().core().hardware_id().starts_with(&prefix);
            if is_ours {
                proxy.borrow_mut().config_changed();
            }
        }
    }

    pub(crate) fn handle_value_changed(&mut self, hardware_id: &str, value: &str) {
        for proxy in &self.entries {
            let is_ours = proxy.borrow().core().hardware_id() == hardware_id;
            if is_ours {
                proxy.borrow_mut().value_changed(value);
            }
        }
    }

    pub(crate) fn handle_removal(&mut self, hardware_id: &str) {
        for proxy in &self.entries {
            let is_ours = proxy.borrow().core().hardware_id() == hardware_id;
            if is_ours {
                proxy.borrow_mut().core_mut().mark_detached();
            }
        }
    }
}
