//! Host event emitter with named listener lists and synchronous dispatch.
//!
//! `Emitter` is the capability set the hijack layer builds on. `EventEmitter`
//! is the stock implementation:
//! - Listeners fire in registration order
//! - Dispatch runs over a snapshot, so listeners may add or remove listeners
//! - `once` registrations are dropped right before their only invocation
//! - An `"error"` event with nobody listening is returned as an error

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{trace, warn};

use crate::config::EmitterConfig;
use crate::error::{EmitterError, Result};
use crate::listener::Listener;
use crate::value::Arg;

/// Event name that fails loudly when emitted without listeners.
pub const ERROR_EVENT: &str = "error";

/// Listener registration and dispatch operations.
pub trait Emitter {
    /// Appends `listener` to the list for `name`.
    fn add_listener(&self, name: &str, listener: Listener) -> Result<()>;

    /// Alias of [`Emitter::add_listener`].
    fn on(&self, name: &str, listener: Listener) -> Result<()> {
        self.add_listener(name, listener)
    }

    /// Appends `listener` for a single invocation.
    fn once(&self, name: &str, listener: Listener) -> Result<()>;

    /// Removes the most recent registration of `listener` for `name`.
    fn remove_listener(&self, name: &str, listener: &Listener) -> Result<()>;

    /// Invokes every listener registered for exactly `name`.
    ///
    /// Returns `true` if at least one listener fired.
    fn emit(&self, name: &str, args: &[Arg]) -> Result<bool>;

    /// Number of listeners registered for exactly `name`.
    fn listener_count(&self, name: &str) -> usize;
}

impl<E: Emitter + ?Sized> Emitter for Rc<E> {
    fn add_listener(&self, name: &str, listener: Listener) -> Result<()> {
        (**self).add_listener(name, listener)
    }

    fn on(&self, name: &str, listener: Listener) -> Result<()> {
        (**self).on(name, listener)
    }

    fn once(&self, name: &str, listener: Listener) -> Result<()> {
        (**self).once(name, listener)
    }

    fn remove_listener(&self, name: &str, listener: &Listener) -> Result<()> {
        (**self).remove_listener(name, listener)
    }

    fn emit(&self, name: &str, args: &[Arg]) -> Result<bool> {
        (**self).emit(name, args)
    }

    fn listener_count(&self, name: &str) -> usize {
        (**self).listener_count(name)
    }
}

#[derive(Clone)]
struct Registration {
    listener: Listener,
    once: bool,
}

/// Single-threaded event emitter.
pub struct EventEmitter {
    /// Listener lists keyed by exact event name. Empty lists are removed.
    listeners: RefCell<HashMap<String, Vec<Registration>>>,
    max_listeners: Cell<usize>,
    /// Names that already produced a leak warning.
    warned: RefCell<HashSet<String>>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::with_config(&EmitterConfig::default())
    }
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &EmitterConfig) -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
            max_listeners: Cell::new(config.max_listeners),
            warned: RefCell::new(HashSet::new()),
        }
    }

    /// Sets the per-event listener count above which a leak warning is logged.
    /// `0` disables the warning.
    pub fn set_max_listeners(&self, max: usize) {
        self.max_listeners.set(max);
    }

    pub fn max_listeners(&self) -> usize {
        self.max_listeners.get()
    }

    /// Listeners registered for exactly `name`, in dispatch order.
    pub fn listeners(&self, name: &str) -> Vec<Listener> {
        self.listeners
            .borrow()
            .get(name)
            .map(|regs| regs.iter().map(|r| r.listener.clone()).collect())
            .unwrap_or_default()
    }

    /// Names that currently have at least one listener, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.listeners.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Removes every listener for `name`, or for all events when `None`.
    pub fn remove_all_listeners(&self, name: Option<&str>) {
        let mut listeners = self.listeners.borrow_mut();
        match name {
            Some(name) => {
                listeners.remove(name);
            }
            None => listeners.clear(),
        }
    }

    fn register(&self, name: &str, listener: Listener, once: bool) {
        let count = {
            let mut listeners = self.listeners.borrow_mut();
            let list = listeners.entry(name.to_string()).or_default();
            list.push(Registration { listener, once });
            list.len()
        };
        trace!(event = name, count, once, "listener added");

        let max = self.max_listeners.get();
        if max > 0 && count > max && self.warned.borrow_mut().insert(name.to_string()) {
            warn!(
                event = name,
                count, max, "possible listener leak: more listeners than max_listeners"
            );
        }
    }

    /// Drops the registration `pick` selects from the list for `name`.
    fn unregister(
        &self,
        name: &str,
        pick: impl FnOnce(&[Registration]) -> Option<usize>,
    ) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(name) else {
            return false;
        };
        let Some(index) = pick(list.as_slice()) else {
            return false;
        };
        list.remove(index);
        if list.is_empty() {
            listeners.remove(name);
        }
        true
    }
}

impl Emitter for EventEmitter {
    fn add_listener(&self, name: &str, listener: Listener) -> Result<()> {
        self.register(name, listener, false);
        Ok(())
    }

    fn once(&self, name: &str, listener: Listener) -> Result<()> {
        self.register(name, listener, true);
        Ok(())
    }

    fn remove_listener(&self, name: &str, listener: &Listener) -> Result<()> {
        let removed = self.unregister(name, |list| {
            list.iter().rposition(|r| r.listener == *listener)
        });
        trace!(event = name, removed, "remove listener");
        Ok(())
    }

    fn emit(&self, name: &str, args: &[Arg]) -> Result<bool> {
        let snapshot = self
            .listeners
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default();

        if snapshot.is_empty() {
            if name == ERROR_EVENT {
                let detail = args
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "undefined".to_string());
                return Err(EmitterError::UnhandledError(detail));
            }
            trace!(event = name, "emit with no listeners");
            return Ok(false);
        }

        trace!(event = name, listeners = snapshot.len(), args = args.len(), "emit");
        for reg in snapshot {
            if reg.once {
                self.unregister(name, |list| {
                    list.iter()
                        .position(|r| r.once && r.listener == reg.listener)
                });
            }
            reg.listener.call(args);
        }
        Ok(true)
    }

    fn listener_count(&self, name: &str) -> usize {
        self.listeners.borrow().get(name).map_or(0, Vec::len)
    }
}
