//! Hijacker - splits an event's listeners into original and hijacked partitions.
//!
//! Once `name` is hijacked, every registration made through the hijacker for
//! `name` is stored on the host under `_hijack_<name>` instead. The host's own
//! dispatch is left alone, so:
//!
//! - `emit(name)` only reaches listeners registered before the hijack
//! - [`HijackEmit::emit`] only reaches listeners registered after it

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use tracing::debug;

use crate::config::{alias_name, property_name, slot_key};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::handler::{HandlerProperty, HandlerSlot};
use crate::listener::Listener;
use crate::value::Arg;

/// Hijacks `name` on `emitter`. See [`Hijacker::hijack`].
pub fn hijack<E: Emitter>(
    emitter: &Hijacker<E>,
    name: &str,
    final_listener: Option<Listener>,
) -> Result<HijackEmit<E>> {
    emitter.hijack(name, final_listener)
}

/// Interception state, created on the first hijack.
#[derive(Default)]
struct HijackState {
    /// Hijacked event names. Only ever grows.
    names: BTreeSet<String>,
    /// Shorthand handler slots keyed by `_hijack_on<name>`.
    slots: HashMap<String, HandlerSlot>,
}

struct Shared<E> {
    /// The wrapped emitter. Its operations are the originals every rewritten
    /// registration delegates to.
    host: E,
    state: RefCell<Option<HijackState>>,
}

/// An emitter whose registration operations rewrite hijacked event names.
///
/// Cloning yields another handle to the same emitter and state.
///
/// # Example
///
/// ```
/// use event_hijack::{Arg, Emitter, EventEmitter, Hijacker, Listener};
///
/// let emitter = Hijacker::new(EventEmitter::new());
/// emitter.on("test", Listener::new(|_| println!("original"))).unwrap();
///
/// let emit_test = emitter.hijack("test", None).unwrap();
/// emitter.on("test", Listener::new(|_| println!("hijacked"))).unwrap();
///
/// emitter.emit("test", &[]).unwrap(); // original
/// emit_test.emit(&[Arg::from(1)]).unwrap(); // hijacked
/// ```
pub struct Hijacker<E> {
    shared: Rc<Shared<E>>,
}

impl<E> Clone for Hijacker<E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<E: Emitter> Hijacker<E> {
    /// Wraps `host`. No name is rewritten until the first [`Hijacker::hijack`].
    pub fn new(host: E) -> Self {
        Self {
            shared: Rc::new(Shared {
                host,
                state: RefCell::new(None),
            }),
        }
    }

    /// The wrapped emitter, bypassing name rewriting.
    pub fn host(&self) -> &E {
        &self.shared.host
    }

    /// Returns true once interception state exists.
    pub fn is_set_up(&self) -> bool {
        self.shared.state.borrow().is_some()
    }

    /// Hijacks the event `name`.
    ///
    /// `final_listener`, if given, is registered on the host under the plain
    /// name before `name` is marked, so it joins the listeners fired by
    /// `emit(name)`. Also installs the shorthand handler property
    /// `on<name>` (see [`Hijacker::handler`]).
    ///
    /// Hijacking an already hijacked name registers `final_listener` again
    /// and leaves the handler slot in place.
    ///
    /// # Errors
    ///
    /// Propagates any error the host returns while registering
    /// `final_listener`.
    pub fn hijack(&self, name: &str, final_listener: Option<Listener>) -> Result<HijackEmit<E>> {
        debug!(event = name, "hijacking event");
        self.setup();

        if let Some(listener) = final_listener {
            self.shared.host.add_listener(name, listener)?;
        }

        self.with_state(|state| state.names.insert(name.to_string()));
        debug!(event = name, property = %property_name(name), "installed handler property");

        Ok(HijackEmit {
            emitter: self.clone(),
            name: name.to_string(),
            alias: alias_name(name),
        })
    }

    fn setup(&self) {
        let mut state = self.shared.state.borrow_mut();
        if state.is_some() {
            return;
        }
        debug!("setting up hijack state");
        *state = Some(HijackState::default());
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut HijackState) -> T) -> T {
        let mut state = self.shared.state.borrow_mut();
        f(state.get_or_insert_with(HijackState::default))
    }

    pub fn is_hijacked(&self, name: &str) -> bool {
        self.shared
            .state
            .borrow()
            .as_ref()
            .is_some_and(|state| state.names.contains(name))
    }

    /// Hijacked event names, sorted.
    pub fn hijacked_names(&self) -> Vec<String> {
        self.shared
            .state
            .borrow()
            .as_ref()
            .map(|state| state.names.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The `on<name>` shorthand handler property, if `name` is hijacked.
    pub fn handler(&self, name: &str) -> Option<HandlerProperty<E>> {
        self.is_hijacked(name)
            .then(|| HandlerProperty::new(self.clone(), name))
    }

    /// Names of all installed shorthand handler properties, e.g. `ondata`.
    pub fn handler_properties(&self) -> Vec<String> {
        self.hijacked_names()
            .iter()
            .map(|name| property_name(name))
            .collect()
    }

    pub(crate) fn with_slot<T>(&self, name: &str, f: impl FnOnce(Option<&HandlerSlot>) -> T) -> T {
        self.with_state(|state| f(state.slots.get(&slot_key(name))))
    }

    pub(crate) fn take_slot(&self, name: &str) -> Option<HandlerSlot> {
        self.with_state(|state| state.slots.remove(&slot_key(name)))
    }

    pub(crate) fn store_slot(&self, name: &str, slot: HandlerSlot) {
        self.with_state(|state| state.slots.insert(slot_key(name), slot));
    }

    /// Maps `name` to its alias if hijacked.
    fn rewrite<'a>(&self, op: &str, name: &'a str) -> Cow<'a, str> {
        if self.is_hijacked(name) {
            let alias = alias_name(name);
            debug!(op, event = name, alias = %alias, "renaming event");
            Cow::Owned(alias)
        } else {
            Cow::Borrowed(name)
        }
    }
}

impl<E: Emitter> Emitter for Hijacker<E> {
    fn add_listener(&self, name: &str, listener: Listener) -> Result<()> {
        let name = self.rewrite("on", name);
        self.shared.host.add_listener(&name, listener)
    }

    fn once(&self, name: &str, listener: Listener) -> Result<()> {
        let name = self.rewrite("once", name);
        self.shared.host.once(&name, listener)
    }

    fn remove_listener(&self, name: &str, listener: &Listener) -> Result<()> {
        let name = self.rewrite("remove_listener", name);
        self.shared.host.remove_listener(&name, listener)
    }

    fn emit(&self, name: &str, args: &[Arg]) -> Result<bool> {
        self.shared.host.emit(name, args)
    }

    fn listener_count(&self, name: &str) -> usize {
        self.shared.host.listener_count(name)
    }
}

/// Fires the hijacked listeners of one event.
///
/// Returned by [`Hijacker::hijack`]. Holds its emitter alive.
pub struct HijackEmit<E> {
    emitter: Hijacker<E>,
    name: String,
    alias: String,
}

impl<E> Clone for HijackEmit<E> {
    fn clone(&self) -> Self {
        Self {
            emitter: self.emitter.clone(),
            name: self.name.clone(),
            alias: self.alias.clone(),
        }
    }
}

impl<E: Emitter> HijackEmit<E> {
    /// Emits `args` to the hijacked listeners through the host's own `emit`.
    ///
    /// Returns whatever the host returns, normally whether any listener fired.
    pub fn emit(&self, args: &[Arg]) -> Result<bool> {
        debug!(event = %self.name, alias = %self.alias, "emitting hijacked event");
        self.emitter.host().emit(&self.alias, args)
    }

    /// The user-facing event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The internal name the hijacked listeners are stored under.
    pub fn alias(&self) -> &str {
        &self.alias
    }
}
