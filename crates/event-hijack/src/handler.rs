//! Shorthand `on<name>` handler properties for hijacked events.
//!
//! Assigning a handler attaches an adapter to the hijacked partition of the
//! event, replacing whatever handler was assigned before. Reading the property
//! never returns the handler.
//!
//! The adapter special-cases `data`-style events: a single buffer argument is
//! expanded to `(buffer, 0, buffer.len())`.

use tracing::debug;

use crate::config::property_name;
use crate::emitter::Emitter;
use crate::error::Result;
use crate::hijacker::Hijacker;
use crate::listener::Listener;
use crate::value::Arg;

/// The currently assigned handler and the adapter registered for it.
pub(crate) struct HandlerSlot {
    value: Listener,
    adapter: Listener,
}

/// Accessor for the `on<name>` shorthand handler of a hijacked event.
///
/// Obtained from [`Hijacker::handler`]. Every accessor for the same event
/// addresses the same slot.
pub struct HandlerProperty<E> {
    emitter: Hijacker<E>,
    event: String,
}

impl<E: Emitter> HandlerProperty<E> {
    pub(crate) fn new(emitter: Hijacker<E>, event: &str) -> Self {
        Self {
            emitter,
            event: event.to_string(),
        }
    }

    /// Property name, e.g. `ondata`.
    pub fn name(&self) -> String {
        property_name(&self.event)
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Always `None`, whatever was assigned last.
    pub fn get(&self) -> Option<Listener> {
        debug!(property = %self.name(), "get: returning None");
        None
    }

    /// Assigns the shorthand handler.
    ///
    /// Detaches the adapter of the previous handler, if any. With `Some`,
    /// attaches an adapter for the new handler to the hijacked partition and
    /// returns the handler. With `None`, only detaches.
    ///
    /// # Errors
    ///
    /// Propagates host errors from detaching or attaching the adapter.
    pub fn set(&self, value: Option<Listener>) -> Result<Option<Listener>> {
        let kind = if value.is_some() { "handler" } else { "none" };
        debug!(property = %self.name(), value = kind, "set");

        let previous = self
            .emitter
            .with_slot(&self.event, |slot| slot.map(|s| s.adapter.clone()));
        if let Some(previous) = previous {
            // `event` is hijacked, so this detaches from the alias list.
            // The slot keeps the adapter until the host has let go of it.
            self.emitter.remove_listener(&self.event, &previous)?;
            self.emitter.take_slot(&self.event);
        }

        let Some(value) = value else {
            return Ok(None);
        };

        let adapter = adapter_for(value.clone());
        self.emitter.on(&self.event, adapter.clone())?;

        let slot = HandlerSlot { value, adapter };
        let assigned = slot.value.clone();
        self.emitter.store_slot(&self.event, slot);
        Ok(Some(assigned))
    }
}

/// Wraps `handler` so a lone buffer argument arrives as `(buffer, 0, len)`.
fn adapter_for(handler: Listener) -> Listener {
    Listener::new(move |args| {
        if let [single] = args {
            if let Some(buf) = single.as_buffer() {
                return handler.call(&[Arg::Buffer(buf.clone()), Arg::Int(0), Arg::from(buf.len())]);
            }
        }
        handler.call(args)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::EventEmitter;
    use crate::error::EmitterError;
    use crate::test_support::FlakyEmitter;
    use crate::value::Buffer;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<Vec<Arg>>>>;

    fn capture(calls: &Calls) -> Listener {
        let calls = calls.clone();
        Listener::new(move |args| calls.borrow_mut().push(args.to_vec()))
    }

    fn make_emitter(name: &str) -> Hijacker<EventEmitter> {
        let emitter = Hijacker::new(EventEmitter::new());
        emitter.hijack(name, None).unwrap();
        emitter
    }

    #[test]
    fn test_property_name() {
        let emitter = make_emitter("data");
        let prop = emitter.handler("data").unwrap();
        assert_eq!(prop.name(), "ondata");
        assert_eq!(prop.event(), "data");
    }

    #[test]
    fn test_get_always_none() {
        let emitter = make_emitter("test");
        let prop = emitter.handler("test").unwrap();
        assert!(prop.get().is_none());

        let calls = Calls::default();
        let handler = capture(&calls);
        let assigned = prop.set(Some(handler.clone())).unwrap();
        assert_eq!(assigned, Some(handler));
        assert!(prop.get().is_none());
    }

    #[test]
    fn test_set_attaches_to_alias() {
        let emitter = make_emitter("test");
        let calls = Calls::default();

        emitter.handler("test").unwrap().set(Some(capture(&calls))).unwrap();

        assert_eq!(emitter.host().listener_count("test"), 0);
        assert_eq!(emitter.host().listener_count("_hijack_test"), 1);
    }

    #[test]
    fn test_set_replaces_previous_handler() {
        let emitter = make_emitter("test");
        let first = Calls::default();
        let second = Calls::default();
        let prop = emitter.handler("test").unwrap();

        prop.set(Some(capture(&first))).unwrap();
        prop.set(Some(capture(&second))).unwrap();
        assert_eq!(emitter.host().listener_count("_hijack_test"), 1);

        emitter.host().emit("_hijack_test", &[Arg::from(9)]).unwrap();
        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec![vec![Arg::from(9)]]);
    }

    #[test]
    fn test_set_same_handler_twice_keeps_one_adapter() {
        let emitter = make_emitter("test");
        let calls = Calls::default();
        let handler = capture(&calls);
        let prop = emitter.handler("test").unwrap();

        prop.set(Some(handler.clone())).unwrap();
        prop.set(Some(handler)).unwrap();
        emitter.host().emit("_hijack_test", &[]).unwrap();

        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_set_none_detaches() {
        let emitter = make_emitter("test");
        let calls = Calls::default();
        let prop = emitter.handler("test").unwrap();

        prop.set(Some(capture(&calls))).unwrap();
        assert_eq!(prop.set(None).unwrap(), None);

        assert_eq!(emitter.host().listener_count("_hijack_test"), 0);
        assert!(!emitter.host().emit("_hijack_test", &[]).unwrap());
        assert!(calls.borrow().is_empty());

        // clearing an empty slot is fine
        assert_eq!(prop.set(None).unwrap(), None);
    }

    #[test]
    fn test_accessors_share_slot() {
        let emitter = make_emitter("test");
        let first = Calls::default();
        let second = Calls::default();

        emitter.handler("test").unwrap().set(Some(capture(&first))).unwrap();
        emitter.hijack("test", None).unwrap();
        emitter.handler("test").unwrap().set(Some(capture(&second))).unwrap();

        assert_eq!(emitter.host().listener_count("_hijack_test"), 1);
    }

    #[test]
    fn test_adapter_expands_single_buffer() {
        let emitter = make_emitter("data");
        let calls = Calls::default();
        emitter.handler("data").unwrap().set(Some(capture(&calls))).unwrap();

        let buf = Buffer::from("hello world");
        emitter
            .host()
            .emit("_hijack_data", &[Arg::from(buf.clone())])
            .unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        match calls[0].as_slice() {
            [Arg::Buffer(b), Arg::Int(0), Arg::Int(end)] => {
                assert!(b.ptr_eq(&buf));
                assert_eq!(*end, 11);
            }
            other => panic!("unexpected args: {:?}", other),
        }
    }

    #[test]
    fn test_adapter_passes_other_shapes_through() {
        let emitter = make_emitter("data");
        let calls = Calls::default();
        emitter.handler("data").unwrap().set(Some(capture(&calls))).unwrap();

        let buf = Arg::from(Buffer::from("ab"));
        let shapes = vec![
            vec![],
            vec![Arg::from("text")],
            vec![buf.clone(), Arg::from(1)],
            vec![Arg::from(1), buf],
        ];
        for args in &shapes {
            emitter.host().emit("_hijack_data", args).unwrap();
        }

        assert_eq!(*calls.borrow(), shapes);
    }

    fn make_flaky(name: &str) -> Hijacker<FlakyEmitter> {
        let emitter = Hijacker::new(FlakyEmitter::default());
        emitter.hijack(name, None).unwrap();
        emitter
    }

    fn fired(calls: &Calls) -> usize {
        calls.borrow().len()
    }

    #[test]
    fn test_failed_detach_keeps_handler_slot() {
        let emitter = make_flaky("test");
        let first = Calls::default();
        let second = Calls::default();
        let prop = emitter.handler("test").unwrap();

        prop.set(Some(capture(&first))).unwrap();

        emitter.host().fail_remove.set(true);
        let result = prop.set(None);
        assert!(matches!(result, Err(EmitterError::InvalidConfig(_))));
        assert_eq!(emitter.host().listener_count("_hijack_test"), 1);

        emitter.host().fail_remove.set(false);
        prop.set(Some(capture(&second))).unwrap();
        assert_eq!(emitter.host().listener_count("_hijack_test"), 1);

        emitter.host().emit("_hijack_test", &[]).unwrap();
        assert_eq!(fired(&first), 0);
        assert_eq!(fired(&second), 1);
    }

    #[test]
    fn test_failed_detach_on_replace_keeps_previous_handler() {
        let emitter = make_flaky("test");
        let first = Calls::default();
        let second = Calls::default();
        let prop = emitter.handler("test").unwrap();

        prop.set(Some(capture(&first))).unwrap();

        emitter.host().fail_remove.set(true);
        assert!(prop.set(Some(capture(&second))).is_err());
        assert_eq!(emitter.host().listener_count("_hijack_test"), 1);

        emitter.host().emit("_hijack_test", &[]).unwrap();
        assert_eq!(fired(&first), 1);
        assert_eq!(fired(&second), 0);

        emitter.host().fail_remove.set(false);
        prop.set(None).unwrap();
        assert_eq!(emitter.host().listener_count("_hijack_test"), 0);
    }

    #[test]
    fn test_failed_attach_leaves_slot_empty() {
        let emitter = make_flaky("test");
        let first = Calls::default();
        let second = Calls::default();
        let third = Calls::default();
        let prop = emitter.handler("test").unwrap();

        prop.set(Some(capture(&first))).unwrap();

        emitter.host().fail_add.set(true);
        let result = prop.set(Some(capture(&second)));
        assert!(matches!(result, Err(EmitterError::InvalidConfig(_))));
        assert_eq!(emitter.host().listener_count("_hijack_test"), 0);

        emitter.host().fail_add.set(false);
        prop.set(Some(capture(&third))).unwrap();
        assert_eq!(emitter.host().listener_count("_hijack_test"), 1);

        emitter.host().emit("_hijack_test", &[]).unwrap();
        assert_eq!((fired(&first), fired(&second), fired(&third)), (0, 0, 1));
    }
}
