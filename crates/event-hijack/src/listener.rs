//! Listener handles with identity semantics.

use std::fmt;
use std::rc::Rc;

use crate::value::Arg;

/// A registered event callback.
///
/// Equality is identity: two `Listener`s are equal only if one is a clone of
/// the other. Removal from an emitter relies on this, so keep the handle you
/// registered if you intend to remove it later.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&[Arg])>);

impl Listener {
    pub fn new(f: impl Fn(&[Arg]) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the callback with `args`.
    pub fn call(&self, args: &[Arg]) {
        (self.0)(args)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}
