//! Test doubles shared by the unit tests.

use std::cell::Cell;

use crate::emitter::{Emitter, EventEmitter};
use crate::error::{EmitterError, Result};
use crate::listener::Listener;
use crate::value::Arg;

/// Host whose registration operations can be switched to fail.
#[derive(Default)]
pub(crate) struct FlakyEmitter {
    pub inner: EventEmitter,
    pub fail_add: Cell<bool>,
    pub fail_remove: Cell<bool>,
}

fn rejected(op: &str) -> EmitterError {
    EmitterError::InvalidConfig(format!("{} rejected by host", op))
}

impl Emitter for FlakyEmitter {
    fn add_listener(&self, name: &str, listener: Listener) -> Result<()> {
        if self.fail_add.get() {
            return Err(rejected("add_listener"));
        }
        self.inner.add_listener(name, listener)
    }

    fn once(&self, name: &str, listener: Listener) -> Result<()> {
        if self.fail_add.get() {
            return Err(rejected("once"));
        }
        self.inner.once(name, listener)
    }

    fn remove_listener(&self, name: &str, listener: &Listener) -> Result<()> {
        if self.fail_remove.get() {
            return Err(rejected("remove_listener"));
        }
        self.inner.remove_listener(name, listener)
    }

    fn emit(&self, name: &str, args: &[Arg]) -> Result<bool> {
        self.inner.emit(name, args)
    }

    fn listener_count(&self, name: &str) -> usize {
        self.inner.listener_count(name)
    }
}
