//! Event hijacking for emitters.
//!
//! This crate lets two groups of listeners share one event name:
//! - Listeners registered before the name is hijacked keep firing on the
//!   emitter's own `emit(name)`
//! - Listeners registered afterwards fire only through the [`HijackEmit`]
//!   handle returned by [`hijack`]
//!
//! A shorthand `on<name>` handler property is installed for each hijacked
//! event. Its adapter expands a lone buffer argument into
//! `(buffer, 0, buffer.len())`.
//!
//! # Example
//!
//! ```
//! use event_hijack::{hijack, Arg, Buffer, Emitter, EventEmitter, Hijacker, Listener};
//!
//! let emitter = Hijacker::new(EventEmitter::new());
//! emitter.on("data", Listener::new(|_| println!("original listener"))).unwrap();
//!
//! let emit_data = hijack(&emitter, "data", None).unwrap();
//!
//! // registered after the hijack: only `emit_data` reaches it
//! emitter
//!     .handler("data")
//!     .unwrap()
//!     .set(Some(Listener::new(|args| println!("ondata got {} args", args.len()))))
//!     .unwrap();
//!
//! emitter.emit("data", &[]).unwrap();
//! emit_data.emit(&[Arg::from(Buffer::from("hello"))]).unwrap();
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod handler;
pub mod hijacker;
pub mod listener;
pub mod value;

#[cfg(test)]
mod test_support;

pub use config::{alias_name, property_name, slot_key, EmitterConfig};
pub use emitter::{Emitter, EventEmitter, ERROR_EVENT};
pub use error::{EmitterError, Result};
pub use handler::HandlerProperty;
pub use hijacker::{hijack, HijackEmit, Hijacker};
pub use listener::Listener;
pub use value::{Arg, Buffer};
