//! Scripted walkthroughs of the hijack behaviour.
//!
//! Each run returns the lines it would print, one per listener invocation,
//! so tests can check them without capturing stdout.

use std::cell::RefCell;
use std::rc::Rc;

use event_hijack::{
    hijack, Arg, Buffer, Emitter, EmitterConfig, EventEmitter, Hijacker, Listener, Result,
};
use tracing::info;

type Transcript = Rc<RefCell<Vec<String>>>;

fn announce(transcript: &Transcript, label: &str) -> Listener {
    let transcript = transcript.clone();
    let label = label.to_string();
    Listener::new(move |args| {
        let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
        transcript
            .borrow_mut()
            .push(format!("  {} fired with ({})", label, rendered.join(", ")));
    })
}

fn note(transcript: &Transcript, line: impl Into<String>) {
    transcript.borrow_mut().push(line.into());
}

/// Assigns the `on<name>` shorthand handler of a hijacked event.
fn set_handler(emitter: &Hijacker<EventEmitter>, name: &str, handler: Option<Listener>) -> Result<()> {
    if let Some(prop) = emitter.handler(name) {
        prop.set(handler)?;
    }
    Ok(())
}

/// Original vs hijacked "test" listeners, then handler reassignment.
pub fn run_basic(config: &EmitterConfig) -> Result<Vec<String>> {
    info!("running basic scenario");
    let out = Transcript::default();
    let emitter = Hijacker::new(EventEmitter::with_config(config));

    emitter.on("test", announce(&out, "A (before hijack)"))?;
    let emit_test = hijack(&emitter, "test", Some(announce(&out, "B (final listener)")))?;
    emitter.on("test", announce(&out, "C (after hijack)"))?;

    set_handler(&emitter, "test", Some(announce(&out, "D (ontest)")))?;

    note(&out, "emitter.emit(\"test\", 1, 2, 3)");
    emitter.emit("test", &[Arg::from(1), Arg::from(2), Arg::from(3)])?;

    note(&out, "emit_test(4, 5, 6)");
    emit_test.emit(&[Arg::from(4), Arg::from(5), Arg::from(6)])?;

    set_handler(&emitter, "test", Some(announce(&out, "D2 (ontest)")))?;
    note(&out, "ontest = D2; emit_test(9)");
    emit_test.emit(&[Arg::from(9)])?;

    set_handler(&emitter, "test", None)?;
    note(&out, "ontest = none; emit_test(9)");
    emit_test.emit(&[Arg::from(9)])?;

    Ok(out.take())
}

/// "data" hijack with a buffer flowing through the ondata adapter.
pub fn run_data(config: &EmitterConfig, payload: &str) -> Result<Vec<String>> {
    info!(len = payload.len(), "running data scenario");
    let out = Transcript::default();
    let emitter = Hijacker::new(EventEmitter::with_config(config));

    let emit_data = hijack(&emitter, "data", Some(announce(&out, "H (final listener)")))?;
    set_handler(&emitter, "data", Some(announce(&out, "ondata")))?;

    let buf = Buffer::from(payload);
    note(&out, format!("emit_data(<{} byte buffer>)", buf.len()));
    emit_data.emit(&[Arg::from(buf.clone())])?;

    note(&out, format!("emitter.emit(\"data\", <{} byte buffer>)", buf.len()));
    emitter.emit("data", &[Arg::from(buf)])?;

    Ok(out.take())
}
