//! Catching panics of instrumented calls with their stack trace
//!
//! A backtrace taken after `catch_unwind` returns no longer contains the
//! frames that panicked, so a process panic hook records the message,
//! location and backtrace at the panic site. The hook only acts while the
//! current thread is inside [`catch`]; every other panic goes to the hook
//! that was installed before it.
//!
//! Whether a panic escapes is only known once `catch_unwind` returns. The
//! last recorded panic of a failed call is the one that escaped; any other
//! panic recorded during the call was recovered inside the wrapped function
//! and is reported on stderr, so it leaves the same trace as without the
//! wrapper.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static CAPTURE_DEPTH: Cell<usize> = const { Cell::new(0) };
    static PANICS: RefCell<Vec<PanicRecord>> = const { RefCell::new(Vec::new()) };
}

static INSTALL_HOOK: Once = Once::new();

/// What the hook saw when an instrumented call panicked
#[derive(Debug, Clone)]
pub(crate) struct PanicRecord {
    pub message: String,
    pub location: Option<String>,
    pub backtrace: String,
}

impl PanicRecord {
    /// Best effort for panics that bypassed the hook, e.g. `resume_unwind`
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        Self {
            message: payload_message(payload),
            location: None,
            backtrace: Backtrace::force_capture().to_string(),
        }
    }

    /// Backtrace followed by a `panicked at <location>: <message>` line
    pub fn stack_trace(&self) -> String {
        let site = self.location.as_deref().unwrap_or("<unknown>");
        format!(
            "{}\npanicked at {}: {}",
            self.backtrace.trim_end(),
            site,
            self.message
        )
    }
}

pub(crate) struct CaughtPanic {
    pub record: PanicRecord,
    payload: Box<dyn Any + Send>,
}

impl CaughtPanic {
    /// Continue unwinding, leaving the record for an enclosing [`catch`]
    pub fn resume(self) -> ! {
        PANICS.with(|panics| panics.borrow_mut().push(self.record));
        panic::resume_unwind(self.payload)
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURE_DEPTH.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let record = PanicRecord {
                message: payload_message(info.payload()),
                location: info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
                backtrace: Backtrace::force_capture().to_string(),
            };
            PANICS.with(|panics| panics.borrow_mut().push(record));
        }));
    });
}

/// Run `f`, turning a panic into a [`CaughtPanic`]
pub(crate) fn catch<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    let (result, recovered) = catch_recording(f);
    for record in &recovered {
        report_recovered(record);
    }
    result
}

/// Like [`catch`], also returning the panics `f` recovered from itself
fn catch_recording<R>(f: impl FnOnce() -> R) -> (Result<R, CaughtPanic>, Vec<PanicRecord>) {
    install_hook();

    // records of an enclosing call stay apart from this one's
    let outer = PANICS.with(|panics| std::mem::take(&mut *panics.borrow_mut()));
    CAPTURE_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURE_DEPTH.with(|depth| depth.set(depth.get() - 1));
    let mut recorded = PANICS.with(|panics| std::mem::replace(&mut *panics.borrow_mut(), outer));

    match result {
        Ok(value) => (Ok(value), recorded),
        Err(payload) => {
            let record = recorded
                .pop()
                .unwrap_or_else(|| PanicRecord::from_payload(&*payload));
            (Err(CaughtPanic { record, payload }), recorded)
        }
    }
}

/// Stderr report for a panic the wrapped function caught itself
fn report_recovered(record: &PanicRecord) {
    let thread = std::thread::current();
    eprintln!(
        "thread '{}' panicked at {}:\n{}",
        thread.name().unwrap_or("<unnamed>"),
        record.location.as_deref().unwrap_or("<unknown>"),
        record.message
    );
}
