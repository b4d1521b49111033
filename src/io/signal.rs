use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

static INSTALL: Once = Once::new();
static STOP: AtomicBool = AtomicBool::new(false);

/// Install SIGINT/SIGTERM handlers that flip the stop flag. Idempotent:
/// repeated calls register the handlers exactly once.
#[cfg(unix)]
pub fn install() {
    INSTALL.call_once(|| unsafe {
        libc::signal(libc::SIGINT, handle_signal as libc::sighandler_t);
        libc::signal(libc::SIGTERM, handle_signal as libc::sighandler_t);
    });
}

/// On non-Unix platforms there is nothing to register; the watch loop
/// still honors its own stop handle.
#[cfg(not(unix))]
pub fn install() {
    INSTALL.call_once(|| {});
}

#[cfg(unix)]
extern "C" fn handle_signal(_sig: libc::c_int) {
    // Only an atomic store: anything more is not async-signal-safe
    STOP.store(true, Ordering::SeqCst);
}

/// Whether a termination signal has been received.
pub fn stop_requested() -> bool {
    STOP.load(Ordering::SeqCst)
}
