//! Process state for watch mode.
//!
//! Two flags:
//! - `WATCHING`: the watch loop owns shutdown (Ctrl+C stops the loop)
//! - `SHUTDOWN`: Ctrl+C received

use std::sync::atomic::{AtomicBool, Ordering};

static WATCHING: AtomicBool = AtomicBool::new(false);

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `set_watching()`: exit immediately, the `next` child receives
///   the same signal from the terminal
/// - After `set_watching()`: set the flag, the watch loop stops and kills
///   the child itself
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if WATCHING.load(Ordering::SeqCst) {
            crate::log!("watch"; "shutting down...");
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Hand shutdown over to the watch loop
pub fn set_watching() {
    WATCHING.store(true, Ordering::SeqCst);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
