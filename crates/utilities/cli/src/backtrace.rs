//! Helper to set the backtrace env var.

use std::sync::Once;

static INIT: Once = Once::new();

/// Sets `RUST_BACKTRACE=1` unless the variable is already set.
///
/// Must be called at the start of `main`, before any other thread is spawned.
pub fn enable() {
    INIT.call_once(|| {
        if std::env::var_os("RUST_BACKTRACE").is_none() {
            // SAFETY: called once from `main` while the process is still single-threaded.
            unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
        }
    });
}
