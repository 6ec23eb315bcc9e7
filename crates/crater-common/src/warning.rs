//! Layout warnings with colored terminal output.
//!
//! Provides deduplication so a bad declaration that is re-applied on every
//! mutation is only reported once. Used by the style parser, the markup
//! reader and the session façade to report input they had to repair.

use std::collections::BTreeSet;
use std::sync::Mutex;

use owo_colors::{OwoColorize, Stream};

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<BTreeSet<String>> = Mutex::new(BTreeSet::new());

/// Warn about invalid or unsupported input (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Style", "unparseable width 'wide', using auto");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED.lock().unwrap().insert(key);

    if should_print {
        let line = format!("[Crater {component}] ⚠ {message}");
        eprintln!(
            "{}",
            line.if_supports_color(Stream::Stderr, |text| text.yellow())
        );
    }
}

/// Whether a warning with exactly this component and message was recorded
/// since the last [`clear_warnings`].
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap()
        .contains(&format!("[{component}] {message}"))
}

/// Snapshot of every recorded warning, in sorted order.
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
#[must_use]
pub fn recorded_warnings() -> Vec<String> {
    WARNED.lock().unwrap().iter().cloned().collect()
}

/// Clear all recorded warnings (call when building a new tree)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    WARNED.lock().unwrap().clear();
}
