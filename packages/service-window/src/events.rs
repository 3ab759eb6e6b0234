use napi::threadsafe_function::{ErrorStrategy, ThreadsafeFunction};

/// Callback invoked with a URL to hand to the operating system's default
/// browser. The External Browser Opener, supplied by the shell.
pub type OpenExternalCallback = ThreadsafeFunction<String, ErrorStrategy::Fatal>;

/// Callback for navigations that were suppressed without an external
/// hand-off (unsafe scheme or malformed target). Diagnostic only.
pub type NavigationDiscardedCallback = ThreadsafeFunction<String, ErrorStrategy::Fatal>;

/// Stored event handlers for a service view.
pub struct ViewEventHandlers {
    pub on_open_external: Option<OpenExternalCallback>,
    pub on_navigation_discarded: Option<NavigationDiscardedCallback>,
}

impl ViewEventHandlers {
    pub fn new() -> Self {
        Self {
            on_open_external: None,
            on_navigation_discarded: None,
        }
    }
}
