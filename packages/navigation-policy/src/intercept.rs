use tracing::debug;

use crate::policy::{decide, Verdict};

/// Hand a URL to the operating system's default browser. Supplied by the
/// embedding environment. Fire-and-forget: the engine never waits for,
/// retries, or observes the outcome.
pub trait ExternalOpener {
    fn open_external(&self, url: &str);
}

/// What the shell must do with an in-flight will-navigate/will-redirect
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectAction {
    /// Let the default navigation continue inside the view.
    Proceed,
    /// Suppress the default navigation. Any external hand-off has already
    /// been dispatched by the interceptor.
    Suppress,
}

/// Verdict returned to a window-open request, which has not started
/// navigating anywhere yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupDisposition {
    /// The host creates a new embedded popup view for the URL.
    Allow,
    /// No popup view is created.
    Deny,
}

/// Redirect Interceptor: apply the policy to a will-navigate/will-redirect
/// event. The default navigation proceeds untouched only for
/// [`Verdict::StayInternal`]; external targets are handed to `opener` before
/// the suppression, discarded targets are suppressed with no further action.
pub fn intercept_redirect(
    current_url: &str,
    target_url: &str,
    opener: &dyn ExternalOpener,
) -> RedirectAction {
    match decide(current_url, target_url) {
        Verdict::StayInternal => RedirectAction::Proceed,
        Verdict::OpenExternally => {
            opener.open_external(target_url);
            RedirectAction::Suppress
        }
        Verdict::Discard => {
            debug!(target_url, "navigation suppressed without hand-off");
            RedirectAction::Suppress
        }
    }
}

/// New-Window Interceptor: apply the policy to a window-open request.
/// Internal targets get an embedded popup; external targets go to `opener`
/// with the popup denied; discarded targets are denied outright.
pub fn intercept_window_open(
    current_url: &str,
    target_url: &str,
    opener: &dyn ExternalOpener,
) -> PopupDisposition {
    match decide(current_url, target_url) {
        Verdict::StayInternal => PopupDisposition::Allow,
        Verdict::OpenExternally => {
            opener.open_external(target_url);
            PopupDisposition::Deny
        }
        Verdict::Discard => {
            debug!(target_url, "popup denied without hand-off");
            PopupDisposition::Deny
        }
    }
}
