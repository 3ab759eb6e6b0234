use std::cell::Cell;

use napi::bindgen_prelude::*;
use napi::threadsafe_function::{
    ErrorStrategy, ThreadSafeCallContext, ThreadsafeFunction, ThreadsafeFunctionCallMode,
};
use napi::JsFunction;
use napi_derive::napi;
use tracing::{debug, warn};

use navigation_policy::{
    intercept_redirect, intercept_window_open, ExternalOpener, PopupDisposition, RedirectAction,
};

use crate::events::{OpenExternalCallback, ViewEventHandlers};
use crate::options::ServiceViewOptions;
use crate::view_registry::{with_registry, ViewState};

/// Routes `OpenExternally` verdicts to the shell-registered callback and
/// records whether a hand-off happened during the interception.
struct TsfnOpener<'a> {
    callback: Option<&'a OpenExternalCallback>,
    opened: Cell<bool>,
}

impl<'a> TsfnOpener<'a> {
    fn new(callback: Option<&'a OpenExternalCallback>) -> Self {
        Self {
            callback,
            opened: Cell::new(false),
        }
    }

    fn opened(&self) -> bool {
        self.opened.get()
    }
}

impl ExternalOpener for TsfnOpener<'_> {
    fn open_external(&self, url: &str) {
        self.opened.set(true);
        match self.callback {
            Some(cb) => {
                cb.call(url.to_string(), ThreadsafeFunctionCallMode::NonBlocking);
            }
            None => {
                warn!(url, "no external-opener callback registered, dropping hand-off");
            }
        }
    }
}

/// The policy-engine handle for one embedded service view.
///
/// The shell creates one per hosted service view and forwards the view's
/// will-navigate and window-open events through it. All decisions are
/// answered synchronously; the only side effect is the `onOpenExternal`
/// callback, invoked non-blocking.
#[napi]
pub struct ServiceView {
    id: u32,
}

#[napi]
impl ServiceView {
    /// Register an embedded service view with the policy engine.
    #[napi(constructor)]
    pub fn new(options: ServiceViewOptions) -> Result<Self> {
        url::Url::parse(&options.url).map_err(|e| {
            napi::Error::from_reason(format!(
                "Service URL {:?} is not a fully qualified URL: {}",
                options.url, e
            ))
        })?;
        let service = options.service.unwrap_or_default();
        let id = with_registry(|reg| {
            let id = reg.allocate_id()?;
            reg.views.insert(
                id,
                ViewState {
                    service,
                    current_url: options.url,
                    handlers: ViewEventHandlers::new(),
                },
            );
            Ok::<_, napi::Error>(id)
        })?;
        Ok(Self { id })
    }

    /// Get the unique view ID.
    #[napi(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The URL the policy engine currently considers loaded in this view.
    #[napi(getter)]
    pub fn current_url(&self) -> Result<String> {
        with_registry(|reg| reg.views.get(&self.id).map(|view| view.current_url.clone()))
            .ok_or_else(|| napi::Error::from_reason("Service view is no longer registered"))
    }

    /// Report a committed navigation. Subsequent decisions use this URL as
    /// the view's current origin.
    #[napi]
    pub fn navigation_committed(&self, url: String) {
        with_registry(|reg| {
            if let Some(view) = reg.views.get_mut(&self.id) {
                debug!(service = %view.service, %url, "navigation committed");
                view.current_url = url;
            }
        });
    }

    /// Redirect Interceptor entry point for will-navigate/will-redirect
    /// events. Returns `true` when the default navigation should proceed
    /// inside the view; `false` when the shell must suppress it. External
    /// targets have already been dispatched to the `onOpenExternal`
    /// callback by the time this returns `false`.
    #[napi]
    pub fn handle_will_navigate(&self, target_url: String) -> bool {
        with_registry(|reg| {
            let Some(view) = reg.views.get(&self.id) else {
                warn!(id = self.id, "will-navigate for unregistered view, suppressing");
                return false;
            };
            let opener = TsfnOpener::new(view.handlers.on_open_external.as_ref());
            match intercept_redirect(&view.current_url, &target_url, &opener) {
                RedirectAction::Proceed => true,
                RedirectAction::Suppress => {
                    if !opener.opened() {
                        notify_discarded(view, &target_url);
                    }
                    false
                }
            }
        })
    }

    /// New-Window Interceptor entry point for window-open requests. Returns
    /// `true` when the shell should create a new embedded popup view for the
    /// URL; `false` to deny it. External targets have already been
    /// dispatched to the `onOpenExternal` callback.
    #[napi]
    pub fn handle_window_open(&self, target_url: String) -> bool {
        with_registry(|reg| {
            let Some(view) = reg.views.get(&self.id) else {
                warn!(id = self.id, "window-open for unregistered view, denying");
                return false;
            };
            let opener = TsfnOpener::new(view.handlers.on_open_external.as_ref());
            match intercept_window_open(&view.current_url, &target_url, &opener) {
                PopupDisposition::Allow => true,
                PopupDisposition::Deny => {
                    if !opener.opened() {
                        notify_discarded(view, &target_url);
                    }
                    false
                }
            }
        })
    }

    /// Register the External Browser Opener: called with the exact target
    /// URL whenever a navigation must leave the app through the OS default
    /// browser.
    #[napi(ts_args_type = "callback: (url: string) => void")]
    pub fn on_open_external(&self, callback: JsFunction) -> Result<()> {
        let tsfn: ThreadsafeFunction<String, ErrorStrategy::Fatal> = callback
            .create_threadsafe_function(0, |ctx: ThreadSafeCallContext<String>| {
                ctx.env.create_string(ctx.value.as_str()).map(|v| vec![v])
            })?;

        with_registry(|reg| {
            if let Some(view) = reg.views.get_mut(&self.id) {
                view.handlers.on_open_external = Some(tsfn);
            }
        });
        Ok(())
    }

    /// Register a handler for navigations that were suppressed without an
    /// external hand-off (unsafe scheme or malformed target).
    #[napi(ts_args_type = "callback: (url: string) => void")]
    pub fn on_navigation_discarded(&self, callback: JsFunction) -> Result<()> {
        let tsfn: ThreadsafeFunction<String, ErrorStrategy::Fatal> = callback
            .create_threadsafe_function(0, |ctx: ThreadSafeCallContext<String>| {
                ctx.env.create_string(ctx.value.as_str()).map(|v| vec![v])
            })?;

        with_registry(|reg| {
            if let Some(view) = reg.views.get_mut(&self.id) {
                view.handlers.on_navigation_discarded = Some(tsfn);
            }
        });
        Ok(())
    }
}

/// Fire the diagnostic callback for a navigation suppressed with no
/// external hand-off.
fn notify_discarded(view: &ViewState, target_url: &str) {
    debug!(service = %view.service, target_url, "navigation discarded");
    if let Some(cb) = &view.handlers.on_navigation_discarded {
        cb.call(target_url.to_string(), ThreadsafeFunctionCallMode::NonBlocking);
    }
}

// ── Drop ────────────────────────────────────────────────────────

/// Deregister the view when the handle is garbage-collected without an
/// explicit teardown, so handler references in the registry do not leak.
impl Drop for ServiceView {
    fn drop(&mut self) {
        with_registry(|reg| {
            reg.views.remove(&self.id);
        });
    }
}
