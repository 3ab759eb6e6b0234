#[macro_use]
extern crate napi_derive;

mod events;
mod options;
mod service_view;
mod view_registry;

pub use options::ServiceViewOptions;
pub use service_view::ServiceView;

use navigation_policy::Verdict;
use tracing_subscriber::EnvFilter;

/// Initialize the navigation policy system.
/// Installs a `RUST_LOG`-driven tracing subscriber (best-effort; a
/// host-installed subscriber wins) and audits the compiled-in rule table.
/// Idempotent; call once before registering views.
#[napi]
pub fn init() -> napi::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    navigation_policy::validate().map_err(|e| {
        napi::Error::from_reason(format!("navigation rule table failed audit: {}", e))
    })
}

/// Standalone policy decision for call sites outside the view interceptors
/// (e.g. a link opened from a context menu). Returns `"stay-internal"`,
/// `"open-externally"`, or `"discard"`. Pure: no callback is invoked.
#[napi]
pub fn decide(current_url: String, target_url: String) -> String {
    let verdict = match navigation_policy::decide(&current_url, &target_url) {
        Verdict::StayInternal => "stay-internal",
        Verdict::OpenExternally => "open-externally",
        Verdict::Discard => "discard",
    };
    verdict.to_string()
}
