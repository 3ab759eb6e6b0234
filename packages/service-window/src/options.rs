use napi_derive::napi;

/// Options for registering an embedded service view with the policy engine.
#[napi(object)]
#[derive(Debug, Clone)]
pub struct ServiceViewOptions {
    /// Service label used in diagnostics, e.g. `"slack"` or `"teams"`.
    /// Default: ""
    pub service: Option<String>,
    /// The URL loaded in the embedded view at registration time. Must be a
    /// fully qualified, parseable URL; it seeds the view's current origin
    /// until the first `navigationCommitted()` call.
    pub url: String,
}
