//! Cross-origin navigation policy for embedded service views.
//!
//! A desktop shell hosting several chat/IM web properties needs to answer one
//! question for every navigation attempted inside an embedded view: does the
//! target URL stay in the view, get handed to the OS default browser, or get
//! dropped? The answer is a pure function of the view's current URL, the
//! target URL, and a compiled-in table of identity-federation relationships.

mod intercept;
mod origin;
mod policy;
mod rules;

pub use intercept::{
    intercept_redirect, intercept_window_open, ExternalOpener, PopupDisposition, RedirectAction,
};
pub use origin::{host_matches, HostPattern};
pub use policy::{decide, Verdict};
pub use rules::{
    validate, FederationPair, InternalResource, RuleTableError, FEDERATION_PAIRS,
    INTERNAL_RESOURCES,
};
