use std::cell::RefCell;
use std::collections::HashMap;

use crate::events::ViewEventHandlers;

/// Per-view state the policy engine needs: the service label, the URL the
/// view currently has loaded, and the shell callbacks.
pub struct ViewState {
    pub service: String,
    pub current_url: String,
    pub handlers: ViewEventHandlers,
}

/// Registry of live service views. Lives in thread_local storage; every
/// shell call arrives on the JS thread, so no locking is involved.
pub struct ViewRegistry {
    pub next_id: u32,
    pub views: HashMap<u32, ViewState>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            views: HashMap::new(),
        }
    }

    pub fn allocate_id(&mut self) -> napi::Result<u32> {
        let id = self.next_id;
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| napi::Error::from_reason("View ID space exhausted (u32 overflow)"))?;
        Ok(id)
    }
}

thread_local! {
    static REGISTRY: RefCell<ViewRegistry> = RefCell::new(ViewRegistry::new());
}

/// Execute a closure with mutable access to the view registry.
pub fn with_registry<F, R>(f: F) -> R
where
    F: FnOnce(&mut ViewRegistry) -> R,
{
    REGISTRY.with(|r| f(&mut r.borrow_mut()))
}
