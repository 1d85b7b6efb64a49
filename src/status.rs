use std::cell::{Cell, RefCell};

/// Latest-value-wins handoff of the status line to the UI.
///
/// Posting stores the text. Only the first post since the last [`take`]
/// asks the caller to schedule a delivery, so a burst of posts costs one UI
/// update carrying the newest text.
///
/// [`take`]: StatusMailbox::take
#[derive(Debug, Default)]
pub struct StatusMailbox {
    pending: RefCell<Option<String>>,
    scheduled: Cell<bool>,
    shown: RefCell<String>,
}

impl StatusMailbox {
    /// Returns `true` when the caller must schedule a delivery.
    pub fn post(&self, text: String) -> bool {
        *self.pending.borrow_mut() = Some(text);
        !self.scheduled.replace(true)
    }

    /// Called from the scheduled delivery. Returns the text to display, if
    /// anything arrived since the last delivery.
    pub fn take(&self) -> Option<String> {
        self.scheduled.set(false);
        let text = self.pending.borrow_mut().take()?;
        self.shown.replace(text.clone());
        Some(text)
    }

    /// The text last handed to the UI.
    pub fn shown(&self) -> String {
        self.shown.borrow().clone()
    }
}
