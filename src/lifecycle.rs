//! Lifecycle of the GL context behind one component.
//!
//! ```text
//! Uninitialized -> ContextCreated -> Rendering -> ContextClosing -> Detached
//!                        ^                             |
//!                        +-----------------------------+  (re-realize)
//! ```
//!
//! `Detached` is terminal; any state may be detached.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    ContextCreated,
    Rendering,
    ContextClosing,
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    ContextCreated,
    Frame,
    ContextClosing,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::ContextCreated => f.write_str("context created"),
            LifecycleEvent::Frame => f.write_str("frame"),
            LifecycleEvent::ContextClosing => f.write_str("context closing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("`{event}` is not valid while {from:?}")]
pub struct LifecycleError {
    pub from: LifecycleState,
    pub event: LifecycleEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
        }
    }
}

impl Lifecycle {
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn has_context(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::ContextCreated | LifecycleState::Rendering
        )
    }

    pub fn is_detached(&self) -> bool {
        self.state == LifecycleState::Detached
    }

    /// Applies `event`, leaving the state untouched when it is not allowed.
    pub fn advance(&mut self, event: LifecycleEvent) -> Result<LifecycleState, LifecycleError> {
        use LifecycleEvent as E;
        use LifecycleState as S;

        let next = match (self.state, event) {
            (S::Uninitialized | S::ContextClosing, E::ContextCreated) => S::ContextCreated,
            (S::ContextCreated | S::Rendering, E::Frame) => S::Rendering,
            (S::ContextCreated | S::Rendering, E::ContextClosing) => S::ContextClosing,
            (from, event) => return Err(LifecycleError { from, event }),
        };
        self.state = next;
        Ok(next)
    }

    pub fn detach(&mut self) {
        self.state = LifecycleState::Detached;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifetime() {
        let mut lifecycle = Lifecycle::default();
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
        assert!(!lifecycle.has_context());

        assert_eq!(
            lifecycle.advance(LifecycleEvent::ContextCreated),
            Ok(LifecycleState::ContextCreated)
        );
        assert!(lifecycle.has_context());
        for _ in 0..3 {
            assert_eq!(
                lifecycle.advance(LifecycleEvent::Frame),
                Ok(LifecycleState::Rendering)
            );
        }
        assert_eq!(
            lifecycle.advance(LifecycleEvent::ContextClosing),
            Ok(LifecycleState::ContextClosing)
        );
        assert!(!lifecycle.has_context());

        lifecycle.detach();
        assert!(lifecycle.is_detached());
    }

    #[test]
    fn context_can_be_recreated_after_closing() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.advance(LifecycleEvent::ContextCreated).unwrap();
        lifecycle.advance(LifecycleEvent::ContextClosing).unwrap();
        assert_eq!(
            lifecycle.advance(LifecycleEvent::ContextCreated),
            Ok(LifecycleState::ContextCreated)
        );
    }

    #[test]
    fn frame_without_context_is_rejected() {
        let mut lifecycle = Lifecycle::default();
        let err = lifecycle.advance(LifecycleEvent::Frame).unwrap_err();
        assert_eq!(err.from, LifecycleState::Uninitialized);
        assert_eq!(err.to_string(), "`frame` is not valid while Uninitialized");
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
    }

    #[test]
    fn double_creation_is_rejected() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.advance(LifecycleEvent::ContextCreated).unwrap();
        lifecycle.advance(LifecycleEvent::Frame).unwrap();
        assert!(lifecycle.advance(LifecycleEvent::ContextCreated).is_err());
        assert_eq!(lifecycle.state(), LifecycleState::Rendering);
    }

    #[test]
    fn detached_is_terminal() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.advance(LifecycleEvent::ContextCreated).unwrap();
        lifecycle.detach();
        for event in [
            LifecycleEvent::ContextCreated,
            LifecycleEvent::Frame,
            LifecycleEvent::ContextClosing,
        ] {
            assert!(lifecycle.advance(event).is_err());
        }
        assert!(lifecycle.is_detached());
    }
}
