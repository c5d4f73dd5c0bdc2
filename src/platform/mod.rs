//! Platform abstraction layer
//!
//! The session talks to its environment through the traits in
//! [`crate::session`]. This module holds the implementations:
//! - `headless`: virtual clock and recording sinks (tests, native runner)
//! - `web`: DOM-backed HUD (browser only)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::session::TimerHandle;

/// Owns the callback for the one outstanding animation frame.
///
/// A callback may still be running when it requests the next frame, so
/// the replaced one is parked and only dropped on the following request.
/// A cancelled callback never runs and is dropped immediately.
#[derive(Debug)]
pub struct FrameSlot<C> {
    pending: Option<(TimerHandle, C)>,
    retired: Option<C>,
}

impl<C> Default for FrameSlot<C> {
    fn default() -> Self {
        Self {
            pending: None,
            retired: None,
        }
    }
}

impl<C> FrameSlot<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, handle: TimerHandle, callback: C) {
        self.retired = self.pending.replace((handle, callback)).map(|(_, c)| c);
    }

    /// Drop the pending callback if `handle` names it
    pub fn cancel(&mut self, handle: TimerHandle) {
        if self.pending.as_ref().is_some_and(|(h, _)| *h == handle) {
            self.pending = None;
        }
    }

    /// Callbacks currently kept alive
    pub fn held(&self) -> usize {
        usize::from(self.pending.is_some()) + usize::from(self.retired.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_replaced_callback_lives_one_more_request() {
        let first = Rc::new(());
        let second = Rc::new(());
        let mut slot = FrameSlot::new();

        slot.replace(TimerHandle(1), Rc::clone(&first));
        slot.replace(TimerHandle(2), Rc::clone(&second));
        // The first may still be on the stack
        assert_eq!(Rc::strong_count(&first), 2);

        slot.replace(TimerHandle(3), Rc::new(()));
        assert_eq!(Rc::strong_count(&first), 1);
        assert_eq!(Rc::strong_count(&second), 2);
        assert_eq!(slot.held(), 2);
    }

    #[test]
    fn test_cancel_drops_pending_callback() {
        let callback = Rc::new(());
        let mut slot = FrameSlot::new();
        slot.replace(TimerHandle(7), Rc::clone(&callback));

        slot.cancel(TimerHandle(8));
        assert_eq!(Rc::strong_count(&callback), 2);

        slot.cancel(TimerHandle(7));
        assert_eq!(Rc::strong_count(&callback), 1);
        assert_eq!(slot.held(), 0);
    }
}
