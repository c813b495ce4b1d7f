//! Brings a resolved window to the front and gives its process focus.
//!
//! Unlike the other actors this one has no mailbox: the reactor owns it and
//! calls it synchronously when a pending raise commits, so the last-raised
//! state is only ever touched from the reactor thread.

use std::fmt::Debug;

use tracing::{debug, trace, warn};

use crate::model::locator::Target;
use crate::sys::{RaiseError, WindowSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseOutcome {
    Raised,
    /// Same window as last time; nothing was sent to the system.
    Duplicate,
}

#[derive(Debug)]
pub struct RaiseManager<E> {
    last_raised: Option<Target<E>>,
}

impl<E> Default for RaiseManager<E> {
    fn default() -> Self { Self { last_raised: None } }
}

impl<E: Clone + PartialEq + Debug> RaiseManager<E> {
    pub fn new() -> Self { Self::default() }

    pub fn last_raised(&self) -> Option<&Target<E>> { self.last_raised.as_ref() }

    /// Raises `target`. With `skip_duplicate`, a target equal to the last
    /// raised one is a no-op.
    pub fn raise<S>(&mut self, system: &S, target: Target<E>, skip_duplicate: bool) -> RaiseOutcome
    where S: WindowSystem<Element = E> {
        if skip_duplicate && self.last_raised.as_ref() == Some(&target) {
            trace!(?target, "Already raised");
            return RaiseOutcome::Duplicate;
        }

        match system.raise(&target.window) {
            Ok(()) => debug!(?target, "Raised window"),
            Err(RaiseError::StaleWindow) => debug!(?target, "Window went away before raise"),
            Err(e) => warn!(?target, "Failed to raise window: {e}"),
        }

        if system.frontmost_pid() != Some(target.pid) {
            if let Err(e) = system.activate(target.pid) {
                warn!(pid = target.pid, "Failed to activate application: {e}");
            }
        } else {
            trace!(pid = target.pid, "Application already frontmost");
        }

        self.last_raised = Some(target);
        RaiseOutcome::Raised
    }
}
