//! The reactor turns throttled mouse samples into raises.
//!
//! It owns all decision state: the pending candidate, the last raised
//! window and the last display the cursor was seen on. Events arrive from
//! the event tap over a channel and are handled one at a time, and the
//! commit timer is polled from the same loop, so none of that state is
//! shared.

use std::thread;

use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, instrument, trace};

use crate::actor::raise_manager::{RaiseManager, RaiseOutcome};
use crate::actor::{self, Receiver};
use crate::common::config::{Config, RaisePolicy, Settings};
use crate::model::debounce::Debouncer;
use crate::model::geometry::display_containing;
use crate::model::locator::{self, Target, WindowFilter};
use crate::model::{CoordinateConverter, Display, DisplayId, Point};
use crate::sys::WindowSystem;

pub type Sender = actor::Sender<Event>;

/// A mouse position as delivered by the event tap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Event-reporting space.
    pub location: Point,
    pub timestamp_ns: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    MouseMoved(InputSample),
}

assert_impl_all!(Event: Send);
assert_impl_all!(Sender: Send, Sync);

/// What a pending raise will act on once it commits.
#[derive(Debug, Clone, PartialEq)]
enum Candidate<E> {
    Window(Target<E>),
    /// The window is picked at commit time.
    Display(Display),
}

pub struct Reactor<S: WindowSystem> {
    system: S,
    policy: RaisePolicy,
    position_tolerance: f64,
    filter: WindowFilter,
    debouncer: Debouncer<Candidate<S::Element>>,
    raise_manager: RaiseManager<S::Element>,
    last_display: Option<DisplayId>,
}

impl<S: WindowSystem> Reactor<S> {
    pub fn new(settings: &Settings, system: S) -> Self {
        let filter = WindowFilter::from_settings(settings, system.own_pid());
        Reactor {
            policy: settings.policy,
            position_tolerance: settings.position_tolerance,
            filter,
            debouncer: Debouncer::new(settings.delay()),
            raise_manager: RaiseManager::new(),
            last_display: None,
            system,
        }
    }

    /// Starts the reactor on its own thread. The window system is built on
    /// that thread, since accessibility handles may not cross threads.
    pub fn spawn<F>(config: &Config, make_system: F) -> std::io::Result<Sender>
    where
        S: 'static,
        F: FnOnce() -> S + Send + 'static,
    {
        let (events_tx, events) = actor::channel();
        let settings = config.settings.clone();
        thread::Builder::new().name("reactor".to_string()).spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_time().build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to start reactor runtime: {e}");
                    return;
                }
            };
            let reactor = Reactor::new(&settings, make_system());
            runtime.block_on(reactor.run(events));
        })?;
        Ok(events_tx)
    }

    /// Handles events until every sender is dropped.
    pub async fn run(mut self, mut events: Receiver<Event>) {
        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                biased;
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.commit_due(Instant::now());
                }
                event = events.recv() => match event {
                    Some((span, event)) => {
                        let _guard = span.enter();
                        self.handle_event(event, Instant::now());
                    }
                    None => break,
                },
            }
        }
        debug!("Reactor stopped");
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::MouseMoved(sample) => self.on_mouse_moved(sample, now),
        }
    }

    pub fn is_pending(&self) -> bool { self.debouncer.is_pending() }

    pub fn last_display(&self) -> Option<DisplayId> { self.last_display }

    #[instrument(level = "trace", skip(self, now))]
    fn on_mouse_moved(&mut self, sample: InputSample, now: Instant) {
        let candidate = match self.policy {
            RaisePolicy::Point => {
                locator::window_at(&self.system, sample.location).map(Candidate::Window)
            }
            RaisePolicy::Display => match self.display_at(sample.location) {
                Some(display) if self.last_display == Some(display.id) => {
                    // Still on the same monitor: never schedules, and the
                    // cursor has not come to rest since the crossing.
                    if let Some(previous) = self.debouncer.cancel() {
                        trace!(?previous, "Cancelled pending raise");
                    }
                    return;
                }
                Some(display) => {
                    let display_id = display.id.get();
                    self.last_display = Some(display.id);
                    debug!(display_id, "Cursor entered display");
                    Some(Candidate::Display(display))
                }
                None => None,
            },
        };

        match candidate {
            Some(candidate) => {
                if let Some(previous) = self.debouncer.schedule(candidate, now) {
                    trace!(?previous, "Superseded pending raise");
                }
            }
            None => {
                if let Some(previous) = self.debouncer.cancel() {
                    trace!(?previous, "Cancelled pending raise");
                }
            }
        }
    }

    fn display_at(&self, location: Point) -> Option<Display> {
        let displays = self.system.displays();
        let converter = CoordinateConverter::for_displays(&displays)?;
        display_containing(&displays, converter.to_display_space(location))
    }

    /// Commits the pending raise if its delay has elapsed.
    pub fn commit_due(&mut self, now: Instant) -> Option<RaiseOutcome> {
        match self.debouncer.take_due(now)? {
            Candidate::Window(target) => Some(self.raise_manager.raise(&self.system, target, true)),
            Candidate::Display(display) => {
                let displays = self.system.displays();
                let converter = CoordinateConverter::for_displays(&displays)?;
                let target = locator::topmost_window_on(
                    &self.system,
                    &display,
                    &converter,
                    &self.filter,
                    self.position_tolerance,
                )?;
                Some(self.raise_manager.raise(&self.system, target, false))
            }
        }
    }
}
