//! Actors own their state and communicate only through channels. Every message
//! carries the span it was sent from so that work done on the receiving side
//! shows up under the originating event in the trace tree.

#[cfg(target_os = "macos")]
pub mod event_tap;
pub mod raise_manager;
pub mod reactor;

use tokio::sync::mpsc;
use tracing::Span;

pub type Receiver<Event> = mpsc::UnboundedReceiver<(Span, Event)>;

pub struct Sender<Event>(mpsc::UnboundedSender<(Span, Event)>);

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Event> std::fmt::Debug for Sender<Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender").field("closed", &self.0.is_closed()).finish()
    }
}

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Sender(tx), rx)
}

impl<Event> Sender<Event> {
    /// Sends, dropping the message if the receiving actor is gone.
    pub fn send(&self, event: Event) { _ = self.try_send(event) }

    pub fn try_send(&self, event: Event) -> Result<(), mpsc::error::SendError<(Span, Event)>> {
        self.0.send((Span::current(), event))
    }
}
