//! Observes pointer motion through a listen-only Quartz event tap.
//!
//! The callback runs on the main thread's run loop and must return quickly,
//! so it only throttles and forwards samples; all lookups happen on the
//! reactor thread.

use std::cell::RefCell;
use std::rc::Rc;

use objc2_core_graphics::{CGEvent, CGEventMask, CGEventTapProxy, CGEventType};
use tracing::{debug, trace, warn};

use super::reactor::{self, Event, InputSample};
use crate::common::config::Config;
use crate::model::Point;
use crate::model::debounce::Throttle;

pub struct EventTap {
    events_tx: reactor::Sender,
    state: RefCell<State>,
    tap: RefCell<Option<crate::sys::event_tap::EventTap>>,
}

struct State {
    throttle: Throttle,
}

struct CallbackCtx {
    this: Rc<EventTap>,
}

unsafe fn drop_mouse_ctx(ptr: *mut std::ffi::c_void) {
    unsafe { drop(Box::from_raw(ptr as *mut CallbackCtx)) };
}

impl EventTap {
    pub fn new(config: &Config, events_tx: reactor::Sender) -> Rc<Self> {
        Rc::new(EventTap {
            events_tx,
            state: RefCell::new(State {
                throttle: Throttle::new(config.settings.throttle()),
            }),
            tap: RefCell::new(None),
        })
    }

    /// Installs the tap on the current run loop. Returns false if the system
    /// refused, usually for lack of accessibility permission.
    pub fn install(self: &Rc<Self>) -> bool {
        let ctx = Box::new(CallbackCtx { this: Rc::clone(self) });
        let ctx_ptr = Box::into_raw(ctx) as *mut std::ffi::c_void;

        let tap = unsafe {
            crate::sys::event_tap::EventTap::new_listen_only(
                event_mask(),
                Some(mouse_callback),
                ctx_ptr,
                Some(drop_mouse_ctx),
            )
        };

        match tap {
            Some(tap) => {
                *self.tap.borrow_mut() = Some(tap);
                true
            }
            None => {
                unsafe { drop_mouse_ctx(ctx_ptr) };
                false
            }
        }
    }

    /// Removes the tap. This also releases the callback's reference to us.
    pub fn uninstall(&self) {
        let tap = self.tap.borrow_mut().take();
        drop(tap);
    }

    fn on_event(&self, event_type: CGEventType, event: &CGEvent) {
        match event_type {
            CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                warn!(?event_type, "Event tap was disabled; re-enabling");
                if let Some(tap) = self.tap.borrow().as_ref() {
                    tap.enable();
                }
                self.state.borrow_mut().throttle.reset();
            }
            CGEventType::MouseMoved => {
                let timestamp_ns = CGEvent::timestamp(Some(event));
                if !self.state.borrow_mut().throttle.admit(timestamp_ns) {
                    return;
                }
                let loc = CGEvent::location(Some(event));
                let sample = InputSample {
                    location: Point::new(loc.x, loc.y),
                    timestamp_ns,
                };
                trace!(?sample, "Mouse moved");
                if self.events_tx.try_send(Event::MouseMoved(sample)).is_err() {
                    debug!("Reactor is gone; dropping sample");
                }
            }
            _ => {}
        }
    }
}

unsafe extern "C-unwind" fn mouse_callback(
    _proxy: CGEventTapProxy,
    event_type: CGEventType,
    event_ref: core::ptr::NonNull<CGEvent>,
    user_info: *mut std::ffi::c_void,
) -> *mut CGEvent {
    let ctx = unsafe { &*(user_info as *const CallbackCtx) };
    let event = unsafe { event_ref.as_ref() };
    ctx.this.on_event(event_type, event);
    // Listen-only: the event always continues on unchanged.
    event_ref.as_ptr()
}

fn event_mask() -> CGEventMask {
    // Tap-disabled notifications are delivered regardless of the mask.
    1u64 << (CGEventType::MouseMoved.0 as u64)
}
