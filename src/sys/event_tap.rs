//! A Quartz event tap attached to the current thread's run loop.

use std::ffi::c_void;

use objc2_core_foundation::{
    CFMachPort, CFRetained, CFRunLoop, CFRunLoopSource, kCFRunLoopCommonModes,
};
use objc2_core_graphics::{
    CGEvent, CGEventMask, CGEventTapCallBack, CGEventTapLocation, CGEventTapOptions,
    CGEventTapPlacement,
};
use tracing::{debug, warn};

/// Frees the callback context handed to [`EventTap::new_with_options`].
pub type DropCtx = unsafe fn(*mut c_void);

pub struct EventTap {
    port: CFRetained<CFMachPort>,
    source: CFRetained<CFRunLoopSource>,
    run_loop: CFRetained<CFRunLoop>,
    user_info: *mut c_void,
    drop_ctx: Option<DropCtx>,
}

impl EventTap {
    /// Creates a session-level tap and schedules it on the current run loop.
    ///
    /// Returns `None` when the tap cannot be created, typically because the
    /// process lacks accessibility permission. In that case ownership of
    /// `user_info` stays with the caller.
    ///
    /// # Safety
    ///
    /// `callback` must treat `user_info` as whatever `drop_ctx` frees, and
    /// `user_info` must stay valid until the tap is dropped.
    pub unsafe fn new_with_options(
        options: CGEventTapOptions,
        mask: CGEventMask,
        callback: CGEventTapCallBack,
        user_info: *mut c_void,
        drop_ctx: Option<DropCtx>,
    ) -> Option<Self> {
        let port = unsafe {
            CGEvent::tap_create(
                CGEventTapLocation::SessionEventTap,
                CGEventTapPlacement::HeadInsertEventTap,
                options,
                mask,
                callback,
                user_info,
            )
        }?;
        let Some(source) = CFMachPort::new_run_loop_source(None, Some(&port), 0) else {
            warn!("Could not create run loop source for event tap");
            port.invalidate();
            return None;
        };
        let Some(run_loop) = CFRunLoop::current() else {
            port.invalidate();
            return None;
        };
        run_loop.add_source(Some(&source), unsafe { kCFRunLoopCommonModes });
        CGEvent::tap_enable(&port, true);
        debug!(mask, "Event tap installed");
        Some(EventTap {
            port,
            source,
            run_loop,
            user_info,
            drop_ctx,
        })
    }

    /// # Safety
    ///
    /// See [`EventTap::new_with_options`].
    pub unsafe fn new_listen_only(
        mask: CGEventMask,
        callback: CGEventTapCallBack,
        user_info: *mut c_void,
        drop_ctx: Option<DropCtx>,
    ) -> Option<Self> {
        unsafe {
            let options = CGEventTapOptions::ListenOnly;
            Self::new_with_options(options, mask, callback, user_info, drop_ctx)
        }
    }

    /// Turns the tap back on after the system disabled it.
    pub fn enable(&self) { CGEvent::tap_enable(&self.port, true) }
}

impl Drop for EventTap {
    fn drop(&mut self) {
        CGEvent::tap_enable(&self.port, false);
        self.run_loop.remove_source(Some(&self.source), unsafe { kCFRunLoopCommonModes });
        self.port.invalidate();
        if let Some(drop_ctx) = self.drop_ctx {
            unsafe { drop_ctx(self.user_info) };
        }
        debug!("Event tap removed");
    }
}
