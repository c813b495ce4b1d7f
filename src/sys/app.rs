use objc2::rc::autoreleasepool;
use objc2_app_kit::{NSApplicationActivationOptions, NSRunningApplication, NSWorkspace};

use crate::sys::{RaiseError, pid_t};

pub fn frontmost_pid() -> Option<pid_t> {
    autoreleasepool(|_| {
        NSWorkspace::sharedWorkspace().frontmostApplication().map(|app| app.processIdentifier())
    })
}

/// Brings `pid` to the foreground, taking keyboard focus from whatever app
/// currently holds it.
#[allow(deprecated)]
pub fn activate(pid: pid_t) -> Result<(), RaiseError> {
    autoreleasepool(|_| {
        let app = NSRunningApplication::runningApplicationWithProcessIdentifier(pid)
            .ok_or(RaiseError::NoSuchProcess(pid))?;
        if app.activateWithOptions(NSApplicationActivationOptions::ActivateIgnoringOtherApps) {
            Ok(())
        } else {
            Err(RaiseError::ActivationRefused(pid))
        }
    })
}
