//! The window server's ordered list of on-screen windows.

use std::ffi::c_void;

use objc2_core_foundation::{CFDictionary, CFNumber, CFString, CFType};
use objc2_core_graphics::{
    CGWindowListCopyWindowInfo, CGWindowListOption, kCGNullWindowID, kCGWindowBounds,
    kCGWindowLayer, kCGWindowNumber, kCGWindowOwnerName, kCGWindowOwnerPID,
};
use tracing::trace;

use crate::model::Rect;
use crate::sys::WindowServerInfo;

/// On-screen windows, frontmost first, excluding desktop elements.
pub fn window_list() -> Vec<WindowServerInfo> {
    let options =
        CGWindowListOption::OptionOnScreenOnly | CGWindowListOption::ExcludeDesktopElements;
    let Some(list) = (unsafe { CGWindowListCopyWindowInfo(options, kCGNullWindowID) }) else {
        trace!("Window list unavailable");
        return Vec::new();
    };
    let mut windows = Vec::with_capacity(list.count() as usize);
    for i in 0..list.count() {
        let entry = unsafe { list.value_at_index(i) }.cast::<CFDictionary>();
        let Some(entry) = (unsafe { entry.as_ref() }) else { continue };
        if let Some(info) = parse_entry(entry) {
            windows.push(info);
        }
    }
    windows
}

fn parse_entry(entry: &CFDictionary) -> Option<WindowServerInfo> {
    let number = |key: &CFString| get(entry, key)?.downcast_ref::<CFNumber>()?.as_i64();
    let id = number(unsafe { kCGWindowNumber })?;
    let pid = number(unsafe { kCGWindowOwnerPID })?;
    let layer = number(unsafe { kCGWindowLayer }).unwrap_or(0);
    let owner_name = get(entry, unsafe { kCGWindowOwnerName })
        .and_then(|v| v.downcast_ref::<CFString>())
        .map(|s| s.to_string());
    let bounds = get(entry, unsafe { kCGWindowBounds })?.downcast_ref::<CFDictionary>()?;
    Some(WindowServerInfo {
        id: u32::try_from(id).ok()?,
        pid: i32::try_from(pid).ok()?,
        owner_name,
        layer: i32::try_from(layer).unwrap_or(i32::MAX),
        frame: parse_bounds(bounds)?,
    })
}

/// Bounds are a dictionary of `X`, `Y`, `Width` and `Height`, already in
/// event-reporting space.
fn parse_bounds(bounds: &CFDictionary) -> Option<Rect> {
    let field = |name: &'static str| {
        get(bounds, &CFString::from_static_str(name))?.downcast_ref::<CFNumber>()?.as_f64()
    };
    Some(Rect::new(field("X")?, field("Y")?, field("Width")?, field("Height")?))
}

fn get<'a>(dict: &'a CFDictionary, key: &CFString) -> Option<&'a CFType> {
    let value = unsafe { dict.value((key as *const CFString).cast::<c_void>()) };
    unsafe { value.cast::<CFType>().as_ref() }
}
