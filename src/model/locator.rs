//! Resolves a concrete window to raise, either from a point on screen or
//! from a display.
//!
//! A miss is a normal answer here and is reported as `None`.

use tracing::trace;

use crate::common::collections::HashSet;
use crate::common::config::Settings;
use crate::model::{CoordinateConverter, Display, Point};
use crate::sys::{WindowServerInfo, WindowSystem, pid_t};

pub const WINDOW_ROLE: &str = "AXWindow";

/// Bound on the parent walk, in case a hierarchy loops back on itself.
const MAX_ANCESTOR_DEPTH: usize = 64;

/// The window layer ordinary application windows live on.
const NORMAL_WINDOW_LAYER: i32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Target<E> {
    pub window: E,
    pub pid: pid_t,
}

fn is_raisable_pid(pid: pid_t, own_pid: pid_t) -> bool { pid != 0 && pid != own_pid }

/// Finds the top-level window under `point` (event-reporting space) by
/// walking up from the deepest element there.
pub fn window_at<S: WindowSystem>(system: &S, point: Point) -> Option<Target<S::Element>> {
    let mut element = system.element_at(point)?;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        if system.role(&element).as_deref() == Some(WINDOW_ROLE) {
            let pid = system.element_pid(&element)?;
            if !is_raisable_pid(pid, system.own_pid()) {
                trace!(pid, "Ignoring window owned by ourselves or the system");
                return None;
            }
            return Some(Target { window: element, pid });
        }
        element = system.parent(&element)?;
    }
    trace!(?point, "No window within {MAX_ANCESTOR_DEPTH} ancestors");
    None
}

/// Which entries of the window list may be raised by the display policy.
#[derive(Debug, Clone)]
pub struct WindowFilter {
    pub own_pid: pid_t,
    pub min_size: f64,
    pub ignored_owners: HashSet<String>,
}

impl WindowFilter {
    pub fn from_settings(settings: &Settings, own_pid: pid_t) -> Self {
        Self {
            own_pid,
            min_size: settings.min_window_size,
            ignored_owners: settings.ignored_owner_set(),
        }
    }

    pub fn accepts(&self, info: &WindowServerInfo) -> bool {
        if info.frame.width < self.min_size || info.frame.height < self.min_size {
            return false;
        }
        if !is_raisable_pid(info.pid, self.own_pid) {
            return false;
        }
        if info.owner_name.as_ref().is_some_and(|name| self.ignored_owners.contains(name)) {
            return false;
        }
        info.layer == NORMAL_WINDOW_LAYER
    }
}

/// Picks the frontmost acceptable window whose center lies on `display`.
/// `windows` must be ordered front to back.
pub fn frontmost_on_display<'a>(
    windows: &'a [WindowServerInfo],
    display: &Display,
    converter: &CoordinateConverter,
    filter: &WindowFilter,
) -> Option<&'a WindowServerInfo> {
    // Window frames are in event-reporting space; bring the display there too.
    let bounds = converter.convert_rect(display.frame);
    windows.iter().find(|info| filter.accepts(info) && bounds.contains(info.frame.center()))
}

/// Correlates a window-list entry with an accessibility window by position.
/// Falls back to the first accessibility window of the app.
pub fn match_by_position<E>(
    candidates: Vec<(E, Point)>,
    origin: Point,
    tolerance: f64,
) -> Option<E> {
    let mut first = None;
    for (element, position) in candidates {
        let (dx, dy) = ((position.x - origin.x).abs(), (position.y - origin.y).abs());
        if dx <= tolerance && dy <= tolerance {
            return Some(element);
        }
        if first.is_none() {
            first = Some(element);
        }
    }
    first
}

/// Finds the frontmost window on `display` and recovers its accessibility
/// handle.
pub fn topmost_window_on<S: WindowSystem>(
    system: &S,
    display: &Display,
    converter: &CoordinateConverter,
    filter: &WindowFilter,
    tolerance: f64,
) -> Option<Target<S::Element>> {
    let windows = system.window_list();
    let Some(info) = frontmost_on_display(&windows, display, converter, filter) else {
        let display_id = display.id.get();
        trace!(display_id, "No raisable window on display");
        return None;
    };
    let window = match_by_position(system.app_windows(info.pid), info.frame.origin, tolerance);
    if window.is_none() {
        trace!(pid = info.pid, wid = info.id, "App exposes no accessibility windows");
    }
    window.map(|window| Target { window, pid: info.pid })
}
