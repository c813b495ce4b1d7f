//! In-memory window system used by the decision-layer tests.

use std::sync::{Arc, Mutex, MutexGuard};

use super::window_system::{RaiseError, WindowServerInfo, WindowSystem, pid_t};
use crate::common::collections::HashMap;
use crate::model::{Display, DisplayId, Point, Rect};

pub const OWN_PID: pid_t = 4242;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeElement(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Raise(FakeElement),
    Activate(pid_t),
}

#[derive(Debug, Clone)]
struct Node {
    role: String,
    parent: Option<u32>,
    pid: Option<pid_t>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    nodes: HashMap<u32, Node>,
    hit_regions: Vec<(Rect, u32)>,
    pub displays: Vec<Display>,
    pub window_list: Vec<WindowServerInfo>,
    pub app_windows: HashMap<pid_t, Vec<(FakeElement, Point)>>,
    pub frontmost: Option<pid_t>,
    pub closed: Vec<FakeElement>,
    pub calls: Vec<Call>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeWindowSystem {
    state: Arc<Mutex<FakeState>>,
}

impl FakeWindowSystem {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> MutexGuard<'_, FakeState> { self.state.lock().unwrap() }

    pub fn calls(&self) -> Vec<Call> { self.state().calls.clone() }

    pub fn clear_calls(&self) { self.state().calls.clear() }

    pub fn raised(&self) -> Vec<FakeElement> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Raise(e) => Some(e),
                Call::Activate(_) => None,
            })
            .collect()
    }

    pub fn add_element(&self, id: u32, role: &str, parent: Option<u32>, pid: Option<pid_t>) {
        self.state().nodes.insert(id, Node { role: role.to_string(), parent, pid });
    }

    /// Adds a window element with a single child at `frame`, which becomes
    /// the hit-test target for points inside `frame`. Returns the window.
    pub fn add_window_at(&self, id: u32, pid: pid_t, frame: Rect) -> FakeElement {
        let child = id + 10_000;
        self.add_element(id, "AXWindow", None, Some(pid));
        self.add_element(child, "AXButton", Some(id), Some(pid));
        self.set_hit(frame, child);
        FakeElement(id)
    }

    /// Registers a hit region; regions added later are in front.
    pub fn set_hit(&self, frame: Rect, element: u32) {
        self.state().hit_regions.insert(0, (frame, element))
    }

    pub fn clear_hits(&self) { self.state().hit_regions.clear() }

    pub fn set_displays(&self, displays: &[(u32, Rect)]) {
        self.state().displays = displays
            .iter()
            .map(|&(id, frame)| Display { id: DisplayId::new(id), frame })
            .collect();
    }

    pub fn close(&self, element: FakeElement) { self.state().closed.push(element) }
}

impl WindowSystem for FakeWindowSystem {
    type Element = FakeElement;

    fn own_pid(&self) -> pid_t { OWN_PID }

    fn displays(&self) -> Vec<Display> { self.state().displays.clone() }

    fn element_at(&self, point: Point) -> Option<FakeElement> {
        self.state()
            .hit_regions
            .iter()
            .find(|(frame, _)| frame.contains(point))
            .map(|&(_, id)| FakeElement(id))
    }

    fn role(&self, element: &FakeElement) -> Option<String> {
        self.state().nodes.get(&element.0).map(|n| n.role.clone())
    }

    fn parent(&self, element: &FakeElement) -> Option<FakeElement> {
        self.state().nodes.get(&element.0).and_then(|n| n.parent).map(FakeElement)
    }

    fn element_pid(&self, element: &FakeElement) -> Option<pid_t> {
        self.state().nodes.get(&element.0).and_then(|n| n.pid)
    }

    fn window_list(&self) -> Vec<WindowServerInfo> { self.state().window_list.clone() }

    fn app_windows(&self, pid: pid_t) -> Vec<(FakeElement, Point)> {
        self.state().app_windows.get(&pid).cloned().unwrap_or_default()
    }

    fn raise(&self, window: &FakeElement) -> Result<(), RaiseError> {
        let mut state = self.state();
        state.calls.push(Call::Raise(*window));
        if state.closed.contains(window) {
            return Err(RaiseError::StaleWindow);
        }
        Ok(())
    }

    fn frontmost_pid(&self) -> Option<pid_t> { self.state().frontmost }

    fn activate(&self, pid: pid_t) -> Result<(), RaiseError> {
        let mut state = self.state();
        state.calls.push(Call::Activate(pid));
        state.frontmost = Some(pid);
        Ok(())
    }
}
