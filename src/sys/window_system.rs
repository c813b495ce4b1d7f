use std::fmt::Debug;

pub use nix::libc::pid_t;
use thiserror::Error;

use crate::model::{Display, Point, Rect};

/// A window as reported by the window server's ordered window list.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowServerInfo {
    pub id: u32,
    pub pid: pid_t,
    pub owner_name: Option<String>,
    pub layer: i32,
    /// Event-reporting space.
    pub frame: Rect,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaiseError {
    #[error("window no longer exists")]
    StaleWindow,
    #[error("process {0} is not running")]
    NoSuchProcess(pid_t),
    #[error("process {0} refused activation")]
    ActivationRefused(pid_t),
    #[error("accessibility call failed with code {0}")]
    Accessibility(i32),
}

/// Everything the raise logic needs from the platform.
///
/// Lookups return `None` or empty collections on any failure; a miss is the
/// normal outcome for most samples. Elements may become invalid at any time
/// and implementations must not panic on stale handles.
pub trait WindowSystem {
    /// An accessibility element. Elements whose role is a window double as
    /// the window handle handed to [`WindowSystem::raise`].
    type Element: Clone + PartialEq + Debug;

    fn own_pid(&self) -> pid_t;

    /// Active displays in display-enumeration space, primary display first.
    fn displays(&self) -> Vec<Display>;

    /// The deepest accessibility element at `point` (event-reporting space).
    fn element_at(&self, point: Point) -> Option<Self::Element>;

    fn role(&self, element: &Self::Element) -> Option<String>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    fn element_pid(&self, element: &Self::Element) -> Option<pid_t>;

    /// On-screen windows, frontmost first.
    fn window_list(&self) -> Vec<WindowServerInfo>;

    /// The accessibility windows of `pid` with their top-left positions in
    /// event-reporting space.
    fn app_windows(&self, pid: pid_t) -> Vec<(Self::Element, Point)>;

    fn raise(&self, window: &Self::Element) -> Result<(), RaiseError>;

    fn frontmost_pid(&self) -> Option<pid_t>;

    fn activate(&self, pid: pid_t) -> Result<(), RaiseError>;
}
