//! [`WindowSystem`] backed by the accessibility API, the window server and
//! AppKit.

use nix::unistd::getpid;
use tracing::trace;

use crate::model::{Display, Point};
use crate::sys::axuielement::{AxElement, AxError};
use crate::sys::{RaiseError, WindowServerInfo, WindowSystem, app, pid_t, screen, window_server};

/// Must be created and used on a single thread.
pub struct MacWindowSystem {
    system_wide: AxElement,
    own_pid: pid_t,
}

impl MacWindowSystem {
    pub fn new() -> Self {
        MacWindowSystem {
            system_wide: AxElement::system_wide(),
            own_pid: getpid().as_raw(),
        }
    }
}

impl Default for MacWindowSystem {
    fn default() -> Self { Self::new() }
}

impl WindowSystem for MacWindowSystem {
    type Element = AxElement;

    fn own_pid(&self) -> pid_t { self.own_pid }

    fn displays(&self) -> Vec<Display> { screen::displays() }

    fn element_at(&self, point: Point) -> Option<AxElement> {
        self.system_wide
            .element_at(point)
            .inspect_err(|e| trace!(?point, "No element at point: {e}"))
            .ok()
    }

    fn role(&self, element: &AxElement) -> Option<String> { element.role().ok() }

    fn parent(&self, element: &AxElement) -> Option<AxElement> { element.parent().ok() }

    fn element_pid(&self, element: &AxElement) -> Option<pid_t> { element.pid().ok() }

    fn window_list(&self) -> Vec<WindowServerInfo> { window_server::window_list() }

    fn app_windows(&self, pid: pid_t) -> Vec<(AxElement, Point)> {
        let Ok(windows) = AxElement::application(pid).windows() else {
            return Vec::new();
        };
        windows
            .into_iter()
            .filter_map(|window| {
                let position = window.position().ok()?;
                Some((window, position))
            })
            .collect()
    }

    fn raise(&self, window: &AxElement) -> Result<(), RaiseError> {
        window.raise().map_err(|e| match e {
            AxError::InvalidElement => RaiseError::StaleWindow,
            AxError::Other(code) => RaiseError::Accessibility(code),
            AxError::NoValue | AxError::WrongType => RaiseError::Accessibility(-1),
        })
    }

    fn frontmost_pid(&self) -> Option<pid_t> { app::frontmost_pid() }

    fn activate(&self, pid: pid_t) -> Result<(), RaiseError> { app::activate(pid) }
}
