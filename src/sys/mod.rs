//! Operating-system seams. The decision layer talks to the window server
//! only through [`WindowSystem`]; the macOS implementation lives in the
//! platform-gated modules below.

pub mod window_system;

#[cfg(target_os = "macos")]
pub mod app;
#[cfg(target_os = "macos")]
pub mod axuielement;
#[cfg(target_os = "macos")]
pub mod event_tap;
#[cfg(target_os = "macos")]
pub mod mac;
#[cfg(target_os = "macos")]
pub mod run_loop;
#[cfg(target_os = "macos")]
pub mod screen;
#[cfg(target_os = "macos")]
pub mod window_server;

#[cfg(unix)]
pub mod signal;

#[cfg(test)]
pub mod testing;

pub use window_system::{RaiseError, WindowServerInfo, WindowSystem, pid_t};
