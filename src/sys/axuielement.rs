//! Thin wrapper over accessibility elements.
//!
//! Every call here may fail for reasons outside our control (the app is busy,
//! the element was destroyed, the app does not implement the attribute) and
//! callers are expected to treat failure as a miss.

use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};

use objc2_application_services::{AXError, AXIsProcessTrusted, AXUIElement, AXValue, AXValueType};
use objc2_core_foundation::{CFArray, CFEqual, CFRetained, CFString, CFType, CGPoint};
use thiserror::Error;

use crate::model::Point;
use crate::sys::pid_t;

const ROLE: &str = "AXRole";
const PARENT: &str = "AXParent";
const WINDOWS: &str = "AXWindows";
const POSITION: &str = "AXPosition";
const RAISE: &str = "AXRaise";

/// Upper bound on how long a single accessibility call may block on an
/// unresponsive app.
const MESSAGING_TIMEOUT_SECS: f32 = 0.25;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AxError {
    #[error("element is no longer valid")]
    InvalidElement,
    #[error("attribute has no value")]
    NoValue,
    #[error("unexpected attribute type")]
    WrongType,
    #[error("accessibility error {0}")]
    Other(i32),
}

impl From<AXError> for AxError {
    fn from(e: AXError) -> Self {
        match e {
            AXError::InvalidUIElement => AxError::InvalidElement,
            AXError::NoValue | AXError::AttributeUnsupported => AxError::NoValue,
            other => AxError::Other(other.0),
        }
    }
}

pub type Result<T> = std::result::Result<T, AxError>;

fn check(e: AXError) -> Result<()> {
    if e == AXError::Success { Ok(()) } else { Err(e.into()) }
}

/// Whether this process has been granted accessibility access.
pub fn is_trusted() -> bool { unsafe { AXIsProcessTrusted() } }

#[derive(Clone)]
pub struct AxElement(CFRetained<AXUIElement>);

impl AxElement {
    pub fn system_wide() -> Self { Self::with_timeout(unsafe { AXUIElement::new_system_wide() }) }

    pub fn application(pid: pid_t) -> Self {
        Self::with_timeout(unsafe { AXUIElement::new_application(pid) })
    }

    fn with_timeout(element: CFRetained<AXUIElement>) -> Self {
        unsafe { element.set_messaging_timeout(MESSAGING_TIMEOUT_SECS) };
        AxElement(element)
    }

    /// The deepest element at `point`. Only meaningful on the system-wide
    /// element.
    pub fn element_at(&self, point: Point) -> Result<AxElement> {
        let mut out: *const AXUIElement = ptr::null();
        check(unsafe {
            self.0.copy_element_at_position(point.x as f32, point.y as f32, NonNull::from(&mut out))
        })?;
        let out = NonNull::new(out.cast_mut()).ok_or(AxError::NoValue)?;
        Ok(AxElement(unsafe { CFRetained::from_raw(out) }))
    }

    fn attribute(&self, name: &'static str) -> Result<CFRetained<CFType>> {
        let name = CFString::from_static_str(name);
        let mut value: *const CFType = ptr::null();
        check(unsafe { self.0.copy_attribute_value(&name, NonNull::from(&mut value)) })?;
        let value = NonNull::new(value.cast_mut()).ok_or(AxError::NoValue)?;
        Ok(unsafe { CFRetained::from_raw(value) })
    }

    pub fn role(&self) -> Result<String> {
        let value = self.attribute(ROLE)?;
        let role = value.downcast_ref::<CFString>().ok_or(AxError::WrongType)?;
        Ok(role.to_string())
    }

    pub fn parent(&self) -> Result<AxElement> {
        let value = self.attribute(PARENT)?;
        let parent = value.downcast::<AXUIElement>().map_err(|_| AxError::WrongType)?;
        Ok(AxElement(parent))
    }

    pub fn pid(&self) -> Result<pid_t> {
        let mut pid: pid_t = 0;
        check(unsafe { self.0.pid(NonNull::from(&mut pid)) })?;
        Ok(pid)
    }

    /// Top-left corner in event-reporting space.
    pub fn position(&self) -> Result<Point> {
        let value = self.attribute(POSITION)?;
        let value = value.downcast_ref::<AXValue>().ok_or(AxError::WrongType)?;
        let mut point = CGPoint::new(0.0, 0.0);
        let ok = unsafe {
            value.value(AXValueType::CGPoint, NonNull::from(&mut point).cast::<c_void>())
        };
        if !ok {
            return Err(AxError::WrongType);
        }
        Ok(Point::new(point.x, point.y))
    }

    pub fn windows(&self) -> Result<Vec<AxElement>> {
        let value = self.attribute(WINDOWS)?;
        let array = value.downcast_ref::<CFArray>().ok_or(AxError::WrongType)?;
        let mut windows = Vec::new();
        for i in 0..array.count() {
            let item = unsafe { array.value_at_index(i) } as *mut AXUIElement;
            if let Some(item) = NonNull::new(item) {
                windows.push(AxElement(unsafe { CFRetained::retain(item) }));
            }
        }
        Ok(windows)
    }

    pub fn raise(&self) -> Result<()> {
        let action = CFString::from_static_str(RAISE);
        check(unsafe { self.0.perform_action(&action) })
    }
}

impl PartialEq for AxElement {
    fn eq(&self, other: &Self) -> bool {
        let a: &CFType = &self.0;
        let b: &CFType = &other.0;
        CFEqual(Some(a), Some(b))
    }
}

impl fmt::Debug for AxElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AxElement").field(&format_args!("{:p}", &*self.0)).finish()
    }
}
