//! Display enumeration.

use objc2_core_graphics::{
    CGDirectDisplayID, CGDisplayBounds, CGError, CGGetActiveDisplayList, CGMainDisplayID,
};
use tracing::warn;

use crate::model::{CoordinateConverter, Display, DisplayId, Rect};

const MAX_DISPLAYS: u32 = 32;

/// Active displays, primary first, with frames in display-enumeration space.
pub fn displays() -> Vec<Display> {
    let mut ids: [CGDirectDisplayID; MAX_DISPLAYS as usize] = [0; MAX_DISPLAYS as usize];
    let mut count = 0u32;
    let err = unsafe { CGGetActiveDisplayList(MAX_DISPLAYS, ids.as_mut_ptr(), &mut count) };
    if err != CGError::Success {
        warn!("Could not list displays: error {}", err.0);
        return Vec::new();
    }

    let main = CGMainDisplayID();
    let mut ids = ids[..count.min(MAX_DISPLAYS) as usize].to_vec();
    ids.sort_by_key(|&id| id != main);

    // Quartz reports bounds with a top-left origin; flip them so displays
    // share the bottom-left convention of the rest of the display API.
    let bounds: Vec<(CGDirectDisplayID, Rect)> = ids
        .into_iter()
        .map(|id| {
            let b = CGDisplayBounds(id);
            (id, Rect::new(b.origin.x, b.origin.y, b.size.width, b.size.height))
        })
        .collect();
    let Some(&(_, primary)) = bounds.first() else {
        return Vec::new();
    };
    let converter = CoordinateConverter::new(primary.height);
    bounds
        .into_iter()
        .map(|(id, frame)| Display {
            id: DisplayId::new(id),
            frame: converter.convert_rect(frame),
        })
        .collect()
}
