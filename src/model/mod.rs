pub mod debounce;
pub mod geometry;
pub mod locator;

pub use geometry::{CoordinateConverter, Display, DisplayId, Point, Rect};
