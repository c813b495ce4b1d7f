//! Screen geometry shared by the locator and the platform layer.
//!
//! Two coordinate spaces are in play. Pointer events and the window list use
//! the event-reporting space: origin at the top-left of the primary display,
//! y increasing downward. Display frames use the display-enumeration space:
//! origin at the bottom-left of the primary display, y increasing upward.
//! [`CoordinateConverter`] flips between them around the primary height.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { origin: Point::new(x, y), width, height }
    }

    pub fn min_x(&self) -> f64 { self.origin.x }

    pub fn min_y(&self) -> f64 { self.origin.y }

    pub fn max_x(&self) -> f64 { self.origin.x + self.width }

    pub fn max_y(&self) -> f64 { self.origin.y + self.height }

    pub fn center(&self) -> Point {
        Point::new(self.origin.x + self.width / 2.0, self.origin.y + self.height / 2.0)
    }

    /// Half-open containment, so adjacent rects never both claim an edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayId(u32);

impl DisplayId {
    pub const fn new(id: u32) -> Self { Self(id) }

    pub const fn get(self) -> u32 { self.0 }
}

/// A physical monitor. The frame is in display-enumeration space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub id: DisplayId,
    pub frame: Rect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoordinateConverter {
    primary_height: f64,
}

impl CoordinateConverter {
    pub const fn new(primary_height: f64) -> Self { Self { primary_height } }

    /// Builds a converter from an enumeration whose first entry is the
    /// primary display.
    pub fn for_displays(displays: &[Display]) -> Option<Self> {
        displays.first().map(|primary| Self::new(primary.frame.height))
    }

    pub fn primary_height(&self) -> f64 { self.primary_height }

    /// Event-reporting space to display-enumeration space.
    pub fn to_display_space(&self, p: Point) -> Point { Point::new(p.x, self.primary_height - p.y) }

    /// Display-enumeration space to event-reporting space. The flip is its own
    /// inverse.
    pub fn from_display_space(&self, p: Point) -> Point {
        Point::new(p.x, self.primary_height - p.y)
    }

    /// Flips a rect between the two spaces. Also its own inverse.
    pub fn convert_rect(&self, r: Rect) -> Rect {
        Rect::new(r.origin.x, self.primary_height - r.max_y(), r.width, r.height)
    }
}

/// Finds the display containing `point`, given in display-enumeration space.
/// Falls back to the first display when nothing contains the point.
pub fn display_containing(displays: &[Display], point: Point) -> Option<Display> {
    displays
        .iter()
        .find(|display| display_frame_contains(&display.frame, point))
        .or_else(|| displays.first())
        .copied()
}

/// Containment for a converted event point. The top pixel row of a display
/// flips onto its `max_y`, so the interval is closed at the top and open at
/// the bottom.
fn display_frame_contains(frame: &Rect, p: Point) -> bool {
    p.x >= frame.min_x() && p.x < frame.max_x() && p.y > frame.min_y() && p.y <= frame.max_y()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn displays() -> Vec<Display> {
        vec![
            Display {
                id: DisplayId::new(1),
                frame: Rect::new(0.0, 0.0, 1440.0, 900.0),
            },
            // Taller external monitor to the right, bottoms aligned.
            Display {
                id: DisplayId::new(2),
                frame: Rect::new(1440.0, 0.0, 1920.0, 1200.0),
            },
        ]
    }

    #[test]
    fn flip_round_trips_inside_primary() {
        let conv = CoordinateConverter::new(900.0);
        for &(x, y) in &[(0.0, 0.0), (10.0, 899.0), (1439.0, 450.5), (720.0, 900.0)] {
            let p = Point::new(x, y);
            assert_eq!(conv.to_display_space(conv.from_display_space(p)), p);
            assert_eq!(conv.from_display_space(conv.to_display_space(p)), p);
        }
    }

    #[test]
    fn flip_uses_primary_height() {
        let conv = CoordinateConverter::new(900.0);
        assert_eq!(conv.to_display_space(Point::new(5.0, 100.0)), Point::new(5.0, 800.0));
    }

    #[test]
    fn rect_conversion_is_an_involution() {
        let conv = CoordinateConverter::new(900.0);
        let r = Rect::new(1440.0, -300.0, 1920.0, 1200.0);
        let flipped = conv.convert_rect(r);
        assert_eq!(flipped, Rect::new(1440.0, 0.0, 1920.0, 1200.0));
        assert_eq!(conv.convert_rect(flipped), r);
    }

    #[test]
    fn converter_uses_first_display() {
        let conv = CoordinateConverter::for_displays(&displays()).unwrap();
        assert_eq!(conv.primary_height(), 900.0);
        assert_eq!(CoordinateConverter::for_displays(&[]), None);
    }

    #[test]
    fn finds_containing_display() {
        let d = displays();
        assert_eq!(display_containing(&d, Point::new(100.0, 100.0)).unwrap().id, DisplayId::new(1));
        assert_eq!(
            display_containing(&d, Point::new(2000.0, 1100.0)).unwrap().id,
            DisplayId::new(2)
        );
    }

    #[test]
    fn shared_edge_belongs_to_the_right_display() {
        let d = displays();
        assert_eq!(display_containing(&d, Point::new(1440.0, 10.0)).unwrap().id, DisplayId::new(2));
    }

    #[test]
    fn top_row_of_primary_stays_on_primary_below_an_upper_monitor() {
        let d = vec![
            Display {
                id: DisplayId::new(1),
                frame: Rect::new(0.0, 0.0, 1440.0, 900.0),
            },
            Display {
                id: DisplayId::new(2),
                frame: Rect::new(0.0, 900.0, 1920.0, 1080.0),
            },
        ];
        let conv = CoordinateConverter::for_displays(&d).unwrap();
        let menu_bar = conv.to_display_space(Point::new(100.0, 0.0));
        assert_eq!(display_containing(&d, menu_bar).unwrap().id, DisplayId::new(1));
        let upper = conv.to_display_space(Point::new(100.0, -1.0));
        assert_eq!(display_containing(&d, upper).unwrap().id, DisplayId::new(2));
    }

    #[test]
    fn top_row_of_taller_monitor_belongs_to_it() {
        let d = displays();
        let conv = CoordinateConverter::for_displays(&d).unwrap();
        let top_row = conv.to_display_space(Point::new(2000.0, -300.0));
        assert_eq!(display_containing(&d, top_row).unwrap().id, DisplayId::new(2));
    }

    #[test]
    fn falls_back_to_first_display() {
        let d = displays();
        assert_eq!(
            display_containing(&d, Point::new(-500.0, -500.0)).unwrap().id,
            DisplayId::new(1)
        );
        assert_eq!(display_containing(&[], Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn conversion_must_precede_containment() {
        // A cursor near the top of the external monitor, in event space. The
        // external monitor extends 300px above the primary, so event-space y
        // is negative there.
        let d = displays();
        let conv = CoordinateConverter::for_displays(&d).unwrap();
        let event_point = Point::new(1500.0, -250.0);
        let converted = conv.to_display_space(event_point);
        assert_eq!(display_containing(&d, converted).unwrap().id, DisplayId::new(2));

        // A point on the primary display near its top edge only lands there
        // after conversion; unconverted it would sit near the bottom.
        let event_point = Point::new(100.0, 10.0);
        assert_eq!(conv.to_display_space(event_point), Point::new(100.0, 890.0));
        assert!(d[0].frame.contains(conv.to_display_space(event_point)));
    }
}
