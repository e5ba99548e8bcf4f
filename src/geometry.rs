//! Rectangle geometry in PDF point space.
//!
//! PDF user space has its origin at the lower-left corner of the page with
//! the y axis growing upward; all rectangles here follow that convention and
//! are stored as lower-left / upper-right coordinate pairs in points
//! (1 pt = 1/72 inch).

/// Axis-aligned rectangle in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPt {
    /// Lower-left x coordinate
    pub x0: f64,
    /// Lower-left y coordinate
    pub y0: f64,
    /// Upper-right x coordinate
    pub x1: f64,
    /// Upper-right y coordinate
    pub y1: f64,
}

impl RectPt {
    /// Create a rectangle from lower-left / upper-right coordinates.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x + width,
            y1: y + height,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// A rectangle is valid when both dimensions are strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Expand by the given amount on all four sides.
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            x0: self.x0 - amount,
            y0: self.y0 - amount,
            x1: self.x1 + amount,
            y1: self.y1 + amount,
        }
    }

    /// Intersection with another rectangle, or `None` when the overlap is
    /// empty or degenerate.
    pub fn intersect(&self, other: &RectPt) -> Option<RectPt> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);

        if x0 < x1 && y0 < y1 {
            Some(RectPt { x0, y0, x1, y1 })
        } else {
            None
        }
    }

    /// Check whether this rectangle fully contains another.
    pub fn contains(&self, other: &RectPt) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && self.x1 >= other.x1 && self.y1 >= other.y1
    }

    /// Check containment with a floating-point tolerance on each edge.
    pub fn contains_with_tolerance(&self, other: &RectPt, eps: f64) -> bool {
        self.x0 - eps <= other.x0
            && self.y0 - eps <= other.y0
            && self.x1 + eps >= other.x1
            && self.y1 + eps >= other.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_rect_dimensions() {
        let rect = RectPt::new(10.0, 20.0, 110.0, 220.0);
        assert!((rect.width() - 100.0).abs() < EPS);
        assert!((rect.height() - 200.0).abs() < EPS);
        assert!((rect.area() - 20000.0).abs() < EPS);
        assert!(rect.is_valid());
    }

    #[test]
    fn test_rect_from_size() {
        let rect = RectPt::from_size(5.0, 6.0, 100.0, 50.0);
        assert_eq!(rect, RectPt::new(5.0, 6.0, 105.0, 56.0));
    }

    #[test]
    fn test_degenerate_rect_invalid() {
        assert!(!RectPt::new(0.0, 0.0, 0.0, 100.0).is_valid());
        assert!(!RectPt::new(0.0, 0.0, 100.0, 0.0).is_valid());
        assert!(!RectPt::new(10.0, 10.0, 5.0, 20.0).is_valid());
    }

    #[test]
    fn test_expand() {
        let rect = RectPt::new(10.0, 10.0, 20.0, 20.0).expand(2.5);
        assert_eq!(rect, RectPt::new(7.5, 7.5, 22.5, 22.5));
    }

    #[test]
    fn test_expand_negative_shrinks() {
        let rect = RectPt::new(0.0, 0.0, 10.0, 10.0).expand(-1.0);
        assert_eq!(rect, RectPt::new(1.0, 1.0, 9.0, 9.0));
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = RectPt::new(0.0, 0.0, 100.0, 100.0);
        let b = RectPt::new(50.0, 50.0, 150.0, 150.0);

        let inter = a.intersect(&b).unwrap();
        assert_eq!(inter, RectPt::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = RectPt::new(0.0, 0.0, 10.0, 10.0);
        let b = RectPt::new(20.0, 20.0, 30.0, 30.0);
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn test_intersect_touching_edges_is_degenerate() {
        let a = RectPt::new(0.0, 0.0, 10.0, 10.0);
        let b = RectPt::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn test_contains() {
        let outer = RectPt::new(0.0, 0.0, 100.0, 100.0);
        let inner = RectPt::new(10.0, 10.0, 90.0, 90.0);
        let crossing = RectPt::new(50.0, 50.0, 150.0, 150.0);

        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&crossing));
    }

    #[test]
    fn test_contains_with_tolerance() {
        let outer = RectPt::new(0.0, 0.0, 100.0, 100.0);
        let slightly_over = RectPt::new(-1e-12, 0.0, 100.0, 100.0);

        assert!(!outer.contains(&slightly_over));
        assert!(outer.contains_with_tolerance(&slightly_over, 1e-9));
    }
}
