use std::fmt;

pub const BOARD_MAX_X: i32 = 10000;
pub const BOARD_MAX_Y: i32 = 10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Point {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "({}, {})", self.x, self.y)
    }
}

impl Point {
    pub const UNKNOWN: Point = Point { x: -1, y: -1 };

    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    pub fn dist(p1: &Point, p2: &Point) -> f64 {
        let dx = f64::from(p1.x) - f64::from(p2.x);
        let dy = f64::from(p1.y) - f64::from(p2.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// saturates: the referee's numbers are not trusted to stay on the map
    pub fn add(a: Point, b: Point) -> Point {
        Point {
            x: a.x.saturating_add(b.x),
            y: a.y.saturating_add(b.y),
        }
    }

    pub fn shifted_x(&self, dx: i32) -> Point {
        Point::add(*self, Point::new(dx, 0))
    }

    /// keep the point inside the map
    pub fn clamped(&self) -> Point {
        Point {
            x: self.x.clamp(0, BOARD_MAX_X - 1),
            y: self.y.clamp(0, BOARD_MAX_Y - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dist_is_euclidean() {
        let a = Point::new(0, 0);
        let b = Point::new(300, 400);
        assert_eq!(Point::dist(&a, &b), 500.0);
        assert_eq!(Point::dist(&b, &a), 500.0);
    }

    #[test]
    fn add_saturates_at_the_edges() {
        let far = Point::new(i32::MAX - 10, i32::MIN + 10);
        assert_eq!(Point::add(far, Point::new(1000, -1000)), Point::new(i32::MAX, i32::MIN));
        assert_eq!(far.shifted_x(600).clamped(), Point::new(9999, 0));
        assert!(Point::dist(&Point::new(i32::MIN, 0), &Point::new(i32::MAX, 0)).is_finite());
    }

    #[test]
    fn clamped_stays_on_the_map() {
        assert_eq!(Point::new(-600, 12000).clamped(), Point::new(0, 9999));
        assert_eq!(Point::new(4600, 8300).clamped(), Point::new(4600, 8300));
    }
}
