use nalgebra::{Point2, Rotation2, Vector2};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 2D point (or vector) in drawing coordinates, with the y axis pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Scales the point's distance from `origin` by `factor`.
    pub fn scale(&mut self, factor: f64, origin: Point) -> &mut Self {
        self.x = origin.x + (self.x - origin.x) * factor;
        self.y = origin.y + (self.y - origin.y) * factor;
        self
    }

    /// Rotates the point around `origin` by `degrees`.
    ///
    /// The rotation keeps the distance to `origin` and advances the polar angle, rather
    /// than applying a rotation matrix, so repeated rotations never drift in length.
    pub fn rotate(&mut self, degrees: f64, origin: Point) -> &mut Self {
        let length = self.distance(&origin);
        if length == 0.0 {
            return self;
        }
        let angle = (origin.angle_to(self) + degrees).to_radians();
        self.x = origin.x + length * angle.cos();
        self.y = origin.y + length * angle.sin();
        self
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        nalgebra::distance(&Point2::from(*self), &Point2::from(*other))
    }

    /// Polar angle of this point seen as a vector, in degrees within `[0, 360)`.
    pub fn angle(&self) -> f64 {
        let degrees = self.y.atan2(self.x).to_degrees();
        if degrees < 0.0 { degrees + 360.0 } else { degrees }
    }

    /// Polar angle of the vector from `self` to `other`, in degrees within `[0, 360)`.
    pub fn angle_to(&self, other: &Point) -> f64 {
        (*other - *self).angle()
    }

    pub fn middle(p1: &Point, p2: &Point) -> Point {
        Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
    }

    /// Hit-test against the segment `p1`-`p2`.
    ///
    /// The tolerance is scaled by `50 / |p1 p2|` so that the accepted band stays constant
    /// in screen space regardless of zoom. Degenerate segments fall back to a plain
    /// distance test against `p1`.
    pub fn on_line(&self, p1: &Point, p2: &Point, tor: f64) -> bool {
        let d = p1.distance(p2);
        if d == 0.0 {
            return self.distance(p1) <= tor;
        }
        (self.distance(p1) + self.distance(p2) - d).abs() <= tor * (50.0 / d)
    }

    pub fn rotated_by(&self, rotation: &Rotation2<f64>, origin: Point) -> Point {
        let v = rotation * Vector2::new(self.x - origin.x, self.y - origin.y);
        Point::new(origin.x + v.x, origin.y + v.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<Point> for Point2<f64> {
    fn from(p: Point) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl From<Point2<f64>> for Point {
    fn from(p: Point2<f64>) -> Self {
        Point::new(p.x, p.y)
    }
}

/// An axis-aligned rectangle in drawing coordinates (`top` is the smaller y).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid rectangle string '{0}': expected 'left top width height'")]
pub struct ParseRectError(pub String);

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The smallest rectangle spanning both corner points, in any order.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let left = p1.x.min(p2.x);
        let top = p1.y.min(p2.y);
        Self::new(left, top, (p1.x - p2.x).abs(), (p1.y - p2.y).abs())
    }

    /// Bounding box of a point set, or `None` for an empty set.
    pub fn bounding<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::new(first.x, first.y, 0.0, 0.0);
        for p in iter {
            rect.union_point(p);
        }
        Some(rect)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    pub fn union(&mut self, other: &Rect) -> &mut Self {
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        self.left = self.left.min(other.left);
        self.top = self.top.min(other.top);
        self.width = right - self.left;
        self.height = bottom - self.top;
        self
    }

    pub fn union_point(&mut self, p: Point) -> &mut Self {
        self.union(&Rect::new(p.x, p.y, 0.0, 0.0))
    }

    /// Grows the rectangle by `dx` on the left and right and `dy` on the top and bottom.
    pub fn inflate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.left -= dx;
        self.top -= dy;
        self.width += 2.0 * dx;
        self.height += 2.0 * dy;
        self
    }

    pub fn offset(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.left += dx;
        self.top += dy;
        self
    }
}

impl fmt::Display for Rect {
    /// Wire form: `left top width height` with the y axis flipped, so the stored top is
    /// `-top - height`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} {:.3} {:.3} {:.3}",
            self.left,
            -self.top - self.height,
            self.width,
            self.height
        )
    }
}

impl FromStr for Rect {
    type Err = ParseRectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| ParseRectError(s.to_string()))?;
        match values.as_slice() {
            [left, flipped_top, width, height] => {
                Ok(Rect::new(*left, -flipped_top - height, *width, *height))
            }
            _ => Err(ParseRectError(s.to_string())),
        }
    }
}
