//! Geometry and transform utilities.
//!
//! Pure math shared by the item model, scene, viewport and packer. Scene
//! coordinates are `f64`; the y axis points down as on screen.
//!
//! `Transform` follows the row-vector affine convention used by most 2D
//! toolkits:
//!
//! ```text
//! x' = m11 * x + m21 * y + dx
//! y' = m12 * x + m22 * y + dy
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A point or vector in 2D.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector from the positive x axis, in radians.
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Sum of absolute components.
    #[inline]
    pub fn manhattan_length(self) -> f64 {
        self.x.abs() + self.y.abs()
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Width and height of a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Smallest rectangle containing both corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self::new(min_x, min_y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Smallest rectangle containing every point. `None` for no points.
    pub fn bounding<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::from_corners(min, max))
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Inclusive containment, edges count as inside.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// True when the rectangles share any point, edges included.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Area of the overlap; zero for rectangles that only touch.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.left().max(other.left());
        let h = self.bottom().min(other.bottom()) - self.top().max(other.top());
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }

    /// Smallest rectangle containing both.
    pub fn united(&self, other: &Rect) -> Rect {
        let min = Point::new(self.left().min(other.left()), self.top().min(other.top()));
        let max = Point::new(
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        );
        Rect::from_corners(min, max)
    }

    /// Grow (or shrink, for negative values) each edge by the given amounts.
    pub fn adjusted(&self, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect::new(
            self.x + left,
            self.y + top,
            self.width - left + right,
            self.height - top + bottom,
        )
    }

    pub fn translated(&self, by: Point) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }
}

/// A 2D affine transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    /// Clockwise rotation on screen (y down) by `degrees`.
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            m11: cos,
            m12: sin,
            m21: -sin,
            m22: cos,
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// `self` applied first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.m11 * p.x + self.m21 * p.y + self.dx,
            self.m12 * p.x + self.m22 * p.y + self.dy,
        )
    }

    /// Maps a vector, ignoring translation.
    #[inline]
    pub fn map_vector(&self, v: Point) -> Point {
        Point::new(self.m11 * v.x + self.m21 * v.y, self.m12 * v.x + self.m22 * v.y)
    }

    /// Axis-aligned bounds of the mapped rectangle.
    pub fn map_rect(&self, r: &Rect) -> Rect {
        Rect::bounding(r.corners().map(|c| self.map_point(c))).unwrap_or_default()
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Inverse transform, `None` when singular.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let m11 = self.m22 * inv;
        let m12 = -self.m12 * inv;
        let m21 = -self.m21 * inv;
        let m22 = self.m11 * inv;
        Some(Transform {
            m11,
            m12,
            m21,
            m22,
            dx: -(self.dx * m11 + self.dy * m21),
            dy: -(self.dx * m12 + self.dy * m22),
        })
    }

    /// Rotation of the linear part: `atan2(m12, m11)`, in radians, not normalized.
    #[inline]
    pub fn rotation_radians(&self) -> f64 {
        self.m12.atan2(self.m11)
    }

    /// Uniform scale of the linear part (length of the mapped x axis).
    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.m11.hypot(self.m12)
    }
}

/// Degrees folded into `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Signed angle, in degrees, that turns `from` onto `to` around `pivot`.
pub fn signed_angle_degrees(pivot: Point, from: Point, to: Point) -> f64 {
    let a = (from - pivot).angle();
    let b = (to - pivot).angle();
    let mut delta = (b - a).to_degrees();
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Rotates `p` around `pivot` by `degrees`.
pub fn rotate_around(p: Point, pivot: Point, degrees: f64) -> Point {
    pivot + Transform::rotation(degrees).map_vector(p - pivot)
}
