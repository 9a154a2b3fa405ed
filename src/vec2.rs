#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

use core::ops::{Add, Div, Mul, Sub};

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Add<T, Output = T> + Copy> Add<Vec2<T>> for Vec2<T> {
    type Output = Vec2<T>;
    fn add(self, other: Vec2<T>) -> Self::Output {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<T: Sub<T, Output = T> + Copy> Sub<Vec2<T>> for Vec2<T> {
    type Output = Vec2<T>;
    fn sub(self, other: Vec2<T>) -> Self::Output {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<T: Mul<T, Output = T> + Copy> Mul<T> for Vec2<T> {
    type Output = Vec2<T>;
    fn mul(self, other: T) -> Self::Output {
        Vec2 {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl<T: Div<T, Output = T> + Copy> Div<T> for Vec2<T> {
    type Output = Vec2<T>;
    fn div(self, other: T) -> Self::Output {
        Vec2 {
            x: self.x / other,
            y: self.y / other,
        }
    }
}

/// A screen coordinate. Obstacles, endpoints and paths are all expressed in these.
pub type Point = Vec2<i32>;

/// Intermediate results of projections and edge intersections.
pub type FloatPoint = Vec2<f64>;

impl Point {
    /// Terminates a serialized path buffer. Queries that use this point as an endpoint
    /// or vertex are rejected with `Error::InvalidCoordinate`.
    pub const SENTINEL: Point = Vec2 {
        x: 0x7777,
        y: 0x7777,
    };

    pub fn sqr_dist(self, other: Point) -> i64 {
        let dx = (self.x as i64) - (other.x as i64);
        let dy = (self.y as i64) - (other.y as i64);
        dx * dx + dy * dy
    }

    pub fn dist(self, other: Point) -> f64 {
        (self.sqr_dist(other) as f64).sqrt()
    }

    pub fn to_float(self) -> FloatPoint {
        Vec2 {
            x: self.x as f64,
            y: self.y as f64,
        }
    }
}

impl FloatPoint {
    /// Rounds half-up on both axes.
    pub fn round(self) -> Point {
        Vec2 {
            x: (self.x + 0.5).floor() as i32,
            y: (self.y + 0.5).floor() as i32,
        }
    }

    pub fn floor(self) -> Point {
        Vec2 {
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
        }
    }

    pub fn sqr_dist(self, other: FloatPoint) -> f64 {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Vec2<T> {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(fmt, "({:?}, {:?})", self.x, self.y)
    }
}
