//! Points in projected (cartesian) coordinates.

pub use nalgebra::Point2;
use nalgebra::Scalar;
use num_traits::{Bounded, FromPrimitive, Num, One};

/// 2d point in projected coordinates with `f64` components.
pub type Point2d = Point2<f64>;

/// Point in 2d cartesian coordinate space.
pub trait CartesianPoint2d {
    /// Numeric type used to represent coordinates.
    type Num: Num + Copy + PartialOrd + Bounded + FromPrimitive;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Squared euclidean distance to the other point.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        dx * dx + dy * dy
    }

    /// Point halfway between this one and `other`.
    fn midpoint<P: NewCartesianPoint2d<Self::Num>>(
        &self,
        other: &impl CartesianPoint2d<Num = Self::Num>,
    ) -> P {
        let two = Self::Num::one() + Self::Num::one();
        P::new((self.x() + other.x()) / two, (self.y() + other.y()) / two)
    }
}

/// Cartesian point that can be constructed from its coordinates.
pub trait NewCartesianPoint2d<Num = f64>: CartesianPoint2d<Num = Num> + Sized {
    /// Creates a new point.
    fn new(x: Num, y: Num) -> Self;
}

impl<N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> CartesianPoint2d for Point2<N> {
    type Num = N;

    fn x(&self) -> N {
        self.x
    }

    fn y(&self) -> N {
        self.y
    }
}

impl<N: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> NewCartesianPoint2d<N>
    for Point2<N>
{
    fn new(x: N, y: N) -> Self {
        Point2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_of_two_points() {
        let a = Point2d::new(0.0, 10.0);
        let b = Point2d::new(400.0, -10.0);
        let mid: Point2d = a.midpoint(&b);
        assert_eq!(mid, Point2d::new(200.0, 0.0));
    }

    #[test]
    fn squared_distance() {
        let a = Point2d::new(1.0, 1.0);
        let b = Point2d::new(4.0, 5.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert_eq!(b.distance_sq(&a), 25.0);
    }
}
