//! Length units used throughout layout.
//!
//! All layout math happens in [`Pt`] (PDF points); label types are described in
//! [`In`] and converted once at resolution time.

use derive_more::{Add, AddAssign, Deref, Display, Div, From, Into, Mul, Neg, Sub, SubAssign, Sum};

/// Number of PDF points in one inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// A length in PDF points (1/72 inch)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    Div,
    Neg,
    Sum,
    Deref,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f64);

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Div, Display, From, Into)]
pub struct In(pub f64);

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    /// The larger of two lengths
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    /// The smaller of two lengths
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    /// Whether two lengths agree to within `epsilon` points
    pub fn approx_eq(self, other: Pt, epsilon: f64) -> bool {
        (self.0 - other.0).abs() <= epsilon
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Self {
        Pt(inches.0 * POINTS_PER_INCH)
    }
}

impl From<Pt> for In {
    fn from(points: Pt) -> Self {
        In(points.0 / POINTS_PER_INCH)
    }
}

// pdf-writer speaks f32
impl From<Pt> for f32 {
    fn from(points: Pt) -> Self {
        points.0 as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inches_convert_to_points() {
        assert_eq!(Pt::from(In(1.0)), Pt(72.0));
        assert_eq!(Pt::from(In(0.5)), Pt(36.0));
        assert_eq!(In::from(Pt(144.0)), In(2.0));
    }

    #[test]
    fn points_support_scalar_arithmetic() {
        let width = Pt(10.0) * 1.2 + Pt(3.0);
        assert!(width.approx_eq(Pt(15.0), 1e-9));
        assert_eq!(Pt(9.0) / 3.0, Pt(3.0));
        assert_eq!(-Pt(2.0), Pt(-2.0));
        let total: Pt = [Pt(1.0), Pt(2.0)].into_iter().sum();
        assert_eq!(total, Pt(3.0));
    }
}
