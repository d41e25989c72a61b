//! Length units used throughout layout and export.
//!
//! All layout arithmetic happens in [`Pt`] (1/72 inch, the native PDF unit).
//! [`Mm`] and [`In`] exist so geometry can be written the way it is specified
//! on paper and converted with `.into()`.

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Neg};

/// Points, 1/72 of an inch
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    Deref,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
#[serde(transparent)]
pub struct Pt(pub f32);

/// Millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Deref, From, Into, Display)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

/// Inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Deref, From, Into, Display)]
#[display("{_0}in")]
pub struct In(pub f32);

impl Pt {
    pub fn max(self, other: Pt) -> Pt {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }

    pub fn min(self, other: Pt) -> Pt {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    /// `true` when the value is a finite, non-negative length
    pub fn is_valid_length(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * 72.0 / 25.4)
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Self {
        Pt(inches.0 * 72.0)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        Mm(pt.0 * 25.4 / 72.0)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Pt {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// Dividing two lengths yields a plain ratio
impl Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Pt {
        Pt(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millimetres_convert_to_points() {
        let a4_width: Pt = Mm(210.0).into();
        assert!((*a4_width - 595.2756).abs() < 0.001);
        let inch: Pt = In(1.0).into();
        assert_eq!(inch, Pt(72.0));
    }

    #[test]
    fn arithmetic_stays_in_points() {
        let total: Pt = [Pt(1.0), Pt(2.5), Pt(3.5)].into_iter().sum();
        assert_eq!(total, Pt(7.0));
        assert_eq!(Pt(10.0) * 1.5, Pt(15.0));
        assert_eq!(Pt(10.0) / Pt(4.0), 2.5);
        assert_eq!(Pt(3.0).max(Pt(4.0)), Pt(4.0));
        assert_eq!(-Pt(2.0), Pt(-2.0));
    }
}
