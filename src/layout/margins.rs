use crate::units::Pt;

/// Blank space around the edge of a sheet. Labels are laid out in the area the
/// margins leave behind.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::all(Pt::ZERO)
    }

    /// Combined left and right margins
    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }

    /// Combined top and bottom margins
    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::In;

    #[test]
    fn sums_opposite_sides() {
        let m = Margins::trbl(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0));
        assert_eq!(m.horizontal(), Pt(6.0));
        assert_eq!(m.vertical(), Pt(4.0));
        assert_eq!(Margins::all(In(0.5)).left, Pt(36.0));
    }
}
