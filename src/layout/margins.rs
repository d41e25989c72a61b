use crate::units::{Mm, Pt};
use serde::{Deserialize, Serialize};

/// Page margins. The top margin is where the write cursor starts on every page, and
/// the bottom margin is the band reserved for the repeating footer and seal: body
/// content never extends into it.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
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

    /// The margins used on ministry stationery: 20mm top, 25mm sides, and a 40mm
    /// bottom band for the footer and seal
    pub fn official() -> Margins {
        Margins::trbl(
            Mm(20.0).into(),
            Mm(25.0).into(),
            Mm(40.0).into(),
            Mm(25.0).into(),
        )
    }
}
