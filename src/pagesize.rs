//! The paper format official documents are printed on.
//!
//! ```
//! use oficio::pagesize::A4;
//!
//! assert!(A4.0 < A4.1);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// iso a-series (converted from mm to points)
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
