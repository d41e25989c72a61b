use crate::units::Pt;

/// The vertical band of a page that flowing content may occupy, measured from the top
/// edge of the page. The same for every page of a document. A continuous (preview)
/// surface has an infinite bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub top: Pt,
    pub bottom: Pt,
}

impl ContentBounds {
    pub fn new(top: Pt, bottom: Pt) -> ContentBounds {
        ContentBounds { top, bottom }
    }

    /// Bounds that never run out of room
    pub fn unbounded(top: Pt) -> ContentBounds {
        ContentBounds {
            top,
            bottom: Pt(f32::INFINITY),
        }
    }

    pub fn usable_height(&self) -> Pt {
        self.bottom - self.top
    }
}

/// Where a reserved unit landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reservation {
    pub page_index: usize,
    /// Offset of the unit's top edge from the top of its page
    pub top: Pt,
    /// `false` when a page break happened to make room
    pub fits: bool,
}

/// A unit that cannot fit even on an empty page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oversized {
    pub height: Pt,
    pub usable: Pt,
}

/// The write head of a render: which page is being filled and how far down it is
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationCursor {
    page_index: usize,
    position: Pt,
    bounds: ContentBounds,
}

impl PaginationCursor {
    pub fn new(bounds: ContentBounds) -> PaginationCursor {
        PaginationCursor {
            page_index: 0,
            position: bounds.top,
            bounds,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Offset of the write head from the top of the current page
    pub fn position(&self) -> Pt {
        self.position
    }

    pub fn bounds(&self) -> ContentBounds {
        self.bounds
    }

    pub fn remaining_height(&self) -> Pt {
        self.bounds.bottom - self.position
    }

    pub fn at_page_top(&self) -> bool {
        self.position == self.bounds.top
    }

    /// Claim `height` for one atomic unit. If it does not fit in what is left of the
    /// current page, the page is broken first and the unit goes whole onto the next one.
    pub fn reserve(&mut self, height: Pt) -> Result<Reservation, Oversized> {
        let usable = self.bounds.usable_height();
        if !height.is_valid_length() || height > usable {
            return Err(Oversized { height, usable });
        }

        let fits = height <= self.remaining_height();
        if !fits {
            self.break_page();
        }

        let top = self.position;
        self.position += height;
        Ok(Reservation {
            page_index: self.page_index,
            top,
            fits,
        })
    }

    /// Advance by a gap. Gaps stop at the bottom of the page and never cause a break.
    pub fn skip(&mut self, gap: Pt) {
        if self.at_page_top() && self.page_index > 0 {
            return;
        }
        self.position = (self.position + gap).min(self.bounds.bottom);
    }

    pub fn break_page(&mut self) {
        self.page_index += 1;
        self.position = self.bounds.top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> PaginationCursor {
        PaginationCursor::new(ContentBounds::new(Pt(50.0), Pt(150.0)))
    }

    #[test]
    fn reserves_in_place_when_there_is_room() {
        let mut c = cursor();
        let r = c.reserve(Pt(40.0)).unwrap();
        assert_eq!(r, Reservation { page_index: 0, top: Pt(50.0), fits: true });
        assert_eq!(c.remaining_height(), Pt(60.0));
    }

    #[test]
    fn defers_a_whole_unit_to_the_next_page() {
        let mut c = cursor();
        c.reserve(Pt(70.0)).unwrap();
        let r = c.reserve(Pt(40.0)).unwrap();
        assert!(!r.fits);
        assert_eq!(r.page_index, 1);
        assert_eq!(r.top, Pt(50.0));
        assert_eq!(c.position(), Pt(90.0));
    }

    #[test]
    fn a_unit_taller_than_a_page_is_rejected() {
        let mut c = cursor();
        let err = c.reserve(Pt(101.0)).unwrap_err();
        assert_eq!(err.usable, Pt(100.0));
        // nothing moved
        assert_eq!(c.page_index(), 0);
        assert!(c.at_page_top());
        assert!(c.reserve(Pt(100.0)).unwrap().fits);
    }

    #[test]
    fn gaps_collapse_at_page_boundaries() {
        let mut c = cursor();
        c.reserve(Pt(95.0)).unwrap();
        c.skip(Pt(20.0));
        assert_eq!(c.remaining_height(), Pt(0.0));
        assert_eq!(c.page_index(), 0);

        c.break_page();
        c.skip(Pt(20.0));
        assert!(c.at_page_top());
    }

    #[test]
    fn unbounded_surfaces_never_break() {
        let mut c = PaginationCursor::new(ContentBounds::unbounded(Pt(0.0)));
        for _ in 0..1000 {
            assert!(c.reserve(Pt(500.0)).unwrap().fits);
        }
        assert_eq!(c.page_index(), 0);
    }
}
