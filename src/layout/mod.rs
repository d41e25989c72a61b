//! Document layout: turning a [`DocumentRecord`](crate::DocumentRecord) into placed
//! pages.
//!
//! The [`Orchestrator`] runs the section renderers in a fixed order. Each renderer
//! measures its text through a [`TextMeasure`], packs it into [`Block`]s and hands them
//! to the [`LayoutContext`], which reserves room on the [`PaginationCursor`] and breaks
//! pages so that no block is ever split.
//!
//! # Example
//!
//! ```
//! use oficio::{DocumentRecord, DocumentType, MonospaceMeasure, Settings};
//! use oficio::layout::{Orchestrator, Target};
//!
//! let record = DocumentRecord::builder(DocumentType::Memorandum)
//!     .document_number("MEMORÁNDUM N.° 5-2025-MRE/DGA")
//!     .sender("Luis Paredes", "Director General", "Ministerio de Relaciones Exteriores")
//!     .recipient("Ana Torres", "Directora", "")
//!     .subject("Inventario anual")
//!     .paragraph("Se solicita remitir el inventario.")
//!     .build()
//!     .expect("valid record");
//!
//! let settings = Settings::default();
//! let layout = Orchestrator::new(&settings, &MonospaceMeasure::default(), Target::Paginated)
//!     .render(&record)
//!     .expect("can lay out");
//! assert_eq!(layout.page_count(), 1);
//! ```

mod body;
mod cursor;
mod footer;
mod header;
mod margins;
mod metadata;
mod orchestrator;
mod placed;
mod signature;

pub use cursor::*;
pub use margins::*;
pub use orchestrator::*;
pub use placed::*;

use crate::constants::OfficialConstants;
use crate::error::DocError;
use crate::measure::{FontStyle, TextMeasure};
use crate::settings::{LayoutConfig, RenderStamp, Settings};
use crate::units::Pt;

/// Everything a section renderer works with during one render. Owned by a single
/// render; never shared between documents.
pub struct LayoutContext<'a, M: TextMeasure + ?Sized> {
    settings: &'a Settings,
    measure: &'a M,
    pub stamp: RenderStamp,
    pub target: Target,
    pub cursor: PaginationCursor,
    pages: Vec<LaidOutPage>,
    units: Vec<LayoutUnit>,
}

impl<'a, M: TextMeasure + ?Sized> LayoutContext<'a, M> {
    pub fn new(
        settings: &'a Settings,
        measure: &'a M,
        target: Target,
        stamp: RenderStamp,
    ) -> LayoutContext<'a, M> {
        let config = &settings.layout;
        let bounds = match target {
            Target::Paginated => ContentBounds::new(
                config.margins.top,
                config.page_size.1 - config.margins.bottom,
            ),
            Target::Continuous => ContentBounds::unbounded(config.margins.top),
        };

        LayoutContext {
            settings,
            measure,
            stamp,
            target,
            cursor: PaginationCursor::new(bounds),
            pages: vec![LaidOutPage::new(1)],
            units: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a LayoutConfig {
        &self.settings.layout
    }

    pub fn constants(&self) -> &'a OfficialConstants {
        &self.settings.constants
    }

    pub fn measure(&self) -> &'a M {
        self.measure
    }

    pub fn content_width(&self) -> Pt {
        self.config().content_width()
    }

    pub fn wrap(&self, text: &str, width: Pt, style: &FontStyle) -> Result<Vec<String>, DocError> {
        self.measure.measure(text, width, style)
    }

    pub fn line_height(&self, style: &FontStyle) -> Pt {
        self.measure.line_height(style)
    }

    /// Advance the cursor by a gap that collapses at page boundaries
    pub fn skip(&mut self, gap: Pt) {
        self.cursor.skip(gap);
    }

    /// Start a new page when a run of `height` that must stay together fits on an
    /// empty page but not in what is left of this one
    pub fn keep_together(&mut self, label: &str, height: Pt) {
        let cursor = &self.cursor;
        if cursor.at_page_top()
            || height <= cursor.remaining_height()
            || height > cursor.bounds().usable_height()
        {
            return;
        }
        log::debug!(
            "{label} kept with what follows on page {}",
            cursor.page_index() + 2
        );
        self.cursor.break_page();
    }

    /// Reserve room for a block on the cursor and put its contents on the page it
    /// landed on
    pub fn place(&mut self, block: Block) -> Result<Reservation, DocError> {
        let reservation =
            self.cursor
                .reserve(block.height)
                .map_err(|Oversized { height, usable }| DocError::OversizedAtomicUnit {
                    unit: block.label.clone(),
                    height,
                    usable,
                })?;

        if !reservation.fits {
            log::debug!(
                "{} moved to page {}",
                block.label,
                reservation.page_index + 1
            );
        }

        while self.pages.len() <= reservation.page_index {
            let number = self.pages.len() + 1;
            self.pages.push(LaidOutPage::new(number));
        }

        let left = self.config().margins.left;
        let Block { items, units, .. } = block;
        let page = &mut self.pages[reservation.page_index];
        page.items.extend(items.into_iter().map(|mut item| {
            item.translate(left, reservation.top);
            item
        }));
        self.units.extend(units.into_iter().map(|mut unit| {
            unit.page_index = reservation.page_index;
            unit.top += reservation.top;
            unit
        }));

        Ok(reservation)
    }

    /// Copy `block` onto every page at `origin` (an offset from the top of the page).
    /// Its units are recorded once.
    pub(crate) fn stamp_every_page(&mut self, block: Block, origin: Pt) {
        let left = self.config().margins.left;
        let Block { items, units, .. } = block;
        let items: Vec<PlacedItem> = items
            .into_iter()
            .map(|mut item| {
                item.translate(left, origin);
                item
            })
            .collect();

        for page in self.pages.iter_mut() {
            page.footer = items.clone();
        }
        self.units.extend(units.into_iter().map(|mut unit| {
            unit.top += origin;
            unit
        }));
    }

    pub(crate) fn finish(self) -> LaidOutDocument {
        let config = self.config();
        let page_size = match self.target {
            Target::Paginated => config.page_size,
            Target::Continuous => (
                config.page_size.0,
                self.cursor.position() + config.margins.bottom,
            ),
        };

        LaidOutDocument {
            target: self.target,
            page_size,
            pages: self.pages,
            units: self.units,
        }
    }
}
