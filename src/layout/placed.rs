//! The output of layout: items placed on pages, plus a trace of the logical units
//! (rows, paragraphs, blocks) they came from.
//!
//! Coordinates here run top-down: `y` is the distance from the top edge of the page to
//! the top of the item. Targets convert to their own coordinate space when drawing.

use crate::colour::Colour;
use crate::measure::FontStyle;
use crate::pagesize::PageSize;
use crate::units::Pt;
use crate::variant::ParagraphKind;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
    /// Stretch the line's spaces so it fills the whole width
    Justify,
}

/// One line of text. `x` and `width` describe the box the line is aligned within.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub style: FontStyle,
    pub colour: Colour,
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacedItem {
    Text(TextItem),
    /// A horizontal rule whose top edge is at `y`
    Rule {
        x: Pt,
        y: Pt,
        width: Pt,
        thickness: Pt,
        colour: Colour,
    },
    /// A rectangle, stroked and/or filled
    Frame {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
        stroke: Option<(Colour, Pt)>,
        fill: Option<Colour>,
    },
    /// The letterhead slot; drawn with the letterhead image when one is available,
    /// otherwise with the fallback text
    Letterhead {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
        fallback: String,
    },
}

impl PlacedItem {
    pub fn translate(&mut self, dx: Pt, dy: Pt) {
        match self {
            PlacedItem::Text(TextItem { x, y, .. })
            | PlacedItem::Rule { x, y, .. }
            | PlacedItem::Frame { x, y, .. }
            | PlacedItem::Letterhead { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
        }
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match self {
            PlacedItem::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// The structural section a unit belongs to, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Header,
    Metadata,
    Body,
    Signature,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Letterhead,
    Slogan,
    Title,
    TitleRule,
    DateLine,
    /// A label/value row of the tabular metadata block
    MetadataRow { label: String },
    /// One line of a letter's address block
    SalutationLine,
    /// "Asunto:" or "Ref.:" followed by its wrapped text
    LabelledParagraph { label: String },
    Divider,
    Paragraph(ParagraphKind),
    SignatureRule,
    SignatureLine,
    AuthenticationBox,
    AuthenticationLine,
    Initials,
    Seal,
    AddressLine,
}

/// One logical piece of the document and where it ended up
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutUnit {
    pub section: Section,
    pub kind: UnitKind,
    pub page_index: usize,
    pub top: Pt,
    pub height: Pt,
    /// The unit's text before wrapping (empty for rules and boxes)
    pub text: String,
    /// The wrapped lines as measured
    pub lines: Vec<String>,
    pub style: FontStyle,
    /// Horizontal offset from the left margin
    pub indent: Pt,
    pub align: Align,
}

impl LayoutUnit {
    pub fn bottom(&self) -> Pt {
        self.top + self.height
    }
}

/// A finished page. Footer items are kept apart from the flowing content because they
/// are identical on every page.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutPage {
    /// 1-based page number
    pub number: usize,
    pub items: Vec<PlacedItem>,
    pub footer: Vec<PlacedItem>,
}

impl LaidOutPage {
    pub fn new(number: usize) -> LaidOutPage {
        LaidOutPage {
            number,
            items: Vec::new(),
            footer: Vec::new(),
        }
    }

    /// All text on the page, in placement order
    pub fn text(&self) -> impl Iterator<Item = &TextItem> {
        self.items
            .iter()
            .chain(self.footer.iter())
            .filter_map(PlacedItem::as_text)
    }
}

/// Whether layout produces discrete fixed pages or one continuous surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Paginated,
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub target: Target,
    /// Size of every page; for a continuous surface, the height is that of the content
    pub page_size: PageSize,
    pub pages: Vec<LaidOutPage>,
    pub units: Vec<LayoutUnit>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn units_in(&self, section: Section) -> impl Iterator<Item = &LayoutUnit> {
        self.units.iter().filter(move |u| u.section == section)
    }

    /// Sections in the order they were laid out, each listed once
    pub fn section_order(&self) -> Vec<Section> {
        let mut order: Vec<Section> = self.units.iter().map(|u| u.section).collect();
        order.dedup();
        order
    }

    /// The classification of every body paragraph, in order
    pub fn paragraph_kinds(&self) -> Vec<ParagraphKind> {
        self.units
            .iter()
            .filter_map(|u| match u.kind {
                UnitKind::Paragraph(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    /// Number of wrapped lines of every text unit, in order
    pub fn line_counts(&self) -> Vec<usize> {
        self.units.iter().map(|u| u.lines.len()).collect()
    }
}

/// How a run of wrapped lines is set
#[derive(Debug, Clone)]
pub struct TextRun {
    pub kind: UnitKind,
    /// The text the lines were wrapped from
    pub text: String,
    pub style: FontStyle,
    pub colour: Colour,
    pub x: Pt,
    pub width: Pt,
    pub align: Align,
}

/// A group of items that must land on the same page. Items are positioned relative to
/// the block's top edge and the left margin until the block is placed.
#[derive(Debug, Clone)]
pub struct Block {
    pub label: String,
    pub section: Section,
    pub height: Pt,
    pub(crate) items: Vec<PlacedItem>,
    pub(crate) units: Vec<LayoutUnit>,
}

impl Block {
    pub fn new<S: ToString>(label: S, section: Section) -> Block {
        Block {
            label: label.to_string(),
            section,
            height: Pt(0.0),
            items: Vec::new(),
            units: Vec::new(),
        }
    }

    pub fn gap(&mut self, gap: Pt) {
        self.height += gap;
    }

    /// Stack wrapped lines below what is already in the block
    pub fn lines(&mut self, run: TextRun, lines: Vec<String>, line_height: Pt) {
        let top = self.height;
        let added = self.lines_at(run, top, lines, line_height);
        self.height += added;
    }

    /// Set wrapped lines at a fixed offset without advancing the block. Returns the
    /// height the lines occupy.
    pub fn lines_at(&mut self, run: TextRun, top: Pt, lines: Vec<String>, line_height: Pt) -> Pt {
        let count = lines.len();
        for (i, line) in lines.iter().enumerate() {
            // the last line of a justified run is set flush left
            let align = if run.align == Align::Justify && i + 1 == count {
                Align::Left
            } else {
                run.align
            };
            self.items.push(PlacedItem::Text(TextItem {
                text: line.clone(),
                style: run.style,
                colour: run.colour,
                x: run.x,
                y: top + line_height * i as f32,
                width: run.width,
                align,
            }));
        }
        let height = line_height * count as f32;
        self.units.push(LayoutUnit {
            section: self.section,
            kind: run.kind,
            page_index: 0,
            top,
            height,
            text: run.text,
            lines,
            style: run.style,
            indent: run.x,
            align: run.align,
        });
        height
    }

    /// Add an item that does not advance the block, recording it as a unit
    pub fn overlay(&mut self, kind: UnitKind, item: PlacedItem, top: Pt, height: Pt) {
        self.items.push(item);
        self.units.push(LayoutUnit {
            section: self.section,
            kind,
            page_index: 0,
            top,
            height,
            text: String::new(),
            lines: Vec::new(),
            style: FontStyle::default(),
            indent: Pt(0.0),
            align: Align::Left,
        });
    }

    /// Add a decorative item with no unit of its own
    pub fn decorate(&mut self, item: PlacedItem) {
        self.items.push(item);
    }
}
