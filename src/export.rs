//! PDF export of a paginated layout.
//!
//! Layout works top-down from the page's top edge; PDF space runs bottom-up from the
//! bottom edge, so every item is flipped against the page height here. Text is drawn
//! from its baseline, one font ascent below the top of its line.

use crate::colour::colours;
use crate::document::Document;
use crate::font::{FontFiles, FontMeasure, FontSet};
use crate::form_xobject::{FormXObject, FormXObjectLayout};
use crate::image::Image;
use crate::info::Info;
use crate::layout::{Align, LaidOutDocument, PlacedItem, Target, TextItem};
use crate::measure::{FontStyle, TextMeasure};
use crate::page::{ImageLayout, Page, PageContents, RectLayout, SpanFont, SpanLayout};
use crate::pagesize::PageSize;
use crate::record::DocumentRecord;
use crate::rect::Rect;
use crate::settings::RenderStamp;
use crate::units::Pt;
use crate::DocError;
use id_arena::Id;

/// Size of the fallback text drawn when there is no letterhead image
const LETTERHEAD_FALLBACK_SIZE: Pt = Pt(8.0);

/// Turns a laid out document into PDF bytes. Layout must be measured with
/// [`PdfExporter::measure`] so that line breaks match the fonts that get drawn.
pub struct PdfExporter {
    document: Document,
    fonts: FontSet,
    logo: Option<Id<Image>>,
}

impl PdfExporter {
    /// Export with the standard Times and Helvetica fonts; nothing is embedded
    pub fn with_standard_fonts() -> PdfExporter {
        let mut document = Document::default();
        let fonts = FontSet::standard(&mut document.fonts);
        PdfExporter {
            document,
            fonts,
            logo: None,
        }
    }

    /// Export with embedded TrueType/OpenType fonts
    pub fn with_embedded_fonts(files: FontFiles) -> Result<PdfExporter, DocError> {
        let mut document = Document::default();
        let fonts = FontSet::embedded(&mut document.fonts, files)?;
        Ok(PdfExporter {
            document,
            fonts,
            logo: None,
        })
    }

    /// Draw this image in the letterhead slot instead of the fallback text
    pub fn set_logo(&mut self, image: Image) {
        self.logo = Some(self.document.add_image(image));
    }

    pub fn measure(&self) -> FontMeasure<'_> {
        FontMeasure::new(&self.document.fonts, &self.fonts)
    }

    pub fn export(
        mut self,
        layout: &LaidOutDocument,
        record: &DocumentRecord,
        stamp: &RenderStamp,
    ) -> Result<Vec<u8>, DocError> {
        if layout.target != Target::Paginated {
            log::warn!("exporting a continuous layout as a single tall PDF page");
        }
        if self.logo.is_none() {
            log::warn!("no letterhead image, printing the fallback text");
        }

        // the footer is identical on every page: draw it once into a form
        let page_size = layout.page_size;
        let shared_footer = layout.pages.first().map(|page| page.footer.clone());
        let footer_form = match &shared_footer {
            Some(items) if !items.is_empty() => {
                let mut form = FormXObject::new(page_size.0, page_size.1);
                for item in items {
                    form.contents.extend(self.draw(item, page_size)?);
                }
                Some(self.document.add_form_xobject(form))
            }
            _ => None,
        };

        for laid_out in layout.pages.iter() {
            let mut page = Page::new(page_size);
            for item in laid_out.items.iter() {
                page.contents.extend(self.draw(item, page_size)?);
            }
            match footer_form {
                Some(xobj_id) if Some(&laid_out.footer) == shared_footer.as_ref() => {
                    page.add_form_xobject(FormXObjectLayout { xobj_id });
                }
                _ => {
                    for item in laid_out.footer.iter() {
                        page.contents.extend(self.draw(item, page_size)?);
                    }
                }
            }
            self.document.add_page(page);
        }

        let mut info = Info::new();
        info.title(record.document_number())
            .author(record.sender_name())
            .subject(record.subject())
            .keywords(format!(
                "{}, {}",
                record.document_type().label(),
                record.urgency().label()
            ))
            .creation_date(stamp.timestamp);
        self.document.set_info(info);

        let mut out = Vec::new();
        self.document.write(&mut out)?;
        Ok(out)
    }

    fn draw(&self, item: &PlacedItem, page_size: PageSize) -> Result<Vec<PageContents>, DocError> {
        let page_height = page_size.1;
        let contents = match item {
            PlacedItem::Text(text) => vec![PageContents::Text(self.spans(text, page_height)?)],
            PlacedItem::Rule {
                x,
                y,
                width,
                thickness,
                colour,
            } => vec![PageContents::Rect(RectLayout {
                rect: flip(*x, *y, *width, *thickness, page_height),
                stroke: None,
                fill: Some(*colour),
            })],
            PlacedItem::Frame {
                x,
                y,
                width,
                height,
                stroke,
                fill,
            } => vec![PageContents::Rect(RectLayout {
                rect: flip(*x, *y, *width, *height, page_height),
                stroke: *stroke,
                fill: *fill,
            })],
            PlacedItem::Letterhead {
                x,
                y,
                width,
                height,
                fallback,
            } => match self.logo.and_then(|id| self.document.images.get(id).map(|img| (id, img))) {
                Some((image_id, image)) => {
                    // fit inside the slot, keeping the aspect ratio, anchored top-left
                    let fitted_width = (*height * image.aspect_ratio()).min(*width);
                    let fitted_height = fitted_width / image.aspect_ratio();
                    vec![PageContents::Image(ImageLayout {
                        image_id,
                        position: flip(*x, *y, fitted_width, fitted_height, page_height),
                    })]
                }
                None => {
                    let text = TextItem {
                        text: fallback.clone(),
                        style: FontStyle::sans(LETTERHEAD_FALLBACK_SIZE).bold(),
                        colour: colours::BLACK,
                        x: *x,
                        y: *y,
                        width: *width,
                        align: Align::Left,
                    };
                    vec![PageContents::Text(self.spans(&text, page_height)?)]
                }
            },
        };
        Ok(contents)
    }

    /// Position one line of text. Justified lines are set word by word so the spare
    /// width is spread over the gaps; this works the same for every font encoding.
    fn spans(&self, item: &TextItem, page_height: Pt) -> Result<Vec<SpanLayout>, DocError> {
        let measure = self.measure();
        let font = SpanFont {
            id: self.fonts.id(&item.style),
            size: item.style.size,
        };
        let baseline = page_height - (item.y + measure.ascent(&item.style));
        let span = |text: &str, x: Pt| SpanLayout {
            text: text.to_string(),
            font,
            colour: item.colour,
            coords: (x, baseline),
        };

        let line = item.text.trim_end();
        let text_width = measure.text_width(line, &item.style)?;
        let spare = (item.width - text_width).max(Pt(0.0));

        let spans = match item.align {
            Align::Left => vec![span(line, item.x)],
            Align::Right => vec![span(line, item.x + spare)],
            Align::Center => vec![span(line, item.x + spare / 2.0)],
            Align::Justify => {
                let words: Vec<&str> = line.split(' ').filter(|w| !w.is_empty()).collect();
                if words.len() < 2 {
                    vec![span(line, item.x)]
                } else {
                    let mut word_widths = Vec::with_capacity(words.len());
                    for word in words.iter() {
                        word_widths.push(measure.text_width(word, &item.style)?);
                    }
                    let total: Pt = word_widths.iter().copied().sum();
                    let gap = (item.width - total).max(Pt(0.0)) / (words.len() - 1) as f32;
                    let mut x = item.x;
                    let mut spans = Vec::with_capacity(words.len());
                    for (word, width) in words.iter().zip(word_widths) {
                        spans.push(span(word, x));
                        x += width + gap;
                    }
                    spans
                }
            }
        };
        Ok(spans)
    }
}

/// Convert a top-down box into a PDF rectangle
fn flip(x: Pt, y: Pt, width: Pt, height: Pt, page_height: Pt) -> Rect {
    Rect {
        x1: x,
        y1: page_height - y - height,
        x2: x + width,
        y2: page_height - y,
    }
}

/// The file name an exported document is saved under: the document number with path
/// separators and dots replaced, or `documento.pdf` when there is no number
pub fn export_file_name(document_number: &str) -> String {
    let stem: String = document_number
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '.' => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "documento.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}
