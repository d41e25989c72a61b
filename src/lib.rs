//! Layout and pagination of official ministry correspondence.
//!
//! A [`DocumentRecord`] is laid out by the [`layout::Orchestrator`] into either fixed A4
//! pages, which [`PdfExporter`] writes as a PDF, or one continuous surface, which
//! [`Preview`] renders as HTML or plain text.

use std::time::Instant;

mod colour;
pub use colour::*;

mod constants;
pub use constants::*;

pub(crate) mod content;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod export;
pub use export::*;

mod font;
pub use font::*;

mod form_xobject;
pub use form_xobject::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Placing a document's sections on pages
pub mod layout;

mod measure;
pub use measure::*;

mod page;
pub use page::*;

pub mod pagesize;

mod preview;
pub use preview::*;

mod record;
pub use record::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod settings;
pub use settings::*;

mod units;
pub use units::*;

mod variant;
pub use variant::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;

/// Lay out `record` on A4 pages and export it. The record's year name is replaced by
/// the official one before layout.
pub fn render_pdf(
    record: &DocumentRecord,
    settings: &Settings,
    exporter: PdfExporter,
    stamp: RenderStamp,
) -> Result<Vec<u8>, DocError> {
    let t0 = Instant::now();

    let record = record.clone().canonicalize(&settings.constants);
    let laid_out = {
        let measure = exporter.measure();
        layout::Orchestrator::new(settings, &measure, layout::Target::Paginated)
            .with_stamp(stamp)
            .render(&record)?
    };
    let t_layout = t0.elapsed();

    let bytes = exporter.export(&laid_out, &record, &stamp)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, export={:.1}ms, total={:.1}ms ({} page(s), {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        laid_out.page_count(),
        bytes.len(),
    );

    Ok(bytes)
}

/// Lay out `record` on one continuous surface for the reflowable preview
pub fn render_preview(
    record: &DocumentRecord,
    settings: &Settings,
    stamp: RenderStamp,
) -> Result<Preview, DocError> {
    let t0 = Instant::now();

    let record = record.clone().canonicalize(&settings.constants);
    let laid_out = layout::Orchestrator::new(
        settings,
        &MonospaceMeasure::default(),
        layout::Target::Continuous,
    )
    .with_stamp(stamp)
    .render(&record)?;

    log::info!(
        "Timing: preview layout={:.1}ms ({} units)",
        t0.elapsed().as_secs_f64() * 1000.0,
        laid_out.units.len(),
    );

    Ok(Preview::new(laid_out, settings))
}
