use super::{body, footer, header, metadata, signature, LaidOutDocument, LayoutContext, Target};
use crate::error::DocError;
use crate::measure::TextMeasure;
use crate::record::DocumentRecord;
use crate::settings::{RenderStamp, Settings};

/// The stages of a render, run strictly in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Header,
    MetadataBlock,
    Body,
    SignatureBlock,
    FinalizeFooters,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Header => Stage::MetadataBlock,
            Stage::MetadataBlock => Stage::Body,
            Stage::Body => Stage::SignatureBlock,
            Stage::SignatureBlock => Stage::FinalizeFooters,
            Stage::FinalizeFooters | Stage::Done => Stage::Done,
        }
    }
}

/// Drives one document through every stage. A render either produces the complete
/// page set or fails; no partial output is returned.
pub struct Orchestrator<'a, M: TextMeasure + ?Sized> {
    settings: &'a Settings,
    measure: &'a M,
    target: Target,
    stamp: RenderStamp,
}

impl<'a, M: TextMeasure + ?Sized> Orchestrator<'a, M> {
    pub fn new(settings: &'a Settings, measure: &'a M, target: Target) -> Orchestrator<'a, M> {
        Orchestrator {
            settings,
            measure,
            target,
            stamp: RenderStamp::now(),
        }
    }

    pub fn with_stamp(mut self, stamp: RenderStamp) -> Self {
        self.stamp = stamp;
        self
    }

    pub fn render(&self, record: &DocumentRecord) -> Result<LaidOutDocument, DocError> {
        record.validate()?;
        let rule = record.document_type().rule();
        let mut ctx = LayoutContext::new(self.settings, self.measure, self.target, self.stamp);

        let mut stage = Stage::Header;
        while stage != Stage::Done {
            log::debug!(
                "{}: {stage:?} on page {}",
                record.document_type(),
                ctx.cursor.page_index() + 1
            );
            match stage {
                Stage::Header => header::render(&mut ctx, record, &rule)?,
                Stage::MetadataBlock => metadata::render(&mut ctx, record, &rule)?,
                Stage::Body => body::render(&mut ctx, record, &rule)?,
                Stage::SignatureBlock => signature::render(&mut ctx, record)?,
                Stage::FinalizeFooters => footer::finalize(&mut ctx, record)?,
                Stage::Done => {}
            }
            stage = stage.next();
        }

        let document = ctx.finish();
        log::debug!(
            "laid out {} ({} page(s), {} units)",
            record.document_number(),
            document.page_count(),
            document.units.len()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Section, UnitKind};
    use crate::measure::MonospaceMeasure;
    use crate::record::DocumentType;
    use crate::units::Pt;

    fn oficio(paragraphs: &[&str]) -> DocumentRecord {
        DocumentRecord::builder(DocumentType::Oficio)
            .document_number("OFICIO N.° 0045-2025-MRE/DGC")
            .city_and_date("Lima, 3 de marzo de 2025")
            .recipient("Carlos Quispe", "Embajador", "Embajada del Perú en Chile")
            .sender("María Salas", "Directora General", "Ministerio de Relaciones Exteriores")
            .subject("Coordinación de visita oficial")
            .body(paragraphs.iter().copied())
            .build()
            .expect("valid oficio")
    }

    fn render(record: &DocumentRecord, target: Target) -> Result<LaidOutDocument, DocError> {
        let settings = Settings::default();
        Orchestrator::new(&settings, &MonospaceMeasure::default(), target)
            .with_stamp(RenderStamp::now().with_seed(7))
            .render(record)
    }

    #[test]
    fn stages_run_in_order() {
        let mut stage = Stage::Header;
        let mut seen = vec![stage];
        while stage != Stage::Done {
            stage = stage.next();
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::Header,
                Stage::MetadataBlock,
                Stage::Body,
                Stage::SignatureBlock,
                Stage::FinalizeFooters,
                Stage::Done
            ]
        );
    }

    #[test]
    fn sections_are_laid_out_in_document_order() {
        let layout = render(&oficio(&["Tengo el honor de dirigirme a usted."]), Target::Paginated)
            .expect("can lay out");
        assert_eq!(
            layout.section_order(),
            vec![
                Section::Header,
                Section::Metadata,
                Section::Body,
                Section::Signature,
                Section::Footer
            ]
        );
    }

    #[test]
    fn salutation_letter_block() {
        let layout = render(&oficio(&["Texto."]), Target::Paginated).expect("can lay out");
        let salutation: Vec<&str> = layout
            .units_in(Section::Metadata)
            .filter(|u| u.kind == UnitKind::SalutationLine)
            .map(|u| u.text.as_str())
            .collect();
        assert_eq!(
            salutation,
            vec![
                "Señor(a):",
                "CARLOS QUISPE",
                "Embajador",
                "Embajada del Perú en Chile",
                "Presente.-"
            ]
        );
        let dividers = layout
            .units_in(Section::Metadata)
            .filter(|u| u.kind == UnitKind::Divider)
            .count();
        assert_eq!(dividers, 1);
    }

    #[test]
    fn footer_repeats_on_every_page() {
        let long = lipsum::lipsum(180);
        let paragraphs: Vec<&str> = std::iter::repeat(long.as_str()).take(8).collect();
        let layout = render(&oficio(&paragraphs), Target::Paginated).expect("can lay out");
        assert!(layout.page_count() > 1);

        let first = &layout.pages[0].footer;
        assert!(!first.is_empty());
        for page in layout.pages.iter() {
            assert_eq!(&page.footer, first);
        }
        let initials = layout
            .units_in(Section::Footer)
            .find(|u| u.kind == UnitKind::Initials)
            .expect("initials present");
        assert_eq!(initials.text, crate::constants::PLACEHOLDER_INITIALS);
    }

    #[test]
    fn body_never_enters_the_footer_band() {
        let long = lipsum::lipsum(150);
        let paragraphs: Vec<&str> = std::iter::repeat(long.as_str()).take(10).collect();
        let layout = render(&oficio(&paragraphs), Target::Paginated).expect("can lay out");
        let config = Settings::default().layout;
        let limit = config.page_size.1 - config.margins.bottom;
        for unit in layout.units_in(Section::Body) {
            assert!(unit.bottom() <= limit + Pt(0.01), "{unit:?}");
        }
    }

    #[test]
    fn continuous_target_has_a_single_surface() {
        let long = lipsum::lipsum(150);
        let paragraphs: Vec<&str> = std::iter::repeat(long.as_str()).take(10).collect();
        let layout = render(&oficio(&paragraphs), Target::Continuous).expect("can lay out");
        assert_eq!(layout.page_count(), 1);
        assert!(layout.page_size.1 > crate::pagesize::A4.1);
    }
}
