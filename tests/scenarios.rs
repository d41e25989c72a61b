use oficio::layout::{LaidOutDocument, Orchestrator, Section, Target, UnitKind};
use oficio::{
    render_preview, DocError, DocumentRecord, DocumentType, FontStyle, MonospaceMeasure,
    OfficialConstants, ParagraphKind, PdfExporter, Pt, RenderStamp, Settings, TextMeasure,
    OFFICIAL_YEAR_NAME,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn record(document_type: DocumentType, paragraphs: &[String]) -> DocumentRecord {
    DocumentRecord::builder(document_type)
        .document_number(format!("{} N.° 0012-2025-MRE/DGA", document_type.label().to_uppercase()))
        .city_and_date("Lima, 14 de abril de 2025")
        .recipient("Ana Torres", "Directora de Logística", "Oficina General de Administración")
        .sender("Luis Paredes", "Director General", "Ministerio de Relaciones Exteriores")
        .subject("Renovación del parque automotor")
        .body(paragraphs.iter())
        .build()
        .expect("valid record")
}

fn short_paragraphs(count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| format!("Párrafo {n}. Se pone en conocimiento lo solicitado."))
        .collect()
}

fn lay_out(record: &DocumentRecord, target: Target) -> Result<LaidOutDocument, DocError> {
    let settings = Settings::default();
    Orchestrator::new(&settings, &MonospaceMeasure::default(), target)
        .with_stamp(RenderStamp::now().with_seed(42))
        .render(record)
}

fn metadata_kinds(layout: &LaidOutDocument) -> Vec<UnitKind> {
    layout
        .units_in(Section::Metadata)
        .map(|u| u.kind.clone())
        .collect()
}

#[test]
fn metadata_block_follows_the_variant_style() {
    init();
    for document_type in DocumentType::ALL {
        let layout = lay_out(&record(document_type, &short_paragraphs(2)), Target::Paginated)
            .expect("can lay out");
        let kinds = metadata_kinds(&layout);
        let rows = kinds
            .iter()
            .filter(|k| matches!(k, UnitKind::MetadataRow { .. }))
            .count();
        let salutation = kinds
            .iter()
            .filter(|k| **k == UnitKind::SalutationLine)
            .count();
        let dividers = kinds.iter().filter(|k| **k == UnitKind::Divider).count();

        match document_type {
            DocumentType::Memorandum | DocumentType::InformeTecnico => {
                assert_eq!(rows, 4, "{document_type}");
                assert_eq!(salutation, 0, "{document_type}");
                assert_eq!(dividers, 1, "{document_type}");
            }
            DocumentType::Oficio | DocumentType::CartaDiplomatica => {
                assert_eq!(rows, 0, "{document_type}");
                assert!(salutation > 0, "{document_type}");
                assert_eq!(dividers, 1, "{document_type}");
                assert!(kinds.contains(&UnitKind::LabelledParagraph {
                    label: "Asunto:".to_string()
                }));
            }
            DocumentType::ResolucionMinisterial => {
                assert!(kinds.is_empty(), "{document_type}");
            }
        }
    }
}

#[test]
fn memorandum_with_three_short_paragraphs() {
    init();
    let layout = lay_out(
        &record(DocumentType::Memorandum, &short_paragraphs(3)),
        Target::Paginated,
    )
    .expect("can lay out");

    assert_eq!(layout.page_count(), 1);
    let kinds = metadata_kinds(&layout);
    let labels: Vec<&str> = kinds
        .iter()
        .filter_map(|k| match k {
            UnitKind::MetadataRow { label } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["A", "DE", "ASUNTO", "FECHA"]);
    assert_eq!(kinds.last(), Some(&UnitKind::Divider));
    assert_eq!(kinds.iter().filter(|k| **k == UnitKind::Divider).count(), 1);
}

#[test]
fn reference_adds_a_row_to_tabular_metadata() {
    let memo = DocumentRecord::builder(DocumentType::InformeTecnico)
        .document_number("INFORME TÉCNICO N.° 3-2025-MRE/OGTI")
        .recipient("Ana Torres", "Directora", "")
        .sender("Luis Paredes", "Director", "")
        .subject("Migración de servidores")
        .reference("Memorándum N.° 2-2025")
        .paragraph("Se informa lo siguiente.")
        .build()
        .expect("valid record");
    let layout = lay_out(&memo, Target::Paginated).expect("can lay out");
    let labels: Vec<String> = layout
        .units_in(Section::Metadata)
        .filter_map(|u| match &u.kind {
            UnitKind::MetadataRow { label } => Some(label.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["A", "DE", "ASUNTO", "FECHA", "REF."]);
}

fn resolucion() -> DocumentRecord {
    let paragraphs: Vec<String> = [
        "Vistos; el Informe N.° 45-2025-MRE/OGA de la Oficina General de Administración;",
        "CONSIDERANDO: Que, es necesario actualizar el reglamento interno;",
        "SE RESUELVE:",
        "Artículo 1.- Aprobar el reglamento interno que forma parte de la presente resolución.",
        "Artículo 2.- Disponer la publicación de la presente resolución en el portal institucional.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    record(DocumentType::ResolucionMinisterial, &paragraphs)
}

#[test]
fn resolucion_paragraph_styling() {
    init();
    let layout = lay_out(&resolucion(), Target::Paginated).expect("can lay out");
    let config = Settings::default().layout;

    assert_eq!(
        layout.paragraph_kinds(),
        vec![
            ParagraphKind::Heading,
            ParagraphKind::Heading,
            ParagraphKind::Heading,
            ParagraphKind::Article,
            ParagraphKind::Article
        ]
    );

    for unit in layout.units_in(Section::Body) {
        assert!(unit.style.is_bold(), "{}", unit.text);
        match unit.kind {
            UnitKind::Paragraph(ParagraphKind::Article) => assert_eq!(unit.indent, config.indent),
            _ => assert_eq!(unit.indent, Pt(0.0)),
        }
    }

    assert_eq!(layout.units_in(Section::Metadata).count(), 0);
    let title = layout
        .units_in(Section::Header)
        .find(|u| u.kind == UnitKind::Title)
        .expect("title present");
    assert_eq!(title.align, oficio::layout::Align::Center);
    assert!(layout
        .units_in(Section::Header)
        .any(|u| u.kind == UnitKind::TitleRule));
}

fn close_to(a: Pt, b: Pt) -> bool {
    (a.0 - b.0).abs() < 1e-3
}

#[test]
fn headings_get_extra_space_above() {
    let layout = lay_out(&resolucion(), Target::Paginated).expect("can lay out");
    let config = Settings::default().layout;
    let body: Vec<_> = layout.units_in(Section::Body).collect();
    assert_eq!(body.len(), 5);

    for pair in body.windows(2) {
        let (previous, unit) = (pair[0], pair[1]);
        assert_eq!(previous.page_index, unit.page_index);
        let expected = match unit.kind {
            UnitKind::Paragraph(ParagraphKind::Heading) => config.paragraph_gap + config.heading_spacing,
            _ => config.paragraph_gap,
        };
        assert!(
            close_to(unit.top - previous.bottom(), expected),
            "{}: {:?}",
            unit.text,
            unit.top - previous.bottom()
        );
    }
}

#[test]
fn headings_stay_with_the_paragraph_after_them() {
    init();
    let article = format!("Artículo 1.- {}", lipsum::lipsum(150));
    let mut moved = 0;
    for fillers in 0..60 {
        let mut paragraphs = short_paragraphs(fillers);
        paragraphs.push("SE RESUELVE:".to_string());
        paragraphs.push(article.clone());
        let layout = lay_out(&record(DocumentType::ResolucionMinisterial, &paragraphs), Target::Paginated)
            .expect("can lay out");

        let body: Vec<_> = layout.units_in(Section::Body).collect();
        let heading = body[body.len() - 2];
        let first_article = body[body.len() - 1];
        assert_eq!(heading.kind, UnitKind::Paragraph(ParagraphKind::Heading));
        assert_eq!(
            heading.page_index, first_article.page_index,
            "heading orphaned after {fillers} paragraphs"
        );
        if heading.page_index > 0 && heading.top == Settings::default().layout.margins.top {
            moved += 1;
        }
    }
    assert!(moved > 0, "no heading ever reached a page boundary");
}

#[test]
fn signature_block_is_never_split() {
    init();
    let mut broke = false;
    for count in 1..=40 {
        let layout = lay_out(&record(DocumentType::Oficio, &short_paragraphs(count)), Target::Paginated)
            .expect("can lay out");
        let pages: Vec<usize> = layout
            .units_in(Section::Signature)
            .map(|u| u.page_index)
            .collect();
        assert!(!pages.is_empty());
        assert!(
            pages.iter().all(|&page| page == pages[0]),
            "signature split across pages {pages:?} with {count} paragraphs"
        );
        let last_body_page = layout
            .units_in(Section::Body)
            .map(|u| u.page_index)
            .max()
            .expect("body present");
        assert!(pages[0] >= last_body_page);
        broke |= pages[0] > last_body_page;
    }
    assert!(broke, "the signature block never moved to a new page");
}

#[test]
fn wrapped_subject_row_grows_by_its_line_count() {
    let subject = "Renovación del parque automotor institucional, mantenimiento preventivo de \
                   los vehículos asignados a las oficinas desconcentradas y adquisición de \
                   repuestos para el ejercicio presupuestal en curso";
    let memo = DocumentRecord::builder(DocumentType::Memorandum)
        .document_number("MEMORÁNDUM N.° 40-2025-MRE/OGA")
        .city_and_date("Lima, 14 de abril de 2025")
        .recipient("Ana Torres", "Directora de Logística", "")
        .sender("Luis Paredes", "Director General", "")
        .subject(subject)
        .paragraph("Se solicita atender lo indicado.")
        .build()
        .expect("valid record");
    let layout = lay_out(&memo, Target::Paginated).expect("can lay out");
    let config = Settings::default().layout;
    let line_height = MonospaceMeasure::default().line_height(&FontStyle::serif(config.metadata_size));

    let rows: Vec<_> = layout
        .units_in(Section::Metadata)
        .filter(|u| matches!(u.kind, UnitKind::MetadataRow { .. }))
        .collect();
    let asunto = rows
        .iter()
        .position(|u| u.kind == UnitKind::MetadataRow { label: "ASUNTO".to_string() })
        .expect("subject row");
    let (row, next) = (rows[asunto], rows[asunto + 1]);

    assert!(row.lines.len() > 1);
    assert!(close_to(row.height, line_height * row.lines.len() as f32));
    assert!(close_to(next.top, row.bottom() + config.row_gap));
}

#[test]
fn letters_print_the_reference_only_when_present() {
    let labels = |record: &DocumentRecord| -> Vec<String> {
        lay_out(record, Target::Paginated)
            .expect("can lay out")
            .units_in(Section::Metadata)
            .filter_map(|u| match &u.kind {
                UnitKind::LabelledParagraph { label } => Some(label.clone()),
                _ => None,
            })
            .collect()
    };

    let builder = || {
        DocumentRecord::builder(DocumentType::Oficio)
            .document_number("OFICIO N.° 77-2025-MRE/DGC")
            .recipient("Carlos Quispe", "Embajador", "Embajada del Perú en Chile")
            .sender("María Salas", "Directora General", "")
            .subject("Coordinación de la visita oficial")
            .paragraph("Tengo el honor de dirigirme a usted.")
    };

    let without = builder().build().expect("valid record");
    assert_eq!(labels(&without), vec!["Asunto:"]);

    let with = builder()
        .reference("Mensaje N.° 12-2025")
        .build()
        .expect("valid record");
    assert_eq!(labels(&with), vec!["Asunto:", "Ref.:"]);
}

#[test]
fn articles_start_below_the_previous_paragraph() {
    let layout = lay_out(&resolucion(), Target::Paginated).expect("can lay out");
    let body: Vec<_> = layout.units_in(Section::Body).collect();
    for pair in body.windows(2) {
        let (previous, unit) = (pair[0], pair[1]);
        if unit.kind == UnitKind::Paragraph(ParagraphKind::Article)
            && previous.page_index == unit.page_index
        {
            assert!(unit.top >= previous.bottom(), "{}", unit.text);
        }
    }
}

#[test]
fn other_variants_ignore_paragraph_prefixes() {
    let paragraphs: Vec<String> = [
        "SE RESUELVE: no aplica en este documento.",
        "Artículo 1.- Tampoco aplica.",
        "Vistos los antecedentes.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for document_type in DocumentType::ALL
        .into_iter()
        .filter(|t| *t != DocumentType::ResolucionMinisterial)
    {
        let layout = lay_out(&record(document_type, &paragraphs), Target::Paginated)
            .expect("can lay out");
        for unit in layout.units_in(Section::Body) {
            assert_eq!(unit.kind, UnitKind::Paragraph(ParagraphKind::Plain));
            assert_eq!(unit.indent, Pt(0.0));
            assert!(!unit.style.is_bold());
        }
    }
}

#[test]
fn layout_is_idempotent() {
    let paragraphs: Vec<String> = (0..12).map(|n| format!("{n}. {}", lipsum::lipsum(60 + n * 7))).collect();
    let oficio = record(DocumentType::Oficio, &paragraphs);
    let settings = Settings::default();
    let measure = MonospaceMeasure::default();

    // no seed: the decorative mark differs between the two renders
    let first = Orchestrator::new(&settings, &measure, Target::Paginated)
        .render(&oficio)
        .expect("can lay out");
    let second = Orchestrator::new(&settings, &measure, Target::Paginated)
        .render(&oficio)
        .expect("can lay out");

    assert_eq!(first.page_count(), second.page_count());
    assert_eq!(first.line_counts(), second.line_counts());
    assert_eq!(first.units.len(), second.units.len());
}

#[test]
fn year_name_is_always_the_official_one() {
    let json = r#"{
        "documentType": "Oficio",
        "documentNumber": "OFICIO N.° 1-2025-MRE",
        "yearName": "Año inventado",
        "senderName": "Luis Paredes",
        "subject": "Prueba",
        "bodyParagraphs": ["Texto."]
    }"#;
    let parsed = DocumentRecord::from_json(json, &OfficialConstants::default()).expect("valid");
    assert_eq!(parsed.year_name(), OFFICIAL_YEAR_NAME);

    let supplied = DocumentRecord::builder(DocumentType::Oficio)
        .year_name("Año inventado")
        .sender("Luis Paredes", "", "")
        .paragraph("Texto.")
        .build()
        .expect("valid");
    let layout = lay_out(&supplied, Target::Paginated).expect("can lay out");
    let slogan = layout
        .units_in(Section::Header)
        .find(|u| u.kind == UnitKind::Slogan)
        .expect("slogan present");
    assert_eq!(slogan.text, format!("\"{OFFICIAL_YEAR_NAME}\""));
}

#[test]
fn paragraphs_that_do_not_fit_move_whole_to_the_next_page() {
    init();
    let paragraphs: Vec<String> = (1..=10)
        .map(|n| format!("Párrafo {n}: {}", lipsum::lipsum(120)))
        .collect();
    let layout = lay_out(&record(DocumentType::Oficio, &paragraphs), Target::Paginated)
        .expect("can lay out");
    let config = Settings::default().layout;
    assert!(layout.page_count() > 1);

    let deferred: Vec<_> = layout
        .units_in(Section::Body)
        .filter(|u| u.page_index > 0 && u.top == config.margins.top)
        .collect();
    assert!(!deferred.is_empty());

    for unit in deferred {
        let first_line = unit.lines.first().expect("paragraph has lines");
        for page in layout.pages.iter().filter(|p| p.number - 1 != unit.page_index) {
            assert!(
                page.text().all(|t| &t.text != first_line),
                "first line of {:?} found on page {}",
                unit.text.chars().take(12).collect::<String>(),
                page.number
            );
        }
    }
}

#[test]
fn oversized_paragraph_fails_the_render() {
    let giant = vec![lipsum::lipsum(2500)];
    let result = lay_out(&record(DocumentType::Oficio, &giant), Target::Paginated);
    match result {
        Err(DocError::OversizedAtomicUnit { height, usable, .. }) => assert!(height > usable),
        other => panic!("expected OversizedAtomicUnit, got {other:?}"),
    }

    let exporter = PdfExporter::with_standard_fonts();
    let pdf = oficio::render_pdf(
        &record(DocumentType::Oficio, &giant),
        &Settings::default(),
        exporter,
        RenderStamp::now(),
    );
    assert!(matches!(pdf, Err(DocError::OversizedAtomicUnit { .. })));
}

#[test]
fn preview_and_export_agree_on_structure() {
    init();
    let record = resolucion();
    let settings = Settings::default();

    let preview = render_preview(&record, &settings, RenderStamp::now()).expect("can preview");

    let exporter = PdfExporter::with_standard_fonts();
    let measure = exporter.measure();
    let paginated = Orchestrator::new(&settings, &measure, Target::Paginated)
        .render(&record)
        .expect("can lay out");

    assert_eq!(preview.layout().target, Target::Continuous);
    assert_eq!(
        preview.layout().paragraph_kinds(),
        paginated.paragraph_kinds()
    );
    assert_eq!(preview.layout().section_order(), paginated.section_order());
}

#[test]
fn empty_body_is_rejected() {
    let result = DocumentRecord::builder(DocumentType::Memorandum)
        .sender("Luis Paredes", "", "")
        .paragraph("   ")
        .build();
    assert!(matches!(result, Err(DocError::EmptyBodyContent)));
}
